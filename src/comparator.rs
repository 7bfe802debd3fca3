//! Pluggable key ordering.

use core::cmp::Ordering;

/// A strict weak ordering over keys, expressed as "less than".
///
/// Two keys are considered equal, and collapse into one node, when neither is
/// less than the other.
///
/// Closures of type `Fn(&K, &K) -> bool` are comparators, which makes it easy
/// to order a tree differently from `K`'s [`Ord`] implementation:
///
/// ```
/// use osrb_tree::OSRBTree;
///
/// // A max-first tree.
/// let mut tree = OSRBTree::with_comparator(|a: &i32, b: &i32| a > b);
/// tree.extend([1, 3, 2]);
/// assert_eq!(tree.select(1), Ok(&3));
/// ```
pub trait Comparator<K: ?Sized> {
    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;

    /// Three-way comparison derived from [`Comparator::less`].
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }

    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}
