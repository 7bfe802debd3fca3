use super::OSRBTree;
use crate::comparator::NaturalOrder;
use crate::observer::NoopObserver;
use crate::raw::RawOSRBTree;

impl<K> OSRBTree<K> {
    /// Creates an empty tree with room for at least `capacity` distinct keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree: OSRBTree<i32> = OSRBTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OSRBTree {
            raw: RawOSRBTree::with_capacity(capacity, NaturalOrder, NoopObserver),
        }
    }
}

impl<K, C, O> OSRBTree<K, C, O> {
    /// Creates an empty tree with room for at least `capacity` distinct keys,
    /// ordered by `comparator` and reporting to `observer`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::{NoopObserver, OSRBTree};
    ///
    /// let mut tree = OSRBTree::with_capacity_and_comparator_and_observer(
    ///     64,
    ///     |a: &u32, b: &u32| a > b,
    ///     NoopObserver,
    /// );
    /// tree.extend([1, 2, 3]);
    ///
    /// assert!(tree.capacity() >= 64);
    /// assert_eq!(tree.select(1), Ok(&3));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity_and_comparator_and_observer(capacity: usize, comparator: C, observer: O) -> Self {
        OSRBTree {
            raw: RawOSRBTree::with_capacity(capacity, comparator, observer),
        }
    }

    /// Returns how many distinct keys the tree can hold without reallocating.
    ///
    /// Duplicates of a present key never need more room.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let mut tree: OSRBTree<i32> = OSRBTree::with_capacity(32);
    /// tree.extend([7; 100]);
    /// assert!(tree.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
