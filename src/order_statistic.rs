/// A 1-based position in the expanded sorted order of an `OSRBTree`.
///
/// Every copy of a key occupies its own position, so `Rank(1)` is the smallest
/// copy and `Rank(tree.len())` the largest.
///
/// # Examples
///
/// ```
/// use osrb_tree::{OSRBTree, Rank};
///
/// let tree = OSRBTree::from(["b", "a", "b"]);
///
/// assert_eq!(tree[Rank(1)], "a");
/// assert_eq!(tree[Rank(3)], "b");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
