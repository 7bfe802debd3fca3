use core::ops::{Index, Range};

use super::OSRBTree;
use crate::comparator::Comparator;
use crate::error::TreeError;
use crate::node::NodeRef;
use crate::order_statistic::Rank;

impl<K, C, O> OSRBTree<K, C, O> {
    /// Returns the key at the 1-based position `rank` of the expanded sorted
    /// order, where each copy of a key has its own position.
    ///
    /// # Errors
    ///
    /// [`TreeError::OutOfRange`] unless `1 <= rank <= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::{OSRBTree, TreeError};
    ///
    /// let tree = OSRBTree::from([5, 3, 8, 3, 5]);
    /// let picked: Vec<_> = (1..=5).map(|k| *tree.select(k).unwrap()).collect();
    /// assert_eq!(picked, [3, 3, 5, 5, 8]);
    ///
    /// assert_eq!(tree.select(0), Err(TreeError::OutOfRange { rank: 0, len: 5 }));
    /// assert_eq!(tree.select(6), Err(TreeError::OutOfRange { rank: 6, len: 5 }));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn select(&self, rank: usize) -> Result<&K, TreeError> {
        self.select_node(rank).map(|node| node.key())
    }

    /// Like [`select`](OSRBTree::select), but returns the node covering
    /// position `rank`.
    ///
    /// # Errors
    ///
    /// [`TreeError::OutOfRange`] unless `1 <= rank <= self.len()`.
    pub fn select_node(&self, rank: usize) -> Result<NodeRef<'_, K>, TreeError> {
        self.raw
            .select(rank)
            .map(|handle| NodeRef::new(self.raw.nodes(), handle))
            .ok_or(TreeError::OutOfRange { rank, len: self.len() })
    }
}

impl<K, C: Comparator<K>, O> OSRBTree<K, C, O> {
    /// Returns the 1-based position of the first copy of `key`: one more than
    /// the number of copies strictly smaller than it.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if the tree holds no copy of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::{OSRBTree, TreeError};
    ///
    /// let tree = OSRBTree::from([5, 3, 8, 3, 5]);
    /// assert_eq!(tree.rank(&3), Ok(1));
    /// assert_eq!(tree.rank(&5), Ok(3));
    /// assert_eq!(tree.rank(&8), Ok(5));
    /// assert_eq!(tree.rank(&4), Err(TreeError::NotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn rank(&self, key: &K) -> Result<usize, TreeError> {
        self.raw.rank(key).ok_or(TreeError::NotFound)
    }

    /// Returns the 1-based positions held by the copies of `key`.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if the tree holds no copy of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([5, 3, 8, 3, 5]);
    /// assert_eq!(tree.rank_range(&5), Ok(3..5));
    /// ```
    pub fn rank_range(&self, key: &K) -> Result<Range<usize>, TreeError> {
        let first = self.rank(key)?;
        Ok(first..first + self.raw.count(key))
    }
}

/// Indexes into the tree by 1-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of range.
///
/// # Examples
///
/// ```
/// use osrb_tree::{OSRBTree, Rank};
///
/// let tree = OSRBTree::from([10, 20, 20]);
/// assert_eq!(tree[Rank(2)], 20);
/// ```
impl<K, C, O> Index<Rank> for OSRBTree<K, C, O> {
    type Output = K;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.raw
            .select(rank.0)
            .map(|handle| self.raw.node(handle).key())
            .expect("rank out of range")
    }
}
