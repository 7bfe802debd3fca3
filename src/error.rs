//! Error type for fallible tree queries and removals.
//!
//! Only two things can go wrong: asking about a key the tree does not hold, or
//! asking for a rank outside the tree's current size. Both leave the tree
//! untouched.

use core::error::Error;
use core::fmt::{Display, Formatter, Result};

/// Error returned by [`OSRBTree`](crate::OSRBTree) operations.
///
/// # Examples
///
/// ```
/// use osrb_tree::{OSRBTree, TreeError};
///
/// let tree: OSRBTree<i32> = [10, 20].into_iter().collect();
/// assert_eq!(tree.rank(&15), Err(TreeError::NotFound));
/// assert_eq!(tree.select(3), Err(TreeError::OutOfRange { rank: 3, len: 2 }));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TreeError {
    /// The key, or the node id, is not present in the tree.
    NotFound,

    /// A 1-based rank outside `1..=len`.
    OutOfRange {
        /// The rank that was requested.
        rank: usize,
        /// Total number of elements, duplicates included, at the time of the call.
        len: usize,
    },
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TreeError::NotFound => write!(f, "Key not found in tree"),
            TreeError::OutOfRange { rank, len } => {
                if *len == 0 {
                    write!(f, "Rank {rank} out of range: tree is empty")
                } else {
                    write!(f, "Rank {rank} out of range: expected 1..={len}")
                }
            }
        }
    }
}

impl Error for TreeError {}
