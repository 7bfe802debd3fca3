//! Read-only views of individual tree nodes.
//!
//! These types let an observer or a front-end inspect the shape of an
//! [`OSRBTree`](crate::OSRBTree) (links, colors, subtree sizes) without being
//! able to mutate it.

use core::fmt;

use crate::raw::node::{self as raw_node, Node};
use crate::raw::{Arena, Handle};

/// The color of a red-black tree node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    /// A red node. Never the root, and never the parent of another red node.
    Red,
    /// A black node. Absent children are treated as black.
    Black,
}

/// A side of a binary tree node, also used to name a rotation.
///
/// `Direction::Left` as a rotation moves the pivot down to the left, lifting its
/// right child into its place.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// The left child, or a left rotation.
    Left,
    /// The right child, or a right rotation.
    Right,
}

impl Direction {
    /// Returns the other side.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::Direction;
    ///
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// ```
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A stable identifier for a node of an [`OSRBTree`](crate::OSRBTree).
///
/// An id stays valid, and keeps naming the same key, until that key's last copy
/// is removed. After that the id is stale and may later be reused for a newly
/// inserted key.
///
/// Ids carry no tree identity. It is a logic error to pass an id to any tree
/// other than the one that issued it: if the slot happens to be occupied there,
/// the call silently acts on whatever key lives in it. Like a stale id, such
/// misuse never causes undefined behavior or breaks the tree's balance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) Handle);

impl NodeId {
    /// Returns the zero-based arena slot of this node.
    ///
    /// Slots are dense, which makes them convenient indexes for side tables
    /// kept by a front-end.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0.to_index()
    }
}

/// A borrowed view of one node.
///
/// Obtained from [`OSRBTree::search`](crate::OSRBTree::search),
/// [`OSRBTree::node`](crate::OSRBTree::node) and friends. Navigation methods
/// return further views into the same tree.
///
/// # Examples
///
/// ```
/// use osrb_tree::{Color, OSRBTree};
///
/// let tree: OSRBTree<i32> = [2, 1, 3, 3].into_iter().collect();
/// let root = tree.root().unwrap();
///
/// assert_eq!(*root.key(), 2);
/// assert_eq!(root.color(), Color::Black);
/// assert_eq!(root.subtree_size(), 4);
/// assert_eq!(root.right().map(|n| n.quantity()), Some(2));
/// ```
pub struct NodeRef<'a, K> {
    nodes: &'a Arena<Node<K>>,
    handle: Handle,
}

impl<'a, K> NodeRef<'a, K> {
    pub(crate) fn new(nodes: &'a Arena<Node<K>>, handle: Handle) -> Self {
        Self { nodes, handle }
    }

    fn view(&self, link: Option<Handle>) -> Option<NodeRef<'a, K>> {
        link.map(|handle| NodeRef::new(self.nodes, handle))
    }

    fn raw(&self) -> &'a Node<K> {
        self.nodes.get(self.handle)
    }

    /// Returns this node's id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        NodeId(self.handle)
    }

    /// Returns the key stored in this node.
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.raw().key()
    }

    /// Returns how many copies of the key the tree holds.
    #[must_use]
    pub fn quantity(&self) -> usize {
        self.raw().quantity()
    }

    /// Returns the total number of copies held in the subtree rooted here,
    /// including this node's own.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        self.raw().subtree_size()
    }

    /// Returns this node's color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.raw().color()
    }

    /// Returns the parent node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a, K>> {
        self.view(self.raw().parent())
    }

    /// Returns the left child.
    #[must_use]
    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.view(self.raw().left())
    }

    /// Returns the right child.
    #[must_use]
    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.view(self.raw().right())
    }

    /// Returns the child on `side`.
    #[must_use]
    pub fn child(&self, side: Direction) -> Option<NodeRef<'a, K>> {
        self.view(self.raw().child(side))
    }

    /// Returns the node holding the next larger key.
    #[must_use]
    pub fn next(&self) -> Option<NodeRef<'a, K>> {
        self.view(raw_node::successor(self.nodes, self.handle))
    }

    /// Returns the node holding the next smaller key.
    #[must_use]
    pub fn prev(&self) -> Option<NodeRef<'a, K>> {
        self.view(raw_node::predecessor(self.nodes, self.handle))
    }

    /// Returns `true` if this node has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.raw().parent().is_none()
    }

    /// Returns `true` if this node is its parent's left child.
    #[must_use]
    pub fn is_left_child(&self) -> bool {
        self.raw()
            .parent()
            .is_some_and(|p| self.nodes.get(p).left() == Some(self.handle))
    }

    /// Returns `true` if this node is its parent's right child.
    #[must_use]
    pub fn is_right_child(&self) -> bool {
        self.raw()
            .parent()
            .is_some_and(|p| self.nodes.get(p).right() == Some(self.handle))
    }

    /// Returns the number of edges between this node and the root.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn depth(&self) -> usize {
        raw_node::depth_of(self.nodes, self.handle)
    }

    /// Returns the 1-based rank of the first copy of this node's key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn rank(&self) -> usize {
        raw_node::rank_of_node(self.nodes, self.handle)
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K> PartialEq for NodeRef<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.nodes, other.nodes) && self.handle == other.handle
    }
}

impl<K> Eq for NodeRef<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.handle.to_index())
            .field("key", self.key())
            .field("quantity", &self.quantity())
            .field("color", &self.color())
            .field("subtree_size", &self.subtree_size())
            .finish()
    }
}
