use super::arena::Arena;
use super::handle::Handle;
use crate::node::{Color, Direction};

/// One distinct key of the multiset, with its duplicate count and links.
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: K,
    // Logical copies of `key` collapsed into this node; never zero while linked.
    quantity: usize,
    // Sum of `quantity` over the subtree rooted here.
    subtree_size: usize,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a red leaf holding a single copy of `key`.
    pub(crate) fn new_leaf(key: K, parent: Option<Handle>) -> Self {
        Self {
            key,
            quantity: 1,
            subtree_size: 1,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn into_key(self) -> K {
        self.key
    }

    #[inline]
    pub(crate) fn quantity(&self) -> usize {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: usize) {
        self.quantity = quantity;
    }

    #[inline]
    pub(crate) fn subtree_size(&self) -> usize {
        self.subtree_size
    }

    pub(crate) fn set_subtree_size(&mut self, size: usize) {
        self.subtree_size = size;
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    /// Returns the child on the given side.
    #[inline]
    pub(crate) fn child(&self, side: Direction) -> Option<Handle> {
        match side {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Direction, child: Option<Handle>) {
        match side {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }
}

/// Subtree size of an optional link; absent children count zero.
#[inline]
pub(crate) fn size_of<K>(nodes: &Arena<Node<K>>, link: Option<Handle>) -> usize {
    link.map_or(0, |h| nodes.get(h).subtree_size())
}

/// Color of an optional link; absent children are black.
#[inline]
pub(crate) fn color_of<K>(nodes: &Arena<Node<K>>, link: Option<Handle>) -> Color {
    link.map_or(Color::Black, |h| nodes.get(h).color())
}

/// Returns the leftmost node of the subtree rooted at `handle`.
pub(crate) fn minimum<K>(nodes: &Arena<Node<K>>, mut handle: Handle) -> Handle {
    while let Some(left) = nodes.get(handle).left() {
        handle = left;
    }
    handle
}

/// Returns the rightmost node of the subtree rooted at `handle`.
pub(crate) fn maximum<K>(nodes: &Arena<Node<K>>, mut handle: Handle) -> Handle {
    while let Some(right) = nodes.get(handle).right() {
        handle = right;
    }
    handle
}

/// In-order successor, or `None` for the maximum.
pub(crate) fn successor<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Option<Handle> {
    if let Some(right) = nodes.get(handle).right() {
        return Some(minimum(nodes, right));
    }
    let mut child = handle;
    let mut parent = nodes.get(handle).parent();
    while let Some(p) = parent {
        if nodes.get(p).right() != Some(child) {
            break;
        }
        child = p;
        parent = nodes.get(p).parent();
    }
    parent
}

/// In-order predecessor, or `None` for the minimum.
pub(crate) fn predecessor<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Option<Handle> {
    if let Some(left) = nodes.get(handle).left() {
        return Some(maximum(nodes, left));
    }
    let mut child = handle;
    let mut parent = nodes.get(handle).parent();
    while let Some(p) = parent {
        if nodes.get(p).left() != Some(child) {
            break;
        }
        child = p;
        parent = nodes.get(p).parent();
    }
    parent
}

/// 1-based rank of the first copy of `handle`'s key, found by walking to the root.
pub(crate) fn rank_of_node<K>(nodes: &Arena<Node<K>>, handle: Handle) -> usize {
    let mut rank = size_of(nodes, nodes.get(handle).left()) + 1;
    let mut child = handle;
    while let Some(parent) = nodes.get(child).parent() {
        let p = nodes.get(parent);
        if p.right() == Some(child) {
            rank += size_of(nodes, p.left()) + p.quantity();
        }
        child = parent;
    }
    rank
}

/// Number of edges between `handle` and the root.
pub(crate) fn depth_of<K>(nodes: &Arena<Node<K>>, handle: Handle) -> usize {
    let mut depth = 0;
    let mut current = nodes.get(handle).parent();
    while let Some(p) = current {
        depth += 1;
        current = nodes.get(p).parent();
    }
    depth
}
