use core::cmp::Ordering;

use log::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{self, Node, color_of, size_of};
use crate::comparator::Comparator;
use crate::node::{Color, Direction, NodeId};
use crate::observer::Observer;

/// The red-black tree backing `OSRBTree`.
///
/// Links are `Option<Handle>` into `nodes`; an absent link is black and has
/// size zero. Between public calls:
///
/// - the root is black;
/// - no red node has a red child;
/// - every root-to-leaf path crosses the same number of black nodes;
/// - in-order keys are strictly increasing under `comparator`;
/// - `subtree_size == size(left) + size(right) + quantity` for every node.
#[derive(Clone)]
pub(crate) struct RawOSRBTree<K, C, O> {
    /// Arena storing one node per distinct key.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    comparator: C,
    observer: O,
}

impl<K, C, O> RawOSRBTree<K, C, O> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(comparator: C, observer: O) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            comparator,
            observer,
        }
    }

    /// Creates a new tree with room for `capacity` distinct keys.
    pub(crate) fn with_capacity(capacity: usize, comparator: C, observer: O) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            comparator,
            observer,
        }
    }

    /// Total number of copies held, duplicates included.
    pub(crate) fn len(&self) -> usize {
        size_of(&self.nodes, self.root)
    }

    /// Number of nodes, i.e. distinct keys.
    pub(crate) const fn distinct_len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<K>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.comparator
    }

    pub(crate) fn observer(&self) -> &O {
        &self.observer
    }

    pub(crate) fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub(crate) fn into_observer(self) -> O {
        self.observer
    }

    /// Gives up the tree structure, keeping only the node storage.
    pub(crate) fn into_nodes(self) -> Arena<Node<K>> {
        self.nodes
    }

    /// Returns the node holding the smallest key.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| node::minimum(&self.nodes, root))
    }

    /// Returns the node holding the largest key.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| node::maximum(&self.nodes, root))
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: alloc::vec::Vec<(Handle, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            stack.extend(node.left().map(|l| (l, depth + 1)));
            stack.extend(node.right().map(|r| (r, depth + 1)));
        }
        height
    }

    /// Looks up a node by a handle that may be stale.
    pub(crate) fn try_node(&self, handle: Handle) -> Option<&Node<K>> {
        self.nodes.try_get(handle)
    }

    /// Selects the node covering the 1-based `rank`.
    pub(crate) fn select(&self, rank: usize) -> Option<Handle> {
        if rank == 0 || rank > self.len() {
            return None;
        }

        let mut current = self.root;
        let mut remaining = rank;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left_size = size_of(&self.nodes, node.left());
            if remaining <= left_size {
                current = node.left();
            } else if remaining <= left_size + node.quantity() {
                return Some(handle);
            } else {
                remaining -= left_size + node.quantity();
                current = node.right();
            }
        }

        None
    }
}

impl<K, C: Comparator<K>, O> RawOSRBTree<K, C, O> {
    /// Searches for the node holding `key`.
    pub(crate) fn search(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match self.comparator.compare(key, node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns how many copies of `key` are held.
    pub(crate) fn count(&self, key: &K) -> usize {
        self.search(key).map_or(0, |h| self.nodes.get(h).quantity())
    }

    /// Returns the 1-based rank of the first copy of `key`.
    pub(crate) fn rank(&self, key: &K) -> Option<usize> {
        let mut current = self.root;
        let mut before = 0;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match self.comparator.compare(key, node.key()) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => {
                    before += size_of(&self.nodes, node.left()) + node.quantity();
                    current = node.right();
                }
                Ordering::Equal => return Some(before + size_of(&self.nodes, node.left()) + 1),
            }
        }
        None
    }

    /// Finds the node with the smallest key not less than `key`.
    pub(crate) fn lower_bound(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.comparator.less(node.key(), key) {
                current = node.right();
            } else {
                candidate = Some(handle);
                current = node.left();
            }
        }
        candidate
    }

    /// Finds the node with the smallest key greater than `key`.
    pub(crate) fn upper_bound(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if self.comparator.less(key, node.key()) {
                candidate = Some(handle);
                current = node.left();
            } else {
                current = node.right();
            }
        }
        candidate
    }
}

impl<K, C: Comparator<K>, O: Observer<K>> RawOSRBTree<K, C, O> {
    /// Inserts one copy of `key` and returns the node now holding it.
    ///
    /// Every node on the descent path gains one element whether or not the key
    /// is new, so sizes are bumped on the way down.
    pub(crate) fn insert(&mut self, key: K) -> Handle {
        let mut parent = None;
        let mut side = Direction::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let size = self.nodes.get(handle).subtree_size();
            self.set_subtree_size(handle, size + 1);

            let node = self.nodes.get(handle);
            side = match self.comparator.compare(&key, node.key()) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => {
                    let quantity = node.quantity() + 1;
                    self.set_quantity(handle, quantity);
                    trace!("insert: node {} now holds {quantity} copies", handle.to_index());
                    return handle;
                }
            };
            parent = Some(handle);
            current = node.child(side);
        }

        let handle = self.nodes.alloc(Node::new_leaf(key, parent));
        match parent {
            None => self.root = Some(handle),
            Some(p) => self.nodes.get_mut(p).set_child(side, Some(handle)),
        }
        trace!(
            "insert: linked node {} under {:?} ({side:?})",
            handle.to_index(),
            parent.map(Handle::to_index)
        );
        self.observer.on_insert(
            NodeId(handle),
            self.nodes.get(handle).key(),
            parent.map(|p| (NodeId(p), side)),
        );

        self.insert_fixup(handle);
        handle
    }

    fn insert_fixup(&mut self, mut z: Handle) {
        while let Some(parent) = self.nodes.get(z).parent()
            && self.nodes.get(parent).color() == Color::Red
        {
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.nodes.get(parent).parent() else {
                break;
            };
            let side = if self.nodes.get(grandparent).left() == Some(parent) {
                Direction::Left
            } else {
                Direction::Right
            };
            let uncle = self.nodes.get(grandparent).child(side.opposite());

            if let Some(uncle) = uncle
                && self.nodes.get(uncle).color() == Color::Red
            {
                trace!("insert_fixup: recolor around node {}", grandparent.to_index());
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.nodes.get(parent).child(side.opposite()) == Some(z) {
                // Inner child: turn it into an outer one first.
                self.rotate(parent, side);
                core::mem::swap(&mut z, &mut parent);
            }
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Removes one copy of the key held by `handle`; returns the copies left.
    pub(crate) fn remove_one(&mut self, handle: Handle) -> usize {
        let quantity = self.nodes.get(handle).quantity();
        if quantity > 1 {
            self.set_quantity(handle, quantity - 1);
            self.shrink_path(Some(handle), None, 1);
            trace!("remove: node {} now holds {} copies", handle.to_index(), quantity - 1);
            return quantity - 1;
        }
        self.unlink(handle);
        0
    }

    /// Removes every copy of the key held by `handle`; returns the key and how
    /// many copies were dropped.
    pub(crate) fn remove_all(&mut self, handle: Handle) -> (K, usize) {
        let quantity = self.nodes.get(handle).quantity();
        (self.unlink(handle), quantity)
    }

    /// Unlinks and frees `z`, rebalancing as needed.
    fn unlink(&mut self, z: Handle) -> K {
        let target = self.nodes.get(z);
        let (parent, left, right) = (target.parent(), target.left(), target.right());
        let (quantity, color) = (target.quantity(), target.color());

        self.shrink_path(parent, None, quantity);

        let mut removed_color = color;
        let (x, x_parent) = match (left, right) {
            (None, _) => {
                self.transplant(z, right);
                (right, parent)
            }
            (_, None) => {
                self.transplant(z, left);
                (left, parent)
            }
            (Some(left), Some(right)) => {
                let y = node::minimum(&self.nodes, right);
                let successor = self.nodes.get(y);
                let (y_parent, y_right, y_quantity) = (successor.parent(), successor.right(), successor.quantity());
                removed_color = successor.color();

                let x_parent = if y_parent == Some(z) {
                    Some(y)
                } else {
                    // `y` leaves the nodes between it and `z`.
                    self.shrink_path(y_parent, Some(z), y_quantity);
                    self.transplant(y, y_right);
                    self.adopt(y, Direction::Right, right);
                    y_parent
                };

                self.transplant(z, Some(y));
                self.adopt(y, Direction::Left, left);
                self.set_color(y, color);
                self.refresh_size(y);
                (y_right, x_parent)
            }
        };

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }

        trace!("remove: unlinked node {} ({quantity} copies)", z.to_index());
        let removed = self.nodes.take(z);
        self.observer.on_remove(NodeId(z));
        removed.into_key()
    }

    /// Repairs black height after a black node left the slot now held by `x`.
    ///
    /// `x` may be absent, so its parent is tracked alongside it.
    fn delete_fixup(&mut self, mut x: Option<Handle>, mut parent: Option<Handle>) {
        while x != self.root && color_of(&self.nodes, x) == Color::Black {
            let Some(p) = parent else {
                break;
            };
            let side = if self.nodes.get(p).left() == x {
                Direction::Left
            } else {
                Direction::Right
            };
            let far = side.opposite();

            let mut sibling = self.nodes.get(p).child(far);
            if let Some(s) = sibling
                && self.nodes.get(s).color() == Color::Red
            {
                self.set_color(s, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling = self.nodes.get(p).child(far);
            }

            let Some(s) = sibling else {
                x = Some(p);
                parent = self.nodes.get(p).parent();
                continue;
            };
            let near_child = self.nodes.get(s).child(side);
            let far_child = self.nodes.get(s).child(far);

            if color_of(&self.nodes, near_child) == Color::Black && color_of(&self.nodes, far_child) == Color::Black {
                trace!("delete_fixup: push black up from node {}", p.to_index());
                self.set_color(s, Color::Red);
                x = Some(p);
                parent = self.nodes.get(p).parent();
                continue;
            }

            let s = match (near_child, color_of(&self.nodes, far_child)) {
                (Some(near), Color::Black) => {
                    self.set_color(near, Color::Black);
                    self.set_color(s, Color::Red);
                    self.rotate(s, far);
                    near
                }
                _ => s,
            };

            let parent_color = self.nodes.get(p).color();
            self.set_color(s, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far_child) = self.nodes.get(s).child(far) {
                self.set_color(far_child, Color::Black);
            }
            self.rotate(p, side);
            x = self.root;
            parent = None;
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }

    /// Rotates `pivot` down towards `direction`, lifting its child on the other side.
    ///
    /// Only `pivot` and the lifted child change subtree size.
    fn rotate(&mut self, pivot: Handle, direction: Direction) {
        let opposite = direction.opposite();
        let child = self
            .nodes
            .get(pivot)
            .child(opposite)
            .expect("`RawOSRBTree::rotate()` - pivot has no child to lift!");

        let inner = self.nodes.get(child).child(direction);
        self.nodes.get_mut(pivot).set_child(opposite, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(pivot));
        }

        let parent = self.nodes.get(pivot).parent();
        self.nodes.get_mut(child).set_parent(parent);
        self.replace_child(parent, pivot, Some(child));
        self.nodes.get_mut(child).set_child(direction, Some(pivot));
        self.nodes.get_mut(pivot).set_parent(Some(child));

        trace!("rotate: node {} {direction:?} under {}", pivot.to_index(), child.to_index());
        self.observer.on_rotate(NodeId(pivot), NodeId(child), direction);

        let pivot_size = self.nodes.get(pivot).subtree_size();
        self.set_subtree_size(child, pivot_size);
        self.refresh_size(pivot);
    }

    /// Puts `replacement` where `old` hangs under its parent.
    fn transplant(&mut self, old: Handle, replacement: Option<Handle>) {
        let parent = self.nodes.get(old).parent();
        self.replace_child(parent, old, replacement);
        if let Some(r) = replacement {
            self.nodes.get_mut(r).set_parent(parent);
        }
        self.observer.on_transplant(NodeId(old), replacement.map(NodeId));
    }

    /// Hangs `child` under `parent` on `side`, outside of any rotation.
    fn adopt(&mut self, parent: Handle, side: Direction, child: Handle) {
        self.nodes.get_mut(parent).set_child(side, Some(child));
        self.nodes.get_mut(child).set_parent(Some(parent));
        self.observer.on_reparent(NodeId(child), NodeId(parent), side);
    }

    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, replacement: Option<Handle>) {
        match parent {
            None => self.root = replacement,
            Some(p) => {
                let parent = self.nodes.get_mut(p);
                if parent.left() == Some(old) {
                    parent.set_child(Direction::Left, replacement);
                } else {
                    parent.set_child(Direction::Right, replacement);
                }
            }
        }
    }

    /// Subtracts `amount` from every size on the path from `from` upwards,
    /// stopping before `stop` (or at the root).
    fn shrink_path(&mut self, from: Option<Handle>, stop: Option<Handle>, amount: usize) {
        let mut current = from;
        while let Some(handle) = current
            && current != stop
        {
            let size = self.nodes.get(handle).subtree_size();
            self.set_subtree_size(handle, size - amount);
            current = self.nodes.get(handle).parent();
        }
    }

    fn refresh_size(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let size = size_of(&self.nodes, node.left()) + size_of(&self.nodes, node.right()) + node.quantity();
        self.set_subtree_size(handle, size);
    }

    fn set_subtree_size(&mut self, handle: Handle, size: usize) {
        let node = self.nodes.get_mut(handle);
        if node.subtree_size() != size {
            node.set_subtree_size(size);
            self.observer.on_size_change(NodeId(handle), size);
        }
    }

    fn set_quantity(&mut self, handle: Handle, quantity: usize) {
        self.nodes.get_mut(handle).set_quantity(quantity);
        self.observer.on_quantity_change(NodeId(handle), quantity);
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        let node = self.nodes.get_mut(handle);
        if node.color() != color {
            node.set_color(color);
            self.observer.on_color_change(NodeId(handle), color);
        }
    }

    /// Removes every node, reporting each one to the observer.
    pub(crate) fn clear(&mut self) {
        let mut current = self.first();
        while let Some(handle) = current {
            current = node::successor(&self.nodes, handle);
            self.observer.on_remove(NodeId(handle));
        }
        debug!("clear: dropped {} nodes ({} copies)", self.nodes.len(), self.len());
        self.nodes.clear();
        self.root = None;
    }
}
