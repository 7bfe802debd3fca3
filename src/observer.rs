//! Change notifications for front-ends that mirror the tree.
//!
//! Every method has an empty default body, so an observer only implements the
//! events it cares about. Notifications are delivered synchronously, in the
//! order the changes happen, while the tree is mid-update: an observer should
//! record what it needs and return. It cannot reach back into the tree, which is
//! mutably borrowed for the duration of the call.

use crate::node::{Color, Direction, NodeId};

/// Receives structural and color changes from an [`OSRBTree`](crate::OSRBTree).
///
/// # Examples
///
/// ```
/// use osrb_tree::{Direction, NodeId, Observer, OSRBTree};
///
/// #[derive(Default)]
/// struct RotationCounter(usize);
///
/// impl<K> Observer<K> for RotationCounter {
///     fn on_rotate(&mut self, _pivot: NodeId, _child: NodeId, _direction: Direction) {
///         self.0 += 1;
///     }
/// }
///
/// let mut tree = OSRBTree::with_observer(RotationCounter::default());
/// tree.extend(1..=3);
/// assert_eq!(tree.observer().0, 1);
/// ```
pub trait Observer<K> {
    /// A node for a previously absent key was linked as the child of `parent`
    /// on the given side, or became the root when `parent` is `None`. It starts
    /// out red, with one copy and no children.
    fn on_insert(&mut self, node: NodeId, key: &K, parent: Option<(NodeId, Direction)>) {
        let _ = (node, key, parent);
    }

    /// The last copy of a key was removed and its node discarded. `node` is stale
    /// from now on.
    fn on_remove(&mut self, node: NodeId) {
        let _ = node;
    }

    /// `node` was recolored to `color`.
    fn on_color_change(&mut self, node: NodeId, color: Color) {
        let _ = (node, color);
    }

    /// `pivot` was rotated in `direction`: `child` took its place and `pivot`
    /// became `child`'s child on the `direction` side. `child`'s former child on
    /// that side moved across to `pivot`, on the opposite side.
    fn on_rotate(&mut self, pivot: NodeId, child: NodeId, direction: Direction) {
        let _ = (pivot, child, direction);
    }

    /// `replacement` (or nothing) was spliced into `old`'s position under
    /// `old`'s parent. `old`'s own links are left as they were.
    fn on_transplant(&mut self, old: NodeId, replacement: Option<NodeId>) {
        let _ = (old, replacement);
    }

    /// `child` was attached to `parent` on `side`. Removing a node with two
    /// children reports this when its successor takes over those children.
    fn on_reparent(&mut self, child: NodeId, parent: NodeId, side: Direction) {
        let _ = (child, parent, side);
    }

    /// `node`'s subtree size changed to `subtree_size`.
    fn on_size_change(&mut self, node: NodeId, subtree_size: usize) {
        let _ = (node, subtree_size);
    }

    /// `node` now holds `quantity` copies of its key.
    fn on_quantity_change(&mut self, node: NodeId, quantity: usize) {
        let _ = (node, quantity);
    }
}

/// An observer that ignores every event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoopObserver;

impl<K> Observer<K> for NoopObserver {}

impl<K, O: Observer<K> + ?Sized> Observer<K> for &mut O {
    fn on_insert(&mut self, node: NodeId, key: &K, parent: Option<(NodeId, Direction)>) {
        (**self).on_insert(node, key, parent);
    }

    fn on_remove(&mut self, node: NodeId) {
        (**self).on_remove(node);
    }

    fn on_color_change(&mut self, node: NodeId, color: Color) {
        (**self).on_color_change(node, color);
    }

    fn on_rotate(&mut self, pivot: NodeId, child: NodeId, direction: Direction) {
        (**self).on_rotate(pivot, child, direction);
    }

    fn on_transplant(&mut self, old: NodeId, replacement: Option<NodeId>) {
        (**self).on_transplant(old, replacement);
    }

    fn on_reparent(&mut self, child: NodeId, parent: NodeId, side: Direction) {
        (**self).on_reparent(child, parent, side);
    }

    fn on_size_change(&mut self, node: NodeId, subtree_size: usize) {
        (**self).on_size_change(node, subtree_size);
    }

    fn on_quantity_change(&mut self, node: NodeId, quantity: usize) {
        (**self).on_quantity_change(node, quantity);
    }
}
