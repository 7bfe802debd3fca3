use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use log::trace;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::node::{NodeId, NodeRef};
use crate::observer::{NoopObserver, Observer};
use crate::raw::node::{self as raw_node, Node};
use crate::raw::{Arena, Handle, RawOSRBTree};

mod capacity;
mod order_statistic;

/// An ordered multiset based on an order-statistic red-black tree.
///
/// Equal keys are not stored twice: each distinct key lives in one node that
/// counts how many copies were inserted. [`len`](OSRBTree::len) counts copies,
/// [`distinct_len`](OSRBTree::distinct_len) counts nodes. Every node also
/// records the number of copies in its subtree, which makes
/// [`rank`](OSRBTree::rank) and [`select`](OSRBTree::select) logarithmic.
///
/// Keys are ordered by a [`Comparator`], [`NaturalOrder`] by default. Structural
/// changes (insertions, removals, rotations, recolorings and size updates) are
/// reported to an [`Observer`], [`NoopObserver`] by default, so a front-end can
/// mirror the tree's shape.
///
/// It is a logic error for a key to be modified in such a way that its ordering
/// relative to any other key changes while it is in the tree. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated
/// to the `OSRBTree` that observed it and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use osrb_tree::OSRBTree;
///
/// let mut scores = OSRBTree::new();
/// for score in [70, 85, 85, 92, 61] {
///     scores.insert(score);
/// }
///
/// assert_eq!(scores.len(), 5);
/// assert_eq!(scores.count(&85), 2);
///
/// // Median of five: the third smallest score.
/// assert_eq!(scores.select(3), Ok(&85));
///
/// // 92 beats four other scores.
/// assert_eq!(scores.rank(&92), Ok(5));
///
/// scores.remove(&85).unwrap();
/// let distinct: Vec<_> = scores.iter().collect();
/// assert_eq!(distinct, [(&61, 1), (&70, 1), (&85, 1), (&92, 1)]);
/// ```
#[derive(Clone)]
pub struct OSRBTree<K, C = NaturalOrder, O = NoopObserver> {
    raw: RawOSRBTree<K, C, O>,
}

/// An iterator over the distinct keys of an `OSRBTree` and their quantities.
///
/// This `struct` is created by the [`iter`] method on [`OSRBTree`]. It is
/// `Clone`, so a traversal can be restarted from any point.
///
/// # Examples
///
/// ```
/// use osrb_tree::OSRBTree;
///
/// let tree = OSRBTree::from([3, 1, 3, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some((&1, 1)));
/// assert_eq!(iter.next_back(), Some((&3, 2)));
/// assert_eq!(iter.next(), Some((&2, 1)));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OSRBTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K: 'a> {
    nodes: &'a Arena<Node<K>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An iterator yielding every copy of every key in ascending order.
///
/// This `struct` is created by the [`expanded`] method on [`OSRBTree`].
///
/// # Examples
///
/// ```
/// use osrb_tree::OSRBTree;
///
/// let tree = OSRBTree::from([2, 1, 2]);
/// let copies: Vec<_> = tree.expanded().copied().collect();
/// assert_eq!(copies, [1, 2, 2]);
/// ```
///
/// [`expanded`]: OSRBTree::expanded
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Expanded<'a, K: 'a> {
    inner: Iter<'a, K>,
    current: Option<(&'a K, usize)>,
    remaining: usize,
}

/// A breadth-first iterator over the nodes of an `OSRBTree`.
///
/// This `struct` is created by the [`level_order`] method on [`OSRBTree`].
///
/// # Examples
///
/// ```
/// use osrb_tree::OSRBTree;
///
/// let tree = OSRBTree::from([1, 2, 3]);
/// let keys: Vec<_> = tree.level_order().map(|node| *node.key()).collect();
/// assert_eq!(keys, [2, 1, 3]);
/// ```
///
/// [`level_order`]: OSRBTree::level_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct LevelOrder<'a, K: 'a> {
    nodes: &'a Arena<Node<K>>,
    queue: VecDeque<Handle>,
}

/// An owning iterator over the distinct keys of an `OSRBTree` and their
/// quantities, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`OSRBTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: OSRBTree#method.into_iter
pub struct IntoIter<K> {
    inner: alloc::vec::IntoIter<(K, usize)>,
}

impl<K> OSRBTree<K> {
    /// Makes a new, empty `OSRBTree` ordered by [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let mut tree = OSRBTree::new();
    /// tree.insert(1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        OSRBTree {
            raw: RawOSRBTree::new(NaturalOrder, NoopObserver),
        }
    }
}

impl<K, C> OSRBTree<K, C> {
    /// Makes a new, empty `OSRBTree` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let mut words = OSRBTree::with_comparator(|a: &&str, b: &&str| a.len() < b.len());
    /// words.extend(["pear", "fig", "plum"]);
    ///
    /// // "pear" and "plum" have the same length, so they share a node.
    /// assert_eq!(words.distinct_len(), 2);
    /// assert_eq!(words.count(&"kiwi"), 2);
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        OSRBTree {
            raw: RawOSRBTree::new(comparator, NoopObserver),
        }
    }
}

impl<K, O> OSRBTree<K, NaturalOrder, O> {
    /// Makes a new, empty `OSRBTree` ordered by [`Ord`] that reports changes to
    /// `observer`.
    ///
    /// See [`Observer`] for an example.
    #[must_use]
    pub const fn with_observer(observer: O) -> Self {
        OSRBTree {
            raw: RawOSRBTree::new(NaturalOrder, observer),
        }
    }
}

impl<K, C, O> OSRBTree<K, C, O> {
    /// Makes a new, empty `OSRBTree` with both collaborators injected.
    #[must_use]
    pub const fn with_comparator_and_observer(comparator: C, observer: O) -> Self {
        OSRBTree {
            raw: RawOSRBTree::new(comparator, observer),
        }
    }

    /// Returns the number of copies in the tree, duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([5, 3, 8, 3, 5]);
    /// assert_eq!(tree.len(), 5);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of distinct keys, i.e. nodes, in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([5, 3, 8, 3, 5]);
    /// assert_eq!(tree.distinct_len(), 3);
    /// ```
    #[must_use]
    pub const fn distinct_len(&self) -> usize {
        self.raw.distinct_len()
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.root().is_none()
    }

    /// Returns the number of nodes on the longest path from the root down to a
    /// leaf, or 0 for an empty tree.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the root node, or `None` if the tree is empty.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.view(self.raw.root())
    }

    /// Looks up a node by id. Returns `None` if the id is stale.
    ///
    /// `id` must come from this tree; see [`NodeId`] for what happens otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let mut tree = OSRBTree::new();
    /// let id = tree.insert("a");
    /// assert_eq!(tree.node(id).map(|n| *n.key()), Some("a"));
    ///
    /// tree.remove(&"a").unwrap();
    /// assert!(tree.node(id).is_none());
    /// ```
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K>> {
        self.raw.try_node(id.0).map(|_| NodeRef::new(self.raw.nodes(), id.0))
    }

    /// Returns the node holding the smallest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<NodeRef<'_, K>> {
        self.view(self.raw.first())
    }

    /// Returns the node holding the largest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<NodeRef<'_, K>> {
        self.view(self.raw.last())
    }

    /// Gets an iterator over the distinct keys and their quantities, in
    /// ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([5, 3, 8, 3, 5]);
    /// let pairs: Vec<_> = tree.iter().map(|(k, q)| (*k, q)).collect();
    /// assert_eq!(pairs, [(3, 2), (5, 2), (8, 1)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            nodes: self.raw.nodes(),
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.distinct_len(),
        }
    }

    /// Gets an iterator that yields each key once per copy, in ascending order.
    pub fn expanded(&self) -> Expanded<'_, K> {
        Expanded {
            inner: self.iter(),
            current: None,
            remaining: self.len(),
        }
    }

    /// Gets a breadth-first iterator over the nodes, starting at the root.
    pub fn level_order(&self) -> LevelOrder<'_, K> {
        LevelOrder {
            nodes: self.raw.nodes(),
            queue: self.raw.root().into_iter().collect(),
        }
    }

    /// Returns the comparator ordering this tree.
    #[must_use]
    pub fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the observer receiving this tree's change notifications.
    #[must_use]
    pub fn observer(&self) -> &O {
        self.raw.observer()
    }

    /// Returns the observer mutably, e.g. to drain events it has recorded.
    pub fn observer_mut(&mut self) -> &mut O {
        self.raw.observer_mut()
    }

    /// Consumes the tree, returning its observer.
    pub fn into_observer(self) -> O {
        self.raw.into_observer()
    }

    fn view(&self, handle: Option<Handle>) -> Option<NodeRef<'_, K>> {
        handle.map(|h| NodeRef::new(self.raw.nodes(), h))
    }
}

impl<K, C: Comparator<K>, O> OSRBTree<K, C, O> {
    /// Returns the node holding `key`, or `None` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([1, 2, 2]);
    /// assert_eq!(tree.search(&2).map(|n| n.quantity()), Some(2));
    /// assert!(tree.search(&3).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn search(&self, key: &K) -> Option<NodeRef<'_, K>> {
        self.view(self.raw.search(key))
    }

    /// Returns `true` if the tree holds at least one copy of `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.raw.search(key).is_some()
    }

    /// Returns how many copies of `key` the tree holds; 0 if it holds none.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([5, 3, 8, 3, 5]);
    /// assert_eq!(tree.count(&3), 2);
    /// assert_eq!(tree.count(&4), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.raw.count(key)
    }

    /// Returns the node with the smallest key greater than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([10, 20, 30]);
    /// assert_eq!(tree.lower_bound(&20).map(|n| *n.key()), Some(20));
    /// assert_eq!(tree.lower_bound(&21).map(|n| *n.key()), Some(30));
    /// assert!(tree.lower_bound(&31).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Option<NodeRef<'_, K>> {
        self.view(self.raw.lower_bound(key))
    }

    /// Returns the node with the smallest key strictly greater than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([10, 20, 30]);
    /// assert_eq!(tree.upper_bound(&20).map(|n| *n.key()), Some(30));
    /// assert_eq!(tree.upper_bound(&5).map(|n| *n.key()), Some(10));
    /// assert!(tree.upper_bound(&30).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn upper_bound(&self, key: &K) -> Option<NodeRef<'_, K>> {
        self.view(self.raw.upper_bound(key))
    }
}

impl<K, C: Comparator<K>, O: Observer<K>> OSRBTree<K, C, O> {
    /// Adds one copy of `key` to the tree and returns the id of the node that
    /// holds it.
    ///
    /// If an equal key is already present its quantity grows by one and the
    /// tree's shape does not change; `key` is dropped in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let mut tree = OSRBTree::new();
    /// let first = tree.insert(7);
    /// let second = tree.insert(7);
    ///
    /// assert_eq!(first, second);
    /// assert_eq!(tree.count(&7), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> NodeId {
        NodeId(self.raw.insert(key))
    }

    /// Removes one copy of `key` and returns how many copies remain.
    ///
    /// The node is unlinked only when its last copy goes.
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
    /// let mut tree = OSRBTree::from([4, 4]);
    /// assert_eq!(tree.remove(&4), Ok(1));
    /// assert_eq!(tree.remove(&4), Ok(0));
    /// assert_eq!(tree.remove(&4), Err(TreeError::NotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &K) -> Result<usize, TreeError> {
        let handle = self.raw.search(key).ok_or(TreeError::NotFound)?;
        Ok(self.raw.remove_one(handle))
    }

    /// Removes every copy of `key` and returns how many were removed.
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
    /// let mut tree = OSRBTree::from([4, 4, 9]);
    /// assert_eq!(tree.remove_all(&4), Ok(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn remove_all(&mut self, key: &K) -> Result<usize, TreeError> {
        let handle = self.raw.search(key).ok_or(TreeError::NotFound)?;
        let (_, removed) = self.raw.remove_all(handle);
        Ok(removed)
    }

    /// Removes one copy of the key held by node `id` and returns how many
    /// copies remain.
    ///
    /// It is a logic error to pass an id issued by another tree; see [`NodeId`].
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if `id` is stale.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_node(&mut self, id: NodeId) -> Result<usize, TreeError> {
        self.raw.try_node(id.0).ok_or(TreeError::NotFound)?;
        Ok(self.raw.remove_one(id.0))
    }

    /// Removes node `id` with all of its copies, returning the key and the
    /// number of copies removed.
    ///
    /// It is a logic error to pass an id issued by another tree; see [`NodeId`].
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if `id` is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let mut tree = OSRBTree::new();
    /// tree.insert('x');
    /// let id = tree.insert('x');
    ///
    /// assert_eq!(tree.remove_node_all(id), Ok(('x', 2)));
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove_node_all(&mut self, id: NodeId) -> Result<(K, usize), TreeError> {
        self.raw.try_node(id.0).ok_or(TreeError::NotFound)?;
        Ok(self.raw.remove_all(id.0))
    }

    /// Clears the tree, removing all keys.
    ///
    /// The observer receives [`Observer::on_remove`] for every node.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let mut tree = OSRBTree::from([1, 2]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: fmt::Debug, C, O> fmt::Debug for OSRBTree<K, C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, C: Default, O: Default> Default for OSRBTree<K, C, O> {
    /// Creates an empty `OSRBTree`.
    fn default() -> Self {
        OSRBTree::with_comparator_and_observer(C::default(), O::default())
    }
}

impl<K: PartialEq, C, O> PartialEq for OSRBTree<K, C, O> {
    /// Trees are equal when they hold the same keys with the same quantities,
    /// whatever their internal shape.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.distinct_len() == other.distinct_len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, C, O> Eq for OSRBTree<K, C, O> {}

impl<K, C, O> FromIterator<K> for OSRBTree<K, C, O>
where
    C: Comparator<K> + Default,
    O: Observer<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = OSRBTree::default();
        tree.extend(iter);
        tree
    }
}

impl<K, C: Comparator<K>, O: Observer<K>> Extend<K> for OSRBTree<K, C, O> {
    #[inline]
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: 'a + Copy, C: Comparator<K>, O: Observer<K>> Extend<&'a K> for OSRBTree<K, C, O> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for OSRBTree<K> {
    /// Converts a `[K; N]` into an `OSRBTree<K>`, keeping duplicates.
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from([1, 2, 2]);
    /// assert_eq!(tree.len(), 3);
    /// ```
    fn from(arr: [K; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, C, O> IntoIterator for OSRBTree<K, C, O> {
    type Item = (K, usize);
    type IntoIter = IntoIter<K>;

    /// Gets an owning iterator over the distinct keys and their quantities.
    ///
    /// ```
    /// use osrb_tree::OSRBTree;
    ///
    /// let tree = OSRBTree::from(["b", "a", "b"]);
    /// let pairs: Vec<_> = tree.into_iter().collect();
    /// assert_eq!(pairs, [("a", 1), ("b", 2)]);
    /// ```
    fn into_iter(self) -> IntoIter<K> {
        let mut order = Vec::with_capacity(self.distinct_len());
        let mut current = self.raw.first();
        while let Some(handle) = current {
            order.push(handle);
            current = raw_node::successor(self.raw.nodes(), handle);
        }
        trace!("into_iter: draining {} nodes", order.len());

        let mut nodes = self.raw.into_nodes();
        let pairs: Vec<(K, usize)> = order
            .into_iter()
            .map(|handle| {
                let node = nodes.take(handle);
                let quantity = node.quantity();
                (node.into_key(), quantity)
            })
            .collect();
        IntoIter {
            inner: pairs.into_iter(),
        }
    }
}

impl<'a, K, C, O> IntoIterator for &'a OSRBTree<K, C, O> {
    type Item = (&'a K, usize);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (&'a K, usize);

    fn next(&mut self) -> Option<(&'a K, usize)> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = raw_node::successor(self.nodes, handle);
        let node = self.nodes.get(handle);
        Some((node.key(), node.quantity()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<(&'a K, usize)> {
        self.next_back()
    }
}

impl<'a, K> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<(&'a K, usize)> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = raw_node::predecessor(self.nodes, handle);
        let node = self.nodes.get(handle);
        Some((node.key(), node.quantity()))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K> Iterator for Expanded<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        loop {
            if let Some((key, left)) = self.current.as_mut()
                && *left > 0
            {
                *left -= 1;
                self.remaining -= 1;
                return Some(*key);
            }
            self.current = Some(self.inner.next()?);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Expanded<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K> FusedIterator for Expanded<'_, K> {}

impl<K> Clone for Expanded<'_, K> {
    fn clone(&self) -> Self {
        Expanded {
            inner: self.inner.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Expanded<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K> Iterator for LevelOrder<'a, K> {
    type Item = NodeRef<'a, K>;

    fn next(&mut self) -> Option<NodeRef<'a, K>> {
        let handle = self.queue.pop_front()?;
        let node = self.nodes.get(handle);
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(NodeRef::new(self.nodes, handle))
    }
}

impl<K> FusedIterator for LevelOrder<'_, K> {}

impl<K> Clone for LevelOrder<'_, K> {
    fn clone(&self) -> Self {
        LevelOrder {
            nodes: self.nodes,
            queue: self.queue.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for LevelOrder<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = (K, usize);

    fn next(&mut self) -> Option<(K, usize)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    fn next_back(&mut self) -> Option<(K, usize)> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K> FusedIterator for IntoIter<K> {}

impl<K: fmt::Debug> fmt::Debug for IntoIter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
    }
}
