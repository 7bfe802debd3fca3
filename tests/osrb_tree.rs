use std::collections::{BTreeMap, HashMap, HashSet};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use osrb_tree::{Color, Direction, NaturalOrder, NodeId, Observer, OSRBTree, Rank, TreeError};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

/// Generates values in a range small enough to produce plenty of duplicates.
fn value_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Remove(i64),
    RemoveAll(i64),
    Count(i64),
    Rank(i64),
    Select(usize),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        6 => value_strategy().prop_map(TreeOp::Insert),
        3 => value_strategy().prop_map(TreeOp::Remove),
        1 => value_strategy().prop_map(TreeOp::RemoveAll),
        2 => value_strategy().prop_map(TreeOp::Count),
        2 => value_strategy().prop_map(TreeOp::Rank),
        2 => (0usize..3_000).prop_map(TreeOp::Select),
    ]
}

/// A multiset model: key to number of copies.
type Model = BTreeMap<i64, usize>;

fn model_len(model: &Model) -> usize {
    model.values().sum()
}

fn expand(model: &Model) -> Vec<i64> {
    model.iter().flat_map(|(&k, &q)| std::iter::repeat_n(k, q)).collect()
}

// ─── Core multiset operations ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both `OSRBTree` and a
    /// `BTreeMap` multiset and asserts identical results at every step.
    #[test]
    fn ops_match_btreemap_multiset(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut tree: OSRBTree<i64> = OSRBTree::new();
        let mut model = Model::new();

        for op in &ops {
            match op {
                TreeOp::Insert(k) => {
                    tree.insert(*k);
                    *model.entry(*k).or_default() += 1;
                }
                TreeOp::Remove(k) => {
                    let expected = match model.get_mut(k) {
                        None => Err(TreeError::NotFound),
                        Some(q) => {
                            *q -= 1;
                            let left = *q;
                            if left == 0 {
                                model.remove(k);
                            }
                            Ok(left)
                        }
                    };
                    prop_assert_eq!(tree.remove(k), expected, "remove({})", k);
                }
                TreeOp::RemoveAll(k) => {
                    let expected = model.remove(k).ok_or(TreeError::NotFound);
                    prop_assert_eq!(tree.remove_all(k), expected, "remove_all({})", k);
                }
                TreeOp::Count(k) => {
                    prop_assert_eq!(tree.count(k), model.get(k).copied().unwrap_or(0), "count({})", k);
                }
                TreeOp::Rank(k) => {
                    let expected = if model.contains_key(k) {
                        Ok(model.range(..*k).map(|(_, &q)| q).sum::<usize>() + 1)
                    } else {
                        Err(TreeError::NotFound)
                    };
                    prop_assert_eq!(tree.rank(k), expected, "rank({})", k);
                }
                TreeOp::Select(rank) => {
                    let len = model_len(&model);
                    let expected = if (1..=len).contains(rank) {
                        Ok(expand(&model)[rank - 1])
                    } else {
                        Err(TreeError::OutOfRange { rank: *rank, len })
                    };
                    prop_assert_eq!(tree.select(*rank).copied(), expected, "select({})", rank);
                }
            }
            prop_assert_eq!(tree.len(), model_len(&model));
            prop_assert_eq!(tree.distinct_len(), model.len());
        }

        let pairs: Vec<(i64, usize)> = tree.iter().map(|(k, q)| (*k, q)).collect();
        let expected: Vec<(i64, usize)> = model.into_iter().collect();
        prop_assert_eq!(pairs, expected);
    }

    /// The expanded traversal is the sorted input, duplicates included.
    #[test]
    fn expanded_is_sorted_input(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let tree: OSRBTree<i64> = values.iter().copied().collect();
        let mut sorted = values;
        sorted.sort_unstable();

        let expanded: Vec<i64> = tree.expanded().copied().collect();
        prop_assert_eq!(expanded, sorted);
    }

    /// `select` and `Index<Rank>` agree with the sorted input at every position.
    #[test]
    fn select_matches_sorted_vec(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let tree: OSRBTree<i64> = values.iter().copied().collect();
        let mut sorted = values;
        sorted.sort_unstable();

        for (i, expected) in sorted.iter().enumerate() {
            prop_assert_eq!(tree.select(i + 1), Ok(expected));
            prop_assert_eq!(&tree[Rank(i + 1)], expected);
        }
        prop_assert!(tree.select(0).is_err());
        prop_assert!(tree.select(sorted.len() + 1).is_err());
    }

    /// The rank of every stored key selects that key back, and each copy of
    /// it occupies the positions of `rank_range`.
    #[test]
    fn rank_select_roundtrip(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let tree: OSRBTree<i64> = values.iter().copied().collect();

        for (key, quantity) in &tree {
            let rank = tree.rank(key).unwrap();
            prop_assert_eq!(tree.select(rank), Ok(key));
            prop_assert_eq!(tree.rank_range(key), Ok(rank..rank + quantity));
            if rank > 1 {
                prop_assert!(tree.select(rank - 1).unwrap() < key);
            }
        }
    }

    /// `lower_bound` and `upper_bound` match the model's range queries.
    #[test]
    fn bounds_match_btreemap(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        targets in proptest::collection::vec(-1_100i64..1_100i64, 500),
    ) {
        let tree: OSRBTree<i64> = values.iter().copied().collect();
        let model: HashSet<i64> = values.into_iter().collect();
        let mut keys: Vec<i64> = model.into_iter().collect();
        keys.sort_unstable();

        for target in &targets {
            let lower = keys.iter().find(|&&k| k >= *target).copied();
            let upper = keys.iter().find(|&&k| k > *target).copied();
            prop_assert_eq!(tree.lower_bound(target).map(|n| *n.key()), lower, "lower_bound({})", target);
            prop_assert_eq!(tree.upper_bound(target).map(|n| *n.key()), upper, "upper_bound({})", target);
        }
    }

    /// Inserting the same multiset in different orders yields equal trees.
    #[test]
    fn insertion_order_does_not_matter(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let forward: OSRBTree<i64> = values.iter().copied().collect();
        let backward: OSRBTree<i64> = values.iter().rev().copied().collect();
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.len(), values.len());
    }

    /// Deleting every inserted copy leaves an empty tree that behaves like a
    /// fresh one.
    #[test]
    fn deleting_everything_empties_tree(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let mut tree: OSRBTree<i64> = values.iter().copied().collect();
        for v in values.iter().rev() {
            prop_assert!(tree.remove(v).is_ok(), "remove({})", v);
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.len(), 0);
        prop_assert!(tree.root().is_none());
        prop_assert_eq!(tree.select(1), Err(TreeError::OutOfRange { rank: 1, len: 0 }));

        tree.insert(42);
        prop_assert_eq!(tree.rank(&42), Ok(1));
    }

    /// Red-black shape stays logarithmic for any input.
    #[test]
    fn height_is_logarithmic(values in proptest::collection::vec(any::<i64>(), 1..TEST_SIZE)) {
        let tree: OSRBTree<i64> = values.into_iter().collect();
        let n = tree.distinct_len();
        let bound = 2 * (usize::BITS - (n + 1).leading_zeros()) as usize;
        prop_assert!(tree.height() <= bound, "height {} for {} nodes", tree.height(), n);
    }
}

// ─── Node navigation ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Walking `next` from the first node visits keys in ascending order, and
    /// every node's size is its own quantity plus its children's sizes.
    #[test]
    fn node_views_are_consistent(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let tree: OSRBTree<i64> = values.into_iter().collect();

        let mut walked = Vec::new();
        let mut current = tree.first();
        while let Some(node) = current {
            let children = node.left().map_or(0, |n| n.subtree_size()) + node.right().map_or(0, |n| n.subtree_size());
            prop_assert_eq!(node.subtree_size(), children + node.quantity());
            prop_assert_eq!(tree.node(node.id()), Some(node));
            prop_assert_eq!(node.rank(), tree.rank(node.key()).unwrap());
            if node.color() == Color::Red {
                prop_assert!(node.parent().is_some_and(|p| p.color() == Color::Black));
            }
            walked.push(*node.key());
            current = node.next();
        }

        let expected: Vec<i64> = tree.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(&walked, &expected);
        prop_assert_eq!(tree.last().map(|n| *n.key()), expected.last().copied());
        prop_assert_eq!(tree.root().map(|n| n.subtree_size()), Some(tree.len()));
    }
}

// ─── Observer ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Insert(NodeId, i64, Option<(NodeId, Direction)>),
    Remove(NodeId),
    Color(NodeId, Color),
    Rotate(NodeId, NodeId, Direction),
    Transplant(NodeId, Option<NodeId>),
    Reparent(NodeId, NodeId, Direction),
    Size(NodeId, usize),
    Quantity(NodeId, usize),
}

#[derive(Debug, Default)]
struct Recorder(Vec<Event>);

type Recorded = OSRBTree<i64, NaturalOrder, Recorder>;

impl Observer<i64> for Recorder {
    fn on_insert(&mut self, node: NodeId, key: &i64, parent: Option<(NodeId, Direction)>) {
        self.0.push(Event::Insert(node, *key, parent));
    }

    fn on_remove(&mut self, node: NodeId) {
        self.0.push(Event::Remove(node));
    }

    fn on_color_change(&mut self, node: NodeId, color: Color) {
        self.0.push(Event::Color(node, color));
    }

    fn on_rotate(&mut self, pivot: NodeId, child: NodeId, direction: Direction) {
        self.0.push(Event::Rotate(pivot, child, direction));
    }

    fn on_transplant(&mut self, old: NodeId, replacement: Option<NodeId>) {
        self.0.push(Event::Transplant(old, replacement));
    }

    fn on_reparent(&mut self, child: NodeId, parent: NodeId, side: Direction) {
        self.0.push(Event::Reparent(child, parent, side));
    }

    fn on_size_change(&mut self, node: NodeId, subtree_size: usize) {
        self.0.push(Event::Size(node, subtree_size));
    }

    fn on_quantity_change(&mut self, node: NodeId, quantity: usize) {
        self.0.push(Event::Quantity(node, quantity));
    }
}

/// What a front-end knows about one node after replaying events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MirrorNode {
    key: i64,
    color: Color,
    quantity: usize,
    subtree_size: usize,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// A tree rebuilt purely from observer events.
#[derive(Debug, Default, PartialEq, Eq)]
struct Mirror {
    root: Option<NodeId>,
    nodes: HashMap<NodeId, MirrorNode>,
}

impl Mirror {
    fn node(&mut self, id: NodeId) -> &mut MirrorNode {
        self.nodes.get_mut(&id).unwrap_or_else(|| panic!("{id:?} is not live"))
    }

    fn child(&mut self, id: NodeId, side: Direction) -> Option<NodeId> {
        let node = self.node(id);
        match side {
            Direction::Left => node.left,
            Direction::Right => node.right,
        }
    }

    fn set_child(&mut self, id: NodeId, side: Direction, child: Option<NodeId>) {
        let node = self.node(id);
        match side {
            Direction::Left => node.left = child,
            Direction::Right => node.right = child,
        }
    }

    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = self.node(p);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    assert_eq!(node.right, Some(old), "{old:?} is not a child of {p:?}");
                    node.right = new;
                }
            }
        }
    }

    fn apply(&mut self, event: &Event) {
        match *event {
            Event::Insert(id, key, parent) => {
                let fresh = MirrorNode {
                    key,
                    color: Color::Red,
                    quantity: 1,
                    subtree_size: 1,
                    parent: parent.map(|(p, _)| p),
                    left: None,
                    right: None,
                };
                assert!(self.nodes.insert(id, fresh).is_none(), "{id:?} inserted twice");
                match parent {
                    None => self.root = Some(id),
                    Some((p, side)) => self.set_child(p, side, Some(id)),
                }
            }
            Event::Remove(id) => {
                assert!(self.nodes.remove(&id).is_some(), "{id:?} removed while absent");
                if self.root == Some(id) {
                    self.root = None;
                }
            }
            Event::Color(id, color) => self.node(id).color = color,
            Event::Size(id, size) => self.node(id).subtree_size = size,
            Event::Quantity(id, q) => self.node(id).quantity = q,
            Event::Rotate(pivot, child, direction) => {
                let inner = self.child(child, direction);
                self.set_child(pivot, direction.opposite(), inner);
                if let Some(inner) = inner {
                    self.node(inner).parent = Some(pivot);
                }
                let parent = self.node(pivot).parent;
                self.node(child).parent = parent;
                self.replace_child(parent, pivot, Some(child));
                self.set_child(child, direction, Some(pivot));
                self.node(pivot).parent = Some(child);
            }
            Event::Transplant(old, replacement) => {
                let parent = self.node(old).parent;
                self.replace_child(parent, old, replacement);
                if let Some(r) = replacement {
                    self.node(r).parent = parent;
                }
            }
            Event::Reparent(child, parent, side) => {
                self.set_child(parent, side, Some(child));
                self.node(child).parent = Some(parent);
            }
        }
    }

    fn replay(&mut self, events: &[Event]) {
        for event in events {
            self.apply(event);
        }
    }
}

fn snapshot(tree: &Recorded) -> Mirror {
    let nodes = tree
        .level_order()
        .map(|node| {
            let state = MirrorNode {
                key: *node.key(),
                color: node.color(),
                quantity: node.quantity(),
                subtree_size: node.subtree_size(),
                parent: node.parent().map(|n| n.id()),
                left: node.left().map(|n| n.id()),
                right: node.right().map(|n| n.id()),
            };
            (node.id(), state)
        })
        .collect();
    Mirror {
        root: tree.root().map(|n| n.id()),
        nodes,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replaying the event stream reproduces the root and every live node's
    /// key, color, quantity, subtree size and links.
    #[test]
    fn observer_events_mirror_tree(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE / 5)) {
        let mut tree: Recorded = OSRBTree::with_observer(Recorder::default());
        let mut mirror = Mirror::default();

        for op in &ops {
            match op {
                TreeOp::Insert(k) => {
                    tree.insert(*k);
                }
                TreeOp::Remove(k) => {
                    let _ = tree.remove(k);
                }
                TreeOp::RemoveAll(k) => {
                    let _ = tree.remove_all(k);
                }
                TreeOp::Count(_) | TreeOp::Rank(_) | TreeOp::Select(_) => {}
            }
            let events = std::mem::take(&mut tree.observer_mut().0);
            mirror.replay(&events);
            prop_assert_eq!(&mirror, &snapshot(&tree), "after {:?}", op);
        }
    }
}

#[test]
fn successor_splice_reports_adopted_children() {
    let mut tree: Recorded = OSRBTree::with_observer(Recorder::default());
    let ids: HashMap<i64, NodeId> = [50, 30, 70, 20, 40, 60, 80].into_iter().map(|k| (k, tree.insert(k))).collect();
    let mut mirror = Mirror::default();
    mirror.replay(&std::mem::take(&mut tree.observer_mut().0));

    // 60 is two levels below 50, so it takes over both of 50's children.
    tree.remove(&50).unwrap();
    let events = std::mem::take(&mut tree.observer_mut().0);
    assert!(events.contains(&Event::Reparent(ids[&70], ids[&60], Direction::Right)));
    assert!(events.contains(&Event::Reparent(ids[&30], ids[&60], Direction::Left)));

    mirror.replay(&events);
    assert_eq!(mirror, snapshot(&tree));
    assert_eq!(mirror.root, Some(ids[&60]));
    assert_eq!(mirror.nodes[&ids[&60]].left, Some(ids[&30]));
    assert_eq!(mirror.nodes[&ids[&60]].right, Some(ids[&70]));
}

#[test]
fn insert_reports_the_side_it_hangs_on() {
    let mut tree: Recorded = OSRBTree::with_observer(Recorder::default());
    let root = tree.insert(10);
    let left = tree.insert(5);
    let right = tree.insert(15);

    let inserts: Vec<&Event> = tree
        .observer()
        .0
        .iter()
        .filter(|e| matches!(e, Event::Insert(..)))
        .collect();
    assert_eq!(
        inserts,
        vec![
            &Event::Insert(root, 10, None),
            &Event::Insert(left, 5, Some((root, Direction::Left))),
            &Event::Insert(right, 15, Some((root, Direction::Right))),
        ]
    );
}

#[test]
fn first_insert_reports_a_black_root() {
    let mut tree: Recorded = OSRBTree::with_observer(Recorder::default());
    let id = tree.insert(10);
    assert_eq!(tree.observer().0, vec![Event::Insert(id, 10, None), Event::Color(id, Color::Black)]);
}

#[test]
fn duplicate_insert_reports_quantity_not_shape() {
    let mut tree: Recorded = OSRBTree::with_observer(Recorder::default());
    let root = tree.insert(10);
    tree.observer_mut().0.clear();

    assert_eq!(tree.insert(10), root);
    assert_eq!(tree.observer().0, vec![Event::Size(root, 2), Event::Quantity(root, 2)]);
}

#[test]
fn ascending_triple_rotates_once() {
    let mut tree: Recorded = OSRBTree::with_observer(Recorder::default());
    let a = tree.insert(1);
    let b = tree.insert(2);
    tree.insert(3);

    let rotations: Vec<&Event> = tree
        .observer()
        .0
        .iter()
        .filter(|e| matches!(e, Event::Rotate(..)))
        .collect();
    assert_eq!(rotations, vec![&Event::Rotate(a, b, Direction::Left)]);
    assert_eq!(tree.root().map(|n| n.id()), Some(b));
}

#[test]
fn clear_reports_every_node() {
    let mut tree: Recorded = OSRBTree::with_observer(Recorder::default());
    let ids: HashSet<NodeId> = (0..50).map(|k| tree.insert(k % 20)).collect();
    tree.observer_mut().0.clear();

    tree.clear();
    let removed: HashSet<NodeId> = tree
        .into_observer()
        .0
        .into_iter()
        .map(|e| match e {
            Event::Remove(id) => id,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(removed, ids);
}

#[test]
fn borrowed_observer_outlives_tree() {
    let mut recorder = Recorder::default();
    {
        let mut tree: OSRBTree<i64, NaturalOrder, &mut Recorder> = OSRBTree::with_observer(&mut recorder);
        tree.extend([3, 1, 2]);
        tree.remove(&1).unwrap();
    }

    assert!(matches!(recorder.0.first(), Some(Event::Insert(_, 3, None))));
    assert_eq!(recorder.0.iter().filter(|e| matches!(e, Event::Remove(_))).count(), 1);
}

// ─── Worked examples ─────────────────────────────────────────────────────────

#[test]
fn duplicates_example() {
    let tree = OSRBTree::from([5, 3, 8, 3, 5]);

    assert_eq!(tree.len(), 5);
    assert_eq!(tree.distinct_len(), 3);
    assert_eq!(tree.count(&3), 2);
    assert_eq!(tree.count(&4), 0);
    assert_eq!(tree.rank(&8), Ok(5));
    assert_eq!(tree.select(2), Ok(&3));
    assert_eq!(tree.select(3), Ok(&5));
    assert_eq!(format!("{tree:?}"), "{3: 2, 5: 2, 8: 1}");
}

#[test]
fn removing_a_duplicate_then_the_key() {
    let mut tree = OSRBTree::from([5, 3, 8, 3, 5]);

    assert_eq!(tree.remove(&5), Ok(1));
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.remove(&5), Ok(0));
    assert!(!tree.contains(&5));
    assert_eq!(tree.remove(&5), Err(TreeError::NotFound));
    assert_eq!(tree.rank(&8), Ok(3));
}

#[test]
fn custom_comparator_orders_descending() {
    let mut tree = OSRBTree::with_comparator(|a: &i64, b: &i64| a > b);
    tree.extend([1, 5, 3, 5]);

    let expanded: Vec<i64> = tree.expanded().copied().collect();
    assert_eq!(expanded, vec![5, 5, 3, 1]);
    assert_eq!(tree.rank(&3), Ok(3));
    assert_eq!(tree.lower_bound(&4).map(|n| *n.key()), Some(3));
}

#[test]
fn node_ids_stay_stable_across_rebalancing() {
    let mut tree = OSRBTree::new();
    let ids: Vec<(NodeId, i64)> = (0..200).map(|k| (tree.insert(k), k)).collect();
    for k in (0..200).step_by(3) {
        tree.remove(&k).unwrap();
    }

    for (id, key) in ids {
        match tree.node(id) {
            Some(node) => assert_eq!(*node.key(), key),
            None => assert_eq!(key % 3, 0, "node {key} vanished"),
        }
    }
}

#[test]
fn owned_iteration_yields_keys_and_quantities() {
    let tree: OSRBTree<String> = ["pear", "fig", "pear"].into_iter().map(String::from).collect();
    let pairs: Vec<(String, usize)> = tree.into_iter().collect();
    assert_eq!(pairs, vec![("fig".to_string(), 1), ("pear".to_string(), 2)]);
}
