//! An order-statistic red-black tree for Rust.
//!
//! This crate provides [`OSRBTree`], an ordered multiset. Equal keys share one
//! node that counts its copies, and every node tracks how many copies live in
//! its subtree. That augmentation gives O(log n) order-statistic queries on top
//! of the usual insert, remove and search:
//!
//! - [`rank`](OSRBTree::rank) - The 1-based sorted position of a key
//! - [`select`](OSRBTree::select) - The key at a 1-based sorted position
//! - [`lower_bound`](OSRBTree::lower_bound) and
//!   [`upper_bound`](OSRBTree::upper_bound) - The nearest keys at or above a target
//! - Indexing by [`Rank`] - e.g., `tree[Rank(1)]` for the smallest key
//!
//! # Example
//!
//! ```
//! use osrb_tree::{OSRBTree, Rank, TreeError};
//!
//! let mut latencies = OSRBTree::new();
//! latencies.extend([12, 7, 30, 7, 18, 12, 12]);
//!
//! assert_eq!(latencies.len(), 7);
//! assert_eq!(latencies.distinct_len(), 4);
//!
//! // The median of seven samples sits at rank 4.
//! assert_eq!(latencies.select(4), Ok(&12));
//! assert_eq!(latencies[Rank(7)], 30);
//!
//! // Two samples are faster than 12ms.
//! assert_eq!(latencies.rank(&12), Ok(3));
//!
//! latencies.remove(&30).unwrap();
//! assert_eq!(latencies.remove(&30), Err(TreeError::NotFound));
//! ```
//!
//! # Observing the tree
//!
//! Every structural change is reported to an [`Observer`]. A visualizer can
//! mirror colors, rotations and subtree sizes step by step without polling the
//! tree. The default [`NoopObserver`] compiles away.
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Pluggable ordering** - Any `Fn(&K, &K) -> bool` works as a [`Comparator`]
//! - **Stable node ids** - A [`NodeId`] names the same key until its last copy goes
//!
//! # Implementation
//!
//! Nodes live in a contiguous arena and link to each other by 32-bit handles.
//! Rebalancing follows the classic red-black insert and delete fix-ups, with
//! subtree sizes maintained through every rotation and splice.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod comparator;
mod error;
mod node;
mod observer;
mod order_statistic;
mod raw;

pub mod osrb_tree;

pub use comparator::{Comparator, NaturalOrder};
pub use error::TreeError;
pub use node::{Color, Direction, NodeId, NodeRef};
pub use observer::{NoopObserver, Observer};
pub use order_statistic::Rank;
pub use osrb_tree::OSRBTree;
