//! An arena-backed red-black tree whose insertions can be watched step by step.
//!
//! This crate provides [`RBTree`], an ordered multiset kept balanced by the
//! classic red-black insertion fixup: after a new red leaf is attached, a
//! bounded sequence of recolorings and rotations restores the coloring rules
//! and keeps the height within `2 * log2(n + 1)`.
//!
//! Every one of those steps can be observed. [`RBTree::insert_with`] calls an
//! [`Observer`] after each atomic change with a read-only [`TreeView`], and
//! [`RBTree::insert_recorded`] returns the whole sequence as owned
//! [`Snapshot`]s, ready to be replayed by a visualizer.
//!
//! # Example
//!
//! ```
//! use rbtree_frames::{Change, Color, RBTree};
//!
//! let mut tree = RBTree::new();
//! tree.insert(10);
//! tree.insert(20);
//!
//! // 17 is an inner grandchild of 10: two rotations bring it to the top.
//! let frames = tree.insert_recorded(17);
//! let rotations = frames
//!     .iter()
//!     .filter(|frame| matches!(frame.change, Change::RotationFinished { .. }))
//!     .count();
//! assert_eq!(rotations, 2);
//!
//! let root = tree.root();
//! assert_eq!(root.value(), Some(&17));
//! assert_eq!(root.color(), Color::Black);
//! assert_eq!(root.left().color(), Color::Red);
//! assert_eq!(root.right().color(), Color::Red);
//! assert!(tree.check_invariants().is_ok());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Sentinel node** - Absent links point at a shared black sentinel, so the
//!   fixup never special-cases missing children
//! - **Arena storage** - Nodes live in one vector and link to each other by index
//! - **`tracing`** (optional) - Emits structured events for every fixup case and
//!   rotation
//!
//! # Implementation
//!
//! Node slot zero is the sentinel. Nodes are never removed, so a [`NodeId`]
//! stays valid for the lifetime of the tree (or until [`RBTree::clear`]).

#![no_std]
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

mod color;
mod raw;
mod validate;
mod view;

pub mod observer;
pub mod rbtree;
pub mod snapshot;

pub use color::{Color, Direction};
pub use observer::{Change, Observer};
pub use rbtree::RBTree;
pub use snapshot::{Frame, Recorder, Snapshot, SnapshotNode};
pub use validate::InvariantViolation;
pub use view::{NodeId, NodeRef, TreeView};
