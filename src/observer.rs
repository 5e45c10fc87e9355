//! Step-by-step notifications emitted while a value is inserted.
//!
//! Every atomic structural or color mutation performed by
//! [`RBTree::insert_with`](crate::RBTree::insert_with) is followed by exactly
//! one call to [`Observer::on_change`], made synchronously on the inserting
//! thread. The observer receives a read-only [`TreeView`] of the tree as it is
//! at that instant; the tree is mutated in place afterwards, so an observer that
//! wants to keep a step must copy it out (see [`Recorder`](crate::Recorder)).
//!
//! For a single insertion the sequence is always:
//!
//! 1. [`Change::Attached`] once,
//! 2. zero or more fixup steps, each one of
//!    - [`Change::ColorFlipped`] (red uncle),
//!    - [`Change::RotationStarted`] + [`Change::RotationFinished`] (inner grandchild),
//!    - [`Change::Recolored`] + [`Change::RotationStarted`] + [`Change::RotationFinished`]
//!      (outer grandchild, ends the fixup),
//! 3. [`Change::Finished`] once.
//!
//! # Examples
//!
//! ```
//! use rbtree_frames::{observer, Change, RBTree};
//!
//! let mut tree = RBTree::new();
//! tree.insert(10);
//! tree.insert(20);
//!
//! let mut steps = Vec::new();
//! tree.insert_with(17, &mut observer::from_fn(|change, _tree| steps.push(change)));
//!
//! assert_eq!(steps.len(), 7);
//! assert!(matches!(steps.first(), Some(Change::Attached { .. })));
//! assert!(matches!(steps.last(), Some(Change::Finished { .. })));
//! ```

use crate::color::Direction;
use crate::view::{NodeId, TreeView};

/// What an insertion step just did to the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Change {
    /// A new red leaf was linked into the tree, before any rebalancing.
    Attached { node: NodeId },
    /// The parent and uncle were recolored black and `grandparent` red; the
    /// violation moved up to `grandparent`.
    ColorFlipped { grandparent: NodeId },
    /// `parent` was recolored black and `grandparent` red, right before the
    /// rotation at `grandparent` that ends the fixup.
    Recolored { parent: NodeId, grandparent: NodeId },
    /// A rotation around `pivot` is about to happen. The view still shows the
    /// tree as it was before.
    RotationStarted { pivot: NodeId, direction: Direction },
    /// The rotation around `pivot` completed; `pivot` is now a child of the node
    /// it was exchanged with.
    RotationFinished { pivot: NodeId, direction: Direction },
    /// The insertion is complete and `root` has been colored black.
    Finished { root: NodeId },
}

/// Receives every [`Change`] made during an insertion.
pub trait Observer<T> {
    /// Called right after `change` was applied to `tree`.
    fn on_change(&mut self, change: Change, tree: TreeView<'_, T>);
}

/// An observer that ignores every notification.
///
/// This is what [`RBTree::insert`](crate::RBTree::insert) uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unobserved;

impl<T> Observer<T> for Unobserved {
    #[inline]
    fn on_change(&mut self, _change: Change, _tree: TreeView<'_, T>) {}
}

/// An observer backed by a closure. Created by [`from_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FnObserver<F>(F);

/// Wraps a closure so it can be passed where an [`Observer`] is expected.
///
/// # Examples
///
/// ```
/// use rbtree_frames::{observer, RBTree};
///
/// let mut frames = 0;
/// let mut tree = RBTree::new();
/// tree.insert_with(5, &mut observer::from_fn(|_, _| frames += 1));
///
/// // One for attaching the leaf, one for the finished insert.
/// assert_eq!(frames, 2);
/// ```
pub fn from_fn<T, F>(f: F) -> FnObserver<F>
where
    F: FnMut(Change, TreeView<'_, T>),
{
    FnObserver(f)
}

impl<T, F> Observer<T> for FnObserver<F>
where
    F: FnMut(Change, TreeView<'_, T>),
{
    #[inline]
    fn on_change(&mut self, change: Change, tree: TreeView<'_, T>) {
        (self.0)(change, tree);
    }
}
