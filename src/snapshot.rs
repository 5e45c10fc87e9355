//! Owned copies of a tree's shape, for replaying insertion steps later.

use alloc::vec::Vec;

use crate::color::Color;
use crate::observer::{Change, Observer};
use crate::view::{NodeRef, TreeView};

/// One node of a [`Snapshot`].
///
/// Links are indices into [`Snapshot::nodes`]; `None` stands for the sentinel.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SnapshotNode<T> {
    pub value: T,
    pub color: Color,
    /// Distance from the root, which has depth `0`.
    pub depth: usize,
    pub parent: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

/// A deep copy of a tree's values, colors and links at one instant.
///
/// Nodes are stored in pre-order (node, left subtree, right subtree), so the
/// root, when present, is always at index `0`.
///
/// # Examples
///
/// ```
/// use rbtree_frames::{Color, RBTree};
///
/// let tree = RBTree::from([2, 1, 3]);
/// let snapshot = tree.snapshot();
///
/// let root = snapshot.root().unwrap();
/// assert_eq!((root.value, root.color), (2, Color::Black));
/// assert_eq!(snapshot.in_order_values(), [&1, &2, &3]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Snapshot<T> {
    nodes: Vec<SnapshotNode<T>>,
}

impl<T: Clone> Snapshot<T> {
    pub(crate) fn capture(tree: TreeView<'_, T>) -> Self {
        let mut nodes = Vec::with_capacity(tree.len());
        copy_subtree(tree.root(), 0, None, &mut nodes);
        Self { nodes }
    }
}

/// Copies the subtree at `node` in pre-order and returns its index.
fn copy_subtree<T: Clone>(
    node: NodeRef<'_, T>,
    depth: usize,
    parent: Option<usize>,
    out: &mut Vec<SnapshotNode<T>>,
) -> Option<usize> {
    let value = node.value()?;

    let index = out.len();
    out.push(SnapshotNode {
        value: value.clone(),
        color: node.color(),
        depth,
        parent,
        left: None,
        right: None,
    });

    let left = copy_subtree(node.left(), depth + 1, Some(index), out);
    let right = copy_subtree(node.right(), depth + 1, Some(index), out);
    out[index].left = left;
    out[index].right = right;

    Some(index)
}

impl<T> Snapshot<T> {
    /// Returns every node in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[SnapshotNode<T>] {
        &self.nodes
    }

    /// Returns the root, or `None` if the tree was empty.
    #[must_use]
    pub fn root(&self) -> Option<&SnapshotNode<T>> {
        self.nodes.first()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SnapshotNode<T>> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the depth of the deepest node, `0` for an empty snapshot.
    #[must_use]
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Returns the values in sorted (in-order) order.
    #[must_use]
    pub fn in_order_values(&self) -> Vec<&T> {
        let mut values = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = (!self.nodes.is_empty()).then_some(0);

        loop {
            while let Some(index) = current {
                stack.push(index);
                current = self.nodes[index].left;
            }
            let Some(index) = stack.pop() else {
                break;
            };
            values.push(&self.nodes[index].value);
            current = self.nodes[index].right;
        }

        values
    }
}

/// One recorded insertion step: what changed, and the tree right after.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Frame<T> {
    pub change: Change,
    pub snapshot: Snapshot<T>,
}

/// An [`Observer`] that snapshots the tree on every change.
///
/// # Examples
///
/// ```
/// use rbtree_frames::{Change, RBTree, Recorder};
///
/// let mut tree = RBTree::new();
/// let mut recorder = Recorder::new();
/// tree.insert_with(1, &mut recorder);
/// tree.insert_with(2, &mut recorder);
///
/// let frames = recorder.into_frames();
/// assert_eq!(frames.len(), 4);
/// assert_eq!(frames[2].snapshot.len(), 2);
/// assert!(matches!(frames[3].change, Change::Finished { .. }));
/// ```
#[derive(Clone, Debug)]
pub struct Recorder<T> {
    frames: Vec<Frame<T>>,
}

impl<T> Recorder<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Returns the frames recorded so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame<T>] {
        &self.frames
    }

    #[must_use]
    pub fn into_frames(self) -> Vec<Frame<T>> {
        self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Forgets every recorded frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Observer<T> for Recorder<T> {
    fn on_change(&mut self, change: Change, tree: TreeView<'_, T>) {
        self.frames.push(Frame {
            change,
            snapshot: tree.snapshot(),
        });
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::RBTree;
    use alloc::vec;

    #[test]
    fn empty_snapshot() {
        let tree: RBTree<u8> = RBTree::new();
        let snapshot = tree.snapshot();
        assert!(snapshot.is_empty());
        assert!(snapshot.root().is_none());
        assert_eq!(snapshot.height(), 0);
        assert!(snapshot.in_order_values().is_empty());
    }

    #[test]
    fn pre_order_layout() {
        let tree = RBTree::from([10, 20, 17, 89, 1]);
        let snapshot = tree.snapshot();

        let values: Vec<i32> = snapshot.nodes().iter().map(|node| node.value).collect();
        assert_eq!(values, vec![17, 10, 1, 20, 89]);

        let depths: Vec<usize> = snapshot.nodes().iter().map(|node| node.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 2]);

        let root = snapshot.root().unwrap();
        assert_eq!(root.parent, None);
        assert_eq!(root.left, Some(1));
        assert_eq!(root.right, Some(3));
        assert_eq!(snapshot.get(2).unwrap().parent, Some(1));
        assert_eq!(snapshot.get(2).unwrap().color, Color::Red);
        assert_eq!(snapshot.height(), 2);
    }

    #[test]
    fn snapshot_is_detached_from_later_inserts() {
        let mut tree = RBTree::from([1, 2]);
        let before = tree.snapshot();
        tree.insert(3);
        assert_eq!(before.len(), 2);
        assert_eq!(before.root().unwrap().value, 1);
        assert_eq!(tree.snapshot().root().unwrap().value, 2);
    }

    #[test]
    fn recorder_clear() {
        let mut tree = RBTree::new();
        let mut recorder = Recorder::default();
        tree.insert_with('a', &mut recorder);
        assert_eq!(recorder.len(), 2);
        recorder.clear();
        assert!(recorder.is_empty());
        assert!(recorder.frames().is_empty());
    }
}
