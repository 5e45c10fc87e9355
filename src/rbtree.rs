use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::observer::{Observer, Unobserved};
use crate::raw::{Handle, RawRBTree};
use crate::snapshot::{Frame, Recorder, Snapshot};
use crate::validate::InvariantViolation;
use crate::view::{NodeId, NodeRef, TreeView};

/// An ordered multiset based on a red-black tree.
///
/// Values are kept in a binary search tree whose nodes are colored red or
/// black; after every insertion a bounded number of recolorings and rotations
/// restores the coloring rules, which keeps the height below
/// `2 * log2(n + 1)`.
///
/// Equal values are all kept: a value equal to one already present is placed in
/// that value's right subtree, so iteration yields duplicates in insertion
/// order. There is no removal.
///
/// Each insertion can be watched step by step through an
/// [`Observer`](crate::Observer), see [`insert_with`](RBTree::insert_with) and
/// [`insert_recorded`](RBTree::insert_recorded).
///
/// It is a logic error for a value to be modified in such a way that its
/// ordering relative to any other value, as determined by the [`Ord`] trait,
/// changes while it is in the tree.
///
/// # Examples
///
/// ```
/// use rbtree_frames::{Color, RBTree};
///
/// let mut tree = RBTree::new();
/// for value in [10, 20, 17, 89, 1] {
///     tree.insert(value);
/// }
///
/// let root = tree.root();
/// assert_eq!(root.value(), Some(&17));
/// assert_eq!(root.color(), Color::Black);
/// assert_eq!(root.left().left().value(), Some(&1));
/// assert_eq!(root.left().left().color(), Color::Red);
///
/// assert!(tree.iter().eq([1, 10, 17, 20, 89].iter()));
/// ```
pub struct RBTree<T> {
    raw: RawRBTree<T>,
}

/// An in-order iterator over the values of an `RBTree`.
///
/// This `struct` is created by the [`iter`] method on [`RBTree`]. See its
/// documentation for more.
///
/// [`iter`]: RBTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: &'a RawRBTree<T>,
    /// Ancestors whose value and right subtree are still to come.
    stack: SmallVec<[Handle; 32]>,
    remaining: usize,
}

impl<T> RBTree<T> {
    /// Makes a new, empty `RBTree`.
    ///
    /// Allocates room for the sentinel only.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let mut tree = RBTree::new();
    /// tree.insert(1);
    /// ```
    #[must_use]
    pub fn new() -> RBTree<T> {
        RBTree { raw: RawRBTree::new() }
    }

    /// Makes a new, empty `RBTree` with room for at least `capacity` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree: RBTree<u32> = RBTree::with_capacity(64);
    /// assert!(tree.capacity() >= 64);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> RBTree<T> {
        RBTree {
            raw: RawRBTree::with_capacity(capacity),
        }
    }

    /// Returns how many values the tree can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of values in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree = RBTree::from([3, 3, 1]);
    /// assert_eq!(tree.len(), 3);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every value. Node ids handed out earlier become invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let mut tree = RBTree::from([1, 2]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert!(tree.root().is_nil());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a read-only view of the tree, the same kind of view an
    /// observer receives.
    #[must_use]
    pub fn view(&self) -> TreeView<'_, T> {
        TreeView::new(&self.raw)
    }

    /// Returns the root node, or the sentinel if the tree is empty.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_, T> {
        self.view().root()
    }

    /// Returns the sentinel node that stands in for every absent link.
    ///
    /// The sentinel is always black, has no value, and its links all point
    /// back to itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::{Color, RBTree};
    ///
    /// let tree = RBTree::from([5]);
    /// let nil = tree.nil();
    /// assert_eq!(tree.root().left(), nil);
    /// assert_eq!(nil.value(), None);
    /// assert_eq!(nil.color(), Color::Black);
    /// ```
    #[must_use]
    pub fn nil(&self) -> NodeRef<'_, T> {
        self.view().nil()
    }

    /// Returns the node named by `id`, if it belongs to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.view().node(id)
    }

    /// Returns the number of edges on the longest root-to-leaf path, `0` for
    /// an empty or single-node tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree: RBTree<_> = (1..=7).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the smallest value, or `None` if the tree is empty.
    ///
    /// Among equal smallest values the first inserted one is returned.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.node(self.raw.first()).value()
    }

    /// Returns the largest value, or `None` if the tree is empty.
    ///
    /// Among equal largest values the last inserted one is returned.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.node(self.raw.last()).value()
    }

    /// Gets an iterator that visits the values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree = RBTree::from([3, 1, 2, 1]);
    /// let values: Vec<_> = tree.iter().copied().collect();
    /// assert_eq!(values, [1, 1, 2, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; amortized O(1) per step.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw)
    }

    /// Calls `visit` on every node of the subtree at `start`, left subtree
    /// first, then the node, then the right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree = RBTree::from([10, 20, 17, 89, 1]);
    /// let mut lines = Vec::new();
    /// tree.in_order_traversal(tree.root(), |node| lines.push(node.to_string()));
    /// assert_eq!(lines[0], "1 (Red) | P:10 L:nil R:nil");
    /// assert_eq!(lines[2], "17 (Black) | P:nil L:10 R:20");
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `start` belongs to another tree.
    pub fn in_order_traversal<'a, F>(&'a self, start: NodeRef<'_, T>, visit: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.view().in_order_traversal(start, visit);
    }

    /// Calls `visit` on every node of the subtree at `start` breadth-first,
    /// left to right within each level.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree = RBTree::from([10, 20, 17, 89, 1]);
    /// let mut values = Vec::new();
    /// tree.level_order_traversal(tree.root(), |node| values.push(*node.value().unwrap()));
    /// assert_eq!(values, [17, 10, 20, 1, 89]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `start` belongs to another tree.
    pub fn level_order_traversal<'a, F>(&'a self, start: NodeRef<'_, T>, visit: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        self.view().level_order_traversal(start, visit);
    }

    /// Deep-copies the current values, colors and shape.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        self.view().snapshot()
    }
}

impl<T: Ord> RBTree<T> {
    /// Returns `true` if the tree contains a value equal to `value`.
    ///
    /// The value may be any borrowed form of the tree's value type, but the
    /// ordering on the borrowed form *must* match the ordering on the value
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree = RBTree::from([String::from("b"), String::from("a")]);
    /// assert!(tree.contains("a"));
    /// assert!(!tree.contains("c"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(value)
    }

    /// Adds a value to the tree.
    ///
    /// Insertion always succeeds. A value equal to one already present is kept
    /// alongside it, after it in iteration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::{Color, RBTree};
    ///
    /// let mut tree = RBTree::new();
    /// let id = tree.insert(5);
    ///
    /// assert_eq!(tree.root().id(), id);
    /// assert_eq!(tree.root().color(), Color::Black);
    /// assert!(tree.root().left().is_nil());
    /// assert!(tree.root().right().is_nil());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) comparisons, at most two rotations.
    pub fn insert(&mut self, value: T) -> NodeId {
        self.insert_with(value, &mut Unobserved)
    }

    /// Adds a value to the tree, reporting every recoloring and rotation to
    /// `observer` as it happens.
    ///
    /// The observer is called synchronously: once after the new red leaf is
    /// attached, once per fixup step as described in
    /// [`observer`](crate::observer), and once when the insertion is
    /// complete.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::{observer, Change, RBTree};
    ///
    /// let mut tree = RBTree::from([10, 5, 15]);
    ///
    /// let mut changes = Vec::new();
    /// tree.insert_with(1, &mut observer::from_fn(|change, _tree| changes.push(change)));
    ///
    /// // A red uncle: the violation is fixed by recoloring alone.
    /// assert!(matches!(changes[1], Change::ColorFlipped { .. }));
    /// assert_eq!(changes.len(), 3);
    /// ```
    pub fn insert_with<O>(&mut self, value: T, observer: &mut O) -> NodeId
    where
        O: Observer<T> + ?Sized,
    {
        NodeId::new(self.raw.insert(value, observer))
    }

    /// Adds a value to the tree and returns a snapshot of every intermediate
    /// step, oldest first.
    ///
    /// The first frame shows the freshly attached red leaf and the last one the
    /// finished tree, so the result always holds at least two frames.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::{Change, Color, RBTree};
    ///
    /// let mut tree = RBTree::from([1, 2]);
    /// let frames = tree.insert_recorded(3);
    ///
    /// // 3 hangs red under red 2 before the fixup runs.
    /// let attached = &frames[0].snapshot;
    /// assert_eq!(attached.root().unwrap().value, 1);
    /// assert_eq!(attached.nodes()[2].color, Color::Red);
    ///
    /// // After the fixup 2 is the black root.
    /// let last = frames.last().unwrap();
    /// assert!(matches!(last.change, Change::Finished { .. }));
    /// assert_eq!(last.snapshot.root().unwrap().value, 2);
    /// ```
    pub fn insert_recorded(&mut self, value: T) -> Vec<Frame<T>>
    where
        T: Clone,
    {
        let mut recorder = Recorder::new();
        self.insert_with(value, &mut recorder);
        recorder.into_frames()
    }

    /// Checks every red-black and ordering invariant, returning the
    /// black-height of the root.
    ///
    /// The black-height counts the black nodes below the root on any path to
    /// the sentinel, the sentinel included; it is `0` for an empty tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. A tree built only
    /// through [`insert`](RBTree::insert) always passes.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree: RBTree<_> = (0..100).collect();
    /// assert!(tree.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        self.view().check_invariants()
    }
}

impl<T: Clone> Clone for RBTree<T> {
    fn clone(&self) -> Self {
        RBTree { raw: self.raw.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for RBTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for RBTree<T> {
    fn default() -> Self {
        RBTree::new()
    }
}

impl<T: Ord> FromIterator<T> for RBTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RBTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for RBTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: Ord + Copy> Extend<&'a T> for RBTree<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTree<T> {
    /// Inserts the values in array order.
    ///
    /// ```
    /// use rbtree_frames::RBTree;
    ///
    /// let tree = RBTree::from([10, 20, 17, 89, 1]);
    /// assert_eq!(tree.root().value(), Some(&17));
    /// ```
    fn from(values: [T; N]) -> Self {
        let mut tree = RBTree::with_capacity(N);
        tree.extend(values);
        tree
    }
}

impl<'a, T> IntoIterator for &'a RBTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a RawRBTree<T>) -> Self {
        let mut iter = Iter {
            tree,
            stack: SmallVec::new(),
            remaining: tree.len(),
        };
        iter.descend_left(tree.root());
        iter
    }

    /// Pushes `handle` and its chain of left descendants.
    fn descend_left(&mut self, mut handle: Handle) {
        while !handle.is_nil() {
            self.stack.push(handle);
            handle = self.tree.node(handle).left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let handle = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(handle);
        self.descend_left(node.right());
        self.remaining -= 1;
        node.value()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::observer::{self, Change};
    use alloc::format;
    use alloc::vec;

    #[test]
    fn empty_tree() {
        let tree: RBTree<i32> = RBTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.iter().next(), None);
        assert!(tree.root().is_nil());
    }

    /// Orders by `key` alone, so equal keys are true duplicates.
    #[derive(Clone, Copy, Debug)]
    struct Keyed {
        key: i32,
        tag: char,
    }

    impl PartialEq for Keyed {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    impl Eq for Keyed {}

    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Keyed {
        fn cmp(&self, other: &Self) -> core::cmp::Ordering {
            self.key.cmp(&other.key)
        }
    }

    #[test]
    fn first_and_last_with_duplicates() {
        let mut tree = RBTree::new();
        for (key, tag) in [(1, 'a'), (0, 'p'), (2, 'x'), (0, 'q'), (2, 'y'), (1, 'b'), (0, 'r'), (2, 'z')] {
            tree.insert(Keyed { key, tag });
        }
        assert_eq!(tree.first().map(|v| (v.key, v.tag)), Some((0, 'p')));
        assert_eq!(tree.last().map(|v| (v.key, v.tag)), Some((2, 'z')));

        let tags: vec::Vec<char> = tree.iter().map(|v| v.tag).collect();
        assert_eq!(tags, vec!['p', 'q', 'r', 'a', 'b', 'x', 'y', 'z']);
    }

    #[test]
    fn iter_is_exact_size() {
        let tree = RBTree::from([5, 3, 8, 1, 4]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.by_ref().count(), 4);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn debug_is_a_sorted_set() {
        let tree = RBTree::from([3, 1, 2]);
        assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
        assert_eq!(format!("{:?}", tree.iter()), "[1, 2, 3]");
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = RBTree::from([1, 2, 3]);
        let copy = tree.clone();
        tree.insert(4);
        assert_eq!(copy.len(), 3);
        assert_eq!(tree.len(), 4);
        assert!(copy.check_invariants().is_ok());
    }

    #[test]
    fn extend_by_reference() {
        let mut tree: RBTree<i32> = RBTree::new();
        tree.extend(&[3, 1, 2]);
        assert!(tree.iter().eq([1, 2, 3].iter()));
    }

    #[test]
    fn single_insert_notifies_twice() {
        let mut tree = RBTree::new();
        let mut changes = vec![];
        let id = tree.insert_with(5, &mut observer::from_fn(|change, _tree| changes.push(change)));
        assert_eq!(changes, vec![Change::Attached { node: id }, Change::Finished { root: id }]);
    }

    #[test]
    fn observer_sees_leaf_before_fixup() {
        let mut tree = RBTree::from([10, 20]);
        let mut colors = vec![];
        tree.insert_with(
            17,
            &mut observer::from_fn(|change, view| {
                if let Change::Attached { node } = change {
                    let node = view.node(node).unwrap();
                    colors.push((node.color(), node.parent().color()));
                }
            }),
        );
        assert_eq!(colors, vec![(Color::Red, Color::Red)]);
    }

    #[test]
    fn recorded_frames_end_with_the_final_tree() {
        let mut tree = RBTree::from([10, 20, 17, 89]);
        let frames = tree.insert_recorded(1);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].snapshot, tree.snapshot());
    }
}
