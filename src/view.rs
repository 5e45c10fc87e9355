use core::fmt;

use crate::color::{Color, Direction};
use crate::raw::{Handle, RawRBTree};
use crate::rbtree::Iter;
use crate::snapshot::Snapshot;
use crate::validate::{self, InvariantViolation};

/// Stable identity of a node within one tree.
///
/// There is no removal, so an id captured by an observer still names the same
/// node after later insertions. [`RBTree::clear`](crate::RBTree::clear) is the
/// exception: it frees every slot, and later insertions reuse the old ids.
/// The sentinel has its own id, see [`TreeView::nil`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(Handle);

impl NodeId {
    #[inline]
    pub(crate) const fn new(handle: Handle) -> Self {
        Self(handle)
    }

    #[inline]
    pub(crate) const fn handle(self) -> Handle {
        self.0
    }

    /// Returns the arena slot of this node. The sentinel is slot `0`; real
    /// nodes are numbered in insertion order starting at `1`.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0.to_index()
    }

    /// Returns `true` if this is the sentinel's id.
    #[must_use]
    #[inline]
    pub const fn is_nil(self) -> bool {
        self.0.is_nil()
    }
}

/// A read-only view of a tree.
///
/// This is what an [`Observer`](crate::Observer) is handed on every change, and
/// what [`RBTree::view`](crate::RBTree::view) returns. It is `Copy` and borrows
/// the tree, so it cannot outlive the notification it was passed to.
pub struct TreeView<'a, T> {
    raw: &'a RawRBTree<T>,
}

impl<T> Clone for TreeView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TreeView<'_, T> {}

impl<'a, T> TreeView<'a, T> {
    pub(crate) const fn new(raw: &'a RawRBTree<T>) -> Self {
        Self { raw }
    }

    /// Returns the number of values in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the root, which is the sentinel when the tree is empty.
    #[must_use]
    pub fn root(&self) -> NodeRef<'a, T> {
        NodeRef::new(self.raw, self.raw.root())
    }

    /// Returns the sentinel shared by every absent link.
    #[must_use]
    pub fn nil(&self) -> NodeRef<'a, T> {
        NodeRef::new(self.raw, Handle::NIL)
    }

    /// Returns the node named by `id`, or `None` if the id is out of range for
    /// this tree. An in-range id taken from another tree is not detected.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'a, T>> {
        self.raw
            .contains_handle(id.handle())
            .then(|| NodeRef::new(self.raw, id.handle()))
    }

    /// Returns the number of edges on the longest root-to-leaf path, `0` for
    /// an empty or single-node tree.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns an in-order iterator over the values.
    pub fn iter(&self) -> Iter<'a, T> {
        Iter::new(self.raw)
    }

    /// Calls `visit` on every node of the subtree at `start` in sorted order.
    ///
    /// Passing the sentinel visits nothing.
    ///
    /// # Panics
    ///
    /// Panics if `start` belongs to another tree.
    pub fn in_order_traversal<F>(&self, start: NodeRef<'_, T>, mut visit: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        let raw = self.raw;
        assert!(
            core::ptr::eq(start.raw, raw),
            "`TreeView::in_order_traversal()` - `start` belongs to another tree!"
        );
        raw.in_order(start.handle, &mut |handle| visit(NodeRef::new(raw, handle)));
    }

    /// Calls `visit` on every node of the subtree at `start`, level by level.
    ///
    /// Passing the sentinel visits nothing.
    ///
    /// # Panics
    ///
    /// Panics if `start` belongs to another tree.
    pub fn level_order_traversal<F>(&self, start: NodeRef<'_, T>, mut visit: F)
    where
        F: FnMut(NodeRef<'a, T>),
    {
        let raw = self.raw;
        assert!(
            core::ptr::eq(start.raw, raw),
            "`TreeView::level_order_traversal()` - `start` belongs to another tree!"
        );
        raw.level_order(start.handle, |handle| visit(NodeRef::new(raw, handle)));
    }

    /// Deep-copies the tree's values, colors and shape.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        Snapshot::capture(*self)
    }

    /// Checks every red-black and ordering invariant, returning the black-height
    /// of the root.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation>
    where
        T: Ord,
    {
        validate::check(self.raw)
    }
}

impl<T: fmt::Debug> fmt::Debug for TreeView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A borrowed node of a tree, or its sentinel.
///
/// Links out of the sentinel lead back to the sentinel, so a walk can follow
/// `parent`, `left` and `right` without checking for absence first.
pub struct NodeRef<'a, T> {
    raw: &'a RawRBTree<T>,
    handle: Handle,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    /// Two refs are equal when they name the same node of the same tree.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.raw, other.raw) && self.handle == other.handle
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    const fn new(raw: &'a RawRBTree<T>, handle: Handle) -> Self {
        Self { raw, handle }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        NodeId::new(self.handle)
    }

    /// Returns `true` for the sentinel.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.handle.is_nil()
    }

    /// Returns the stored value, or `None` for the sentinel.
    #[must_use]
    pub fn value(&self) -> Option<&'a T> {
        self.raw.node(self.handle).value()
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.raw.node(self.handle).color()
    }

    #[must_use]
    pub fn parent(&self) -> NodeRef<'a, T> {
        NodeRef::new(self.raw, self.raw.node(self.handle).parent())
    }

    #[must_use]
    pub fn left(&self) -> NodeRef<'a, T> {
        self.child(Direction::Left)
    }

    #[must_use]
    pub fn right(&self) -> NodeRef<'a, T> {
        self.child(Direction::Right)
    }

    #[must_use]
    pub fn child(&self, side: Direction) -> NodeRef<'a, T> {
        NodeRef::new(self.raw, self.raw.node(self.handle).child(side))
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return f.write_str("Nil");
        }
        f.debug_struct("Node")
            .field("id", &self.handle.to_index())
            .field("value", &self.value())
            .field("color", &self.color())
            .field("parent", &self.parent().handle.to_index())
            .field("left", &self.left().handle.to_index())
            .field("right", &self.right().handle.to_index())
            .finish()
    }
}

/// Renders the one-line diagnostic form `value (Color) | P:parent L:left R:right`,
/// writing `nil` wherever a link is the sentinel.
impl<T: fmt::Display> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Label<'b, T>(Option<&'b T>);

        impl<T: fmt::Display> fmt::Display for Label<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.0 {
                    Some(value) => value.fmt(f),
                    None => f.write_str("nil"),
                }
            }
        }

        write!(
            f,
            "{} ({}) | P:{} L:{} R:{}",
            Label(self.value()),
            self.color(),
            Label(self.parent().value()),
            Label(self.left().value()),
            Label(self.right().value()),
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::RBTree;
    use crate::color::Color;
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn sentinel_links_lead_back_to_itself() {
        let tree: RBTree<i32> = RBTree::new();
        let view = tree.view();
        let nil = view.nil();
        assert!(nil.is_nil());
        assert_eq!(view.root(), nil);
        assert_eq!(nil.parent(), nil);
        assert_eq!(nil.left(), nil);
        assert_eq!(nil.right(), nil);
        assert_eq!(nil.value(), None);
        assert_eq!(nil.color(), Color::Black);
    }

    #[test]
    fn diagnostic_lines() {
        let tree = RBTree::from([10, 20, 17, 89, 1]);
        let view = tree.view();
        let mut lines: Vec<String> = Vec::new();
        view.in_order_traversal(view.root(), |node| lines.push(node.to_string()));
        assert_eq!(
            lines,
            vec![
                "1 (Red) | P:10 L:nil R:nil",
                "10 (Black) | P:17 L:1 R:nil",
                "17 (Black) | P:nil L:10 R:20",
                "20 (Black) | P:17 L:nil R:89",
                "89 (Red) | P:20 L:nil R:nil",
            ]
        );
    }

    #[test]
    fn traversal_of_a_subtree() {
        let tree = RBTree::from([10, 20, 17, 89, 1]);
        let view = tree.view();
        let right = view.root().right();

        let mut in_order = Vec::new();
        view.in_order_traversal(right, |node| in_order.push(*node.value().unwrap()));
        assert_eq!(in_order, vec![20, 89]);

        let mut nothing = Vec::new();
        view.level_order_traversal(view.nil(), |node| nothing.push(node.id()));
        assert!(nothing.is_empty());
    }

    #[test]
    #[should_panic(expected = "`TreeView::in_order_traversal()` - `start` belongs to another tree!")]
    fn in_order_from_another_tree_panics() {
        let a = RBTree::from([100, 200, 300]);
        let b = RBTree::from([1, 2, 3]);
        a.in_order_traversal(b.root(), |_| {});
    }

    #[test]
    #[should_panic(expected = "`TreeView::level_order_traversal()` - `start` belongs to another tree!")]
    fn level_order_from_another_tree_panics() {
        let a = RBTree::from([1]);
        let b: RBTree<i32> = (0..10).collect();
        a.level_order_traversal(b.root().right().right(), |_| {});
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let big = RBTree::from([1, 2, 3, 4]);
        let small = RBTree::from([1]);
        let id = big.view().root().right().right().id();
        assert!(big.node(id).is_some());
        assert!(small.node(id).is_none());
    }

    #[test]
    fn debug_formats() {
        let tree = RBTree::from([2, 1]);
        assert_eq!(format!("{:?}", tree.view()), "{1, 2}");
        assert_eq!(format!("{:?}", tree.view().nil()), "Nil");
        assert_eq!(
            format!("{:?}", tree.view().root()),
            "Node { id: 1, value: Some(2), color: Black, parent: 0, left: 2, right: 0 }"
        );
    }
}
