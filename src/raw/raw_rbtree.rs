use core::borrow::Borrow;

use alloc::collections::VecDeque;

use crate::color::{Color, Direction};
use crate::observer::{Change, Observer};
use crate::view::{NodeId, TreeView};

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

/// The core red-black tree backing `RBTree`.
#[derive(Clone)]
pub(crate) struct RawRBTree<T> {
    /// Arena storing all tree nodes. Slot zero is the sentinel.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, or `Handle::NIL` when the tree is empty.
    root: Handle,
    /// Number of values in the tree.
    len: usize,
}

impl<T> RawRBTree<T> {
    /// Creates a new, empty tree holding only the sentinel.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new tree with room for `capacity` values before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.saturating_add(1));
        let nil = nodes.alloc(Node::sentinel());
        debug_assert!(nil.is_nil());
        Self {
            nodes,
            root: Handle::NIL,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().saturating_sub(1)
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node except the sentinel.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.root = Handle::NIL;
        self.len = 0;
    }

    pub(crate) const fn root(&self) -> Handle {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        debug_assert!(!handle.is_nil(), "`RawRBTree::node_mut()` - the sentinel is immutable!");
        self.nodes.get_mut(handle)
    }

    /// Returns `true` if `handle` addresses a slot of this tree.
    pub(crate) const fn contains_handle(&self, handle: Handle) -> bool {
        handle.to_index() < self.nodes.len()
    }

    #[inline]
    fn color(&self, handle: Handle) -> Color {
        self.node(handle).color()
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Handle {
        self.node(handle).parent()
    }

    /// Returns the value stored at a non-sentinel node.
    #[inline]
    fn key(&self, handle: Handle) -> &T {
        self.node(handle)
            .value()
            .expect("`RawRBTree::key()` - the sentinel has no value!")
    }

    /// Returns which child of its parent `handle` is.
    #[inline]
    fn side_of(&self, handle: Handle) -> Direction {
        if self.node(self.parent(handle)).left() == handle {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Returns the leftmost node, or `Handle::NIL` when empty.
    pub(crate) fn first(&self) -> Handle {
        self.extreme(Direction::Left)
    }

    /// Returns the rightmost node, or `Handle::NIL` when empty.
    pub(crate) fn last(&self) -> Handle {
        self.extreme(Direction::Right)
    }

    fn extreme(&self, side: Direction) -> Handle {
        let mut current = self.root;
        if current.is_nil() {
            return current;
        }
        loop {
            let next = self.node(current).child(side);
            if next.is_nil() {
                return current;
            }
            current = next;
        }
    }

    /// Returns the number of edges on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        self.levels(self.root).saturating_sub(1)
    }

    /// Returns the number of nodes on the longest path down from `handle`.
    fn levels(&self, handle: Handle) -> usize {
        if handle.is_nil() {
            return 0;
        }
        let node = self.node(handle);
        1 + self.levels(node.left()).max(self.levels(node.right()))
    }

    /// Visits the subtree at `start` in sorted order: left, node, right.
    pub(crate) fn in_order<F>(&self, start: Handle, visit: &mut F)
    where
        F: FnMut(Handle),
    {
        if start.is_nil() {
            return;
        }
        let node = self.node(start);
        self.in_order(node.left(), visit);
        visit(start);
        self.in_order(node.right(), visit);
    }

    /// Visits the subtree at `start` breadth-first, left to right per level.
    pub(crate) fn level_order<F>(&self, start: Handle, mut visit: F)
    where
        F: FnMut(Handle),
    {
        let mut queue = VecDeque::new();
        if !start.is_nil() {
            queue.push_back(start);
        }

        while let Some(current) = queue.pop_front() {
            visit(current);

            let node = self.node(current);
            if !node.left().is_nil() {
                queue.push_back(node.left());
            }
            if !node.right().is_nil() {
                queue.push_back(node.right());
            }
        }
    }

    fn notify<O>(&self, change: Change, observer: &mut O)
    where
        O: Observer<T> + ?Sized,
    {
        observer.on_change(change, TreeView::new(self));
    }

    /// Exchanges `pivot` with its child on the side opposite to `direction`:
    /// a left rotation promotes the right child, a right rotation the left.
    ///
    /// Ordering and every parent back-link are preserved. One notification is
    /// sent before the pointer surgery and one after.
    ///
    /// # Panics
    ///
    /// Panics if the child to promote is the sentinel or the root has a parent.
    pub(crate) fn rotate<O>(&mut self, pivot: Handle, direction: Direction, observer: &mut O)
    where
        O: Observer<T> + ?Sized,
    {
        let promoted_side = direction.opposite();
        let promoted = self.node(pivot).child(promoted_side);
        assert!(!promoted.is_nil(), "`RawRBTree::rotate()` - pivot has no child to promote!");
        assert!(self.parent(self.root).is_nil(), "`RawRBTree::rotate()` - root has a parent!");

        #[cfg(feature = "tracing")]
        tracing::trace!(pivot = pivot.to_index(), promoted = promoted.to_index(), ?direction, "rotate");

        let id = NodeId::new(pivot);
        self.notify(Change::RotationStarted { pivot: id, direction }, observer);

        // The promoted node's inner subtree moves across to the pivot.
        let inner = self.node(promoted).child(direction);
        self.node_mut(pivot).set_child(promoted_side, inner);
        if !inner.is_nil() {
            self.node_mut(inner).set_parent(pivot);
        }

        let above = self.parent(pivot);
        self.node_mut(promoted).set_parent(above);
        if above.is_nil() {
            self.root = promoted;
        } else {
            let side = self.side_of(pivot);
            self.node_mut(above).set_child(side, promoted);
        }

        self.node_mut(promoted).set_child(direction, pivot);
        self.node_mut(pivot).set_parent(promoted);

        self.notify(Change::RotationFinished { pivot: id, direction }, observer);
    }

    /// Restores the red-black properties after `node` was attached as a red leaf.
    ///
    /// On entry the only possible violation is `node` being red under a red
    /// parent. Each pass either pushes that violation two levels up (red uncle)
    /// or resolves it with at most two rotations (black uncle).
    fn insert_fixup<O>(&mut self, mut node: Handle, observer: &mut O)
    where
        O: Observer<T> + ?Sized,
    {
        while self.color(self.parent(node)).is_red() {
            let parent = self.parent(node);
            // A red parent is never the root, so the grandparent is a real node.
            let grandparent = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.node(grandparent).child(side.opposite());

            if self.color(uncle).is_red() {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = node.to_index(), grandparent = grandparent.to_index(), "fixup: red uncle");

                self.node_mut(parent).set_color(Color::Black);
                self.node_mut(uncle).set_color(Color::Black);
                self.node_mut(grandparent).set_color(Color::Red);
                node = grandparent;
                self.notify(
                    Change::ColorFlipped {
                        grandparent: NodeId::new(grandparent),
                    },
                    observer,
                );
                continue;
            }

            if self.node(parent).child(side.opposite()) == node {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = node.to_index(), parent = parent.to_index(), "fixup: inner grandchild");

                node = parent;
                self.rotate(node, side, observer);
            }

            let parent = self.parent(node);
            let grandparent = self.parent(parent);

            #[cfg(feature = "tracing")]
            tracing::trace!(node = node.to_index(), grandparent = grandparent.to_index(), "fixup: outer grandchild");

            self.node_mut(parent).set_color(Color::Black);
            self.node_mut(grandparent).set_color(Color::Red);
            self.notify(
                Change::Recolored {
                    parent: NodeId::new(parent),
                    grandparent: NodeId::new(grandparent),
                },
                observer,
            );
            self.rotate(grandparent, side.opposite(), observer);
        }

        let root = self.root;
        if !root.is_nil() {
            self.node_mut(root).set_color(Color::Black);
        }
    }
}

impl<T: Ord> RawRBTree<T> {
    /// Returns `true` if some node holds a value equal to `key`.
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while !current.is_nil() {
            let node = self.node(current);
            match key.cmp(self.key(current).borrow()) {
                core::cmp::Ordering::Less => current = node.left(),
                core::cmp::Ordering::Equal => return true,
                core::cmp::Ordering::Greater => current = node.right(),
            }
        }
        false
    }

    /// Inserts `value` and rebalances, reporting every step to `observer`.
    ///
    /// Values equal to an existing one descend to the right, so duplicates are
    /// kept in insertion order. Returns the handle of the new node.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(len = self.len))
    )]
    pub(crate) fn insert<O>(&mut self, value: T, observer: &mut O) -> Handle
    where
        O: Observer<T> + ?Sized,
    {
        let mut parent = Handle::NIL;
        let mut side = Direction::Left;
        let mut current = self.root;

        while !current.is_nil() {
            parent = current;
            side = if value < *self.key(current) {
                Direction::Left
            } else {
                Direction::Right
            };
            current = self.node(current).child(side);
        }

        let node = self.nodes.alloc(Node::leaf(value, parent));
        if parent.is_nil() {
            self.root = node;
        } else {
            self.node_mut(parent).set_child(side, node);
        }
        self.len += 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(node = node.to_index(), parent = parent.to_index(), ?side, "attached");

        self.notify(Change::Attached { node: NodeId::new(node) }, observer);
        self.insert_fixup(node, observer);

        #[cfg(feature = "tracing")]
        tracing::debug!(node = node.to_index(), root = self.root.to_index(), len = self.len, "inserted");

        self.notify(
            Change::Finished {
                root: NodeId::new(self.root),
            },
            observer,
        );
        node
    }
}
