use core::fmt;

use crate::color::Color;
use crate::raw::{Handle, RawRBTree};
use crate::view::NodeId;

/// A broken red-black or ordering invariant found by
/// [`RBTree::check_invariants`](crate::RBTree::check_invariants).
///
/// Insertion never produces any of these; they exist so tests and debugging
/// tools can verify a tree without reimplementing the walk.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum InvariantViolation {
    /// The sentinel is not black, carries a value, or links somewhere other
    /// than itself.
    SentinelCorrupted,
    RootNotBlack { root: NodeId },
    /// The root's parent link is not the sentinel.
    RootHasParent { root: NodeId },
    /// A red node has a red child.
    RedRed { parent: NodeId, child: NodeId },
    /// The two subtrees of `node` have different black-heights.
    BlackHeightMismatch { node: NodeId, left: usize, right: usize },
    /// `node` is greater than an ancestor it sits left of, or less than an
    /// ancestor it sits right of.
    OutOfOrder { node: NodeId },
    /// `child` is linked from `parent`, but its parent link points elsewhere.
    BrokenParentLink { parent: NodeId, child: NodeId },
    /// The number of reachable nodes differs from the recorded length.
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InvariantViolation::SentinelCorrupted => f.write_str("sentinel node was modified"),
            InvariantViolation::RootNotBlack { root } => write!(f, "root {} is not black", root.index()),
            InvariantViolation::RootHasParent { root } => {
                write!(f, "root {} has a parent other than the sentinel", root.index())
            }
            InvariantViolation::RedRed { parent, child } => {
                write!(f, "red node {} has red child {}", parent.index(), child.index())
            }
            InvariantViolation::BlackHeightMismatch { node, left, right } => write!(
                f,
                "node {} has black-height {left} on the left but {right} on the right",
                node.index()
            ),
            InvariantViolation::OutOfOrder { node } => write!(f, "node {} violates search order", node.index()),
            InvariantViolation::BrokenParentLink { parent, child } => write!(
                f,
                "node {} is a child of {} but does not link back to it",
                child.index(),
                parent.index()
            ),
            InvariantViolation::LengthMismatch { expected, found } => {
                write!(f, "tree records {expected} values but {found} are reachable")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}

/// Walks the whole tree and returns the black-height of the root: the number
/// of black nodes below it on any path, counting the sentinel. An empty tree
/// has black-height `0`.
pub(crate) fn check<T: Ord>(tree: &RawRBTree<T>) -> Result<usize, InvariantViolation> {
    let nil = tree.node(Handle::NIL);
    if nil.color() != Color::Black
        || nil.value().is_some()
        || !nil.parent().is_nil()
        || !nil.left().is_nil()
        || !nil.right().is_nil()
    {
        return Err(InvariantViolation::SentinelCorrupted);
    }

    let root = tree.root();
    if root.is_nil() {
        return match tree.len() {
            0 => Ok(0),
            expected => Err(InvariantViolation::LengthMismatch { expected, found: 0 }),
        };
    }

    let id = NodeId::new(root);
    if tree.node(root).color() != Color::Black {
        return Err(InvariantViolation::RootNotBlack { root: id });
    }
    if !tree.node(root).parent().is_nil() {
        return Err(InvariantViolation::RootHasParent { root: id });
    }

    let mut walk = Walk { tree, count: 0 };
    let height = walk.subtree(root, None, None)?;
    if walk.count != tree.len() {
        return Err(InvariantViolation::LengthMismatch {
            expected: tree.len(),
            found: walk.count,
        });
    }

    // The root is black, so it is counted by `subtree` but not by the definition.
    Ok(height - 1)
}

struct Walk<'a, T> {
    tree: &'a RawRBTree<T>,
    count: usize,
}

impl<'a, T: Ord> Walk<'a, T> {
    /// Checks the subtree at `handle` whose values must lie in `[lower, upper]`.
    /// Rotations can carry an equal value to either side, so both bounds are
    /// inclusive.
    /// Returns the number of black nodes from `handle` down to the sentinel,
    /// both included.
    fn subtree(
        &mut self,
        handle: Handle,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
    ) -> Result<usize, InvariantViolation> {
        if handle.is_nil() {
            return Ok(1);
        }
        self.count += 1;

        let tree = self.tree;
        let node = tree.node(handle);
        let id = NodeId::new(handle);
        let Some(value) = node.value() else {
            return Err(InvariantViolation::SentinelCorrupted);
        };

        if lower.is_some_and(|lower| value < lower) || upper.is_some_and(|upper| value > upper) {
            return Err(InvariantViolation::OutOfOrder { node: id });
        }

        for child in [node.left(), node.right()] {
            if child.is_nil() {
                continue;
            }
            let child_node = tree.node(child);
            if child_node.parent() != handle {
                return Err(InvariantViolation::BrokenParentLink {
                    parent: id,
                    child: NodeId::new(child),
                });
            }
            if node.color().is_red() && child_node.color().is_red() {
                return Err(InvariantViolation::RedRed {
                    parent: id,
                    child: NodeId::new(child),
                });
            }
        }

        let left = self.subtree(node.left(), lower, Some(value))?;
        let right = self.subtree(node.right(), Some(value), upper)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { node: id, left, right });
        }

        Ok(left + usize::from(node.color().is_black()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::RBTree;
    use crate::color::Direction;
    use crate::observer::Unobserved;
    use alloc::string::ToString;
    use proptest::prelude::*;

    fn raw(values: &[i32]) -> RawRBTree<i32> {
        let mut tree = RawRBTree::new();
        for &value in values {
            tree.insert(value, &mut Unobserved);
        }
        tree
    }

    #[test]
    fn bare_rotation_leaves_red_root() {
        let mut tree = raw(&[1, 2, 3]);
        let root = tree.root();
        tree.rotate(root, Direction::Left, &mut Unobserved);
        assert_eq!(
            check(&tree),
            Err(InvariantViolation::RootNotBlack {
                root: NodeId::new(Handle::from_index(3))
            })
        );
    }

    #[test]
    fn bare_rotation_unbalances_black_height() {
        let mut tree = raw(&[2, 1, 3, 4]);
        assert_eq!(check(&tree), Ok(2));
        tree.rotate(Handle::from_index(3), Direction::Left, &mut Unobserved);
        assert_eq!(
            check(&tree),
            Err(InvariantViolation::BlackHeightMismatch {
                node: NodeId::new(Handle::from_index(4)),
                left: 2,
                right: 1,
            })
        );
    }

    #[test]
    fn empty_tree_is_valid() {
        let tree: RBTree<i32> = RBTree::new();
        assert_eq!(tree.check_invariants(), Ok(0));
    }

    #[test]
    fn single_node_has_black_height_one() {
        let tree = RBTree::from([5]);
        assert_eq!(tree.check_invariants(), Ok(1));
    }

    #[test]
    fn rotated_duplicates_are_in_order() {
        // The first 4 ends up as the left child of an equal value.
        let tree = raw(&[4, 4, 4]);
        assert_eq!(check(&tree), Ok(1));
    }

    #[test]
    fn known_shape() {
        let tree = RBTree::from([10, 20, 17, 89, 1]);
        assert_eq!(tree.check_invariants(), Ok(2));
    }

    #[test]
    fn messages() {
        let violation = InvariantViolation::BlackHeightMismatch {
            node: NodeId::new(Handle::from_index(3)),
            left: 2,
            right: 1,
        };
        assert_eq!(
            violation.to_string(),
            "node 3 has black-height 2 on the left but 1 on the right"
        );
        assert_eq!(
            InvariantViolation::LengthMismatch { expected: 4, found: 3 }.to_string(),
            "tree records 4 values but 3 are reachable"
        );
    }

    proptest! {
        #[test]
        fn random_inserts_stay_valid(values in prop::collection::vec(-1_000i32..1_000, 0..1_024)) {
            let tree: RBTree<i32> = values.iter().copied().collect();
            let black_height = tree.check_invariants();
            prop_assert!(black_height.is_ok(), "{:?}", black_height);
        }
    }
}
