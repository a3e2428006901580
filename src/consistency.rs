use std::cmp;
use std::fmt;

use crate::tree::{BalancedTree, Link};

/// A broken structural invariant, as reported by [`BalancedTree::validate`].
///
/// Any of these indicates a bug in the tree, never a misuse by the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Key {key} is on the wrong side of its ancestor {ancestor}.")]
    Unordered { key: String, ancestor: String },
    #[error("Node {key} caches height {cached} but its subtree is {actual} high.")]
    StaleHeight {
        key: String,
        cached: usize,
        actual: usize,
    },
    #[error("Node {key} has balance factor {balance}.")]
    Unbalanced { key: String, balance: isize },
    #[error("The tree counts {counted} nodes but {reachable} are reachable.")]
    CountMismatch { counted: usize, reachable: usize },
}

impl<K: Ord + fmt::Debug> BalancedTree<K> {
    /// Walks the whole tree and reports the first broken invariant:
    /// key order, exact cached heights, AVL balance and node count.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut reachable = 0;
        Self::validate_subtree(&self.root, None, None, &mut reachable)?;
        if reachable != self.num_nodes {
            return Err(InvariantViolation::CountMismatch {
                counted: self.num_nodes,
                reachable,
            });
        }
        Ok(())
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        if let Err(violation) = self.validate() {
            panic!("{violation}");
        }
    }

    // Returns the actual height of the subtree, all keys of which must lie
    // strictly between `lower` and `upper`.
    fn validate_subtree<'a>(
        link: &'a Link<K>,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        let node = match link.as_deref() {
            None => return Ok(0),
            Some(node) => node,
        };

        // Check key order against the closest ancestors on either side
        let misplaced_under = match (lower, upper) {
            (Some(lower), _) if node.key <= *lower => Some(lower),
            (_, Some(upper)) if node.key >= *upper => Some(upper),
            _ => None,
        };
        if let Some(ancestor) = misplaced_under {
            return Err(InvariantViolation::Unordered {
                key: format!("{:?}", node.key),
                ancestor: format!("{ancestor:?}"),
            });
        }

        let left_height = Self::validate_subtree(&node.left, lower, Some(&node.key), reachable)?;
        let right_height = Self::validate_subtree(&node.right, Some(&node.key), upper, reachable)?;

        // Check height
        let actual = 1 + cmp::max(left_height, right_height);
        if node.height != actual {
            return Err(InvariantViolation::StaleHeight {
                key: format!("{:?}", node.key),
                cached: node.height,
                actual,
            });
        }

        // Check AVL condition (nearly balance)
        let balance = left_height as isize - right_height as isize;
        if balance.abs() > 1 {
            return Err(InvariantViolation::Unbalanced {
                key: format!("{:?}", node.key),
                balance,
            });
        }

        *reachable += 1;
        Ok(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::InvariantViolation;
    use crate::tree::{BalancedTree, Node};

    fn leaf(key: i32) -> Option<Box<Node<i32>>> {
        Some(Box::new(Node {
            key,
            left: None,
            right: None,
            height: 1,
        }))
    }

    fn tree_from(root: Option<Box<Node<i32>>>, num_nodes: usize) -> BalancedTree<i32> {
        BalancedTree { root, num_nodes }
    }

    #[test]
    fn test_detects_unordered_grandchild() {
        //     10
        //    /
        //   5
        //    \
        //     12
        let mut five = leaf(5);
        if let Some(node) = five.as_mut() {
            node.right = leaf(12);
            node.height = 2;
        }
        let root = Some(Box::new(Node {
            key: 10,
            left: five,
            right: leaf(20),
            height: 3,
        }));
        let tree = tree_from(root, 4);
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::Unordered {
                key: "12".into(),
                ancestor: "10".into(),
            })
        );
    }

    #[test]
    fn test_detects_stale_height() {
        let mut root = leaf(10);
        if let Some(node) = root.as_mut() {
            node.left = leaf(5);
        }
        let tree = tree_from(root, 2);
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::StaleHeight {
                key: "10".into(),
                cached: 1,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_detects_imbalance() {
        // 1
        //  \
        //   2
        //    \
        //     3
        let mut two = leaf(2);
        if let Some(node) = two.as_mut() {
            node.right = leaf(3);
            node.height = 2;
        }
        let root = Some(Box::new(Node {
            key: 1,
            left: None,
            right: two,
            height: 3,
        }));
        let tree = tree_from(root, 3);
        let violation = tree.validate().unwrap_err();
        assert_eq!(
            violation,
            InvariantViolation::Unbalanced {
                key: "1".into(),
                balance: -2,
            }
        );
        assert_eq!(violation.to_string(), "Node 1 has balance factor -2.");
    }

    #[test]
    fn test_detects_count_mismatch() {
        let tree = tree_from(leaf(7), 2);
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::CountMismatch {
                counted: 2,
                reachable: 1,
            })
        );
    }

    #[test]
    #[should_panic(expected = "caches height")]
    fn test_check_consistency_panics() {
        let mut root = leaf(1);
        if let Some(node) = root.as_mut() {
            node.height = 5;
        }
        tree_from(root, 1).check_consistency();
    }
}
