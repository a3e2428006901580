//! A set of unique keys stored in a height-balanced (AVL) binary search tree.
//!
//! Besides search, insertion and deletion, the tree hands out read-only views
//! of its shape (level-order snapshots, node handles with height and balance
//! factor) for renderers and reporting layers that lay out or explain the tree.
//!
//! Rebalancing events are reported through the [`log`] facade at debug level.

mod consistency;
mod level;
mod tree;

pub use consistency::InvariantViolation;
pub use level::{Level, NodeRef};
pub use tree::{BalancedTree, Iter};
