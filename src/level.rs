//! Read-only views of the tree shape for renderers and reporting layers.

use std::collections::VecDeque;

use crate::tree::{BalancedTree, Node};

/// The keys found at one depth of the tree, ordered left to right.
///
/// Levels borrow the tree, so they are a snapshot: the tree cannot change
/// while a level is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level<'a, K> {
    /// Distance from the root, which sits alone at depth 0.
    pub depth: usize,
    pub keys: Vec<&'a K>,
}

/// A borrowed, read-only handle to one node of a tree.
pub struct NodeRef<'a, K> {
    node: &'a Node<K>,
}

impl<K> BalancedTree<K> {
    /// Returns a handle to the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.as_deref().map(NodeRef::new)
    }

    /// Visits every key breadth-first: top-down, left to right within a depth.
    /// The callback receives each key together with its depth.
    ///
    /// ```
    /// use avl_levels::BalancedTree;
    /// let tree: BalancedTree<i32> = (1..=3).collect();
    /// let mut visited = Vec::new();
    /// tree.traverse_level_order(|key, depth| visited.push((*key, depth)));
    /// assert_eq!(visited, [(2, 0), (1, 1), (3, 1)]);
    /// ```
    pub fn traverse_level_order<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a K, usize),
    {
        let mut queue: VecDeque<(&'a Node<K>, usize)> = VecDeque::new();
        if let Some(root) = self.root.as_deref() {
            queue.push_back((root, 0));
        }
        while let Some((node, depth)) = queue.pop_front() {
            f(&node.key, depth);
            if let Some(left) = node.left.as_deref() {
                queue.push_back((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                queue.push_back((right, depth + 1));
            }
        }
    }

    /// Collects the keys level by level, root level first.
    /// Returns no levels for an empty tree.
    pub fn traverse_by_level(&self) -> Vec<Level<'_, K>> {
        let mut levels: Vec<Level<'_, K>> = Vec::with_capacity(self.height());
        self.traverse_level_order(|key, depth| {
            if levels.len() == depth {
                levels.push(Level {
                    depth,
                    keys: Vec::new(),
                });
            }
            levels[depth].keys.push(key);
        });
        levels
    }
}

impl<K: Ord> BalancedTree<K> {
    /// Returns the height of the subtree rooted at the node storing `key`.
    pub fn height_of(&self, key: &K) -> Option<usize> {
        self.find(key).map(|node| node.height)
    }

    /// Returns the balance factor (left height minus right height) of the node storing `key`.
    pub fn balance_factor(&self, key: &K) -> Option<isize> {
        self.find(key).map(Node::balance_factor)
    }
}

impl<'a, K> NodeRef<'a, K> {
    fn new(node: &'a Node<K>) -> Self {
        Self { node }
    }

    pub fn key(&self) -> &'a K {
        &self.node.key
    }

    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.node.left.as_deref().map(NodeRef::new)
    }

    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.node.right.as_deref().map(NodeRef::new)
    }

    /// Height of the subtree rooted here; a leaf has height 1.
    pub fn height(&self) -> usize {
        self.node.height
    }

    /// Height of the left subtree minus height of the right subtree.
    pub fn balance_factor(&self) -> isize {
        self.node.balance_factor()
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K: std::fmt::Debug> std::fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.node.key)
            .field("height", &self.node.height)
            .finish()
    }
}
