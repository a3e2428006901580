use std::cmp::{self, Ordering};
use std::fmt;

/// An ordered set of unique keys kept in a height-balanced (AVL) binary search tree.
///
/// ```
/// use avl_levels::BalancedTree;
/// let mut tree = BalancedTree::new();
/// tree.insert(10);
/// tree.insert(20);
/// tree.insert(30);
/// assert!(tree.search(&20));
/// assert_eq!(tree.height(), 2);
/// tree.delete(&20);
/// assert!(!tree.search(&20));
/// ```
#[derive(Clone)]
pub struct BalancedTree<K> {
    pub(crate) root: Link<K>,
    pub(crate) num_nodes: usize,
}

#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
    pub(crate) height: usize,
}

pub(crate) type Link<K> = Option<Box<Node<K>>>;

/// An iterator over the keys of a tree in ascending order.
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rotation {
    Right,
    Left,
    LeftRight,
    RightLeft,
}

impl<K: Ord> BalancedTree<K> {
    /// Creates an empty tree.
    /// No memory is allocated until the first key is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree stores the key.
    pub fn search(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns true if the tree stores the key. Same as [`search`](Self::search).
    pub fn contains(&self, key: &K) -> bool {
        self.search(key)
    }

    /// Inserts a key into the tree.
    /// Returns whether the key was added; inserting a stored key leaves the tree untouched.
    pub fn insert(&mut self, key: K) -> bool {
        if Self::insert_into(&mut self.root, key).is_some() {
            self.num_nodes += 1;
            return true;
        }
        log::trace!("Key already stored, nothing to insert.");
        false
    }

    /// Deletes a key from the tree.
    /// Returns whether the key was previously stored; deleting an absent key is a no-op.
    pub fn delete(&mut self, key: &K) -> bool {
        if Self::remove_from(&mut self.root, key) {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
            debug_assert!(!self.search(key));
            return true;
        }
        log::trace!("Key not stored, nothing to delete.");
        false
    }

    /// Returns the smallest key in the tree.
    pub fn min(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.key)
    }

    /// Returns the largest key in the tree.
    pub fn max(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.key)
    }

    pub(crate) fn find(&self, key: &K) -> Option<&Node<K>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => break,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            }
        }
        current
    }

    // Returns how the key compared to the root of the subtree behind `link`
    // (`Equal` for the new leaf), or `None` if the key was already stored.
    fn insert_into(link: &mut Link<K>, key: K) -> Option<Ordering> {
        let node = match *link {
            None => {
                *link = Some(Node::create(key));
                return Some(Ordering::Equal);
            }
            Some(ref mut node) => node,
        };
        let descent = key.cmp(&node.key);
        let below = match descent {
            Ordering::Equal => return None,
            Ordering::Less => Self::insert_into(&mut node.left, key)?,
            Ordering::Greater => Self::insert_into(&mut node.right, key)?,
        };
        *link = link.take().map(|node| Self::rebalance_inserted(node, below));
        Some(descent)
    }

    // Returns whether the key was found and removed from the subtree behind `link`.
    fn remove_from(link: &mut Link<K>, key: &K) -> bool {
        let node = match *link {
            None => return false,
            Some(ref mut node) => node,
        };
        let removed = match key.cmp(&node.key) {
            Ordering::Less => Self::remove_from(&mut node.left, key),
            Ordering::Greater => Self::remove_from(&mut node.right, key),
            Ordering::Equal => {
                *link = link.take().and_then(Self::unlink_node);
                return true;
            }
        };
        if removed {
            *link = link.take().map(Self::rebalance_removed);
        }
        removed
    }

    fn unlink_node(mut node: Box<Node<K>>) -> Link<K> {
        match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                // Node keeps its place, the in-order successor's key moves up
                let (right, successor) = Self::take_min(right);
                node.key = successor;
                node.left = Some(left);
                node.right = right;
                Some(Self::rebalance_removed(node))
            }
        }
    }

    // Detaches the leftmost node of a subtree, returning the remaining subtree and its key.
    fn take_min(mut node: Box<Node<K>>) -> (Link<K>, K) {
        match node.left.take() {
            None => {
                let node = *node;
                (node.right, node.key)
            }
            Some(left) => {
                let (left, min) = Self::take_min(left);
                node.left = left;
                (Some(Self::rebalance_removed(node)), min)
            }
        }
    }

    /// Restores balance at a node on the insertion path and adjusts its height.
    /// `below` is how the inserted key compared to the child the insertion went into,
    /// which picks between single and double rotation.
    fn rebalance_inserted(mut node: Box<Node<K>>, below: Ordering) -> Box<Node<K>> {
        node.adjust_height();
        let balance = node.balance_factor();
        debug_assert!((-2..=2).contains(&balance));
        let rotation = if balance > 1 {
            if below == Ordering::Less {
                Rotation::Right
            } else {
                Rotation::LeftRight
            }
        } else if balance < -1 {
            if below == Ordering::Greater {
                Rotation::Left
            } else {
                Rotation::RightLeft
            }
        } else {
            return node;
        };
        Self::rotate(node, rotation)
    }

    /// Restores balance at a node on the deletion path and adjusts its height.
    /// The balance of the taller child picks between single and double rotation.
    fn rebalance_removed(mut node: Box<Node<K>>) -> Box<Node<K>> {
        node.adjust_height();
        let balance = node.balance_factor();
        debug_assert!((-2..=2).contains(&balance));
        let rotation = if balance > 1 {
            if Node::balance_of(&node.left) >= 0 {
                Rotation::Right
            } else {
                Rotation::LeftRight
            }
        } else if balance < -1 {
            if Node::balance_of(&node.right) <= 0 {
                Rotation::Left
            } else {
                Rotation::RightLeft
            }
        } else {
            return node;
        };
        Self::rotate(node, rotation)
    }

    fn rotate(mut node: Box<Node<K>>, rotation: Rotation) -> Box<Node<K>> {
        let height = node.height;
        let node = match rotation {
            Rotation::Right => Self::rotate_right(node),
            Rotation::Left => Self::rotate_left(node),
            Rotation::LeftRight => {
                node.left = node.left.take().map(Self::rotate_left);
                Self::rotate_right(node)
            }
            Rotation::RightLeft => {
                node.right = node.right.take().map(Self::rotate_right);
                Self::rotate_left(node)
            }
        };
        log::debug!(
            "{rotation} rotation, subtree height {height} -> {}.",
            node.height
        );
        node
    }

    fn rotate_left(mut node: Box<Node<K>>) -> Box<Node<K>> {
        match node.right.take() {
            None => node,
            Some(mut right) => {
                node.right = right.left.take();
                node.adjust_height();
                right.left = Some(node);
                right.adjust_height();
                right
            }
        }
    }

    fn rotate_right(mut node: Box<Node<K>>) -> Box<Node<K>> {
        match node.left.take() {
            None => node,
            Some(mut left) => {
                node.left = left.right.take();
                node.adjust_height();
                left.right = Some(node);
                left.adjust_height();
                left
            }
        }
    }
}

impl<K> BalancedTree<K> {
    /// Returns true if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single key.
    pub fn height(&self) -> usize {
        Node::height_of(&self.root)
    }

    /// Clears the tree, deallocating all nodes.
    pub fn clear(&mut self) {
        // Tear down without recursing through nested boxes
        let mut pending: Vec<Box<Node<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.num_nodes = 0;
    }

    /// Gets an iterator over the keys of the tree in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root.as_deref(), self.num_nodes)
    }
}

impl<K> Drop for BalancedTree<K> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Ord> Default for BalancedTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for BalancedTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: PartialEq> PartialEq for BalancedTree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for BalancedTree<K> {}

impl<K: Ord> FromIterator<K> for BalancedTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for BalancedTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a BalancedTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K> Iter<'a, K> {
    fn new(root: Option<&'a Node<K>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<K>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> Node<K> {
    fn create(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    pub(crate) fn height_of(link: &Link<K>) -> usize {
        match link {
            None => 0,
            Some(node) => node.height,
        }
    }

    pub(crate) fn balance_of(link: &Link<K>) -> isize {
        match link {
            None => 0,
            Some(node) => node.balance_factor(),
        }
    }

    /// Height of the left subtree minus height of the right subtree.
    pub(crate) fn balance_factor(&self) -> isize {
        Self::height_of(&self.left) as isize - Self::height_of(&self.right) as isize
    }

    fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(Self::height_of(&self.left), Self::height_of(&self.right));
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rotation::Right => "Right",
            Rotation::Left => "Left",
            Rotation::LeftRight => "Left-right",
            Rotation::RightLeft => "Right-left",
        };
        f.write_str(name)
    }
}
