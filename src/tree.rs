//! An unbalanced, parent-linked BST. The shape of the tree is decided purely by insertion order
//! and the `less` predicate handed to [`BinaryTree::insert`]. Searching and deleting by value use
//! `T`'s own ordering instead, so the two only agree when `less` agrees with `Ord`.
//!
//! # Examples
//!
//! ```
//! use parent_bst::BinaryTree;
//!
//! let mut tree = BinaryTree::new();
//! tree.insert_all([10, 5, 15, 3, 7], |a, b| a < b);
//!
//! assert_eq!(tree.search(&15).map(|n| *n.value()), Some(15));
//! assert!(tree.search(&20).is_none());
//!
//! // Predicate searches visit every node in pre-order.
//! let small: Vec<i32> = tree
//!     .search_where(|n| *n.value() < 10)
//!     .iter()
//!     .map(|n| *n.value())
//!     .collect();
//! assert_eq!(small, vec![5, 3, 7]);
//!
//! tree.delete(&5);
//! assert!(tree.search(&5).is_none());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::node::Node;

/// A Binary Search Tree whose nodes know their parents. This can be used for inserting,
/// searching, and deleting values. No rebalancing is ever performed.
pub struct BinaryTree<T> {
    root: Option<Node<T>>,
}

/// What [`BinaryTree::rebuild`] does with a visited node.
#[derive(Clone, Copy)]
enum Fate {
    /// Keep the node and relink its surviving children.
    Keep,
    /// Drop the node and join its surviving children in its place.
    Splice,
    /// Drop the node together with everything below it.
    Prune,
}

/// A node seen by [`BinaryTree::rebuild`], with the visit indices of its children.
struct Visit<T> {
    node: Node<T>,
    fate: Fate,
    left: Option<usize>,
    right: Option<usize>,
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BinaryTree<T>
where
    T: fmt::Debug,
{
    // Lists every node in pre-order. Each entry only names its children's values, so the
    // output is flat however tall the tree is.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTree")
            .field("nodes", &self.search_where(|_| true))
            .finish()
    }
}

impl<T> BinaryTree<T> {
    /// Generate a new, empty `BinaryTree`.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Generate a tree rooted at an existing node. Whatever hangs below `root` becomes part of
    /// the tree as is; its order is not checked.
    pub fn with_root(root: Node<T>) -> Self {
        Self { root: Some(root) }
    }

    /// The root node, if the tree is not empty.
    pub fn root(&self) -> Option<Node<T>> {
        self.root.clone()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Counts the nodes reachable from the root.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.visit_pre_order(|_| count += 1);
        count
    }

    /// The number of levels in the tree. An empty tree has a height of 0 and a lone root has a
    /// height of 1.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(Node<T>, usize)> = self.root.iter().map(|n| (n.clone(), 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left().map(|n| (n, depth + 1)));
            stack.extend(node.right().map(|n| (n, depth + 1)));
        }
        height
    }

    /// Inserts `value`, walking left whenever `less(value, current)` holds and right otherwise.
    /// A value equal to one already on its path is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use parent_bst::BinaryTree;
    ///
    /// let mut tree = BinaryTree::new();
    /// tree.insert(10, |a, b| a < b);
    /// tree.insert(5, |a, b| a < b);
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(*root.value(), 10);
    /// assert_eq!(root.left().map(|n| *n.value()), Some(5));
    ///
    /// // Ordering is up to the caller: this puts larger values on the left.
    /// let mut reversed = BinaryTree::new();
    /// reversed.insert_all([10, 20], |a, b| a > b);
    /// assert_eq!(reversed.root().and_then(|n| n.left()).map(|n| *n.value()), Some(20));
    /// ```
    pub fn insert<F>(&mut self, value: T, less: F)
    where
        T: PartialEq,
        F: Fn(&T, &T) -> bool,
    {
        self.attach(value, less);
    }

    /// Inserts every value in order with the same `less`. Later duplicates are no-ops.
    pub fn insert_all<I, F>(&mut self, values: I, less: F)
    where
        T: PartialEq,
        I: IntoIterator<Item = T>,
        F: Fn(&T, &T) -> bool,
    {
        let (mut inserted, mut skipped) = (0usize, 0usize);
        for value in values {
            if self.attach(value, &less) {
                inserted += 1;
            } else {
                skipped += 1;
            }
        }
        debug!(inserted, skipped, "inserted values");
    }

    /// Finds the first node equal to `value` along the ordered descent from the root. Only
    /// reliable when the tree was built with a `less` consistent with `Ord`.
    pub fn search(&self, value: &T) -> Option<Node<T>>
    where
        T: Ord,
    {
        let mut current = self.root.clone();
        while let Some(node) = current {
            current = match value.cmp(node.value()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Every node equal to `value`, wherever it sits, in pre-order.
    ///
    /// Unlike [`search`][Self::search] this does not trust the ordering, so it also finds values
    /// placed by a `less` that disagrees with `Ord`.
    pub fn search_all(&self, value: &T) -> Vec<Node<T>>
    where
        T: PartialEq,
    {
        self.search_where(|node| node.value() == value)
    }

    /// Every node for which `predicate` holds, in pre-order. The predicate sees the node itself,
    /// so it may look at the parent and children as well as the value.
    pub fn search_where<P>(&self, mut predicate: P) -> Vec<Node<T>>
    where
        P: FnMut(&Node<T>) -> bool,
    {
        let mut found = Vec::new();
        self.visit_pre_order(|node| {
            if predicate(node) {
                found.push(node.clone());
            }
        });
        found
    }

    /// Removes the node equal to `value` found by ordered descent. Deleting a missing value leaves
    /// the tree untouched.
    ///
    /// A node with a single child is replaced by that child. A node with two children is replaced
    /// by a *new* node carrying its in-order successor's value, so handles to the deleted node
    /// never start holding a different value.
    ///
    /// # Examples
    ///
    /// ```
    /// use parent_bst::BinaryTree;
    ///
    /// let mut tree = BinaryTree::new();
    /// tree.insert_all([10, 5, 15, 3, 7], |a, b| a < b);
    /// tree.delete(&5);
    ///
    /// let promoted = tree.root().and_then(|root| root.left()).unwrap();
    /// assert_eq!(*promoted.value(), 7);
    /// assert_eq!(promoted.left().map(|n| *n.value()), Some(3));
    /// assert!(promoted.right().is_none());
    /// ```
    pub fn delete(&mut self, value: &T)
    where
        T: Ord,
    {
        self.root = Self::delete_from(self.root.take(), value);
    }

    /// Removes every node equal to `value` anywhere in the tree and returns them in pre-order.
    ///
    /// The children of a removed node are filtered too and then spliced back in its place: a lone
    /// surviving subtree moves up, and when both sides survive the leftmost node of the right
    /// side takes the removed node's spot. Every surviving node keeps its identity.
    pub fn delete_all(&mut self, value: &T) -> Vec<Node<T>>
    where
        T: PartialEq,
    {
        let mut removed = Vec::new();
        self.root = Self::rebuild(
            self.root.take(),
            |node| {
                if node.value() == value {
                    Fate::Splice
                } else {
                    Fate::Keep
                }
            },
            &mut removed,
        );
        debug!(removed = removed.len(), "deleted all matching nodes");
        removed
    }

    /// Cuts off every subtree whose root satisfies `predicate` and returns those roots in
    /// pre-order. Nodes below a match are never shown to the predicate; they leave with it.
    ///
    /// The predicate always sees the tree as it was before the call; the cuts are made once
    /// every node has been visited.
    pub fn delete_where<P>(&mut self, mut predicate: P) -> Vec<Node<T>>
    where
        P: FnMut(&Node<T>) -> bool,
    {
        let mut removed = Vec::new();
        self.root = Self::rebuild(
            self.root.take(),
            |node| {
                if predicate(node) {
                    Fate::Prune
                } else {
                    Fate::Keep
                }
            },
            &mut removed,
        );
        debug!(removed = removed.len(), "pruned matching subtrees");
        removed
    }

    /// Inserts `value` and reports whether a new node was attached.
    fn attach<F>(&mut self, value: T, less: F) -> bool
    where
        T: PartialEq,
        F: Fn(&T, &T) -> bool,
    {
        let Some(mut current) = self.root.clone() else {
            trace!("inserting root");
            self.root = Some(Node::new(value));
            return true;
        };

        let mut depth = 1;
        loop {
            if value == *current.value() {
                trace!(depth, "value already present, skipping");
                return false;
            }

            let go_left = less(&value, current.value());
            let next = if go_left {
                current.left()
            } else {
                current.right()
            };

            match next {
                Some(next) => {
                    current = next;
                    depth += 1;
                }
                None => {
                    trace!(depth, left = go_left, "attaching new node");
                    let child = Some(Node::new(value));
                    if go_left {
                        current.set_left(child);
                    } else {
                        current.set_right(child);
                    }
                    return true;
                }
            }
        }
    }

    /// Calls `f` on every node: current, then left subtree, then right subtree.
    fn visit_pre_order<F>(&self, mut f: F)
    where
        F: FnMut(&Node<T>),
    {
        let mut stack: Vec<Node<T>> = self.root.iter().cloned().collect();
        while let Some(node) = stack.pop() {
            f(&node);
            // Right goes on first so the left subtree is finished before it.
            stack.extend(node.right());
            stack.extend(node.left());
        }
    }

    /// Deletes `value` from the subtree rooted at `root` and returns the new subtree root.
    fn delete_from(root: Option<Node<T>>, value: &T) -> Option<Node<T>>
    where
        T: Ord,
    {
        // The node we came from and whether we went left out of it.
        let mut parent: Option<(Node<T>, bool)> = None;
        let mut current = root.clone();

        while let Some(node) = current {
            let go_left = match value.cmp(node.value()) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => {
                    let replacement = Self::replacement(&node);
                    return match parent {
                        None => replacement,
                        Some((parent, true)) => {
                            parent.set_left(replacement);
                            root
                        }
                        Some((parent, false)) => {
                            parent.set_right(replacement);
                            root
                        }
                    };
                }
            };
            current = if go_left { node.left() } else { node.right() };
            parent = Some((node, go_left));
        }
        root
    }

    /// What takes the place of a deleted `node`.
    fn replacement(node: &Node<T>) -> Option<Node<T>>
    where
        T: Ord,
    {
        match (node.left(), node.right()) {
            (None, right) => {
                trace!("replacing deleted node with its right child");
                right
            }
            (left, None) => {
                trace!("replacing deleted node with its left child");
                left
            }
            (Some(left), Some(right)) => {
                trace!("promoting in-order successor");
                let successor = Self::leftmost(&right).shared_value();
                let promoted = Node::from_shared(Rc::clone(&successor));
                promoted.set_left(Some(left));
                promoted.set_right(Self::delete_from(Some(right), &successor));
                Some(promoted)
            }
        }
    }

    /// Decides the [`Fate`] of every node in pre-order, collecting the removed ones, then relinks
    /// the survivors bottom-up. Both passes use explicit stacks.
    fn rebuild<F>(
        root: Option<Node<T>>,
        mut fate: F,
        removed: &mut Vec<Node<T>>,
    ) -> Option<Node<T>>
    where
        F: FnMut(&Node<T>) -> Fate,
    {
        let mut visits: Vec<Visit<T>> = Vec::new();
        // Each pending node carries the slot in its parent's visit it should fill.
        let mut stack: Vec<(Node<T>, Option<(usize, bool)>)> =
            root.into_iter().map(|n| (n, None)).collect();

        while let Some((node, slot)) = stack.pop() {
            let index = visits.len();
            match slot {
                Some((parent, true)) => visits[parent].left = Some(index),
                Some((parent, false)) => visits[parent].right = Some(index),
                None => {}
            }

            let node_fate = fate(&node);
            match node_fate {
                Fate::Prune => removed.push(node.clone()),
                Fate::Splice | Fate::Keep => {
                    if let Fate::Splice = node_fate {
                        removed.push(node.clone());
                    }
                    stack.extend(node.right().map(|n| (n, Some((index, false)))));
                    stack.extend(node.left().map(|n| (n, Some((index, true)))));
                }
            }
            visits.push(Visit {
                node,
                fate: node_fate,
                left: None,
                right: None,
            });
        }

        // Children always sit after their parent in pre-order, so walking backwards finishes
        // both subtrees before the node that joins them.
        let mut rebuilt: Vec<Option<Node<T>>> = vec![None; visits.len()];
        for (index, visit) in visits.into_iter().enumerate().rev() {
            let left = visit.left.and_then(|i| rebuilt[i].take());
            let right = visit.right.and_then(|i| rebuilt[i].take());
            rebuilt[index] = match visit.fate {
                Fate::Prune => None,
                Fate::Splice => Self::splice(left, right),
                Fate::Keep => {
                    visit.node.set_left(left);
                    visit.node.set_right(right);
                    Some(visit.node)
                }
            };
        }
        rebuilt.into_iter().next().flatten()
    }

    /// Joins two subtrees that lost their common parent. When both are present the leftmost node
    /// of `right` becomes the new root.
    fn splice(left: Option<Node<T>>, right: Option<Node<T>>) -> Option<Node<T>> {
        match (left, right) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(right)) => {
                let (successor, rest) = Self::detach_leftmost(right);
                successor.set_left(Some(left));
                successor.set_right(rest);
                Some(successor)
            }
        }
    }

    /// Unhooks the leftmost node of `subtree`. Returns it along with what remains of `subtree`.
    fn detach_leftmost(subtree: Node<T>) -> (Node<T>, Option<Node<T>>) {
        let Some(mut leftmost) = subtree.left() else {
            let rest = subtree.right();
            return (subtree, rest);
        };

        let mut parent = subtree.clone();
        while let Some(next) = leftmost.left() {
            parent = leftmost;
            leftmost = next;
        }
        parent.set_left(leftmost.right());
        (leftmost, Some(subtree))
    }

    fn leftmost(node: &Node<T>) -> Node<T> {
        let mut current = node.clone();
        while let Some(next) = current.left() {
            current = next;
        }
        current
    }
}
