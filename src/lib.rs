//! An order-customizable Binary Search Tree (BST) whose nodes keep track of their parents.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! ## This tree
//!
//! What "less than" means is up to the caller: every [`BinaryTree::insert`] takes its own
//! `less` predicate. Ordered [`search`][BinaryTree::search] and [`delete`][BinaryTree::delete]
//! use `T`'s [`Ord`] instead, so they only behave like a classic BST when the two agree. The
//! `*_all` and `*_where` variants visit every node in pre-order and don't depend on ordering at
//! all.
//!
//! The tree never rebalances. Its shape is whatever the insertion order makes it, so inserting
//! sorted values yields a list.
//!
//! Every [`Node`] knows its parent. Attaching a node as a child points it at its new parent;
//! detaching it does not, so a node removed from the tree may still name its old parent.
//!
//! ```
//! use parent_bst::{BinaryTree, Node};
//!
//! let mut tree = BinaryTree::new();
//! tree.insert_all([10, 5, 15, 3, 7], |a, b| a < b);
//!
//! let five = tree.search(&5).unwrap();
//! let root = five.parent().unwrap();
//! assert!(Node::ptr_eq(&root, &tree.root().unwrap()));
//!
//! let removed = tree.delete_where(|n| *n.value() == 15);
//! assert_eq!(removed.len(), 1);
//! assert!(root.right().is_none());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod node;
pub mod tree;

pub use node::Node;
pub use tree::BinaryTree;
