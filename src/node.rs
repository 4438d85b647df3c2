//! A single tree node. A [`Node`] is a cheap, clonable handle: cloning it yields another handle
//! to the *same* node, not a copy of the subtree. Children are owned by their parent node, the
//! parent is only a back-reference.
//!
//! # Examples
//!
//! ```
//! use parent_bst::Node;
//!
//! let a = Node::new(10);
//! let b = Node::new(5);
//! let c = Node::new(15);
//!
//! a.set_left(Some(b.clone()));
//! a.set_right(Some(c.clone()));
//!
//! // Assigning a child points the child back at its new parent.
//! assert!(Node::ptr_eq(&b.parent().unwrap(), &a));
//! assert!(Node::ptr_eq(&c.parent().unwrap(), &a));
//!
//! // Detaching a child does not clear its parent.
//! a.set_left(None);
//! assert!(Node::ptr_eq(&b.parent().unwrap(), &a));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A node in a [`BinaryTree`][crate::BinaryTree]. Holds an immutable value, an optional left and
/// right child, and a non-owning link to its parent.
pub struct Node<T>(Rc<NodeData<T>>);

struct NodeData<T> {
    // Shared so a promoted in-order successor can carry the value without cloning `T`.
    value: Rc<T>,
    links: RefCell<Links<T>>,
}

struct Links<T> {
    left: Option<Node<T>>,
    right: Option<Node<T>>,
    parent: Weak<NodeData<T>>,
}

/// Manual implementation of `Clone` so handles can be cloned when `T` isn't `Clone`.
impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    // Children are shown by value only. Following them would recurse once per level, and the
    // parent is left out since it would loop back down into this node.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let links = self.0.links.borrow();
        f.debug_struct("Node")
            .field("value", self.value())
            .field("left", &links.left.as_ref().map(Node::value))
            .field("right", &links.right.as_ref().map(Node::value))
            .finish()
    }
}

impl<T> Drop for NodeData<T> {
    // Tear the subtree down with an explicit stack. A list-shaped tree would otherwise recurse
    // once per node.
    fn drop(&mut self) {
        let links = self.links.get_mut();
        let mut stack: Vec<Node<T>> = links.left.take().into_iter().collect();
        stack.extend(links.right.take());

        while let Some(Node(data)) = stack.pop() {
            // Nodes still referenced elsewhere (by the tree or a caller) are left alone.
            if let Ok(mut data) = Rc::try_unwrap(data) {
                let links = data.links.get_mut();
                stack.extend(links.left.take());
                stack.extend(links.right.take());
            }
        }
    }
}

impl<T> Node<T> {
    /// Construct a new `Node` holding `value` with no children and no parent.
    pub fn new(value: T) -> Self {
        Self::from_shared(Rc::new(value))
    }

    /// Construct a new `Node` around value storage shared with another node.
    pub(crate) fn from_shared(value: Rc<T>) -> Self {
        Self(Rc::new(NodeData {
            value,
            links: RefCell::new(Links {
                left: None,
                right: None,
                parent: Weak::new(),
            }),
        }))
    }

    /// The value stored in this node.
    pub fn value(&self) -> &T {
        &self.0.value
    }

    /// A second owner of this node's value storage.
    pub(crate) fn shared_value(&self) -> Rc<T> {
        Rc::clone(&self.0.value)
    }

    /// The left child, if any.
    pub fn left(&self) -> Option<Self> {
        self.0.links.borrow().left.clone()
    }

    /// The right child, if any.
    pub fn right(&self) -> Option<Self> {
        self.0.links.borrow().right.clone()
    }

    /// The node that last adopted this one as a child. Returns `None` for a node that was never
    /// attached, or whose former parent has since been dropped.
    ///
    /// Detaching a node never resets this, so after an excision it may name a node that no
    /// longer holds this one as a child. The link does not keep that node alive though: once
    /// nothing else owns the former parent, this returns `None`.
    ///
    /// # Examples
    ///
    /// Deleting a node with two children moves its in-order successor's value into a new node
    /// and drops the successor's old node out of the tree, still pointing at the deleted node.
    ///
    /// ```
    /// use parent_bst::{BinaryTree, Node};
    ///
    /// let mut tree = BinaryTree::new();
    /// tree.insert_all([10, 5, 15, 3, 7], |a, b| a < b);
    /// let five = tree.search(&5).unwrap();
    /// let seven = tree.search(&7).unwrap();
    ///
    /// tree.delete(&5);
    ///
    /// // The old 7 still names the deleted 5 while someone holds on to it...
    /// assert!(Node::ptr_eq(&seven.parent().unwrap(), &five));
    ///
    /// // ...and names nothing once the deleted node is gone.
    /// drop(five);
    /// assert!(seven.parent().is_none());
    /// ```
    pub fn parent(&self) -> Option<Self> {
        self.0.links.borrow().parent.upgrade().map(Self)
    }

    /// Replaces the left child. A present `child` gets `self` as its parent. The previous left
    /// child, if any, keeps its parent link.
    pub fn set_left(&self, child: Option<Self>) {
        if let Some(child) = &child {
            child.adopted_by(self);
        }
        let _previous = std::mem::replace(&mut self.0.links.borrow_mut().left, child);
    }

    /// Replaces the right child. A present `child` gets `self` as its parent. The previous right
    /// child, if any, keeps its parent link.
    pub fn set_right(&self, child: Option<Self>) {
        if let Some(child) = &child {
            child.adopted_by(self);
        }
        let _previous = std::mem::replace(&mut self.0.links.borrow_mut().right, child);
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        let links = self.0.links.borrow();
        links.left.is_none() && links.right.is_none()
    }

    /// Whether two handles refer to the same node. Two distinct nodes holding equal values are
    /// not the same node.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    fn adopted_by(&self, parent: &Self) {
        self.0.links.borrow_mut().parent = Rc::downgrade(&parent.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_detached() {
        let node = Node::new(10);

        assert_eq!(*node.value(), 10);
        assert!(node.left().is_none());
        assert!(node.right().is_none());
        assert!(node.parent().is_none());
        assert!(node.is_leaf());
    }

    #[test]
    fn values_are_generic() {
        assert_eq!(Node::new("Hola").value(), &"Hola");
        assert_eq!(*Node::new(2.5).value(), 2.5);
        assert_eq!(Node::new(String::from("abc")).value().len(), 3);
    }

    #[test]
    fn setting_children_fixes_parents() {
        let a = Node::new(10);
        let b = Node::new(5);
        let c = Node::new(15);

        a.set_left(Some(b.clone()));
        assert!(Node::ptr_eq(&b.parent().unwrap(), &a));
        assert_eq!(*b.parent().unwrap().value(), 10);

        a.set_right(Some(c.clone()));
        assert!(Node::ptr_eq(&b.parent().unwrap(), &a));
        assert!(Node::ptr_eq(&c.parent().unwrap(), &a));
        assert!(Node::ptr_eq(&a.left().unwrap(), &b));
        assert!(Node::ptr_eq(&a.right().unwrap(), &c));
        assert!(a.parent().is_none());
        assert!(!a.is_leaf());
    }

    #[test]
    fn detaching_keeps_stale_parent() {
        let a = Node::new(10);
        let b = Node::new(5);

        a.set_left(Some(b.clone()));
        a.set_left(None);

        assert!(a.left().is_none());
        assert!(Node::ptr_eq(&b.parent().unwrap(), &a));
    }

    #[test]
    fn replacing_a_child_keeps_the_old_childs_parent() {
        let a = Node::new(10);
        let old = Node::new(5);
        let new = Node::new(4);

        a.set_left(Some(old.clone()));
        a.set_left(Some(new.clone()));

        assert!(Node::ptr_eq(&a.left().unwrap(), &new));
        assert!(Node::ptr_eq(&new.parent().unwrap(), &a));
        assert!(Node::ptr_eq(&old.parent().unwrap(), &a));
    }

    #[test]
    fn reparenting_moves_the_back_link() {
        let a = Node::new(10);
        let b = Node::new(20);
        let child = Node::new(5);

        a.set_left(Some(child.clone()));
        b.set_left(Some(child.clone()));

        assert!(Node::ptr_eq(&child.parent().unwrap(), &b));
    }

    #[test]
    fn parent_is_gone_once_dropped() {
        let child = Node::new(5);
        {
            let parent = Node::new(10);
            parent.set_right(Some(child.clone()));
            assert!(child.parent().is_some());
        }

        assert!(child.parent().is_none());
    }

    #[test]
    fn clones_are_the_same_node() {
        let a = Node::new(1);
        let twin = Node::new(1);

        assert!(Node::ptr_eq(&a, &a.clone()));
        assert!(!Node::ptr_eq(&a, &twin));
    }

    #[test]
    fn dropping_a_long_chain_does_not_overflow() {
        let head = Node::new(0);
        let mut tail = head.clone();
        for i in 1..200_000 {
            let next = Node::new(i);
            tail.set_right(Some(next.clone()));
            tail = next;
        }
        drop(tail);
        drop(head);
    }

    #[test]
    fn debug_names_children_by_value() {
        let a = Node::new(2);
        a.set_left(Some(Node::new(1)));

        let printed = format!("{:?}", a);
        assert_eq!(printed, "Node { value: 2, left: Some(1), right: None }");
    }
}
