//! Lazy depth-first iterators over a [`QuaternaryTree`](crate::QuaternaryTree).
//!
//! All three walk an explicit stack instead of recursing, so a degenerate tree (every key in the
//! same slot) can be iterated regardless of depth.

use crate::{Link, Node, SLOTS};

/// Iterator yielding keys in preorder: node, then slots 0, 1, 2, 3.
pub struct Preorder<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Preorder<'a, K> {
    pub(crate) fn new(root: &'a Link<K>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = root {
            stack.push(root.as_ref());
        }
        Self { stack }
    }
}

impl<'a, K> Iterator for Preorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev().flatten() {
            self.stack.push(child);
        }
        Some(&node.key)
    }
}

/// Pending work for [`Inorder`] and [`Postorder`].
enum Frame<'a, K> {
    /// Expand this node's subtree.
    Visit(&'a Node<K>),
    /// Emit this node's key.
    Emit(&'a Node<K>),
}

/// Iterator yielding keys in the four-way "inorder": slot 0, node, slots 1, 2, 3.
///
/// This is not sorted order.
pub struct Inorder<'a, K> {
    stack: Vec<Frame<'a, K>>,
}

impl<'a, K> Inorder<'a, K> {
    pub(crate) fn new(root: &'a Link<K>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = root {
            stack.push(Frame::Visit(root.as_ref()));
        }
        Self { stack }
    }
}

impl<'a, K> Iterator for Inorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit(node) => return Some(&node.key),
                Frame::Visit(node) => {
                    for child in node.children[1..].iter().rev().flatten() {
                        self.stack.push(Frame::Visit(child));
                    }
                    self.stack.push(Frame::Emit(node));
                    if let Some(less) = &node.children[0] {
                        self.stack.push(Frame::Visit(less));
                    }
                }
            }
        }
        None
    }
}

/// Iterator yielding keys in postorder: slots 0, 1, 2, 3, then node.
pub struct Postorder<'a, K> {
    stack: Vec<Frame<'a, K>>,
}

impl<'a, K> Postorder<'a, K> {
    pub(crate) fn new(root: &'a Link<K>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = root {
            stack.push(Frame::Visit(root.as_ref()));
        }
        Self { stack }
    }
}

impl<'a, K> Iterator for Postorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit(node) => return Some(&node.key),
                Frame::Visit(node) => {
                    self.stack.push(Frame::Emit(node));
                    for i in (0..SLOTS).rev() {
                        if let Some(child) = &node.children[i] {
                            self.stack.push(Frame::Visit(child));
                        }
                    }
                }
            }
        }
        None
    }
}
