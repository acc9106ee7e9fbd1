//! # quaternary-tree
//!
//! A four-way search tree whose children are chosen by value-relative ranges rather than a
//! plain less/greater split.
//!
//! Every node holds one key and four child slots. A key `k` arriving at a node with key `n` is
//! routed by the first of these checks that holds:
//!
//! | slot | condition        |
//! |------|------------------|
//! | 0    | `k < n`          |
//! | 1    | `k < n * 0.5`    |
//! | 2    | `k < n * 2.0`    |
//! | 3    | otherwise        |
//!
//! Because slot 0 is tested first, slot 1 only ever receives keys when `n` is negative, and
//! slot 2 only when `n` is positive.
//!
//! There is no balancing: the insertion order fully determines the shape.
//!
//! ## Example
//!
//! ```rust
//! use quaternary_tree::QuaternaryTree;
//!
//! let mut tree = QuaternaryTree::from_keys([10, 3, 20, 50, 1]);
//! assert_eq!(tree.traverse_preorder(), vec![10, 3, 1, 20, 50]);
//! assert_eq!(tree.traverse_inorder(), vec![1, 3, 10, 20, 50]);
//! assert_eq!(tree.traverse_postorder(), vec![1, 3, 50, 20, 10]);
//!
//! tree.remove(&10);
//! assert_eq!(tree.traverse_preorder(), vec![20, 3, 1, 50]);
//! ```
//!
//! ## Feature flags
//!
//! * `tracing`: emit `trace`/`debug` events for node allocation, deallocation and structural
//!   replacement.
//! * `serde`: serialize a tree as its preorder key sequence.

mod batch;
mod iter;
mod key;
#[cfg(feature = "serde")]
mod serde;

pub use batch::{BatchCount, BatchError};
pub use iter::{Inorder, Postorder, Preorder};
pub use key::Key;

use std::fmt;

// =============================================================================
// Configuration
// =============================================================================

const SLOTS: usize = 4;
const HALF_FACTOR: f64 = 0.5;
const DOUBLE_FACTOR: f64 = 2.0;

// =============================================================================
// Slots and routing
// =============================================================================

/// One of the four child positions of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// `key < node`
    Less = 0,
    /// `node <= key < node * 0.5`
    Half = 1,
    /// `node * 0.5 <= key < node * 2.0`, and `key >= node`
    Double = 2,
    /// Everything else.
    Rest = 3,
}

impl Slot {
    /// Order in which deletion looks for a subtree to take a replacement key from.
    const REPLACEMENT_PRIORITY: [Slot; SLOTS] = [Slot::Rest, Slot::Double, Slot::Half, Slot::Less];

    /// Picks the slot `key` belongs to under a node holding `node_key`.
    ///
    /// The checks run in slot order and the first match wins; the scaled thresholds are not
    /// reordered or simplified.
    #[inline]
    pub fn route<K: Key>(key: &K, node_key: &K) -> Slot {
        if key < node_key {
            Slot::Less
        } else if key.lt_scaled(node_key, HALF_FACTOR) {
            Slot::Half
        } else if key.lt_scaled(node_key, DOUBLE_FACTOR) {
            Slot::Double
        } else {
            Slot::Rest
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// Nodes
// =============================================================================

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    children: [Link<K>; SLOTS],
}

impl<K> Node<K> {
    fn new(key: K) -> Self {
        Self {
            key,
            children: [None, None, None, None],
        }
    }

    #[inline]
    fn child(&self, slot: Slot) -> &Link<K> {
        &self.children[slot.index()]
    }

    #[inline]
    fn child_mut(&mut self, slot: Slot) -> &mut Link<K> {
        &mut self.children[slot.index()]
    }

    /// First non-empty slot in deletion priority order (3, 2, 1, 0), with its subtree.
    fn replacement_source(&self) -> Option<(Slot, &Node<K>)> {
        Slot::REPLACEMENT_PRIORITY
            .into_iter()
            .find_map(|slot| self.child(slot).as_deref().map(|subtree| (slot, subtree)))
    }

    /// Leftmost node of this subtree, following slot 0 until it is empty.
    fn find_min(&self) -> &Node<K> {
        let mut node = self;
        while let Some(less) = node.child(Slot::Less) {
            node = less;
        }
        node
    }
}

/// A node detached from the tree while a removal walks back up its routing path.
struct RemoveFrame<K> {
    node: Box<Node<K>>,
    /// Child slot the next level down gets linked back into.
    slot: Slot,
    /// Index of the key this node is checked against on the way up, or `None` once its key
    /// was overwritten by a structural replacement.
    target: Option<usize>,
}

// =============================================================================
// Tree
// =============================================================================

/// A four-way search tree with value-relative slot routing.
///
/// Features:
/// - Keys may repeat; every insert allocates a node
/// - Deletion by structural replacement from the highest non-empty slot
/// - Preorder, four-way inorder and postorder traversal, both materialized and lazy
pub struct QuaternaryTree<K> {
    root: Link<K>,
    /// Live node count.
    count: usize,
}

impl<K> QuaternaryTree<K> {
    pub fn new() -> Self {
        Self {
            root: None,
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        Self::drop_subtree(self.root.take());
        self.count = 0;
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut stack: Vec<(&Node<K>, usize)> = Vec::new();
        if let Some(root) = &self.root {
            stack.push((root.as_ref(), 1));
        }

        let mut height = 0;
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in node.children.iter().flatten() {
                stack.push((child.as_ref(), depth + 1));
            }
        }
        height
    }

    pub fn preorder(&self) -> Preorder<'_, K> {
        Preorder::new(&self.root)
    }

    pub fn inorder(&self) -> Inorder<'_, K> {
        Inorder::new(&self.root)
    }

    pub fn postorder(&self) -> Postorder<'_, K> {
        Postorder::new(&self.root)
    }

    /// Frees a subtree without recursing, so arbitrarily deep chains are safe to drop.
    fn drop_subtree(link: Link<K>) {
        let mut stack: Vec<Box<Node<K>>> = link.into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.iter_mut().filter_map(Option::take));
        }
    }
}

impl<K: Key> QuaternaryTree<K> {
    /// Builds a tree by inserting `keys` one at a time, in order.
    pub fn from_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut tree = Self::new();
        tree.insert_batch(keys);
        tree
    }

    /// Inserts `key`. Never fails; equal keys get their own node.
    pub fn insert(&mut self, key: K) {
        let mut link = &mut self.root;
        while let Some(node) = link {
            let slot = Slot::route(&key, &node.key);
            link = node.child_mut(slot);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(count = self.count + 1, "insert: node allocated");

        *link = Some(Box::new(Node::new(key)));
        self.count += 1;
    }

    /// Inserts every key in order. Equivalent to calling [`insert`](Self::insert) repeatedly.
    pub fn insert_batch<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }

    /// Inserts exactly `count` keys taken from `keys`.
    ///
    /// If `keys` runs out early, nothing is inserted and [`BatchError::Truncated`] is returned.
    /// Keys past `count` are not consumed.
    pub fn insert_counted<I: IntoIterator<Item = K>>(
        &mut self,
        count: BatchCount,
        keys: I,
    ) -> Result<(), BatchError> {
        let expected = count.get();
        let batch: Vec<K> = keys.into_iter().take(expected).collect();
        if batch.len() < expected {
            return Err(BatchError::Truncated {
                expected,
                got: batch.len(),
            });
        }
        self.insert_batch(batch);
        Ok(())
    }

    /// Removes `key`. Does nothing when it is absent.
    ///
    /// Every node on `key`'s routing path that holds an equal key is removed, so duplicates that
    /// were inserted along the same path all go at once.
    pub fn remove(&mut self, key: &K) {
        let mut freed = 0;
        self.root = Self::remove_from(self.root.take(), key, &mut freed);
        self.count -= freed;
    }

    /// Takes ownership of a subtree, removes `key` from it and hands back the new subtree root.
    ///
    /// The routing path is detached into `path` on the way down and re-linked on the way up. A
    /// structural replacement starts a nested removal of the replacement key below the replaced
    /// node, pushed onto `targets`.
    fn remove_from(link: Link<K>, key: &K, freed: &mut usize) -> Link<K> {
        let mut path: Vec<RemoveFrame<K>> = Vec::new();
        let mut targets: Vec<K> = vec![key.clone()];
        Self::detach_path(link, key, 0, &mut path);

        // Subtree returned by the level below, to be linked back into its parent.
        let mut carry: Link<K> = None;
        while let Some(RemoveFrame {
            mut node,
            slot,
            target,
        }) = path.pop()
        {
            *node.child_mut(slot) = carry;

            if let Some(target) = target {
                // Nested removals started below this node are finished.
                targets.truncate(target + 1);
            }
            if !target.is_some_and(|target| targets[target] == node.key) {
                carry = Some(node);
                continue;
            }

            let Some((source, replacement)) = node
                .replacement_source()
                .map(|(source, subtree)| (source, subtree.find_min().key.clone()))
            else {
                #[cfg(feature = "tracing")]
                tracing::trace!("remove: leaf deallocated");

                *freed += 1;
                carry = None;
                continue;
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(?source, "remove: structural replacement");

            node.key = replacement.clone();
            let subtree = node.child_mut(source).take();
            path.push(RemoveFrame {
                node,
                slot: source,
                target: None,
            });
            targets.push(replacement);
            let nested = targets.len() - 1;
            Self::detach_path(subtree, &targets[nested], nested, &mut path);
            carry = None;
        }
        carry
    }

    /// Moves every node on `key`'s routing path out of the tree and onto `path`, top first.
    fn detach_path(mut link: Link<K>, key: &K, target: usize, path: &mut Vec<RemoveFrame<K>>) {
        while let Some(mut node) = link {
            let slot = Slot::route(key, &node.key);
            link = node.child_mut(slot).take();
            path.push(RemoveFrame {
                node,
                slot,
                target: Some(target),
            });
        }
    }

    /// Whether some node on `key`'s routing path holds an equal key.
    ///
    /// These are exactly the nodes [`remove`](Self::remove) would act on.
    pub fn contains(&self, key: &K) -> bool {
        let mut link = &self.root;
        while let Some(node) = link {
            if *key == node.key {
                return true;
            }
            link = node.child(Slot::route(key, &node.key));
        }
        false
    }

    pub fn traverse_preorder(&self) -> Vec<K> {
        self.preorder().cloned().collect()
    }

    pub fn traverse_inorder(&self) -> Vec<K> {
        self.inorder().cloned().collect()
    }

    pub fn traverse_postorder(&self) -> Vec<K> {
        self.postorder().cloned().collect()
    }
}

impl<K> Default for QuaternaryTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for QuaternaryTree<K> {
    fn clone(&self) -> Self {
        let mut root: Link<K> = self
            .root
            .as_ref()
            .map(|node| Box::new(Node::new(node.key.clone())));

        let mut stack: Vec<(&Node<K>, &mut Node<K>)> = Vec::new();
        if let (Some(src), Some(dst)) = (&self.root, &mut root) {
            stack.push((src.as_ref(), dst.as_mut()));
        }
        while let Some((src, dst)) = stack.pop() {
            for (src_child, dst_child) in src.children.iter().zip(dst.children.iter_mut()) {
                if let Some(src_child) = src_child {
                    let dst_child = dst_child.insert(Box::new(Node::new(src_child.key.clone())));
                    stack.push((src_child.as_ref(), dst_child.as_mut()));
                }
            }
        }

        Self {
            root,
            count: self.count,
        }
    }
}

/// Same shape and equal keys in every position.
impl<K: PartialEq> PartialEq for QuaternaryTree<K> {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count {
            return false;
        }

        let mut stack: Vec<(&Link<K>, &Link<K>)> = vec![(&self.root, &other.root)];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    if a.key != b.key {
                        return false;
                    }
                    stack.extend(a.children.iter().zip(b.children.iter()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl<K> Drop for QuaternaryTree<K> {
    fn drop(&mut self) {
        Self::drop_subtree(self.root.take());
    }
}

impl<K: Key> FromIterator<K> for QuaternaryTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

impl<K: Key> Extend<K> for QuaternaryTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.insert_batch(iter);
    }
}

impl<K: fmt::Debug> fmt::Debug for QuaternaryTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.preorder()).finish()
    }
}


#[cfg(test)]
mod proptests;
