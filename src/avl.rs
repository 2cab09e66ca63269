//! An ordered map implemented with an AVL tree.

use std::cmp;
use std::marker::PhantomData;
use std::ptr::NonNull;

use compare::{Compare, Natural};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::node::{self, Dir, Edge, Link, LinkPtr, Node, NodePtr, Path};
use crate::ordered::OrderedMap;

/// Subtree height; an absent subtree has height 0 and a leaf height 1.
type Height = usize;

/// An ordered map implemented with an AVL tree.
///
/// For every node the heights of its two subtrees differ by at most one.
///
/// ```
/// use ordtree::{AvlTreeMap, OrderedMap};
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1).unwrap();
/// assert!(map.get(&1).is_none());
/// ```
pub struct AvlTreeMap<K, V, C = Natural<K>> {
    root: Link<K, V, Height>,
    num_nodes: usize,
    comparator: C,
    _owns: PhantomData<Box<Node<K, V, Height>>>,
}

impl<K, V, C: Compare<K>> AvlTreeMap<K, V, C> {
    /// Returns the height of the tree, 0 for an empty tree.
    pub fn height(&self) -> usize {
        height(self.root)
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        use std::cmp::Ordering;

        // Check tree nodes
        let mut num_nodes = 0;
        let mut pending: Vec<&Node<K, V, Height>> = self.root().into_iter().collect();
        while let Some(node) = pending.pop() {
            let left_height = node.left().map_or(0, |left| left.tag);
            let right_height = node.right().map_or(0, |right| right.tag);

            // Check height
            assert_eq!(node.tag, cmp::max(left_height, right_height) + 1);

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            pending.extend(node.left());
            pending.extend(node.right());
            num_nodes += 1;
        }

        // Check order
        let mut prev: Option<&K> = None;
        for (key, _) in self.iter() {
            if let Some(prev) = prev {
                assert!(self.comparator.compare(prev, key) == Ordering::Less);
            }
            prev = Some(key);
        }

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
        assert_eq!(self.iter().count(), self.num_nodes);
    }

    fn root_slot(&mut self) -> LinkPtr<K, V, Height> {
        NonNull::from(&mut self.root)
    }

    /// Splices out the node at the end of `path` and restores balance above it.
    unsafe fn unlink(&mut self, mut path: Path<K, V, Height>) -> (K, V) {
        let node_ptr = node::occupant(node::last_slot(&path));

        // Node with two children: trade places with the adjacent key on the
        // taller side and remove that node instead.
        if let (Some(left_ptr), Some(right_ptr)) = (node_ptr.as_ref().left, node_ptr.as_ref().right) {
            let side = if right_ptr.as_ref().tag >= left_ptr.as_ref().tag {
                Dir::Right
            } else {
                Dir::Left
            };
            path.push(Node::link_ptr(node_ptr, side));
            node::descend_to_edge(&mut path, side.opposite());
            Node::swap_payload(node_ptr, node::occupant(node::last_slot(&path)));
            trace!("avl: swap with {:?} neighbour at depth {}", side, path.len() - 1);
        }

        // Node is stem or leaf, unlink from tree
        let mut slot = match path.pop() {
            Some(slot) => slot,
            None => unreachable!("path is never empty"),
        };
        let victim_ptr = node::occupant(slot);
        debug_assert!(victim_ptr.as_ref().left.is_none() || victim_ptr.as_ref().right.is_none());
        *slot.as_mut() = victim_ptr.as_ref().left.or(victim_ptr.as_ref().right);
        self.num_nodes -= 1;

        // Removal may unbalance every ancestor, so walk all the way up.
        for &slot in path.iter().rev() {
            Self::rebalance_node(slot);
        }
        Node::destroy(victim_ptr)
    }

    /// Restores AVL condition (balance) at the node in `slot` if necessary and adjusts height.
    /// Resulting balance will be +1, 0 or -1 height difference between left and right subtree.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns whether rebalancing had been necessary.
    unsafe fn rebalance_node(slot: LinkPtr<K, V, Height>) -> bool {
        let node_ptr = node::occupant(slot);
        let left_height = height(node_ptr.as_ref().left);
        let right_height = height(node_ptr.as_ref().right);
        debug_assert!(left_height <= right_height + 2);
        debug_assert!(right_height <= left_height + 2);
        let heavy = if left_height > right_height + 1 {
            Dir::Left
        } else if right_height > left_height + 1 {
            Dir::Right
        } else {
            adjust_height(node_ptr);
            return false;
        };

        // Child leaning away from its parent's heavy side needs a rotation first
        let child_ptr = node::occupant(Node::link_ptr(node_ptr, heavy));
        if height(child_ptr.as_ref().link(heavy.opposite())) > height(child_ptr.as_ref().link(heavy)) {
            Self::rotate(Node::link_ptr(node_ptr, heavy), heavy);
        }
        Self::rotate(slot, heavy.opposite());
        true
    }

    unsafe fn rotate(slot: LinkPtr<K, V, Height>, dir: Dir) {
        let node_ptr = node::occupant(slot);
        let pivot_ptr = node::rotate(slot, dir);
        adjust_height(node_ptr);
        adjust_height(pivot_ptr);
        trace!("avl: rotate {:?}, subtree height {}", dir, pivot_ptr.as_ref().tag);
    }
}

fn height<K, V>(link: Link<K, V, Height>) -> Height {
    match link {
        None => 0,
        Some(node_ptr) => unsafe { node_ptr.as_ref().tag },
    }
}

fn adjust_height<K, V>(mut node_ptr: NodePtr<K, V, Height>) {
    unsafe {
        node_ptr.as_mut().tag =
            cmp::max(height(node_ptr.as_ref().left), height(node_ptr.as_ref().right)) + 1;
    }
}

impl<K, V, C: Compare<K>> OrderedMap<K, V> for AvlTreeMap<K, V, C> {
    type Tag = Height;
    type Compare = C;

    fn root(&self) -> Option<&Node<K, V, Height>> {
        self.root.map(|root_ptr| unsafe { &*root_ptr.as_ptr() })
    }

    fn comparator(&self) -> &C {
        &self.comparator
    }

    fn len(&self) -> usize {
        self.num_nodes
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut path = Vec::with_capacity(self.height() + 1);
        unsafe {
            if node::descend(self.root_slot(), &key, &self.comparator, &mut path) {
                let mut node_ptr = node::occupant(node::last_slot(&path));
                return Some(std::mem::replace(&mut node_ptr.as_mut().value, value));
            }
            let mut slot = node::last_slot(&path);
            *slot.as_mut() = Some(Node::create(key, value, 1));
            self.num_nodes += 1;

            // A single insertion needs at most one rebalance; above an
            // unchanged height nothing changes either.
            path.pop();
            for &slot in path.iter().rev() {
                let node_ptr = node::occupant(slot);
                let old_height = node_ptr.as_ref().tag;
                if Self::rebalance_node(slot) || node_ptr.as_ref().tag == old_height {
                    break;
                }
            }
        }
        None
    }

    fn remove_entry(&mut self, key: &K) -> Result<(K, V)> {
        let mut path = Vec::with_capacity(self.height() + 1);
        unsafe {
            if !node::descend(self.root_slot(), key, &self.comparator, &mut path) {
                return Err(Error::KeyNotFound);
            }
            Ok(self.unlink(path))
        }
    }

    fn remove_edge(&mut self, edge: Edge) -> Result<(K, V)> {
        if self.root.is_none() {
            return Err(Error::EmptyTree);
        }
        unsafe {
            let path = node::edge_path(self.root_slot(), edge);
            Ok(self.unlink(path))
        }
    }

    fn clear(&mut self) {
        let num_nodes = unsafe { node::destroy_all(self.root.take()) };
        debug_assert_eq!(num_nodes, self.num_nodes);
        debug!("avl: cleared {} nodes", num_nodes);
        self.num_nodes = 0;
    }
}

tree_map_common!(AvlTreeMap, Height);
