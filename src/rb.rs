//! An ordered map implemented with a red-black tree.

use std::marker::PhantomData;
use std::ptr::NonNull;

use compare::{Compare, Natural};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::node::{self, Dir, Edge, Link, LinkPtr, Node, Path};
use crate::ordered::OrderedMap;

/// Node color. Absent children count as black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// An ordered map implemented with a red-black tree.
///
/// The root is black, no red node has a red child, and every path from the
/// root down to an absent child passes the same number of black nodes.
///
/// ```
/// use ordtree::{OrderedMap, RbTreeMap};
/// let mut map = RbTreeMap::new();
/// map.insert(50, "fifty");
/// assert_eq!(map.remove(&50), Ok("fifty"));
/// assert!(map.is_empty());
/// assert_eq!(map.remove(&50), Err(ordtree::Error::KeyNotFound));
/// ```
pub struct RbTreeMap<K, V, C = Natural<K>> {
    root: Link<K, V, Color>,
    num_nodes: usize,
    comparator: C,
    _owns: PhantomData<Box<Node<K, V, Color>>>,
}

impl<K, V, C: Compare<K>> RbTreeMap<K, V, C> {
    /// Returns the number of black nodes on every path from the root to an
    /// absent child, 0 for an empty tree.
    pub fn black_height(&self) -> usize {
        let mut black_height = 0;
        let mut current = self.root();
        while let Some(node) = current {
            if node.tag == Color::Black {
                black_height += 1;
            }
            current = node.left();
        }
        black_height
    }

    /// Returns the height of the tree, 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut pending: Vec<(&Node<K, V, Color>, usize)> =
            self.root().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = pending.pop() {
            max_depth = max_depth.max(depth);
            pending.extend(node.left().map(|left| (left, depth + 1)));
            pending.extend(node.right().map(|right| (right, depth + 1)));
        }
        max_depth
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        use std::cmp::Ordering;

        // Check root color
        if let Some(root) = self.root() {
            assert_eq!(root.tag, Color::Black);
        }

        // Check colors and black heights of all paths
        let black_height = self.black_height();
        let mut num_nodes = 0;
        let mut pending: Vec<(&Node<K, V, Color>, usize)> =
            self.root().map(|root| (root, 0)).into_iter().collect();
        while let Some((node, mut blacks)) = pending.pop() {
            if node.tag == Color::Black {
                blacks += 1;
            } else {
                assert!(node.left().map_or(true, |left| left.tag == Color::Black));
                assert!(node.right().map_or(true, |right| right.tag == Color::Black));
            }
            for child in [node.left(), node.right()] {
                match child {
                    Some(child) => pending.push((child, blacks)),
                    None => assert_eq!(blacks, black_height),
                }
            }
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

    fn root_slot(&mut self) -> LinkPtr<K, V, Color> {
        NonNull::from(&mut self.root)
    }

    /// Resolves red-red violations upward from the new red node at the end of `path`.
    unsafe fn balance_after_insert(&mut self, mut path: Path<K, V, Color>) {
        loop {
            let node_slot = node::last_slot(&path);
            if path.len() < 2 {
                break;
            }
            let parent_slot = path[path.len() - 2];
            let mut parent_ptr = node::occupant(parent_slot);
            if parent_ptr.as_ref().tag == Color::Black {
                break;
            }

            // A red parent is never the root, so there is a grandparent.
            let grandparent_slot = path[path.len() - 3];
            let mut grandparent_ptr = node::occupant(grandparent_slot);
            let parent_side = node::side_of(grandparent_ptr, parent_slot);
            let uncle = grandparent_ptr.as_ref().link(parent_side.opposite());
            if let Some(mut uncle_ptr) = uncle.filter(|uncle_ptr| is_red(Some(*uncle_ptr))) {
                // Red uncle: push the red up to the grandparent
                parent_ptr.as_mut().tag = Color::Black;
                uncle_ptr.as_mut().tag = Color::Black;
                grandparent_ptr.as_mut().tag = Color::Red;
                path.truncate(path.len() - 2);
                trace!("rb: insert recolor, continue at depth {}", path.len() - 1);
                continue;
            }

            // Black uncle: inner grandchild needs a rotation first
            if node::side_of(parent_ptr, node_slot) != parent_side {
                node::rotate(parent_slot, parent_side);
                trace!("rb: insert inner rotate {:?}", parent_side);
            }
            let mut top_ptr = node::rotate(grandparent_slot, parent_side.opposite());
            top_ptr.as_mut().tag = Color::Black;
            grandparent_ptr.as_mut().tag = Color::Red;
            trace!("rb: insert rotate {:?}", parent_side.opposite());
            break;
        }
        if let Some(mut root_ptr) = self.root {
            root_ptr.as_mut().tag = Color::Black;
        }
    }

    /// Splices out the node at the end of `path` and repairs the coloring.
    unsafe fn unlink(&mut self, mut path: Path<K, V, Color>) -> (K, V) {
        let node_ptr = node::occupant(node::last_slot(&path));

        // Node with two children: trade places with the in-order successor
        // and remove that node instead.
        if node_ptr.as_ref().left.is_some() && node_ptr.as_ref().right.is_some() {
            path.push(Node::link_ptr(node_ptr, Dir::Right));
            node::descend_to_edge(&mut path, Dir::Left);
            Node::swap_payload(node_ptr, node::occupant(node::last_slot(&path)));
        }

        // Node is stem or leaf, unlink from tree
        let mut slot = match path.pop() {
            Some(slot) => slot,
            None => unreachable!("path is never empty"),
        };
        let victim_ptr = node::occupant(slot);
        let child = victim_ptr.as_ref().left.or(victim_ptr.as_ref().right);
        debug_assert!(victim_ptr.as_ref().left.is_none() || victim_ptr.as_ref().right.is_none());
        *slot.as_mut() = child;
        self.num_nodes -= 1;

        if victim_ptr.as_ref().tag == Color::Black {
            match child {
                Some(mut child_ptr) if child_ptr.as_ref().tag == Color::Red => {
                    child_ptr.as_mut().tag = Color::Black;
                }
                _ => {
                    if let Some(&parent_slot) = path.last() {
                        let side = node::side_of(node::occupant(parent_slot), slot);
                        Self::balance_after_delete(path, side);
                    }
                }
            }
        }
        Node::destroy(victim_ptr)
    }

    /// Resolves a black deficiency on the `side` subtree of the node at the end of `path`.
    unsafe fn balance_after_delete(mut path: Path<K, V, Color>, mut side: Dir) {
        while let Some(&parent_slot) = path.last() {
            let mut parent_ptr = node::occupant(parent_slot);
            let sibling_slot = Node::link_ptr(parent_ptr, side.opposite());
            let mut sibling_ptr = node::occupant(sibling_slot);

            // Case 1: red sibling, rotate it above the parent and retry
            if sibling_ptr.as_ref().tag == Color::Red {
                sibling_ptr.as_mut().tag = Color::Black;
                parent_ptr.as_mut().tag = Color::Red;
                let top_ptr = node::rotate(parent_slot, side);
                path.push(Node::link_ptr(top_ptr, side));
                trace!("rb: delete case 1, rotate {:?}", side);
                continue;
            }

            let near = sibling_ptr.as_ref().link(side);
            let far = sibling_ptr.as_ref().link(side.opposite());
            if !is_red(near) && !is_red(far) {
                sibling_ptr.as_mut().tag = Color::Red;
                if parent_ptr.as_ref().tag == Color::Red {
                    // Case 3: red parent absorbs the deficiency
                    parent_ptr.as_mut().tag = Color::Black;
                    trace!("rb: delete case 3");
                    return;
                }
                // Case 2: push the deficiency up to the parent
                path.pop();
                match path.last() {
                    Some(&grandparent_slot) => {
                        side = node::side_of(node::occupant(grandparent_slot), parent_slot);
                    }
                    None => return,
                }
                trace!("rb: delete case 2");
                continue;
            }

            // Cases 4 and 5: only the near nephew is red, turn it into the far one
            if !is_red(far) {
                if let Some(mut near_ptr) = near {
                    near_ptr.as_mut().tag = Color::Black;
                }
                sibling_ptr.as_mut().tag = Color::Red;
                sibling_ptr = node::rotate(sibling_slot, side.opposite());
                trace!("rb: delete case 4/5, rotate {:?}", side.opposite());
            }

            // Case 6: far nephew is red, rotate at the parent
            sibling_ptr.as_mut().tag = parent_ptr.as_ref().tag;
            parent_ptr.as_mut().tag = Color::Black;
            if let Some(mut far_ptr) = sibling_ptr.as_ref().link(side.opposite()) {
                far_ptr.as_mut().tag = Color::Black;
            }
            node::rotate(parent_slot, side);
            trace!("rb: delete case 6, rotate {:?}", side);
            return;
        }
    }
}

fn is_red<K, V>(link: Link<K, V, Color>) -> bool {
    match link {
        None => false,
        Some(node_ptr) => unsafe { node_ptr.as_ref().tag == Color::Red },
    }
}

impl<K, V, C: Compare<K>> OrderedMap<K, V> for RbTreeMap<K, V, C> {
    type Tag = Color;
    type Compare = C;

    fn root(&self) -> Option<&Node<K, V, Color>> {
        self.root.map(|root_ptr| unsafe { &*root_ptr.as_ptr() })
    }

    fn comparator(&self) -> &C {
        &self.comparator
    }

    fn len(&self) -> usize {
        self.num_nodes
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut path = Vec::new();
        unsafe {
            if node::descend(self.root_slot(), &key, &self.comparator, &mut path) {
                let mut node_ptr = node::occupant(node::last_slot(&path));
                return Some(std::mem::replace(&mut node_ptr.as_mut().value, value));
            }
            let mut slot = node::last_slot(&path);
            *slot.as_mut() = Some(Node::create(key, value, Color::Red));
            self.num_nodes += 1;
            self.balance_after_insert(path);
        }
        None
    }

    fn remove_entry(&mut self, key: &K) -> Result<(K, V)> {
        let mut path = Vec::new();
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
        debug!("rb: cleared {} nodes", num_nodes);
        self.num_nodes = 0;
    }
}

tree_map_common!(RbTreeMap, Color);
