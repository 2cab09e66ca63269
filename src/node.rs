//! Tree nodes and the link plumbing shared by both balancing engines.
//!
//! Nodes own their children through raw links; the tree owns the root link.
//! There are no parent links. Algorithms that need to move upward record the
//! slots they passed through on the way down (a `Path`) and walk it backwards.

use std::cmp::Ordering;
use std::ptr::NonNull;

use compare::Compare;

/// Child direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Left = 0,
    Right = 1,
}

impl Dir {
    /// Returns the other direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Structural positions an item can be popped from without naming its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// The item with the smallest key.
    Min,
    /// The item with the largest key.
    Max,
    /// Any item stored in a leaf node.
    Leaf,
}

/// A key/value cell with two child links and one balance tag.
///
/// The tag is the subtree height for AVL trees and the color for red-black
/// trees. Nodes are only ever handed out by shared reference.
pub struct Node<K, V, B> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V, B>,
    pub(crate) right: Link<K, V, B>,
    pub(crate) tag: B,
}

pub(crate) type NodePtr<K, V, B> = NonNull<Node<K, V, B>>;
pub(crate) type Link<K, V, B> = Option<NodePtr<K, V, B>>;
pub(crate) type LinkPtr<K, V, B> = NonNull<Link<K, V, B>>;

/// Slots visited on the way down from the root, root slot first.
pub(crate) type Path<K, V, B> = Vec<LinkPtr<K, V, B>>;

impl<K, V, B> Node<K, V, B> {
    /// Returns the key of this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value of this node.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the key-value pair of this node.
    pub fn item(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Returns the balance tag: subtree height (leaf = 1) or color.
    pub fn tag(&self) -> &B {
        &self.tag
    }

    /// Returns the child in the given direction.
    pub fn child(&self, dir: Dir) -> Option<&Self> {
        // Children are owned by this node and live at least as long as it does.
        self.link(dir).map(|child_ptr| unsafe { &*child_ptr.as_ptr() })
    }

    pub fn left(&self) -> Option<&Self> {
        self.child(Dir::Left)
    }

    pub fn right(&self) -> Option<&Self> {
        self.child(Dir::Right)
    }

    pub(crate) fn create(key: K, value: V, tag: B) -> NodePtr<K, V, B> {
        let boxed = Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            tag,
        });
        unsafe { NodePtr::new_unchecked(Box::into_raw(boxed)) }
    }

    /// Frees a node that has already been unlinked and hands back its payload.
    pub(crate) unsafe fn destroy(node_ptr: NodePtr<K, V, B>) -> (K, V) {
        let boxed = Box::from_raw(node_ptr.as_ptr());
        (boxed.key, boxed.value)
    }

    #[inline]
    pub(crate) fn link(&self, dir: Dir) -> Link<K, V, B> {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, dir: Dir) -> &mut Link<K, V, B> {
        match dir {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }

    /// Returns a pointer to the child slot of the given node.
    #[inline]
    pub(crate) unsafe fn link_ptr(mut node_ptr: NodePtr<K, V, B>, dir: Dir) -> LinkPtr<K, V, B> {
        NonNull::from(node_ptr.as_mut().link_mut(dir))
    }

    /// Exchanges key and value of two distinct nodes, leaving links and tags alone.
    pub(crate) unsafe fn swap_payload(mut lhs: NodePtr<K, V, B>, mut rhs: NodePtr<K, V, B>) {
        debug_assert!(lhs != rhs);
        let lhs = lhs.as_mut();
        let rhs = rhs.as_mut();
        std::mem::swap(&mut lhs.key, &mut rhs.key);
        std::mem::swap(&mut lhs.value, &mut rhs.value);
    }
}

/// Returns the node stored in a slot that is known to be occupied.
#[inline]
pub(crate) unsafe fn occupant<K, V, B>(slot: LinkPtr<K, V, B>) -> NodePtr<K, V, B> {
    match *slot.as_ref() {
        Some(node_ptr) => node_ptr,
        None => unreachable!("slot on the path is empty"),
    }
}

/// Returns the last slot of a path.
#[inline]
pub(crate) fn last_slot<K, V, B>(path: &Path<K, V, B>) -> LinkPtr<K, V, B> {
    match path.last() {
        Some(&slot) => slot,
        None => unreachable!("path is never empty"),
    }
}

/// Returns on which side of `parent` the slot `child_slot` lives.
#[inline]
pub(crate) unsafe fn side_of<K, V, B>(
    parent_ptr: NodePtr<K, V, B>,
    child_slot: LinkPtr<K, V, B>,
) -> Dir {
    if Node::link_ptr(parent_ptr, Dir::Left) == child_slot {
        Dir::Left
    } else {
        debug_assert!(Node::link_ptr(parent_ptr, Dir::Right) == child_slot);
        Dir::Right
    }
}

/// Rotates the subtree stored in `slot`.
///
/// Rotating left lifts the right child into the slot, rotating right lifts the
/// left child. Returns the lifted node. Balance tags are left for the caller.
///
/// ```text
///      Left rotation:          Right rotation:
///         B                           D
///        / \                         / \
///       A   D                       B   E
///          / \                     / \
///         C   E                   A   C
///      becomes:                becomes:
///           D                     B
///          / \                   / \
///         B   E                 A   D
///        / \                       / \
///       A   C                     C   E
/// ```
pub(crate) unsafe fn rotate<K, V, B>(mut slot: LinkPtr<K, V, B>, dir: Dir) -> NodePtr<K, V, B> {
    let mut node_ptr = occupant(slot);
    let mut pivot_ptr = match node_ptr.as_ref().link(dir.opposite()) {
        Some(pivot_ptr) => pivot_ptr,
        None => unreachable!("rotation without pivot"),
    };
    *node_ptr.as_mut().link_mut(dir.opposite()) = pivot_ptr.as_ref().link(dir);
    *pivot_ptr.as_mut().link_mut(dir) = Some(node_ptr);
    *slot.as_mut() = Some(pivot_ptr);
    pivot_ptr
}

/// Descends from `root_slot` toward `key`, recording every slot on the way.
///
/// Returns whether the key was found. Either way the last recorded slot is the
/// one that holds (or would hold) the key.
pub(crate) unsafe fn descend<K, V, B, C>(
    root_slot: LinkPtr<K, V, B>,
    key: &K,
    comparator: &C,
    path: &mut Path<K, V, B>,
) -> bool
where
    C: Compare<K>,
{
    path.push(root_slot);
    let mut current = *root_slot.as_ref();
    while let Some(node_ptr) = current {
        let dir = match comparator.compare(key, &node_ptr.as_ref().key) {
            Ordering::Equal => return true,
            Ordering::Less => Dir::Left,
            Ordering::Greater => Dir::Right,
        };
        path.push(Node::link_ptr(node_ptr, dir));
        current = node_ptr.as_ref().link(dir);
    }
    false
}

/// Extends a path that ends at an occupied slot down to the outermost node in `dir`.
pub(crate) unsafe fn descend_to_edge<K, V, B>(path: &mut Path<K, V, B>, dir: Dir) {
    let mut node_ptr = occupant(last_slot(path));
    while let Some(child_ptr) = node_ptr.as_ref().link(dir) {
        path.push(Node::link_ptr(node_ptr, dir));
        node_ptr = child_ptr;
    }
}

/// Extends a path that ends at an occupied slot down to some leaf node.
pub(crate) unsafe fn descend_to_leaf<K, V, B>(path: &mut Path<K, V, B>) {
    let mut node_ptr = occupant(last_slot(path));
    loop {
        let (dir, child_ptr) = match (node_ptr.as_ref().left, node_ptr.as_ref().right) {
            (Some(left_ptr), _) => (Dir::Left, left_ptr),
            (None, Some(right_ptr)) => (Dir::Right, right_ptr),
            (None, None) => return,
        };
        path.push(Node::link_ptr(node_ptr, dir));
        node_ptr = child_ptr;
    }
}

/// Builds the path to the node that `edge` designates in a non-empty tree.
pub(crate) unsafe fn edge_path<K, V, B>(root_slot: LinkPtr<K, V, B>, edge: Edge) -> Path<K, V, B> {
    let mut path = vec![root_slot];
    match edge {
        Edge::Min => descend_to_edge(&mut path, Dir::Left),
        Edge::Max => descend_to_edge(&mut path, Dir::Right),
        Edge::Leaf => descend_to_leaf(&mut path),
    }
    path
}

/// Frees every node reachable from `root` and returns how many there were.
///
/// Uses an explicit stack, so stack usage does not depend on the tree shape.
pub(crate) unsafe fn destroy_all<K, V, B>(root: Link<K, V, B>) -> usize {
    let mut num_nodes = 0;
    let mut pending: Vec<NodePtr<K, V, B>> = root.into_iter().collect();
    while let Some(node_ptr) = pending.pop() {
        let boxed = Box::from_raw(node_ptr.as_ptr());
        pending.extend(boxed.left);
        pending.extend(boxed.right);
        num_nodes += 1;
    }
    num_nodes
}
