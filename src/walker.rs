//! Cursor and iterators over any tree that exposes a root and an order.
//!
//! Nothing here knows about heights or colors. The cursor keeps an explicit
//! ancestor stack instead of relying on parent links or recursion, and every
//! iterator owns a fresh cursor, so iterators never disturb each other.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use compare::Compare;
use crate::error::{Error, Result};
use crate::node::{Dir, Node};

/// Order in which [`foreach`](crate::OrderedMap::foreach) visits the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree (ascending keys).
    #[default]
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
}

/// A cursor over a binary search tree.
///
/// ```
/// use ordtree::{AvlTreeMap, Dir, OrderedMap};
/// let map: AvlTreeMap<_, _> = (1..=7).map(|k| (k, k * 10)).collect();
/// let mut walker = map.walker();
/// assert!(walker.goto(&6));
/// assert_eq!(walker.item(), Some((&6, &60)));
/// walker.push();
/// walker.down(Dir::Left);
/// assert_eq!(walker.key(), Some(&5));
/// assert!(walker.pop());
/// assert_eq!(walker.key(), Some(&6));
/// ```
pub struct Walker<'a, K, V, B, C> {
    root: Option<&'a Node<K, V, B>>,
    comparator: &'a C,
    node: Option<&'a Node<K, V, B>>,
    stack: Vec<Option<&'a Node<K, V, B>>>,
}

impl<'a, K, V, B, C> Walker<'a, K, V, B, C>
where
    C: Compare<K>,
{
    /// Creates a cursor positioned at the root.
    pub fn new(root: Option<&'a Node<K, V, B>>, comparator: &'a C) -> Self {
        Self {
            root,
            comparator,
            node: root,
            stack: Vec::new(),
        }
    }

    /// Moves back to the root and forgets all bookmarks.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.node = self.root;
    }

    /// Returns the key at the cursor.
    pub fn key(&self) -> Option<&'a K> {
        self.node.map(|node| &node.key)
    }

    /// Returns the value at the cursor.
    pub fn value(&self) -> Option<&'a V> {
        self.node.map(|node| &node.value)
    }

    /// Returns the key-value pair at the cursor.
    pub fn item(&self) -> Option<(&'a K, &'a V)> {
        self.node.map(|node| (&node.key, &node.value))
    }

    /// Returns the node at the cursor.
    pub fn node(&self) -> Option<&'a Node<K, V, B>> {
        self.node
    }

    /// Returns true if the cursor is on a node.
    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }

    /// Searches `key` starting from the root. Bookmarks are kept.
    ///
    /// Returns whether the key was found. If not, the cursor rests on the last
    /// node of the search path, which is the closest key on one side.
    pub fn goto(&mut self, key: &K) -> bool {
        let mut current = self.root;
        self.node = current;
        while let Some(node) = current {
            self.node = Some(node);
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Equal => return true,
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        false
    }

    /// Bookmarks the current position.
    pub fn push(&mut self) {
        self.stack.push(self.node);
    }

    /// Returns to the most recent bookmark.
    /// Returns false and leaves the cursor alone if there is none.
    pub fn pop(&mut self) -> bool {
        match self.stack.pop() {
            Some(node) => {
                self.node = node;
                true
            }
            None => false,
        }
    }

    pub fn stack_is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Descends to some leaf, preferring left children.
    pub fn goto_leaf(&mut self) {
        while let Some(node) = self.node {
            match (node.left(), node.right()) {
                (Some(left), _) => self.node = Some(left),
                (None, Some(right)) => self.node = Some(right),
                (None, None) => return,
            }
        }
    }

    pub fn has_child(&self, dir: Dir) -> bool {
        self.node.map_or(false, |node| node.link(dir).is_some())
    }

    pub fn has_left(&self) -> bool {
        self.has_child(Dir::Left)
    }

    pub fn has_right(&self) -> bool {
        self.has_child(Dir::Right)
    }

    /// Moves to the child in `dir`. Moving into an absent child invalidates the cursor.
    pub fn down(&mut self, dir: Dir) {
        self.node = self.node.and_then(|node| node.child(dir));
    }

    pub fn go_left(&mut self) {
        self.down(Dir::Left);
    }

    pub fn go_right(&mut self) {
        self.down(Dir::Right);
    }

    /// Returns the item with the next smaller key than `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if `key` is not in the tree or is its
    /// smallest key. Works in one descent: the best candidate is the last node
    /// where the search turned right, unless the found node has a left subtree.
    pub fn prev_item(&self, key: &K) -> Result<(&'a K, &'a V)> {
        self.neighbour(key, Dir::Left)
    }

    /// Returns the item with the next larger key than `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if `key` is not in the tree or is its
    /// largest key.
    pub fn succ_item(&self, key: &K) -> Result<(&'a K, &'a V)> {
        self.neighbour(key, Dir::Right)
    }

    /// Returns the item with the largest key less than or equal to `key`.
    pub fn floor_item(&self, key: &K) -> Result<(&'a K, &'a V)> {
        self.bound_node(key, Dir::Left)
            .map(Node::item)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns the item with the smallest key greater than or equal to `key`.
    pub fn ceiling_item(&self, key: &K) -> Result<(&'a K, &'a V)> {
        self.bound_node(key, Dir::Right)
            .map(Node::item)
            .ok_or(Error::KeyNotFound)
    }

    // `dir` points toward the neighbour: Left for the predecessor.
    fn neighbour(&self, key: &K, dir: Dir) -> Result<(&'a K, &'a V)> {
        let away = match dir {
            Dir::Left => Ordering::Greater,
            Dir::Right => Ordering::Less,
        };
        let mut best = None;
        let mut current = self.root;
        while let Some(node) = current {
            let ord = self.comparator.compare(key, &node.key);
            if ord == Ordering::Equal {
                break;
            }
            if ord == away {
                best = Some(node);
            }
            current = node.child(if ord == Ordering::Less {
                Dir::Left
            } else {
                Dir::Right
            });
        }
        let found = current.ok_or(Error::KeyNotFound)?;
        if let Some(mut node) = found.child(dir) {
            while let Some(next) = node.child(dir.opposite()) {
                node = next;
            }
            best = Some(node);
        }
        best.map(Node::item).ok_or(Error::KeyNotFound)
    }

    // `dir` points toward the accepted side: Left for the floor.
    fn bound_node(&self, key: &K, dir: Dir) -> Option<&'a Node<K, V, B>> {
        let mut best = None;
        let mut current = self.root;
        while let Some(node) = current {
            current = match (self.comparator.compare(key, &node.key), dir) {
                (Ordering::Equal, _) => return Some(node),
                (Ordering::Less, Dir::Left) => node.left(),
                (Ordering::Greater, Dir::Left) => {
                    best = Some(node);
                    node.right()
                }
                (Ordering::Less, Dir::Right) => {
                    best = Some(node);
                    node.left()
                }
                (Ordering::Greater, Dir::Right) => node.right(),
            };
        }
        best
    }

    // Node with the smallest key strictly greater than `key`, present or not.
    fn above(&self, key: &K) -> Option<&'a Node<K, V, B>> {
        let mut best = None;
        let mut current = self.root;
        while let Some(node) = current {
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Less => {
                    best = Some(node);
                    node.left()
                }
                Ordering::Equal | Ordering::Greater => node.right(),
            };
        }
        best
    }
}

impl<K, V, B, C> Clone for Walker<'_, K, V, B, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root,
            comparator: self.comparator,
            node: self.node,
            stack: self.stack.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B, C> fmt::Debug for Walker<'_, K, V, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Walker")
            .field("item", &self.node.map(Node::item))
            .field("depth", &self.stack.len())
            .finish()
    }
}

/// An iterator over the items of a tree, ascending or descending.
///
/// Built on a [`Walker`]: descend toward `dir` bookmarking every node, yield on
/// arrival, then step once to the other side or return to the last bookmark.
pub struct Iter<'a, K, V, B, C> {
    walker: Walker<'a, K, V, B, C>,
    dir: Dir,
    go_down: bool,
}

impl<'a, K, V, B, C> Iter<'a, K, V, B, C>
where
    C: Compare<K>,
{
    pub(crate) fn new(root: Option<&'a Node<K, V, B>>, comparator: &'a C, dir: Dir) -> Self {
        Self {
            walker: Walker::new(root, comparator),
            dir,
            go_down: true,
        }
    }

    /// Starts an ascending iteration at the first key inside `lower`.
    pub(crate) fn seek(root: Option<&'a Node<K, V, B>>, comparator: &'a C, lower: Bound<&K>) -> Self {
        let mut iter = Self::new(root, comparator, Dir::Left);
        let walker = &mut iter.walker;
        // Bookmark every node at or after the bound on the way down; the
        // last bookmark is the first node to yield.
        while let Some(node) = walker.node {
            let inside = match lower {
                Bound::Included(start) => comparator.compare(&node.key, start) != Ordering::Less,
                Bound::Excluded(start) => comparator.compare(&node.key, start) == Ordering::Greater,
                Bound::Unbounded => true,
            };
            if inside {
                walker.push();
                walker.go_left();
            } else {
                walker.go_right();
            }
        }
        walker.pop();
        iter.go_down = false;
        iter
    }
}

impl<'a, K, V, B, C> Iterator for Iter<'a, K, V, B, C>
where
    C: Compare<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let other = self.dir.opposite();
        loop {
            let node = self.walker.node?;
            if self.go_down && self.walker.has_child(self.dir) {
                self.walker.push();
                self.walker.down(self.dir);
                continue;
            }
            if self.walker.has_child(other) {
                self.walker.down(other);
                self.go_down = true;
            } else if self.walker.pop() {
                self.go_down = false;
            } else {
                self.walker.node = None;
            }
            return Some(node.item());
        }
    }
}

impl<K, V, B, C> Clone for Iter<'_, K, V, B, C> {
    fn clone(&self) -> Self {
        Self {
            walker: self.walker.clone(),
            dir: self.dir,
            go_down: self.go_down,
        }
    }
}

/// An iterator over the items whose keys fall inside a range, ascending.
///
/// The range is applied during the traversal: iteration starts at the lower
/// bound and stops at the first key past the upper bound.
pub struct Range<'a, K, V, B, C> {
    iter: Iter<'a, K, V, B, C>,
    // First node past the upper bound, if any.
    stop: Option<&'a Node<K, V, B>>,
}

impl<'a, K, V, B, C> Range<'a, K, V, B, C>
where
    C: Compare<K>,
{
    pub(crate) fn new<R>(root: Option<&'a Node<K, V, B>>, comparator: &'a C, range: R) -> Self
    where
        R: RangeBounds<K>,
    {
        let walker = Walker::new(root, comparator);
        let stop = match range.end_bound() {
            Bound::Included(end) => walker.above(end),
            Bound::Excluded(end) => walker.bound_node(end, Dir::Right),
            Bound::Unbounded => None,
        };
        let iter = Iter::seek(root, comparator, range.start_bound());
        Self { iter, stop }
    }
}

impl<'a, K, V, B, C> Iterator for Range<'a, K, V, B, C>
where
    C: Compare<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.iter.next()?;
        if let Some(stop) = self.stop {
            if self.iter.walker.comparator.compare(key, &stop.key) != Ordering::Less {
                self.iter.walker.node = None;
                self.stop = None;
                return None;
            }
        }
        Some((key, value))
    }
}

impl<K, V, B, C> Clone for Range<'_, K, V, B, C> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            stop: self.stop,
        }
    }
}

/// An iterator over keys, created from any item iterator of a tree.
#[derive(Clone)]
pub struct Keys<I>(pub(crate) I);

impl<'a, K: 'a, V: 'a, I> Iterator for Keys<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }
}

/// An iterator over values, created from any item iterator of a tree.
#[derive(Clone)]
pub struct Values<I>(pub(crate) I);

impl<'a, K: 'a, V: 'a, I> Iterator for Values<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }
}
