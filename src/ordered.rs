//! The ordered-map contract shared by both balancing engines.
//!
//! An engine supplies the handful of operations that touch tree shape. All
//! read paths, rank queries, range queries and the pop/bulk helpers are
//! provided here once, in terms of `root` and `comparator`.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::ops::{Bound, RangeBounds};

use compare::Compare;
use crate::error::{Error, Result};
use crate::node::{Dir, Edge, Node};
use crate::walker::{Iter, Keys, Range, TraversalOrder, Values, Walker};

/// An ordered map backed by a self-balancing binary search tree.
///
/// Search, insert, remove, predecessor and successor take O(log n).
/// Rank queries ([`item_at`](Self::item_at), [`index_of`](Self::index_of))
/// take O(n): nodes carry no subtree sizes.
///
/// ```
/// use ordtree::{OrderedMap, RbTreeMap};
/// let mut map = RbTreeMap::new();
/// for key in [34, 67, 89, 123, 3, 7, 9, 2, 0, 999] {
///     map.insert(key, key);
/// }
/// assert_eq!(map.min_item(), Ok((&0, &0)));
/// assert_eq!(map.succ_key(&9), Ok(&34));
/// assert_eq!(map.floor_key(&100), Ok(&89));
/// assert_eq!(map.pop_min(), Ok((0, 0)));
/// ```
pub trait OrderedMap<K, V> {
    /// Balance tag stored in every node.
    type Tag;
    /// Order over the keys.
    type Compare: Compare<K>;

    /// Returns the root node, if any.
    fn root(&self) -> Option<&Node<K, V, Self::Tag>>;

    /// Returns the order the tree was built with.
    fn comparator(&self) -> &Self::Compare;

    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value is returned; the tree shape does not change.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Removes a key and returns the stored key-value pair.
    fn remove_entry(&mut self, key: &K) -> Result<(K, V)>;

    /// Removes the item at a structural position.
    fn remove_edge(&mut self, edge: Edge) -> Result<(K, V)>;

    /// Removes all items.
    fn clear(&mut self);

    /// Returns true if the map contains no items.
    fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Creates a cursor positioned at the root.
    fn walker(&self) -> Walker<'_, K, V, Self::Tag, Self::Compare> {
        Walker::new(self.root(), self.comparator())
    }

    /// Searches for `key` and returns its value.
    fn get<'a>(&'a self, key: &K) -> Option<&'a V>
    where
        K: 'a,
        V: 'a,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Searches for `key` and returns the stored key-value pair.
    fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let mut walker = self.walker();
        if walker.goto(key) {
            walker.item()
        } else {
            None
        }
    }

    fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Removes a key and returns its value.
    fn remove(&mut self, key: &K) -> Result<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key if present. Returns whether it was present.
    fn discard(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_ok()
    }

    /// Returns the item with the smallest key.
    fn min_item(&self) -> Result<(&K, &V)> {
        let mut node = self.root().ok_or(Error::EmptyTree)?;
        while let Some(left) = node.left() {
            node = left;
        }
        Ok(node.item())
    }

    /// Returns the item with the largest key.
    fn max_item(&self) -> Result<(&K, &V)> {
        let mut node = self.root().ok_or(Error::EmptyTree)?;
        while let Some(right) = node.right() {
            node = right;
        }
        Ok(node.item())
    }

    fn min_key<'a>(&'a self) -> Result<&'a K>
    where
        V: 'a,
    {
        self.min_item().map(|(key, _)| key)
    }

    fn max_key<'a>(&'a self) -> Result<&'a K>
    where
        V: 'a,
    {
        self.max_item().map(|(key, _)| key)
    }

    /// Removes and returns the item with the smallest key.
    fn pop_min(&mut self) -> Result<(K, V)> {
        self.remove_edge(Edge::Min)
    }

    /// Removes and returns the item with the largest key.
    fn pop_max(&mut self) -> Result<(K, V)> {
        self.remove_edge(Edge::Max)
    }

    /// Removes and returns some item, taken from a leaf.
    fn popitem(&mut self) -> Result<(K, V)> {
        self.remove_edge(Edge::Leaf)
    }

    /// Returns the item with the next smaller key than `key`.
    ///
    /// Fails if `key` is absent or is the smallest key.
    fn prev_item(&self, key: &K) -> Result<(&K, &V)> {
        self.walker().prev_item(key)
    }

    /// Returns the item with the next larger key than `key`.
    ///
    /// Fails if `key` is absent or is the largest key.
    fn succ_item(&self, key: &K) -> Result<(&K, &V)> {
        self.walker().succ_item(key)
    }

    fn prev_key<'a>(&'a self, key: &K) -> Result<&'a K>
    where
        V: 'a,
    {
        self.prev_item(key).map(|(key, _)| key)
    }

    fn succ_key<'a>(&'a self, key: &K) -> Result<&'a K>
    where
        V: 'a,
    {
        self.succ_item(key).map(|(key, _)| key)
    }

    /// Returns the item with the largest key less than or equal to `key`.
    fn floor_item(&self, key: &K) -> Result<(&K, &V)> {
        self.walker().floor_item(key)
    }

    /// Returns the item with the smallest key greater than or equal to `key`.
    fn ceiling_item(&self, key: &K) -> Result<(&K, &V)> {
        self.walker().ceiling_item(key)
    }

    fn floor_key<'a>(&'a self, key: &K) -> Result<&'a K>
    where
        V: 'a,
    {
        self.floor_item(key).map(|(key, _)| key)
    }

    fn ceiling_key<'a>(&'a self, key: &K) -> Result<&'a K>
    where
        V: 'a,
    {
        self.ceiling_item(key).map(|(key, _)| key)
    }

    /// Gets an iterator over the items in ascending key order.
    fn iter(&self) -> Iter<'_, K, V, Self::Tag, Self::Compare> {
        Iter::new(self.root(), self.comparator(), Dir::Left)
    }

    /// Gets an iterator over the items in descending key order.
    fn iter_rev(&self) -> Iter<'_, K, V, Self::Tag, Self::Compare> {
        Iter::new(self.root(), self.comparator(), Dir::Right)
    }

    fn keys(&self) -> Keys<Iter<'_, K, V, Self::Tag, Self::Compare>> {
        Keys(self.iter())
    }

    fn values(&self) -> Values<Iter<'_, K, V, Self::Tag, Self::Compare>> {
        Values(self.iter())
    }

    /// Gets an iterator over the items whose keys lie in `range`, ascending.
    fn range<R>(&self, range: R) -> Range<'_, K, V, Self::Tag, Self::Compare>
    where
        R: RangeBounds<K>,
    {
        Range::new(self.root(), self.comparator(), range)
    }

    /// Items with `start <= key < end`; a missing bound is unbounded.
    fn item_slice(
        &self,
        start: Option<&K>,
        end: Option<&K>,
    ) -> Range<'_, K, V, Self::Tag, Self::Compare> {
        let start = start.map_or(Bound::Unbounded, Bound::Included);
        let end = end.map_or(Bound::Unbounded, Bound::Excluded);
        self.range((start, end))
    }

    fn key_slice(
        &self,
        start: Option<&K>,
        end: Option<&K>,
    ) -> Keys<Range<'_, K, V, Self::Tag, Self::Compare>> {
        Keys(self.item_slice(start, end))
    }

    fn value_slice(
        &self,
        start: Option<&K>,
        end: Option<&K>,
    ) -> Values<Range<'_, K, V, Self::Tag, Self::Compare>> {
        Values(self.item_slice(start, end))
    }

    /// Returns the item at position `index` in key order.
    /// A negative index counts from the end. O(n).
    fn item_at(&self, index: isize) -> Option<(&K, &V)> {
        let len = self.len() as isize;
        let index = if index < 0 { index + len } else { index };
        if (0..len).contains(&index) {
            self.iter().nth(index as usize)
        } else {
            None
        }
    }

    /// Returns the position of `key` in key order. O(n).
    fn index_of(&self, key: &K) -> Result<usize> {
        let comparator = self.comparator();
        self.iter()
            .take_while(|(other, _)| comparator.compare(other, key) != Ordering::Greater)
            .position(|(other, _)| comparator.compare(other, key) == Ordering::Equal)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns up to `n` items with the smallest keys, ascending.
    fn nsmallest(&self, n: usize) -> Vec<(&K, &V)> {
        self.iter().take(n).collect()
    }

    /// Returns up to `n` items with the largest keys, descending.
    fn nlargest(&self, n: usize) -> Vec<(&K, &V)> {
        self.iter_rev().take(n).collect()
    }

    /// Removes and returns up to `n` items with the smallest keys, ascending.
    fn pop_nsmallest(&mut self, n: usize) -> Vec<(K, V)> {
        let n = n.min(self.len());
        (0..n).filter_map(|_| self.pop_min().ok()).collect()
    }

    /// Removes and returns up to `n` items with the largest keys, descending.
    fn pop_nlargest(&mut self, n: usize) -> Vec<(K, V)> {
        let n = n.min(self.len());
        (0..n).filter_map(|_| self.pop_max().ok()).collect()
    }

    /// Returns the value for `key`, inserting `default` first if it is absent.
    fn setdefault<'a>(&'a mut self, key: K, default: V) -> &'a V
    where
        K: Clone + 'a,
        V: 'a,
    {
        if !self.contains_key(&key) {
            self.insert(key.clone(), default);
        }
        match self.get(&key) {
            Some(value) => value,
            None => unreachable!("key was just inserted"),
        }
    }

    /// Inserts every pair of `items`, replacing values of present keys.
    fn update<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in items {
            self.insert(key, value);
        }
    }

    /// Visits all items in the given order. Uses an explicit stack.
    fn foreach<F>(&self, order: TraversalOrder, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        match order {
            TraversalOrder::InOrder => self.iter().for_each(|(key, value)| f(key, value)),
            TraversalOrder::PreOrder => {
                let mut pending: Vec<_> = self.root().into_iter().collect();
                while let Some(node) = pending.pop() {
                    f(node.key(), node.value());
                    pending.extend(node.right());
                    pending.extend(node.left());
                }
            }
            TraversalOrder::PostOrder => {
                let mut pending = Vec::new();
                let mut current = self.root();
                let mut last_visited: Option<&Node<K, V, Self::Tag>> = None;
                while current.is_some() || !pending.is_empty() {
                    if let Some(node) = current {
                        pending.push(node);
                        current = node.left();
                        continue;
                    }
                    let Some(&node) = pending.last() else {
                        break;
                    };
                    let right = node.right();
                    if right.is_some() && !same_node(right, last_visited) {
                        current = right;
                    } else {
                        f(node.key(), node.value());
                        last_visited = pending.pop();
                    }
                }
            }
        }
    }

    /// Visits all items level by level, left to right.
    fn traverse_level_order<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        let mut queue: VecDeque<_> = self.root().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            f(node.key(), node.value());
            queue.extend(node.left());
            queue.extend(node.right());
        }
    }
}

fn same_node<K, V, B>(lhs: Option<&Node<K, V, B>>, rhs: Option<&Node<K, V, B>>) -> bool {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => std::ptr::eq(lhs, rhs),
        _ => false,
    }
}
