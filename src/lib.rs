//! Ordered maps implemented with self-balancing binary search trees.
//!
//! Two balancing engines share one contract, [`OrderedMap`]:
//!
//! * [`AvlTreeMap`] keeps subtree heights within one of each other.
//! * [`RbTreeMap`] keeps red-black coloring rules.
//!
//! Nodes carry no parent links. Inserts and removals record the path taken
//! from the root and rebalance by walking it backwards; traversal uses a
//! [`Walker`] cursor with an explicit stack instead of recursion.
//!
//! ```
//! use ordtree::{AvlTreeMap, OrderedMap, RbTreeMap};
//!
//! let mut avl = AvlTreeMap::new();
//! let mut rb = RbTreeMap::new();
//! for key in [5, 1, 4, 2, 3] {
//!     avl.insert(key, key * 10);
//!     rb.insert(key, key * 10);
//! }
//! assert!(avl.iter().eq(rb.iter()));
//! assert_eq!(avl.range(2..4).map(|(key, _)| *key).collect::<Vec<_>>(), [2, 3]);
//! assert_eq!(rb.pop_max(), Ok((5, 50)));
//! ```

#[macro_use]
mod macros;

mod avl;
mod error;
mod node;
mod ordered;
mod rb;
mod walker;

pub use avl::AvlTreeMap;
pub use compare::{Compare, Natural};
pub use error::{Error, Result};
pub use node::{Dir, Edge, Node};
pub use ordered::OrderedMap;
pub use rb::{Color, RbTreeMap};
pub use walker::{Iter, Keys, Range, TraversalOrder, Values, Walker};

#[cfg(test)]
mod tests;
