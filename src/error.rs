//! Errors reported by the ordered-map operations.

/// Failure of an ordered-map operation.
///
/// A failed operation leaves the tree exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The key is not in the tree, or it has no predecessor/successor.
    #[error("key not found")]
    KeyNotFound,
    /// The operation needs at least one item.
    #[error("tree is empty")]
    EmptyTree,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
