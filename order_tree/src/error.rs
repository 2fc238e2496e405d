use thiserror::Error;

/// Errors returned by `OrderTree` operations.
///
/// Reads never fail on a missing key, they resolve to the default value
/// instead. Everything here is deterministic: repeating a failed call with the
/// same inputs fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The node or value is not reachable from the root, e.g. a node that was
    /// already removed
    #[error("no path to the node or value exists in the tree")]
    PathNotFound,

    /// An argument that can never name anything in a tree: an empty path given
    /// to `set` or `delete`, `PNode::invalid()` given to a strict search, or a
    /// leaf literal where a tree needs a map
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A write went through a key that is missing or that holds a leaf.
    /// Writes never create intermediate branches. `depth` is the index of the
    /// offending key in the path.
    #[error("key at depth {depth} of the path does not resolve to a branch")]
    StructuralMismatch { depth: usize },

    /// The nodes being ordered are not in the same chain
    #[error("cannot compare nodes that are not in the same tree")]
    CrossTreeComparison,
}

impl Error {
    /// Returns if this is a [Error::PathNotFound]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PathNotFound)
    }
}
