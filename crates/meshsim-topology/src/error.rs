//! Error types for meshsim-topology.

use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or reading a topology.
///
/// The validation variants render as the notice shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Existing mode with no file chosen
    #[error("Please select an existing topology first.")]
    NoTopologySelected,

    /// Paste mode with blank text
    #[error("Paste your YAML first.")]
    EmptyDescriptor,

    /// Pasted text declares too many nodes
    #[error("Custom YAML may not exceed {limit} nodes.")]
    PastedTooLarge { count: usize, limit: usize },

    /// Form node count is not a positive integer
    #[error("Select the number of nodes first.")]
    InvalidNodeCount(String),

    /// Rendered form sections disagree with the declared count
    #[error("Please match the # of nodes with your form entries.")]
    SectionMismatch { expected: usize, actual: usize },

    /// A form section has a blank identifier (1-based position)
    #[error("Node {position} needs a valid ID.")]
    EmptyNodeId { position: usize },

    /// Form topology has too many nodes
    #[error("Topology exceed {limit} nodes (limit).")]
    TooManyNodes { count: usize, limit: usize },

    /// Descriptor text could not be parsed
    #[error("invalid topology descriptor: {0}")]
    Parse(String),

    /// Descriptor could not be serialized
    #[error("failed to serialize topology descriptor: {0}")]
    Serialize(String),
}

impl Error {
    /// Whether this error is an input validation failure.
    ///
    /// Validation failures are detected before any network call is made.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Error::Parse(_) | Error::Serialize(_))
    }
}
