//! Error types for fracture partitioning

use thiserror::Error;

use crate::graph::VertexId;

/// Errors that can abort a partitioning pass
///
/// Problems local to a single tetrahedron or region (unreached corners,
/// degenerate faces, empty cells) are not errors: they are skipped and
/// reported through the pass results instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FractureError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Tetrahedral mesh input is malformed
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    /// A vertex id does not index into the point cloud
    #[error("vertex {vertex} out of range (vertex count {count})")]
    VertexOutOfRange {
        /// Offending vertex id
        vertex: VertexId,
        /// Number of vertices available
        count: usize,
    },
    /// More seeds were requested than candidate vertices exist
    #[error("requested {requested} seeds but only {available} vertices are available")]
    NotEnoughVertices {
        /// Requested seed count
        requested: usize,
        /// Number of candidate vertices
        available: usize,
    },
    /// The same vertex was given twice as a seed
    #[error("duplicate seed vertex {0}")]
    DuplicateSeed(VertexId),
    /// No seeds were given
    #[error("seed set is empty")]
    EmptySeedSet,
}

/// Result type alias for fracture operations
pub type Result<T> = std::result::Result<T, FractureError>;
