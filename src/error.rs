//! Error types for diagram operations.
//!
//! Every condition here is recoverable and local to the attempted operation:
//! a rejected mutation leaves the graph exactly as it was.

use thiserror::Error;

use crate::types::{BlockId, ConnectionId};

/// Errors raised by graph mutations and document import/export.
#[derive(Error, Debug)]
pub enum DiagramError {
    /// The target input (or the source output) already carries a connection
    #[error("connector already occupied: block {block} {connector}")]
    ConnectorOccupied { block: BlockId, connector: String },

    /// Source and target are the same block
    #[error("cannot connect block {0} to itself")]
    SelfLoop(BlockId),

    /// A handle or document index that does not resolve to a live entity
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Structurally invalid save file
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for diagram operations
pub type DiagramResult<T> = Result<T, DiagramError>;

impl DiagramError {
    pub(crate) fn missing_block(id: BlockId) -> Self {
        DiagramError::InvalidReference(format!("block {id} does not exist"))
    }

    pub(crate) fn missing_connection(id: ConnectionId) -> Self {
        DiagramError::InvalidReference(format!("connection {id} does not exist"))
    }

    /// True for the structural failures that abort a whole document load.
    pub fn is_malformed(&self) -> bool {
        matches!(self, DiagramError::MalformedDocument(_) | DiagramError::Json(_))
    }
}
