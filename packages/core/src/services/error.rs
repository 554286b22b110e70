//! Service Layer Error Types
//!
//! Error taxonomy for document operations. Not-found and bad-request
//! variants are surfaced to callers with no retry; storage failures chain
//! through `anyhow`. Collaborator failures never appear here — they are
//! absorbed at the integration boundary (see [`crate::ai`]).

use thiserror::Error;

/// Document service operation errors
#[derive(Error, Debug)]
pub enum DocumentServiceError {
    /// Unknown document id
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// Unknown block id within a document
    #[error("Block not found: {id}")]
    BlockNotFound { id: String },

    /// Explicit update-id list referenced ids that are not pending
    #[error("Updates not found: {}", ids.join(", "))]
    UpdatesNotFound { ids: Vec<String> },

    /// An explicitly empty update-id list was passed to apply/reject
    #[error("updateIds cannot be empty")]
    EmptyUpdateIds,

    /// Save payload whose blocks are not a well-formed node sequence
    #[error("Invalid blocks payload: {0}")]
    InvalidBlocks(String),

    /// Status string outside draft/published/archived
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Storage backend failure
    #[error("Store operation failed: {0}")]
    Store(#[from] anyhow::Error),
}

impl DocumentServiceError {
    /// Create a document not found error
    pub fn document_not_found(id: impl Into<String>) -> Self {
        Self::DocumentNotFound { id: id.into() }
    }

    /// Create a block not found error
    pub fn block_not_found(id: impl Into<String>) -> Self {
        Self::BlockNotFound { id: id.into() }
    }

    /// Create an updates not found error
    pub fn updates_not_found(ids: Vec<String>) -> Self {
        Self::UpdatesNotFound { ids }
    }

    /// Create an invalid blocks error
    pub fn invalid_blocks(msg: impl Into<String>) -> Self {
        Self::InvalidBlocks(msg.into())
    }

    /// Create an invalid status error
    pub fn invalid_status(status: impl Into<String>) -> Self {
        Self::InvalidStatus(status.into())
    }

    /// Whether this error maps to a not-found condition at the API edge
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound { .. }
                | Self::BlockNotFound { .. }
                | Self::UpdatesNotFound { .. }
        )
    }

    /// Whether this error maps to a bad-request condition at the API edge
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::EmptyUpdateIds | Self::InvalidBlocks(_) | Self::InvalidStatus(_)
        )
    }
}
