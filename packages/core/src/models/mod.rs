//! Data Models
//!
//! This module contains the core data structures used throughout Draftdoc:
//!
//! - `DocumentNode` - Tagged-variant content tree with inline marks
//! - `Document` - Persisted record: content, update queue, history log
//! - `Update` / `HistoryEntry` - Ledger and audit types

mod document;
mod node;

pub use document::{
    composite_key, Document, DocumentContent, DocumentStatus, DocumentSummary, HistoryEntry,
    Update, UpdateKind, UpdateState,
};
pub use node::{Descendants, DocumentNode, Mark, NodeError, NodeKind, NodePath};
