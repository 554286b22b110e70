//! Draftdoc Core Business Logic Layer
//!
//! This crate provides the document model, block addressing, markdown
//! codec, and update-review workflow behind a structured-text editor whose
//! content is edited both by people and by an automated collaborator.
//!
//! # Architecture
//!
//! - **Stable block identity**: every addressable block carries a
//!   `block_<8 hex>` id assigned by a post-mutation reconciliation pass
//! - **Marker-carrying markdown**: serialization embeds ids as hidden
//!   comment lines so text round trips keep addressing intact
//! - **Propose/commit workflow**: automated edits land as pending ledger
//!   updates and only reach the document through operator apply
//! - **Append-only history**: every save and apply snapshots content
//!
//! # Modules
//!
//! - [`models`] - Data structures (DocumentNode, Document, Update, ...)
//! - [`blocks`] - Identity assignment and block lookup
//! - [`markdown`] - Serializer/parser pair with identity markers
//! - [`store`] - Document repository abstraction and in-memory store
//! - [`services`] - Document lifecycle, update ledger, sessions
//! - [`ai`] - Automated collaborator contract and integration

pub mod ai;
pub mod blocks;
pub mod markdown;
pub mod models;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use ai::{AiConfig, AiService, CollaboratorClient};
pub use blocks::BlockIdAssigner;
pub use models::{Document, DocumentContent, DocumentNode, Update};
pub use services::{DocumentService, DocumentServiceError, SessionService};
pub use store::{DocumentStore, MemoryStore};
