//! DocumentStore Trait - Persistence Abstraction
//!
//! Abstracts document CRUD behind an async trait so the service layer can
//! run against the bundled in-memory store or a durable engine without
//! change. Methods take and return whole `Document` values; read-modify-
//! write sequencing is the service layer's responsibility.

use crate::models::Document;
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction layer for document persistence operations
///
/// Implementations must be `Send + Sync`; all methods are async to admit
/// network-backed stores.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    async fn get(&self, id: &str) -> Result<Option<Document>>;

    /// Fetch a document by its case-insensitive `(project, resource)` key
    ///
    /// The composite key resolves to at most one document.
    async fn find_by_key(&self, project_id: &str, resource_id: &str) -> Result<Option<Document>>;

    /// All documents, in no guaranteed order
    async fn list(&self) -> Result<Vec<Document>>;

    /// Insert or fully replace a document record
    async fn put(&self, document: Document) -> Result<()>;

    /// Remove a document; returns whether anything was removed
    ///
    /// The core never deletes documents (archival is a status change); this
    /// exists for administrative tooling and tests.
    async fn delete(&self, id: &str) -> Result<bool>;
}
