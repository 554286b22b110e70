//! Document Service - Lifecycle, Ledger, and History
//!
//! The main business logic layer over the injected [`DocumentStore`]:
//!
//! - Document lifecycle (get-or-create by composite key, list, save, status)
//! - Update ledger (pending → applied/rejected state machine)
//! - History log (append-only, most-recent-first snapshots)
//!
//! # Concurrency
//!
//! Each document is a single-writer resource. Every read-modify-write
//! sequence here runs behind a per-document `tokio::sync::Mutex`, so
//! concurrent callers touching the same document are serialized while
//! different documents proceed in parallel.

use crate::models::{
    composite_key, Document, DocumentContent, DocumentNode, DocumentStatus, DocumentSummary,
    HistoryEntry, Update, UpdateKind, UpdateState,
};
use crate::services::error::DocumentServiceError;
use crate::store::DocumentStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Parameters for creating (or resuming) a document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentParams {
    pub project_id: String,
    pub resource_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub blocks: Option<Vec<DocumentNode>>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Full-replace save request
///
/// `blocks` stays raw JSON so a malformed payload is rejected here with a
/// bad-request error instead of failing opaquely at the transport edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocumentRequest {
    pub blocks: Value,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Document lifecycle, update ledger, and history operations
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// The exclusive-access handle for one document id
    fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("document lock map poisoned");
        locks.entry(id.to_string()).or_default().clone()
    }

    /// Get-or-create a document for a `(project, resource)` composite key
    ///
    /// A document is created exactly once per key, on first session
    /// bootstrap; later calls return the existing record untouched.
    /// The find-then-put runs behind a lock keyed by the composite key,
    /// so concurrent bootstraps for the same key cannot both create.
    pub async fn create_document(
        &self,
        params: CreateDocumentParams,
    ) -> Result<Document, DocumentServiceError> {
        let key_lock = self.lock_for(&composite_key(&params.project_id, &params.resource_id));
        let _guard = key_lock.lock().await;

        if let Some(existing) = self
            .store
            .find_by_key(&params.project_id, &params.resource_id)
            .await?
        {
            debug!(
                document_id = %existing.id,
                "create_document resolved to existing record"
            );
            return Ok(existing);
        }

        let content = DocumentContent::new(params.blocks.unwrap_or_default(), params.metadata);
        let document = Document::new(
            params.project_id,
            params.resource_id,
            params.title,
            content,
        );
        info!(
            document_id = %document.id,
            project_id = %document.project_id,
            resource_id = %document.resource_id,
            "created document"
        );
        self.store.put(document.clone()).await?;
        Ok(document)
    }

    /// Find a document by its composite key, if it exists
    pub async fn find_by_project_resource(
        &self,
        project_id: &str,
        resource_id: &str,
    ) -> Result<Option<Document>, DocumentServiceError> {
        Ok(self.store.find_by_key(project_id, resource_id).await?)
    }

    /// Fetch a document by id
    pub async fn get_document(&self, id: &str) -> Result<Document, DocumentServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DocumentServiceError::document_not_found(id))
    }

    /// Summaries of all documents, without content or history payloads
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>, DocumentServiceError> {
        let documents = self.store.list().await?;
        Ok(documents.iter().map(DocumentSummary::from).collect())
    }

    /// Fully replace document content and append a history snapshot
    pub async fn save_document(
        &self,
        id: &str,
        request: SaveDocumentRequest,
    ) -> Result<Document, DocumentServiceError> {
        let blocks = parse_blocks(&request.blocks)?;

        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut document = self.get_document(id).await?;
        document.content = DocumentContent::new(blocks, request.metadata);
        if let Some(title) = request.title {
            document.title = Some(title);
        }

        let note = request.note.unwrap_or_else(|| "Manual save".to_string());
        let entry = HistoryEntry::snapshot(&document.content, note);
        document.updated_at = entry.timestamp;
        document.history.insert(0, entry);

        info!(document_id = %id, history_len = document.history.len(), "saved document");
        self.store.put(document.clone()).await?;
        Ok(document)
    }

    /// Most-recent-first history of a document
    pub async fn get_history(&self, id: &str) -> Result<Vec<HistoryEntry>, DocumentServiceError> {
        Ok(self.get_document(id).await?.history)
    }

    /// Currently pending updates of a document
    pub async fn get_pending_updates(
        &self,
        id: &str,
    ) -> Result<Vec<Update>, DocumentServiceError> {
        Ok(self.get_document(id).await?.pending_updates)
    }

    /// Append a fresh pending update to the document's queue
    ///
    /// This is the ledger's only creation path; the automated-collaborator
    /// integration calls it after each round trip.
    pub async fn enqueue_update(
        &self,
        id: &str,
        kind: UpdateKind,
        payload: Value,
        note: Option<String>,
    ) -> Result<Update, DocumentServiceError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut document = self.get_document(id).await?;
        let update = Update::pending(kind, payload, note);
        document.pending_updates.push(update.clone());

        debug!(
            document_id = %id,
            update_id = %update.id,
            pending = document.pending_updates.len(),
            "enqueued pending update"
        );
        self.store.put(document).await?;
        Ok(update)
    }

    /// Mark targeted updates applied and snapshot content into history
    ///
    /// `update_ids = None` targets every pending update; an explicitly
    /// empty list is a bad request. Resolution is all-or-nothing: any
    /// missing id fails the whole call. One history entry is appended iff
    /// at least one update was applied.
    pub async fn apply_updates(
        &self,
        id: &str,
        update_ids: Option<Vec<String>>,
        note: Option<String>,
    ) -> Result<Vec<Update>, DocumentServiceError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut document = self.get_document(id).await?;
        let targets = resolve_update_ids(&document, update_ids.as_deref())?;
        let now = Utc::now();

        let mut applied = Vec::new();
        document.pending_updates.retain_mut(|update| {
            if !targets.contains(&update.id) {
                return true;
            }
            update.state = UpdateState::Applied;
            update.resolved_at = Some(now);
            if note.is_some() {
                update.note = note.clone();
            }
            applied.push(update.clone());
            false
        });

        if !applied.is_empty() {
            let entry_note = note
                .clone()
                .unwrap_or_else(|| format!("Applied {} update(s)", applied.len()));
            let mut entry = HistoryEntry::snapshot(&document.content, entry_note);
            entry.timestamp = now;
            document.history.insert(0, entry);
            document.updated_at = now;
        }

        info!(document_id = %id, applied = applied.len(), "applied updates");
        self.store.put(document).await?;
        Ok(applied)
    }

    /// Mark targeted updates rejected; no history entry, content untouched
    pub async fn reject_updates(
        &self,
        id: &str,
        update_ids: Option<Vec<String>>,
        note: Option<String>,
    ) -> Result<Vec<Update>, DocumentServiceError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut document = self.get_document(id).await?;
        let targets = resolve_update_ids(&document, update_ids.as_deref())?;
        let now = Utc::now();

        let mut rejected = Vec::new();
        document.pending_updates.retain_mut(|update| {
            if !targets.contains(&update.id) {
                return true;
            }
            update.state = UpdateState::Rejected;
            update.resolved_at = Some(now);
            if note.is_some() {
                update.note = note.clone();
            }
            rejected.push(update.clone());
            false
        });

        info!(document_id = %id, rejected = rejected.len(), "rejected updates");
        self.store.put(document).await?;
        Ok(rejected)
    }

    /// Unconditionally empty the pending queue
    ///
    /// Administrative-only: no state transitions are recorded and no
    /// history entry is written.
    pub async fn clear_updates(&self, id: &str) -> Result<(), DocumentServiceError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut document = self.get_document(id).await?;
        let dropped = document.pending_updates.len();
        document.pending_updates.clear();

        warn!(document_id = %id, dropped, "cleared pending updates without audit");
        self.store.put(document).await?;
        Ok(())
    }

    /// Current status of a document
    pub async fn get_status(&self, id: &str) -> Result<DocumentStatus, DocumentServiceError> {
        Ok(self.get_document(id).await?.status)
    }

    /// Set document status from its wire name
    pub async fn set_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<Document, DocumentServiceError> {
        let status: DocumentStatus = status
            .parse()
            .map_err(DocumentServiceError::invalid_status)?;

        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut document = self.get_document(id).await?;
        document.status = status;
        document.updated_at = Utc::now();
        self.store.put(document.clone()).await?;
        Ok(document)
    }
}

/// Resolve the target ids for apply/reject
///
/// `None` means every currently pending update. An explicitly empty list is
/// a distinct bad-request condition, and any unknown id in a non-empty list
/// fails the whole resolution.
fn resolve_update_ids(
    document: &Document,
    update_ids: Option<&[String]>,
) -> Result<Vec<String>, DocumentServiceError> {
    let Some(ids) = update_ids else {
        return Ok(document
            .pending_updates
            .iter()
            .map(|update| update.id.clone())
            .collect());
    };

    if ids.is_empty() {
        return Err(DocumentServiceError::EmptyUpdateIds);
    }

    let missing: Vec<String> = ids
        .iter()
        .filter(|id| {
            !document
                .pending_updates
                .iter()
                .any(|update| &update.id == *id)
        })
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(DocumentServiceError::updates_not_found(missing));
    }

    Ok(ids.to_vec())
}

fn parse_blocks(blocks: &Value) -> Result<Vec<DocumentNode>, DocumentServiceError> {
    if !blocks.is_array() {
        return Err(DocumentServiceError::invalid_blocks(
            "blocks must be an array",
        ));
    }
    serde_json::from_value(blocks.clone())
        .map_err(|e| DocumentServiceError::invalid_blocks(e.to_string()))
}
