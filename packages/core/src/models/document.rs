//! Document, Update, and History Models
//!
//! A `Document` is the unit of persistence: tree content plus metadata, the
//! pending-update queue, and the append-only history log. Documents are
//! addressed either by their opaque id or by the case-insensitive
//! `(project_id, resource_id)` composite key.

use crate::models::node::DocumentNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Publication status of a document
///
/// Documents are never deleted; retirement is expressed as `Archived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Published => "published",
            DocumentStatus::Archived => "archived",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(DocumentStatus::Draft),
            "published" => Ok(DocumentStatus::Published),
            "archived" => Ok(DocumentStatus::Archived),
            other => Err(other.to_string()),
        }
    }
}

/// The edit operation shape an update proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateKind {
    Insert,
    Rewrite,
    Delete,
}

/// Lifecycle state of an update
///
/// Transitions only through the ledger: `Pending` to exactly one of
/// `Applied` or `Rejected`, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateState {
    Pending,
    Applied,
    Rejected,
}

/// A proposed edit queued for operator review
///
/// Created only by the automated-collaborator integration path; the payload
/// is opaque JSON whose shape depends on `kind` (rewrite:
/// `{blockId, content, oldContent}`, insert: `{insertAfter, content}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub payload: Value,
    pub state: UpdateState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Update {
    /// Create a fresh pending update
    pub fn pending(kind: UpdateKind, payload: Value, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            payload,
            state: UpdateState::Pending,
            note,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }
}

/// An immutable snapshot of document content at a point in time
///
/// Once created an entry is never mutated; the snapshot is a structural
/// deep copy independent of later tree edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub content: DocumentContent,
}

impl HistoryEntry {
    /// Snapshot `content` now with the given note
    pub fn snapshot(content: &DocumentContent, note: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            note: Some(note.into()),
            content: content.clone(),
        }
    }
}

/// Tree content plus free-form metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    /// Top-level block nodes, in document order
    #[serde(default)]
    pub blocks: Vec<DocumentNode>,
    #[serde(default = "empty_object")]
    pub metadata: Value,
}

fn empty_object() -> Value {
    json!({})
}

impl Default for DocumentContent {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            metadata: empty_object(),
        }
    }
}

impl DocumentContent {
    pub fn new(blocks: Vec<DocumentNode>, metadata: Option<Value>) -> Self {
        Self {
            blocks,
            metadata: metadata.unwrap_or_else(empty_object),
        }
    }

    /// View the blocks as a single rooted tree for codec and locator use
    pub fn as_tree(&self) -> DocumentNode {
        DocumentNode::doc(self.blocks.clone())
    }
}

/// The persisted document record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub project_id: String,
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: DocumentStatus,
    pub content: DocumentContent,
    #[serde(default)]
    pub pending_updates: Vec<Update>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a new draft document with an initial history snapshot
    pub fn new(
        project_id: impl Into<String>,
        resource_id: impl Into<String>,
        title: Option<String>,
        content: DocumentContent,
    ) -> Self {
        let now = Utc::now();
        let history = vec![HistoryEntry::snapshot(&content, "Document created")];
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            resource_id: resource_id.into(),
            title: Some(title.unwrap_or_else(|| "Untitled".to_string())),
            status: DocumentStatus::Draft,
            content,
            pending_updates: Vec::new(),
            history,
            created_at: now,
            updated_at: now,
        }
    }

    /// The lowercased composite lookup key for this document
    pub fn composite_key(&self) -> String {
        composite_key(&self.project_id, &self.resource_id)
    }
}

/// Build the case-insensitive `(project, resource)` lookup key
pub fn composite_key(project_id: &str, resource_id: &str) -> String {
    format!("{}::{}", project_id, resource_id).to_lowercase()
}

/// Listing projection of a document, without content or history payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub project_id: String,
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            project_id: document.project_id.clone(),
            resource_id: document.resource_id.clone(),
            title: document.title.clone(),
            status: document.status,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}
