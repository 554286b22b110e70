//! Collaborator Contract
//!
//! Request/response shapes and the client trait for the automated
//! collaborator that proposes document edits. Transport is deliberately
//! out of scope: the core only depends on this trait, and the hosting
//! application supplies an implementation (HTTP, in-process model, mock).

use crate::models::{DocumentContent, UpdateKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Collaborator round-trip failures
///
/// These never surface to the editing workflow as hard errors; the
/// integration layer converts them into placeholder pending updates or
/// fallback messages.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Collaborator request timed out")]
    Timeout,

    #[error("Collaborator transport failed: {0}")]
    Transport(String),

    #[error("Collaborator returned an unusable response: {0}")]
    BadResponse(String),
}

/// rewrite-block request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteBlockRequest {
    pub block_id: String,
    pub content: String,
    pub instruction: String,
    pub context: String,
}

/// rewrite-block response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteBlockResponse {
    pub new_content: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
}

/// insert-block request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertBlockRequest {
    pub insert_after: String,
    pub instruction: String,
    pub context: String,
}

/// insert-block response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertBlockResponse {
    pub new_content: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// An edit the collaborator proposes alongside a chat or improve reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedUpdate {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub payload: Value,
    #[serde(default)]
    pub note: Option<String>,
}

/// chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Serialized document content, as the collaborator expects it
    pub document_content: String,
    pub message: String,
    #[serde(default)]
    pub selected_block_id: Option<String>,
    pub document_info: String,
}

/// chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    #[serde(default)]
    pub updates: Vec<ProposedUpdate>,
}

/// improve-article request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveArticleRequest {
    pub document_id: String,
    pub content: DocumentContent,
}

/// improve-article response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveArticleResponse {
    pub message: String,
    #[serde(default)]
    pub updates: Vec<ProposedUpdate>,
}

/// The automated collaborator backend, one call per operation
#[async_trait::async_trait]
pub trait CollaboratorClient: Send + Sync {
    async fn rewrite_block(
        &self,
        request: RewriteBlockRequest,
    ) -> Result<RewriteBlockResponse, CollaboratorError>;

    async fn insert_block(
        &self,
        request: InsertBlockRequest,
    ) -> Result<InsertBlockResponse, CollaboratorError>;

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, CollaboratorError>;

    async fn improve_article(
        &self,
        request: ImproveArticleRequest,
    ) -> Result<ImproveArticleResponse, CollaboratorError>;
}
