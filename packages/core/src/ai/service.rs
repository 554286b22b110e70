//! Collaborator Integration Service
//!
//! Drives the round trips to the automated collaborator and records every
//! proposal as a pending ledger update. Collaborator failures are absorbed
//! here: block operations degrade to clearly-marked placeholder updates so
//! the operator's review queue keeps working, and chat/improve degrade to
//! an apologetic message. History and ledger writes happen only after a
//! round trip resolves, never interleaved with it.

use crate::ai::client::{
    ChatRequest, CollaboratorClient, CollaboratorError, ImproveArticleRequest,
    InsertBlockRequest, ProposedUpdate, RewriteBlockRequest,
};
use crate::blocks::{addressable_blocks, block_context, find_by_id};
use crate::models::{DocumentNode, UpdateKind};
use crate::services::{DocumentService, DocumentServiceError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Note attached to placeholder updates and fallback replies
const DEGRADED_NOTE: &str = "AI service is not available - this is a mock response";

/// Timeouts and prompt-shaping knobs for collaborator calls
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// rewrite-block and insert-block round-trip budget
    pub block_timeout: Duration,
    /// chat round-trip budget
    pub chat_timeout: Duration,
    /// improve-article round-trip budget
    pub improve_timeout: Duration,
    /// Neighbor blocks included on each side of a context window
    pub context_window: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            block_timeout: Duration::from_secs(120),
            chat_timeout: Duration::from_secs(120),
            improve_timeout: Duration::from_secs(60),
            context_window: 1,
        }
    }
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in a document's chat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Per-document chat session with its message log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub document_id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

/// Result of a block operation: the queued update plus preview text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    pub update_id: String,
    pub preview: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Result of a chat or improve round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiReply {
    pub message_id: String,
    pub message: String,
    /// Ids of the pending updates enqueued from the collaborator's proposals
    pub update_ids: Vec<String>,
}

/// Collaborator integration over the document service
pub struct AiService {
    documents: Arc<DocumentService>,
    client: Arc<dyn CollaboratorClient>,
    config: AiConfig,
    sessions: RwLock<HashMap<String, ChatSession>>,
}

impl AiService {
    pub fn new(
        documents: Arc<DocumentService>,
        client: Arc<dyn CollaboratorClient>,
        config: AiConfig,
    ) -> Self {
        Self {
            documents,
            client,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Ask the collaborator to rewrite one block, queueing the proposal
    ///
    /// On timeout or transport failure a placeholder update is queued
    /// instead, so the review workflow never blocks on collaborator
    /// availability.
    pub async fn rewrite_block(
        &self,
        document_id: &str,
        block_id: &str,
        instruction: &str,
        context: Option<String>,
    ) -> Result<AiSuggestion, DocumentServiceError> {
        let document = self.documents.get_document(document_id).await?;
        let tree = document.content.as_tree();

        let (block, _) = find_by_id(&tree, block_id)
            .ok_or_else(|| DocumentServiceError::block_not_found(block_id))?;
        let block_text = block.inline_text();
        let context = context
            .unwrap_or_else(|| block_context(&tree, block_id, self.config.context_window));

        let request = RewriteBlockRequest {
            block_id: block_id.to_string(),
            content: block_text.clone(),
            instruction: instruction.to_string(),
            context,
        };
        let outcome = self
            .call(self.config.block_timeout, self.client.rewrite_block(request))
            .await;

        let (new_content, note) = match outcome {
            Ok(response) => {
                info!(document_id, block_id, "collaborator produced rewrite");
                (
                    response.new_content,
                    response
                        .note
                        .or_else(|| Some("AI rewrite suggestion".to_string())),
                )
            }
            Err(error) => {
                warn!(document_id, block_id, %error, "collaborator failed, queueing placeholder");
                (
                    format!(
                        "[AI would rewrite]: {}\n\nInstruction: {}",
                        block_text, instruction
                    ),
                    Some(DEGRADED_NOTE.to_string()),
                )
            }
        };

        let update = self
            .documents
            .enqueue_update(
                document_id,
                UpdateKind::Rewrite,
                json!({
                    "blockId": block_id,
                    "content": new_content,
                    "oldContent": block_text,
                }),
                note.clone(),
            )
            .await?;

        Ok(AiSuggestion {
            update_id: update.id,
            preview: new_content,
            note,
        })
    }

    /// Ask the collaborator to draft a block after `insert_after`
    pub async fn insert_block(
        &self,
        document_id: &str,
        insert_after: &str,
        instruction: &str,
        context: Option<String>,
    ) -> Result<AiSuggestion, DocumentServiceError> {
        let document = self.documents.get_document(document_id).await?;
        let tree = document.content.as_tree();
        let context = context
            .unwrap_or_else(|| block_context(&tree, insert_after, self.config.context_window));

        let request = InsertBlockRequest {
            insert_after: insert_after.to_string(),
            instruction: instruction.to_string(),
            context,
        };
        let outcome = self
            .call(self.config.block_timeout, self.client.insert_block(request))
            .await;

        let (new_content, note) = match outcome {
            Ok(response) => (
                response.new_content,
                response
                    .note
                    .or_else(|| Some("AI insert suggestion".to_string())),
            ),
            Err(error) => {
                warn!(document_id, insert_after, %error, "collaborator failed, queueing placeholder");
                (
                    format!(
                        "[AI would insert new content here]\n\nInstruction: {}",
                        instruction
                    ),
                    Some(DEGRADED_NOTE.to_string()),
                )
            }
        };

        let update = self
            .documents
            .enqueue_update(
                document_id,
                UpdateKind::Insert,
                json!({
                    "insertAfter": insert_after,
                    "content": new_content,
                }),
                note.clone(),
            )
            .await?;

        Ok(AiSuggestion {
            update_id: update.id,
            preview: new_content,
            note,
        })
    }

    /// Chat about the document; collaborator-proposed edits are queued
    pub async fn chat(
        &self,
        document_id: &str,
        message: &str,
        selected_block_id: Option<String>,
    ) -> Result<AiReply, DocumentServiceError> {
        let document = self.documents.get_document(document_id).await?;
        let tree = document.content.as_tree();

        self.record_message(document_id, ChatMessage::new(ChatRole::User, message))
            .await;

        let request = ChatRequest {
            document_content: serde_json::to_string(&document.content)
                .map_err(|e| anyhow::anyhow!(e))?,
            message: message.to_string(),
            selected_block_id,
            document_info: document_outline(&tree),
        };
        let outcome = self.call(self.config.chat_timeout, self.client.chat(request)).await;

        let (reply_text, update_ids) = match outcome {
            Ok(response) => {
                let ids = self.enqueue_proposals(document_id, response.updates).await?;
                (response.message, ids)
            }
            Err(error) => {
                warn!(document_id, %error, "collaborator chat failed, degrading to fallback reply");
                (
                    format!(
                        "I understand you want to: \"{}\". AI service is currently not available, but I would help you with that task.",
                        message
                    ),
                    Vec::new(),
                )
            }
        };

        let assistant = ChatMessage::new(ChatRole::Assistant, reply_text.clone());
        let message_id = assistant.id.clone();
        self.record_message(document_id, assistant).await;

        Ok(AiReply {
            message_id,
            message: reply_text,
            update_ids,
        })
    }

    /// Ask for whole-article improvement proposals
    pub async fn improve_article(
        &self,
        document_id: &str,
    ) -> Result<AiReply, DocumentServiceError> {
        let document = self.documents.get_document(document_id).await?;

        let request = ImproveArticleRequest {
            document_id: document_id.to_string(),
            content: document.content.clone(),
        };
        let outcome = self
            .call(self.config.improve_timeout, self.client.improve_article(request))
            .await;

        match outcome {
            Ok(response) => {
                let update_ids = self.enqueue_proposals(document_id, response.updates).await?;
                Ok(AiReply {
                    message_id: Uuid::new_v4().to_string(),
                    message: response.message,
                    update_ids,
                })
            }
            Err(error) => {
                warn!(document_id, %error, "collaborator improve failed");
                Ok(AiReply {
                    message_id: Uuid::new_v4().to_string(),
                    message: "AI service is not available. Please try again later.".to_string(),
                    update_ids: Vec::new(),
                })
            }
        }
    }

    /// The chat session for a document, if one has started
    pub async fn get_chat_session(&self, document_id: &str) -> Option<ChatSession> {
        self.sessions.read().await.get(document_id).cloned()
    }

    async fn call<T>(
        &self,
        budget: Duration,
        round_trip: impl std::future::Future<Output = Result<T, CollaboratorError>>,
    ) -> Result<T, CollaboratorError> {
        match tokio::time::timeout(budget, round_trip).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout),
        }
    }

    async fn enqueue_proposals(
        &self,
        document_id: &str,
        proposals: Vec<ProposedUpdate>,
    ) -> Result<Vec<String>, DocumentServiceError> {
        let mut ids = Vec::with_capacity(proposals.len());
        for proposal in proposals {
            let update = self
                .documents
                .enqueue_update(document_id, proposal.kind, proposal.payload, proposal.note)
                .await?;
            ids.push(update.id);
        }
        Ok(ids)
    }

    async fn record_message(&self, document_id: &str, message: ChatMessage) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(document_id.to_string())
            .or_insert_with(|| ChatSession {
                id: Uuid::new_v4().to_string(),
                document_id: document_id.to_string(),
                created_at: Utc::now(),
                messages: Vec::new(),
            });
        session.messages.push(message);
    }
}

/// One-line-per-block inventory of the document, for collaborator prompts
pub fn document_outline(tree: &DocumentNode) -> String {
    let blocks = addressable_blocks(tree);
    let lines: Vec<String> = blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let level = match block {
                DocumentNode::Heading { level, .. } => format!(" (level {})", level),
                _ => String::new(),
            };
            format!(
                "{}. {}{} - {}",
                index + 1,
                block.kind(),
                level,
                block.block_id().unwrap_or_default()
            )
        })
        .collect();
    format!("Document has {} blocks:\n{}", blocks.len(), lines.join("\n"))
}
