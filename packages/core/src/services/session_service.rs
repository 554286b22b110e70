//! Session Service - Editing Session Bootstrap
//!
//! An editing session binds a caller to the document for a
//! `(project, resource)` pair, creating that document on first contact.
//! Sessions are process-local bookkeeping; the document itself lives in the
//! injected store.

use crate::models::Document;
use crate::services::document_service::{CreateDocumentParams, DocumentService};
use crate::services::error::DocumentServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// One editing session bound to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub document_id: String,
    pub project_id: String,
    pub resource_id: String,
    pub created_at: DateTime<Utc>,
}

/// Session bootstrap over the document service
pub struct SessionService {
    documents: Arc<DocumentService>,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl SessionService {
    pub fn new(documents: Arc<DocumentService>) -> Self {
        Self {
            documents,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session, creating the backing document if this is the first
    /// contact for its composite key
    pub async fn create_session(
        &self,
        params: CreateDocumentParams,
    ) -> Result<(SessionRecord, Document), DocumentServiceError> {
        let project_id = params.project_id.clone();
        let resource_id = params.resource_id.clone();

        let document = match self
            .documents
            .find_by_project_resource(&project_id, &resource_id)
            .await?
        {
            Some(existing) => existing,
            None => self.documents.create_document(params).await?,
        };

        let session = SessionRecord {
            id: Uuid::new_v4().to_string(),
            document_id: document.id.clone(),
            project_id,
            resource_id,
            created_at: Utc::now(),
        };
        info!(
            session_id = %session.id,
            document_id = %document.id,
            "created editing session"
        );
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        Ok((session, document))
    }

    /// Fetch a session by id
    pub async fn get_session(&self, id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn create_test_service() -> SessionService {
        let documents = Arc::new(DocumentService::new(Arc::new(MemoryStore::new())));
        SessionService::new(documents)
    }

    fn params() -> CreateDocumentParams {
        CreateDocumentParams {
            project_id: "proj".to_string(),
            resource_id: "res".to_string(),
            title: Some("Article".to_string()),
            blocks: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_create_session_bootstraps_document() {
        let service = create_test_service();
        let (session, document) = service.create_session(params()).await.unwrap();

        assert_eq!(session.document_id, document.id);
        assert_eq!(document.title.as_deref(), Some("Article"));
        assert_eq!(service.get_session(&session.id).await, Some(session));
    }

    #[tokio::test]
    async fn test_second_session_reuses_document() {
        let service = create_test_service();
        let (first, document) = service.create_session(params()).await.unwrap();
        let (second, same_document) = service.create_session(params()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(same_document.id, document.id);
    }
}
