//! End-to-end workflow tests: session bootstrap, reconciliation,
//! serialization, the review ledger, and history growth together.

use std::sync::Arc;

use draftdoc_core::blocks::{block_context, find_by_id, BlockIdAssigner};
use draftdoc_core::markdown::{export_clean_markdown, serialize_to_markdown};
use draftdoc_core::models::{DocumentNode, UpdateKind, UpdateState};
use draftdoc_core::services::{CreateDocumentParams, DocumentService, SessionService};
use draftdoc_core::store::MemoryStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .try_init();
}

fn service() -> Arc<DocumentService> {
    Arc::new(DocumentService::new(Arc::new(MemoryStore::new())))
}

/// New paragraph gains an id, the id shows up as a marker line, and clean
/// export drops exactly that line
#[test]
fn reconcile_then_serialize_then_clean_export() {
    init_tracing();

    let tree = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::text(
        "The opening paragraph.",
    )])]);

    let assigner = BlockIdAssigner::default();
    let (tree, changed) = assigner.reconcile(tree);
    assert!(changed);

    let id = tree.children().unwrap()[0].block_id().unwrap().to_string();
    assert!(id.starts_with("block_"));
    assert_eq!(id.len(), 14);

    let markdown = serialize_to_markdown(&tree);
    assert_eq!(
        markdown,
        format!("<!-- block_id:{} -->\nThe opening paragraph.", id)
    );
    assert_eq!(export_clean_markdown(&tree), "The opening paragraph.");
}

/// Applying one of two pending updates resolves only that one and grows
/// history by exactly one entry
#[tokio::test]
async fn apply_one_of_two_pending_updates() {
    init_tracing();
    let documents = service();

    let document = documents
        .create_document(CreateDocumentParams {
            project_id: "proj".to_string(),
            resource_id: "article-1".to_string(),
            title: None,
            blocks: None,
            metadata: None,
        })
        .await
        .unwrap();

    let u1 = documents
        .enqueue_update(
            &document.id,
            UpdateKind::Rewrite,
            serde_json::json!({"blockId": "block_00000001", "content": "a"}),
            None,
        )
        .await
        .unwrap();
    let u2 = documents
        .enqueue_update(
            &document.id,
            UpdateKind::Insert,
            serde_json::json!({"insertAfter": "block_00000001", "content": "b"}),
            None,
        )
        .await
        .unwrap();

    let history_before = documents.get_history(&document.id).await.unwrap().len();

    let applied = documents
        .apply_updates(&document.id, Some(vec![u1.id.clone()]), None)
        .await
        .unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].id, u1.id);
    assert_eq!(applied[0].state, UpdateState::Applied);

    let pending = documents.get_pending_updates(&document.id).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, u2.id);

    let history_after = documents.get_history(&document.id).await.unwrap().len();
    assert_eq!(history_after, history_before + 1);
}

/// An explicit empty id list is rejected without touching queue or history
#[tokio::test]
async fn apply_with_explicit_empty_list_fails() {
    init_tracing();
    let documents = service();

    let document = documents
        .create_document(CreateDocumentParams {
            project_id: "proj".to_string(),
            resource_id: "article-2".to_string(),
            title: None,
            blocks: None,
            metadata: None,
        })
        .await
        .unwrap();
    documents
        .enqueue_update(&document.id, UpdateKind::Delete, serde_json::json!({}), None)
        .await
        .unwrap();

    let err = documents
        .apply_updates(&document.id, Some(vec![]), None)
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    assert_eq!(
        documents.get_pending_updates(&document.id).await.unwrap().len(),
        1
    );
    assert_eq!(documents.get_history(&document.id).await.unwrap().len(), 1);
}

/// Unknown block ids: locator lookup misses and context is empty
#[test]
fn unknown_block_id_lookup_and_context() {
    let tree = DocumentNode::doc(vec![DocumentNode::paragraph(vec![DocumentNode::text(
        "content",
    )])]);
    let (tree, _) = BlockIdAssigner::default().reconcile(tree);

    assert!(find_by_id(&tree, "block_missing").is_none());
    assert_eq!(block_context(&tree, "block_missing", 1), "");
}

/// Session bootstrap creates the document once and reuses it afterwards
#[tokio::test]
async fn session_bootstrap_reuses_document() {
    init_tracing();
    let documents = service();
    let sessions = SessionService::new(documents.clone());

    let params = || CreateDocumentParams {
        project_id: "Proj".to_string(),
        resource_id: "Article-3".to_string(),
        title: Some("Bootstrap".to_string()),
        blocks: None,
        metadata: None,
    };

    let (first_session, first_doc) = sessions.create_session(params()).await.unwrap();
    let (second_session, second_doc) = sessions.create_session(params()).await.unwrap();

    assert_ne!(first_session.id, second_session.id);
    assert_eq!(first_doc.id, second_doc.id);
    assert_eq!(documents.list_documents().await.unwrap().len(), 1);
}
