//! Automated Collaborator Integration
//!
//! The boundary between the document core and the automated collaborator
//! that proposes edits:
//!
//! - `client` - Request/response contract and the `CollaboratorClient` trait
//! - `service` - Round-trip orchestration, timeouts, and failure absorption
//!
//! Collaborator unavailability is never a hard error here; every failure
//! path leaves the operator's review workflow usable.

pub mod client;
pub mod service;

pub use client::{
    ChatRequest, ChatResponse, CollaboratorClient, CollaboratorError, ImproveArticleRequest,
    ImproveArticleResponse, InsertBlockRequest, InsertBlockResponse, ProposedUpdate,
    RewriteBlockRequest, RewriteBlockResponse,
};
pub use service::{
    document_outline, AiConfig, AiReply, AiService, AiSuggestion, ChatMessage, ChatRole,
    ChatSession,
};
