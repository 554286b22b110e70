//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `DocumentService` - Lifecycle, update ledger, and history log
//! - `SessionService` - Editing session bootstrap over documents
//!
//! Services coordinate between the storage layer and application logic;
//! the automated-collaborator integration lives in [`crate::ai`].

pub mod document_service;
pub mod error;
pub mod session_service;

pub use document_service::{CreateDocumentParams, DocumentService, SaveDocumentRequest};
pub use error::DocumentServiceError;
pub use session_service::{SessionRecord, SessionService};
