//! Document Repository Layer
//!
//! The `DocumentStore` trait abstracts document persistence so that an
//! in-process map or a durable backing store satisfy the same contract.
//! Business logic in the services layer depends only on the trait.

mod document_store;
mod memory;

pub use document_store::DocumentStore;
pub use memory::MemoryStore;
