//! `casedesk-store` — the document-store boundary.
//!
//! The contract the core consumes: per-document reads, filtered collection
//! queries, partial updates with array-union, server-assigned ids. Backends
//! implement [`DocumentStore`]; [`InMemoryDocumentStore`] serves tests/dev.

pub mod document;
pub mod error;
pub mod memory;
pub mod store;

pub use document::{
    Document, FieldPatch, FieldValue, Predicate, StoredDocument, from_document, to_document,
};
pub use error::StoreError;
pub use memory::InMemoryDocumentStore;
pub use store::DocumentStore;
