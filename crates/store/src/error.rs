//! Store operation error.
//!
//! These are **infrastructure errors** (transport, backend, codec) as
//! opposed to domain errors (validation, authorization).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport, timeout, or backend failure.
    #[error("store backend failure: {0}")]
    Backend(String),

    /// `set`/`update` targeted a document that does not exist.
    #[error("document {collection}/{id} does not exist")]
    MissingDocument { collection: String, id: String },

    /// A value could not be encoded as a document.
    #[error("document encoding failed: {0}")]
    Encode(String),

    /// A stored document could not be decoded into its domain shape.
    #[error("document decoding failed: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn missing_document(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::MissingDocument {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
