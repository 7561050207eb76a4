//! The `DocumentStore` trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::{Document, FieldPatch, Predicate, StoredDocument};
use crate::error::StoreError;

/// Document-store contract consumed by the services.
///
/// Semantics the core relies on:
/// - single-document writes are atomic;
/// - `update` with [`crate::FieldValue::ArrayUnion`] is idempotent and safe
///   under concurrent patches to the same field;
/// - no ordering primitive exists: callers sort query results themselves.
///
/// Every method is a suspension point; cancellation is by dropping the
/// returned future.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. `Ok(None)` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert a document under a server-assigned id; returns the new id.
    async fn add(&self, collection: &str, fields: Document) -> Result<String, StoreError>;

    /// Create or replace the document at `id`.
    async fn set(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;

    /// Partially update an existing document. Fails with
    /// [`StoreError::MissingDocument`] if the target does not exist.
    async fn update(&self, collection: &str, id: &str, patch: FieldPatch)
    -> Result<(), StoreError>;

    /// Return documents matching all `predicates` (an empty slice matches
    /// the whole collection), in unspecified order.
    async fn query(
        &self,
        collection: &str,
        predicates: &[Predicate],
    ) -> Result<Vec<StoredDocument>, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn add(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        (**self).add(collection, fields).await
    }

    async fn set(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        (**self).set(collection, id, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: FieldPatch,
    ) -> Result<(), StoreError> {
        (**self).update(collection, id, patch).await
    }

    async fn query(
        &self,
        collection: &str,
        predicates: &[Predicate],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).query(collection, predicates).await
    }
}
