//! In-memory document store.
//!
//! Intended for tests/dev. Not optimized for performance. Collection scans
//! iterate in id order; `add` assigns UUIDv7 ids, so documents it created
//! scan in insertion order.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::document::{Document, FieldPatch, FieldValue, Predicate, StoredDocument};
use crate::error::StoreError;
use crate::store::DocumentStore;

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_patch(fields: &mut Document, patch: FieldPatch) {
        for (field, value) in patch.entries().iter().cloned() {
            match value {
                FieldValue::Set(v) => {
                    fields.insert(field, v);
                }
                FieldValue::ArrayUnion(values) => {
                    // Non-array targets are replaced by the union result,
                    // matching hosted document-store semantics.
                    let entry = fields
                        .entry(field)
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if !entry.is_array() {
                        *entry = Value::Array(Vec::new());
                    }
                    if let Value::Array(items) = entry {
                        for v in values {
                            if !items.contains(&v) {
                                items.push(v);
                            }
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn add(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        let id = Uuid::now_v7().to_string();
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: FieldPatch,
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        let fields = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::missing_document(collection, id))?;
        Self::apply_patch(fields, patch);
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        predicates: &[Predicate],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, fields)| predicates.iter().all(|p| p.matches(fields)))
            .map(|(id, fields)| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(fields) => fields,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[tokio::test]
    async fn add_assigns_distinct_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.add("things", doc(json!({"n": 1}))).await.unwrap();
        let b = store.add("things", doc(json!({"n": 2}))).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(
            store.get("things", &a).await.unwrap(),
            Some(doc(json!({"n": 1})))
        );
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = InMemoryDocumentStore::new();
        assert_eq!(store.get("things", "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_missing_document_fails() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update("things", "nope", FieldPatch::new().set("a", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingDocument { .. }));
    }

    #[tokio::test]
    async fn array_union_is_idempotent() {
        let store = InMemoryDocumentStore::new();
        store
            .set("institutions", "i1", doc(json!({"roles": ["Owner", "HR"]})))
            .await
            .unwrap();

        let patch =
            FieldPatch::new().array_union("roles", vec![json!("HR"), json!("Finance")]);
        store.update("institutions", "i1", patch.clone()).await.unwrap();
        store.update("institutions", "i1", patch).await.unwrap();

        let fields = store.get("institutions", "i1").await.unwrap().unwrap();
        assert_eq!(fields["roles"], json!(["Owner", "HR", "Finance"]));
    }

    #[tokio::test]
    async fn query_applies_all_predicates() {
        let store = InMemoryDocumentStore::new();
        store
            .set(
                "reports",
                "r1",
                doc(json!({"institutionId": "i1", "status": "pending"})),
            )
            .await
            .unwrap();
        store
            .set(
                "reports",
                "r2",
                doc(json!({"institutionId": "i1", "status": "verified"})),
            )
            .await
            .unwrap();
        store
            .set(
                "reports",
                "r3",
                doc(json!({"institutionId": "i2", "status": "pending"})),
            )
            .await
            .unwrap();

        let hits = store
            .query(
                "reports",
                &[
                    Predicate::where_equal("institutionId", "i1"),
                    Predicate::where_equal("status", "pending"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "r1");
    }

    #[tokio::test]
    async fn query_by_array_membership() {
        let store = InMemoryDocumentStore::new();
        store
            .set("institutions", "i1", doc(json!({"managerIds": ["u1"]})))
            .await
            .unwrap();
        store
            .set("institutions", "i2", doc(json!({"managerIds": ["u2", "u1"]})))
            .await
            .unwrap();
        store
            .set("institutions", "i3", doc(json!({"managerIds": ["u2"]})))
            .await
            .unwrap();

        let hits = store
            .query(
                "institutions",
                &[Predicate::where_array_contains("managerIds", "u1")],
            )
            .await
            .unwrap();
        let ids: Vec<_> = hits.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }
}
