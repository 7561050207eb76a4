//! Document shapes, query predicates, and field-level patches.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A persisted document: named fields holding JSON values.
pub type Document = Map<String, Value>;

/// A document returned from a read or query, paired with its store id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

/// Query predicate over document fields. Multiple predicates are a
/// conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals the given value.
    Equal(String, Value),
    /// Array-valued field contains the given value.
    ArrayContains(String, Value),
}

impl Predicate {
    pub fn where_equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal(field.into(), value.into())
    }

    pub fn where_array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::ArrayContains(field.into(), value.into())
    }

    pub fn matches(&self, fields: &Document) -> bool {
        match self {
            Self::Equal(field, value) => fields.get(field) == Some(value),
            Self::ArrayContains(field, value) => match fields.get(field) {
                Some(Value::Array(items)) => items.contains(value),
                _ => false,
            },
        }
    }
}

/// A single field mutation within a [`FieldPatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Replace the field with the given value.
    Set(Value),
    /// Union the given values into an array field, skipping values already
    /// present. Idempotent; safe under concurrent patches to the same field.
    ArrayUnion(Vec<Value>),
}

/// Partial update merged field by field into the target document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    entries: Vec<(String, FieldValue)>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((field.into(), FieldValue::Set(value.into())));
        self
    }

    pub fn array_union(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.entries.push((field.into(), FieldValue::ArrayUnion(values)));
        self
    }

    pub fn entries(&self) -> &[(String, FieldValue)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Encode a serializable value as a document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::encode("value must serialize to an object")),
        Err(e) => Err(StoreError::encode(e.to_string())),
    }
}

/// Decode a document into a domain shape. Unknown fields (including legacy
/// mirrors) are ignored.
pub fn from_document<T: DeserializeOwned>(fields: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::decode(e.to_string()))
}
