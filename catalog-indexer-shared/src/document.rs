//! The flat document representation sent to the search backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the entity-type discriminator of every indexed document.
pub const TYPE_FIELD: &str = "entity_type";

/// Entity-type literal written for dataset documents.
pub const DATASET_ENTITY_TYPE: &str = "dataset";

/// Fields defined by the search schema itself.
pub const SOLR_FIELDS: &[&str] = &[TYPE_FIELD, "res_url", "text", "urls", "indexed_ts", "site_id"];

/// Fields an extra's bare key is never allowed to shadow.
///
/// The schema fields plus every multi-valued field produced by tag, group,
/// and resource flattening.
pub const RESERVED_FIELDS: &[&str] = &[
    TYPE_FIELD,
    "res_url",
    "text",
    "urls",
    "indexed_ts",
    "site_id",
    "tags",
    "groups",
    "res_name",
    "res_description",
    "res_format",
    "res_type",
];

/// A flat field name → value mapping ready for the search backend.
///
/// Values are scalars or arrays of scalars; nested objects never appear in a
/// finished document. The underlying map is BTree-backed, so field iteration
/// order is deterministic for a given field set.
///
/// A document is constructed fresh for every indexing call and is not mutated
/// after being handed to the publisher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexedDocument {
    fields: Map<String, Value>,
}

impl IndexedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the previous value if one was present.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field value as a string slice, if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Whether the document carries the named field.
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Whether the document has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over field names in deterministic order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Borrow the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the document, yielding the underlying field map.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for IndexedDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
