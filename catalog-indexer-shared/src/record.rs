//! Typed record model for datasets and their nested structures.
//!
//! A [`Dataset`] is the canonical entity handed to the indexing pipeline.
//! Fields outside the fixed schema travel in two open-ended containers: the
//! `extras` key/value list, and a flattened map of schema-extension fields
//! that custom metadata schemas may add at the top level.
//!
//! `Option` fields deliberately serialize as explicit `null` rather than
//! being omitted; the serialized payloads stored on the indexed document keep
//! a literal null marker for every missing value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The canonical structured entity being indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub maintainer: Option<String>,
    pub maintainer_email: Option<String>,
    pub license_id: Option<String>,
    /// Lifecycle state (`active`, `draft`, `deleted`, ...); absent for
    /// records that were never saved.
    pub state: Option<String>,
    /// The record's own type, e.g. `dataset` or a custom subtype.
    #[serde(rename = "type")]
    pub dataset_type: String,
    pub private: bool,
    /// ISO-8601 creation timestamp without zone suffix, as produced by the
    /// record store.
    pub metadata_created: String,
    /// ISO-8601 modification timestamp without zone suffix.
    pub metadata_modified: String,
    pub organization: Option<Organization>,
    #[serde(default)]
    pub extras: Vec<Extra>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub relationships_as_subject: Vec<Relationship>,
    #[serde(default)]
    pub relationships_as_object: Vec<Relationship>,
    /// Schema-extension fields added by custom metadata schemas. Flattened
    /// to the top level on serialization, so they pass through the indexing
    /// pipeline like native fields.
    #[serde(flatten, default)]
    pub additional: Map<String, Value>,
}

/// The organization owning a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
}

/// An arbitrary caller-supplied key/value attached to a dataset outside its
/// fixed schema. Values may be scalars or arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    pub key: String,
    pub value: Value,
}

impl Extra {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A tag on a dataset, optionally scoped to a vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub vocabulary_id: Option<String>,
}

impl Tag {
    /// A free tag with no vocabulary scope.
    pub fn free(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vocabulary_id: None,
        }
    }

    /// A tag scoped to the given vocabulary.
    pub fn scoped(name: impl Into<String>, vocabulary_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vocabulary_id: Some(vocabulary_id.into()),
        }
    }
}

/// A named grouping that scopes a subset of tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub id: String,
    pub name: String,
}

/// A group the dataset is a member of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub title: Option<String>,
}

/// A file or endpoint belonging to exactly one dataset.
///
/// Backend-specific extra columns travel in the flattened map and are
/// projected into `res_extras_<column>` fields when configured.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub url: Option<String>,
    pub resource_type: Option<String>,
    #[serde(flatten, default)]
    pub extras: Map<String, Value>,
}

/// A directed, typed edge between two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship type label, e.g. `depends_on` or `child_of`.
    #[serde(rename = "type")]
    pub kind: String,
    pub subject_dataset_id: String,
    pub object_dataset_id: String,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_dataset() -> Dataset {
        Dataset {
            id: "d1".into(),
            name: "water-quality".into(),
            title: Some("Water Quality".into()),
            notes: None,
            url: None,
            version: None,
            author: None,
            author_email: None,
            maintainer: None,
            maintainer_email: None,
            license_id: None,
            state: Some("active".into()),
            dataset_type: "dataset".into(),
            private: false,
            metadata_created: "2024-05-01T09:30:00".into(),
            metadata_modified: "2024-06-01T10:00:00".into(),
            organization: None,
            extras: vec![],
            tags: vec![],
            groups: vec![],
            resources: vec![],
            relationships_as_subject: vec![],
            relationships_as_object: vec![],
            additional: Map::new(),
        }
    }

    #[test]
    fn test_missing_values_serialize_as_null() {
        let serialized = serde_json::to_value(minimal_dataset()).unwrap();
        assert_eq!(serialized["notes"], Value::Null);
        assert_eq!(serialized["organization"], Value::Null);
    }

    #[test]
    fn test_type_field_is_renamed() {
        let serialized = serde_json::to_value(minimal_dataset()).unwrap();
        assert_eq!(serialized["type"], json!("dataset"));
        assert!(serialized.get("dataset_type").is_none());
    }

    #[test]
    fn test_additional_fields_flatten_to_top_level() {
        let mut dataset = minimal_dataset();
        dataset
            .additional
            .insert("embargo_date".into(), json!("2024-12-01"));

        let serialized = serde_json::to_value(&dataset).unwrap();
        assert_eq!(serialized["embargo_date"], json!("2024-12-01"));
    }

    #[test]
    fn test_resource_extras_flatten() {
        let mut resource = Resource {
            name: Some("readings.csv".into()),
            ..Default::default()
        };
        resource.extras.insert("size".into(), json!("2048"));

        let serialized = serde_json::to_value(&resource).unwrap();
        assert_eq!(serialized["size"], json!("2048"));
        assert_eq!(serialized["name"], json!("readings.csv"));
    }

    #[test]
    fn test_dataset_roundtrip() {
        let mut dataset = minimal_dataset();
        dataset.tags = vec![Tag::free("water"), Tag::scoped("monthly", "v1")];
        dataset.relationships_as_subject = vec![Relationship {
            kind: "depends_on".into(),
            subject_dataset_id: "d1".into(),
            object_dataset_id: "d2".into(),
            comment: None,
        }];

        let serialized = serde_json::to_string(&dataset).unwrap();
        let back: Dataset = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back, dataset);
    }
}
