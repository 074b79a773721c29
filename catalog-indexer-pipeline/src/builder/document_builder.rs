//! Document builder implementation.
//!
//! Flattens a [`Dataset`] and its schema-validated form into the flat
//! [`IndexedDocument`] the search backend accepts: nested collections become
//! index-aligned multi-valued fields, extras join the main namespace under
//! sanitized keys, dates are normalized to UTC ISO-8601, and registered hooks
//! get a chance to mutate the result.
//!
//! Step order matters. Later steps consume keys produced earlier, and key
//! collisions resolve first-write-wins: a field already on the document is
//! never overwritten by a colliding extra or relationship group.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{instrument, warn};

use crate::builder::{dates, text};
use crate::errors::PipelineError;
use crate::interfaces::{
    DatasetLookup, IndexDocumentHook, PermissionLabelProvider, RelationshipTypeMap,
    StandardRelationshipTypes, VocabularyLookup,
};
use catalog_indexer_shared::{
    Dataset, IndexedDocument, Resource, SearchConfig, DATASET_ENTITY_TYPE, RESERVED_FIELDS,
    TYPE_FIELD,
};

/// Fixed resource attribute → output field pairs. Backend-specific extra
/// columns from configuration are appended as `res_extras_<column>`.
const RESOURCE_FIELDS: &[(&str, &str)] = &[
    ("name", "res_name"),
    ("description", "res_description"),
    ("format", "res_format"),
    ("url", "res_url"),
    ("resource_type", "res_type"),
];

/// Text fields stripped of XML-illegal characters.
const ESCAPED_FIELDS: &[&str] = &["title", "notes", "title_string"];

/// What should happen to the record after building.
#[derive(Debug)]
pub enum BuildOutcome {
    /// Document ready for the publisher.
    Index(IndexedDocument),
    /// The record's state asks for removal instead of indexing.
    Remove,
}

/// Builds flat search documents from dataset records.
///
/// Pure transformation: the builder performs no I/O of its own; the record
/// store, vocabulary registry, and permission-label computation are injected
/// collaborators.
pub struct DocumentBuilder {
    config: SearchConfig,
    datasets: Arc<dyn DatasetLookup>,
    vocabularies: Arc<dyn VocabularyLookup>,
    relationship_types: Arc<dyn RelationshipTypeMap>,
    labels: Arc<dyn PermissionLabelProvider>,
    hooks: Vec<Arc<dyn IndexDocumentHook>>,
}

impl DocumentBuilder {
    /// Create a builder with the standard relationship vocabulary and no
    /// hooks.
    pub fn new(
        config: SearchConfig,
        datasets: Arc<dyn DatasetLookup>,
        vocabularies: Arc<dyn VocabularyLookup>,
        labels: Arc<dyn PermissionLabelProvider>,
    ) -> Self {
        Self {
            config,
            datasets,
            vocabularies,
            relationship_types: Arc::new(StandardRelationshipTypes),
            labels,
            hooks: Vec::new(),
        }
    }

    /// Replace the relationship-type mapping.
    pub fn with_relationship_types(mut self, types: Arc<dyn RelationshipTypeMap>) -> Self {
        self.relationship_types = types;
        self
    }

    /// Set the document-mutation hooks, invoked in the given order.
    pub fn with_hooks(mut self, hooks: Vec<Arc<dyn IndexDocumentHook>>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Append a document-mutation hook.
    pub fn add_hook(&mut self, hook: Arc<dyn IndexDocumentHook>) {
        self.hooks.push(hook);
    }

    /// Build the indexable document for a record.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The raw record
    /// * `validated` - The same record after external schema validation;
    ///   required
    ///
    /// # Returns
    ///
    /// * `Ok(BuildOutcome::Index(_))` - Document ready for publishing
    /// * `Ok(BuildOutcome::Remove)` - The record should be removed instead
    /// * `Err(PipelineError::ValidationError)` - Validated form missing
    /// * `Err(PipelineError::IntegrityError)` - A referenced vocabulary or
    ///   related dataset could not be resolved
    /// * `Err(PipelineError::PluginContractError)` - A hook returned an
    ///   empty document
    #[instrument(skip_all, fields(dataset_id = %dataset.id))]
    pub fn build(
        &self,
        dataset: &Dataset,
        validated: Option<&Dataset>,
    ) -> Result<BuildOutcome, PipelineError> {
        let validated = validated.ok_or_else(|| {
            PipelineError::validation("both default and custom schema data must be passed")
        })?;

        let mut doc = to_field_map(dataset)?;

        // Both serialized forms ride along as opaque payload fields; missing
        // values inside them stay as literal nulls.
        doc.insert(
            "data_dict".to_string(),
            Value::String(to_json_string(dataset)?),
        );
        doc.insert(
            "validated_data_dict".to_string(),
            Value::String(to_json_string(validated)?),
        );

        // String copy of the title for sorting.
        if let Some(title) = dataset.title.as_deref() {
            if !title.is_empty() {
                doc.insert("title_string".to_string(), Value::String(title.to_string()));
            }
        }

        if self.config.remove_deleted_datasets
            && matches!(dataset.state.as_deref(), None | Some("deleted"))
        {
            return Ok(BuildOutcome::Remove);
        }

        // Names an extra's bare key may not shadow: the schema's own fields
        // plus everything the record carries at the top level right now.
        let mut index_fields: HashSet<String> =
            RESERVED_FIELDS.iter().map(ToString::to_string).collect();
        index_fields.extend(doc.keys().cloned());

        // Include the extras in the main namespace. The prefixed copy is
        // always written; the bare key only when it collides with nothing.
        for extra in &dataset.extras {
            let key = text::filter_key(&extra.key);
            let value = text::flatten_extra_value(&extra.value);
            doc.insert(format!("extras_{}", key), value.clone());
            if !index_fields.contains(&key) {
                doc.insert(key, value);
            }
        }
        doc.remove("extras");

        // Vocabulary tags leave the generic tags list and become
        // vocab_<name> fields usable as facets.
        doc.remove("tags");
        let mut free_tags: Vec<Value> = Vec::new();
        for tag in &dataset.tags {
            match &tag.vocabulary_id {
                Some(vocabulary_id) => {
                    let vocabulary =
                        self.vocabularies.find_by_id(vocabulary_id).ok_or_else(|| {
                            PipelineError::integrity(format!(
                                "tag {} references unknown vocabulary {}",
                                tag.name, vocabulary_id
                            ))
                        })?;
                    let key = format!("vocab_{}", vocabulary.name);
                    match doc.get_mut(&key) {
                        Some(Value::Array(names)) => names.push(Value::String(tag.name.clone())),
                        _ => {
                            doc.insert(key, json!([tag.name.clone()]));
                        }
                    }
                }
                None => free_tags.push(Value::String(tag.name.clone())),
            }
        }
        doc.insert("tags".to_string(), Value::Array(free_tags));

        // Capacity makes things private in the search index.
        doc.remove("groups");
        let capacity = if dataset.private { "private" } else { "public" };
        doc.insert("capacity".to_string(), Value::String(capacity.to_string()));

        let group_names: Vec<Value> = dataset
            .groups
            .iter()
            .map(|group| Value::String(group.name.clone()))
            .collect();
        doc.insert("groups".to_string(), Value::Array(group_names));

        let organization = match &dataset.organization {
            Some(organization) => Value::String(organization.name.clone()),
            None => Value::Null,
        };
        doc.insert("organization".to_string(), organization);

        // Flatten the resource structure: one list per attribute, index
        // aligned across resources, empty string for a missing value.
        let mut resource_fields: Vec<(String, String)> = RESOURCE_FIELDS
            .iter()
            .map(|(attr, field)| (attr.to_string(), field.to_string()))
            .collect();
        for column in &self.config.extra_resource_fields {
            resource_fields.push((column.clone(), format!("res_extras_{}", column)));
        }
        for resource in &dataset.resources {
            for (attr, field) in &resource_fields {
                let value = Value::String(resource_attribute(resource, attr));
                match doc.get_mut(field.as_str()) {
                    Some(Value::Array(values)) => values.push(value),
                    _ => {
                        doc.insert(field.clone(), Value::Array(vec![value]));
                    }
                }
            }
        }
        doc.remove("resources");

        // Only the other end's name survives from each relationship, keyed
        // by the (possibly reversed) type label.
        doc.remove("relationships_as_subject");
        doc.remove("relationships_as_object");
        let mut related: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for relationship in &dataset.relationships_as_object {
            let kind = self.relationship_types.reverse(&relationship.kind);
            let subject = self.resolve_related(&relationship.subject_dataset_id)?;
            related.entry(kind).or_default().push(Value::String(subject));
        }
        for relationship in &dataset.relationships_as_subject {
            let object = self.resolve_related(&relationship.object_dataset_id)?;
            related
                .entry(relationship.kind.clone())
                .or_default()
                .push(Value::String(object));
        }
        for (kind, names) in related {
            if !doc.contains_key(&kind) {
                doc.insert(kind, Value::Array(names));
            }
        }

        doc.insert(
            TYPE_FIELD.to_string(),
            Value::String(DATASET_ENTITY_TYPE.to_string()),
        );
        doc.insert(
            "dataset_type".to_string(),
            Value::String(dataset.dataset_type.clone()),
        );

        // Normalize every *_date field; a value that fails to parse drops
        // the field, never the build.
        let mut normalized = Map::new();
        for (key, value) in doc {
            if !key.ends_with("_date") {
                normalized.insert(key, value);
                continue;
            }
            match &value {
                Value::Null => {}
                Value::String(s) if s.is_empty() => {}
                Value::String(s) => match dates::normalize(s) {
                    Some(formatted) => {
                        normalized.insert(key, Value::String(formatted));
                    }
                    None => warn!(
                        dataset_id = %dataset.id,
                        field = %key,
                        value = %s,
                        "value is not a valid date, dropping field"
                    ),
                },
                other => warn!(
                    dataset_id = %dataset.id,
                    field = %key,
                    value = ?other,
                    "non-string date value, dropping field"
                ),
            }
        }
        let mut doc = normalized;

        for field in ESCAPED_FIELDS {
            let cleaned = match doc.get(*field) {
                Some(Value::String(s)) if !s.is_empty() => Some(text::strip_xml_illegal_chars(s)),
                _ => None,
            };
            if let Some(cleaned) = cleaned {
                doc.insert(field.to_string(), Value::String(cleaned));
            }
        }

        // The backend only accepts ISO dates with UTC time; the record store
        // hands these two over zone-less, so the suffix goes on unchecked.
        doc.insert(
            "metadata_created".to_string(),
            Value::String(format!("{}Z", dataset.metadata_created)),
        );
        doc.insert(
            "metadata_modified".to_string(),
            Value::String(format!("{}Z", dataset.metadata_modified)),
        );

        // Mark this catalog instance as the data source.
        doc.insert(
            "site_id".to_string(),
            Value::String(self.config.site_id.clone()),
        );

        // Sort candidates get leading whitespace stripped; the backend sorts
        // " " before "a".
        let trimmed = match doc.get("title") {
            Some(Value::String(title)) if !title.is_empty() => {
                Some(title.trim_start().to_string())
            }
            _ => None,
        };
        if let Some(trimmed) = trimmed {
            doc.insert("title".to_string(), Value::String(trimmed));
        }

        // Unique index identifier: a pure function of record id and site id,
        // so multiple sites can share one core without conflicts.
        let index_id = format!(
            "{:x}",
            md5::compute(format!("{}{}", dataset.id, self.config.site_id))
        );
        doc.insert("index_id".to_string(), Value::String(index_id));

        let mut document = IndexedDocument::from(doc);
        for hook in &self.hooks {
            document = hook.before_index(document);
            if document.is_empty() {
                return Err(PipelineError::plugin_contract(
                    "hook must return a non-empty document",
                ));
            }
        }

        // Permission labels determine visibility in search and cannot be set
        // by the record or by hooks. A record deleted while we were building
        // simply gets none.
        let labels = match self.datasets.find_by_id(&dataset.id) {
            Some(current) => self.labels.labels_for(&current),
            None => Vec::new(),
        };
        document.insert(
            "permission_labels",
            Value::Array(labels.into_iter().map(Value::String).collect()),
        );

        Ok(BuildOutcome::Index(document))
    }

    fn resolve_related(&self, id: &str) -> Result<String, PipelineError> {
        self.datasets
            .find_by_id(id)
            .map(|dataset| dataset.name)
            .ok_or_else(|| {
                PipelineError::integrity(format!(
                    "dataset {} referenced by a relationship does not exist",
                    id
                ))
            })
    }
}

fn to_field_map(dataset: &Dataset) -> Result<Map<String, Value>, PipelineError> {
    match serde_json::to_value(dataset) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PipelineError::serialization(
            "record did not serialize to an object",
        )),
        Err(e) => Err(PipelineError::serialization(e.to_string())),
    }
}

fn to_json_string(dataset: &Dataset) -> Result<String, PipelineError> {
    serde_json::to_string(dataset).map_err(|e| PipelineError::serialization(e.to_string()))
}

fn resource_attribute(resource: &Resource, attr: &str) -> String {
    match attr {
        "name" => resource.name.clone().unwrap_or_default(),
        "description" => resource.description.clone().unwrap_or_default(),
        "format" => resource.format.clone().unwrap_or_default(),
        "url" => resource.url.clone().unwrap_or_default(),
        "resource_type" => resource.resource_type.clone().unwrap_or_default(),
        column => resource
            .extras
            .get(column)
            .map(text::scalar_string)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_indexer_shared::{Extra, Group, Organization, Relationship, Tag, Vocabulary};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory catalog standing in for the record store, vocabulary
    /// registry, and permission-label computation.
    #[derive(Default)]
    struct FixtureCatalog {
        datasets: HashMap<String, Dataset>,
        vocabularies: HashMap<String, Vocabulary>,
        labels: Vec<String>,
    }

    impl DatasetLookup for FixtureCatalog {
        fn find_by_id(&self, id: &str) -> Option<Dataset> {
            self.datasets.get(id).cloned()
        }
    }

    impl VocabularyLookup for FixtureCatalog {
        fn find_by_id(&self, id: &str) -> Option<Vocabulary> {
            self.vocabularies.get(id).cloned()
        }
    }

    impl PermissionLabelProvider for FixtureCatalog {
        fn labels_for(&self, _dataset: &Dataset) -> Vec<String> {
            self.labels.clone()
        }
    }

    fn dataset(id: &str, name: &str) -> Dataset {
        Dataset {
            id: id.into(),
            name: name.into(),
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

    fn catalog() -> FixtureCatalog {
        let mut fixture = FixtureCatalog::default();
        fixture.labels = vec!["public".into()];
        for (id, name) in [("d1", "water-quality"), ("d2", "river-levels")] {
            fixture.datasets.insert(id.into(), dataset(id, name));
        }
        fixture
            .vocabularies
            .insert("v1".into(), Vocabulary { id: "v1".into(), name: "genre".into() });
        fixture
    }

    fn builder_with(config: SearchConfig, fixture: FixtureCatalog) -> DocumentBuilder {
        let fixture = Arc::new(fixture);
        DocumentBuilder::new(config, fixture.clone(), fixture.clone(), fixture)
    }

    fn builder() -> DocumentBuilder {
        builder_with(SearchConfig::new("site-a"), catalog())
    }

    fn build(builder: &DocumentBuilder, record: &Dataset) -> IndexedDocument {
        let validated = record.clone();
        match builder.build(record, Some(&validated)).unwrap() {
            BuildOutcome::Index(doc) => doc,
            BuildOutcome::Remove => panic!("expected an indexable document"),
        }
    }

    #[test]
    fn test_missing_validated_form_fails() {
        let record = dataset("d1", "water-quality");
        let err = builder().build(&record, None).unwrap_err();
        assert!(matches!(err, PipelineError::ValidationError(_)));
    }

    #[test]
    fn test_core_fields_and_payloads() {
        let record = dataset("d1", "water-quality");
        let doc = build(&builder(), &record);

        assert_eq!(doc.get_str("id"), Some("d1"));
        assert_eq!(doc.get_str("name"), Some("water-quality"));
        assert_eq!(doc.get_str("entity_type"), Some("dataset"));
        assert_eq!(doc.get_str("dataset_type"), Some("dataset"));
        assert_eq!(doc.get_str("site_id"), Some("site-a"));
        assert_eq!(doc.get_str("title_string"), Some("Water Quality"));

        // Opaque payloads are JSON strings with literal null markers.
        let data_dict = doc.get_str("data_dict").unwrap();
        assert!(data_dict.contains("\"notes\":null"));
        let validated = doc.get_str("validated_data_dict").unwrap();
        serde_json::from_str::<Value>(validated).unwrap();
    }

    #[test]
    fn test_capacity_reflects_the_private_flag() {
        let mut record = dataset("d1", "water-quality");
        assert_eq!(build(&builder(), &record).get_str("capacity"), Some("public"));

        record.private = true;
        assert_eq!(build(&builder(), &record).get_str("capacity"), Some("private"));
    }

    #[test]
    fn test_deleted_state_short_circuits_to_removal() {
        let config = SearchConfig::new("site-a").removing_deleted_datasets();
        let b = builder_with(config, catalog());

        let mut record = dataset("d1", "water-quality");
        record.state = Some("deleted".into());
        let validated = record.clone();
        assert!(matches!(
            b.build(&record, Some(&validated)).unwrap(),
            BuildOutcome::Remove
        ));

        record.state = None;
        let validated = record.clone();
        assert!(matches!(
            b.build(&record, Some(&validated)).unwrap(),
            BuildOutcome::Remove
        ));
    }

    #[test]
    fn test_deleted_state_indexes_when_flag_is_off() {
        let mut record = dataset("d1", "water-quality");
        record.state = Some("deleted".into());
        let doc = build(&builder(), &record);
        assert_eq!(doc.get_str("state"), Some("deleted"));
    }

    #[test]
    fn test_extras_join_the_main_namespace() {
        let mut record = dataset("d1", "water-quality");
        record.extras = vec![
            Extra::new("spatial coverage!", "basin"),
            Extra::new("codes", json!(["a", "b"])),
        ];
        let doc = build(&builder(), &record);

        // Key characters outside the whitelist are dropped.
        assert_eq!(doc.get_str("extras_spatialcoverage"), Some("basin"));
        assert_eq!(doc.get_str("spatialcoverage"), Some("basin"));
        // Array values join with single spaces.
        assert_eq!(doc.get_str("extras_codes"), Some("a b"));
        assert_eq!(doc.get_str("codes"), Some("a b"));
        // The raw extras list is gone.
        assert!(!doc.contains_field("extras"));
    }

    #[test]
    fn test_extra_colliding_with_real_field_only_gets_the_prefix() {
        let mut record = dataset("d1", "water-quality");
        record.extras = vec![Extra::new("title", "shadow")];
        let doc = build(&builder(), &record);

        assert_eq!(doc.get_str("extras_title"), Some("shadow"));
        // First write wins; the real title is untouched.
        assert_eq!(doc.get_str("title"), Some("Water Quality"));
    }

    #[test]
    fn test_extra_colliding_with_reserved_field_only_gets_the_prefix() {
        let mut record = dataset("d1", "water-quality");
        record.extras = vec![Extra::new("site_id", "spoofed")];
        let doc = build(&builder(), &record);

        assert_eq!(doc.get_str("extras_site_id"), Some("spoofed"));
        assert_eq!(doc.get_str("site_id"), Some("site-a"));
    }

    #[test]
    fn test_vocabulary_tags_become_facet_fields() {
        let mut record = dataset("d1", "water-quality");
        record.tags = vec![
            Tag::scoped("jazz", "v1"),
            Tag::free("swing"),
            Tag::scoped("blues", "v1"),
        ];
        let doc = build(&builder(), &record);

        // Same-vocabulary tags accumulate in encounter order.
        assert_eq!(doc.get("vocab_genre"), Some(&json!(["jazz", "blues"])));
        assert_eq!(doc.get("tags"), Some(&json!(["swing"])));
    }

    #[test]
    fn test_unknown_vocabulary_is_an_integrity_error() {
        let mut record = dataset("d1", "water-quality");
        record.tags = vec![Tag::scoped("jazz", "missing-vocab")];
        let validated = record.clone();
        let err = builder().build(&record, Some(&validated)).unwrap_err();
        assert!(matches!(err, PipelineError::IntegrityError(_)));
    }

    #[test]
    fn test_groups_and_organization_flatten_to_names() {
        let mut record = dataset("d1", "water-quality");
        record.groups = vec![
            Group { name: "environment".into(), title: None },
            Group { name: "rivers".into(), title: Some("Rivers".into()) },
        ];
        record.organization = Some(Organization {
            id: "o1".into(),
            name: "env-agency".into(),
            title: Some("Environment Agency".into()),
        });
        let doc = build(&builder(), &record);

        assert_eq!(doc.get("groups"), Some(&json!(["environment", "rivers"])));
        assert_eq!(doc.get_str("organization"), Some("env-agency"));
    }

    #[test]
    fn test_missing_organization_is_null() {
        let record = dataset("d1", "water-quality");
        let doc = build(&builder(), &record);
        assert_eq!(doc.get("organization"), Some(&Value::Null));
    }

    #[test]
    fn test_resources_flatten_to_aligned_lists() {
        let mut record = dataset("d1", "water-quality");
        let mut first = Resource {
            name: Some("readings.csv".into()),
            format: Some("csv".into()),
            url: Some("http://example.org/readings.csv".into()),
            ..Default::default()
        };
        first.extras.insert("size".into(), json!("2048"));
        let second = Resource {
            name: Some("api".into()),
            resource_type: Some("api".into()),
            ..Default::default()
        };
        record.resources = vec![first, second];

        let config =
            SearchConfig::new("site-a").with_extra_resource_fields(vec!["size".to_string()]);
        let doc = build(&builder_with(config, catalog()), &record);

        assert_eq!(doc.get("res_name"), Some(&json!(["readings.csv", "api"])));
        assert_eq!(doc.get("res_format"), Some(&json!(["csv", ""])));
        assert_eq!(
            doc.get("res_url"),
            Some(&json!(["http://example.org/readings.csv", ""]))
        );
        assert_eq!(doc.get("res_type"), Some(&json!(["", "api"])));
        assert_eq!(doc.get("res_extras_size"), Some(&json!(["2048", ""])));
        assert!(!doc.contains_field("resources"));
    }

    #[test]
    fn test_relationships_keep_only_the_other_name() {
        let mut record = dataset("d1", "water-quality");
        record.relationships_as_subject = vec![Relationship {
            kind: "depends_on".into(),
            subject_dataset_id: "d1".into(),
            object_dataset_id: "d2".into(),
            comment: None,
        }];
        record.relationships_as_object = vec![Relationship {
            kind: "links_to".into(),
            subject_dataset_id: "d2".into(),
            object_dataset_id: "d1".into(),
            comment: None,
        }];
        let doc = build(&builder(), &record);

        // As-subject keeps the label and resolves the object's name.
        assert_eq!(doc.get("depends_on"), Some(&json!(["river-levels"])));
        // As-object reverses the label and resolves the subject's name.
        assert_eq!(doc.get("linked_from"), Some(&json!(["river-levels"])));
        assert!(!doc.contains_field("relationships_as_subject"));
        assert!(!doc.contains_field("relationships_as_object"));
    }

    #[test]
    fn test_relationship_group_never_overwrites_existing_field() {
        let mut record = dataset("d1", "water-quality");
        record.extras = vec![Extra::new("depends_on", "handwritten")];
        record.relationships_as_subject = vec![Relationship {
            kind: "depends_on".into(),
            subject_dataset_id: "d1".into(),
            object_dataset_id: "d2".into(),
            comment: None,
        }];
        let doc = build(&builder(), &record);

        // The extra wrote first; the relationship group is suppressed.
        assert_eq!(doc.get_str("depends_on"), Some("handwritten"));
    }

    #[test]
    fn test_unresolvable_relationship_target_is_an_integrity_error() {
        let mut record = dataset("d1", "water-quality");
        record.relationships_as_subject = vec![Relationship {
            kind: "depends_on".into(),
            subject_dataset_id: "d1".into(),
            object_dataset_id: "ghost".into(),
            comment: None,
        }];
        let validated = record.clone();
        let err = builder().build(&record, Some(&validated)).unwrap_err();
        assert!(matches!(err, PipelineError::IntegrityError(_)));
    }

    #[test]
    fn test_date_fields_are_normalized() {
        let mut record = dataset("d1", "water-quality");
        record
            .additional
            .insert("embargo_date".into(), json!("2024-12-01"));
        record
            .additional
            .insert("review_date".into(), json!("2024-05-01T09:30:00+02:00"));
        let doc = build(&builder(), &record);

        assert_eq!(doc.get_str("embargo_date"), Some("2024-12-01T00:00:00Z"));
        // Already zoned: kept as-is, no extra suffix.
        assert_eq!(doc.get_str("review_date"), Some("2024-05-01T09:30:00+02:00"));
    }

    #[test]
    fn test_invalid_date_drops_the_field_not_the_build() {
        let mut record = dataset("d1", "water-quality");
        record
            .additional
            .insert("embargo_date".into(), json!("not-a-date"));
        record.additional.insert("release_date".into(), json!(""));
        let doc = build(&builder(), &record);

        assert!(!doc.contains_field("embargo_date"));
        assert!(!doc.contains_field("release_date"));
    }

    #[test]
    fn test_metadata_timestamps_gain_exactly_one_z() {
        let record = dataset("d1", "water-quality");
        let doc = build(&builder(), &record);

        assert_eq!(doc.get_str("metadata_created"), Some("2024-05-01T09:30:00Z"));
        assert_eq!(doc.get_str("metadata_modified"), Some("2024-06-01T10:00:00Z"));
    }

    #[test]
    fn test_title_is_left_stripped_and_sanitized() {
        let mut record = dataset("d1", "water-quality");
        record.title = Some("  \u{01}Water Quality".into());
        let doc = build(&builder(), &record);

        assert_eq!(doc.get_str("title"), Some("Water Quality"));
        // The sort copy keeps its leading spaces; only illegal characters go.
        assert_eq!(doc.get_str("title_string"), Some("  Water Quality"));
    }

    #[test]
    fn test_notes_are_sanitized() {
        let mut record = dataset("d1", "water-quality");
        record.notes = Some("field\u{0c}notes".into());
        let doc = build(&builder(), &record);
        assert_eq!(doc.get_str("notes"), Some("fieldnotes"));
    }

    #[test]
    fn test_index_id_is_a_pure_function_of_id_and_site() {
        let record = dataset("d1", "water-quality");
        let first = build(&builder(), &record);
        let second = build(&builder(), &record);
        assert_eq!(first.get_str("index_id"), second.get_str("index_id"));
        assert_eq!(first.get_str("index_id").unwrap().len(), 32);

        let other_record = build(&builder(), &dataset("d2", "river-levels"));
        assert_ne!(first.get_str("index_id"), other_record.get_str("index_id"));

        let other_site = builder_with(SearchConfig::new("site-b"), catalog());
        let doc = build(&other_site, &record);
        assert_ne!(first.get_str("index_id"), doc.get_str("index_id"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut record = dataset("d1", "water-quality");
        record.tags = vec![Tag::scoped("jazz", "v1"), Tag::free("swing")];
        record.extras = vec![Extra::new("codes", json!(["a", "b"]))];
        record.groups = vec![Group { name: "environment".into(), title: None }];

        let b = builder();
        assert_eq!(build(&b, &record), build(&b, &record));
    }

    /// Hook double that records its invocation order and applies a mutation.
    struct TaggingHook {
        field: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl IndexDocumentHook for TaggingHook {
        fn before_index(&self, mut document: IndexedDocument) -> IndexedDocument {
            self.order.lock().unwrap().push(self.field);
            document.insert(self.field, json!(true));
            document
        }
    }

    struct EmptyingHook;

    impl IndexDocumentHook for EmptyingHook {
        fn before_index(&self, _document: IndexedDocument) -> IndexedDocument {
            IndexedDocument::new()
        }
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let hooks: Vec<Arc<dyn IndexDocumentHook>> = vec![
            Arc::new(TaggingHook { field: "first_hook", order: order.clone() }),
            Arc::new(TaggingHook { field: "second_hook", order: order.clone() }),
        ];
        let b = builder().with_hooks(hooks);

        let doc = build(&b, &dataset("d1", "water-quality"));
        assert_eq!(*order.lock().unwrap(), vec!["first_hook", "second_hook"]);
        assert_eq!(doc.get("first_hook"), Some(&json!(true)));
        assert_eq!(doc.get("second_hook"), Some(&json!(true)));
    }

    #[test]
    fn test_hook_returning_empty_document_is_a_contract_error() {
        let b = builder().with_hooks(vec![Arc::new(EmptyingHook)]);
        let record = dataset("d1", "water-quality");
        let validated = record.clone();
        let err = b.build(&record, Some(&validated)).unwrap_err();
        assert!(matches!(err, PipelineError::PluginContractError(_)));
    }

    #[test]
    fn test_permission_labels_come_from_the_label_service() {
        let record = dataset("d1", "water-quality");
        let doc = build(&builder(), &record);
        assert_eq!(doc.get("permission_labels"), Some(&json!(["public"])));
    }

    #[test]
    fn test_concurrently_deleted_record_gets_no_labels() {
        // Not present in the fixture catalog, so the re-resolution fails.
        let record = dataset("vanished", "vanished");
        let doc = build(&builder(), &record);
        assert_eq!(doc.get("permission_labels"), Some(&json!([])));
    }
}
