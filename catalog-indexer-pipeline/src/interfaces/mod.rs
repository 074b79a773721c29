//! Collaborator interfaces consumed by the pipeline.
//!
//! The record store, vocabulary registry, relationship-type mapping,
//! permission-label computation, and document-mutation hooks are all external
//! concerns; the builder only sees these traits.

use catalog_indexer_shared::{Dataset, IndexedDocument, Vocabulary};

/// Lookup-by-id access to the record store.
pub trait DatasetLookup: Send + Sync {
    /// Resolve a dataset by its identifier; `None` if it does not exist (or
    /// was deleted concurrently).
    fn find_by_id(&self, id: &str) -> Option<Dataset>;
}

/// Lookup-by-id access to the vocabulary registry.
pub trait VocabularyLookup: Send + Sync {
    fn find_by_id(&self, id: &str) -> Option<Vocabulary>;
}

/// Pure mapping between forward and reverse relationship type labels.
pub trait RelationshipTypeMap: Send + Sync {
    /// The label describing the same edge read from the other end.
    fn reverse(&self, kind: &str) -> String;
}

/// Computes the visibility labels that scope a dataset in search.
pub trait PermissionLabelProvider: Send + Sync {
    fn labels_for(&self, dataset: &Dataset) -> Vec<String>;
}

/// A third-party mutation applied to every document before it is sent.
///
/// Hooks run in registration order, each receiving the document the previous
/// hook returned. Returning an empty document violates the contract and
/// aborts the indexing attempt.
pub trait IndexDocumentHook: Send + Sync {
    fn before_index(&self, document: IndexedDocument) -> IndexedDocument;
}

/// The built-in relationship vocabulary.
///
/// Reverses either direction of each known pair and leaves unknown labels
/// unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRelationshipTypes;

impl RelationshipTypeMap for StandardRelationshipTypes {
    fn reverse(&self, kind: &str) -> String {
        match kind {
            "depends_on" => "dependency_of",
            "dependency_of" => "depends_on",
            "derives_from" => "has_derivation",
            "has_derivation" => "derives_from",
            "links_to" => "linked_from",
            "linked_from" => "links_to",
            "child_of" => "parent_of",
            "parent_of" => "child_of",
            other => other,
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_known_pairs_both_directions() {
        let types = StandardRelationshipTypes;
        assert_eq!(types.reverse("depends_on"), "dependency_of");
        assert_eq!(types.reverse("dependency_of"), "depends_on");
        assert_eq!(types.reverse("child_of"), "parent_of");
        assert_eq!(types.reverse("parent_of"), "child_of");
        assert_eq!(types.reverse("links_to"), "linked_from");
        assert_eq!(types.reverse("has_derivation"), "derives_from");
    }

    #[test]
    fn test_unknown_labels_pass_through() {
        let types = StandardRelationshipTypes;
        assert_eq!(types.reverse("references"), "references");
    }
}
