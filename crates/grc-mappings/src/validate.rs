//! Load-time structural validation of a parsed mapping set.
//!
//! Validation guards the invariants every consumer relies on: mappings keyed
//! consistently, a source type on every mapping, and at least one document
//! with an identity per mapping. The document-type enumeration is deliberately
//! NOT checked here; that stricter check runs on demand at access-validation
//! time, so a document with an unrecognized type still loads.

use crate::schema::MappingSet;
use thiserror::Error;

/// A structural defect that makes a mapping set unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("no evidence mappings defined")]
    NoMappingsDefined,

    #[error("task_ref mismatch for mapping {key}")]
    TaskRefMismatch { key: String },

    #[error("source_type is required for mapping {task_ref}")]
    MissingSourceType { task_ref: String },

    #[error("at least one document is required for mapping {task_ref}")]
    NoDocuments { task_ref: String },

    #[error("{field} is required for document {index} in mapping {task_ref}")]
    MissingDocumentField {
        task_ref: String,
        index: usize,
        field: &'static str,
    },
}

/// Validate a freshly parsed mapping set.
///
/// Returns the first defect found, walking mappings in key order.
pub fn validate(set: &MappingSet) -> Result<(), ValidationIssue> {
    if set.evidence_mappings.is_empty() {
        return Err(ValidationIssue::NoMappingsDefined);
    }

    for (key, mapping) in &set.evidence_mappings {
        if mapping.task_ref != *key {
            return Err(ValidationIssue::TaskRefMismatch { key: key.clone() });
        }

        if mapping.source_type.is_empty() {
            return Err(ValidationIssue::MissingSourceType {
                task_ref: key.clone(),
            });
        }

        if mapping.documents.is_empty() {
            return Err(ValidationIssue::NoDocuments {
                task_ref: key.clone(),
            });
        }

        for (index, doc) in mapping.documents.iter().enumerate() {
            if doc.document_id.is_empty() {
                return Err(ValidationIssue::MissingDocumentField {
                    task_ref: key.clone(),
                    index,
                    field: "document_id",
                });
            }

            if doc.document_type.is_empty() {
                return Err(ValidationIssue::MissingDocumentField {
                    task_ref: key.clone(),
                    index,
                    field: "document_type",
                });
            }
        }
    }

    Ok(())
}
