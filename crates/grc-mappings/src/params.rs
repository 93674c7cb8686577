//! Access validation and API parameter transformation.
//!
//! This is where the document-type enumeration is actually enforced. A
//! mapping with an unrecognized `document_type` loads fine; it fails here,
//! when a caller is about to hand the document to an extraction client.

use crate::loader::{MappingError, MappingsLoader};
use crate::schema::EvidenceMapping;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Document kinds the extraction client can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Docs,
    Sheets,
    Forms,
    Drive,
}

impl DocumentType {
    /// Parse the wire-format name. Returns None for unrecognized kinds.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "docs" => Some(DocumentType::Docs),
            "sheets" => Some(DocumentType::Sheets),
            "forms" => Some(DocumentType::Forms),
            "drive" => Some(DocumentType::Drive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Docs => "docs",
            DocumentType::Sheets => "sheets",
            DocumentType::Forms => "forms",
            DocumentType::Drive => "drive",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that every document in a mapping identifies a reachable document:
/// non-empty ID, non-empty type, and a type the extraction client supports.
pub fn validate_document_access(mapping: &EvidenceMapping) -> Result<(), MappingError> {
    debug!(
        task_ref = %mapping.task_ref,
        document_count = mapping.documents.len(),
        "validating document access"
    );

    for doc in &mapping.documents {
        if doc.document_id.is_empty() {
            return Err(MappingError::MissingDocumentId {
                task_ref: mapping.task_ref.clone(),
            });
        }

        if doc.document_type.is_empty() {
            return Err(MappingError::MissingDocumentType {
                task_ref: mapping.task_ref.clone(),
                document_id: doc.document_id.clone(),
            });
        }

        if DocumentType::parse(&doc.document_type).is_none() {
            return Err(MappingError::InvalidDocumentType {
                task_ref: mapping.task_ref.clone(),
                document_id: doc.document_id.clone(),
                document_type: doc.document_type.clone(),
            });
        }
    }

    Ok(())
}

impl MappingsLoader {
    /// Flatten one document rule into the parameter set an extraction client
    /// expects. Zero and empty optional fields are omitted: callers read
    /// absence as "not applicable".
    pub fn api_parameters(
        &self,
        mapping: &EvidenceMapping,
        document_index: usize,
    ) -> Result<Map<String, Value>, MappingError> {
        let doc = mapping.documents.get(document_index).ok_or_else(|| {
            MappingError::DocumentIndexOutOfRange {
                task_ref: mapping.task_ref.clone(),
                index: document_index,
            }
        })?;

        let mut params = Map::new();
        params.insert("document_id".into(), Value::from(doc.document_id.clone()));
        params.insert(
            "document_type".into(),
            Value::from(doc.document_type.clone()),
        );

        let rules = &doc.extraction_rules;
        let mut extraction = Map::new();
        extraction.insert(
            "include_metadata".into(),
            Value::from(rules.include_metadata),
        );
        extraction.insert(
            "include_revisions".into(),
            Value::from(rules.include_revisions),
        );

        if let Some(max_results) = rules.max_results {
            if max_results > 0 {
                extraction.insert("max_results".into(), Value::from(max_results));
            }
        }

        if let Some(sheet_range) = rules.sheet_range.as_deref() {
            if !sheet_range.is_empty() {
                extraction.insert("sheet_range".into(), Value::from(sheet_range));
            }
        }

        if let Some(search_query) = rules.search_query.as_deref() {
            if !search_query.is_empty() {
                extraction.insert("search_query".into(), Value::from(search_query));
            }
        }

        params.insert("extraction_rules".into(), Value::Object(extraction));

        // Credentials ride along with every request when configured.
        if let Ok(set) = self.load() {
            if let Some(path) = set.google_workspace.auth.credentials_path.as_deref() {
                if !path.is_empty() {
                    params.insert("credentials_path".into(), Value::from(path));
                }
            }
        }

        Ok(params)
    }
}
