//! grcmap evidence-mapping configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the `google_evidence_mappings.yaml` document
//! - A time-bounded cache of the parsed, validated, defaulted mapping set
//! - Structural validation and cascading workspace defaults
//! - Query operations by task reference, priority, source type, and
//!   compliance framework
//! - Access validation and API parameter transformation
//! - A typed collection planner for evidence tools

pub mod defaults;
pub mod loader;
pub mod params;
pub mod plan;
pub mod query;
pub mod resolve;
pub mod schema;
pub mod validate;

pub use defaults::apply_defaults;
pub use loader::{LoaderConfig, MappingError, MappingsLoader, DEFAULT_FRESHNESS_SECS};
pub use params::{validate_document_access, DocumentType};
pub use plan::{
    assess_content, CollectionPlan, CollectionPlanner, ContentAssessment, DocumentRequest,
};
pub use query::DEFAULT_REFRESH_SCHEDULE;
pub use schema::{EvidenceMapping, MappingSet};
pub use validate::{validate, ValidationIssue};
