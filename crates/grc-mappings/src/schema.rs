//! Evidence mapping configuration types.
//!
//! These types match the `google_evidence_mappings.yaml` document layout:
//! a root object with `google_workspace`, `evidence_mappings`, `metadata`,
//! and `cache_settings` keys, all in lower snake case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete evidence mapping configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSet {
    #[serde(default)]
    pub google_workspace: WorkspaceConfig,

    #[serde(default)]
    pub evidence_mappings: BTreeMap<String, EvidenceMapping>,

    #[serde(default)]
    pub metadata: MappingMetadata,

    #[serde(default)]
    pub cache_settings: CacheSettings,
}

/// Global workspace configuration shared by all mappings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub default_extraction_rules: ExtractionRules,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub credentials_path: Option<String>,

    #[serde(default)]
    pub scopes: Vec<String>,
}

/// One evidence task's sourcing rule: which documents satisfy it and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceMapping {
    /// Identity; must equal the `evidence_mappings` key it is stored under.
    #[serde(default)]
    pub task_ref: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub source_type: String,

    #[serde(default)]
    pub priority: String,

    #[serde(default)]
    pub documents: Vec<DocumentRule>,
}

/// Configuration for one external document contributing to a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRule {
    #[serde(default)]
    pub document_id: String,

    #[serde(default)]
    pub document_name: String,

    #[serde(default)]
    pub document_type: String,

    #[serde(default)]
    pub extraction_rules: ExtractionRules,

    #[serde(default)]
    pub validation: ValidationRules,
}

/// How content should be extracted from a document.
///
/// Every sub-structure is present-or-absent as a unit; fields inside a
/// present sub-structure are individually optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionRules {
    // Basic extraction settings
    #[serde(default)]
    pub include_metadata: bool,

    #[serde(default)]
    pub include_revisions: bool,

    #[serde(default)]
    pub max_results: Option<u32>,

    // Document-specific settings
    #[serde(default)]
    pub sheet_range: Option<String>,

    #[serde(default)]
    pub search_query: Option<String>,

    #[serde(default)]
    pub file_types: Vec<String>,

    // Content filtering
    #[serde(default)]
    pub content_filters: Vec<ContentFilter>,

    #[serde(default)]
    pub folder_filters: Option<FolderFilters>,

    // Structured data extraction (for sheets)
    #[serde(default)]
    pub column_mapping: BTreeMap<String, String>,

    #[serde(default)]
    pub data_validation: Option<DataValidation>,

    #[serde(default)]
    pub row_filters: Option<RowFilters>,

    #[serde(default)]
    pub aggregations: Vec<Aggregation>,

    // Forms-specific settings
    #[serde(default)]
    pub include_responses: bool,

    #[serde(default)]
    pub form_analysis: Option<FormAnalysis>,

    #[serde(default)]
    pub response_processing: Option<ResponseProcessing>,

    // Access review specific settings
    #[serde(default)]
    pub access_review_rules: Option<AccessReviewRules>,

    // Required metadata fields
    #[serde(default)]
    pub required_metadata: Vec<String>,
}

/// Pattern extracting a specific content section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFilter {
    #[serde(default)]
    pub section: String,

    #[serde(default)]
    pub pattern: String,
}

/// Filters applied to folder contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FolderFilters {
    #[serde(default)]
    pub include_patterns: Vec<String>,

    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    #[serde(default)]
    pub date_filter: Option<DateFilter>,
}

/// Date-based folder filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateFilter {
    #[serde(default)]
    pub field: String,

    #[serde(default)]
    pub after: Option<String>,

    #[serde(default)]
    pub before: Option<String>,
}

/// Validation rules for structured (tabular) data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataValidation {
    #[serde(default)]
    pub required_columns: Vec<String>,

    #[serde(default)]
    pub date_columns: Vec<String>,

    #[serde(default)]
    pub numeric_columns: Vec<String>,

    #[serde(default)]
    pub date_format: Option<String>,

    #[serde(default)]
    pub enum_columns: BTreeMap<String, Vec<String>>,
}

/// Spreadsheet row filtering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowFilters {
    #[serde(default)]
    pub status_column: Option<String>,

    #[serde(default)]
    pub include_status: Vec<String>,

    #[serde(default)]
    pub date_range: Option<DateRange>,
}

/// A date range bound. Empty `from`/`to` means unbounded on that side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub column: String,

    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub to: String,
}

/// Data aggregation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub group_by: String,
}

/// Analysis rules for forms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormAnalysis {
    #[serde(default)]
    pub required_questions: Vec<String>,

    #[serde(default)]
    pub validation_rules: Vec<FormFieldRule>,
}

/// A validation rule for one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFieldRule {
    #[serde(default)]
    pub field: String,

    #[serde(default)]
    pub required_text: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub range: Option<DateRange>,
}

/// How form responses are processed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseProcessing {
    #[serde(default)]
    pub max_responses: Option<u32>,

    #[serde(default)]
    pub include_metadata: bool,

    #[serde(default)]
    pub anonymize_personal_data: bool,

    #[serde(default)]
    pub extract_fields: Vec<String>,
}

/// Rules specific to access reviews.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccessReviewRules {
    #[serde(default)]
    pub certification_requirements: Vec<CertificationRequirement>,

    #[serde(default)]
    pub risk_indicators: Vec<RiskIndicator>,
}

/// Requirement for access certification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationRequirement {
    #[serde(default)]
    pub field: String,

    #[serde(default)]
    pub required_values: Vec<String>,

    #[serde(default)]
    pub cannot_be_empty: bool,

    /// Maximum age in days.
    #[serde(default)]
    pub within_period: Option<u32>,
}

/// Condition flagged as a risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicator {
    #[serde(default)]
    pub condition: String,

    #[serde(default)]
    pub flag: String,
}

/// Acceptance criteria applied to extracted content (not to this
/// configuration itself).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default)]
    pub min_content_length: Option<usize>,

    #[serde(default)]
    pub required_keywords: Vec<String>,

    #[serde(default)]
    pub date_range: Option<DateRange>,

    /// Expected refresh frequency of the source document.
    #[serde(default)]
    pub frequency: Option<String>,

    #[serde(default)]
    pub min_rows: Option<u32>,

    #[serde(default)]
    pub required_headers: Vec<String>,

    #[serde(default)]
    pub min_responses: Option<u32>,

    // Fractional thresholds, 0.0-1.0
    #[serde(default)]
    pub response_completeness: Option<f64>,

    #[serde(default)]
    pub certification_completeness: Option<f64>,

    #[serde(default)]
    pub reviewer_coverage: Option<f64>,

    #[serde(default)]
    pub required_training_modules: Vec<String>,
}

/// Metadata about the mapping configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingMetadata {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub created_date: Option<String>,

    #[serde(default)]
    pub updated_date: Option<String>,

    #[serde(default)]
    pub created_by: Option<String>,

    /// Per-task refresh cadence (e.g. "weekly", "monthly").
    #[serde(default)]
    pub refresh_schedule: BTreeMap<String, String>,

    /// Framework -> list of single-key {task_ref: [control, ...]} entries.
    #[serde(default)]
    pub compliance_frameworks: BTreeMap<String, Vec<BTreeMap<String, Vec<String>>>>,
}

/// Caller-facing caching configuration.
///
/// `cache_duration` governs document-content caching in consumers; it is
/// independent of the loader's own freshness window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enable_content_cache: bool,

    #[serde(default)]
    pub cache_duration: Option<String>,

    #[serde(default)]
    pub enable_incremental_sync: bool,

    #[serde(default)]
    pub rate_limits: RateLimits,
}

/// API rate limiting settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RateLimits {
    #[serde(default)]
    pub requests_per_minute: Option<u32>,

    #[serde(default)]
    pub concurrent_requests: Option<u32>,
}

impl MappingSet {
    /// Parse a mapping set from a YAML string.
    pub fn parse_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
