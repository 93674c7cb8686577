//! Typed collection planning over the mapping engine.
//!
//! [`CollectionPlanner`] is the narrow, typed entry point evidence tools use:
//! it composes a [`MappingsLoader`], type-checks what crosses the boundary
//! (task references in, [`DocumentType`]d requests out), and otherwise
//! delegates everything to the shared engine. Fetching the documents and
//! rendering reports stay with the caller.

use crate::loader::{MappingError, MappingsLoader};
use crate::params::{self, DocumentType};
use crate::schema::{EvidenceMapping, ValidationRules};
use chrono::NaiveDate;
use grc_common::Settings;
use serde_json::{Map, Value};
use tracing::{info, warn};

/// A fully resolved plan for collecting one evidence task's documents.
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    pub task_ref: String,
    pub description: String,
    pub source_type: String,
    pub priority: String,
    pub refresh_schedule: String,
    pub requests: Vec<DocumentRequest>,
}

/// One document to fetch: typed identity plus the flat parameter set the
/// extraction client consumes, and the acceptance rules to apply afterwards.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub document_id: String,
    pub document_name: String,
    pub document_type: DocumentType,
    pub params: Map<String, Value>,
    pub acceptance: ValidationRules,
}

/// Plans evidence collection from configured mappings.
pub struct CollectionPlanner {
    loader: MappingsLoader,
}

impl CollectionPlanner {
    /// Create a planner with its own loader built from tool settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            loader: MappingsLoader::new(settings),
        }
    }

    /// Create a planner over an existing loader.
    pub fn from_loader(loader: MappingsLoader) -> Self {
        Self { loader }
    }

    /// Resolve, access-validate, and flatten the mapping for a task into a
    /// collection plan. Documents whose parameters cannot be produced are
    /// skipped with a warning; a plan with no usable documents is an error.
    pub fn plan_for_task(&self, task_ref: &str) -> grc_common::Result<CollectionPlan> {
        info!(task_ref, "planning evidence collection");

        let mapping = self.loader.mapping_for(task_ref)?;
        params::validate_document_access(&mapping)?;

        let mut requests = Vec::new();
        for (index, doc) in mapping.documents.iter().enumerate() {
            let Some(document_type) = DocumentType::parse(&doc.document_type) else {
                // Access validation has already rejected unknown types.
                warn!(task_ref, document_id = %doc.document_id, "skipping document with unrecognized type");
                continue;
            };

            let params = match self.loader.api_parameters(&mapping, index) {
                Ok(params) => params,
                Err(err) => {
                    warn!(
                        task_ref,
                        document_id = %doc.document_id,
                        error = %err,
                        "skipping document without usable parameters"
                    );
                    continue;
                }
            };

            requests.push(DocumentRequest {
                document_id: doc.document_id.clone(),
                document_name: doc.document_name.clone(),
                document_type,
                params,
                acceptance: doc.validation.clone(),
            });
        }

        if requests.is_empty() {
            return Err(MappingError::NoUsableDocuments {
                task_ref: task_ref.to_string(),
            }
            .into());
        }

        info!(
            task_ref,
            request_count = requests.len(),
            "evidence collection plan ready"
        );

        Ok(CollectionPlan {
            task_ref: mapping.task_ref,
            description: mapping.description,
            source_type: mapping.source_type,
            priority: mapping.priority,
            refresh_schedule: self.loader.refresh_schedule(task_ref),
            requests,
        })
    }

    /// Task references this planner can produce plans for.
    pub fn supported_tasks(&self) -> grc_common::Result<Vec<String>> {
        Ok(self.loader.task_refs()?)
    }

    /// The raw mapping behind a task, for callers that present it.
    pub fn task_mapping(&self, task_ref: &str) -> grc_common::Result<EvidenceMapping> {
        Ok(self.loader.mapping_for(task_ref)?)
    }

    /// Drop the cached mapping set, forcing a reload on the next plan.
    pub fn refresh(&self) {
        self.loader.invalidate();
        info!("refreshed evidence mappings cache");
    }
}

/// Outcome of checking extracted content against a document's acceptance
/// rules. `passed` reflects errors only; warnings are advisory.
#[derive(Debug, Clone, Default)]
pub struct ContentAssessment {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Apply acceptance rules to already-extracted content.
///
/// Too-short content is an error; missing keywords and out-of-range
/// modification dates are warnings.
pub fn assess_content(
    rules: &ValidationRules,
    content: &str,
    modified: Option<NaiveDate>,
) -> ContentAssessment {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(min) = rules.min_content_length {
        if content.len() < min {
            errors.push(format!(
                "content length {} is below minimum {}",
                content.len(),
                min
            ));
        }
    }

    if !rules.required_keywords.is_empty() {
        let lowered = content.to_lowercase();
        for keyword in &rules.required_keywords {
            if !lowered.contains(&keyword.to_lowercase()) {
                warnings.push(format!("required keyword '{keyword}' not found in content"));
            }
        }
    }

    if let (Some(range), Some(modified)) = (&rules.date_range, modified) {
        if !range.from.is_empty() {
            if let Ok(from) = NaiveDate::parse_from_str(&range.from, "%Y-%m-%d") {
                if modified < from {
                    warnings.push(format!(
                        "document date {modified} is before required range start {}",
                        range.from
                    ));
                }
            }
        }

        if !range.to.is_empty() {
            if let Ok(to) = NaiveDate::parse_from_str(&range.to, "%Y-%m-%d") {
                if modified > to {
                    warnings.push(format!(
                        "document date {modified} is after required range end {}",
                        range.to
                    ));
                }
            }
        }
    }

    ContentAssessment {
        passed: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderConfig;
    use crate::resolve::MAPPINGS_FILE_NAME;
    use crate::schema::DateRange;
    use tempfile::TempDir;

    const PLAN_YAML: &str = r#"
google_workspace:
  auth:
    credentials_path: /etc/grcmap/credentials.json
evidence_mappings:
  ET54:
    task_ref: ET54
    description: Access control policy document
    source_type: google_docs
    priority: high
    documents:
      - document_id: doc-1
        document_name: Access Control Policy
        document_type: docs
        validation:
          min_content_length: 100
      - document_id: sheet-2
        document_type: sheets
        extraction_rules:
          sheet_range: "A1:D10"
  ET60:
    task_ref: ET60
    source_type: wiki_export
    priority: low
    documents:
      - document_id: page-1
        document_type: wiki
metadata:
  refresh_schedule:
    ET54: weekly
"#;

    fn planner_in(dir: &TempDir) -> CollectionPlanner {
        std::fs::write(dir.path().join(MAPPINGS_FILE_NAME), PLAN_YAML).unwrap();
        CollectionPlanner::from_loader(MappingsLoader::with_config(
            LoaderConfig::new().with_data_dir(dir.path()),
        ))
    }

    // ── Planner ────────────────────────────────────────────────────

    #[test]
    fn plan_carries_typed_requests() {
        let dir = TempDir::new().unwrap();
        let planner = planner_in(&dir);

        let plan = planner.plan_for_task("ET54").unwrap();
        assert_eq!(plan.task_ref, "ET54");
        assert_eq!(plan.priority, "high");
        assert_eq!(plan.refresh_schedule, "weekly");
        assert_eq!(plan.requests.len(), 2);

        let first = &plan.requests[0];
        assert_eq!(first.document_type, DocumentType::Docs);
        assert_eq!(first.document_name, "Access Control Policy");
        assert_eq!(first.params["document_id"], "doc-1");
        assert_eq!(first.acceptance.min_content_length, Some(100));

        let second = &plan.requests[1];
        assert_eq!(second.document_type, DocumentType::Sheets);
        let extraction = second.params["extraction_rules"].as_object().unwrap();
        assert_eq!(extraction["sheet_range"], "A1:D10");
    }

    #[test]
    fn plan_for_unknown_task_is_task_not_found() {
        let dir = TempDir::new().unwrap();
        let planner = planner_in(&dir);

        let err = planner.plan_for_task("ET99").unwrap_err();
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn plan_rejects_unrecognized_document_type() {
        // ET60 loads fine but fails the stricter access check on demand.
        let dir = TempDir::new().unwrap();
        let planner = planner_in(&dir);

        let err = planner.plan_for_task("ET60").unwrap_err();
        assert_eq!(err.code(), 21);
        assert!(err.to_string().contains("wiki"));
    }

    #[test]
    fn supported_tasks_lists_all() {
        let dir = TempDir::new().unwrap();
        let planner = planner_in(&dir);

        assert_eq!(planner.supported_tasks().unwrap(), vec!["ET54", "ET60"]);
    }

    #[test]
    fn task_mapping_passthrough() {
        let dir = TempDir::new().unwrap();
        let planner = planner_in(&dir);

        let mapping = planner.task_mapping("ET54").unwrap();
        assert_eq!(mapping.documents.len(), 2);
    }

    #[test]
    fn refresh_clears_the_loader_cache() {
        let dir = TempDir::new().unwrap();
        let planner = planner_in(&dir);

        planner.plan_for_task("ET54").unwrap();
        assert!(planner.loader.last_loaded().is_some());

        planner.refresh();
        assert!(planner.loader.last_loaded().is_none());
    }

    // ── Content assessment ─────────────────────────────────────────

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_rules_pass_anything() {
        let assessment = assess_content(&ValidationRules::default(), "", None);
        assert!(assessment.passed);
        assert!(assessment.errors.is_empty());
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn short_content_is_an_error() {
        let rules = ValidationRules {
            min_content_length: Some(100),
            ..Default::default()
        };
        let assessment = assess_content(&rules, "too short", None);
        assert!(!assessment.passed);
        assert_eq!(assessment.errors.len(), 1);
        assert!(assessment.errors[0].contains("below minimum 100"));
    }

    #[test]
    fn keyword_check_is_case_insensitive() {
        let rules = ValidationRules {
            required_keywords: vec!["Access Control".to_string(), "encryption".to_string()],
            ..Default::default()
        };
        let assessment = assess_content(&rules, "Our ACCESS CONTROL policy...", None);
        // Keywords are warnings, so the content still passes.
        assert!(assessment.passed);
        assert_eq!(assessment.warnings.len(), 1);
        assert!(assessment.warnings[0].contains("encryption"));
    }

    #[test]
    fn date_outside_range_warns() {
        let rules = ValidationRules {
            date_range: Some(DateRange {
                column: String::new(),
                from: "2026-01-01".to_string(),
                to: "2026-06-30".to_string(),
            }),
            ..Default::default()
        };

        let early = assess_content(&rules, "content", Some(date("2025-12-01")));
        assert!(early.passed);
        assert_eq!(early.warnings.len(), 1);
        assert!(early.warnings[0].contains("before required range start"));

        let late = assess_content(&rules, "content", Some(date("2026-07-15")));
        assert_eq!(late.warnings.len(), 1);
        assert!(late.warnings[0].contains("after required range end"));

        let inside = assess_content(&rules, "content", Some(date("2026-03-01")));
        assert!(inside.warnings.is_empty());
    }

    #[test]
    fn date_range_ignored_without_modification_date() {
        let rules = ValidationRules {
            date_range: Some(DateRange {
                column: String::new(),
                from: "2026-01-01".to_string(),
                to: String::new(),
            }),
            ..Default::default()
        };
        let assessment = assess_content(&rules, "content", None);
        assert!(assessment.passed);
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn errors_and_warnings_accumulate() {
        let rules = ValidationRules {
            min_content_length: Some(1000),
            required_keywords: vec!["audit".to_string()],
            ..Default::default()
        };
        let assessment = assess_content(&rules, "nothing relevant", None);
        assert!(!assessment.passed);
        assert_eq!(assessment.errors.len(), 1);
        assert_eq!(assessment.warnings.len(), 1);
    }
}
