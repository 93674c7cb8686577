//! Cascading defaults for a validated mapping set.
//!
//! Applied exactly once per load cycle, after validation and before the set
//! is cached. Only absent fields are filled in: a document rule that spells
//! out a value, including an explicit `max_results: 0`, keeps it. Boolean
//! flags follow the looser rule that a workspace-level `true` turns the flag
//! on but never off.

use crate::schema::MappingSet;

/// Result cap used when neither the document rule nor the workspace
/// defaults provide a positive one.
pub const FALLBACK_MAX_RESULTS: u32 = 20;

/// Content cache lifetime handed to callers when the document does not set
/// one. Not parsed by this subsystem.
pub const DEFAULT_CACHE_DURATION: &str = "24h";

/// Default API rate limit.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Default concurrent request cap.
pub const DEFAULT_CONCURRENT_REQUESTS: u32 = 5;

/// Cascade workspace-level defaults into fields left unset by individual
/// document rules, and fill in absent cache settings.
pub fn apply_defaults(set: &mut MappingSet) {
    let workspace_rules = set.google_workspace.default_extraction_rules.clone();

    for mapping in set.evidence_mappings.values_mut() {
        for doc in &mut mapping.documents {
            let rules = &mut doc.extraction_rules;

            if rules.max_results.is_none() {
                rules.max_results = match workspace_rules.max_results {
                    Some(n) if n > 0 => Some(n),
                    _ => Some(FALLBACK_MAX_RESULTS),
                };
            }

            if !rules.include_metadata && workspace_rules.include_metadata {
                rules.include_metadata = true;
            }
        }
    }

    let cache = &mut set.cache_settings;
    if cache.cache_duration.is_none() {
        cache.cache_duration = Some(DEFAULT_CACHE_DURATION.to_string());
    }

    if cache.rate_limits.requests_per_minute.is_none() {
        cache.rate_limits.requests_per_minute = Some(DEFAULT_REQUESTS_PER_MINUTE);
    }

    if cache.rate_limits.concurrent_requests.is_none() {
        cache.rate_limits.concurrent_requests = Some(DEFAULT_CONCURRENT_REQUESTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> MappingSet {
        MappingSet::parse_yaml(yaml).unwrap()
    }

    fn single_doc_yaml(extraction: &str, workspace: &str) -> String {
        format!(
            r#"
google_workspace:
  default_extraction_rules:
{workspace}
evidence_mappings:
  ET1:
    task_ref: ET1
    source_type: google_docs
    documents:
      - document_id: doc-1
        document_type: docs
{extraction}
"#
        )
    }

    fn doc_max_results(set: &MappingSet) -> Option<u32> {
        set.evidence_mappings["ET1"].documents[0]
            .extraction_rules
            .max_results
    }

    #[test]
    fn unset_max_results_takes_workspace_default() {
        let yaml = single_doc_yaml("", "    max_results: 50");
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert_eq!(doc_max_results(&set), Some(50));
    }

    #[test]
    fn unset_max_results_falls_back_when_workspace_default_zero() {
        let yaml = single_doc_yaml("", "    max_results: 0");
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert_eq!(doc_max_results(&set), Some(FALLBACK_MAX_RESULTS));
    }

    #[test]
    fn unset_max_results_falls_back_when_workspace_default_absent() {
        let yaml = single_doc_yaml("", "    include_metadata: false");
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert_eq!(doc_max_results(&set), Some(FALLBACK_MAX_RESULTS));
    }

    #[test]
    fn explicit_max_results_preserved() {
        let yaml = single_doc_yaml(
            "        extraction_rules:\n          max_results: 7",
            "    max_results: 50",
        );
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert_eq!(doc_max_results(&set), Some(7));
    }

    #[test]
    fn explicit_zero_max_results_preserved() {
        let yaml = single_doc_yaml(
            "        extraction_rules:\n          max_results: 0",
            "    max_results: 50",
        );
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert_eq!(doc_max_results(&set), Some(0));
    }

    #[test]
    fn include_metadata_turned_on_by_workspace_default() {
        let yaml = single_doc_yaml("", "    include_metadata: true");
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert!(
            set.evidence_mappings["ET1"].documents[0]
                .extraction_rules
                .include_metadata
        );
    }

    #[test]
    fn include_metadata_never_turned_off() {
        let yaml = single_doc_yaml(
            "        extraction_rules:\n          include_metadata: true",
            "    include_metadata: false",
        );
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert!(
            set.evidence_mappings["ET1"].documents[0]
                .extraction_rules
                .include_metadata
        );
    }

    #[test]
    fn cache_settings_filled_in() {
        let yaml = single_doc_yaml("", "    include_metadata: false");
        let mut set = parse(&yaml);
        apply_defaults(&mut set);
        assert_eq!(
            set.cache_settings.cache_duration.as_deref(),
            Some(DEFAULT_CACHE_DURATION)
        );
        assert_eq!(
            set.cache_settings.rate_limits.requests_per_minute,
            Some(DEFAULT_REQUESTS_PER_MINUTE)
        );
        assert_eq!(
            set.cache_settings.rate_limits.concurrent_requests,
            Some(DEFAULT_CONCURRENT_REQUESTS)
        );
    }

    #[test]
    fn explicit_cache_settings_preserved() {
        let yaml = r#"
evidence_mappings:
  ET1:
    task_ref: ET1
    source_type: google_docs
    documents:
      - document_id: doc-1
        document_type: docs
cache_settings:
  cache_duration: 1h
  rate_limits:
    requests_per_minute: 10
    concurrent_requests: 2
"#;
        let mut set = parse(yaml);
        apply_defaults(&mut set);
        assert_eq!(set.cache_settings.cache_duration.as_deref(), Some("1h"));
        assert_eq!(set.cache_settings.rate_limits.requests_per_minute, Some(10));
        assert_eq!(set.cache_settings.rate_limits.concurrent_requests, Some(2));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let yaml = single_doc_yaml("", "    max_results: 0\n    include_metadata: true");
        let mut once = parse(&yaml);
        apply_defaults(&mut once);

        let mut twice = once.clone();
        apply_defaults(&mut twice);

        assert_eq!(once, twice);
    }
}
