//! Query operations over the cached mapping set.
//!
//! Every operation triggers a [`MappingsLoader::load`] when no fresh cache
//! exists and returns owned copies of the relevant slices, so callers can
//! never mutate the cached set through a query result.

use crate::loader::{MappingError, MappingsLoader};
use crate::schema::EvidenceMapping;
use std::collections::BTreeMap;
use tracing::warn;

/// Refresh cadence substituted when a task has no scheduled entry.
pub const DEFAULT_REFRESH_SCHEDULE: &str = "monthly";

impl MappingsLoader {
    /// The evidence mapping for a specific task reference.
    pub fn mapping_for(&self, task_ref: &str) -> Result<EvidenceMapping, MappingError> {
        let set = self.load()?;
        set.evidence_mappings
            .get(task_ref)
            .cloned()
            .ok_or_else(|| MappingError::MappingNotFound {
                task_ref: task_ref.to_string(),
            })
    }

    /// All evidence mappings, keyed by task reference.
    pub fn all_mappings(&self) -> Result<BTreeMap<String, EvidenceMapping>, MappingError> {
        Ok(self.load()?.evidence_mappings.clone())
    }

    /// Mappings whose priority exactly matches `priority`.
    pub fn mappings_by_priority(
        &self,
        priority: &str,
    ) -> Result<BTreeMap<String, EvidenceMapping>, MappingError> {
        let set = self.load()?;
        Ok(set
            .evidence_mappings
            .iter()
            .filter(|(_, mapping)| mapping.priority == priority)
            .map(|(task_ref, mapping)| (task_ref.clone(), mapping.clone()))
            .collect())
    }

    /// Mappings whose source type exactly matches `source_type`.
    pub fn mappings_by_source_type(
        &self,
        source_type: &str,
    ) -> Result<BTreeMap<String, EvidenceMapping>, MappingError> {
        let set = self.load()?;
        Ok(set
            .evidence_mappings
            .iter()
            .filter(|(_, mapping)| mapping.source_type == source_type)
            .map(|(task_ref, mapping)| (task_ref.clone(), mapping.clone()))
            .collect())
    }

    /// The refresh cadence for a task.
    ///
    /// Never fails: an unscheduled task, and even a failed load, yield
    /// [`DEFAULT_REFRESH_SCHEDULE`].
    pub fn refresh_schedule(&self, task_ref: &str) -> String {
        match self.load() {
            Ok(set) => set
                .metadata
                .refresh_schedule
                .get(task_ref)
                .cloned()
                .unwrap_or_else(|| DEFAULT_REFRESH_SCHEDULE.to_string()),
            Err(err) => {
                warn!(task_ref, error = %err, "falling back to default refresh schedule");
                DEFAULT_REFRESH_SCHEDULE.to_string()
            }
        }
    }

    /// Task-to-control associations for one compliance framework, flattened
    /// from the metadata table's list of single-key entries.
    pub fn framework_mappings(
        &self,
        framework: &str,
    ) -> Result<BTreeMap<String, Vec<String>>, MappingError> {
        let set = self.load()?;

        if set.metadata.compliance_frameworks.is_empty() {
            return Err(MappingError::NoFrameworkData);
        }

        let entries = set
            .metadata
            .compliance_frameworks
            .get(framework)
            .ok_or_else(|| MappingError::FrameworkNotFound {
                framework: framework.to_string(),
            })?;

        let mut flattened = BTreeMap::new();
        for entry in entries {
            for (task_ref, controls) in entry {
                flattened.insert(task_ref.clone(), controls.clone());
            }
        }

        Ok(flattened)
    }
}
