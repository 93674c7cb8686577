//! Loading and caching of the evidence mapping configuration.
//!
//! The loader owns the only mutable state in this subsystem: a single cached
//! [`MappingSet`] plus its load timestamp, behind a reader/writer lock. Reads
//! hold the shared lock just long enough to clone the `Arc`; a cache miss
//! performs the read/parse/validate/default work outside any lock and then
//! takes the exclusive lock for the swap alone. Two concurrent misses may
//! both do the work; the last writer wins. Serving a half-updated set is the
//! only thing the lock must prevent.

use crate::defaults::apply_defaults;
use crate::resolve::mappings_file_path;
use crate::schema::MappingSet;
use crate::validate::{self, ValidationIssue};
use chrono::{DateTime, Utc};
use grc_common::Settings;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default freshness window for the parsed-mappings cache: 5 minutes.
pub const DEFAULT_FRESHNESS_SECS: u64 = 5 * 60;

/// Errors from mapping loading and the derived query operations.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to read mappings file {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mappings YAML: {0}")]
    SchemaInvalid(#[from] serde_yaml::Error),

    #[error("invalid mappings configuration: {0}")]
    ValidationFailed(#[from] ValidationIssue),

    #[error("no mapping found for task reference: {task_ref}")]
    MappingNotFound { task_ref: String },

    #[error("compliance framework '{framework}' not found")]
    FrameworkNotFound { framework: String },

    #[error("no compliance framework mappings available")]
    NoFrameworkData,

    #[error("document_id is required for mapping {task_ref}")]
    MissingDocumentId { task_ref: String },

    #[error("document_type is required for document {document_id} in mapping {task_ref}")]
    MissingDocumentType {
        task_ref: String,
        document_id: String,
    },

    #[error(
        "invalid document_type '{document_type}' for document {document_id} in mapping {task_ref}"
    )]
    InvalidDocumentType {
        task_ref: String,
        document_id: String,
        document_type: String,
    },

    #[error("document index {index} out of range for mapping {task_ref}")]
    DocumentIndexOutOfRange { task_ref: String, index: usize },

    #[error("no documents could be processed for task {task_ref}")]
    NoUsableDocuments { task_ref: String },
}

impl From<MappingError> for grc_common::Error {
    fn from(err: MappingError) -> Self {
        use grc_common::Error;

        match err {
            MappingError::SourceUnreadable { .. } => Error::Config(err.to_string()),
            MappingError::SchemaInvalid(_) | MappingError::ValidationFailed(_) => {
                Error::InvalidMappings(err.to_string())
            }
            MappingError::MappingNotFound { task_ref } => Error::TaskNotFound { task_ref },
            MappingError::FrameworkNotFound { framework } => Error::FrameworkNotFound { framework },
            MappingError::NoFrameworkData => Error::NoFrameworkData,
            MappingError::MissingDocumentId { .. }
            | MappingError::MissingDocumentType { .. }
            | MappingError::InvalidDocumentType { .. } => Error::DocumentRejected(err.to_string()),
            MappingError::DocumentIndexOutOfRange { .. }
            | MappingError::NoUsableDocuments { .. } => Error::CollectionFailed(err.to_string()),
        }
    }
}

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory searched first for the mappings document.
    pub data_dir: Option<PathBuf>,

    /// How long a cached parse is served before the source is re-read.
    pub freshness: Duration,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self {
            data_dir: None,
            freshness: Duration::from_secs(DEFAULT_FRESHNESS_SECS),
        }
    }

    /// Set the data directory searched first.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    /// Set a custom freshness window.
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Settings> for LoaderConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            data_dir: settings.storage.data_dir.clone(),
            freshness: Duration::from_secs(DEFAULT_FRESHNESS_SECS),
        }
    }
}

#[derive(Clone)]
struct CacheEntry {
    set: Arc<MappingSet>,
    loaded_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, freshness: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.loaded_at);
        let age_ms = age.num_milliseconds().max(0) as u64;
        age_ms < freshness.as_millis() as u64
    }
}

/// Loads, validates, defaults, and caches evidence mapping configuration.
pub struct MappingsLoader {
    config: LoaderConfig,
    cache: RwLock<Option<CacheEntry>>,
}

impl MappingsLoader {
    /// Create a loader from tool settings, with the default freshness window.
    pub fn new(settings: &Settings) -> Self {
        Self::with_config(LoaderConfig::from(settings))
    }

    /// Create a loader with explicit configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(None),
        }
    }

    /// Return the cached mapping set, re-reading the source when the cache
    /// is absent or older than the freshness window.
    pub fn load(&self) -> Result<Arc<MappingSet>, MappingError> {
        if let Some(entry) = self.fresh_entry() {
            return Ok(entry.set);
        }

        let path = mappings_file_path(self.config.data_dir.as_deref());
        debug!(path = %path.display(), "loading evidence mappings");

        let contents =
            std::fs::read_to_string(&path).map_err(|source| MappingError::SourceUnreadable {
                path: path.clone(),
                source,
            })?;

        let mut set = MappingSet::parse_yaml(&contents)?;
        validate::validate(&set)?;
        apply_defaults(&mut set);

        let entry = CacheEntry {
            set: Arc::new(set),
            loaded_at: Utc::now(),
        };

        *self.cache.write() = Some(entry.clone());

        info!(
            mapping_count = entry.set.evidence_mappings.len(),
            version = %entry.set.metadata.version,
            "loaded evidence mappings"
        );

        Ok(entry.set)
    }

    /// Clear the cache, forcing a re-read on the next access.
    pub fn invalidate(&self) {
        *self.cache.write() = None;
        debug!("cleared evidence mappings cache");
    }

    /// All task references in the mapping set, in order.
    pub fn task_refs(&self) -> Result<Vec<String>, MappingError> {
        Ok(self.load()?.evidence_mappings.keys().cloned().collect())
    }

    /// Timestamp of the load cycle currently being served, if any.
    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.cache.read().as_ref().map(|entry| entry.loaded_at)
    }

    fn fresh_entry(&self) -> Option<CacheEntry> {
        let guard = self.cache.read();
        guard
            .as_ref()
            .filter(|entry| entry.is_fresh(self.config.freshness))
            .cloned()
    }
}
