//! Tool settings shared across grcmap crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level grcmap settings.
///
/// Only the pieces consumed by the library crates live here; surface-level
/// options (output format, verbosity) belong to the invoking tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Storage layout settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding mapping documents and collected evidence.
    /// When unset, callers fall back to the process working directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    /// Settings pointing at a specific data directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageSettings {
                data_dir: Some(data_dir.into()),
            },
        }
    }
}
