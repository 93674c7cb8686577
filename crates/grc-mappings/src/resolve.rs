//! Mapping document location.

use std::path::{Path, PathBuf};

/// File name of the evidence mapping document.
pub const MAPPINGS_FILE_NAME: &str = "google_evidence_mappings.yaml";

const CONFIGS_DIR: &str = "configs";

/// Determine the path of the mappings document. First existing path wins:
/// the configured data directory, the process working directory, then
/// `./configs`. When nothing exists, the working-directory path is returned
/// anyway so the subsequent read fails with a concrete path attached.
pub fn mappings_file_path(data_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = data_dir {
        if !dir.as_os_str().is_empty() {
            let candidate = dir.join(MAPPINGS_FILE_NAME);
            if candidate.exists() {
                return candidate;
            }
        }
    }

    let current = PathBuf::from(MAPPINGS_FILE_NAME);
    if current.exists() {
        return current;
    }

    let configs = Path::new(CONFIGS_DIR).join(MAPPINGS_FILE_NAME);
    if configs.exists() {
        return configs;
    }

    current
}
