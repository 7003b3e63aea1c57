//! Sync job configuration.
//!
//! The folder map and sheet name are compiled-in constants; the ambient
//! knobs (credentials path, work dir) can be overridden via environment
//! variables.

use std::path::PathBuf;

use vidsheet_models::FolderSpec;

/// Spreadsheet column receiving the share link.
pub const URL_COLUMN: &str = "Video URL";

/// Spreadsheet column receiving the formatted duration.
pub const LENGTH_COLUMN: &str = "Length";

/// Spreadsheet to sync into.
const SHEET_NAME: &str = "AI Agents and Agentic AI in Python";

/// Module folders to scan. Update for different courses.
const MODULE_FOLDERS: &[(&str, &str)] = &[
    ("Module 1", "1F7e8shZLHg4q-eNWyJggHgx2VLhrHGqa"),
    ("Module 2", "1Ob7pudnTr4Tbkc0trsbdEk9KmvpM75Uy"),
    ("Module 3", "1_W73JGk81AIcvogdOz7zXnUN4-mAlvku"),
    ("Module 5", "1QEYdlJvQg21Bq9Z81xyQV0omIHcqosZS"),
];

/// Sync job configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Name of the spreadsheet to look up in Drive
    pub sheet_name: String,
    /// Path to the service account credentials file
    pub credentials_path: PathBuf,
    /// Directory for transient video downloads
    pub work_dir: PathBuf,
    /// Folders to scan, in declaration order
    pub folders: Vec<FolderSpec>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sheet_name: SHEET_NAME.to_string(),
            credentials_path: PathBuf::from("credentials.json"),
            work_dir: PathBuf::from("."),
            folders: MODULE_FOLDERS
                .iter()
                .map(|(label, id)| FolderSpec::new(*label, *id))
                .collect(),
        }
    }
}

impl SyncConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sheet_name: std::env::var("SYNC_SHEET_NAME").unwrap_or(defaults.sheet_name),
            credentials_path: std::env::var("SYNC_CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
            work_dir: std::env::var("SYNC_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            folders: defaults.folders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.sheet_name, "AI Agents and Agentic AI in Python");
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.work_dir, PathBuf::from("."));
        assert_eq!(config.folders.len(), 4);
        assert_eq!(config.folders[0].label, "Module 1");
    }

    #[test]
    fn test_target_column_titles() {
        assert_eq!(URL_COLUMN, "Video URL");
        assert_eq!(LENGTH_COLUMN, "Length");
    }
}
