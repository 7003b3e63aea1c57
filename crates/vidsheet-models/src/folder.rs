//! Folder descriptors.

use serde::{Deserialize, Serialize};

/// A labeled Drive folder to scan for videos.
///
/// The label is only used for logging; the folder id is the opaque Drive
/// identifier used in listing queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSpec {
    /// Human-readable label (e.g. "Module 1")
    pub label: String,
    /// Drive folder id
    pub folder_id: String,
}

impl FolderSpec {
    pub fn new(label: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            folder_id: folder_id.into(),
        }
    }
}
