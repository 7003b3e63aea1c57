//! Shared domain logic for the Drive-to-Sheet video sync.
//!
//! This crate provides:
//! - File name normalization for fuzzy row matching
//! - Spreadsheet row matching and header column lookup
//! - The already-filled completion check
//! - Duration formatting for the Length column
//! - Folder descriptors for the configured module folders

pub mod duration;
pub mod folder;
pub mod matching;
pub mod naming;

// Re-export common items
pub use duration::{format_duration, ERROR_MARKER};
pub use folder::FolderSpec;
pub use matching::{find_column, find_matching_row, is_row_complete};
pub use naming::normalize_name;
