//! Sync job error types.

use thiserror::Error;

/// Result type for the sync job.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that abort the run.
///
/// Download and probe failures are handled inside the pipeline loop (they
/// degrade to the error marker in the Length column) and only surface here
/// when the spreadsheet itself cannot be read or written.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Header row has no {0:?} column")]
    MissingColumn(String),

    #[error("Google API error: {0}")]
    Google(#[from] vidsheet_google::GoogleApiError),

    #[error("Media error: {0}")]
    Media(#[from] vidsheet_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
