//! The sequential sync pipeline.
//!
//! One pass over the configured folders: list videos, match each file to a
//! spreadsheet row by normalized name, skip rows that are already filled,
//! download and probe the rest, and write the share link and duration back.
//! Everything runs on a single sequential thread of control; the
//! spreadsheet is the only durable state.

use tracing::{info, warn};

use vidsheet_google::{DriveClient, DriveFile, SheetsClient, Worksheet};
use vidsheet_models::{
    find_column, find_matching_row, format_duration, is_row_complete, normalize_name, ERROR_MARKER,
};

use crate::config::{SyncConfig, LENGTH_COLUMN, URL_COLUMN};
use crate::error::{SyncError, SyncResult};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Rows written with a link and a probed duration
    pub updated: usize,
    /// Files skipped because their row was already filled
    pub skipped: usize,
    /// Files with no matching row
    pub unmatched: usize,
    /// Files whose download or probe failed (row written with the marker)
    pub failed: usize,
}

/// The sync pipeline.
pub struct SyncPipeline {
    drive: DriveClient,
    sheets: SheetsClient,
    config: SyncConfig,
}

impl SyncPipeline {
    pub fn new(drive: DriveClient, sheets: SheetsClient, config: SyncConfig) -> Self {
        Self {
            drive,
            sheets,
            config,
        }
    }

    /// Run the sync end to end.
    ///
    /// Fatal tier: spreadsheet lookup, header lookup, and any sheet
    /// read/write failure abort with an error. Per-file tier: download and
    /// probe failures degrade to [`ERROR_MARKER`] in the Length column and
    /// the loop continues.
    pub async fn run(&self) -> SyncResult<SyncSummary> {
        let spreadsheet_id = self
            .drive
            .find_spreadsheet(&self.config.sheet_name)
            .await?
            .ok_or_else(|| SyncError::SpreadsheetNotFound(self.config.sheet_name.clone()))?;

        let ws = self.sheets.first_worksheet(&spreadsheet_id).await?;
        info!(sheet = %self.config.sheet_name, worksheet = %ws.title, "Opened spreadsheet");

        let all_rows = self.sheets.values(&ws).await?;
        let header = all_rows.first().cloned().unwrap_or_default();
        let url_col = find_column(&header, URL_COLUMN)
            .ok_or_else(|| SyncError::MissingColumn(URL_COLUMN.to_string()))?;
        let length_col = find_column(&header, LENGTH_COLUMN)
            .ok_or_else(|| SyncError::MissingColumn(LENGTH_COLUMN.to_string()))?;

        tokio::fs::create_dir_all(&self.config.work_dir).await?;

        let mut summary = SyncSummary::default();

        for folder in &self.config.folders {
            info!(module = %folder.label, folder_id = %folder.folder_id, "Processing folder");

            let mut files = self.drive.list_videos(&folder.folder_id).await?;
            files.sort_by(|a, b| a.name.cmp(&b.name));

            info!(module = %folder.label, count = files.len(), "Found videos");
            if files.is_empty() {
                info!(module = %folder.label, "No videos found in this module, skipping");
                continue;
            }

            for file in &files {
                self.process_file(&ws, &all_rows, url_col, length_col, file, &mut summary)
                    .await?;
            }
        }

        Ok(summary)
    }

    /// Handle one listed video file.
    async fn process_file(
        &self,
        ws: &Worksheet,
        all_rows: &[Vec<String>],
        url_col: usize,
        length_col: usize,
        file: &DriveFile,
        summary: &mut SyncSummary,
    ) -> SyncResult<()> {
        let key = normalize_name(&file.name);

        let Some(row) = find_matching_row(all_rows, &key) else {
            warn!(file = %file.name, "No matching row found, skipping");
            summary.unmatched += 1;
            return Ok(());
        };

        // Live cell reads so a row filled earlier in this run (or by hand
        // mid-run) is honored.
        let existing_url = self.sheets.read_cell(ws, row, url_col).await?;
        let existing_length = self.sheets.read_cell(ws, row, length_col).await?;
        if is_row_complete(existing_url.as_deref(), existing_length.as_deref()) {
            info!(file = %file.name, row, "Already has URL and duration, skipping");
            summary.skipped += 1;
            return Ok(());
        }

        info!(file = %file.name, id = %file.id, row, "Processing video");

        let duration = match self.extract_duration(file).await {
            Ok(duration) => {
                info!(file = %file.name, duration = %duration, "Extracted duration");
                summary.updated += 1;
                duration
            }
            Err(e) => {
                // Recovered tier: the row still gets the link, the Length
                // column gets the marker, and the loop moves on. The local
                // copy is not cleaned up on this path.
                warn!(file = %file.name, error = %e, "Failed to read video");
                summary.failed += 1;
                ERROR_MARKER.to_string()
            }
        };

        let url = file.share_url();
        info!(row, col = url_col, value = %url, "Updating sheet");
        self.sheets.update_cell(ws, row, url_col, &url).await?;

        // Pin the cell to plain text before the value lands, or the sheet
        // reinterprets H:MM:SS as a time value.
        self.sheets.format_cell_as_text(ws, row, length_col).await?;
        info!(row, col = length_col, value = %duration, "Updating sheet");
        self.sheets
            .update_cell(ws, row, length_col, &duration)
            .await?;

        Ok(())
    }

    /// Download the file next to the work dir, probe it, and format the
    /// duration. The local copy is removed on the success path only.
    async fn extract_duration(&self, file: &DriveFile) -> SyncResult<String> {
        let local_path = self.config.work_dir.join(&file.name);

        self.drive.download_to(&file.id, &local_path).await?;
        let secs = vidsheet_media::get_duration(&local_path).await?;
        tokio::fs::remove_file(&local_path).await?;

        Ok(format_duration(secs))
    }
}
