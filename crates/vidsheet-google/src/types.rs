//! Wire types for the Drive v3 and Sheets v4 REST APIs.

use serde::{Deserialize, Serialize};

// =============================================================================
// Drive
// =============================================================================

/// A file as returned by the Drive listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

impl DriveFile {
    /// Sharable view link for this file.
    pub fn share_url(&self) -> String {
        format!("https://drive.google.com/file/d/{}/view", self.id)
    }
}

/// Response of `GET /drive/v3/files`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    pub files: Option<Vec<DriveFile>>,
    pub next_page_token: Option<String>,
}

// =============================================================================
// Sheets
// =============================================================================

/// Spreadsheet metadata, narrowed to sheet properties.
#[derive(Debug, Clone, Deserialize)]
pub struct SpreadsheetMeta {
    pub sheets: Option<Vec<Sheet>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: i64,
    pub title: String,
}

/// Value payload for reads and single-cell writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<String>>>,
}

// =============================================================================
// Sheets batch update (cell formatting)
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub requests: Vec<SheetRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_cell: Option<RepeatCellRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatCellRequest {
    pub range: GridRange,
    pub cell: CellData,
    pub fields: String,
}

/// Half-open grid range, zero-based, as the Sheets API expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: i64,
    pub end_row_index: i64,
    pub start_column_index: i64,
    pub end_column_index: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub user_entered_format: CellFormat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub number_format: NumberFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumberFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}
