//! Google Sheets v4 REST client.
//!
//! Works against one worksheet at a time: the full value table for row
//! matching, single-cell reads for the completion check, single-cell RAW
//! writes, and a repeatCell batch update to pin a cell's number format to
//! plain text before a duration is written into it.

use std::sync::Arc;

use tracing::debug;

use crate::client::{error_from_response, AuthorizedHttp, HttpConfig};
use crate::error::{GoogleApiError, GoogleResult};
use crate::retry::with_retry;
use crate::token_cache::TokenCache;
use crate::types::{
    BatchUpdateRequest, CellData, CellFormat, GridRange, NumberFormat, RepeatCellRequest,
    SheetRequest, SpreadsheetMeta, ValueRange,
};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Handle to one worksheet of a spreadsheet.
#[derive(Debug, Clone)]
pub struct Worksheet {
    pub spreadsheet_id: String,
    pub sheet_id: i64,
    pub title: String,
}

/// Google Sheets REST client.
#[derive(Clone)]
pub struct SheetsClient {
    transport: AuthorizedHttp,
    base_url: String,
}

impl SheetsClient {
    /// Create a new Sheets client.
    pub fn new(token_cache: Arc<TokenCache>, config: HttpConfig) -> GoogleResult<Self> {
        Ok(Self {
            transport: AuthorizedHttp::new(token_cache, config)?,
            base_url: SHEETS_BASE_URL.to_string(),
        })
    }

    /// Client pointed at a custom endpoint, sharing an existing transport.
    /// Used by tests.
    pub fn with_base_url(transport: AuthorizedHttp, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Open the first worksheet of a spreadsheet.
    pub async fn first_worksheet(&self, spreadsheet_id: &str) -> GoogleResult<Worksheet> {
        let url = format!("{}/{}", self.base_url, spreadsheet_id);

        let meta = with_retry(&self.transport.retry, "sheets_metadata", || async {
            let response = self
                .transport
                .send(|http, token| {
                    http.get(&url)
                        .query(&[("fields", "sheets.properties")])
                        .bearer_auth(token)
                })
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(&url, response).await);
            }

            Ok(response.json::<SpreadsheetMeta>().await?)
        })
        .await?;

        let first = meta
            .sheets
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| GoogleApiError::invalid_response("Spreadsheet has no sheets"))?;

        Ok(Worksheet {
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_id: first.properties.sheet_id,
            title: first.properties.title,
        })
    }

    /// Read the worksheet's full value table.
    pub async fn values(&self, ws: &Worksheet) -> GoogleResult<Vec<Vec<String>>> {
        let range = self.read_range(ws, &quote_title(&ws.title)).await?;
        Ok(range.values.unwrap_or_default())
    }

    /// Read a single cell. Returns `None` when the cell is empty.
    pub async fn read_cell(
        &self,
        ws: &Worksheet,
        row: usize,
        col: usize,
    ) -> GoogleResult<Option<String>> {
        let range = self.read_range(ws, &cell_range(&ws.title, row, col)).await?;
        Ok(range
            .values
            .and_then(|rows| rows.into_iter().next())
            .and_then(|cells| cells.into_iter().next()))
    }

    /// Write one cell as a raw (unparsed) value.
    pub async fn update_cell(
        &self,
        ws: &Worksheet,
        row: usize,
        col: usize,
        value: &str,
    ) -> GoogleResult<()> {
        let range = cell_range(&ws.title, row, col);
        let url = format!(
            "{}/{}/values/{}",
            self.base_url,
            ws.spreadsheet_id,
            urlencoding::encode(&range)
        );
        let body = ValueRange {
            values: Some(vec![vec![value.to_string()]]),
            ..Default::default()
        };

        with_retry(&self.transport.retry, "sheets_update_cell", || async {
            let response = self
                .transport
                .send(|http, token| {
                    http.put(&url)
                        .query(&[("valueInputOption", "RAW")])
                        .bearer_auth(token)
                        .json(&body)
                })
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(&url, response).await);
            }

            Ok(())
        })
        .await?;

        debug!(range, value, "Updated cell");
        Ok(())
    }

    /// Force a cell's number format to plain text.
    ///
    /// Must be applied before (or alongside) writing an `H:MM:SS` value, or
    /// the sheet's auto-formatting reinterprets it as a time value.
    pub async fn format_cell_as_text(
        &self,
        ws: &Worksheet,
        row: usize,
        col: usize,
    ) -> GoogleResult<()> {
        let url = format!("{}/{}:batchUpdate", self.base_url, ws.spreadsheet_id);
        let body = BatchUpdateRequest {
            requests: vec![SheetRequest {
                repeat_cell: Some(RepeatCellRequest {
                    range: GridRange {
                        sheet_id: ws.sheet_id,
                        start_row_index: row as i64 - 1,
                        end_row_index: row as i64,
                        start_column_index: col as i64 - 1,
                        end_column_index: col as i64,
                    },
                    cell: CellData {
                        user_entered_format: CellFormat {
                            number_format: NumberFormat {
                                format_type: "TEXT".to_string(),
                            },
                        },
                    },
                    fields: "userEnteredFormat.numberFormat".to_string(),
                }),
            }],
        };

        with_retry(&self.transport.retry, "sheets_format_cell", || async {
            let response = self
                .transport
                .send(|http, token| http.post(&url).bearer_auth(token).json(&body))
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(&url, response).await);
            }

            Ok(())
        })
        .await?;

        debug!(row, col, "Formatted cell as TEXT");
        Ok(())
    }

    /// GET an A1 range from the values endpoint.
    async fn read_range(&self, ws: &Worksheet, range: &str) -> GoogleResult<ValueRange> {
        let url = format!(
            "{}/{}/values/{}",
            self.base_url,
            ws.spreadsheet_id,
            urlencoding::encode(range)
        );

        with_retry(&self.transport.retry, "sheets_read_range", || async {
            let response = self
                .transport
                .send(|http, token| http.get(&url).bearer_auth(token))
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(&url, response).await);
            }

            Ok(response.json::<ValueRange>().await?)
        })
        .await
    }
}

/// Convert a 1-based column index to letters (1 -> A, 27 -> AA).
pub fn column_letter(mut col: usize) -> String {
    let mut letters = String::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.insert(0, (b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    letters
}

/// A1 range for a single cell, with the sheet title prefixed.
fn cell_range(title: &str, row: usize, col: usize) -> String {
    format!("{}!{}{}", quote_title(title), column_letter(col), row)
}

/// Quote a sheet title for A1 notation when it needs quoting.
fn quote_title(title: &str) -> String {
    let plain = !title.is_empty()
        && title
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        title.to_string()
    } else {
        format!("'{}'", title.replace('\'', "''"))
    }
}
