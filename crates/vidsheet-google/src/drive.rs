//! Google Drive v3 REST client.
//!
//! Covers the three Drive operations the sync needs: listing the video
//! files of a folder, downloading a file's bytes to disk, and resolving a
//! spreadsheet id from its name.

use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tracing::debug;

use crate::client::{error_from_response, AuthorizedHttp, HttpConfig};
use crate::error::GoogleResult;
use crate::retry::with_retry;
use crate::token_cache::TokenCache;
use crate::types::{DriveFile, FileListResponse};

const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Google Drive REST client.
#[derive(Clone)]
pub struct DriveClient {
    transport: AuthorizedHttp,
    base_url: String,
}

impl DriveClient {
    /// Create a new Drive client.
    pub fn new(token_cache: Arc<TokenCache>, config: HttpConfig) -> GoogleResult<Self> {
        Ok(Self {
            transport: AuthorizedHttp::new(token_cache, config)?,
            base_url: DRIVE_BASE_URL.to_string(),
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

    /// List the video files in a folder.
    pub async fn list_videos(&self, folder_id: &str) -> GoogleResult<Vec<DriveFile>> {
        let query = format!(
            "'{}' in parents and mimeType contains 'video'",
            escape_query(folder_id)
        );
        self.list_files(&query).await
    }

    /// Locate a spreadsheet by exact name, skipping trashed files.
    /// Returns its file id, or `None` when no spreadsheet has that name.
    pub async fn find_spreadsheet(&self, name: &str) -> GoogleResult<Option<String>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            escape_query(name),
            SPREADSHEET_MIME
        );
        let files = self.list_files(&query).await?;
        Ok(files.into_iter().next().map(|file| file.id))
    }

    /// Download a file's bytes to a local path.
    pub async fn download_to(&self, file_id: &str, path: impl AsRef<Path>) -> GoogleResult<()> {
        let path = path.as_ref();
        let url = format!("{}/files/{}", self.base_url, file_id);

        let bytes = with_retry(&self.transport.retry, "drive_download", || async {
            let response = self
                .transport
                .send(|http, token| {
                    http.get(&url).query(&[("alt", "media")]).bearer_auth(token)
                })
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(&url, response).await);
            }

            Ok(response.bytes().await?)
        })
        .await?;

        fs::write(path, &bytes).await?;
        debug!(file_id, path = %path.display(), size = bytes.len(), "Downloaded Drive file");
        Ok(())
    }

    /// Run a files.list query, following pagination.
    async fn list_files(&self, query: &str) -> GoogleResult<Vec<DriveFile>> {
        let url = format!("{}/files", self.base_url);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = with_retry(&self.transport.retry, "drive_list_files", || async {
                let response = self
                    .transport
                    .send(|http, token| {
                        let mut request = http
                            .get(&url)
                            .query(&[("q", query), ("fields", "nextPageToken, files(id, name)")])
                            .bearer_auth(token);
                        if let Some(token) = page_token.as_deref() {
                            request = request.query(&[("pageToken", token)]);
                        }
                        request
                    })
                    .await?;

                if !response.status().is_success() {
                    return Err(error_from_response(&url, response).await);
                }

                Ok(response.json::<FileListResponse>().await?)
            })
            .await?;

            files.extend(page.files.unwrap_or_default());
            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!(count = files.len(), "Listed Drive files");
        Ok(files)
    }
}

/// Escape a value for interpolation into a Drive query string.
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
