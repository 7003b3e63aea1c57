//! Google Drive and Sheets REST clients.
//!
//! This crate provides:
//! - Service account authentication via gcp_auth
//! - Token caching with refresh margin and single-flight refresh
//! - Exponential backoff with jitter for transient HTTP failures
//! - A Drive v3 client (video listing, media download, spreadsheet lookup)
//! - A Sheets v4 client (value table, single-cell reads/writes, cell formatting)

pub mod auth;
pub mod client;
pub mod drive;
pub mod error;
pub mod retry;
pub mod sheets;
pub mod token_cache;
pub mod types;


pub use auth::load_service_account;
pub use client::{AuthorizedHttp, HttpConfig};
pub use drive::DriveClient;
pub use error::{GoogleApiError, GoogleResult};
pub use retry::RetryConfig;
pub use sheets::{column_letter, SheetsClient, Worksheet};
pub use token_cache::TokenCache;
pub use types::DriveFile;
