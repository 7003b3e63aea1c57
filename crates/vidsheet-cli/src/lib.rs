//! One-shot Drive-to-Sheet video metadata sync.
//!
//! This crate provides:
//! - Compiled-in job configuration with env overrides
//! - The sequential sync pipeline (list, match, probe, write)
//! - Typed errors separating fatal from per-file failures

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use pipeline::{SyncPipeline, SyncSummary};
