//! FFprobe wrapper for local video probing.
//!
//! This crate provides:
//! - Duration (and basic stream info) extraction via the `ffprobe` CLI
//! - Typed errors distinguishing a missing binary from a failed probe

pub mod error;
pub mod probe;

pub use error::{MediaError, MediaResult};
pub use probe::{get_duration, probe_video, VideoInfo};
