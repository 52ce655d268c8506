//! Dataset Module - Archived Telemetry Replay Source
//!
//! Loads the archived sensor dataset once at startup, orders it by
//! `(bag_id, timestamp)` and hands each bag its immutable record sequence.

pub mod loader;
pub mod record;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;

use std::path::PathBuf;
use thiserror::Error;

pub use loader::TelemetryDataset;
pub use record::TelemetryRecord;

/// Startup errors of the telemetry dataset. None of these are recoverable.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset contains no records")]
    Empty,

    #[error("bag {0} has an empty record sequence")]
    EmptySequence(String),
}
