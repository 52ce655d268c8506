//! History Module - Bounded Scoring Ledger
//!
//! Append-only record of every scoring result, capped across all bags and
//! mirrored to a `LedgerStore` according to the configured flush policy.
//! The store's prior contents seed each bag's health at startup.

pub mod ledger;
pub mod result;
pub mod storage;


use std::path::PathBuf;
use thiserror::Error;

pub use ledger::HistoryLedger;
pub use result::ScoringResult;
pub use storage::{JsonFileStore, LedgerStore, MemoryStore};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("ledger store unavailable: {0}")]
    Unavailable(String),
}
