//! Engine error taxonomy
//!
//! Dataset errors are fatal at startup. Feature and predictor errors abort the
//! current bag's update and surface to the tick caller. Ledger errors at
//! startup are recovered inside `HistoryLedger::open`; on flush they surface.

use thiserror::Error;

use crate::logic::dataset::DatasetError;
use crate::logic::features::FeatureError;
use crate::logic::history::LedgerError;
use crate::logic::model::PredictorError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("schema drift for bag {bag_id}: {source}")]
    Feature {
        bag_id: String,
        #[source]
        source: FeatureError,
    },

    #[error("predictor failed for bag {bag_id}: {source}")]
    Predictor {
        bag_id: String,
        #[source]
        source: PredictorError,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("unknown bag: {0}")]
    UnknownBag(String),
}

impl EngineError {
    /// Bag whose update failed, if the error is tied to one
    pub fn bag_id(&self) -> Option<&str> {
        match self {
            EngineError::Feature { bag_id, .. }
            | EngineError::Predictor { bag_id, .. }
            | EngineError::UnknownBag(bag_id) => Some(bag_id.as_str()),
            _ => None,
        }
    }
}
