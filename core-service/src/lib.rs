//! Bagwatch Core - Blood Bag Health Scoring Engine
//!
//! Replays archived container telemetry as if it were live and keeps a
//! per-bag health index up to date using an external predictive model.
//!
//! ## Architecture
//!
//! ```text
//! tick ─► ReplayCursor ─► FeatureVectorBuilder ─► HealthPredictor
//!              │                 ▲                      │
//!              ▼                 │                      ▼
//!        CumulativeTotals ───────┘             DegradationPolicy
//!                                                       │
//!                                 HistoryLedger ◄── StatusThresholds
//! ```
//!
//! - `logic::dataset` - telemetry records and dataset loading
//! - `logic::registry` - per-bag state (cursor, exposure, health)
//! - `logic::features` - fixed feature layout and vector builder
//! - `logic::model` - predictor seam, degradation and status classification
//! - `logic::history` - bounded, persisted scoring ledger
//! - `logic::engine` - the tick loop tying it all together

pub mod constants;
pub mod error;
pub mod logic;

pub use error::EngineError;
pub use logic::config::{EngineConfig, FlushPolicy};
pub use logic::dataset::{DatasetError, TelemetryDataset, TelemetryRecord};
pub use logic::engine::{EngineStatus, EntityHistory, MonitorEngine, TickReport};
pub use logic::features::{FeatureError, FeatureVector, FEATURE_COUNT};
pub use logic::history::{JsonFileStore, LedgerError, LedgerStore, MemoryStore, ScoringResult};
pub use logic::model::{HealthPredictor, OnnxPredictor, PredictorError, Status};
