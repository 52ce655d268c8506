//! Model Module - Predictor, Degradation and Status
//!
//! Swapping the model only touches `inference`; what a score does to a bag
//! lives in `degradation` and `status`.

pub mod degradation;
pub mod inference;
pub mod status;

pub use degradation::DegradationPolicy;
pub use inference::{HealthPredictor, OnnxPredictor, PredictorError};
pub use status::{classify, ExcursionTimer, Status, StatusThresholds, ThermalRange};
