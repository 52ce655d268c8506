//! Logic Module - Scoring Engine Components
//!
//! Leaf-first: `dataset` and `features` know nothing about the engine,
//! `engine` owns a `BagRegistry`, a predictor and the `HistoryLedger`.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod features;
pub mod history;
pub mod model;
pub mod registry;
