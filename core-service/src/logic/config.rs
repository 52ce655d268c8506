//! Engine configuration
//!
//! Every field defaults to the matching constant in `crate::constants`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HEALTH, DEFAULT_INTERVAL_SECONDS, HISTORY_QUERY_LIMIT, LEDGER_RETENTION_CAP,
};
use crate::logic::model::{DegradationPolicy, StatusThresholds, ThermalRange};

/// When the history ledger is written to its store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushPolicy {
    EveryAppend,
    #[default]
    EveryTick,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated seconds per tick
    pub interval_seconds: u64,

    /// Acceptable storage range for the excursion timer
    pub thermal_range: ThermalRange,

    /// Health update rule
    pub degradation: DegradationPolicy,

    /// Starting health for bags without an override
    pub default_health: f64,

    /// Per-bag starting health
    pub initial_health: BTreeMap<String, f64>,

    /// Status bands and alert persistence
    pub thresholds: StatusThresholds,

    /// Ledger entries kept across all bags
    pub retention_cap: usize,

    /// Entries returned per history query
    pub query_limit: usize,

    pub flush_policy: FlushPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            thermal_range: ThermalRange::default(),
            degradation: DegradationPolicy::default(),
            default_health: DEFAULT_HEALTH,
            initial_health: BTreeMap::new(),
            thresholds: StatusThresholds::default(),
            retention_cap: LEDGER_RETENTION_CAP,
            query_limit: HISTORY_QUERY_LIMIT,
            flush_policy: FlushPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Starting health for `bag_id`, clamped to [0, 1]
    pub fn initial_health_for(&self, bag_id: &str) -> f64 {
        self.initial_health
            .get(bag_id)
            .copied()
            .unwrap_or(self.default_health)
            .clamp(0.0, 1.0)
    }

    pub fn with_initial_health(mut self, bag_id: &str, health: f64) -> Self {
        self.initial_health.insert(bag_id.to_string(), health);
        self
    }

    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.flush_policy = policy;
        self
    }
}
