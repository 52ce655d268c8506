//! Monitoring Engine - one tick advances every bag by one record
//!
//! Flow per bag:
//! 1. Replay cursor selects the next record (restarting the trip on wrap)
//! 2. Feature vector is built (trip clock + cumulative exposure); a
//!    non-finite record fails here before any bag state changes
//! 3. Excursion timer observes the record's mean temperature
//! 4. Predictor scores it, degradation policy lowers the health index
//! 5. Status and alert reason are derived, the result goes to the ledger
//!
//! A tick is an at-least-once batch: if one bag fails, bags already scored
//! in the same tick keep their updates and ledger entries.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::error::{EngineError, EngineResult};
use crate::logic::config::{EngineConfig, FlushPolicy};
use crate::logic::dataset::TelemetryDataset;
use crate::logic::features::build_features;
use crate::logic::features::layout::{layout_hash, FEATURE_VERSION};
use crate::logic::history::{HistoryLedger, LedgerStore, ScoringResult};
use crate::logic::model::{HealthPredictor, PredictorError};
use crate::logic::registry::BagRegistry;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Result of one tick across all bags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub server_time: DateTime<Utc>,
    pub interval_seconds: u64,
    /// One result per bag, in bag id order
    pub bags: Vec<ScoringResult>,
}

/// Ledger view for one bag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityHistory {
    pub bag_id: String,
    pub records: Vec<ScoringResult>,
}

/// Engine status for operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub bag_count: usize,
    pub ticks: u64,
    pub ledger_entries: usize,
    pub ledger_capacity: usize,
    pub ledger_store: String,
    pub flush_policy: FlushPolicy,
    pub model: String,
    pub feature_version: u8,
    pub layout_hash: u32,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct MonitorEngine {
    config: EngineConfig,
    registry: BagRegistry,
    predictor: Box<dyn HealthPredictor>,
    ledger: HistoryLedger,
    ticks: u64,
}

impl MonitorEngine {
    /// Build the registry from `dataset`, open the ledger over `store` and
    /// seed every bag's health from the recorded history.
    pub fn new(
        config: EngineConfig,
        dataset: TelemetryDataset,
        predictor: Box<dyn HealthPredictor>,
        store: Box<dyn LedgerStore>,
    ) -> Self {
        let mut registry = BagRegistry::from_dataset(dataset, &config);
        let ledger = HistoryLedger::open(
            store,
            config.retention_cap,
            config.query_limit,
            config.flush_policy,
        );

        let seeded = registry.seed_from_history(ledger.iter());
        log::info!(
            "{} v{} engine ready: {} bags, {} seeded from history, model: {}",
            APP_NAME,
            APP_VERSION,
            registry.len(),
            seeded,
            predictor.describe()
        );

        Self {
            config,
            registry,
            predictor,
            ledger,
            ticks: 0,
        }
    }

    /// Advance every bag by one record using the current wall clock
    pub fn tick(&mut self) -> EngineResult<TickReport> {
        self.tick_at(Utc::now())
    }

    /// Advance every bag by one record as of `now`
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> EngineResult<TickReport> {
        let bag_ids = self.registry.bag_ids();
        let mut results = Vec::with_capacity(bag_ids.len());

        for bag_id in &bag_ids {
            match self.score_bag(bag_id, now) {
                Ok(result) => results.push(result),
                Err(e) => {
                    log::error!("Tick aborted at bag {}: {}", bag_id, e);
                    if let Err(flush_err) = self.ledger.end_tick() {
                        log::error!("Failed to persist partial tick: {}", flush_err);
                    }
                    return Err(e);
                }
            }
        }

        self.ledger.end_tick()?;
        self.ticks += 1;

        Ok(TickReport {
            server_time: now,
            interval_seconds: self.config.interval_seconds,
            bags: results,
        })
    }

    fn score_bag(&mut self, bag_id: &str, now: DateTime<Utc>) -> EngineResult<ScoringResult> {
        let config = &self.config;
        let bag = self
            .registry
            .get_mut(bag_id)
            .ok_or_else(|| EngineError::UnknownBag(bag_id.to_string()))?;

        let record = bag.advance();
        let feature_error = |source| EngineError::Feature {
            bag_id: bag_id.to_string(),
            source,
        };
        let features = build_features(bag, &record, now).map_err(feature_error)?;

        let out_of_range_seconds = bag.observe_temperature(
            record.temp_mean,
            &config.thermal_range,
            config.interval_seconds,
        );

        let predictor_error = |source| EngineError::Predictor {
            bag_id: bag_id.to_string(),
            source,
        };
        log::trace!("Bag {} features: {}", bag_id, features.to_log_entry());

        let raw = self.predictor.score(&features).map_err(predictor_error)?;
        if !raw.is_finite() {
            return Err(predictor_error(PredictorError::NonFiniteOutput(raw)));
        }

        let health = bag.apply_score(raw, &config.degradation);
        let status = config.thresholds.classify(health);
        let reason = config.thresholds.alert_reason(status, out_of_range_seconds);

        if let Some(previous) = bag.record_status(status) {
            let level = if status.severity_level() > previous.severity_level() {
                log::Level::Warn
            } else {
                log::Level::Info
            };
            log::log!(
                level,
                "Bag {} status {} -> {} (health {:.4})",
                bag_id,
                previous,
                status,
                health
            );
        }
        log::debug!(
            "Bag {} scored raw {:.4} -> health {:.4} {}",
            bag_id,
            raw,
            health,
            status
        );

        let result = ScoringResult::from_record(&record, now, health, status, reason);
        self.ledger.append(result.clone())?;

        Ok(result)
    }

    /// Up to `query_limit` most recent results for `bag_id`; empty if unknown
    pub fn entity_history(&self, bag_id: &str) -> EntityHistory {
        EntityHistory {
            bag_id: bag_id.to_string(),
            records: self.ledger.query(bag_id),
        }
    }

    /// Sorted bag ids
    pub fn list_entities(&self) -> Vec<String> {
        self.registry.bag_ids()
    }

    pub fn health_of(&self, bag_id: &str) -> Option<f64> {
        self.registry.get(bag_id).map(|bag| bag.health())
    }

    /// Write any unflushed ledger entries regardless of policy
    pub fn flush(&mut self) -> EngineResult<()> {
        self.ledger.flush()?;
        Ok(())
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            bag_count: self.registry.len(),
            ticks: self.ticks,
            ledger_entries: self.ledger.len(),
            ledger_capacity: self.ledger.capacity(),
            ledger_store: self.ledger.describe_store(),
            flush_policy: self.config.flush_policy,
            model: self.predictor.describe(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
        }
    }
}
