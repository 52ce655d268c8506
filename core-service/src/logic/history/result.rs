use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::dataset::{timestamp, TelemetryRecord};
use crate::logic::model::Status;

/// Outcome of scoring one bag at one tick. Immutable once in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub bag_id: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub blood_type: String,
    pub route: String,
    pub predicted_health_index: f64,
    pub status: Status,
    pub temp_mean: f64,
    pub hum_mean: f64,
    pub accel_rms: f64,
    pub door_count: u32,
    /// Alert text, present only for sustained thermal excursions
    pub card_reason: Option<String>,
}

impl ScoringResult {
    pub fn from_record(
        record: &TelemetryRecord,
        timestamp: DateTime<Utc>,
        health: f64,
        status: Status,
        card_reason: Option<String>,
    ) -> Self {
        Self {
            bag_id: record.bag_id.clone(),
            timestamp,
            blood_type: record.blood_type.clone(),
            route: record.route.clone(),
            predicted_health_index: health,
            status,
            temp_mean: record.temp_mean,
            hum_mean: record.hum_mean,
            accel_rms: record.accel_rms,
            door_count: record.door_count,
            card_reason,
        }
    }
}
