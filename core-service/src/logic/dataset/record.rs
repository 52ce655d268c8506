use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::logic::features::FeatureError;

/// One archived sensor window for a single bag. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub bag_id: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,

    // Thermal statistics (°C)
    pub temp_mean: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_std: f64,
    pub frac_temp_above_6: f64,
    pub frac_temp_above_8: f64,

    // Humidity statistics (%RH)
    pub hum_mean: f64,
    pub hum_std: f64,

    // Handling
    pub accel_rms: f64,
    pub door_count: u32,
    pub light_mean_abs: f64,
    pub handling_stress: f64,

    // Categorical labels
    pub route: String,
    pub blood_type: String,
}

impl TelemetryRecord {
    /// Raw numeric fields in feature layout order
    pub fn numeric_fields(&self) -> [(&'static str, f64); 12] {
        [
            ("temp_mean", self.temp_mean),
            ("temp_min", self.temp_min),
            ("temp_max", self.temp_max),
            ("temp_std", self.temp_std),
            ("frac_temp_above_6", self.frac_temp_above_6),
            ("frac_temp_above_8", self.frac_temp_above_8),
            ("hum_mean", self.hum_mean),
            ("hum_std", self.hum_std),
            ("accel_rms", self.accel_rms),
            ("door_count", f64::from(self.door_count)),
            ("light_mean_abs", self.light_mean_abs),
            ("handling_stress", self.handling_stress),
        ]
    }

    /// Reject records whose numeric fields cannot feed the model
    pub fn check_finite(&self) -> Result<(), FeatureError> {
        match self.numeric_fields().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((field, value)) => Err(FeatureError::NonFinite { field, value }),
            None => Ok(()),
        }
    }
}
