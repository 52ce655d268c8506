//! Cumulative exposure totals for the current trip.
//!
//! Identical instantaneous readings score differently depending on what the
//! bag has already been through; these running sums carry that history.

use serde::{Deserialize, Serialize};

use crate::constants::DEVIATION_BASE_C;
use crate::logic::dataset::TelemetryRecord;

/// Degrees above the deviation base, floored at zero
pub fn thermal_deviation(temp_mean: f64) -> f64 {
    (temp_mean - DEVIATION_BASE_C).max(0.0)
}

/// Running sums since the start of the current trip. Additive only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeTotals {
    pub door_count: u64,
    pub accel_rms: f64,
    pub handling_stress: f64,
    pub light_mean_abs: f64,
    pub frac_temp_above_6: f64,
    pub frac_temp_above_8: f64,
    pub temp_dev_above_6: f64,
}

impl CumulativeTotals {
    /// Add one record's exposure and return the updated totals
    pub fn accumulate(&mut self, record: &TelemetryRecord) -> CumulativeTotals {
        self.door_count += u64::from(record.door_count);
        self.accel_rms += record.accel_rms;
        self.handling_stress += record.handling_stress;
        self.light_mean_abs += record.light_mean_abs;
        self.frac_temp_above_6 += record.frac_temp_above_6;
        self.frac_temp_above_8 += record.frac_temp_above_8;
        self.temp_dev_above_6 += thermal_deviation(record.temp_mean);
        *self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
