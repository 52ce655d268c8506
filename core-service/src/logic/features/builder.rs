//! Feature Vector Builder
//!
//! Combines a raw record, the bag's cumulative totals and time features into
//! the exact column set and order the predictor was trained on.

use chrono::{DateTime, Datelike, Timelike, Utc};

use super::exposure::{thermal_deviation, CumulativeTotals};
use super::layout::{BLOOD_TYPE_OFFSET, BLOOD_TYPE_VOCABULARY, ROUTE_OFFSET, ROUTE_VOCABULARY};
use super::vector::FeatureVector;
use super::FeatureError;
use crate::logic::dataset::TelemetryRecord;
use crate::logic::registry::BagState;

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Build the model input for `bag`'s current record.
///
/// Starts the trip clock on the first record of a trip and folds the record
/// into the bag's cumulative totals before the vector is assembled.
pub fn build_features(
    bag: &mut BagState,
    record: &TelemetryRecord,
    now: DateTime<Utc>,
) -> Result<FeatureVector, FeatureError> {
    record.check_finite()?;

    let started = bag.start_trip_if_needed(now);
    let elapsed_hours = elapsed_hours(started, now);
    let totals = bag.accumulate(record);

    let vector = assemble(record, &totals, elapsed_hours, now);
    vector.validate()?;

    Ok(vector)
}

/// Assemble a vector from already-computed inputs (no bag state involved)
pub fn assemble(
    record: &TelemetryRecord,
    totals: &CumulativeTotals,
    elapsed_hours: f64,
    now: DateTime<Utc>,
) -> FeatureVector {
    FeatureVectorBuilder::new()
        .raw(record)
        .elapsed_hours(elapsed_hours)
        .clock(now)
        .cumulative(totals)
        .thermal_deviation(record.temp_mean, totals.temp_dev_above_6)
        .route(&record.route)
        .blood_type(&record.blood_type)
        .build()
}

fn elapsed_hours(started: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - started).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FeatureVector with named setters
pub struct FeatureVectorBuilder {
    vector: FeatureVector,
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self { vector: FeatureVector::new() }
    }

    /// The twelve raw numeric telemetry columns
    pub fn raw(mut self, record: &TelemetryRecord) -> Self {
        for (name, value) in record.numeric_fields() {
            self.vector.set_by_name(name, value as f32);
        }
        self
    }

    pub fn elapsed_hours(mut self, hours: f64) -> Self {
        self.vector.set_by_name("elapsed_hours", hours as f32);
        self
    }

    pub fn clock(mut self, now: DateTime<Utc>) -> Self {
        self.vector.set_by_name("hour_of_day", now.hour() as f32);
        self.vector
            .set_by_name("day_of_week", now.weekday().num_days_from_monday() as f32);
        self
    }

    pub fn cumulative(mut self, totals: &CumulativeTotals) -> Self {
        self.vector.set_by_name("cum_door_count", totals.door_count as f32);
        self.vector.set_by_name("cum_accel_rms", totals.accel_rms as f32);
        self.vector
            .set_by_name("cum_handling_stress", totals.handling_stress as f32);
        self.vector
            .set_by_name("cum_light_mean_abs", totals.light_mean_abs as f32);
        self.vector
            .set_by_name("cum_frac_temp_above_6", totals.frac_temp_above_6 as f32);
        self.vector
            .set_by_name("cum_frac_temp_above_8", totals.frac_temp_above_8 as f32);
        self
    }

    pub fn thermal_deviation(mut self, temp_mean: f64, cumulative: f64) -> Self {
        self.vector
            .set_by_name("temp_dev_above_6", thermal_deviation(temp_mean) as f32);
        self.vector
            .set_by_name("cum_temp_dev_above_6", cumulative as f32);
        self
    }

    /// One-hot route; labels outside the vocabulary leave every column at zero
    pub fn route(mut self, label: &str) -> Self {
        one_hot(&mut self.vector, ROUTE_OFFSET, &ROUTE_VOCABULARY, label);
        self
    }

    /// One-hot blood type; labels outside the vocabulary leave every column at zero
    pub fn blood_type(mut self, label: &str) -> Self {
        one_hot(&mut self.vector, BLOOD_TYPE_OFFSET, &BLOOD_TYPE_VOCABULARY, label);
        self
    }

    pub fn build(self) -> FeatureVector {
        self.vector
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write every vocabulary column explicitly, 1.0 for the match and 0.0 otherwise
fn one_hot(vector: &mut FeatureVector, offset: usize, vocabulary: &[&str], label: &str) {
    for (i, known) in vocabulary.iter().enumerate() {
        vector.set(offset + i, if *known == label { 1.0 } else { 0.0 });
    }
}
