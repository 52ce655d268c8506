use chrono::{DateTime, Utc};

use super::cursor::ReplayCursor;
use crate::logic::dataset::TelemetryRecord;
use crate::logic::features::CumulativeTotals;
use crate::logic::model::{DegradationPolicy, ExcursionTimer, Status, ThermalRange};

/// Everything the engine knows about one bag.
///
/// Trip state (cursor, trip clock, exposure totals, excursion timer) restarts
/// when the record sequence wraps. The health index never does.
#[derive(Debug, Clone)]
pub struct BagState {
    bag_id: String,
    records: Vec<TelemetryRecord>,
    cursor: ReplayCursor,
    trip_started_at: Option<DateTime<Utc>>,
    totals: CumulativeTotals,
    excursion: ExcursionTimer,
    health: f64,
    last_status: Option<Status>,
    trips_completed: u64,
}

impl BagState {
    /// `records` must be non-empty; `TelemetryDataset` guarantees it
    pub fn new(bag_id: impl Into<String>, records: Vec<TelemetryRecord>, health: f64) -> Self {
        let cursor = ReplayCursor::new(records.len());
        Self {
            bag_id: bag_id.into(),
            records,
            cursor,
            trip_started_at: None,
            totals: CumulativeTotals::default(),
            excursion: ExcursionTimer::default(),
            health: health.clamp(0.0, 1.0),
            last_status: None,
            trips_completed: 0,
        }
    }

    // ------------------------------------------------------------------
    // Replay cursor
    // ------------------------------------------------------------------

    /// Next record to replay. On wraparound the trip restarts: trip clock,
    /// exposure totals and excursion timer are cleared first.
    pub fn advance(&mut self) -> TelemetryRecord {
        let step = self.cursor.step();
        if step.wrapped {
            self.restart_trip();
        }
        self.records[step.index].clone()
    }

    fn restart_trip(&mut self) {
        self.trip_started_at = None;
        self.totals.reset();
        self.excursion.reset();
        self.trips_completed += 1;

        log::debug!(
            "Bag {} restarted its trip (#{} completed, health carried at {:.4})",
            self.bag_id,
            self.trips_completed,
            self.health
        );
    }

    /// Trip start, set to `now` on the first record of a trip
    pub fn start_trip_if_needed(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        *self.trip_started_at.get_or_insert(now)
    }

    // ------------------------------------------------------------------
    // Exposure
    // ------------------------------------------------------------------

    pub fn accumulate(&mut self, record: &TelemetryRecord) -> CumulativeTotals {
        self.totals.accumulate(record)
    }

    /// Feed this tick's mean temperature into the excursion timer
    pub fn observe_temperature(
        &mut self,
        temp_mean: f64,
        range: &ThermalRange,
        interval_seconds: u64,
    ) -> u64 {
        self.excursion.observe(temp_mean, range, interval_seconds)
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    /// Apply a raw model score and store the resulting health index
    pub fn apply_score(&mut self, raw_score: f64, policy: &DegradationPolicy) -> f64 {
        self.health = policy.apply(self.health, raw_score);
        self.health
    }

    /// Lower health to `recorded` if that is below the current value
    pub fn seed_health(&mut self, recorded: f64) {
        if recorded.is_finite() {
            self.health = self.health.min(recorded.clamp(0.0, 1.0));
        }
    }

    /// Remember the latest status; returns the previous one if it changed
    pub fn record_status(&mut self, status: Status) -> Option<Status> {
        let previous = self.last_status.replace(status);
        previous.filter(|p| *p != status)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn bag_id(&self) -> &str {
        &self.bag_id
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn totals(&self) -> &CumulativeTotals {
        &self.totals
    }

    pub fn trip_started_at(&self) -> Option<DateTime<Utc>> {
        self.trip_started_at
    }

    pub fn out_of_range_seconds(&self) -> u64 {
        self.excursion.seconds()
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor.position()
    }

    pub fn sequence_len(&self) -> usize {
        self.records.len()
    }

    pub fn trips_completed(&self) -> u64 {
        self.trips_completed
    }

    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }
}
