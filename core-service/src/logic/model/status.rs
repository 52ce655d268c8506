//! Status Classifier
//!
//! Maps a health index to a severity band and attaches an alert reason only
//! when a thermal excursion has persisted long enough for that band. Model
//! severity and physical cause duration are judged separately, so a single
//! hot sample never raises an alert by itself.

use serde::{Deserialize, Serialize};

use crate::constants::{
    SAFE_THRESHOLD, TEMP_MAX_C, TEMP_MIN_C, UNSAFE_ALERT_MINUTES, WARNING_ALERT_MINUTES,
    WARNING_THRESHOLD,
};

// ============================================================================
// STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Safe,
    Warning,
    Unsafe,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Safe => "SAFE",
            Status::Warning => "WARNING",
            Status::Unsafe => "UNSAFE",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            Status::Safe => 0,
            Status::Warning => 1,
            Status::Unsafe => 2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify with the default thresholds
pub fn classify(health_index: f64) -> Status {
    StatusThresholds::default().classify(health_index)
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Band boundaries (inclusive lower bounds) and alert persistence minimums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub safe: f64,
    pub warning: f64,
    pub warning_alert_minutes: u64,
    pub unsafe_alert_minutes: u64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            safe: SAFE_THRESHOLD,
            warning: WARNING_THRESHOLD,
            warning_alert_minutes: WARNING_ALERT_MINUTES,
            unsafe_alert_minutes: UNSAFE_ALERT_MINUTES,
        }
    }
}

impl StatusThresholds {
    pub fn classify(&self, health_index: f64) -> Status {
        if health_index >= self.safe {
            Status::Safe
        } else if health_index >= self.warning {
            Status::Warning
        } else {
            Status::Unsafe
        }
    }

    /// Alert text for a bag in `status` that has been out of range for
    /// `out_of_range_seconds` without interruption
    pub fn alert_reason(&self, status: Status, out_of_range_seconds: u64) -> Option<String> {
        let minutes = out_of_range_seconds / 60;
        let required = match status {
            Status::Safe => return None,
            Status::Warning => self.warning_alert_minutes,
            Status::Unsafe => self.unsafe_alert_minutes,
        };

        (minutes >= required).then(|| format!("Temperature out of range for {} min", minutes))
    }
}

// ============================================================================
// THERMAL EXCURSION TRACKING
// ============================================================================

/// Acceptable storage range, inclusive at both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalRange {
    pub min_c: f64,
    pub max_c: f64,
}

impl Default for ThermalRange {
    fn default() -> Self {
        Self { min_c: TEMP_MIN_C, max_c: TEMP_MAX_C }
    }
}

impl ThermalRange {
    pub fn contains(&self, temp_c: f64) -> bool {
        temp_c >= self.min_c && temp_c <= self.max_c
    }
}

/// Continuous out-of-range duration; any in-range reading clears it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExcursionTimer {
    out_of_range_seconds: u64,
}

impl ExcursionTimer {
    /// Record one tick's reading and return the accumulated duration
    pub fn observe(&mut self, temp_mean: f64, range: &ThermalRange, interval_seconds: u64) -> u64 {
        if range.contains(temp_mean) {
            self.out_of_range_seconds = 0;
        } else {
            self.out_of_range_seconds = self.out_of_range_seconds.saturating_add(interval_seconds);
        }
        self.out_of_range_seconds
    }

    pub fn seconds(&self) -> u64 {
        self.out_of_range_seconds
    }

    pub fn minutes(&self) -> u64 {
        self.out_of_range_seconds / 60
    }

    pub fn reset(&mut self) {
        self.out_of_range_seconds = 0;
    }
}
