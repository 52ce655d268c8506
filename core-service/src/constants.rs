//! Central Configuration Constants
//!
//! Single source of truth for all engine defaults.
//! `EngineConfig::default()` is built from these values.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Bagwatch";

// ============================================
// Replay
// ============================================

/// Seconds of simulated transit represented by one tick
pub const DEFAULT_INTERVAL_SECONDS: u64 = 15;

// ============================================
// Thermal range (blood bag storage)
// ============================================

/// Lower bound of the acceptable storage range (°C)
pub const TEMP_MIN_C: f64 = 2.0;

/// Upper bound of the acceptable storage range (°C)
pub const TEMP_MAX_C: f64 = 6.0;

/// Reference temperature for the thermal deviation features (°C)
pub const DEVIATION_BASE_C: f64 = 6.0;

// ============================================
// Health model
// ============================================

/// Health lost per tick when the model predicts total failure
pub const DAMAGE_SCALE: f64 = 0.15;

/// Health of a bag that has no recorded history
pub const DEFAULT_HEALTH: f64 = 1.0;

/// Lowest health still classified SAFE
pub const SAFE_THRESHOLD: f64 = 0.85;

/// Lowest health still classified WARNING
pub const WARNING_THRESHOLD: f64 = 0.65;

/// Out-of-range minutes before a WARNING bag carries an alert reason
pub const WARNING_ALERT_MINUTES: u64 = 30;

/// Out-of-range minutes before an UNSAFE bag carries an alert reason
pub const UNSAFE_ALERT_MINUTES: u64 = 60;

// ============================================
// History ledger
// ============================================

/// Results kept across all bags (persisted and in memory)
pub const LEDGER_RETENTION_CAP: usize = 20_000;

/// Results returned by a per-bag history query
pub const HISTORY_QUERY_LIMIT: usize = 500;
