//! Record builders shared by the engine's unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::TelemetryRecord;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
}

/// In-range record with mild handling, `offset` windows after `base_time()`
pub fn record(bag_id: &str, offset: i64, temp_mean: f64) -> TelemetryRecord {
    TelemetryRecord {
        bag_id: bag_id.to_string(),
        timestamp: base_time() + Duration::seconds(offset * 15),
        temp_mean,
        temp_min: temp_mean - 0.5,
        temp_max: temp_mean + 0.5,
        temp_std: 0.2,
        frac_temp_above_6: if temp_mean > 6.0 { 1.0 } else { 0.0 },
        frac_temp_above_8: if temp_mean > 8.0 { 1.0 } else { 0.0 },
        hum_mean: 45.0,
        hum_std: 1.5,
        accel_rms: 0.3,
        door_count: 1,
        light_mean_abs: 12.0,
        handling_stress: 0.4,
        route: "Hospital_2".to_string(),
        blood_type: "O-".to_string(),
    }
}

/// `len` consecutive in-range records for one bag
pub fn sequence(bag_id: &str, len: usize) -> Vec<TelemetryRecord> {
    (0..len)
        .map(|i| record(bag_id, i as i64, 3.0 + i as f64 * 0.1))
        .collect()
}
