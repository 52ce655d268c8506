use chrono::Duration;

use super::{BagRegistry, BagState};
use crate::logic::config::EngineConfig;
use crate::logic::dataset::fixtures::{base_time, record, sequence};
use crate::logic::dataset::TelemetryDataset;
use crate::logic::features::CumulativeTotals;
use crate::logic::history::ScoringResult;
use crate::logic::model::{DegradationPolicy, Status, ThermalRange};

#[test]
fn test_wraparound_replays_first_record_and_resets_totals() {
    let records = sequence("BAG_0001", 4);
    let mut bag = BagState::new("BAG_0001", records.clone(), 1.0);

    let first = bag.advance();
    bag.accumulate(&first);
    for _ in 1..records.len() {
        let rec = bag.advance();
        bag.accumulate(&rec);
    }
    assert_eq!(bag.totals().door_count, 4);

    // L + 1-th call
    let replayed = bag.advance();
    assert_eq!(replayed, first);
    assert_eq!(bag.trips_completed(), 1);

    let after = bag.accumulate(&replayed);
    let mut expected = CumulativeTotals::default();
    expected.accumulate(&first);
    assert_eq!(after, expected);
}

#[test]
fn test_cursor_stays_in_bounds() {
    let mut bag = BagState::new("BAG_0001", sequence("BAG_0001", 3), 1.0);
    for _ in 0..20 {
        bag.advance();
        assert!(bag.cursor_position() <= bag.sequence_len());
    }
}

#[test]
fn test_wraparound_clears_trip_clock_and_excursion_but_not_health() {
    let records = vec![record("BAG_0001", 0, 9.0), record("BAG_0001", 1, 9.5)];
    let mut bag = BagState::new("BAG_0001", records, 1.0);
    let range = ThermalRange::default();
    let policy = DegradationPolicy::default();

    for _ in 0..2 {
        let rec = bag.advance();
        bag.start_trip_if_needed(base_time());
        bag.observe_temperature(rec.temp_mean, &range, 15);
        bag.apply_score(0.0, &policy);
    }
    let health_before_wrap = bag.health();
    assert!(health_before_wrap < 1.0);
    assert_eq!(bag.out_of_range_seconds(), 30);
    assert!(bag.trip_started_at().is_some());

    bag.advance();

    assert_eq!(bag.trip_started_at(), None);
    assert_eq!(bag.out_of_range_seconds(), 0);
    assert_eq!(bag.health(), health_before_wrap);
}

#[test]
fn test_trip_clock_is_lazy_and_sticky() {
    let mut bag = BagState::new("BAG_0001", sequence("BAG_0001", 2), 1.0);
    let t0 = base_time();

    assert_eq!(bag.start_trip_if_needed(t0), t0);
    assert_eq!(bag.start_trip_if_needed(t0 + Duration::hours(2)), t0);
}

#[test]
fn test_record_status_reports_transitions_only() {
    let mut bag = BagState::new("BAG_0001", sequence("BAG_0001", 1), 1.0);
    assert_eq!(bag.record_status(Status::Safe), None);
    assert_eq!(bag.record_status(Status::Safe), None);
    assert_eq!(bag.record_status(Status::Warning), Some(Status::Safe));
}

fn result(bag_id: &str, health: f64) -> ScoringResult {
    ScoringResult {
        bag_id: bag_id.to_string(),
        timestamp: base_time(),
        blood_type: "A+".to_string(),
        route: "Hospital_1".to_string(),
        predicted_health_index: health,
        status: Status::Safe,
        temp_mean: 4.0,
        hum_mean: 45.0,
        accel_rms: 0.2,
        door_count: 0,
        card_reason: None,
    }
}

#[test]
fn test_registry_applies_overrides_and_seeds_minimum() {
    let mut records = sequence("BAG_0001", 2);
    records.extend(sequence("BAG_0009", 2));
    records.extend(sequence("BAG_0010", 2));
    let dataset = TelemetryDataset::from_records(records).unwrap();

    let config = EngineConfig::default()
        .with_initial_health("BAG_0009", 0.72)
        .with_initial_health("BAG_0010", 0.55);
    let mut registry = BagRegistry::from_dataset(dataset, &config);

    assert_eq!(registry.bag_ids(), vec!["BAG_0001", "BAG_0009", "BAG_0010"]);

    let history = vec![
        result("BAG_0001", 0.93),
        result("BAG_0001", 0.88),
        result("BAG_0009", 0.80), // above the override, ignored
        result("BAG_0042", 0.10), // unknown bag, ignored
    ];
    let seeded = registry.seed_from_history(&history);

    assert_eq!(seeded, 2);
    assert_eq!(registry.get("BAG_0001").unwrap().health(), 0.88);
    assert_eq!(registry.get("BAG_0009").unwrap().health(), 0.72);
    assert_eq!(registry.get("BAG_0010").unwrap().health(), 0.55);
    assert!(registry.get("BAG_0042").is_none());
}
