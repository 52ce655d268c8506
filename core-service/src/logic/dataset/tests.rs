use std::collections::BTreeMap;
use std::fs;

use tempfile::tempdir;

use super::fixtures::{record, sequence};
use super::{DatasetError, TelemetryDataset};

const RAW_DATASET: &str = r#"[
  {"bag_id": "BAG_0002", "timestamp": "2024-03-04T09:00:30", "temp_mean": 4.1, "temp_min": 3.8,
   "temp_max": 4.4, "temp_std": 0.1, "frac_temp_above_6": 0.0, "frac_temp_above_8": 0.0,
   "hum_mean": 44.0, "hum_std": 1.0, "accel_rms": 0.2, "door_count": 0, "light_mean_abs": 3.0,
   "handling_stress": 0.1, "route": "Hospital_1", "blood_type": "A+"},
  {"bag_id": "BAG_0001", "timestamp": "2024-03-04 09:00:15", "temp_mean": 7.2, "temp_min": 6.9,
   "temp_max": 7.5, "temp_std": 0.2, "frac_temp_above_6": 1.0, "frac_temp_above_8": 0.0,
   "hum_mean": 50.0, "hum_std": 2.0, "accel_rms": 0.4, "door_count": 2, "light_mean_abs": 9.0,
   "handling_stress": 0.3, "route": "Hospital_3", "blood_type": "B-", "Health_Index": 0.9},
  {"bag_id": "BAG_0001", "timestamp": 1709542800000, "temp_mean": 5.0, "temp_min": 4.8,
   "temp_max": 5.2, "temp_std": 0.1, "frac_temp_above_6": 0.0, "frac_temp_above_8": 0.0,
   "hum_mean": 48.0, "hum_std": 1.2, "accel_rms": 0.3, "door_count": 1, "light_mean_abs": 4.0,
   "handling_stress": 0.2, "route": "Hospital_3", "blood_type": "B-"}
]"#;

#[test]
fn test_load_sorts_and_groups_by_bag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sensors.json");
    fs::write(&path, RAW_DATASET).unwrap();

    let dataset = TelemetryDataset::load(&path).unwrap();

    assert_eq!(dataset.bag_ids(), vec!["BAG_0001", "BAG_0002"]);
    assert_eq!(dataset.record_count(), 3);

    // Epoch millis 1709542800000 is 2024-03-04T09:00:00Z, before the 09:00:15 record
    let bag1 = dataset.sequence("BAG_0001").unwrap();
    assert_eq!(bag1.len(), 2);
    assert_eq!(bag1[0].temp_mean, 5.0);
    assert_eq!(bag1[1].temp_mean, 7.2);
}

#[test]
fn test_load_missing_file_is_fatal() {
    let dir = tempdir().unwrap();
    let result = TelemetryDataset::load(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(DatasetError::NotFound(_))));
}

#[test]
fn test_load_missing_field_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("drift.json");
    fs::write(
        &path,
        r#"[{"bag_id": "BAG_0001", "timestamp": "2024-03-04T09:00:00", "temp_mean": 4.0}]"#,
    )
    .unwrap();

    assert!(matches!(
        TelemetryDataset::load(&path),
        Err(DatasetError::Parse(_))
    ));
}

#[test]
fn test_empty_dataset_rejected() {
    assert!(matches!(
        TelemetryDataset::from_records(Vec::new()),
        Err(DatasetError::Empty)
    ));
}

#[test]
fn test_empty_sequence_rejected() {
    let mut sequences = BTreeMap::new();
    sequences.insert("BAG_0001".to_string(), sequence("BAG_0001", 2));
    sequences.insert("BAG_0002".to_string(), Vec::new());

    match TelemetryDataset::from_sequences(sequences) {
        Err(DatasetError::EmptySequence(bag)) => assert_eq!(bag, "BAG_0002"),
        other => panic!("Expected EmptySequence, got {:?}", other.map(|d| d.bag_count())),
    }
}

#[test]
fn test_check_finite_names_the_field() {
    let mut rec = record("BAG_0001", 0, 4.0);
    assert!(rec.check_finite().is_ok());

    rec.hum_std = f64::NAN;
    let err = rec.check_finite().unwrap_err();
    assert!(err.to_string().contains("hum_std"));
}
