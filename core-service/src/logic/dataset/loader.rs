use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::record::TelemetryRecord;
use super::DatasetError;

/// Per-bag ordered record sequences, keyed (and therefore sorted) by bag id
#[derive(Debug, Clone)]
pub struct TelemetryDataset {
    sequences: BTreeMap<String, Vec<TelemetryRecord>>,
}

impl TelemetryDataset {
    /// Load a JSON array of records from disk
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let records: Vec<TelemetryRecord> = serde_json::from_reader(BufReader::new(file))?;
        let dataset = Self::from_records(records)?;

        log::info!(
            "Loaded telemetry dataset from {}: {} bags, {} records",
            path.display(),
            dataset.bag_count(),
            dataset.record_count()
        );

        Ok(dataset)
    }

    /// Sort by `(bag_id, timestamp)` and group by bag
    pub fn from_records(mut records: Vec<TelemetryRecord>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        records.sort_by(|a, b| {
            a.bag_id
                .cmp(&b.bag_id)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });

        let mut sequences: BTreeMap<String, Vec<TelemetryRecord>> = BTreeMap::new();
        for record in records {
            sequences.entry(record.bag_id.clone()).or_default().push(record);
        }

        Ok(Self { sequences })
    }

    /// Use pre-grouped sequences as-is (order within each bag is preserved)
    pub fn from_sequences(
        sequences: BTreeMap<String, Vec<TelemetryRecord>>,
    ) -> Result<Self, DatasetError> {
        if sequences.is_empty() {
            return Err(DatasetError::Empty);
        }
        if let Some((bag_id, _)) = sequences.iter().find(|(_, seq)| seq.is_empty()) {
            return Err(DatasetError::EmptySequence(bag_id.clone()));
        }

        Ok(Self { sequences })
    }

    pub fn bag_ids(&self) -> Vec<String> {
        self.sequences.keys().cloned().collect()
    }

    pub fn bag_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn record_count(&self) -> usize {
        self.sequences.values().map(Vec::len).sum()
    }

    pub fn sequence(&self, bag_id: &str) -> Option<&[TelemetryRecord]> {
        self.sequences.get(bag_id).map(Vec::as_slice)
    }

    pub fn into_sequences(self) -> BTreeMap<String, Vec<TelemetryRecord>> {
        self.sequences
    }
}
