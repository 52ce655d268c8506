//! Registry Module - Single owner of all per-bag state
//!
//! All mutation of bag state goes through the registry, which is itself owned
//! by `MonitorEngine`. Hosts that serve concurrent requests put the whole
//! engine behind one lock.

pub mod bag;
pub mod cursor;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

pub use bag::BagState;
pub use cursor::ReplayCursor;

use crate::logic::config::EngineConfig;
use crate::logic::dataset::TelemetryDataset;
use crate::logic::history::ScoringResult;

#[derive(Debug, Clone)]
pub struct BagRegistry {
    bags: BTreeMap<String, BagState>,
}

impl BagRegistry {
    pub fn from_dataset(dataset: TelemetryDataset, config: &EngineConfig) -> Self {
        let bags = dataset
            .into_sequences()
            .into_iter()
            .map(|(bag_id, records)| {
                let health = config.initial_health_for(&bag_id);
                let bag = BagState::new(bag_id.clone(), records, health);
                (bag_id, bag)
            })
            .collect();

        Self { bags }
    }

    /// Lower each known bag's health to the lowest value found in `history`.
    /// Returns the number of bags that had at least one recorded result.
    pub fn seed_from_history<'a, I>(&mut self, history: I) -> usize
    where
        I: IntoIterator<Item = &'a ScoringResult>,
    {
        let mut seeded = std::collections::BTreeSet::new();

        for result in history {
            if let Some(bag) = self.bags.get_mut(&result.bag_id) {
                bag.seed_health(result.predicted_health_index);
                seeded.insert(result.bag_id.as_str());
            }
        }

        seeded.len()
    }

    /// Sorted bag ids
    pub fn bag_ids(&self) -> Vec<String> {
        self.bags.keys().cloned().collect()
    }

    pub fn get(&self, bag_id: &str) -> Option<&BagState> {
        self.bags.get(bag_id)
    }

    pub fn get_mut(&mut self, bag_id: &str) -> Option<&mut BagState> {
        self.bags.get_mut(bag_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BagState> {
        self.bags.values()
    }

    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }
}
