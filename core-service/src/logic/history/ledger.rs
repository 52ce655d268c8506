use std::collections::VecDeque;

use super::storage::LedgerStore;
use super::{LedgerError, ScoringResult};
use crate::logic::config::FlushPolicy;

/// Bounded, append-only scoring history.
///
/// Holds at most `capacity` results across all bags; the oldest fall off the
/// front. The store always receives exactly the in-memory window.
pub struct HistoryLedger {
    entries: VecDeque<ScoringResult>,
    capacity: usize,
    query_limit: usize,
    store: Box<dyn LedgerStore>,
    policy: FlushPolicy,
    dirty: bool,
}

impl HistoryLedger {
    /// Open the ledger over `store`. A missing or unreadable store yields an
    /// empty ledger; the failure is logged and never propagated.
    pub fn open(
        store: Box<dyn LedgerStore>,
        capacity: usize,
        query_limit: usize,
        policy: FlushPolicy,
    ) -> Self {
        let capacity = capacity.max(1);

        let loaded = match store.load() {
            Ok(Some(records)) => records,
            Ok(None) => {
                log::info!("No prior history in {}, starting empty", store.describe());
                Vec::new()
            }
            Err(e) => {
                log::warn!(
                    "History in {} is unreadable ({}), starting empty",
                    store.describe(),
                    e
                );
                Vec::new()
            }
        };

        let skip = loaded.len().saturating_sub(capacity);
        let entries: VecDeque<_> = loaded.into_iter().skip(skip).collect();

        log::info!(
            "History ledger opened: {} entries (cap {}, flush {:?})",
            entries.len(),
            capacity,
            policy
        );

        Self {
            entries,
            capacity,
            query_limit,
            store,
            policy,
            dirty: false,
        }
    }

    /// Append one result, evicting the oldest beyond capacity
    pub fn append(&mut self, result: ScoringResult) -> Result<(), LedgerError> {
        self.entries.push_back(result);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.dirty = true;

        if self.policy == FlushPolicy::EveryAppend {
            self.flush()?;
        }
        Ok(())
    }

    /// Called once at the end of every tick (successful or not)
    pub fn end_tick(&mut self) -> Result<(), LedgerError> {
        if self.policy == FlushPolicy::EveryTick {
            self.flush()?;
        }
        Ok(())
    }

    /// Write the current window to the store if anything changed
    pub fn flush(&mut self) -> Result<(), LedgerError> {
        if !self.dirty {
            return Ok(());
        }

        self.store.save(self.entries.make_contiguous())?;
        self.dirty = false;
        Ok(())
    }

    /// The most recent results for `bag_id` (at most `query_limit`), oldest first.
    /// Unknown bags yield an empty list.
    pub fn query(&self, bag_id: &str) -> Vec<ScoringResult> {
        let mut records: Vec<_> = self
            .entries
            .iter()
            .rev()
            .filter(|r| r.bag_id == bag_id)
            .take(self.query_limit)
            .cloned()
            .collect();
        records.reverse();
        records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoringResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn has_unflushed(&self) -> bool {
        self.dirty
    }

    pub fn describe_store(&self) -> String {
        self.store.describe()
    }
}
