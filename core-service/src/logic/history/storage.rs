//! Ledger persistence backends.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{LedgerError, ScoringResult};

/// Where the ledger lives between process runs
pub trait LedgerStore: Send {
    /// Prior contents; `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<Vec<ScoringResult>>, LedgerError>;

    /// Replace the stored contents with `records`
    fn save(&mut self, records: &[ScoringResult]) -> Result<(), LedgerError>;

    fn describe(&self) -> String;
}

// ============================================================================
// JSON FILE
// ============================================================================

/// Pretty-printed JSON array on disk, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io { path: self.path.clone(), source }
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<ScoringResult>>, LedgerError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let records = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(records))
    }

    fn save(&mut self, records: &[ScoringResult]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.temp_path();
        let file = File::create(&tmp).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush().map_err(|e| self.io_error(e))?;
        drop(writer);

        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

// ============================================================================
// IN-MEMORY
// ============================================================================

/// Store backed by shared memory. Clones share contents, so a caller can keep
/// a handle after moving the store into an engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Option<Vec<ScoringResult>>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScoringResult>) -> Self {
        let store = Self::default();
        *store.records.lock() = Some(records);
        store
    }

    /// Current stored contents
    pub fn snapshot(&self) -> Vec<ScoringResult> {
        self.records.lock().clone().unwrap_or_default()
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<ScoringResult>>, LedgerError> {
        Ok(self.records.lock().clone())
    }

    fn save(&mut self, records: &[ScoringResult]) -> Result<(), LedgerError> {
        *self.records.lock() = Some(records.to_vec());
        *self.saves.lock() += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
