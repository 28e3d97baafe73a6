use crate::domain::model::{Calculation, CalculatorKind, HistoryEntry};
use crate::domain::ports::{next_id, push_bounded, HistoryStore, MAX_HISTORY_ENTRIES};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MemoryHistoryStore {
    lists: HashMap<CalculatorKind, Vec<HistoryEntry>>,
    limit: usize,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::with_limit(MAX_HISTORY_ENTRIES)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            lists: HashMap::new(),
            limit: limit.min(MAX_HISTORY_ENTRIES),
        }
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn get(&self, kind: CalculatorKind) -> Result<Vec<HistoryEntry>> {
        Ok(self.lists.get(&kind).cloned().unwrap_or_default())
    }

    fn append(&mut self, calculation: Calculation) -> Result<HistoryEntry> {
        let entries = self.lists.entry(calculation.kind()).or_default();
        let entry = HistoryEntry::new(next_id(entries), calculation);
        push_bounded(entries, entry.clone(), self.limit);
        Ok(entry)
    }

    fn clear(&mut self, kind: CalculatorKind) -> Result<()> {
        self.lists.remove(&kind);
        Ok(())
    }
}

/// One JSON file per calculator kind, named after its storage key.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    base_path: PathBuf,
    limit: usize,
}

impl JsonFileHistoryStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_limit(base_path, MAX_HISTORY_ENTRIES)
    }

    pub fn with_limit(base_path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            base_path: base_path.into(),
            limit: limit.min(MAX_HISTORY_ENTRIES),
        }
    }

    pub fn file_path(&self, kind: CalculatorKind) -> PathBuf {
        self.base_path.join(format!("{}.json", kind.storage_key()))
    }

    fn read(&self, path: &Path) -> Result<Vec<HistoryEntry>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(path)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    /// Whole-list overwrite through a sibling temp file and rename.
    fn write(&self, path: &Path, entries: &[HistoryEntry]) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn get(&self, kind: CalculatorKind) -> Result<Vec<HistoryEntry>> {
        self.read(&self.file_path(kind))
    }

    fn append(&mut self, calculation: Calculation) -> Result<HistoryEntry> {
        let path = self.file_path(calculation.kind());
        let mut entries = self.read(&path)?;
        let entry = HistoryEntry::new(next_id(&entries), calculation);
        push_bounded(&mut entries, entry.clone(), self.limit);
        self.write(&path, &entries)?;

        tracing::debug!(
            "appended history entry #{} to {} ({} entries)",
            entry.id,
            path.display(),
            entries.len()
        );
        Ok(entry)
    }

    fn clear(&mut self, kind: CalculatorKind) -> Result<()> {
        let path = self.file_path(kind);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!("cleared {} history at {}", kind, path.display());
        }
        Ok(())
    }
}
