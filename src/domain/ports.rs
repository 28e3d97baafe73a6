use crate::domain::model::{Calculation, CalculatorKind, HistoryEntry};
use crate::utils::error::Result;

/// Upper bound on entries kept per calculator.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Persistence of past calculations, most recent first.
pub trait HistoryStore {
    fn get(&self, kind: CalculatorKind) -> Result<Vec<HistoryEntry>>;

    /// Records `calculation` under its own kind and returns the stored entry.
    fn append(&mut self, calculation: Calculation) -> Result<HistoryEntry>;

    fn clear(&mut self, kind: CalculatorKind) -> Result<()>;
}

pub trait ConfigProvider {
    fn history_dir(&self) -> &str;
    fn history_limit(&self) -> usize;
    fn history_enabled(&self) -> bool;
    fn export_dir(&self) -> &str;
}

/// Prepends `entry` and drops the oldest entries beyond `limit`.
pub fn push_bounded(entries: &mut Vec<HistoryEntry>, entry: HistoryEntry, limit: usize) {
    entries.insert(0, entry);
    entries.truncate(limit);
}

pub fn next_id(entries: &[HistoryEntry]) -> u64 {
    entries.iter().map(|e| e.id).max().map_or(1, |id| id + 1)
}
