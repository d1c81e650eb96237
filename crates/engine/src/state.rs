//! Mutable state container
//!
//! Per-double ledger of field writes. It overlays the definition: reads
//! prefer the latest recorded write and fall back to the definition's
//! original value, which is never touched.
//!
//! Writes are keyed by field name and an optional delta. `delta = None`
//! records a whole-field write (`setValue` on a field list) and supersedes
//! every earlier per-delta write for that field, so reads always follow
//! the order in which writes were issued.

use double_core::Value;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Write ledger for one double
///
/// Created only for mutable doubles and shared by that double's field
/// lists and items. Never shared across doubles.
#[derive(Debug, Default)]
pub struct MutableState {
    writes: Mutex<BTreeMap<(String, Option<usize>), Value>>,
}

impl MutableState {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write
    pub fn write(&self, field: &str, delta: Option<usize>, value: Value) {
        let mut writes = self.writes.lock();
        if delta.is_none() {
            writes.retain(|(name, _), _| name != field);
        }
        writes.insert((field.to_string(), delta), value);
    }

    /// Latest write for the key, `None` if never written
    pub fn read(&self, field: &str, delta: Option<usize>) -> Option<Value> {
        self.writes.lock().get(&(field.to_string(), delta)).cloned()
    }

    /// True if the key has been written
    pub fn has_write(&self, field: &str, delta: Option<usize>) -> bool {
        self.writes.lock().contains_key(&(field.to_string(), delta))
    }

    /// Highest delta with a per-item write for the field
    pub fn max_delta(&self, field: &str) -> Option<usize> {
        self.writes
            .lock()
            .keys()
            .filter(|(name, _)| name == field)
            .filter_map(|(_, delta)| *delta)
            .max()
    }

    /// Fields with at least one write
    pub fn fields(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .writes
            .lock()
            .keys()
            .map(|(name, _)| name.clone())
            .collect();
        names.dedup();
        names
    }

    /// Number of recorded writes
    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    /// True if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.writes.lock().is_empty()
    }
}
