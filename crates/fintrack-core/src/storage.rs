use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use fintrack_domain::{FinanceSnapshot, Identifiable};
use serde_json::Value;
use uuid::Uuid;

use crate::CoreError;

/// Abstraction over durable backends that hold the umbrella snapshot.
///
/// `load` returns the raw JSON so the store can decode each collection on its own
/// and fall back per key.
pub trait SnapshotStorage: Send + Sync {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<Value>, CoreError>;
    fn save(&self, snapshot: &FinanceSnapshot) -> Result<(), CoreError>;
    /// Removes persisted data. Clearing an empty backend is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-memory backend. Clones share the same underlying slot, so a test can keep a
/// handle after moving one into the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<MemorySlot>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    value: Mutex<Option<Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `value` already persisted, well-formed or not.
    pub fn with_value(value: Value) -> Self {
        let storage = Self::default();
        if let Ok(mut slot) = storage.inner.value.lock() {
            *slot = Some(value);
        }
        storage
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The currently persisted JSON, if any.
    pub fn stored(&self) -> Option<Value> {
        self.inner.value.lock().ok().and_then(|slot| slot.clone())
    }

    /// Number of successful `save` calls.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Value>, CoreError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("memory storage read failure".into()));
        }
        let slot = self
            .inner
            .value
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        Ok(slot.clone())
    }

    fn save(&self, snapshot: &FinanceSnapshot) -> Result<(), CoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("memory storage quota exceeded".into()));
        }
        let value =
            serde_json::to_value(snapshot).map_err(|err| CoreError::Serde(err.to_string()))?;
        let mut slot = self
            .inner
            .value
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        *slot = Some(value);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut slot = self
            .inner
            .value
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}

/// Detects dangling category names and duplicate identifiers within a snapshot.
pub fn snapshot_warnings(snapshot: &FinanceSnapshot) -> Vec<String> {
    let category_names: HashSet<&str> =
        snapshot.categories.iter().map(|c| c.name.as_str()).collect();
    let mut warnings = Vec::new();

    warnings.extend(duplicate_ids("transaction", &snapshot.transactions));
    warnings.extend(duplicate_ids("budget", &snapshot.budgets));
    warnings.extend(duplicate_ids("goal", &snapshot.goals));

    for txn in &snapshot.transactions {
        if !category_names.contains(txn.category.as_str()) {
            warnings.push(format!(
                "transaction {} references unknown category `{}`",
                txn.id, txn.category
            ));
        }
    }
    for budget in &snapshot.budgets {
        if !category_names.contains(budget.category.as_str()) {
            warnings.push(format!(
                "budget {} references unknown category `{}`",
                budget.id, budget.category
            ));
        }
    }
    warnings
}

fn duplicate_ids<T: Identifiable>(label: &str, items: &[T]) -> Vec<String> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    items
        .iter()
        .filter(|item| !seen.insert(item.id()))
        .map(|item| format!("duplicate {label} id {}", item.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_domain::{seed, FinanceSnapshot};

    #[test]
    fn seeded_snapshot_has_no_warnings() {
        assert!(snapshot_warnings(&FinanceSnapshot::seeded()).is_empty());
    }

    #[test]
    fn warns_on_unknown_category_and_duplicate_ids() {
        let mut snapshot = FinanceSnapshot::seeded();
        snapshot.transactions[0].category = "Mascotas".into();
        let dup = snapshot.goals[0].clone();
        snapshot.goals.push(dup);

        let warnings = snapshot_warnings(&snapshot);

        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("Mascotas")));
        assert!(warnings.iter().any(|w| w.contains(&seed::seed_id(201).to_string())));
    }

    #[test]
    fn memory_storage_shares_state_between_clones() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.save(&FinanceSnapshot::empty()).unwrap();

        assert_eq!(handle.write_count(), 1);
        assert!(handle.stored().is_some());

        handle.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn memory_storage_can_simulate_write_failures() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        let err = storage.save(&FinanceSnapshot::empty()).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
        assert_eq!(storage.write_count(), 0);
    }
}
