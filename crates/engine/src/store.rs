//! Record store for budget entries.
//!
//! [`BudgetStore`] is the seam the rest of the engine talks to;
//! [`MemoryStore`] is the volatile, single-process implementation. Every
//! write path derives `actual_amount` and `execution_rate` itself, so a
//! stored entry is always consistent with its own amounts.
//!
//! Concurrent updates of the same id are last-write-wins: there is no
//! version field and no optimistic locking.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    entry::{BudgetEntry, BudgetEntryPatch, NewBudgetEntry},
    filter::FilterSpec,
};

/// Creates, reads, updates and deletes budget entries.
pub trait BudgetStore: Send + Sync {
    /// Month after which stored actuals are forced to zero.
    fn settlement_month(&self) -> u8;

    /// Every entry, in insertion order.
    fn get_all(&self) -> Vec<BudgetEntry>;

    /// Get an entry by its id.
    fn get(&self, id: &str) -> Option<BudgetEntry>;

    /// Store a new entry under a fresh id and return it as stored.
    fn create(&self, fields: NewBudgetEntry) -> BudgetEntry;

    /// Merge `patch` onto the entry and return it as stored.
    fn update(&self, id: &str, patch: BudgetEntryPatch) -> ResultEngine<BudgetEntry>;

    /// Remove an entry. Returns whether it existed.
    fn delete(&self, id: &str) -> bool;

    /// Entries passing `filter`, in insertion order.
    fn query(&self, filter: &FilterSpec) -> Vec<BudgetEntry> {
        let all = self.get_all();
        filter.apply(&all).cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Entries {
    by_id: HashMap<String, BudgetEntry>,
    order: Vec<String>,
}

/// In-memory [`BudgetStore`].
#[derive(Debug)]
pub struct MemoryStore {
    settlement_month: u8,
    entries: RwLock<Entries>,
}

impl MemoryStore {
    pub fn new(settlement_month: u8) -> Self {
        Self {
            settlement_month,
            entries: RwLock::new(Entries::default()),
        }
    }

    // A poisoned lock still holds a consistent map: every mutation below is
    // a single insert or remove.
    fn read<T>(&self, f: impl FnOnce(&Entries) -> T) -> T {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Entries) -> T) -> T {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl BudgetStore for MemoryStore {
    fn settlement_month(&self) -> u8 {
        self.settlement_month
    }

    fn get_all(&self) -> Vec<BudgetEntry> {
        self.read(|entries| {
            entries
                .order
                .iter()
                .filter_map(|id| entries.by_id.get(id).cloned())
                .collect()
        })
    }

    fn get(&self, id: &str) -> Option<BudgetEntry> {
        self.read(|entries| entries.by_id.get(id).cloned())
    }

    fn create(&self, fields: NewBudgetEntry) -> BudgetEntry {
        let entry = BudgetEntry::new(Uuid::new_v4().to_string(), fields, self.settlement_month);
        self.write(|entries| {
            entries.order.push(entry.id.clone());
            entries.by_id.insert(entry.id.clone(), entry.clone());
        });
        tracing::debug!("created budget entry {}", entry.id);
        entry
    }

    fn update(&self, id: &str, patch: BudgetEntryPatch) -> ResultEngine<BudgetEntry> {
        let updated = self.write(|entries| {
            let existing = entries
                .by_id
                .get_mut(id)
                .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
            *existing = existing.patched(patch, self.settlement_month);
            Ok::<_, EngineError>(existing.clone())
        })?;
        tracing::debug!("updated budget entry {id}");
        Ok(updated)
    }

    fn delete(&self, id: &str) -> bool {
        let removed = self.write(|entries| {
            let removed = entries.by_id.remove(id).is_some();
            if removed {
                entries.order.retain(|existing| existing != id);
            }
            removed
        });
        if removed {
            tracing::debug!("deleted budget entry {id}");
        }
        removed
    }

    fn query(&self, filter: &FilterSpec) -> Vec<BudgetEntry> {
        self.read(|entries| {
            let ordered = entries.order.iter().filter_map(|id| entries.by_id.get(id));
            filter.apply(ordered).cloned().collect()
        })
    }
}
