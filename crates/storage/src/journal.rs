//! Pending changes of a mutation context.
//!
//! This module provides the `Journal` struct, which records the inserts,
//! updates and deletes a context stages until it commits.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use tessera_core::{EntityId, Record};

/// Net changes to one entity's records.
#[derive(Clone, Debug, Default)]
pub struct EntityDiff {
    entity: String,
    /// Added records (id → record).
    added: BTreeMap<EntityId, Record>,
    /// Modified records (id → (committed, pending)).
    modified: BTreeMap<EntityId, (Record, Record)>,
    /// Deleted records (id → committed record).
    deleted: BTreeMap<EntityId, Record>,
}

impl EntityDiff {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            added: BTreeMap::new(),
            modified: BTreeMap::new(),
            deleted: BTreeMap::new(),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Records an addition.
    pub fn add(&mut self, record: Record) {
        let id = record.id();
        // Re-adding a deleted record turns the delete into a modification
        if let Some(old) = self.deleted.remove(&id) {
            self.modified.insert(id, (old, record));
        } else {
            self.added.insert(id, record);
        }
    }

    /// Records a modification.
    pub fn modify(&mut self, old: Record, new: Record) {
        let id = old.id();
        if self.added.contains_key(&id) {
            self.added.insert(id, new);
        } else if let Some((original, _)) = self.modified.remove(&id) {
            self.modified.insert(id, (original, new));
        } else {
            self.modified.insert(id, (old, new));
        }
    }

    /// Records a deletion.
    pub fn delete(&mut self, record: Record) {
        let id = record.id();
        if self.added.remove(&id).is_some() {
            return;
        }
        if let Some((original, _)) = self.modified.remove(&id) {
            self.deleted.insert(id, original);
        } else {
            self.deleted.insert(id, record);
        }
    }

    pub fn get_added(&self) -> &BTreeMap<EntityId, Record> {
        &self.added
    }

    pub fn get_modified(&self) -> &BTreeMap<EntityId, (Record, Record)> {
        &self.modified
    }

    pub fn get_deleted(&self) -> &BTreeMap<EntityId, Record> {
        &self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Number of records with a net change.
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// The pending state of `id`: `Some(None)` if it is deleted, `None` if
    /// this diff does not touch it.
    pub fn pending(&self, id: EntityId) -> Option<Option<&Record>> {
        if let Some(record) = self.added.get(&id) {
            Some(Some(record))
        } else if let Some((_, new)) = self.modified.get(&id) {
            Some(Some(new))
        } else if self.deleted.contains_key(&id) {
            Some(None)
        } else {
            None
        }
    }

    /// `committed` with this diff laid over it, in id order.
    pub fn overlay<'a>(&'a self, committed: &'a BTreeMap<EntityId, Record>) -> Vec<&'a Record> {
        let mut view: BTreeMap<EntityId, &Record> = committed
            .iter()
            .filter(|(id, _)| !self.deleted.contains_key(id))
            .map(|(id, record)| (*id, record))
            .collect();
        for (id, (_, new)) in &self.modified {
            view.insert(*id, new);
        }
        for (id, record) in &self.added {
            view.insert(*id, record);
        }
        view.into_values().collect()
    }

    /// Applies the diff to `table`.
    pub fn apply_to(&self, table: &mut BTreeMap<EntityId, Record>) {
        for id in self.deleted.keys() {
            table.remove(id);
        }
        for (id, (_, new)) in &self.modified {
            table.insert(*id, new.clone());
        }
        for (id, record) in &self.added {
            table.insert(*id, record.clone());
        }
    }
}

/// Journal of the changes staged in one context.
pub struct Journal {
    /// Entity diffs (entity name → diff).
    diffs: BTreeMap<String, EntityDiff>,
}

impl Journal {
    pub fn new() -> Self {
        Self {
            diffs: BTreeMap::new(),
        }
    }

    /// Records an insert operation.
    pub fn record_insert(&mut self, entity: &str, record: Record) {
        self.diff_mut(entity).add(record);
    }

    /// Records an update operation.
    pub fn record_update(&mut self, entity: &str, old: Record, new: Record) {
        self.diff_mut(entity).modify(old, new);
    }

    /// Records a delete operation.
    pub fn record_delete(&mut self, entity: &str, record: Record) {
        self.diff_mut(entity).delete(record);
    }

    fn diff_mut(&mut self, entity: &str) -> &mut EntityDiff {
        self.diffs
            .entry(entity.into())
            .or_insert_with(|| EntityDiff::new(entity))
    }

    pub fn get_diff(&self, entity: &str) -> Option<&EntityDiff> {
        self.diffs.get(entity)
    }

    /// Number of records with a net change, across entities.
    pub fn len(&self) -> usize {
        self.diffs.values().map(EntityDiff::len).sum()
    }

    /// True if no net change is pending. An insert followed by a delete of
    /// the same record cancels out.
    pub fn is_empty(&self) -> bool {
        self.diffs.values().all(EntityDiff::is_empty)
    }

    /// Hands out the diffs and clears the journal.
    pub fn take(&mut self) -> BTreeMap<String, EntityDiff> {
        core::mem::take(&mut self.diffs)
    }

    /// Drops every pending change.
    pub fn clear(&mut self) {
        self.diffs.clear();
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}
