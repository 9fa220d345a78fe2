//! Mutation contexts over a `MemoryStore`.

use crate::journal::Journal;
use crate::store::MemoryStore;
use alloc::vec::Vec;
use tessera_core::{next_entity_id, EntityId, Error, Record, Result};
use tessera_query::ast::Predicate;
use tessera_query::{Context, FetchRequest};
use tracing::{debug, trace};

/// One mutation context. Staged changes are visible to this context's reads
/// and reach the store, and its live queries, on [`commit`](Context::commit).
pub struct MemoryContext {
    store: MemoryStore,
    journal: Journal,
}

impl MemoryContext {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            journal: Journal::new(),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Drops every staged change.
    pub fn rollback(&mut self) {
        debug!(changes = self.journal.len(), "context rolled back");
        self.journal.clear();
    }

    /// The record as this context sees it.
    pub fn current(&self, entity: &str, id: EntityId) -> Result<Option<Record>> {
        match self.journal.get_diff(entity).and_then(|d| d.pending(id)) {
            Some(pending) => Ok(pending.cloned()),
            None => self.store.committed(entity, id),
        }
    }
}

impl Context for MemoryContext {
    fn count(&self, entity: &str, predicate: Option<&Predicate>) -> Result<usize> {
        let request = FetchRequest::new(entity).with_predicate(predicate.cloned());
        Ok(self.fetch(&request)?.len())
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Record>> {
        let records = self
            .store
            .fetch(request, self.journal.get_diff(&request.entity))?;
        trace!(entity = %request.entity, fetched = records.len(), "fetch");
        Ok(records)
    }

    fn construct(&mut self, entity: &str) -> Result<Record> {
        let record = self.store.schema(entity)?.new_record(next_entity_id());
        self.journal.record_insert(entity, record.clone());
        Ok(record)
    }

    fn stage(&mut self, entity: &str, record: Record) -> Result<()> {
        self.store.schema(entity)?.check_record(&record)?;
        match self.current(entity, record.id())? {
            Some(old) => {
                let new = Record::new_with_version(
                    record.id(),
                    old.version().wrapping_add(1),
                    record.values().to_vec(),
                );
                self.journal.record_update(entity, old, new);
            }
            None => self.journal.record_insert(entity, record),
        }
        Ok(())
    }

    fn delete(&mut self, entity: &str, id: EntityId) -> Result<()> {
        match self.current(entity, id)? {
            Some(record) => {
                self.journal.record_delete(entity, record);
                Ok(())
            }
            None => Err(Error::entity_not_found(entity, id)),
        }
    }

    fn has_changes(&self) -> bool {
        !self.journal.is_empty()
    }

    fn commit(&mut self) -> Result<()> {
        if self.journal.is_empty() {
            debug!("nothing to commit");
            self.journal.clear();
            return Ok(());
        }
        debug!(changes = self.journal.len(), "committing");
        let diffs = self.journal.take();
        self.store.commit(&diffs)
    }
}
