//! The shared in-memory store.
//!
//! `MemoryStore` holds the committed tables and the live query registry.
//! Handles are cheap clones of one shared state; every mutation goes
//! through a [`MemoryContext`](crate::MemoryContext).

use crate::journal::EntityDiff;
use crate::registry::LiveRegistry;
use crate::snapshot::{deliver, diff, sectionize, RawEvent};
use crate::MemoryContext;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use tessera_core::schema::{Entity, Schema};
use tessera_core::{EntityId, Error, FieldPath, Record, Result};
use tessera_query::ast::Predicate;
use tessera_query::FetchRequest;
use tessera_reactive::{total_len, FetchSpec, LiveQueryId, LiveResults, LiveSource, RawObserver};
use tracing::{debug, info};

#[derive(Default)]
struct StoreState {
    schemas: BTreeMap<String, Schema>,
    /// Entity name → committed records in id order.
    tables: BTreeMap<String, BTreeMap<EntityId, Record>>,
    registry: LiveRegistry,
    commits: u64,
}

type Delivery = (Rc<RefCell<dyn RawObserver>>, Vec<RawEvent>, usize);

impl StoreState {
    fn table(&self, entity: &str) -> Result<&BTreeMap<EntityId, Record>> {
        self.tables
            .get(entity)
            .ok_or_else(|| Error::unknown_entity(entity))
    }

    /// Checks every field path `request` and `section_key` use against the
    /// schema of the requested entity.
    fn check_request(&self, request: &FetchRequest, section_key: Option<FieldPath>) -> Result<()> {
        let schema = self
            .schemas
            .get(&request.entity)
            .ok_or_else(|| Error::unknown_entity(request.entity.as_str()))?;
        let predicate_fields = request.predicate.iter().flat_map(Predicate::fields);
        let sort_fields = request.sort.iter().map(|s| s.field);
        for path in predicate_fields.chain(sort_fields).chain(section_key) {
            schema.check_path(&path)?;
        }
        Ok(())
    }

    /// Applies `diffs` and collects the cycles owed to live queries.
    fn apply(&mut self, diffs: &BTreeMap<String, EntityDiff>) -> Result<Vec<Delivery>> {
        if let Some(unknown) = diffs.keys().find(|name| !self.schemas.contains_key(*name)) {
            return Err(Error::unknown_entity(unknown.as_str()));
        }
        for (entity, diff) in diffs {
            diff.apply_to(self.tables.entry(entity.clone()).or_default());
        }
        self.commits += 1;
        self.registry.cleanup();

        let StoreState {
            tables, registry, ..
        } = self;
        let mut deliveries = Vec::new();
        for (entity, changes) in diffs.iter().filter(|(_, d)| !d.is_empty()) {
            let Some(table) = tables.get(entity) else {
                continue;
            };
            for id in registry.queries_for(entity) {
                let Some(query) = registry.get_mut(id) else {
                    continue;
                };
                let sections = sectionize(query.spec.request.execute(table.values()), query.spec.section_key);
                let events = diff(&query.sections, &sections);
                let total = total_len(&sections);
                query.sections = sections;
                debug!(
                    live_query = id,
                    entity = %entity,
                    added = changes.get_added().len(),
                    modified = changes.get_modified().len(),
                    deleted = changes.get_deleted().len(),
                    events = events.len(),
                    "live query refreshed"
                );
                if events.is_empty() {
                    continue;
                }
                if let Some(observer) = query.observer.upgrade() {
                    deliveries.push((observer, events, total));
                }
            }
        }
        Ok(deliveries)
    }
}

/// An in-memory object store with live queries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity schema.
    pub fn register(&self, schema: Schema) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let name = schema.name().to_string();
        if state.schemas.contains_key(&name) {
            return Err(Error::invalid_schema(format!(
                "Entity already registered: {}",
                name
            )));
        }
        state.tables.insert(name.clone(), BTreeMap::new());
        state.schemas.insert(name, schema);
        Ok(())
    }

    /// Registers the schema of `E`.
    pub fn register_entity<E: Entity>(&self) -> Result<()> {
        self.register(E::schema())
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.state.borrow().schemas.contains_key(name)
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.state.borrow().schemas.keys().cloned().collect()
    }

    pub fn schema(&self, entity: &str) -> Result<Schema> {
        self.state
            .borrow()
            .schemas
            .get(entity)
            .cloned()
            .ok_or_else(|| Error::unknown_entity(entity))
    }

    /// Opens a mutation context over this store.
    pub fn context(&self) -> MemoryContext {
        MemoryContext::new(self.clone())
    }

    /// Number of committed `entity` records.
    pub fn count(&self, entity: &str) -> Result<usize> {
        Ok(self.state.borrow().table(entity)?.len())
    }

    /// Number of commits that changed something.
    pub fn commit_count(&self) -> u64 {
        self.state.borrow().commits
    }

    /// Number of registered live queries, pruning dropped ones first.
    pub fn live_query_count(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.registry.cleanup();
        state.registry.query_count()
    }

    pub(crate) fn committed(&self, entity: &str, id: EntityId) -> Result<Option<Record>> {
        Ok(self.state.borrow().table(entity)?.get(&id).cloned())
    }

    /// Runs `request` over the committed records, laying `pending` over them.
    pub(crate) fn fetch(
        &self,
        request: &FetchRequest,
        pending: Option<&EntityDiff>,
    ) -> Result<Vec<Record>> {
        let state = self.state.borrow();
        state.check_request(request, None)?;
        let table = state.table(&request.entity)?;
        Ok(match pending {
            Some(diff) => request.execute(diff.overlay(table)),
            None => request.execute(table.values()),
        })
    }

    /// Applies `diffs` and drives every affected live query through one
    /// cycle. Delivery happens after the state borrow is released.
    pub(crate) fn commit(&self, diffs: &BTreeMap<String, EntityDiff>) -> Result<()> {
        let deliveries = {
            let mut state = self
                .state
                .try_borrow_mut()
                .map_err(|_| Error::store("commit", "store is busy"))?;
            state.apply(diffs)?
        };
        info!(
            entities = diffs.len(),
            cycles = deliveries.len(),
            "commit applied"
        );
        for (observer, events, total) in deliveries {
            deliver(&mut *observer.borrow_mut(), events, total);
        }
        Ok(())
    }
}

impl LiveSource for MemoryStore {
    fn subscribe(
        &self,
        spec: FetchSpec,
        observer: Weak<RefCell<dyn RawObserver>>,
    ) -> Result<LiveResults> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| Error::store("subscribe", "store is busy"))?;
        state.check_request(&spec.request, spec.section_key)?;
        let records = spec.request.execute(state.table(&spec.request.entity)?.values());
        let sections = sectionize(records, spec.section_key);
        let entity = spec.request.entity.clone();
        let id = state.registry.register(spec, observer, sections.clone());
        debug!(live_query = id, entity = %entity, total = total_len(&sections), "live query registered");
        Ok(LiveResults { id, sections })
    }

    fn unsubscribe(&self, id: LiveQueryId) -> bool {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.registry.unregister(id),
            // Pruned on the next commit once the observer is gone.
            Err(_) => false,
        }
    }
}
