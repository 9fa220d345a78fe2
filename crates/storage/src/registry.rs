//! Live query registry.
//!
//! This module provides `LiveRegistry`, which a store uses to track live
//! queries per entity and to route commits to the observers they affect.

use tessera_reactive::{FetchSpec, LiveQueryId, RawObserver, Section};
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;

/// A registered live query: what it selects, who observes it and the
/// results it last reported.
pub struct LiveQuery {
    pub spec: FetchSpec,
    pub observer: Weak<RefCell<dyn RawObserver>>,
    pub sections: Vec<Section>,
}

impl LiveQuery {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.observer.strong_count() > 0
    }
}

/// Tracks live queries and the entities they depend on.
pub struct LiveRegistry {
    /// Entity name -> queries over it
    entity_queries: HashMap<String, Vec<LiveQueryId>>,
    queries: HashMap<LiveQueryId, LiveQuery>,
    next_id: LiveQueryId,
}

impl Default for LiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self {
            entity_queries: HashMap::new(),
            queries: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers a query and returns its id.
    pub fn register(
        &mut self,
        spec: FetchSpec,
        observer: Weak<RefCell<dyn RawObserver>>,
        sections: Vec<Section>,
    ) -> LiveQueryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entity_queries
            .entry(spec.request.entity.clone())
            .or_default()
            .push(id);
        self.queries.insert(
            id,
            LiveQuery {
                spec,
                observer,
                sections,
            },
        );
        id
    }

    /// Returns true if the query was found and removed.
    pub fn unregister(&mut self, id: LiveQueryId) -> bool {
        if self.queries.remove(&id).is_some() {
            self.cleanup();
            true
        } else {
            false
        }
    }

    /// Ids of the live queries over `entity`, in registration order.
    pub fn queries_for(&self, entity: &str) -> Vec<LiveQueryId> {
        self.entity_queries
            .get(entity)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.queries.get(id).is_some_and(LiveQuery::is_alive))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, id: LiveQueryId) -> Option<&LiveQuery> {
        self.queries.get(&id)
    }

    pub fn get_mut(&mut self, id: LiveQueryId) -> Option<&mut LiveQuery> {
        self.queries.get_mut(&id)
    }

    /// Upgrades the observer of `id`, if it is still alive.
    pub fn observer(&self, id: LiveQueryId) -> Option<Rc<RefCell<dyn RawObserver>>> {
        self.queries.get(&id).and_then(|q| q.observer.upgrade())
    }

    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Drops queries whose observer is gone and ids that no longer resolve.
    /// Returns the number of queries removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.queries.len();
        self.queries.retain(|_, q| q.is_alive());
        let queries = &self.queries;
        for ids in self.entity_queries.values_mut() {
            ids.retain(|id| queries.contains_key(id));
        }
        self.entity_queries.retain(|_, ids| !ids.is_empty());
        before - self.queries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_reactive::{RawObjectChange, RawSectionChange};
    use tessera_query::FetchRequest;

    struct Null;

    impl RawObserver for Null {
        fn will_change_content(&mut self) {}
        fn did_change_section(&mut self, _change: RawSectionChange) {}
        fn did_change_object(&mut self, _change: RawObjectChange) {}
        fn did_change_content(&mut self, _total: usize) {}
    }

    fn spec(entity: &str) -> FetchSpec {
        FetchSpec {
            request: FetchRequest::new(entity),
            section_key: None,
        }
    }

    fn observer() -> Rc<RefCell<dyn RawObserver>> {
        Rc::new(RefCell::new(Null))
    }

    #[test]
    fn test_register_routes_by_entity() {
        let mut registry = LiveRegistry::new();
        let a = observer();
        let b = observer();
        let first = registry.register(spec("Event"), Rc::downgrade(&a), Vec::new());
        let second = registry.register(spec("Performer"), Rc::downgrade(&b), Vec::new());
        assert_eq!(first, 1);
        assert_eq!(registry.queries_for("Event"), alloc::vec![first]);
        assert_eq!(registry.queries_for("Performer"), alloc::vec![second]);
        assert!(registry.queries_for("Party").is_empty());
        assert!(registry.observer(first).is_some());
    }

    #[test]
    fn test_dropped_observer_is_skipped_and_pruned() {
        let mut registry = LiveRegistry::new();
        let a = observer();
        let id = registry.register(spec("Event"), Rc::downgrade(&a), Vec::new());
        drop(a);
        assert!(registry.queries_for("Event").is_empty());
        assert!(registry.observer(id).is_none());
        assert_eq!(registry.cleanup(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister() {
        let mut registry = LiveRegistry::new();
        let a = observer();
        let id = registry.register(spec("Event"), Rc::downgrade(&a), Vec::new());
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert_eq!(registry.query_count(), 0);
    }
}
