//! Results controller configuration.

use crate::source::FetchSpec;
use alloc::string::String;
use alloc::vec::Vec;
use tessera_core::{Entity, FieldPath};
use tessera_query::ast::Predicate;
use tessera_query::{FetchRequest, SortDescriptor, DEFAULT_BATCH_SIZE};

/// What a [`ResultsController`](crate::ResultsController) observes.
///
/// | field         | default          |
/// |---------------|------------------|
/// | `fetch_limit` | `0` (unlimited)  |
/// | `batch_size`  | `100`            |
/// | `predicate`   | `None` (all)     |
/// | `sort`        | empty (id order) |
/// | `section_key` | `None` (one section) |
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    pub entity: String,
    pub fetch_limit: usize,
    pub batch_size: usize,
    pub predicate: Option<Predicate>,
    pub sort: Vec<SortDescriptor>,
    pub section_key: Option<FieldPath>,
}

impl ControllerConfig {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fetch_limit: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            predicate: None,
            sort: Vec::new(),
            section_key: None,
        }
    }

    pub fn of<E: Entity>() -> Self {
        Self::new(E::NAME)
    }

    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_predicate(mut self, predicate: Option<Predicate>) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn with_sort(mut self, sort: Vec<SortDescriptor>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_section_key(mut self, key: FieldPath) -> Self {
        self.section_key = Some(key);
        self
    }

    /// Builds the fetch specification.
    ///
    /// Sections are consecutive runs of equal keys, so when a section key is
    /// set and the sort does not already lead with it, an ascending sort on
    /// the key is put first.
    pub fn fetch_spec(&self) -> FetchSpec {
        let mut sort = self.sort.clone();
        if let Some(key) = self.section_key {
            if sort.first().map(|s| s.field) != Some(key) {
                sort.insert(0, SortDescriptor::ascending(key));
            }
        }
        FetchSpec {
            request: FetchRequest::new(self.entity.clone())
                .with_predicate(self.predicate.clone())
                .with_sort(sort)
                .with_limit(self.fetch_limit)
                .with_batch_size(self.batch_size),
            section_key: self.section_key,
        }
    }
}
