//! Fetch requests and the per-entity fetch surface.

use crate::ast::Predicate;
use crate::context::Context;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use tessera_core::{Entity, FieldPath, Record, Result};

/// Default number of records a store fetches per round trip.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// One sort key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortDescriptor {
    pub field: FieldPath,
    pub ascending: bool,
}

impl SortDescriptor {
    pub const fn ascending(field: FieldPath) -> Self {
        Self {
            field,
            ascending: true,
        }
    }

    pub const fn descending(field: FieldPath) -> Self {
        Self {
            field,
            ascending: false,
        }
    }
}

/// Compares two records under `sort`, keys applied lexicographically.
///
/// Missing values sort first. Records equal under every key compare equal so
/// that a stable sort keeps their incoming (id) order.
pub fn compare_records(sort: &[SortDescriptor], a: &Record, b: &Record) -> Ordering {
    for key in sort {
        let cmp = match (key.field.get(a), key.field.get(b)) {
            (Some(av), Some(bv)) => av.cmp(bv),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if cmp != Ordering::Equal {
            return if key.ascending { cmp } else { cmp.reverse() };
        }
    }
    Ordering::Equal
}

/// A fetch against one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    pub entity: String,
    pub predicate: Option<Predicate>,
    pub sort: Vec<SortDescriptor>,
    /// Maximum number of results; 0 means unlimited.
    pub limit: usize,
    /// Store performance hint; never affects results.
    pub batch_size: usize,
}

impl FetchRequest {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            predicate: None,
            sort: Vec::new(),
            limit: 0,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// A request for every record of `E`.
    pub fn of<E: Entity>() -> Self {
        Self::new(E::NAME)
    }

    pub fn with_predicate(mut self, predicate: Option<Predicate>) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn with_sort(mut self, sort: Vec<SortDescriptor>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Returns true if `record` passes the predicate.
    #[inline]
    pub fn matches(&self, record: &Record) -> bool {
        self.predicate.as_ref().map_or(true, |p| p.eval(record))
    }

    /// Runs the request over `records`, which must arrive in id order.
    pub fn execute<'a, I>(&self, records: I) -> Vec<Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut out: Vec<Record> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        if !self.sort.is_empty() {
            out.sort_by(|a, b| compare_records(&self.sort, a, b));
        }
        if self.limit > 0 {
            out.truncate(self.limit);
        }
        out
    }
}

/// Fetch surface available on every entity type.
pub trait Fetchable: Entity {
    /// Number of stored `Self` records.
    fn count<C: Context + ?Sized>(ctx: &C) -> Result<usize> {
        ctx.count(Self::NAME, None)
    }

    /// Number of stored `Self` records matching `predicate`.
    fn count_matching<C: Context + ?Sized>(ctx: &C, predicate: Option<&Predicate>) -> Result<usize> {
        ctx.count(Self::NAME, predicate)
    }

    /// Fetches and maps the records `request` selects.
    fn fetch_all<C: Context + ?Sized>(ctx: &C, request: &FetchRequest) -> Result<Vec<Self>> {
        ctx.fetch(request)?.iter().map(Self::from_record).collect()
    }

    /// Fetches the first record matching `predicate` under `sort`.
    fn fetch_first<C: Context + ?Sized>(
        ctx: &C,
        predicate: Option<Predicate>,
        sort: Vec<SortDescriptor>,
    ) -> Result<Option<Self>> {
        let request = FetchRequest::of::<Self>()
            .with_predicate(predicate)
            .with_sort(sort)
            .with_limit(1);
        match ctx.fetch(&request)?.first() {
            Some(record) => Self::from_record(record).map(Some),
            None => Ok(None),
        }
    }
}

impl<E: Entity> Fetchable for E {}
