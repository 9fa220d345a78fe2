//! The mutation context a query runs against.

use crate::ast::Predicate;
use crate::fetch::FetchRequest;
use alloc::vec::Vec;
use tessera_core::{EntityId, Record, Result};

/// One mutation and query context over a store.
///
/// Reads observe changes staged in this context before they are committed.
/// A context is not synchronized; callers keep one per logical actor.
pub trait Context {
    /// Number of `entity` records matching `predicate`.
    fn count(&self, entity: &str, predicate: Option<&Predicate>) -> Result<usize>;

    /// Records selected by `request`.
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Record>>;

    /// A new `entity` record with a fresh id and schema defaults, staged as
    /// an insert.
    fn construct(&mut self, entity: &str) -> Result<Record>;

    /// Stages `record` as the current state of its entity.
    fn stage(&mut self, entity: &str, record: Record) -> Result<()>;

    /// Stages deletion of `entity` record `id`.
    fn delete(&mut self, entity: &str, id: EntityId) -> Result<()>;

    /// True if the context holds uncommitted changes.
    fn has_changes(&self) -> bool;

    /// Persists every staged change.
    fn commit(&mut self) -> Result<()>;
}
