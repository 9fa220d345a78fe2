//! Aggregate constraints over relationships.
//!
//! An aggregate relates an entity's relationship collection to a fixed set of
//! related ids. With `n` the number of the relationship's ids found in the set:
//!
//! | operator       | matches when      |
//! |----------------|-------------------|
//! | `SomeMatching` | `n > 0`           |
//! | `AllMatching`  | `n == set.len()`  |
//! | `NoneMatching` | `n == 0`          |
//!
//! `AllMatching` is a subset check: the relationship may hold ids outside the
//! set and still match.

use core::fmt;
use core::marker::PhantomData;
use tessera_core::{Entity, EntityId, RefSet, Value};

/// Aggregate operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    SomeMatching,
    AllMatching,
    NoneMatching,
}

impl AggregateOp {
    /// Applies the operator to an intersection count.
    #[inline]
    pub fn accepts(self, matched: usize, wanted: usize) -> bool {
        match self {
            AggregateOp::SomeMatching => matched > 0,
            AggregateOp::AllMatching => matched == wanted,
            AggregateOp::NoneMatching => matched == 0,
        }
    }

    /// Result for an empty related set, where the outcome no longer
    /// depends on the record.
    #[inline]
    pub fn on_empty_set(self) -> bool {
        !matches!(self, AggregateOp::SomeMatching)
    }

    /// Evaluates the operator against a relationship value.
    pub fn eval(self, relationship: &Value, ids: &RefSet) -> bool {
        self.accepts(relationship.count_related_in(ids), ids.len())
    }
}

/// An aggregate operator paired with a set of `T` entities.
pub struct Aggregate<T> {
    pub op: AggregateOp,
    pub ids: RefSet,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Aggregate<T> {
    pub fn new(op: AggregateOp, related: &[T]) -> Self {
        Self::from_ids(op, related.iter().map(Entity::id))
    }

    pub fn from_ids(op: AggregateOp, ids: impl IntoIterator<Item = EntityId>) -> Self {
        Self {
            op,
            ids: ids.into_iter().collect(),
            _marker: PhantomData,
        }
    }

    pub fn some_matching(related: &[T]) -> Self {
        Self::new(AggregateOp::SomeMatching, related)
    }

    pub fn all_matching(related: &[T]) -> Self {
        Self::new(AggregateOp::AllMatching, related)
    }

    pub fn none_matching(related: &[T]) -> Self {
        Self::new(AggregateOp::NoneMatching, related)
    }
}

impl<T> Clone for Aggregate<T> {
    fn clone(&self) -> Self {
        Self {
            op: self.op,
            ids: self.ids.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Aggregate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregate")
            .field("op", &self.op)
            .field("ids", &self.ids)
            .finish()
    }
}

impl<T> PartialEq for Aggregate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op && self.ids == other.ids
    }
}
