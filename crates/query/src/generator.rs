//! Typed query objects.

use crate::ast::Predicate;
use crate::context::Context;
use crate::fetch::{FetchRequest, Fetchable, SortDescriptor};
use alloc::vec::Vec;
use tessera_core::{Entity, Result};

/// A typed query over one entity.
///
/// Implementors hold optional constraints and compile the ones that are set
/// with [`compile`](crate::compile). A query with nothing set compiles to
/// `None` and selects every record.
///
/// ```
/// use tessera_query::ast::{FieldPredicates, Predicate};
/// use tessera_query::{compile, QueryGenerator};
/// # use tessera_core::{Entity, EntityId, Field, Record, Result};
/// # use tessera_core::schema::{Schema, SchemaBuilder};
/// # #[derive(Clone)] struct Event { id: EntityId }
/// # impl Event { const IDENTIFIER: Field<Event, i64> = Field::new("identifier", 0); }
/// # impl Entity for Event {
/// #     const NAME: &'static str = "Event";
/// #     fn schema() -> Schema { SchemaBuilder::new("Event").unwrap().build() }
/// #     fn id(&self) -> EntityId { self.id }
/// #     fn from_record(r: &Record) -> Result<Self> { Ok(Self { id: r.id() }) }
/// #     fn to_record(&self) -> Record { Record::new(self.id, vec![]) }
/// # }
/// #[derive(Default)]
/// struct EventQuery {
///     identifier: Option<i64>,
/// }
///
/// impl QueryGenerator for EventQuery {
///     type Entity = Event;
///
///     fn predicate(&self) -> Option<Predicate> {
///         compile([self.identifier.map(|v| Event::IDENTIFIER.equals(v))])
///     }
/// }
///
/// assert!(EventQuery::default().predicate().is_none());
/// assert!(EventQuery { identifier: Some(3) }.predicate().is_some());
/// ```
pub trait QueryGenerator {
    type Entity: Entity;

    /// The compiled constraints, or `None` for no restriction.
    fn predicate(&self) -> Option<Predicate>;

    /// First matching entity in store order.
    fn first<C: Context + ?Sized>(&self, ctx: &C) -> Result<Option<Self::Entity>> {
        self.first_sorted(ctx, Vec::new())
    }

    /// First matching entity under `sort`.
    fn first_sorted<C: Context + ?Sized>(
        &self,
        ctx: &C,
        sort: Vec<SortDescriptor>,
    ) -> Result<Option<Self::Entity>> {
        <Self::Entity as Fetchable>::fetch_first(ctx, self.predicate(), sort)
    }

    /// Every matching entity in store order.
    fn all<C: Context + ?Sized>(&self, ctx: &C) -> Result<Vec<Self::Entity>> {
        let request = FetchRequest::of::<Self::Entity>().with_predicate(self.predicate());
        <Self::Entity as Fetchable>::fetch_all(ctx, &request)
    }

    /// Number of matching entities.
    fn count<C: Context + ?Sized>(&self, ctx: &C) -> Result<usize> {
        <Self::Entity as Fetchable>::count_matching(ctx, self.predicate().as_ref())
    }
}
