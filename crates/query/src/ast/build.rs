//! Typed predicate builders on `Field` and `Relationship`.
//!
//! ```
//! use tessera_query::ast::{FieldPredicates, StringMatch, TextPredicates};
//! # use tessera_core::{Entity, EntityId, Field, Record, Result};
//! # use tessera_core::schema::{Schema, SchemaBuilder};
//! # #[derive(Clone)] struct Performer { id: EntityId }
//! # impl Entity for Performer {
//! #     const NAME: &'static str = "Performer";
//! #     fn schema() -> Schema { SchemaBuilder::new("Performer").unwrap().build() }
//! #     fn id(&self) -> EntityId { self.id }
//! #     fn from_record(r: &Record) -> Result<Self> { Ok(Self { id: r.id() }) }
//! #     fn to_record(&self) -> Record { Record::new(self.id, vec![]) }
//! # }
//! const FIRST_NAME: Field<Performer, String> = Field::new("firstName", 0);
//!
//! let exact = FIRST_NAME.equals(String::from("Dave"));
//! let prefix = FIRST_NAME.matching(StringMatch::beginning_with("Da"));
//! assert_eq!(prefix.to_string(), "firstName BEGINSWITH[cd] \"Da\"");
//! # let _ = exact;
//! ```

use super::aggregate::Aggregate;
use super::predicate::{CompareOp, Predicate};
use super::range::Range;
use super::string_match::StringMatch;
use tessera_core::{Entity, EntityId, Field, Relationship, Value};

/// Comparison and range predicates on a scalar field.
pub trait FieldPredicates<T> {
    /// `field == value`.
    fn equals(&self, value: T) -> Predicate;

    /// `field <op> value`.
    fn compare(&self, op: CompareOp, value: T) -> Predicate;

    /// `field > range.lower AND field < range.upper`.
    fn within(&self, range: Range<T>) -> Predicate;
}

impl<E: Entity, T: Into<Value>> FieldPredicates<T> for Field<E, T> {
    fn equals(&self, value: T) -> Predicate {
        Predicate::equals(self.path(), value)
    }

    fn compare(&self, op: CompareOp, value: T) -> Predicate {
        Predicate::compare(self.path(), op, value)
    }

    fn within(&self, range: Range<T>) -> Predicate {
        Predicate::between(self.path(), range.lower, range.upper)
    }
}

/// String match predicates on a text field.
pub trait TextPredicates {
    fn matching(&self, matcher: StringMatch) -> Predicate;
}

impl<E: Entity> TextPredicates for Field<E, alloc::string::String> {
    fn matching(&self, matcher: StringMatch) -> Predicate {
        Predicate::text(self.path(), matcher)
    }
}

/// Equality and aggregate predicates on a relationship to `T`.
pub trait RelationshipPredicates<T: Entity> {
    /// `relationship == target`.
    fn is(&self, target: &T) -> Predicate;

    /// `relationship == id`.
    fn is_id(&self, id: EntityId) -> Predicate;

    /// Relationship cardinality against the aggregate's set.
    fn aggregate(&self, aggregate: Aggregate<T>) -> Predicate;
}

impl<E: Entity, T: Entity> RelationshipPredicates<T> for Relationship<E, T> {
    fn is(&self, target: &T) -> Predicate {
        self.is_id(target.id())
    }

    fn is_id(&self, id: EntityId) -> Predicate {
        Predicate::equals(self.path(), Value::Ref(id))
    }

    fn aggregate(&self, aggregate: Aggregate<T>) -> Predicate {
        Predicate::aggregate(self.path(), aggregate.op, aggregate.ids)
    }
}
