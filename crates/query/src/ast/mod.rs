//! AST module for query predicates.

mod aggregate;
mod build;
mod predicate;
mod range;
mod string_match;

pub use aggregate::{Aggregate, AggregateOp};
pub use build::{FieldPredicates, RelationshipPredicates, TextPredicates};
pub use predicate::{CompareOp, Predicate};
pub use range::{Range, ONE_DAY_MS};
pub use string_match::{MatchMode, StringMatch};
