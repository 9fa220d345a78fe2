//! Tessera Query - Predicate algebra and typed queries for Tessera.
//!
//! This crate provides:
//!
//! - `ast`: The `Predicate` tree, string matching, exclusive ranges, aggregates
//!   and typed builders on `Field` / `Relationship`
//! - `compile`: Folds optional fragments into one conjunction
//! - `context`: The `Context` trait a store implements
//! - `fetch`: `FetchRequest`, `SortDescriptor` and the `Fetchable` surface
//! - `generator`: The `QueryGenerator` trait for typed query objects
//! - `upsert`: The `Recordable` record-or-create resolver

#![no_std]

extern crate alloc;

pub mod ast;
mod compile;
pub mod context;
pub mod fetch;
pub mod generator;
pub mod upsert;

pub use compile::compile;
pub use context::Context;
pub use fetch::{compare_records, FetchRequest, Fetchable, SortDescriptor, DEFAULT_BATCH_SIZE};
pub use generator::QueryGenerator;
pub use upsert::{Recordable, RecordedEntity};
