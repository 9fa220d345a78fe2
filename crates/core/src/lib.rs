//! Tessera Core - Core types for the Tessera typed query layer.
//!
//! This crate provides the foundational types shared by every other Tessera crate:
//!
//! - `DataType`: Supported field types (Boolean, Int64, Float64, String, DateTime, Ref, RefSet)
//! - `Value`: Runtime values held in entity fields
//! - `Record`: The stored form of an entity: an id, a version and positional values
//! - `schema`: Entity schemas (`Schema`, `FieldDef`) and the `Entity` trait
//! - `Field` / `Relationship`: Typed field paths used to build predicates
//! - `fold`: Case and diacritic folding for insensitive string matching
//! - `Error`: Error types shared by the query, storage, reactive and procure layers
//!
//! # Example
//!
//! ```rust
//! use tessera_core::{DataType, Record, Value};
//! use tessera_core::schema::SchemaBuilder;
//!
//! let schema = SchemaBuilder::new("Event")
//!     .unwrap()
//!     .add_field("identifier", DataType::Int64)
//!     .unwrap()
//!     .add_field("startDate", DataType::DateTime)
//!     .unwrap()
//!     .build();
//!
//! let record = schema.new_record(7);
//! assert_eq!(record.id(), 7);
//! assert_eq!(record.get(0), Some(&Value::Int64(0)));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod field;
pub mod fold;
mod record;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use field::{Field, FieldPath, FromValue, Relationship};
pub use record::{next_entity_id, set_next_entity_id_if_greater, EntityId, Record};
pub use schema::Entity;
pub use types::DataType;
pub use value::{RefSet, Timestamp, Value};
