//! Schema module for Tessera.
//!
//! Entity schemas, their field definitions, and the `Entity` trait that maps
//! typed structs onto stored records.

mod entity;
mod field_def;

pub use entity::{Entity, Schema, SchemaBuilder};
pub use field_def::FieldDef;
