//! Tessera Storage - In-memory reference store for Tessera.
//!
//! This crate provides:
//!
//! - `MemoryStore`: Committed tables, entity schemas and the live query registry
//! - `MemoryContext`: A mutation context with a pending `Journal`
//! - `Journal` / `EntityDiff`: Net staged changes per entity
//! - `snapshot`: Sectioning of results and the raw events between snapshots
//! - `LiveRegistry`: Routes commits to the live queries they affect
//!
//! # Example
//!
//! ```rust
//! use tessera_storage::MemoryStore;
//! use tessera_core::schema::SchemaBuilder;
//! use tessera_core::{DataType, Record, Value};
//! use tessera_query::{Context, FetchRequest};
//!
//! let store = MemoryStore::new();
//! let schema = SchemaBuilder::new("Party")
//!     .unwrap()
//!     .add_field("name", DataType::String)
//!     .unwrap()
//!     .build();
//! store.register(schema).unwrap();
//!
//! let mut ctx = store.context();
//! let id = ctx.construct("Party").unwrap().id();
//! ctx.stage("Party", Record::new(id, vec![Value::from("Wake")])).unwrap();
//! ctx.commit().unwrap();
//!
//! assert_eq!(store.count("Party").unwrap(), 1);
//! assert_eq!(ctx.fetch(&FetchRequest::new("Party")).unwrap().len(), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod context;
pub mod journal;
pub mod registry;
pub mod snapshot;
pub mod store;

pub use context::MemoryContext;
pub use journal::{EntityDiff, Journal};
pub use registry::{LiveQuery, LiveRegistry};
pub use snapshot::{diff, sectionize, RawEvent};
pub use store::MemoryStore;
