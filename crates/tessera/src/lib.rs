//! Tessera - typed queries, record-or-create upserts and live result diffs.
//!
//! This crate re-exports the Tessera workspace:
//!
//! - `core`: Values, records, entity schemas, typed field paths and errors
//! - `query`: The predicate algebra, `QueryGenerator` and the `Recordable` upsert
//! - `reactive`: `ResultsController` and the change batches it delivers
//! - `storage`: `MemoryStore`, the in-memory reference store with live queries
//! - `procure`: Decoding external JSON sources and archiving them into a store
//!
//! Most programs only need the [`prelude`].
//!
//! # Example
//!
//! ```rust
//! use tessera::prelude::*;
//! use tessera::core::schema::SchemaBuilder;
//! use tessera::core::{DataType, FieldPath, Record, Value};
//! use std::cell::RefCell;
//! use std::rc::{Rc, Weak};
//!
//! let store = MemoryStore::new();
//! store
//!     .register(
//!         SchemaBuilder::new("Party")
//!             .unwrap()
//!             .add_field("name", DataType::String)
//!             .unwrap()
//!             .build(),
//!     )
//!     .unwrap();
//!
//! const NAME: FieldPath = FieldPath { entity: "Party", name: "name", index: 0 };
//! let controller = ResultsController::new(
//!     store.clone(),
//!     ControllerConfig::new("Party").with_sort(vec![SortDescriptor::ascending(NAME)]),
//! );
//! let recorder = Rc::new(RefCell::new(BatchRecorder::new()));
//! let consumer: Weak<RefCell<dyn ResultsConsumer>> = Rc::downgrade(&recorder) as _;
//! controller.borrow_mut().set_consumer(consumer);
//! controller.borrow_mut().reload().unwrap();
//!
//! let mut ctx = store.context();
//! let id = ctx.construct("Party").unwrap().id();
//! ctx.stage("Party", Record::new(id, vec![Value::from("Wake")])).unwrap();
//! ctx.commit().unwrap();
//!
//! assert_eq!(
//!     recorder.borrow().last_batch().unwrap(),
//!     &[
//!         ChangeOperation::InsertSection(0),
//!         ChangeOperation::InsertRow(IndexPath::new(0, 0)),
//!     ][..]
//! );
//! ```

pub use tessera_core as core;
pub use tessera_procure as procure;
pub use tessera_query as query;
pub use tessera_reactive as reactive;
pub use tessera_storage as storage;

pub use tessera_core::{Error, Result};

/// The types and traits an application touches day to day.
pub mod prelude {
    pub use tessera_core::{Entity, EntityId, Error, Field, Record, Relationship, Result, Timestamp};
    pub use tessera_procure::{DecodeConfig, Procurable, SourceLocator};
    pub use tessera_query::ast::{
        Aggregate, CompareOp, FieldPredicates, Predicate, Range, RelationshipPredicates,
        StringMatch, TextPredicates,
    };
    pub use tessera_query::{
        compile, Context, FetchRequest, Fetchable, QueryGenerator, Recordable, SortDescriptor,
    };
    pub use tessera_reactive::{
        BatchRecorder, ChangeOperation, ControllerConfig, IndexPath, ResultsConsumer,
        ResultsController, SectionedMirror,
    };
    pub use tessera_storage::{MemoryContext, MemoryStore};
}
