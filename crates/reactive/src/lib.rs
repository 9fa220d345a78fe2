//! Tessera Reactive - Live result sets and change batches for Tessera.
//!
//! This crate turns a store's raw per-object change notifications into
//! ordered batches of structural operations a consumer can apply
//! incrementally.
//!
//! # Core Concepts
//!
//! - `LiveSource` / `RawObserver`: The raw protocol a store drives per commit
//! - `ResultsController`: Owns one live query and batches each raw cycle
//! - `ChangeOperation` / `ChangeBatch`: Row and section inserts, deletes and updates
//! - `ResultsConsumer`: Receives full reloads and change batches
//! - `SubscriptionManager`: Content-count callbacks
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::{Rc, Weak};
//! use tessera_core::{Record, Value};
//! use tessera_reactive::{ControllerConfig, ResultsConsumer, ResultsController, SectionedMirror};
//! # use tessera_core::Result;
//! # use tessera_reactive::{FetchSpec, IndexPath, LiveQueryId, LiveResults, LiveSource};
//! # use tessera_reactive::{RawObjectChange, RawObserver, Section};
//! # #[derive(Clone, Default)]
//! # struct Listing {
//! #     observer: Rc<RefCell<Option<Weak<RefCell<dyn RawObserver>>>>>,
//! # }
//! # impl LiveSource for Listing {
//! #     fn subscribe(&self, _spec: FetchSpec, observer: Weak<RefCell<dyn RawObserver>>) -> Result<LiveResults> {
//! #         *self.observer.borrow_mut() = Some(observer);
//! #         let records = vec![Record::new(1, vec![Value::from("Gala")])];
//! #         Ok(LiveResults { id: 1, sections: vec![Section::new(None, records)] })
//! #     }
//! #     fn unsubscribe(&self, _id: LiveQueryId) -> bool { true }
//! # }
//! # impl Listing {
//! #     fn append(&self, record: Record) {
//! #         let observer = self.observer.borrow().as_ref().and_then(Weak::upgrade).unwrap();
//! #         let mut observer = observer.borrow_mut();
//! #         observer.will_change_content();
//! #         observer.did_change_object(RawObjectChange::insert(IndexPath::new(0, 1), record));
//! #         observer.did_change_content(2);
//! #     }
//! # }
//! # fn main() -> Result<()> {
//! // `Listing` is a `LiveSource` holding one event.
//! let source = Listing::default();
//! let controller = ResultsController::new(source.clone(), ControllerConfig::new("Event"));
//! let mirror = Rc::new(RefCell::new(SectionedMirror::new()));
//! let consumer: Weak<RefCell<dyn ResultsConsumer>> = Rc::downgrade(&mirror) as _;
//! controller.borrow_mut().set_consumer(consumer);
//! controller.borrow_mut().reload()?;
//!
//! // One raw insert from the source reaches the mirror as a change batch.
//! source.append(Record::new(2, vec![Value::from("Matinee")]));
//! assert_eq!(controller.borrow().len(), 2);
//! assert!(mirror.borrow().is_consistent());
//! assert_eq!(mirror.borrow().rows()[0], vec![Some(1), Some(2)]);
//! # Ok(())
//! # }
//! ```

#![no_std]

extern crate alloc;

pub mod change;
pub mod config;
pub mod consumer;
pub mod controller;
pub mod source;
pub mod subscription;

pub use change::{apply_operations, apply_section_operations, ChangeBatch, ChangeOperation, IndexPath};
pub use config::ControllerConfig;
pub use consumer::{BatchRecorder, ResultsConsumer, SectionedMirror};
pub use controller::{ControllerState, ResultsController};
pub use source::{
    total_len, FetchSpec, LiveQueryId, LiveResults, LiveSource, RawKind, RawObjectChange,
    RawObserver, RawSectionChange, Section,
};
pub use subscription::{CountCallback, SubscriptionId, SubscriptionManager};
