//! The raw change protocol between a store and its live queries.
//!
//! During a commit the store drives each affected observer through one cycle:
//!
//! ```text
//! will_change_content
//!   did_change_section / did_change_object ...   (store order)
//! did_change_content(total)
//! ```
//!
//! Within a cycle the store reports a section insert before any object insert
//! into that section, and every object delete of a section before the section
//! delete.

use crate::change::IndexPath;
use alloc::format;
use alloc::rc::Weak;
use alloc::vec::Vec;
use core::cell::RefCell;
use tessera_core::{Error, FieldPath, Record, Result, Value};
use tessera_query::FetchRequest;

/// Identifier of a live query registered with a source.
pub type LiveQueryId = u64;

/// Kind of a raw change, as numerically coded by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RawKind {
    Insert = 1,
    Delete = 2,
    Move = 3,
    Update = 4,
}

impl RawKind {
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RawKind {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(RawKind::Insert),
            2 => Ok(RawKind::Delete),
            3 => Ok(RawKind::Move),
            4 => Ok(RawKind::Update),
            other => Err(Error::configuration(format!(
                "unrecognized raw change kind {}",
                other
            ))),
        }
    }
}

/// A per-object change.
#[derive(Clone, Debug, PartialEq)]
pub struct RawObjectChange {
    /// A [`RawKind`] code.
    pub kind: u8,
    pub old_position: Option<IndexPath>,
    pub new_position: Option<IndexPath>,
    /// The object after the change, or before it for deletes.
    pub record: Record,
}

impl RawObjectChange {
    pub fn insert(at: IndexPath, record: Record) -> Self {
        Self {
            kind: RawKind::Insert.code(),
            old_position: None,
            new_position: Some(at),
            record,
        }
    }

    pub fn delete(at: IndexPath, record: Record) -> Self {
        Self {
            kind: RawKind::Delete.code(),
            old_position: Some(at),
            new_position: None,
            record,
        }
    }

    pub fn moved(from: IndexPath, to: IndexPath, record: Record) -> Self {
        Self {
            kind: RawKind::Move.code(),
            old_position: Some(from),
            new_position: Some(to),
            record,
        }
    }

    pub fn update(from: IndexPath, to: IndexPath, record: Record) -> Self {
        Self {
            kind: RawKind::Update.code(),
            old_position: Some(from),
            new_position: Some(to),
            record,
        }
    }
}

/// A per-section change. Only inserts and deletes are valid.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSectionChange {
    /// A [`RawKind`] code.
    pub kind: u8,
    pub index: usize,
    /// Section key value; `None` for the implicit single section.
    pub key: Option<Value>,
}

impl RawSectionChange {
    pub fn insert(index: usize, key: Option<Value>) -> Self {
        Self {
            kind: RawKind::Insert.code(),
            index,
            key,
        }
    }

    pub fn delete(index: usize, key: Option<Value>) -> Self {
        Self {
            kind: RawKind::Delete.code(),
            index,
            key,
        }
    }
}

/// Receiver of raw change cycles.
pub trait RawObserver {
    fn will_change_content(&mut self);

    fn did_change_section(&mut self, change: RawSectionChange);

    fn did_change_object(&mut self, change: RawObjectChange);

    /// Ends the cycle. `total` is the new number of results.
    fn did_change_content(&mut self, total: usize);
}

/// What a live query selects and how it is sectioned.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchSpec {
    pub request: FetchRequest,
    /// Field whose value groups consecutive results into sections.
    pub section_key: Option<FieldPath>,
}

/// A run of results sharing one section key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Section {
    pub key: Option<Value>,
    pub records: Vec<Record>,
}

impl Section {
    pub fn new(key: Option<Value>, records: Vec<Record>) -> Self {
        Self { key, records }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Total number of records across `sections`.
pub fn total_len(sections: &[Section]) -> usize {
    sections.iter().map(Section::len).sum()
}

/// Initial state of a new live query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiveResults {
    pub id: LiveQueryId,
    pub sections: Vec<Section>,
}

/// A store that can run live queries.
pub trait LiveSource {
    /// Registers a live query and returns its current results.
    ///
    /// The source keeps only the weak reference; once the observer is dropped
    /// no further cycles are delivered.
    fn subscribe(
        &self,
        spec: FetchSpec,
        observer: Weak<RefCell<dyn RawObserver>>,
    ) -> Result<LiveResults>;

    /// Removes a live query. Returns false if `id` was not registered.
    fn unsubscribe(&self, id: LiveQueryId) -> bool;
}
