//! Record structure for Tessera.
//!
//! A `Record` is the stored form of an entity: the store-assigned id, a version
//! counter and the field values in schema order.

use crate::value::Value;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

/// Store-assigned identifier of an entity.
pub type EntityId = u64;

/// Global id counter. Ids start at 1 so 0 never names a live entity.
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Gets the next unique entity id.
pub fn next_entity_id() -> EntityId {
    NEXT_ENTITY_ID.fetch_add(1, Ordering::SeqCst)
}

/// Raises the id counter so it never hands out `id` or anything below it.
pub fn set_next_entity_id_if_greater(id: EntityId) {
    NEXT_ENTITY_ID.fetch_max(id, Ordering::SeqCst);
}

/// A stored entity.
#[derive(Clone, Debug)]
pub struct Record {
    id: EntityId,
    /// Incremented on every staged update; used to detect changed objects on commit.
    version: u64,
    values: Vec<Value>,
}

impl Record {
    /// Creates a new record with the given id and values.
    /// Version defaults to 1 for new records.
    pub fn new(id: EntityId, values: Vec<Value>) -> Self {
        Self {
            id,
            version: 1,
            values,
        }
    }

    /// Creates a record with the given id, version, and values.
    pub fn new_with_version(id: EntityId, version: u64, values: Vec<Value>) -> Self {
        Self { id, version, values }
    }

    /// Returns the entity id.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the version number.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Increments the version number and returns the new value.
    #[inline]
    pub fn increment_version(&mut self) -> u64 {
        self.version = self.version.wrapping_add(1);
        self.version
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value at the given field index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Sets a value at the given field index.
    pub fn set(&mut self, index: usize, value: Value) -> bool {
        if index < self.values.len() {
            self.values[index] = value;
            true
        } else {
            false
        }
    }

    /// Returns the number of values in this record.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this record has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if both records hold the same field values.
    pub fn same_values(&self, other: &Record) -> bool {
        self.values == other.values
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.values == other.values
    }
}
