//! Typed field paths.
//!
//! Entities declare their fields as constants:
//!
//! ```rust
//! # use tessera_core::{Entity, EntityId, Field, Record, RefSet, Relationship, Result, DataType};
//! # use tessera_core::schema::{Schema, SchemaBuilder};
//! # #[derive(Clone)] struct Performer { id: EntityId }
//! # impl Entity for Performer {
//! #     const NAME: &'static str = "Performer";
//! #     fn schema() -> Schema { SchemaBuilder::new("Performer").unwrap().build() }
//! #     fn id(&self) -> EntityId { self.id }
//! #     fn from_record(r: &Record) -> Result<Self> { Ok(Self { id: r.id() }) }
//! #     fn to_record(&self) -> Record { Record::new(self.id, vec![]) }
//! # }
//! # #[derive(Clone)] struct Performance { id: EntityId }
//! # impl Entity for Performance {
//! #     const NAME: &'static str = "Performance";
//! #     fn schema() -> Schema { SchemaBuilder::new("Performance").unwrap().build() }
//! #     fn id(&self) -> EntityId { self.id }
//! #     fn from_record(r: &Record) -> Result<Self> { Ok(Self { id: r.id() }) }
//! #     fn to_record(&self) -> Record { Record::new(self.id, vec![]) }
//! # }
//! impl Performance {
//!     pub const GROUP: Field<Performance, String> = Field::new("group", 0);
//!     pub const PERFORMERS: Relationship<Performance, Performer> =
//!         Relationship::new("performers", 1);
//! }
//! assert_eq!(Performance::PERFORMERS.path().entity, "Performance");
//! assert_eq!(Performance::PERFORMERS.target(), "Performer");
//! ```
//!
//! A `Relationship<Performance, Performer>` only combines with predicates over
//! `Performer` sets, so a misnamed or mistyped relationship fails to compile
//! instead of producing a query that silently matches nothing.

use crate::error::{Error, Result};
use crate::record::{EntityId, Record};
use crate::schema::Entity;
use crate::types::DataType;
use crate::value::{RefSet, Timestamp, Value};
use alloc::string::String;
use core::fmt;
use core::marker::PhantomData;

/// Untyped location of a field: owning entity, name and position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub entity: &'static str,
    pub name: &'static str,
    pub index: usize,
}

impl FieldPath {
    /// Reads the value at this path, or None if the record is too short.
    #[inline]
    pub fn get<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        record.get(self.index)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Conversion from a stored value into a Rust field type.
pub trait FromValue: Sized {
    /// Type reported in mismatch errors.
    const EXPECTED: DataType;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    const EXPECTED: DataType = DataType::Boolean;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

/// Accepts both `Int64` and `DateTime`, which share the i64 representation.
impl FromValue for i64 {
    const EXPECTED: DataType = DataType::Int64;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().or_else(|| value.as_datetime())
    }
}

impl FromValue for Timestamp {
    const EXPECTED: DataType = DataType::DateTime;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_datetime().map(Timestamp)
    }
}

impl FromValue for f64 {
    const EXPECTED: DataType = DataType::Float64;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for String {
    const EXPECTED: DataType = DataType::String;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl FromValue for Option<EntityId> {
    const EXPECTED: DataType = DataType::Ref;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            Value::Ref(id) => Some(Some(*id)),
            _ => None,
        }
    }
}

impl FromValue for RefSet {
    const EXPECTED: DataType = DataType::RefSet;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_ref_set().cloned()
    }
}

/// Reads the value at `path` as `T`.
pub(crate) fn read_path<T: FromValue>(record: &Record, path: &FieldPath) -> Result<T> {
    let value = path.get(record).unwrap_or(&Value::Null);
    T::from_value(value).ok_or_else(|| Error::type_mismatch(path.name, T::EXPECTED, value.data_type()))
}

/// A scalar field of entity `E` holding values of type `T`.
pub struct Field<E, T> {
    path: FieldPath,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<E, T> Clone for Field<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Field<E, T> {}

impl<E, T> fmt::Debug for Field<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.path).finish()
    }
}

impl<E: Entity, T> Field<E, T> {
    /// Declares the field `name` at schema position `index`.
    pub const fn new(name: &'static str, index: usize) -> Self {
        Self {
            path: FieldPath {
                entity: E::NAME,
                name,
                index,
            },
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn path(&self) -> FieldPath {
        self.path
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.path.name
    }
}

impl<E: Entity, T: FromValue> Field<E, T> {
    /// Reads this field from a record of `E`.
    pub fn read(&self, record: &Record) -> Result<T> {
        read_path(record, &self.path)
    }
}

impl<E: Entity, T: Into<Value>> Field<E, T> {
    /// Writes this field into a record of `E`.
    pub fn write(&self, record: &mut Record, value: T) -> bool {
        record.set(self.path.index, value.into())
    }
}

/// A relationship from entity `E` to entity `T`, either to-one or to-many.
pub struct Relationship<E, T> {
    path: FieldPath,
    target: &'static str,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<E, T> Clone for Relationship<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Relationship<E, T> {}

impl<E, T> fmt::Debug for Relationship<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("path", &self.path)
            .field("target", &self.target)
            .finish()
    }
}

impl<E: Entity, T: Entity> Relationship<E, T> {
    /// Declares the relationship `name` at schema position `index`.
    pub const fn new(name: &'static str, index: usize) -> Self {
        Self {
            path: FieldPath {
                entity: E::NAME,
                name,
                index,
            },
            target: T::NAME,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn path(&self) -> FieldPath {
        self.path
    }

    /// Name of the related entity.
    #[inline]
    pub const fn target(&self) -> &'static str {
        self.target
    }

    /// Reads a to-one relationship.
    pub fn read_id(&self, record: &Record) -> Result<Option<EntityId>> {
        read_path(record, &self.path)
    }

    /// Reads a to-many relationship.
    pub fn read_ids(&self, record: &Record) -> Result<RefSet> {
        read_path(record, &self.path)
    }

    /// Writes a to-one relationship.
    pub fn write_id(&self, record: &mut Record, id: Option<EntityId>) -> bool {
        record.set(self.path.index, id.map_or(Value::Null, Value::Ref))
    }

    /// Writes a to-many relationship.
    pub fn write_ids(&self, record: &mut Record, ids: RefSet) -> bool {
        record.set(self.path.index, Value::RefSet(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, SchemaBuilder};
    use alloc::vec;

    #[derive(Clone)]
    struct Party {
        id: EntityId,
    }

    impl Entity for Party {
        const NAME: &'static str = "Party";

        fn schema() -> Schema {
            SchemaBuilder::new(Self::NAME).unwrap().build()
        }

        fn id(&self) -> EntityId {
            self.id
        }

        fn from_record(record: &Record) -> Result<Self> {
            Ok(Self { id: record.id() })
        }

        fn to_record(&self) -> Record {
            Record::new(self.id, vec![])
        }
    }

    #[derive(Clone)]
    struct Performer {
        id: EntityId,
    }

    impl Performer {
        const FIRST_NAME: Field<Performer, String> = Field::new("firstName", 0);
        const DOB: Field<Performer, Timestamp> = Field::new("dob", 1);
        const PARTY: Relationship<Performer, Party> = Relationship::new("party", 2);
        const TAGS: Relationship<Performer, Party> = Relationship::new("tags", 3);
    }

    impl Entity for Performer {
        const NAME: &'static str = "Performer";

        fn schema() -> Schema {
            SchemaBuilder::new(Self::NAME).unwrap().build()
        }

        fn id(&self) -> EntityId {
            self.id
        }

        fn from_record(record: &Record) -> Result<Self> {
            Ok(Self { id: record.id() })
        }

        fn to_record(&self) -> Record {
            Record::new(self.id, vec![])
        }
    }

    fn record() -> Record {
        Record::new(
            1,
            vec![
                Value::from("Angel"),
                Value::DateTime(86_400_000),
                Value::Ref(9),
                Value::RefSet([3, 4].into_iter().collect()),
            ],
        )
    }

    #[test]
    fn test_paths_carry_entity_names() {
        assert_eq!(Performer::FIRST_NAME.path().entity, "Performer");
        assert_eq!(Performer::PARTY.target(), "Party");
        assert_eq!(Performer::DOB.path().index, 1);
    }

    #[test]
    fn test_typed_reads() {
        let record = record();
        assert_eq!(Performer::FIRST_NAME.read(&record).unwrap(), "Angel");
        assert_eq!(Performer::DOB.read(&record).unwrap(), Timestamp(86_400_000));
        assert_eq!(Performer::PARTY.read_id(&record).unwrap(), Some(9));
        assert_eq!(Performer::TAGS.read_ids(&record).unwrap().len(), 2);
    }

    #[test]
    fn test_typed_read_mismatch() {
        let record = record();
        let wrong: Field<Performer, bool> = Field::new("firstName", 0);
        assert!(matches!(
            wrong.read(&record),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_typed_writes() {
        let mut record = record();
        assert!(Performer::FIRST_NAME.write(&mut record, String::from("Ashton")));
        assert!(Performer::PARTY.write_id(&mut record, None));
        assert_eq!(record.get(0), Some(&Value::from("Ashton")));
        assert_eq!(record.get(2), Some(&Value::Null));
        assert_eq!(Performer::PARTY.read_id(&record).unwrap(), None);
    }
}
