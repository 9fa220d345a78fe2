//! Entity schema definition.

use super::field_def::FieldDef;
use crate::error::{Error, Result};
use crate::field::FieldPath;
use crate::record::{EntityId, Record};
use crate::types::DataType;
use crate::value::Value;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// A typed entity persisted by the store.
///
/// Implementors are plain value structs; the store only ever sees their
/// `Record` form. `from_record` and `to_record` must agree with `schema()`.
pub trait Entity: Clone + Sized {
    /// Entity name as registered with the store.
    const NAME: &'static str;

    /// Field layout of this entity's records.
    fn schema() -> Schema;

    /// Store-assigned id.
    fn id(&self) -> EntityId;

    /// Maps a stored record into the typed entity.
    fn from_record(record: &Record) -> Result<Self>;

    /// Maps the typed entity back into its stored form.
    fn to_record(&self) -> Record;
}

/// An entity schema: a name plus ordered field definitions.
#[derive(Clone, Debug)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Returns the entity name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in positional order.
    #[inline]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Gets a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Gets a field index by name.
    pub fn get_field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Checks that `path` names a field of this entity at the position it
    /// claims.
    pub fn check_path(&self, path: &FieldPath) -> Result<()> {
        if path.entity != self.name {
            return Err(Error::invalid_schema(format!(
                "field path {}.{} used on {}",
                path.entity, path.name, self.name
            )));
        }
        match self.fields.get(path.index) {
            Some(field) if field.name() == path.name => Ok(()),
            Some(field) => Err(Error::invalid_schema(format!(
                "{}.{} points at index {}, which holds {}",
                self.name,
                path.name,
                path.index,
                field.name()
            ))),
            None => Err(Error::invalid_schema(format!(
                "{} has no field at index {} for {}",
                self.name, path.index, path.name
            ))),
        }
    }

    /// Builds a record holding every field's default value.
    pub fn new_record(&self, id: EntityId) -> Record {
        Record::new(id, self.fields.iter().map(FieldDef::get_default_value).collect())
    }

    /// Checks that `record` has this schema's shape and value types.
    pub fn check_record(&self, record: &Record) -> Result<()> {
        if record.len() != self.fields.len() {
            return Err(Error::invalid_schema(format!(
                "{} expects {} fields, record {} has {}",
                self.name,
                self.fields.len(),
                record.id(),
                record.len()
            )));
        }
        for (field, value) in self.fields.iter().zip(record.values()) {
            if !field.accepts(value) {
                return Err(Error::type_mismatch(
                    field.name(),
                    field.data_type(),
                    value.data_type(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for creating entity schemas.
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::check_naming_rules(&name)?;
        Ok(Self {
            name,
            fields: Vec::new(),
        })
    }

    /// Validates a name follows naming rules.
    fn check_naming_rules(name: &str) -> Result<()> {
        let Some(first) = name.chars().next() else {
            return Err(Error::invalid_schema("Name cannot be empty"));
        };
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(Error::invalid_schema(format!(
                "Name must start with letter or underscore: {}",
                name
            )));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::invalid_schema(format!(
                "Name contains invalid characters: {}",
                name
            )));
        }
        Ok(())
    }

    fn push(mut self, field: FieldDef) -> Result<Self> {
        Self::check_naming_rules(field.name())?;
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(Error::invalid_schema(format!(
                "Field already exists: {}",
                field.name()
            )));
        }
        self.fields.push(field);
        Ok(self)
    }

    /// Adds a scalar field.
    pub fn add_field(self, name: impl Into<String>, data_type: DataType) -> Result<Self> {
        if data_type.is_relationship() {
            return Err(Error::invalid_schema(
                "Relationship fields need a target; use add_relationship",
            ));
        }
        self.push(FieldDef::new(name, data_type))
    }

    /// Adds a relationship field pointing at `target`.
    pub fn add_relationship(
        self,
        name: impl Into<String>,
        data_type: DataType,
        target: impl Into<String>,
    ) -> Result<Self> {
        if !data_type.is_relationship() {
            return Err(Error::invalid_schema(format!(
                "{:?} is not a relationship type",
                data_type
            )));
        }
        self.push(FieldDef::relationship(name, data_type, target))
    }

    /// Sets the default value of an existing field.
    pub fn set_default(mut self, name: &str, value: Value) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name() == name) {
            *field = field.clone().default_value(value);
        }
        self
    }

    /// Marks existing fields as nullable.
    pub fn add_nullable(mut self, names: &[&str]) -> Self {
        for name in names {
            if let Some(field) = self.fields.iter_mut().find(|f| f.name() == *name) {
                *field = field.clone().nullable(true);
            }
        }
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Schema {
        let fields = self
            .fields
            .into_iter()
            .enumerate()
            .map(|(i, f)| f.with_index(i))
            .collect();
        Schema {
            name: self.name,
            fields,
        }
    }
}
