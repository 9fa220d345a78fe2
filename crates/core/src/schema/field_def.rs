//! Field definition for entity schemas.

use crate::types::DataType;
use crate::value::Value;
use alloc::string::String;

/// A field definition in an entity schema.
#[derive(Clone, Debug)]
pub struct FieldDef {
    /// Field name.
    name: String,
    /// Data type of the field.
    data_type: DataType,
    /// Whether this field allows null values.
    nullable: bool,
    /// Default value for newly constructed entities.
    default_value: Option<Value>,
    /// Entity name a relationship field points at.
    target: Option<String>,
    /// Field position in the schema (0-based).
    index: usize,
}

impl FieldDef {
    /// Creates a new field definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: data_type.is_nullable_by_default(),
            default_value: None,
            target: None,
            index: 0,
        }
    }

    /// Creates a relationship field pointing at `target`.
    pub fn relationship(name: impl Into<String>, data_type: DataType, target: impl Into<String>) -> Self {
        let mut field = Self::new(name, data_type);
        field.target = Some(target.into());
        field
    }

    /// Sets whether this field is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the default value for this field.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the target entity of a relationship field.
    #[inline]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the value a freshly constructed entity holds in this field.
    pub fn get_default_value(&self) -> Value {
        self.default_value.clone().unwrap_or_else(|| {
            if self.nullable {
                Value::Null
            } else {
                Value::default_for_type(self.data_type)
            }
        })
    }

    /// Returns the field index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true if `value` may be stored in this field.
    pub fn accepts(&self, value: &Value) -> bool {
        match value.data_type() {
            None => self.nullable,
            Some(dt) => dt == self.data_type,
        }
    }
}

impl PartialEq for FieldDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.data_type == other.data_type
    }
}
