//! Data type definitions for Tessera.
//!
//! This module defines the types an entity field can hold.

/// Supported field types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type (true/false)
    Boolean,
    /// 64-bit signed integer
    Int64,
    /// 64-bit floating point number
    Float64,
    /// UTF-8 string
    String,
    /// Date and time stored as Unix timestamp (milliseconds)
    DateTime,
    /// To-one relationship holding the related entity id
    Ref,
    /// To-many relationship holding a set of related entity ids
    RefSet,
}

impl DataType {
    /// Returns whether this type is nullable by default.
    pub fn is_nullable_by_default(&self) -> bool {
        matches!(self, DataType::Ref)
    }

    /// Returns whether this type describes a relationship.
    pub fn is_relationship(&self) -> bool {
        matches!(self, DataType::Ref | DataType::RefSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_by_default() {
        assert!(!DataType::Boolean.is_nullable_by_default());
        assert!(!DataType::String.is_nullable_by_default());
        assert!(DataType::Ref.is_nullable_by_default());
        assert!(!DataType::RefSet.is_nullable_by_default());
    }

    #[test]
    fn test_relationship() {
        assert!(DataType::Ref.is_relationship());
        assert!(DataType::RefSet.is_relationship());
        assert!(!DataType::DateTime.is_relationship());
    }
}
