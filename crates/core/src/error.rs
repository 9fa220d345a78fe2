//! Error types for Tessera.

use crate::record::EntityId;
use crate::types::DataType;
use alloc::string::String;
use core::fmt;

/// Result type alias for Tessera operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for Tessera operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A fetch, construct or commit failed inside the store.
    Store {
        operation: &'static str,
        message: String,
    },
    /// An entity id does not exist in the store.
    EntityNotFound {
        entity: String,
        id: EntityId,
    },
    /// An entity type was never registered with the store.
    UnknownEntity {
        name: String,
    },
    /// Invalid schema definition.
    InvalidSchema {
        message: String,
    },
    /// A stored value does not have the type the entity mapping expects.
    TypeMismatch {
        field: String,
        expected: DataType,
        got: Option<DataType>,
    },
    /// The store violated the change-notification contract.
    Configuration {
        message: String,
    },
    /// External source content could not be decoded.
    Decode {
        message: String,
    },
    /// External source could not be read.
    Io {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store { operation, message } => {
                write!(f, "Store {} failed: {}", operation, message)
            }
            Error::EntityNotFound { entity, id } => {
                write!(f, "Entity {} not found: {}", entity, id)
            }
            Error::UnknownEntity { name } => {
                write!(f, "Unknown entity: {}", name)
            }
            Error::InvalidSchema { message } => {
                write!(f, "Invalid schema: {}", message)
            }
            Error::TypeMismatch { field, expected, got } => {
                write!(
                    f,
                    "Type mismatch on field {}: expected {:?}, got {:?}",
                    field, expected, got
                )
            }
            Error::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Error::Decode { message } => {
                write!(f, "Decode error: {}", message)
            }
            Error::Io { message } => {
                write!(f, "I/O error: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates a store error for the named operation.
    pub fn store(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Store {
            operation,
            message: message.into(),
        }
    }

    /// Creates an entity not found error.
    pub fn entity_not_found(entity: impl Into<String>, id: EntityId) -> Self {
        Error::EntityNotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Creates an unknown entity error.
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Error::UnknownEntity { name: name.into() }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: DataType, got: Option<DataType>) -> Self {
        Error::TypeMismatch {
            field: field.into(),
            expected,
            got,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io {
            message: message.into(),
        }
    }

    /// Returns true for failures reported by the underlying store.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Error::Store { .. } | Error::EntityNotFound { .. } | Error::UnknownEntity { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::store("fetch", "disk unplugged");
        assert_eq!(err.to_string(), "Store fetch failed: disk unplugged");

        let err = Error::unknown_entity("Event");
        assert!(err.to_string().contains("Event"));

        let err = Error::type_mismatch("dob", DataType::DateTime, Some(DataType::String));
        assert!(err.to_string().contains("dob"));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::entity_not_found("Event", 3).is_store_error());
        assert!(Error::store("commit", "conflict").is_store_error());
        assert!(!Error::decode("bad json").is_store_error());
        assert!(!Error::configuration("raw kind 9").is_store_error());
    }
}
