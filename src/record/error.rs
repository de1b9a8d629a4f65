use std::fmt;

use super::schema::FieldKind;

/// Errors raised while building a record from exported data
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The attribute is not part of the resource schema
    UnknownAttribute {
        resource_type: String,
        attribute: String,
    },

    /// A required attribute was absent or null
    MissingRequired {
        resource_type: String,
        attribute: String,
    },

    /// The value does not have the shape the attribute kind expects
    KindMismatch {
        resource_type: String,
        attribute: String,
        expected: FieldKind,
        found: String,
    },

    /// Exported row was not a JSON object
    NotAnObject { resource_type: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::UnknownAttribute {
                resource_type,
                attribute,
            } => {
                write!(
                    f,
                    "Unknown attribute '{}' for resource type '{}'",
                    attribute, resource_type
                )
            }
            RecordError::MissingRequired {
                resource_type,
                attribute,
            } => {
                write!(
                    f,
                    "Missing required attribute '{}' for resource type '{}'",
                    attribute, resource_type
                )
            }
            RecordError::KindMismatch {
                resource_type,
                attribute,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Attribute '{}.{}' expects {} but got {}",
                    resource_type, attribute, expected, found
                )
            }
            RecordError::NotAnObject { resource_type } => {
                write!(f, "Row for resource type '{}' is not an object", resource_type)
            }
        }
    }
}

impl std::error::Error for RecordError {}

pub type RecordResult<T> = Result<T, RecordError>;
