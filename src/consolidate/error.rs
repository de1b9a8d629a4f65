use std::fmt;

use crate::record::FieldKind;

/// Faults raised by partitioning and merging
///
/// These point at an upstream data problem or a call-site bug. They are never
/// recovered locally.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsolidationError {
    /// Two records slated to merge differ outside the aggregate field
    Consistency {
        resource_type: String,
        aggregate_field: String,
        differing_fields: Vec<String>,
    },

    /// Records of different resource types in one call
    SchemaMismatch {
        expected: String,
        found: String,
        position: usize,
    },

    /// The aggregate field is not part of the schema
    UnknownField {
        resource_type: String,
        field: String,
    },

    /// The aggregate field kind has no merge operator
    NotAggregatable {
        resource_type: String,
        field: String,
        kind: FieldKind,
    },

    /// A group handed to the merger had no members
    EmptyGroup { field: String },
}

impl fmt::Display for ConsolidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsolidationError::Consistency {
                resource_type,
                aggregate_field,
                differing_fields,
            } => {
                write!(
                    f,
                    "Inconsistent {} records merged on '{}': fields differ: {}",
                    resource_type,
                    aggregate_field,
                    differing_fields.join(", ")
                )
            }
            ConsolidationError::SchemaMismatch {
                expected,
                found,
                position,
            } => {
                write!(
                    f,
                    "Schema mismatch at record {}: expected '{}', found '{}'",
                    position, expected, found
                )
            }
            ConsolidationError::UnknownField {
                resource_type,
                field,
            } => {
                write!(
                    f,
                    "Resource type '{}' has no field '{}'",
                    resource_type, field
                )
            }
            ConsolidationError::NotAggregatable {
                resource_type,
                field,
                kind,
            } => {
                write!(
                    f,
                    "Field '{}.{}' of kind {} cannot be aggregated",
                    resource_type, field, kind
                )
            }
            ConsolidationError::EmptyGroup { field } => {
                write!(f, "Cannot fold an empty group on '{}'", field)
            }
        }
    }
}

impl std::error::Error for ConsolidationError {}

pub type ConsolidationResult<T> = Result<T, ConsolidationError>;
