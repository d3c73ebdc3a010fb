//! Schema and merge errors.

use serde_json::Value;

use crate::field::FieldType;

/// Errors raised while building a schema, creating an initial state, or
/// merging a partial update.
///
/// All variants are construction- or merge-time failures; none of them leave
/// a partially-applied state behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A field name was referenced that the schema does not declare.
    #[error("field not declared in schema: {field}")]
    UndeclaredField {
        /// The undeclared field name.
        field: String,
    },

    /// The same field name was declared twice while building a schema.
    #[error("duplicate field declaration: {field}")]
    DuplicateField {
        /// The duplicated field name.
        field: String,
    },

    /// A value did not match the field's declared type.
    #[error("type mismatch for field '{field}': expected {expected}, got {value}")]
    TypeMismatch {
        /// The field being written.
        field: String,
        /// The field's declared type.
        expected: FieldType,
        /// The offending value.
        value: Value,
    },
}
