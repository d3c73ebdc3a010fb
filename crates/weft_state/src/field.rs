//! Field declarations and semantic field types.
//!
//! Every field a workflow may read or write is declared up front as a
//! [`FieldSpec`]: a name, a [`FieldType`], an optional default value, and an
//! optional reducer. Undeclared fields are rejected at merge time.

use core::fmt;

use serde_json::Value;

use crate::reducer::{Reducer, SharedReducer};

/// Semantic type of a declared field.
///
/// Field types are checked at runtime against the JSON values nodes return.
/// [`FieldType::Any`] opts a field out of type checking entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A boolean flag. Zero value: `false`.
    Bool,
    /// A JSON number (integer or float). Zero value: `0`.
    Number,
    /// A string. Zero value: `""`.
    String,
    /// A JSON array. Zero value: `[]`.
    List,
    /// A JSON object. Zero value: `{}`.
    Object,
    /// Any JSON value, including `null`. Zero value: `null`.
    Any,
}

impl FieldType {
    /// Returns the zero value used when a field has no default and no override.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            FieldType::Bool => Value::Bool(false),
            FieldType::Number => Value::from(0),
            FieldType::String => Value::String(String::new()),
            FieldType::List => Value::Array(Vec::new()),
            FieldType::Object => Value::Object(serde_json::Map::new()),
            FieldType::Any => Value::Null,
        }
    }

    /// Returns true if `value` is admissible for this field type.
    #[must_use]
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            FieldType::Bool => value.is_boolean(),
            FieldType::Number => value.is_number(),
            FieldType::String => value.is_string(),
            FieldType::List => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Any => true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Bool => "bool",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::List => "list",
            FieldType::Object => "object",
            FieldType::Any => "any",
        };
        write!(f, "{name}")
    }
}

/// Declaration of a single state field.
///
/// A spec pairs a field name with its semantic type and merge policy. Fields
/// without a reducer use overwrite semantics: an incoming value strictly
/// replaces the previous one.
pub struct FieldSpec {
    name: String,
    ty: FieldType,
    default: Option<Value>,
    reducer: Option<SharedReducer>,
}

impl FieldSpec {
    /// Creates a field declaration with overwrite semantics and no default.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            reducer: None,
        }
    }

    /// Sets the default value used by
    /// [`StateSchema::initial_state`](crate::schema::StateSchema::initial_state)
    /// when the caller supplies no override.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the reducer combining previous and incoming values for this field.
    #[must_use]
    pub fn with_reducer(mut self, reducer: impl Reducer + 'static) -> Self {
        self.reducer = Some(std::sync::Arc::new(reducer));
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field's semantic type.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    /// Returns the declared default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the field's reducer, if one is declared.
    #[must_use]
    pub fn reducer(&self) -> Option<&SharedReducer> {
        self.reducer.as_ref()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("type", &self.ty)
            .field("default", &self.default)
            .field("has_reducer", &self.reducer.is_some())
            .finish()
    }
}
