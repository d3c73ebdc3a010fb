//! State schema declaration, initial-state creation, and merging.
//!
//! A [`StateSchema`] is built once via [`SchemaBuilder`], then frozen and
//! shared read-only across every run of a graph. It owns the only two
//! state-changing operations in the system:
//!
//! - [`StateSchema::initial_state`] creates a fresh [`State`] per run, and
//! - [`StateSchema::merge`] folds a node's [`PartialState`] into a state.
//!
//! Both are pure with respect to their inputs: `merge` consumes a state and
//! returns the merged one, with no other observable effect.

use core::fmt;

use hashbrown::HashMap;

use crate::error::SchemaError;
use crate::field::{FieldSpec, FieldType};
use crate::reducer::Reducer;
use crate::state::{PartialState, State};

/// Immutable set of field declarations with per-field merge policy.
///
/// # Merge policy
///
/// Each field either has exactly one declared reducer or uses overwrite
/// (last-writer-wins) semantics; there is no third behavior. Keys not
/// declared in the schema are rejected with
/// [`SchemaError::UndeclaredField`], never silently ignored.
///
/// # Example
///
/// ```
/// use weft_state::{FieldType, PartialState, StateSchema};
///
/// let schema = StateSchema::builder()
///     .field("input", FieldType::String)
///     .field("summary", FieldType::String)
///     .build()
///     .unwrap();
///
/// let state = schema.initial_state(PartialState::new()).unwrap();
/// assert_eq!(state.get("summary"), Some(&serde_json::json!("")));
/// ```
pub struct StateSchema {
    fields: HashMap<String, FieldSpec>,
}

impl StateSchema {
    /// Starts declaring a new schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Returns true if `field` is declared.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the declaration for `field`, if present.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&FieldSpec> {
        self.fields.get(field)
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Creates a fresh state with every declared field populated.
    ///
    /// Per field, the value is taken from `overrides` if present, else the
    /// declared default, else the field type's zero value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UndeclaredField`] if an override key is not
    /// declared, or [`SchemaError::TypeMismatch`] if an override value does
    /// not match the field's type.
    pub fn initial_state(&self, overrides: PartialState) -> Result<State, SchemaError> {
        for (field, value) in overrides.iter() {
            let spec = self
                .fields
                .get(field)
                .ok_or_else(|| SchemaError::UndeclaredField {
                    field: field.to_string(),
                })?;
            self.check_type(spec, value)?;
        }

        let mut values = HashMap::with_capacity(self.fields.len());
        for (name, spec) in &self.fields {
            let value = overrides
                .get(name)
                .or_else(|| spec.default())
                .cloned()
                .unwrap_or_else(|| spec.field_type().zero_value());
            values.insert(name.clone(), value);
        }
        Ok(State::from_map(values))
    }

    /// Folds a partial update into `state`, returning the merged state.
    ///
    /// Per key: if the field declares a reducer, the new value is
    /// `reduce(previous, incoming)`; otherwise the incoming value replaces
    /// the previous one. Applying partials with disjoint keys is
    /// order-independent, and merging an empty partial returns the state
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UndeclaredField`] for keys the schema does not
    /// declare (unknown keys are rejected, not ignored), or
    /// [`SchemaError::TypeMismatch`] if an incoming value does not match
    /// the field's type. On error the original state is discarded and no
    /// partially-merged state is observable.
    pub fn merge(&self, state: State, partial: &PartialState) -> Result<State, SchemaError> {
        // Validate the whole partial before touching the state so a rejected
        // update never applies half its keys.
        for (field, incoming) in partial.iter() {
            let spec = self
                .fields
                .get(field)
                .ok_or_else(|| SchemaError::UndeclaredField {
                    field: field.to_string(),
                })?;
            self.check_type(spec, incoming)?;
        }

        let mut state = state;
        for (field, incoming) in partial.iter() {
            // Declared above or the loop would have errored.
            let Some(spec) = self.fields.get(field) else {
                continue;
            };
            let value = match spec.reducer() {
                Some(reducer) => {
                    let previous = state
                        .get(field)
                        .cloned()
                        .unwrap_or_else(|| spec.field_type().zero_value());
                    reducer.reduce(previous, incoming.clone())
                }
                None => incoming.clone(),
            };
            state.insert(field.to_string(), value);
        }
        Ok(state)
    }

    fn check_type(&self, spec: &FieldSpec, value: &serde_json::Value) -> Result<(), SchemaError> {
        if spec.field_type().admits(value) {
            Ok(())
        } else {
            Err(SchemaError::TypeMismatch {
                field: spec.name().to_string(),
                expected: spec.field_type(),
                value: value.clone(),
            })
        }
    }
}

impl fmt::Debug for StateSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("StateSchema").field("fields", &names).finish()
    }
}

/// Builder for [`StateSchema`].
///
/// Declaration order is irrelevant; `build` rejects duplicate names.
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Declares a field with overwrite semantics and a type zero default.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldSpec::new(name, ty));
        self
    }

    /// Declares a field with overwrite semantics and an explicit default.
    #[must_use]
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: FieldType,
        default: impl Into<serde_json::Value>,
    ) -> Self {
        self.fields.push(FieldSpec::new(name, ty).with_default(default));
        self
    }

    /// Declares a field whose updates are folded by `reducer`.
    #[must_use]
    pub fn reduced_field(
        mut self,
        name: impl Into<String>,
        ty: FieldType,
        reducer: impl Reducer + 'static,
    ) -> Self {
        self.fields.push(FieldSpec::new(name, ty).with_reducer(reducer));
        self
    }

    /// Declares a field from a fully-specified [`FieldSpec`].
    #[must_use]
    pub fn spec(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Freezes the declarations into an immutable schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateField`] if two declarations share a
    /// name.
    pub fn build(self) -> Result<StateSchema, SchemaError> {
        let mut fields = HashMap::with_capacity(self.fields.len());
        for spec in self.fields {
            let name = spec.name().to_string();
            if fields.insert(name.clone(), spec).is_some() {
                return Err(SchemaError::DuplicateField { field: name });
            }
        }
        Ok(StateSchema { fields })
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("fields", &self.fields)
            .finish()
    }
}
