//! State and partial-state records.
//!
//! A [`State`] is the full record passed to nodes during a run: every field
//! the schema declares is present, populated from overrides, defaults, or
//! type zero values. A [`PartialState`] is the subset of fields a node hands
//! back to be merged.
//!
//! States are created fresh per run by
//! [`StateSchema::initial_state`](crate::schema::StateSchema::initial_state)
//! and discarded (or persisted externally by the caller) when the run ends.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The shared state record for one workflow run.
///
/// All declared fields are present at all times. Nodes receive an immutable
/// snapshot and must not assume updates they return are visible until the
/// executor merges them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: HashMap<String, Value>,
}

impl State {
    pub(crate) fn from_map(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Returns the current value of `field`, if declared.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns the number of fields in the state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the state holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all fields and their current values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, field: String, value: Value) {
        self.values.insert(field, value);
    }
}

/// A subset of state fields returned by a node to be merged.
///
/// Partials only carry the keys a node owns for the step it just ran; every
/// key must be declared in the schema or the merge fails.
///
/// # Example
///
/// ```
/// use weft_state::PartialState;
///
/// let partial = PartialState::new()
///     .with("summary", "echo: hello")
///     .with("attempts", 1);
/// assert_eq!(partial.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialState {
    entries: HashMap<String, Value>,
}

impl PartialState {
    /// Creates an empty partial update.
    ///
    /// Merging an empty partial is a no-op.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the partial, replacing any earlier entry for the key.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(field.into(), value.into());
        self
    }

    /// Sets a field on the partial in place.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(field.into(), value.into());
    }

    /// Returns the value staged for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.get(field)
    }

    /// Returns the number of staged fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the partial stages no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all staged fields and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
