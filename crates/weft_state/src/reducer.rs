//! Per-field merge functions.
//!
//! A reducer decides how an incoming value from a node's partial update
//! combines with the field's previous value. Fields without a reducer use
//! overwrite semantics; the reducer is the only alternative merge policy.
//!
//! Reducers must be pure with respect to state: the returned value is the
//! field's entire new value, and no other field may be touched.
//!
//! # Example
//!
//! ```
//! use weft_state::Reducer;
//! use serde_json::{Value, json};
//!
//! // Closures are reducers.
//! let sum = |prev: Value, incoming: Value| {
//!     json!(prev.as_i64().unwrap_or(0) + incoming.as_i64().unwrap_or(0))
//! };
//! assert_eq!(sum.reduce(json!(2), json!(3)), json!(5));
//! ```

use core::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Combines a field's previous and incoming values into its new value.
pub trait Reducer: Send + Sync {
    /// Folds `incoming` into `previous`, returning the field's new value.
    fn reduce(&self, previous: Value, incoming: Value) -> Value;
}

impl<F> Reducer for F
where
    F: Fn(Value, Value) -> Value + Send + Sync,
{
    fn reduce(&self, previous: Value, incoming: Value) -> Value {
        self(previous, incoming)
    }
}

impl fmt::Debug for dyn Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer").finish()
    }
}

/// Shared handle to a reducer stored in a schema.
///
/// Reducers are held behind `Arc` so a schema can be shared read-only across
/// concurrent runs without cloning the functions themselves.
pub type SharedReducer = Arc<dyn Reducer>;

/// Built-in reducer that appends incoming values onto a list field.
///
/// An incoming array extends the list element by element; any other incoming
/// value is pushed as a single element. A non-array previous value is
/// promoted to a single-element list first, so `Append` behaves sensibly
/// even if the field was overwritten earlier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Append;

impl Reducer for Append {
    fn reduce(&self, previous: Value, incoming: Value) -> Value {
        let mut items = match previous {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        match incoming {
            Value::Array(values) => items.extend(values),
            other => items.push(other),
        }
        Value::Array(items)
    }
}
