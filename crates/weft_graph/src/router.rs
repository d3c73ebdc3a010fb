//! Conditional routing.
//!
//! A router inspects the state after a node runs and picks the next
//! [`Target`]. Routers are opaque to compile-time validation: any node in
//! the graph (or [`Target::End`]) is a legal destination, and a destination
//! naming an unknown node surfaces as a runtime routing error.

use core::fmt;

use weft_state::State;

use crate::edge::Target;

/// Picks the next target from the current state.
///
/// Routers must be pure reads of the state; they cannot modify it.
///
/// # Example
///
/// ```
/// use weft_graph::{Router, Target};
/// use weft_state::State;
///
/// let on_error = |state: &State| {
///     match state.get("error").and_then(|v| v.as_bool()) {
///         Some(true) => Target::node("recover"),
///         _ => Target::End,
///     }
/// };
/// # let _: &dyn Router = &on_error;
/// ```
pub trait Router: Send + Sync {
    /// Returns the target to continue at.
    fn route(&self, state: &State) -> Target;
}

impl<F> Router for F
where
    F: Fn(&State) -> Target + Send + Sync,
{
    fn route(&self, state: &State) -> Target {
        self(state)
    }
}

impl fmt::Debug for dyn Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").finish()
    }
}

/// Owned router stored in a compiled graph.
pub type BoxedRouter = Box<dyn Router>;

#[cfg(test)]
mod tests {
    use super::*;
    use weft_state::{FieldType, PartialState, StateSchema};

    #[test]
    fn closure_routes_on_state() {
        let schema = StateSchema::builder()
            .field("done", FieldType::Bool)
            .build()
            .unwrap();

        let router = |state: &State| {
            if state.get("done").and_then(|v| v.as_bool()) == Some(true) {
                Target::End
            } else {
                Target::node("work")
            }
        };

        let pending = schema.initial_state(PartialState::new()).unwrap();
        assert_eq!(router.route(&pending), Target::node("work"));

        let done = schema
            .initial_state(PartialState::new().with("done", true))
            .unwrap();
        assert_eq!(router.route(&done), Target::End);
    }
}
