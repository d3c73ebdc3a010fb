//! Routing targets and edges.
//!
//! Every node (and the start sentinel) has exactly one outgoing [`Route`]:
//! either a fixed edge to a [`Target`], or a router evaluated against the
//! state after each step. The [`START`] and [`END`] sentinels frame a run;
//! neither is a node and neither ever executes.

use core::fmt;

use crate::router::BoxedRouter;

/// Name of the start sentinel.
///
/// An edge from `START` selects the entry node of the graph. `START` cannot
/// be used as a node name or an edge target.
pub const START: &str = "__start__";

/// Name of the end sentinel.
///
/// Routing to `END` finishes the run. `END` cannot be used as a node name or
/// an edge source.
pub const END: &str = "__end__";

/// Destination of a routing step: a named node, or the end of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Continue at the named node.
    Node(String),
    /// Finish the run and return the final state.
    End,
}

impl Target {
    /// Creates a target for the named node.
    #[must_use]
    pub fn node(name: impl Into<String>) -> Self {
        Target::Node(name.into())
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        if name == END {
            Target::End
        } else {
            Target::Node(name.to_string())
        }
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        if name == END {
            Target::End
        } else {
            Target::Node(name)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Node(name) => write!(f, "{name}"),
            Target::End => write!(f, "{END}"),
        }
    }
}

/// The single outgoing route of a node.
pub enum Route {
    /// Unconditional edge to a fixed target.
    To(Target),
    /// Router evaluated against the state after the node runs.
    Router(BoxedRouter),
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::To(target) => f.debug_tuple("To").field(target).finish(),
            Route::Router(_) => f.debug_struct("Router").finish(),
        }
    }
}
