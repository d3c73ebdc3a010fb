//! Node trait and adapters.
//!
//! A node is the unit of computation in a graph: an async function from an
//! immutable state snapshot to a partial update. Nodes never mutate state
//! directly; the executor merges the returned [`PartialState`] through the
//! graph's schema after the node completes.

use core::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use weft_state::{PartialState, State};

/// Error returned by a failing node.
///
/// Node failures abort the run; the partial update (if any) from the failing
/// node is never merged.
#[derive(Debug, Clone)]
pub struct NodeError {
    message: String,
}

impl NodeError {
    /// Creates a node error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl core::error::Error for NodeError {}

/// An async unit of computation reading state and returning a partial update.
///
/// Implementations receive a read-only snapshot of the run's state and return
/// the fields they want changed. Returning an empty [`PartialState`] is valid
/// and leaves the state untouched.
///
/// Most callers will not implement this trait directly; see [`node_fn`] for
/// wrapping an async closure.
pub trait Node: Send + Sync {
    /// Runs the node against a state snapshot.
    fn run<'a>(&'a self, state: &'a State) -> BoxFuture<'a, Result<PartialState, NodeError>>;
}

/// Shared handle to a node stored in a compiled graph.
pub type SharedNode = Arc<dyn Node>;

impl fmt::Debug for dyn Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").finish()
    }
}

/// A [`Node`] wrapping an async closure.
///
/// Created by [`node_fn`]. The closure receives an owned clone of the state
/// snapshot so its future does not borrow from the executor.
pub struct FnNode<F> {
    f: F,
}

impl<F, Fut> Node for FnNode<F>
where
    F: Fn(State) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PartialState, NodeError>> + Send + 'static,
{
    fn run<'a>(&'a self, state: &'a State) -> BoxFuture<'a, Result<PartialState, NodeError>> {
        Box::pin((self.f)(state.clone()))
    }
}

impl<F> fmt::Debug for FnNode<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNode").finish()
    }
}

/// Wraps an async closure as a [`Node`].
///
/// # Example
///
/// ```
/// use weft_graph::node_fn;
/// use weft_state::PartialState;
///
/// let echo = node_fn(|state| async move {
///     let input = state
///         .get("input")
///         .and_then(|v| v.as_str())
///         .unwrap_or_default()
///         .to_string();
///     Ok(PartialState::new().with("summary", format!("echo: {input}")))
/// });
/// # let _ = echo;
/// ```
pub fn node_fn<F, Fut>(f: F) -> FnNode<F>
where
    F: Fn(State) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PartialState, NodeError>> + Send + 'static,
{
    FnNode { f }
}
