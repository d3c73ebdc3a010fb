//! Graph execution engine.
//!
//! The [`Executor`] walks a [`CompiledGraph`] one node at a time: create the
//! initial state from the schema, run the entry node, merge its partial
//! update, resolve the node's route against the merged state, and repeat
//! until a route resolves to the end sentinel.
//!
//! # Example
//!
//! ```ignore
//! let graph = builder.compile()?;
//! let executor = Executor::new();
//! let final_state = executor
//!     .invoke(&graph, PartialState::new().with("input", "hello"))
//!     .await?;
//! ```

use core::fmt;

use weft_state::{PartialState, SchemaError, State};

use crate::edge::{Route, START, Target};
use crate::graph::CompiledGraph;
use crate::node::NodeError;

// ─────────────────────────────────────────────────────────────────────────────
// Run identity
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for one invocation of a graph.
///
/// Run IDs appear in log output so concurrent runs of the same shared graph
/// can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId(String);

impl RunId {
    /// Generates a fresh run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(nanoid::nanoid!(12))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run_{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while executing a graph.
#[derive(Debug)]
pub enum ExecutionError {
    /// Creating or merging state failed.
    Schema(SchemaError),
    /// A route pointed at a node missing from the graph.
    NodeNotFound {
        /// The missing node name.
        node: String,
    },
    /// A node had no outgoing route.
    NoRoute {
        /// The node with no route.
        node: String,
    },
    /// A router returned a node name the graph does not contain.
    Routing {
        /// The node whose router misrouted.
        from: String,
        /// The unknown destination.
        target: String,
    },
    /// A node returned an error; the run was aborted.
    NodeFailed {
        /// The failing node name.
        node: String,
        /// The node's error.
        source: NodeError,
    },
    /// The configured step limit was reached before the run finished.
    StepLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Schema(err) => write!(f, "state error: {err}"),
            ExecutionError::NodeNotFound { node } => write!(f, "node not found: {node}"),
            ExecutionError::NoRoute { node } => {
                write!(f, "no outgoing route from node: {node}")
            }
            ExecutionError::Routing { from, target } => {
                write!(f, "router at {from} returned unknown node: {target}")
            }
            ExecutionError::NodeFailed { node, source } => {
                write!(f, "node '{node}' failed: {source}")
            }
            ExecutionError::StepLimitExceeded { limit } => {
                write!(f, "step limit ({limit}) exceeded")
            }
        }
    }
}

impl core::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ExecutionError::Schema(err) => Some(err),
            ExecutionError::NodeFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SchemaError> for ExecutionError {
    fn from(err: SchemaError) -> Self {
        ExecutionError::Schema(err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Executor
// ─────────────────────────────────────────────────────────────────────────────

/// Sequential graph execution engine.
///
/// The executor runs exactly one node at a time. It holds no per-run state,
/// so one executor can drive any number of concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    /// Maximum nodes executed per run; `None` means unbounded.
    step_limit: Option<usize>,
}

impl Executor {
    /// Creates an executor with no step limit.
    ///
    /// Cyclic graphs without a state-based exit condition will run forever
    /// under an unbounded executor; see
    /// [`with_step_limit`](Self::with_step_limit).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of node executions per run.
    ///
    /// Reaching the limit aborts the run with
    /// [`ExecutionError::StepLimitExceeded`].
    #[must_use]
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Runs a graph to completion and returns the final state.
    ///
    /// A fresh state is created from the graph's schema with the given
    /// overrides, then nodes execute one at a time from the entry edge until
    /// a route resolves to the end sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the overrides or a node's partial update violate the schema
    /// - a node fails
    /// - a router returns an unknown node name
    /// - the step limit is reached
    pub async fn invoke(
        &self,
        graph: &CompiledGraph,
        overrides: PartialState,
    ) -> Result<State, ExecutionError> {
        let run = RunId::new();
        let started = std::time::Instant::now();

        let mut state = graph.schema().initial_state(overrides)?;
        let mut steps: usize = 0;
        let mut target = Self::next_target(graph, START, &state)?;

        loop {
            let name = match target {
                Target::End => break,
                Target::Node(name) => name,
            };

            if let Some(limit) = self.step_limit
                && steps >= limit
            {
                tracing::warn!(%run, limit, "aborting run at step limit");
                return Err(ExecutionError::StepLimitExceeded { limit });
            }

            let node = graph
                .node(&name)
                .ok_or_else(|| ExecutionError::NodeNotFound { node: name.clone() })?;

            tracing::debug!(%run, node = %name, step = steps, "executing node");

            let partial = node
                .run(&state)
                .await
                .map_err(|source| ExecutionError::NodeFailed {
                    node: name.clone(),
                    source,
                })?;
            state = graph.schema().merge(state, &partial)?;
            steps += 1;

            target = Self::next_target(graph, &name, &state)?;
        }

        tracing::info!(%run, steps, elapsed = ?started.elapsed(), "run complete");
        Ok(state)
    }

    /// Resolves the outgoing route of `from` against the current state.
    fn next_target(
        graph: &CompiledGraph,
        from: &str,
        state: &State,
    ) -> Result<Target, ExecutionError> {
        let route = graph.route(from).ok_or_else(|| ExecutionError::NoRoute {
            node: from.to_string(),
        })?;

        match route {
            Route::To(target) => Ok(target.clone()),
            Route::Router(router) => {
                let target = router.route(state);
                if let Target::Node(name) = &target
                    && !graph.contains(name)
                {
                    return Err(ExecutionError::Routing {
                        from: from.to_string(),
                        target: name.clone(),
                    });
                }
                Ok(target)
            }
        }
    }
}
