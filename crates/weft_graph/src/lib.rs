//! Graph construction and execution for Weft (Layer 2).
//!
//! `weft_graph` turns a set of named async nodes into a validated workflow.
//! A [`GraphBuilder`] declares the nodes, their fixed edges and routers, and
//! the entry edge from [`START`]; [`GraphBuilder::compile`] checks the whole
//! declaration and freezes it into an immutable [`CompiledGraph`]. An
//! [`Executor`] walks the graph one node at a time, merging each node's
//! partial update through the schema from `weft_state`.
//!
//! # Core Concepts
//!
//! - [`Node`] - An async unit of computation returning a partial update
//! - [`Router`] - Picks the next target from the merged state
//! - [`GraphBuilder`] / [`CompiledGraph`] - Declaration and validated form
//! - [`Executor`] - Sequential walk from [`START`] until a route hits [`END`]
//!
//! # Example
//!
//! ```
//! use weft_graph::{END, Executor, GraphBuilder, START, node_fn};
//! use weft_state::{FieldType, PartialState, StateSchema};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let schema = StateSchema::builder()
//!     .field("input", FieldType::String)
//!     .field("summary", FieldType::String)
//!     .build()
//!     .unwrap();
//!
//! let mut builder = GraphBuilder::new(schema);
//! builder
//!     .add_node(
//!         "summarize",
//!         node_fn(|state| async move {
//!             let input = state
//!                 .get("input")
//!                 .and_then(|v| v.as_str())
//!                 .unwrap_or_default()
//!                 .to_string();
//!             Ok(PartialState::new().with("summary", format!("summary of {input}")))
//!         }),
//!     )
//!     .add_edge(START, "summarize")
//!     .add_edge("summarize", END);
//!
//! let graph = builder.compile().unwrap();
//! let state = Executor::new()
//!     .invoke(&graph, PartialState::new().with("input", "hello"))
//!     .await
//!     .unwrap();
//! assert_eq!(
//!     state.get("summary"),
//!     Some(&serde_json::json!("summary of hello"))
//! );
//! # });
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 2 of the Weft architecture:
//!
//! - **Layer 1** (`weft_state`): state schema and merge primitives
//! - **Layer 2** (`weft_graph`): graph construction and execution (this crate)

/// Routing targets and edges.
pub mod edge;

/// Graph execution engine.
pub mod executor;

/// Graph construction and compile-time validation.
pub mod graph;

/// Node trait and adapters.
pub mod node;

/// Conditional routing.
pub mod router;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::edge::{END, Route, START, Target};
    pub use crate::executor::{ExecutionError, Executor, RunId};
    pub use crate::graph::{CompileError, CompiledGraph, GraphBuilder};
    pub use crate::node::{FnNode, Node, NodeError, SharedNode, node_fn};
    pub use crate::router::{BoxedRouter, Router};
}

// Re-export key types at crate root for convenience
pub use edge::{END, Route, START, Target};
pub use executor::{ExecutionError, Executor, RunId};
pub use graph::{CompileError, CompiledGraph, GraphBuilder};
pub use node::{FnNode, Node, NodeError, SharedNode, node_fn};
pub use router::{BoxedRouter, Router};
