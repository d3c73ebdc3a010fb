//! State schema and merge primitives for Weft (Layer 1).
//!
//! `weft_state` defines how workflow state is declared, created, and folded.
//! A [`StateSchema`] names every field a workflow may touch, along with each
//! field's semantic type, optional default, and optional [`Reducer`]. Nodes
//! never mutate state directly; they return a [`PartialState`] that the
//! schema merges into the current [`State`].
//!
//! # Core Concepts
//!
//! - [`StateSchema`] - Immutable field declarations with per-field merge policy
//! - [`State`] - The full record passed to nodes during a run
//! - [`PartialState`] - The subset of fields a node hands back
//! - [`Reducer`] - Combines a field's previous and incoming values
//!
//! # Example
//!
//! ```
//! use weft_state::{Append, FieldType, PartialState, StateSchema};
//!
//! let schema = StateSchema::builder()
//!     .field("input", FieldType::String)
//!     .reduced_field("messages", FieldType::List, Append)
//!     .build()
//!     .unwrap();
//!
//! let state = schema
//!     .initial_state(PartialState::new().with("input", "hello"))
//!     .unwrap();
//!
//! let state = schema
//!     .merge(state, &PartialState::new().with("messages", vec!["hi".to_string()]))
//!     .unwrap();
//! assert_eq!(state.get("input"), Some(&serde_json::json!("hello")));
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Weft architecture:
//!
//! - **Layer 1** (`weft_state`): state schema and merge primitives (this crate)
//! - **Layer 2** (`weft_graph`): graph construction and execution

/// Schema and merge errors.
pub mod error;

/// Field declarations and semantic field types.
pub mod field;

/// Per-field merge functions.
pub mod reducer;

/// State schema declaration, initial-state creation, and merging.
pub mod schema;

/// State and partial-state records.
pub mod state;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::error::SchemaError;
    pub use crate::field::{FieldSpec, FieldType};
    pub use crate::reducer::{Append, Reducer, SharedReducer};
    pub use crate::schema::{SchemaBuilder, StateSchema};
    pub use crate::state::{PartialState, State};
}

// Re-export key types at crate root for convenience
pub use error::SchemaError;
pub use field::{FieldSpec, FieldType};
pub use reducer::{Append, Reducer, SharedReducer};
pub use schema::{SchemaBuilder, StateSchema};
pub use state::{PartialState, State};
