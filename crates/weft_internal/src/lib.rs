//! # Weft Internal Library
//!
//! Re-exports the core Weft crates for convenience.

/// Layer 1: state schema and merge primitives.
pub use weft_state;

/// Layer 2: graph construction and execution.
pub use weft_graph;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weft_graph::prelude::*;
    pub use weft_state::prelude::*;
}
