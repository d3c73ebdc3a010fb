//! A declarative state-merge graph executor for composing async workflows.
//!

pub use weft_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weft_internal::prelude::*;
}
