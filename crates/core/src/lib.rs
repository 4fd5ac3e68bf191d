//! Shared domain error taxonomy and primitive types used across the
//! Taskora workspace crates.

pub mod error;
pub mod types;

pub use error::CoreError;
