//! AST node types for shell programs.

pub mod types;

pub use types::*;
