/// Diagnostics with source context.
pub mod error;

/// Indented dumps of the syntax tree, typed or not.
pub mod tree;
