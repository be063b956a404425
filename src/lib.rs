//! declgraph - a declaration graph builder for C/C++ node streams
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use declgraph_builder as builder;
pub use declgraph_frontend as frontend;
pub use declgraph_model as model;
