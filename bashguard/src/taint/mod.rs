//! Scope-aware taint propagation over the shell syntax tree.
//!
//! A second traversal (after fact extraction) threads an explicit
//! [`TaintContext`] through the tree, re-entering function bodies at call
//! sites and merging conditional branches by union.

pub mod context;
pub mod engine;
pub mod sources;

pub use context::TaintContext;
pub use engine::TaintEngine;
