//! Subcommand implementations.

pub mod analyze;
