//! Automatic quoting of unquoted expansions.

pub mod quote;

pub use quote::{fix_content, fix_file, fixed_output_path, FixError};
