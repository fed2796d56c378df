//! CLI subcommand implementations.

pub mod analyze;
pub mod filters;
pub mod search;
