//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod batch;
mod diff;
mod stdio;

pub use batch::run_batch;
pub use diff::{DiffPaths, run_diff};
pub use stdio::{run_stdio, write_failure};
