//! State kept in a run's working directory.
//!
//! This module persists shared variables between runs and the result of
//! the last run, and generates identifiers for runs started without one.

pub mod run_id;
pub mod store;

pub use run_id::RunId;
pub use store::{Workdir, RESULT_FILE, VARS_FILE};
