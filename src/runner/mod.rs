//! Step execution orchestration.
//!
//! - [`WorkflowRunner`] - orders steps and drives handlers with retries
//! - [`LocalRunner`] - file-backed runs against a working directory
//! - [`RunResult`] / [`StepRecord`] - what a run leaves behind

pub mod local;
pub mod result;
pub mod workflow;

pub use local::{LocalRunner, LocalRunnerConfig};
pub use result::{RunResult, RunResultBuilder, RunStatus, StepRecord, StepStatus};
pub use workflow::{RunOptions, RunProgress, WorkflowRunner};
