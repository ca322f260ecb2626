//! taskkit - a small workflow execution engine.
//!
//! A workflow is a YAML list of named steps with dependencies. Each step is
//! executed by a handler looked up by name in a [`HandlerRegistry`]; the
//! runner orders the steps, retries failing attempts, threads shared
//! variables from step to step and records a [`RunResult`].
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`context`] - Step inputs, outcomes and variable merging
//! - [`error`] - Error types and result aliases
//! - [`registry`] - Handler contract and registry
//! - [`runner`] - Step execution, retries and run results
//! - [`state`] - Working-directory persistence and run ids
//! - [`tasks`] - Bundled handlers
//! - [`ui`] - Spinners and terminal output
//! - [`workflow`] - Workflow files and dependency resolution
//!
//! # Example
//!
//! ```
//! use taskkit::context::{StepInput, StepOutcome};
//! use taskkit::registry::{Deps, RegistryBuilder};
//! use taskkit::runner::{RunOptions, RunStatus, WorkflowRunner};
//! use taskkit::workflow::{StepDefinition, WorkflowDefinition};
//!
//! let registry = RegistryBuilder::new()
//!     .handler("demo-greet", |_: &StepInput, _: &Deps| {
//!         let mut outcome = StepOutcome::new();
//!         outcome.set_var("greeting", "hello");
//!         outcome
//!     })
//!     .build();
//!
//! let workflow = WorkflowDefinition::new("demo", "demo")
//!     .with_step(StepDefinition::new("greet"));
//!
//! let runner = WorkflowRunner::new(&registry, Deps::default());
//! let result = runner.run(&workflow, RunOptions::new("task-1"));
//!
//! assert_eq!(result.result, RunStatus::Succeeded);
//! assert_eq!(result.final_vars["greeting"], "hello");
//! ```

pub mod cli;
pub mod context;
pub mod error;
pub mod registry;
pub mod runner;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod workflow;

pub use error::{Result, TaskkitError};
pub use registry::{HandlerRegistry, RegistryBuilder};
pub use runner::RunResult;
