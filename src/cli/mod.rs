//! Command-line interface for taskkit.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, LastArgs, PlanArgs, RunArgs, WorkflowCommands,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
