//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands, WorkflowCommands};
use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Errors are load-time failures; the caller reports them and exits 1.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    registry: HandlerRegistry,
}

impl CommandDispatcher {
    /// Create a dispatcher running against the given handlers.
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Workflow(WorkflowCommands::Run(args)) => {
                let cmd = super::run::RunCommand::new(args.clone(), &self.registry);
                cmd.execute(ui)
            }
            Commands::Workflow(WorkflowCommands::Plan(args)) => {
                let cmd = super::plan::PlanCommand::new(args.clone(), &self.registry);
                cmd.execute(ui)
            }
            Commands::Workflow(WorkflowCommands::Last(args)) => {
                let cmd = super::last::LastCommand::new(args.clone());
                cmd.execute(ui)
            }
            Commands::ListHandlers => {
                let cmd = super::list_handlers::ListHandlersCommand::new(&self.registry);
                cmd.execute(ui)
            }
            Commands::Schema => super::schema::SchemaCommand.execute(ui),
            Commands::Version => super::version::VersionCommand.execute(ui),
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
