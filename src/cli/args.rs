//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// taskkit - run workflows of registered step handlers.
#[derive(Debug, Parser)]
#[command(name = "taskkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output, including debug step messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print nothing but errors
    #[arg(long, global = true, conflicts_with_all = ["verbose", "quiet"])]
    pub silent: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run, plan or inspect workflows
    #[command(subcommand)]
    Workflow(WorkflowCommands),

    /// List registered step handlers
    ListHandlers,

    /// Print the JSON Schema of the workflow file format
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version
    Version,
}

/// `workflow` subcommands.
#[derive(Debug, Subcommand)]
pub enum WorkflowCommands {
    /// Execute a workflow file
    Run(RunArgs),

    /// Show the execution order without running anything
    Plan(PlanArgs),

    /// Show the result of the last run in a working directory
    Last(LastArgs),
}

/// Arguments for `workflow run`.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Workflow YAML file
    #[arg(short, long)]
    pub workflow: PathBuf,

    /// JSON file with run-level parameters
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Working directory for vars.yaml and execution-result.json
    #[arg(long, env = "TASKKIT_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Task id recorded in the result (generated if omitted)
    #[arg(long, env = "TASKKIT_TASK_ID")]
    pub task_id: Option<String>,
}

/// Arguments for `workflow plan`.
#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// Workflow YAML file
    #[arg(short, long)]
    pub workflow: PathBuf,
}

/// Arguments for `workflow last`.
#[derive(Debug, Clone, clap::Args)]
pub struct LastArgs {
    /// Working directory of the run
    #[arg(long, env = "TASKKIT_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Print the raw execution-result.json
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `completions`.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
