//! File-backed runs.
//!
//! [`LocalRunner`] wires a workflow file, an optional params file and a
//! working directory around [`WorkflowRunner`]: it loads variables left by
//! the previous run, executes the workflow and persists the new variables
//! and the run result.

use std::path::PathBuf;

use crate::context::ValueMap;
use crate::error::Result;
use crate::registry::{Deps, HandlerRegistry};
use crate::state::{RunId, Workdir};
use crate::workflow::{load_params, load_workflow, WorkflowDefinition};

use super::result::{RunResult, RunStatus};
use super::workflow::{RunOptions, RunProgress, WorkflowRunner};

/// Where a local run reads and writes its files.
#[derive(Debug, Clone, Default)]
pub struct LocalRunnerConfig {
    /// Workflow YAML file.
    pub workflow_path: PathBuf,
    /// Optional JSON params file.
    pub params_path: Option<PathBuf>,
    /// Working directory; empty means the current directory.
    pub workdir: PathBuf,
    /// Task id; generated when absent or empty.
    pub task_id: Option<String>,
}

/// Runs a workflow loaded from disk against a working directory.
#[derive(Debug)]
pub struct LocalRunner<'a> {
    registry: &'a HandlerRegistry,
    workflow: WorkflowDefinition,
    params: ValueMap,
    workdir: Workdir,
    task_id: String,
}

impl<'a> LocalRunner<'a> {
    /// Load the workflow and params and open the working directory.
    ///
    /// # Errors
    ///
    /// Returns the load error if the workflow or params file is missing or
    /// malformed, or if the working directory cannot be created.
    pub fn new(config: LocalRunnerConfig, registry: &'a HandlerRegistry) -> Result<Self> {
        let workflow = load_workflow(&config.workflow_path)?;
        let params = load_params(config.params_path.as_deref())?;

        let workdir_path = if config.workdir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            config.workdir
        };
        let workdir = Workdir::open(workdir_path)?;

        let task_id = config
            .task_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| RunId::generate(&workflow.name).to_string());

        Ok(Self {
            registry,
            workflow,
            params,
            workdir,
            task_id,
        })
    }

    /// The loaded workflow.
    pub fn workflow(&self) -> &WorkflowDefinition {
        &self.workflow
    }

    /// The task id of this run.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// The working directory.
    pub fn workdir(&self) -> &Workdir {
        &self.workdir
    }

    /// Execute the workflow.
    pub fn run(&self) -> RunResult {
        self.run_with_progress(|_| {})
    }

    /// Execute the workflow with a progress callback.
    ///
    /// Persistence failures are logged and never change the result.
    pub fn run_with_progress(&self, on_progress: impl FnMut(RunProgress<'_>)) -> RunResult {
        let vars = self.workdir.load_vars();
        let runner = WorkflowRunner::new(self.registry, Deps::new(self.workdir.path()));
        let options = RunOptions::new(self.task_id.as_str())
            .with_params(self.params.clone())
            .with_vars(vars);

        let result = runner.run_with_progress(&self.workflow, options, on_progress);

        if let Err(e) = self.workdir.save_result(&result) {
            tracing::warn!("{}", e);
        }
        // Nothing ran, so the previous variables stay as they are.
        if result.result != RunStatus::Error {
            if let Err(e) = self.workdir.save_vars(&result.final_vars) {
                tracing::warn!("{}", e);
            }
        }

        result
    }
}
