//! Step execution records and run results.
//!
//! This module provides the durable trace of a run: one [`StepRecord`] per
//! executed step and a [`RunResult`] for the whole workflow, assembled with
//! [`RunResultBuilder`] while the run progresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::context::{Message, ValueMap};

/// Final status of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// The last attempt reported no errors.
    Succeeded,
    /// Every attempt reported errors, or the handler was missing.
    Failed,
    /// The handler asked to skip the step.
    Skipped,
}

impl StepStatus {
    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Succeeded => '✓',
            StepStatus::Failed => '✗',
            StepStatus::Skipped => '⊘',
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Succeeded => "Succeeded",
            StepStatus::Failed => "Failed",
            StepStatus::Skipped => "Skipped",
        };
        write!(f, "{}", s)
    }
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// No step failed.
    Succeeded,
    /// At least one step failed.
    Failed,
    /// The steps could not be ordered; nothing ran.
    Error,
}

impl RunStatus {
    /// Process exit code for this result.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Succeeded => 0,
            RunStatus::Failed => 1,
            RunStatus::Error => 2,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Succeeded => "Succeeded",
            RunStatus::Failed => "Failed",
            RunStatus::Error => "Error",
        };
        write!(f, "{}", s)
    }
}

/// Trace of one step's execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step name.
    pub name: String,

    /// Registry key of the handler.
    pub handler: String,

    /// Final status.
    pub status: StepStatus,

    /// Handler invocations made (0 when the handler was missing).
    pub attempts: u32,

    /// Wall-clock duration in milliseconds, all attempts included.
    pub duration_ms: u64,

    /// Messages of the last attempt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,

    /// Output of the last attempt.
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub output: ValueMap,

    /// Failure summary, or the skip reason for skipped steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepRecord {
    /// Record for a step whose handler is not registered.
    pub fn handler_missing(name: &str, handler: &str, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            handler: handler.to_string(),
            status: StepStatus::Failed,
            attempts: 0,
            duration_ms: duration.as_millis() as u64,
            messages: Vec::new(),
            output: ValueMap::new(),
            error: Some(format!("handler not found: {}", handler)),
        }
    }

    /// Execution duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Full outcome of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Overall result.
    pub result: RunStatus,

    /// Run/task identifier.
    pub task_id: String,

    /// Workflow name.
    pub workflow_name: String,

    /// When the run started.
    pub start_time: DateTime<Utc>,

    /// When the run ended.
    pub end_time: DateTime<Utc>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    /// Records of executed steps, in execution order.
    #[serde(default)]
    pub steps: Vec<StepRecord>,

    /// Shared variables at the end of the run.
    #[serde(default)]
    pub final_vars: ValueMap,

    /// Why the run could not start stepping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RunResult {
    /// Whether the run succeeded.
    pub fn is_success(&self) -> bool {
        self.result == RunStatus::Succeeded
    }

    /// Find the record of a step.
    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Names of failed steps.
    pub fn failed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Failed)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Helper for building a run result.
pub struct RunResultBuilder {
    task_id: String,
    workflow_name: String,
    start_time: DateTime<Utc>,
    steps: Vec<StepRecord>,
}

impl RunResultBuilder {
    /// Start a new run result.
    pub fn start(task_id: &str, workflow_name: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            workflow_name: workflow_name.to_string(),
            start_time: Utc::now(),
            steps: Vec::new(),
        }
    }

    /// Record a finished step.
    pub fn push(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    /// Whether any recorded step failed.
    pub fn has_failures(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Failed)
    }

    /// Finish after stepping: `Failed` if any step failed, else `Succeeded`.
    pub fn finish(self, final_vars: ValueMap) -> RunResult {
        let result = if self.has_failures() {
            RunStatus::Failed
        } else {
            RunStatus::Succeeded
        };
        self.complete(result, final_vars, None)
    }

    /// Finish a run that could not begin stepping.
    pub fn finish_error(self, message: &str, final_vars: ValueMap) -> RunResult {
        self.complete(RunStatus::Error, final_vars, Some(message.to_string()))
    }

    fn complete(
        self,
        result: RunStatus,
        final_vars: ValueMap,
        error_message: Option<String>,
    ) -> RunResult {
        let end_time = Utc::now();
        RunResult {
            result,
            task_id: self.task_id,
            workflow_name: self.workflow_name,
            start_time: self.start_time,
            end_time,
            duration_ms: (end_time - self.start_time).num_milliseconds().max(0) as u64,
            steps: self.steps,
            final_vars,
            error_message,
        }
    }
}
