//! Per-attempt input handed to a step handler.

use serde::{Deserialize, Serialize};

use super::{Value, ValueMap};
use crate::runner::RunStatus;

/// Everything a handler is given for one attempt.
///
/// Built fresh for every attempt, so a handler may keep it without
/// observing later changes to the run's shared variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInput {
    /// Step name.
    pub step_name: String,

    /// Run/task identifier.
    pub task_id: String,

    /// Workflow name.
    pub workflow_name: String,

    /// Current attempt, starting at 1.
    pub attempt: u32,

    /// Total attempts allowed for this step (retries + 1).
    pub max_attempts: u32,

    /// Run-level params overlaid by the step's own params.
    pub params: ValueMap,

    /// Snapshot of the shared variables at invocation time.
    pub vars: ValueMap,

    /// Aggregate run status so far; only set for finalize steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_result: Option<RunStatus>,
}

impl StepInput {
    /// Get a parameter by key.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Get a string parameter, `None` if missing or not a string.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.param(key).and_then(Value::as_str)
    }

    /// Get a shared variable by key.
    pub fn var(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Get a string variable, `None` if missing or not a string.
    pub fn var_str(&self, key: &str) -> Option<&str> {
        self.var(key).and_then(Value::as_str)
    }

    /// Get a boolean variable, `None` if missing or not a bool.
    pub fn var_bool(&self, key: &str) -> Option<bool> {
        self.var(key).and_then(Value::as_bool)
    }

    /// Whether this is the last attempt the step will get.
    pub fn is_last_attempt(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}
