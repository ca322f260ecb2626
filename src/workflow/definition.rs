//! Workflow definition schema.
//!
//! These structs map to the workflow YAML file format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::ValueMap;
use crate::error::{Result, TaskkitError};

use super::graph::DependencyGraph;

/// Standard step roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepTemplate {
    /// Validates inputs and seeds variables.
    Init,
    /// Does the actual work.
    Action,
    /// Reports overall health; keeps the run going after a failure.
    Finalize,
}

impl fmt::Display for StepTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepTemplate::Init => "init",
            StepTemplate::Action => "action",
            StepTemplate::Finalize => "finalize",
        };
        write!(f, "{}", s)
    }
}

/// A single step in a workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StepDefinition {
    /// Step name, unique within the workflow.
    pub name: String,

    /// Steps that must complete before this one.
    #[serde(default, alias = "depends_on", skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,

    /// Role of the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<StepTemplate>,

    /// Step-local parameters, overriding run-level ones.
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub params: ValueMap,

    /// Retry override; zero or negative falls back to the workflow default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i32>,
}

impl StepDefinition {
    /// Create a step with no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add dependencies.
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Set the template tag.
    pub fn with_template(mut self, template: StepTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Set the retry override.
    pub fn with_retries(mut self, retries: i32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Add a step-local parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Whether this step is tagged as the finalize step.
    pub fn is_finalize(&self) -> bool {
        self.template == Some(StepTemplate::Finalize)
    }
}

/// Root of a workflow YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WorkflowDefinition {
    /// Workflow name (required).
    pub name: String,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Platform tag, used for handler keys when no prefix is set.
    pub platform: String,

    /// Handler key prefix; takes precedence over the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler_prefix: Option<String>,

    /// Ordered steps (at least one).
    pub steps: Vec<StepDefinition>,

    /// Retries for steps without their own override; negative means none.
    #[serde(skip_serializing_if = "is_zero")]
    pub default_retries: i32,

    /// Advisory timeout; not enforced by the runner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl WorkflowDefinition {
    /// Create an empty workflow with the given name and platform.
    pub fn new(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            ..Default::default()
        }
    }

    /// Append a step.
    pub fn with_step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the handler prefix.
    pub fn with_handler_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.handler_prefix = Some(prefix.into());
        self
    }

    /// Set the default retry count.
    pub fn with_default_retries(mut self, retries: i32) -> Self {
        self.default_retries = retries;
        self
    }

    /// Check the invariants a loaded definition must satisfy.
    ///
    /// Graph invariants (known dependencies, no cycles) are checked by
    /// [`execution_order`](Self::execution_order) instead, so that a run
    /// can report them in its result.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TaskkitError::WorkflowValidationError {
                message: "workflow name is required".to_string(),
            });
        }
        if self.steps.is_empty() {
            return Err(TaskkitError::WorkflowValidationError {
                message: "workflow must have at least one step".to_string(),
            });
        }
        if let Some(index) = self.steps.iter().position(|s| s.name.trim().is_empty()) {
            return Err(TaskkitError::WorkflowValidationError {
                message: format!("step #{} has no name", index + 1),
            });
        }
        Ok(())
    }

    /// Registry key of the handler for a step.
    ///
    /// `prefix-stepname` when a handler prefix is set, otherwise
    /// `platform-stepname`.
    pub fn handler_name(&self, step: &StepDefinition) -> String {
        match self.handler_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{}-{}", prefix, step.name),
            _ => format!("{}-{}", self.platform, step.name),
        }
    }

    /// Number of retries for a step.
    ///
    /// The step override if positive, else the workflow default if
    /// positive, else zero.
    pub fn retries_for(&self, step: &StepDefinition) -> u32 {
        let retries = match step.retries {
            Some(n) if n > 0 => n,
            _ => self.default_retries,
        };
        u32::try_from(retries).unwrap_or(0)
    }

    /// Total attempts allowed for a step.
    pub fn max_attempts(&self, step: &StepDefinition) -> u32 {
        self.retries_for(step).saturating_add(1)
    }

    /// Whether any step is tagged as finalize.
    pub fn has_finalize_step(&self) -> bool {
        self.steps.iter().any(StepDefinition::is_finalize)
    }

    /// Find a step by name.
    pub fn step(&self, name: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Build the dependency graph of this workflow.
    pub fn graph(&self) -> Result<DependencyGraph> {
        let mut builder = DependencyGraph::builder();
        for step in &self.steps {
            builder = builder.add_step(step.name.clone(), step.depends.clone());
        }
        builder.build()
    }

    /// Steps in an order where every step follows its dependencies.
    pub fn execution_order(&self) -> Result<Vec<&StepDefinition>> {
        let order = self.graph()?.topological_order()?;
        Ok(order
            .iter()
            .filter_map(|name| self.step(name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow() -> WorkflowDefinition {
        WorkflowDefinition::new("smoke-test", "homelab")
            .with_step(StepDefinition::new("init").with_template(StepTemplate::Init))
            .with_step(StepDefinition::new("check").depends_on(["init"]))
            .with_step(
                StepDefinition::new("finalize")
                    .depends_on(["check"])
                    .with_template(StepTemplate::Finalize),
            )
    }

    #[test]
    fn handler_name_uses_platform_without_prefix() {
        let wf = workflow();
        assert_eq!(wf.handler_name(&wf.steps[1]), "homelab-check");
    }

    #[test]
    fn handler_name_prefers_prefix() {
        let wf = workflow().with_handler_prefix("smoke-test");
        assert_eq!(wf.handler_name(&wf.steps[0]), "smoke-test-init");
    }

    #[test]
    fn empty_prefix_falls_back_to_platform() {
        let wf = workflow().with_handler_prefix("");
        assert_eq!(wf.handler_name(&wf.steps[0]), "homelab-init");
    }

    #[test]
    fn retries_default_to_zero() {
        let wf = workflow();
        assert_eq!(wf.retries_for(&wf.steps[0]), 0);
        assert_eq!(wf.max_attempts(&wf.steps[0]), 1);
    }

    #[test]
    fn retries_use_workflow_default() {
        let wf = workflow().with_default_retries(2);
        assert_eq!(wf.retries_for(&wf.steps[0]), 2);
        assert_eq!(wf.max_attempts(&wf.steps[0]), 3);
    }

    #[test]
    fn step_override_wins_when_positive() {
        let wf = workflow()
            .with_default_retries(2)
            .with_step(StepDefinition::new("flaky").with_retries(4))
            .with_step(StepDefinition::new("zero").with_retries(0));
        assert_eq!(wf.retries_for(wf.step("flaky").unwrap()), 4);
        assert_eq!(wf.retries_for(wf.step("zero").unwrap()), 2);
    }

    #[test]
    fn negative_retries_fall_back() {
        let wf = workflow()
            .with_default_retries(-1)
            .with_step(StepDefinition::new("neg").with_retries(-2));
        assert_eq!(wf.retries_for(wf.step("neg").unwrap()), 0);
        assert_eq!(wf.max_attempts(wf.step("neg").unwrap()), 1);

        let wf = workflow()
            .with_default_retries(2)
            .with_step(StepDefinition::new("neg").with_retries(-2));
        assert_eq!(wf.retries_for(wf.step("neg").unwrap()), 2);
    }

    #[test]
    fn detects_finalize_step() {
        assert!(workflow().has_finalize_step());

        let mut wf = workflow();
        wf.steps[2].template = Some(StepTemplate::Action);
        assert!(!wf.has_finalize_step());
    }

    #[test]
    fn validate_requires_name() {
        let mut wf = workflow();
        wf.name = "  ".into();
        let err = wf.validate().unwrap_err();
        assert!(err.to_string().contains("name is required"));
    }

    #[test]
    fn validate_requires_steps() {
        let wf = WorkflowDefinition::new("empty", "homelab");
        let err = wf.validate().unwrap_err();
        assert!(err.to_string().contains("at least one step"));
    }

    #[test]
    fn validate_requires_step_names() {
        let wf = workflow().with_step(StepDefinition::new(""));
        let err = wf.validate().unwrap_err();
        assert!(err.to_string().contains("step #4"));
    }

    #[test]
    fn execution_order_follows_dependencies() {
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("finalize").depends_on(["check"]))
            .with_step(StepDefinition::new("check").depends_on(["init"]))
            .with_step(StepDefinition::new("init"));

        let names: Vec<_> = wf
            .execution_order()
            .unwrap()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["init", "check", "finalize"]);
    }

    #[test]
    fn template_displays_lowercase() {
        assert_eq!(StepTemplate::Finalize.to_string(), "finalize");
    }
}
