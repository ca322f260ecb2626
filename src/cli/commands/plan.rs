//! Plan command implementation.
//!
//! The `taskkit workflow plan` command resolves a workflow's execution
//! order and shows what a run would invoke, without invoking anything.

use crate::cli::args::PlanArgs;
use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::runner::RunStatus;
use crate::ui::UserInterface;
use crate::workflow::{load_workflow, StepDefinition, WorkflowDefinition};

use super::dispatcher::{Command, CommandResult};

/// The plan command implementation.
pub struct PlanCommand<'a> {
    args: PlanArgs,
    registry: &'a HandlerRegistry,
}

impl<'a> PlanCommand<'a> {
    /// Create a new plan command.
    pub fn new(args: PlanArgs, registry: &'a HandlerRegistry) -> Self {
        Self { args, registry }
    }

    fn describe(&self, workflow: &WorkflowDefinition, index: usize, step: &StepDefinition) -> String {
        let mut line = format!(
            "{:>3}. {:<20} {} (attempts: {})",
            index + 1,
            step.name,
            workflow.handler_name(step),
            workflow.max_attempts(step)
        );
        if let Some(template) = step.template {
            line.push_str(&format!(" [{}]", template));
        }
        if !step.depends.is_empty() {
            line.push_str(&format!(" after {}", step.depends.join(", ")));
        }
        line
    }
}

impl Command for PlanCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workflow = load_workflow(&self.args.workflow)?;
        ui.show_header(&workflow.name);
        if let Some(description) = &workflow.description {
            ui.message(description);
        }

        let order = match workflow.execution_order() {
            Ok(order) => order,
            Err(e) => {
                ui.error(&format!("Failed to determine execution order: {}", e));
                return Ok(CommandResult::failure(RunStatus::Error.exit_code()));
            }
        };

        let mut missing = 0;
        for (index, step) in order.iter().enumerate() {
            let line = self.describe(&workflow, index, step);
            if self.registry.contains(&workflow.handler_name(step)) {
                ui.message(&line);
            } else {
                missing += 1;
                ui.warning(&format!("{} - handler not registered", line));
            }
        }

        if workflow.has_finalize_step() {
            ui.message("Failures do not halt this workflow (finalize step present)");
        }
        if missing > 0 {
            ui.warning(&format!(
                "{} step(s) have no registered handler and would fail",
                missing
            ));
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{StepInput, StepOutcome};
    use crate::registry::{Deps, RegistryBuilder};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn noop(_: &StepInput, _: &Deps) -> StepOutcome {
        StepOutcome::new()
    }

    fn plan(yaml: &str, registry: &HandlerRegistry) -> (CommandResult, MockUI) {
        let temp = TempDir::new().unwrap();
        let workflow = temp.path().join("wf.yaml");
        fs::write(&workflow, yaml).unwrap();
        let mut ui = MockUI::new();
        let result = PlanCommand::new(PlanArgs { workflow }, registry)
            .execute(&mut ui)
            .unwrap();
        (result, ui)
    }

    #[test]
    fn shows_steps_in_dependency_order() {
        let registry = RegistryBuilder::new()
            .handler("p-a", noop)
            .handler("p-b", noop)
            .build();
        let yaml = "name: wf\nplatform: p\nsteps:\n  - name: b\n    depends: [a]\n    retries: 2\n  - name: a\n";

        let (result, ui) = plan(yaml, &registry);

        assert!(result.success);
        assert_eq!(ui.headers(), ["wf"]);
        assert!(ui.messages()[0].contains("1. a"));
        assert!(ui.messages()[1].contains("2. b"));
        assert!(ui.messages()[1].contains("p-b (attempts: 3) after a"));
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn marks_missing_handlers() {
        let registry = HandlerRegistry::new();
        let (result, ui) = plan("name: wf\nplatform: p\nsteps:\n  - name: a\n", &registry);

        assert!(result.success);
        assert!(ui.warnings()[0].ends_with("handler not registered"));
        assert!(ui.warnings()[1].starts_with("1 step(s)"));
    }

    #[test]
    fn cycle_exits_two() {
        let registry = HandlerRegistry::new();
        let yaml = "name: wf\nsteps:\n  - name: a\n    depends: [a]\n";

        let (result, ui) = plan(yaml, &registry);

        assert_eq!(result.exit_code, 2);
        assert!(ui.errors()[0].contains("a -> a"));
    }
}
