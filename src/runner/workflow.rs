//! Workflow execution.
//!
//! [`WorkflowRunner`] orders the steps of a [`WorkflowDefinition`], invokes
//! the registered handler for each one with retries, threads shared
//! variables between steps and records the outcome of every step.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::context::{apply_updates, merge_params, FlowControl, StepInput, ValueMap};
use crate::registry::{Deps, HandlerRegistry};
use crate::workflow::{StepDefinition, WorkflowDefinition};

use super::result::{RunResult, RunResultBuilder, RunStatus, StepRecord, StepStatus};

/// Progress events emitted during workflow execution.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A step is about to start.
    StepStarting {
        name: &'a str,
        handler: &'a str,
        index: usize,
        total: usize,
    },
    /// An attempt failed and the step will be retried.
    AttemptFailed {
        name: &'a str,
        attempt: u32,
        max_attempts: u32,
    },
    /// A step finished.
    StepFinished { record: &'a StepRecord },
}

/// Inputs of a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Identifier recorded in the result and passed to handlers.
    pub task_id: String,
    /// Run-level parameters.
    pub params: ValueMap,
    /// Initial shared variables.
    pub vars: ValueMap,
}

impl RunOptions {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            ..Default::default()
        }
    }

    pub fn with_params(mut self, params: ValueMap) -> Self {
        self.params = params;
        self
    }

    pub fn with_vars(mut self, vars: ValueMap) -> Self {
        self.vars = vars;
        self
    }
}

/// Orchestrates the execution of a workflow.
pub struct WorkflowRunner<'a> {
    registry: &'a HandlerRegistry,
    deps: Deps,
}

impl<'a> WorkflowRunner<'a> {
    /// Create a new workflow runner.
    pub fn new(registry: &'a HandlerRegistry, deps: Deps) -> Self {
        Self { registry, deps }
    }

    /// Run a workflow.
    pub fn run(&self, workflow: &WorkflowDefinition, options: RunOptions) -> RunResult {
        self.run_with_progress(workflow, options, |_| {})
    }

    /// Run a workflow with a progress callback.
    ///
    /// Never fails: ordering problems produce a result with
    /// [`RunStatus::Error`] and no executed steps.
    pub fn run_with_progress(
        &self,
        workflow: &WorkflowDefinition,
        options: RunOptions,
        mut on_progress: impl FnMut(RunProgress<'_>),
    ) -> RunResult {
        let RunOptions {
            task_id,
            params,
            mut vars,
        } = options;
        let mut builder = RunResultBuilder::start(&task_id, &workflow.name);

        let order = match workflow.execution_order() {
            Ok(order) => order,
            Err(e) => {
                warn!("Workflow '{}' cannot be ordered: {}", workflow.name, e);
                let message = format!("Failed to determine execution order: {}", e);
                return builder.finish_error(&message, vars);
            }
        };

        // With a finalize step present, failures don't halt the run so the
        // finalize step always gets to report.
        let keep_going = workflow.has_finalize_step();
        let total = order.len();
        info!(
            "Running workflow '{}' ({} steps, task {})",
            workflow.name, total, task_id
        );

        for (index, step) in order.into_iter().enumerate() {
            let handler_name = workflow.handler_name(step);

            on_progress(RunProgress::StepStarting {
                name: &step.name,
                handler: &handler_name,
                index,
                total,
            });

            let context = StepContext {
                workflow,
                task_id: &task_id,
                params: &params,
                run_failed: builder.has_failures(),
            };
            let record =
                self.execute_step(&context, step, &handler_name, &mut vars, &mut on_progress);

            on_progress(RunProgress::StepFinished { record: &record });

            let failed = record.status == StepStatus::Failed;
            builder.push(record);

            if failed && !keep_going {
                info!("Step '{}' failed; halting workflow", step.name);
                break;
            }
        }

        let result = builder.finish(vars);
        info!(
            "Workflow '{}' finished: {} in {}ms",
            result.workflow_name, result.result, result.duration_ms
        );
        result
    }

    fn execute_step<F>(
        &self,
        context: &StepContext<'_>,
        step: &StepDefinition,
        handler_name: &str,
        vars: &mut ValueMap,
        on_progress: &mut F,
    ) -> StepRecord
    where
        F: FnMut(RunProgress<'_>),
    {
        let start = Instant::now();

        let Some(handler) = self.registry.lookup(handler_name) else {
            warn!(
                "No handler '{}' registered for step '{}'",
                handler_name, step.name
            );
            return StepRecord::handler_missing(&step.name, handler_name, start.elapsed());
        };

        let max_attempts = context.workflow.max_attempts(step);
        let params = merge_params(context.params, &step.params);
        let workflow_result = step.is_finalize().then(|| {
            if context.run_failed {
                RunStatus::Failed
            } else {
                RunStatus::Succeeded
            }
        });

        let mut attempt = 1;
        let (outcome, status) = loop {
            let input = StepInput {
                step_name: step.name.clone(),
                task_id: context.task_id.to_string(),
                workflow_name: context.workflow.name.clone(),
                attempt,
                max_attempts,
                params: params.clone(),
                vars: vars.clone(),
                workflow_result,
            };

            debug!(
                "Invoking '{}' for step '{}' (attempt {}/{})",
                handler_name, step.name, attempt, max_attempts
            );
            let outcome = handler.handle(&input, &self.deps);

            if outcome.flow.is_skip() {
                break (outcome, StepStatus::Skipped);
            }
            if !outcome.has_errors() {
                break (outcome, StepStatus::Succeeded);
            }
            if attempt >= max_attempts {
                break (outcome, StepStatus::Failed);
            }

            debug!(
                "Step '{}' attempt {}/{} reported errors; retrying",
                step.name, attempt, max_attempts
            );
            on_progress(RunProgress::AttemptFailed {
                name: &step.name,
                attempt,
                max_attempts,
            });
            attempt += 1;
        };

        // Updates apply once, from the attempt that ended the step.
        apply_updates(vars, &outcome.context_updates);

        let error = match (status, &outcome.flow) {
            (StepStatus::Skipped, FlowControl::Skip { reason }) => reason.clone(),
            (StepStatus::Failed, _) => outcome.first_error().map(str::to_string),
            _ => None,
        };

        debug!(
            "Step '{}' {} after {} attempt(s)",
            step.name, status, attempt
        );

        StepRecord {
            name: step.name.clone(),
            handler: handler_name.to_string(),
            status,
            attempts: attempt,
            duration_ms: start.elapsed().as_millis() as u64,
            messages: outcome.messages,
            output: outcome.output,
            error,
        }
    }
}

/// Per-step view of the run state.
struct StepContext<'a> {
    workflow: &'a WorkflowDefinition,
    task_id: &'a str,
    params: &'a ValueMap,
    run_failed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StepOutcome;
    use crate::registry::RegistryBuilder;
    use crate::workflow::StepTemplate;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn ok(_: &StepInput, _: &Deps) -> StepOutcome {
        StepOutcome::new()
    }

    fn fail(_: &StepInput, _: &Deps) -> StepOutcome {
        let mut outcome = StepOutcome::new();
        outcome.add_error("boom", "test");
        outcome
    }

    fn three_steps(finalize: bool) -> WorkflowDefinition {
        let mut last = StepDefinition::new("c").depends_on(["b"]);
        if finalize {
            last = last.with_template(StepTemplate::Finalize);
        }
        WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a"))
            .with_step(StepDefinition::new("b").depends_on(["a"]))
            .with_step(last)
    }

    fn names(result: &RunResult) -> Vec<&str> {
        result.steps.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn all_steps_succeed() {
        let registry = RegistryBuilder::new()
            .handler("p-a", ok)
            .handler("p-b", ok)
            .handler("p-c", ok)
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());

        let result = runner.run(&three_steps(false), RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Succeeded);
        assert_eq!(result.task_id, "t1");
        assert_eq!(names(&result), vec!["a", "b", "c"]);
        assert!(result.steps.iter().all(|s| s.attempts == 1));
    }

    #[test]
    fn failure_halts_without_finalize() {
        let registry = RegistryBuilder::new()
            .handler("p-a", ok)
            .handler("p-b", fail)
            .handler("p-c", ok)
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());

        let result = runner.run(&three_steps(false), RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Failed);
        assert_eq!(names(&result), vec!["a", "b"]);
        assert_eq!(result.steps[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn failure_keeps_going_with_finalize() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_handler = Arc::clone(&seen);
        let registry = RegistryBuilder::new()
            .handler("p-a", ok)
            .handler("p-b", fail)
            .handler("p-c", move |input: &StepInput, _: &Deps| {
                *seen_in_handler.lock().unwrap() = input.workflow_result;
                StepOutcome::new()
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());

        let result = runner.run(&three_steps(true), RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Failed);
        assert_eq!(names(&result), vec!["a", "b", "c"]);
        assert_eq!(result.steps[2].status, StepStatus::Succeeded);
        assert_eq!(*seen.lock().unwrap(), Some(RunStatus::Failed));
    }

    #[test]
    fn finalize_sees_success_when_nothing_failed() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_handler = Arc::clone(&seen);
        let registry = RegistryBuilder::new()
            .handler("p-a", ok)
            .handler("p-b", ok)
            .handler("p-c", move |input: &StepInput, _: &Deps| {
                *seen_in_handler.lock().unwrap() = input.workflow_result;
                StepOutcome::new()
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());

        runner.run(&three_steps(true), RunOptions::new("t1"));

        assert_eq!(*seen.lock().unwrap(), Some(RunStatus::Succeeded));
    }

    #[test]
    fn non_finalize_steps_get_no_workflow_result() {
        let registry = RegistryBuilder::new()
            .handler("p-a", |input: &StepInput, _: &Deps| {
                let mut outcome = StepOutcome::new();
                if input.workflow_result.is_some() {
                    outcome.add_error("unexpected workflow result", "test");
                }
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p").with_step(StepDefinition::new("a"));

        let result = runner.run(&wf, RunOptions::new("t1"));
        assert_eq!(result.result, RunStatus::Succeeded);
    }

    #[test]
    fn retries_until_budget_exhausted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = RegistryBuilder::new()
            .handler("p-a", move |_: &StepInput, _: &Deps| {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut outcome = StepOutcome::new();
                outcome.add_error("still broken", "test");
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a").with_retries(2));

        let mut retried = Vec::new();
        let result = runner.run_with_progress(&wf, RunOptions::new("t1"), |progress| {
            if let RunProgress::AttemptFailed { attempt, .. } = progress {
                retried.push(attempt);
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(retried, vec![1, 2]);
        assert_eq!(result.steps[0].attempts, 3);
        assert_eq!(result.steps[0].status, StepStatus::Failed);
    }

    #[test]
    fn succeeds_on_later_attempt() {
        let registry = RegistryBuilder::new()
            .handler("p-a", |input: &StepInput, _: &Deps| {
                let mut outcome = StepOutcome::new();
                if input.attempt < 2 {
                    outcome.add_error("not yet", "test");
                    outcome.set_var("from_failed_attempt", true);
                } else {
                    outcome.set_var("from_good_attempt", true);
                }
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_default_retries(3)
            .with_step(StepDefinition::new("a"));

        let result = runner.run(&wf, RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Succeeded);
        assert_eq!(result.steps[0].attempts, 2);
        assert!(result.steps[0].error.is_none());
        assert_eq!(result.final_vars.get("from_good_attempt"), Some(&json!(true)));
        assert!(!result.final_vars.contains_key("from_failed_attempt"));
    }

    #[test]
    fn attempts_see_attempt_numbers_and_budget() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_handler = Arc::clone(&seen);
        let registry = RegistryBuilder::new()
            .handler("p-a", move |input: &StepInput, _: &Deps| {
                seen_in_handler
                    .lock()
                    .unwrap()
                    .push((input.attempt, input.max_attempts, input.is_last_attempt()));
                let mut outcome = StepOutcome::new();
                outcome.add_error("x", "test");
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a").with_retries(1));

        runner.run(&wf, RunOptions::new("t1"));

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2, false), (2, 2, true)]);
    }

    #[test]
    fn skip_is_final_and_not_a_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = RegistryBuilder::new()
            .handler("p-a", move |_: &StepInput, _: &Deps| {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut outcome = StepOutcome::new();
                outcome.add_error("ignored because skipping", "test");
                outcome.set_var("skipped_once", true);
                outcome.skip("nothing to do");
                outcome
            })
            .handler("p-b", ok)
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_default_retries(5)
            .with_step(StepDefinition::new("a"))
            .with_step(StepDefinition::new("b").depends_on(["a"]));

        let result = runner.run(&wf, RunOptions::new("t1"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.result, RunStatus::Succeeded);
        assert_eq!(result.steps[0].status, StepStatus::Skipped);
        assert_eq!(result.steps[0].error.as_deref(), Some("nothing to do"));
        assert_eq!(result.final_vars.get("skipped_once"), Some(&json!(true)));
        assert_eq!(names(&result), vec!["a", "b"]);
    }

    #[test]
    fn missing_handler_fails_step_without_attempts() {
        let registry = RegistryBuilder::new().handler("p-a", ok).build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a"))
            .with_step(StepDefinition::new("b").depends_on(["a"]));

        let result = runner.run(&wf, RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Failed);
        let record = result.step("b").unwrap();
        assert_eq!(record.status, StepStatus::Failed);
        assert_eq!(record.attempts, 0);
        assert_eq!(record.error.as_deref(), Some("handler not found: p-b"));
    }

    #[test]
    fn cycle_yields_error_without_running() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = RegistryBuilder::new()
            .handler("p-a", move |_: &StepInput, _: &Deps| {
                counter.fetch_add(1, Ordering::SeqCst);
                StepOutcome::new()
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a").depends_on(["b"]))
            .with_step(StepDefinition::new("b").depends_on(["a"]));

        let result = runner.run(&wf, RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Error);
        assert!(result.steps.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let message = result.error_message.unwrap();
        assert!(message.starts_with("Failed to determine execution order"));
        assert!(message.contains("Circular dependency"));
    }

    #[test]
    fn unknown_dependency_yields_error() {
        let registry = HandlerRegistry::new();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a").depends_on(["ghost"]));

        let result = runner.run(&wf, RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Error);
        assert!(result.error_message.unwrap().contains("ghost"));
    }

    #[test]
    fn later_steps_see_earlier_updates() {
        let registry = RegistryBuilder::new()
            .handler("p-a", |_: &StepInput, _: &Deps| {
                let mut outcome = StepOutcome::new();
                outcome.set_var("token", "abc");
                outcome
            })
            .handler("p-b", |input: &StepInput, _: &Deps| {
                let mut outcome = StepOutcome::new();
                if input.var_str("token") != Some("abc") {
                    outcome.add_error("token not visible", "test");
                }
                outcome.set_var("token", "def");
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("b").depends_on(["a"]))
            .with_step(StepDefinition::new("a"));

        let result = runner.run(&wf, RunOptions::new("t1"));

        assert_eq!(result.result, RunStatus::Succeeded);
        assert_eq!(result.final_vars["token"], json!("def"));
    }

    #[test]
    fn initial_vars_are_visible_and_preserved() {
        let registry = RegistryBuilder::new()
            .handler("p-a", |input: &StepInput, _: &Deps| {
                let mut outcome = StepOutcome::new();
                let runs = input.var("runs").and_then(|v| v.as_i64()).unwrap_or(0);
                outcome.set_var("runs", runs + 1);
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p").with_step(StepDefinition::new("a"));

        let mut vars = ValueMap::new();
        vars.insert("runs".into(), json!(4));
        vars.insert("keep".into(), json!("me"));
        let result = runner.run(&wf, RunOptions::new("t1").with_vars(vars));

        assert_eq!(result.final_vars["runs"], json!(5));
        assert_eq!(result.final_vars["keep"], json!("me"));
    }

    #[test]
    fn step_params_override_run_params() {
        let registry = RegistryBuilder::new()
            .handler("p-a", |input: &StepInput, _: &Deps| {
                let mut outcome = StepOutcome::new();
                outcome.set_output("region", input.param("region").cloned().unwrap_or_default());
                outcome.set_output("size", input.param("size").cloned().unwrap_or_default());
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a").with_param("region", "eu"));

        let mut params = ValueMap::new();
        params.insert("region".into(), json!("us"));
        params.insert("size".into(), json!(3));
        let result = runner.run(&wf, RunOptions::new("t1").with_params(params));

        let output = &result.steps[0].output;
        assert_eq!(output["region"], json!("eu"));
        assert_eq!(output["size"], json!(3));
    }

    #[test]
    fn handlers_receive_deps() {
        let registry = RegistryBuilder::new()
            .handler("p-a", |_: &StepInput, deps: &Deps| {
                let mut outcome = StepOutcome::new();
                outcome.set_output("workdir", deps.workdir().display().to_string());
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::new("/tmp/run"));
        let wf = WorkflowDefinition::new("wf", "p").with_step(StepDefinition::new("a"));

        let result = runner.run(&wf, RunOptions::new("t1"));
        assert_eq!(result.steps[0].output["workdir"], json!("/tmp/run"));
    }

    #[test]
    fn progress_reports_start_and_finish() {
        let registry = RegistryBuilder::new()
            .handler("p-a", ok)
            .handler("p-b", ok)
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let wf = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a"))
            .with_step(StepDefinition::new("b"));

        let mut events = Vec::new();
        runner.run_with_progress(&wf, RunOptions::new("t1"), |progress| match progress {
            RunProgress::StepStarting {
                name,
                handler,
                index,
                total,
            } => events.push(format!("start {} {} {}/{}", name, handler, index, total)),
            RunProgress::StepFinished { record } => {
                events.push(format!("finish {} {}", record.name, record.status))
            }
            RunProgress::AttemptFailed { .. } => {}
        });

        assert_eq!(
            events,
            vec![
                "start a p-a 0/2",
                "finish a Succeeded",
                "start b p-b 1/2",
                "finish b Succeeded",
            ]
        );
    }

    #[test]
    fn independent_steps_run_after_failure_with_finalize() {
        let registry = RegistryBuilder::new()
            .handler("p-a", fail)
            .handler("p-b", ok)
            .handler("p-report", ok)
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let workflow = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a"))
            .with_step(StepDefinition::new("b"))
            .with_step(
                StepDefinition::new("report")
                    .depends_on(["a"])
                    .with_template(StepTemplate::Finalize),
            );

        let result = runner.run(&workflow, RunOptions::new("t1"));

        assert_eq!(names(&result), vec!["a", "b", "report"]);
        assert_eq!(result.steps[0].status, StepStatus::Failed);
        assert_eq!(result.steps[1].status, StepStatus::Succeeded);
        assert_eq!(result.result, RunStatus::Failed);
    }

    #[test]
    fn failed_finalize_does_not_stop_later_steps() {
        let registry = RegistryBuilder::new()
            .handler("p-a", ok)
            .handler("p-report", fail)
            .handler("p-cleanup", ok)
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let workflow = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a"))
            .with_step(
                StepDefinition::new("report")
                    .depends_on(["a"])
                    .with_template(StepTemplate::Finalize),
            )
            .with_step(StepDefinition::new("cleanup").depends_on(["report"]));

        let result = runner.run(&workflow, RunOptions::new("t1"));

        assert_eq!(names(&result), vec!["a", "report", "cleanup"]);
        assert_eq!(result.steps[1].status, StepStatus::Failed);
        assert_eq!(result.steps[2].status, StepStatus::Succeeded);
        assert_eq!(result.result, RunStatus::Failed);
    }

    #[test]
    fn exhausted_step_keeps_last_attempt_updates() {
        let registry = RegistryBuilder::new()
            .handler("p-a", |input: &StepInput, _: &Deps| {
                let mut outcome = StepOutcome::new();
                outcome.set_var("last_attempt", input.attempt);
                if input.attempt == 1 {
                    outcome.set_var("first_only", true);
                }
                outcome.add_error("still broken", "test");
                outcome
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let workflow = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a").with_retries(2));

        let result = runner.run(&workflow, RunOptions::new("t1"));

        assert_eq!(result.steps[0].status, StepStatus::Failed);
        assert_eq!(result.steps[0].attempts, 3);
        assert_eq!(result.final_vars["last_attempt"], json!(3));
        assert!(!result.final_vars.contains_key("first_only"));
    }

    #[test]
    fn missing_handler_does_not_halt_with_finalize() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let registry = RegistryBuilder::new()
            .handler("p-c", move |input: &StepInput, _: &Deps| {
                *sink.lock().unwrap() = input.workflow_result;
                StepOutcome::new()
            })
            .build();
        let runner = WorkflowRunner::new(&registry, Deps::default());
        let workflow = WorkflowDefinition::new("wf", "p")
            .with_step(StepDefinition::new("a"))
            .with_step(
                StepDefinition::new("c")
                    .depends_on(["a"])
                    .with_template(StepTemplate::Finalize),
            );

        let result = runner.run(&workflow, RunOptions::new("t1"));

        assert_eq!(names(&result), vec!["a", "c"]);
        assert_eq!(result.steps[0].status, StepStatus::Failed);
        assert_eq!(result.steps[0].attempts, 0);
        assert_eq!(result.steps[1].status, StepStatus::Succeeded);
        assert_eq!(*seen.lock().unwrap(), Some(RunStatus::Failed));
        assert_eq!(result.result, RunStatus::Failed);
    }
}
