//! Run command implementation.
//!
//! The `taskkit workflow run` command executes a workflow file against a
//! working directory and exits with the run's status code.

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::runner::{LocalRunner, LocalRunnerConfig, RunProgress, RunStatus, StepStatus};
use crate::ui::{final_status_line, format_duration, SpinnerHandle, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand<'a> {
    args: RunArgs,
    registry: &'a HandlerRegistry,
}

impl<'a> RunCommand<'a> {
    /// Create a new run command.
    pub fn new(args: RunArgs, registry: &'a HandlerRegistry) -> Self {
        Self { args, registry }
    }

    fn config(&self) -> LocalRunnerConfig {
        LocalRunnerConfig {
            workflow_path: self.args.workflow.clone(),
            params_path: self.args.params.clone(),
            workdir: self.args.workdir.clone(),
            task_id: self.args.task_id.clone(),
        }
    }
}

impl Command for RunCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runner = LocalRunner::new(self.config(), self.registry)?;
        let workflow = runner.workflow();

        ui.show_run_header(&workflow.name, runner.task_id(), workflow.steps.len());
        if let Some(seconds) = workflow.timeout_seconds {
            ui.debug(&format!("Advisory timeout: {}s (not enforced)", seconds));
        }

        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;
        let result = runner.run_with_progress(|progress| match progress {
            RunProgress::StepStarting {
                name,
                handler,
                index,
                total,
            } => {
                let label = format!("[{}/{}] {} ({})", index + 1, total, name, handler);
                spinner = Some(ui.start_spinner(&label));
            }
            RunProgress::AttemptFailed {
                name,
                attempt,
                max_attempts,
            } => {
                if let Some(spinner) = spinner.as_mut() {
                    spinner.set_message(&format!(
                        "{} retrying (attempt {}/{})",
                        name,
                        attempt + 1,
                        max_attempts
                    ));
                }
            }
            RunProgress::StepFinished { record } => {
                if let Some(mut spinner) = spinner.take() {
                    let duration = format_duration(record.duration());
                    match record.status {
                        StepStatus::Succeeded => {
                            spinner.finish_success(&format!("{} ({})", record.name, duration))
                        }
                        StepStatus::Skipped => spinner.finish_skipped(&format!(
                            "{} skipped{}",
                            record.name,
                            record
                                .error
                                .as_deref()
                                .map(|reason| format!(": {}", reason))
                                .unwrap_or_default()
                        )),
                        StepStatus::Failed => spinner.finish_error(&format!(
                            "{} failed after {} attempt(s) ({})",
                            record.name, record.attempts, duration
                        )),
                    }
                }
                ui.show_step_messages(record);
            }
        });

        if let Some(message) = &result.error_message {
            ui.error(message);
        }
        ui.show_run_summary(&result);

        let status_line = final_status_line(&result);
        if result.is_success() {
            ui.success(&status_line);
        } else {
            ui.error(&status_line);
        }
        ui.debug(&format!(
            "Result written to {}",
            runner.workdir().result_file().display()
        ));

        Ok(match result.result {
            RunStatus::Succeeded => CommandResult::success(),
            status => CommandResult::failure(status.exit_code()),
        })
    }
}
