//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use taskkit::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Silent);
//! ui.show_header("smoke-test");
//! ui.success("Workflow succeeded");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockUI, SpinnerEvent};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::{format_duration, format_relative_time};
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme};

use crate::context::Severity;
use crate::runner::{RunResult, RunStatus, StepRecord};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Display a debug message. Shown in verbose mode only.
    fn debug(&mut self, msg: &str);

    /// Start a spinner for a running step.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show the banner at the start of a run.
    fn show_run_header(&mut self, workflow: &str, task_id: &str, step_count: usize);

    /// Show the per-step table and totals at the end of a run.
    fn show_run_summary(&mut self, result: &RunResult);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;

    /// Show the messages a step reported, routed by severity.
    fn show_step_messages(&mut self, record: &StepRecord) {
        if !self.output_mode().shows_step_messages() {
            return;
        }
        for message in &record.messages {
            let text = if message.system.is_empty() {
                format!("  {}", message.text)
            } else {
                format!("  [{}] {}", message.system, message.text)
            };
            match message.severity {
                Severity::Info => self.message(&text),
                Severity::Warning => self.warning(&text),
                Severity::Error => self.error(&text),
                Severity::Debug => self.debug(&text),
            }
        }
    }
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// Render the end-of-run summary box.
pub(crate) fn summary_lines(theme: &Theme, result: &RunResult) -> Vec<String> {
    let b = &theme.border;
    let mut lines = vec![format!(
        "  {} {}",
        b.apply_to("┌─"),
        b.apply_to("Summary ──────────────────────────")
    )];

    for step in &result.steps {
        let mut detail = theme
            .duration
            .apply_to(format_duration(step.duration()))
            .to_string();
        if step.attempts > 1 {
            detail.push_str(&format!(" · {} attempts", step.attempts));
        }
        if let Some(error) = &step.error {
            detail.push_str(&format!(" · {}", theme.dim.apply_to(error)));
        }
        lines.push(format!(
            "  {} {} {:<20} {}",
            b.apply_to("│"),
            theme.step_icon(step.status),
            step.name,
            detail
        ));
    }

    if let Some(message) = &result.error_message {
        lines.push(format!("  {} {}", b.apply_to("│"), theme.error.apply_to(message)));
    }

    lines.push(format!(
        "  {}",
        b.apply_to("├────────────────────────────────────")
    ));
    let step_label = if result.steps.len() == 1 { "step" } else { "steps" };
    lines.push(format!(
        "  {} {} {} {} {} {} {}",
        b.apply_to("│"),
        theme.run_status(result.result),
        theme.dim.apply_to("·"),
        result.steps.len(),
        step_label,
        theme.dim.apply_to("·"),
        theme.duration.apply_to(format_duration(result.duration())),
    ));
    lines.push(format!(
        "  {}",
        b.apply_to("└────────────────────────────────────")
    ));
    lines
}

/// One-line closing status of a run.
pub(crate) fn final_status_line(result: &RunResult) -> String {
    match result.result {
        RunStatus::Succeeded => format!("Workflow '{}' succeeded", result.workflow_name),
        RunStatus::Failed => format!(
            "Workflow '{}' failed: {}",
            result.workflow_name,
            result.failed_steps().join(", ")
        ),
        RunStatus::Error => format!("Workflow '{}' could not run", result.workflow_name),
    }
}
