//! Non-interactive UI for CI/headless environments.

use crate::runner::RunResult;

use super::{summary_lines, OutputMode, SpinnerHandle, Theme, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Plain text, no spinners. Warnings and errors go to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: Theme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: Theme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn debug(&mut self, msg: &str) {
        if self.mode.shows_debug() {
            println!("{}", self.theme.format_debug(msg));
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("{}", message);
        }
        Box::new(LineSpinner {
            mode: self.mode,
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", self.theme.format_header(title));
        }
    }

    fn show_run_header(&mut self, workflow: &str, task_id: &str, step_count: usize) {
        if self.mode.shows_status() {
            let step_label = if step_count == 1 { "step" } else { "steps" };
            println!(
                "\n{} · {} {} · task {}\n",
                self.theme.format_header(workflow),
                step_count,
                step_label,
                task_id
            );
        }
    }

    fn show_run_summary(&mut self, result: &RunResult) {
        if !self.mode.shows_status() {
            return;
        }
        println!();
        for line in summary_lines(&self.theme, result) {
            println!("{}", line);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints the final line only.
struct LineSpinner {
    mode: OutputMode,
    theme: Theme,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("  {}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  {}", self.theme.format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("  {}", self.theme.format_skipped(msg));
        }
    }
}
