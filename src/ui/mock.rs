//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use taskkit::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Starting run");
//! ui.success("Done!");
//!
//! assert_eq!(ui.messages(), ["Starting run"]);
//! assert_eq!(ui.successes(), ["Done!"]);
//! ```

use std::sync::{Arc, Mutex};

use crate::runner::{RunResult, RunStatus};

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    debugs: Vec<String>,
    headers: Vec<String>,
    run_headers: Vec<(String, String, usize)>,
    summaries: Vec<RunStatus>,
    spinners: Arc<Mutex<Vec<SpinnerEvent>>>,
}

/// What happened to a spinner started on a [`MockUI`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinnerEvent {
    Started(String),
    Succeeded(String),
    Failed(String),
    Skipped(String),
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Debug messages that the output mode let through.
    pub fn debugs(&self) -> &[String] {
        &self.debugs
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Run headers as `(workflow, task_id, step_count)`.
    pub fn run_headers(&self) -> &[(String, String, usize)] {
        &self.run_headers
    }

    /// Results of the runs whose summary was shown.
    pub fn summaries(&self) -> &[RunStatus] {
        &self.summaries
    }

    /// Spinner events in the order they happened.
    pub fn spinner_events(&self) -> Vec<SpinnerEvent> {
        self.spinners
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn debug(&mut self, msg: &str) {
        if self.mode.shows_debug() {
            self.debugs.push(msg.to_string());
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let mut spinner = MockSpinner {
            events: Arc::clone(&self.spinners),
        };
        spinner.record(SpinnerEvent::Started(message.to_string()));
        Box::new(spinner)
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_run_header(&mut self, workflow: &str, task_id: &str, step_count: usize) {
        self.run_headers
            .push((workflow.to_string(), task_id.to_string(), step_count));
    }

    fn show_run_summary(&mut self, result: &RunResult) {
        self.summaries.push(result.result);
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner handle that records into its [`MockUI`].
struct MockSpinner {
    events: Arc<Mutex<Vec<SpinnerEvent>>>,
}

impl MockSpinner {
    fn record(&mut self, event: SpinnerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.record(SpinnerEvent::Succeeded(msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.record(SpinnerEvent::Failed(msg.to_string()));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.record(SpinnerEvent::Skipped(msg.to_string()));
    }
}
