//! What a step handler returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Value, ValueMap};

/// Severity of a step message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Debug,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Debug => "DEBUG",
        };
        write!(f, "{}", s)
    }
}

/// A message emitted by a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
    /// Subsystem that produced the message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(severity: Severity, text: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            system: system.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Flow-control directive returned by a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FlowControl {
    /// Normal completion; the runner judges success from the messages.
    #[default]
    Continue,
    /// Deliberately not executed. No further attempts are made.
    Skip {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl FlowControl {
    /// Whether this directive skips the step.
    pub fn is_skip(&self) -> bool {
        matches!(self, FlowControl::Skip { .. })
    }
}

/// Result of one handler invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Messages in emission order.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Variables to merge into the run's shared context.
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub context_updates: ValueMap,

    /// Step-local output, recorded but not shared with later steps.
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub output: ValueMap,

    #[serde(default)]
    pub flow: FlowControl,
}

impl StepOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn add_message(
        &mut self,
        severity: Severity,
        text: impl Into<String>,
        system: impl Into<String>,
    ) {
        self.messages.push(Message::new(severity, text, system));
    }

    pub fn add_info(&mut self, text: impl Into<String>, system: impl Into<String>) {
        self.add_message(Severity::Info, text, system);
    }

    pub fn add_warning(&mut self, text: impl Into<String>, system: impl Into<String>) {
        self.add_message(Severity::Warning, text, system);
    }

    /// Append an error message. Any error marks the attempt as failed.
    pub fn add_error(&mut self, text: impl Into<String>, system: impl Into<String>) {
        self.add_message(Severity::Error, text, system);
    }

    pub fn add_debug(&mut self, text: impl Into<String>, system: impl Into<String>) {
        self.add_message(Severity::Debug, text, system);
    }

    /// Whether any message has error severity.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    /// First error message text, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.severity == Severity::Error)
            .map(|m| m.text.as_str())
    }

    /// Request a shared variable update.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.context_updates.insert(key.into(), value.into());
    }

    /// Record a step-local output value.
    pub fn set_output(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.output.insert(key.into(), value.into());
    }

    /// Mark the step as skipped.
    pub fn skip(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.flow = FlowControl::Skip {
            reason: if reason.is_empty() { None } else { Some(reason) },
        };
    }
}
