//! Error types for taskkit operations.
//!
//! This module defines [`TaskkitError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `TaskkitError` for load-time and structural errors that callers must handle
//! - Use `anyhow::Error` (via `TaskkitError::Other`) for unexpected errors
//! - Handler failures are never errors here: they are error-severity messages
//!   inside a [`StepOutcome`](crate::context::StepOutcome)

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskkit operations.
#[derive(Debug, Error)]
pub enum TaskkitError {
    /// Workflow definition file not found.
    #[error("Workflow not found: {path}")]
    WorkflowNotFound { path: PathBuf },

    /// Failed to parse the workflow definition.
    #[error("Failed to parse workflow at {path}: {message}")]
    WorkflowParseError { path: PathBuf, message: String },

    /// Workflow definition is structurally invalid (missing name, no steps).
    #[error("Invalid workflow: {message}")]
    WorkflowValidationError { message: String },

    /// Parameter file not found.
    #[error("Params file not found: {path}")]
    ParamsNotFound { path: PathBuf },

    /// Parameter file is not a JSON object.
    #[error("Failed to parse params at {path}: {message}")]
    ParamsParseError { path: PathBuf, message: String },

    /// A step depends on a step that is not part of the workflow.
    #[error("Step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency { step: String, dependency: String },

    /// Two steps share the same name.
    #[error("Duplicate step name: {name}")]
    DuplicateStep { name: String },

    /// Step dependency cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Reading or writing work-area files failed.
    #[error("Failed to persist {what} at {path}: {message}")]
    Persistence {
        what: String,
        path: PathBuf,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskkitError {
    /// Whether this error comes from ordering the step graph.
    ///
    /// Resolution errors still produce a run record; load errors do not.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            TaskkitError::UnknownDependency { .. }
                | TaskkitError::DuplicateStep { .. }
                | TaskkitError::CircularDependency { .. }
        )
    }
}

/// Result type alias for taskkit operations.
pub type Result<T> = std::result::Result<T, TaskkitError>;
