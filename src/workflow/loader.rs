//! Workflow and parameter file loading.

use std::fs;
use std::path::Path;

use crate::context::ValueMap;
use crate::error::{Result, TaskkitError};

use super::definition::WorkflowDefinition;

/// Load and validate a workflow YAML file.
///
/// # Errors
///
/// Returns `WorkflowNotFound` if the file doesn't exist.
/// Returns `WorkflowParseError` if the YAML is invalid.
/// Returns `WorkflowValidationError` if the name is missing or there are no steps.
pub fn load_workflow(path: &Path) -> Result<WorkflowDefinition> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TaskkitError::WorkflowNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TaskkitError::Io(e)
        }
    })?;

    parse_workflow(&content, path)
}

/// Parse and validate workflow YAML content.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_workflow(content: &str, source_path: &Path) -> Result<WorkflowDefinition> {
    let workflow: WorkflowDefinition =
        serde_yaml::from_str(content).map_err(|e| TaskkitError::WorkflowParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    workflow.validate()?;
    tracing::debug!(
        "Loaded workflow '{}' with {} steps from {}",
        workflow.name,
        workflow.steps.len(),
        source_path.display()
    );
    Ok(workflow)
}

/// Load run-level parameters from a JSON object file.
///
/// No path means no parameters.
pub fn load_params(path: Option<&Path>) -> Result<ValueMap> {
    let Some(path) = path else {
        return Ok(ValueMap::new());
    };

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TaskkitError::ParamsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TaskkitError::Io(e)
        }
    })?;

    parse_params(&content, path)
}

/// Parse a JSON object into a parameter map.
pub fn parse_params(content: &str, source_path: &Path) -> Result<ValueMap> {
    serde_json::from_str(content).map_err(|e| TaskkitError::ParamsParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
