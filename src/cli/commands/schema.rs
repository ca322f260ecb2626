//! Schema command implementation.
//!
//! The `taskkit schema` command prints the JSON Schema of workflow files,
//! for editor completion and validation.

use schemars::schema_for;
use serde_json::Value;

use crate::error::Result;
use crate::ui::UserInterface;
use crate::workflow::WorkflowDefinition;

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand;

/// JSON Schema of the workflow file format.
pub fn workflow_schema() -> Value {
    schema_for!(WorkflowDefinition).to_value()
}

impl Command for SchemaCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let text = serde_json::to_string_pretty(&workflow_schema())
            .map_err(|e| anyhow::anyhow!("failed to encode schema: {}", e))?;
        println!("{}", text);
        Ok(CommandResult::success())
    }
}
