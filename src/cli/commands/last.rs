//! Last command implementation.
//!
//! The `taskkit workflow last` command shows the result persisted by the
//! most recent run in a working directory.

use crate::cli::args::LastArgs;
use crate::error::Result;
use crate::state::Workdir;
use crate::ui::{format_relative_time, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The last command implementation.
pub struct LastCommand {
    args: LastArgs,
}

impl LastCommand {
    /// Create a new last command.
    pub fn new(args: LastArgs) -> Self {
        Self { args }
    }
}

impl Command for LastCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workdir = Workdir::at(&self.args.workdir);

        let Some(result) = workdir.load_result()? else {
            ui.message(&format!(
                "No runs recorded in {}",
                self.args.workdir.display()
            ));
            return Ok(CommandResult::success());
        };

        if self.args.json {
            let text = serde_json::to_string_pretty(&result)
                .map_err(|e| anyhow::anyhow!("failed to encode result: {}", e))?;
            println!("{}", text);
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!("Last run: {}", result.workflow_name));
        ui.message(&format!("  Task:    {}", result.task_id));
        ui.message(&format!(
            "  When:    {} ({})",
            format_relative_time(result.start_time),
            result.start_time.format("%Y-%m-%d %H:%M:%S")
        ));
        ui.message(&format!("  Result:  {}", result.result));
        ui.show_run_summary(&result);

        Ok(CommandResult::success())
    }
}
