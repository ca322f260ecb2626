//! Version command implementation.
//!
//! `taskkit version` prints the same version as `--version`, in the
//! `taskkit v<version>` form.

use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The version command implementation.
pub struct VersionCommand;

/// Version line printed by the command.
pub fn version_line() -> String {
    format!("taskkit v{}", env!("CARGO_PKG_VERSION"))
}

impl Command for VersionCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        println!("{}", version_line());
        Ok(CommandResult::success())
    }
}
