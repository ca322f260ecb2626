//! List-handlers command implementation.
//!
//! The `taskkit list-handlers` command prints every registered handler key.

use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list-handlers command implementation.
pub struct ListHandlersCommand<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> ListHandlersCommand<'a> {
    /// Create a new list-handlers command.
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self { registry }
    }
}

impl Command for ListHandlersCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let names = self.registry.list();
        ui.message(&format!("Registered handlers ({}):", names.len()));
        for name in &names {
            ui.message(&format!("  - {}", name));
        }
        Ok(CommandResult::success())
    }
}
