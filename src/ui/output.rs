//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Everything, including debug-severity step messages.
    Verbose,
    /// Progress, step messages and the summary.
    #[default]
    Normal,
    /// Spinners and the final status only.
    Quiet,
    /// Nothing except errors.
    Silent,
}

impl OutputMode {
    /// Check if this mode shows debug-severity messages.
    pub fn shows_debug(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows per-step messages.
    pub fn shows_step_messages(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}
