//! The step handler contract.

use std::path::{Path, PathBuf};

use crate::context::{StepInput, StepOutcome};

/// Resources a handler may use besides its input.
#[derive(Debug, Clone, Default)]
pub struct Deps {
    workdir: PathBuf,
}

impl Deps {
    /// Create deps rooted at the given work directory.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Directory where the run keeps its files.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

/// A unit of step logic, looked up by name at run time.
///
/// Handlers report failure through error-severity messages in the returned
/// [`StepOutcome`], never by panicking or returning `Err`. Closures and plain
/// functions with the right signature implement this trait automatically.
pub trait StepHandler: Send + Sync {
    /// Run one attempt of the step.
    fn handle(&self, input: &StepInput, deps: &Deps) -> StepOutcome;
}

impl<F> StepHandler for F
where
    F: Fn(&StepInput, &Deps) -> StepOutcome + Send + Sync,
{
    fn handle(&self, input: &StepInput, deps: &Deps) -> StepOutcome {
        self(input, deps)
    }
}
