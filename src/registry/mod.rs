//! Step handler registry.
//!
//! The [`HandlerRegistry`] maps handler names to [`StepHandler`]
//! implementations. It is built once during startup, usually through a
//! [`RegistryBuilder`], and then shared read-only with the runner.
//!
//! # Example
//!
//! ```
//! use taskkit::context::{StepInput, StepOutcome};
//! use taskkit::registry::{Deps, RegistryBuilder};
//!
//! fn ping(_input: &StepInput, _deps: &Deps) -> StepOutcome {
//!     let mut outcome = StepOutcome::new();
//!     outcome.add_info("pong", "net");
//!     outcome
//! }
//!
//! let registry = RegistryBuilder::new().handler("net-ping", ping).build();
//! assert_eq!(registry.list(), vec!["net-ping"]);
//! assert!(registry.lookup("net-ping").is_some());
//! ```

pub mod handler;

pub use handler::{Deps, StepHandler};

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of named step handlers.
///
/// Reads and writes are guarded by a reader/writer lock so handlers can be
/// registered from several initialization paths while a run looks them up.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn StepHandler>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`.
    ///
    /// # Panics
    ///
    /// Panics if a handler with the same name is already registered. Handler
    /// names are fixed at startup, so a clash is a programming error.
    pub fn register(&self, name: impl Into<String>, handler: impl StepHandler + 'static) {
        let handler: Arc<dyn StepHandler> = Arc::new(handler);
        self.register_arc(name.into(), handler);
    }

    fn register_arc(&self, name: String, handler: Arc<dyn StepHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if handlers.contains_key(&name) {
            panic!("step handler already registered: {}", name);
        }
        tracing::debug!("Registered step handler '{}'", name);
        handlers.insert(name, handler);
    }

    /// Look up a handler by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn StepHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Check whether a handler is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// All registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of registered handlers.
    pub fn count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.list())
            .finish()
    }
}

/// Accumulates handler bindings before the registry is created.
#[derive(Default)]
pub struct RegistryBuilder {
    bindings: Vec<(String, Arc<dyn StepHandler>)>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler binding.
    pub fn handler(mut self, name: impl Into<String>, handler: impl StepHandler + 'static) -> Self {
        self.add(name, handler);
        self
    }

    /// Add a handler binding in place.
    pub fn add(&mut self, name: impl Into<String>, handler: impl StepHandler + 'static) {
        let handler: Arc<dyn StepHandler> = Arc::new(handler);
        self.bindings.push((name.into(), handler));
    }

    /// Build the registry.
    ///
    /// # Panics
    ///
    /// Panics if two bindings share a name.
    pub fn build(self) -> HandlerRegistry {
        let registry = HandlerRegistry::new();
        for (name, handler) in self.bindings {
            registry.register_arc(name, handler);
        }
        registry
    }
}
