//! Workflow definitions, loading and dependency resolution.
//!
//! - [`WorkflowDefinition`] / [`StepDefinition`] - the YAML schema
//! - [`load_workflow`] / [`load_params`] - file loading and validation
//! - [`DependencyGraph`] - ordering with cycle detection
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use taskkit::workflow::parse_workflow;
//!
//! let yaml = r#"
//! name: deploy
//! platform: homelab
//! steps:
//!   - name: finalize
//!     depends: [apply]
//!     template: finalize
//!   - name: apply
//! "#;
//!
//! let workflow = parse_workflow(yaml, Path::new("deploy.yaml")).unwrap();
//! let order: Vec<_> = workflow
//!     .execution_order()
//!     .unwrap()
//!     .iter()
//!     .map(|s| s.name.as_str())
//!     .collect();
//! assert_eq!(order, vec!["apply", "finalize"]);
//! assert_eq!(workflow.handler_name(&workflow.steps[1]), "homelab-apply");
//! ```

pub mod definition;
pub mod graph;
pub mod loader;

pub use definition::{StepDefinition, StepTemplate, WorkflowDefinition};
pub use graph::{DependencyGraph, DependencyGraphBuilder};
pub use loader::{load_params, load_workflow, parse_params, parse_workflow};
