//! Data exchanged between the runner and step handlers.
//!
//! - [`StepInput`] - what a handler sees for one attempt
//! - [`StepOutcome`] - what a handler hands back
//! - [`Value`] / [`ValueMap`] - dynamic parameter and variable values
//!
//! Handlers never touch the runner's shared variables directly. They get a
//! snapshot in [`StepInput::vars`] and request changes through
//! [`StepOutcome::set_var`].

pub mod input;
pub mod outcome;

pub use input::StepInput;
pub use outcome::{FlowControl, Message, Severity, StepOutcome};

use std::collections::BTreeMap;

/// Dynamic value for parameters, variables and outputs.
///
/// A tagged union of null, bool, number, string, sequence and mapping.
pub type Value = serde_json::Value;

/// Ordered mapping from key to [`Value`].
pub type ValueMap = BTreeMap<String, Value>;

/// Overlay step-local parameters on top of run-level ones.
///
/// Keys present in both take the step value. Nested mappings are replaced,
/// not merged.
pub fn merge_params(global: &ValueMap, step: &ValueMap) -> ValueMap {
    let mut merged = global.clone();
    for (key, value) in step {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Write each context update into the shared variables, overwriting existing keys.
pub fn apply_updates(vars: &mut ValueMap, updates: &ValueMap) {
    for (key, value) in updates {
        vars.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn merge_params_step_overrides_global() {
        let global = map(&[("region", json!("eu")), ("replicas", json!(2))]);
        let step = map(&[("replicas", json!(5))]);

        let merged = merge_params(&global, &step);

        assert_eq!(merged["region"], json!("eu"));
        assert_eq!(merged["replicas"], json!(5));
    }

    #[test]
    fn merge_params_does_not_deep_merge() {
        let global = map(&[("db", json!({"host": "a", "port": 5432}))]);
        let step = map(&[("db", json!({"host": "b"}))]);

        let merged = merge_params(&global, &step);

        assert_eq!(merged["db"], json!({"host": "b"}));
    }

    #[test]
    fn merge_params_leaves_inputs_untouched() {
        let global = map(&[("a", json!(1))]);
        let step = map(&[("a", json!(2))]);

        let _ = merge_params(&global, &step);

        assert_eq!(global["a"], json!(1));
    }

    #[test]
    fn apply_updates_overwrites_and_adds() {
        let mut vars = map(&[("status", json!("pending")), ("keep", json!(true))]);
        let updates = map(&[("status", json!("done")), ("count", json!(3))]);

        apply_updates(&mut vars, &updates);

        assert_eq!(vars["status"], json!("done"));
        assert_eq!(vars["count"], json!(3));
        assert_eq!(vars["keep"], json!(true));
    }
}
