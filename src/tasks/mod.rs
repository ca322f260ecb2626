//! Bundled step handlers.
//!
//! Handler sets are registered explicitly on a [`RegistryBuilder`] at
//! startup; nothing registers itself.


use crate::registry::RegistryBuilder;

/// Register every bundled handler set.
pub fn register_builtin(builder: &mut RegistryBuilder) {
    smoke_test::register(builder);
}
