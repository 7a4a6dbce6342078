//! The effective option set for one recipe invocation.
//!
//! Options start from the recipe's declarations and defaults, take command
//! line overrides, and are then mutated in place by the `config_options`
//! and `configure` stages (which may *remove* options that do not apply,
//! e.g. `fPIC` on Windows or for shared builds). After configure the set is
//! only read.

use std::collections::BTreeMap;

use ztpack_schema::OptionDecl;

use crate::error::StageError;

/// Effective boolean options, validated against their declarations.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    values: BTreeMap<String, bool>,
    declared: BTreeMap<String, Vec<bool>>,
}

impl OptionSet {
    /// Build the initial set from recipe declarations: every declared
    /// option is present at its default value.
    pub fn from_declarations(decls: &BTreeMap<String, OptionDecl>) -> Self {
        let values = decls
            .iter()
            .map(|(name, decl)| (name.clone(), decl.default))
            .collect();
        let declared = decls
            .iter()
            .map(|(name, decl)| (name.clone(), decl.values.clone()))
            .collect();
        Self { values, declared }
    }

    /// Override an option's value.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnknownOption`] for an undeclared option, or
    /// [`StageError::InvalidOptionValue`] for a value outside the option's
    /// declared values.
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), StageError> {
        let Some(allowed) = self.declared.get(name) else {
            return Err(StageError::UnknownOption(name.to_string()));
        };
        if !allowed.contains(&value) {
            return Err(StageError::InvalidOptionValue {
                name: name.to_string(),
                value,
            });
        }
        // The option may have been removed earlier in the lifecycle; an
        // override only lands while it is still active.
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Remove an option from the active set if present. Removing an absent
    /// option is not an error.
    pub fn rm_safe(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    /// Current value of an active option.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// Whether the option is active and set to `true`.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name) == Some(true)
    }

    /// Whether the option is still in the active set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over the active options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
