//! Driver registration and alias lookup.
//!
//! A [`DriverRegistry`] maps aliases to drivers. Registries form chains:
//! [`DriverRegistry::with_parent`] captures an immutable snapshot of the
//! parent's registrations, and aliases registered on the child shadow the
//! parent's entry for the same alias without mutating it. This is how an
//! embedding application swaps a built-in driver for its own while daemon
//! code keeps resolving against one registry value.
//!
//! Aliases are independent per driver kind: a source driver and a VCS
//! driver may share the alias `git` without conflict. Several aliases may
//! point at the same driver, and the alias, not the driver name, is what
//! configuration files reference.

use std::collections::{BTreeMap, HashMap};

use crate::driver::{SourceDriver, VcsDriver};

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

/// One level of registrations in a registry chain.
#[derive(Clone, Debug, Default)]
struct Layer {
    sources: HashMap<String, SourceDriver>,
    vcs: HashMap<String, VcsDriver>,
}

/// An alias-to-driver mapping with parent/child shadowing.
///
/// # Examples
///
/// ```
/// use config_resolver::DriverRegistry;
///
/// let registry = DriverRegistry::new();
/// assert!(registry.source_aliases().is_empty());
/// assert!(registry.vcs_aliases().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct DriverRegistry {
    /// Snapshots of ancestor registrations, outermost first.
    inherited: Vec<Layer>,

    /// Registrations made on this registry.
    local: Layer,
}

impl DriverRegistry {
    /// Creates an empty registry with no parent.
    pub fn new() -> Self {
        Self {
            inherited: Vec::new(),
            local: Layer::default(),
        }
    }

    /// Creates a registry that inherits every registration of `parent`.
    ///
    /// The parent's registrations are captured at call time; later changes
    /// to either registry are invisible to the other. Registering an alias
    /// the parent also carries shadows the parent's entry.
    pub fn with_parent(parent: &DriverRegistry) -> Self {
        let mut inherited = parent.inherited.clone();
        inherited.push(parent.local.clone());
        Self {
            inherited,
            local: Layer::default(),
        }
    }

    /// Registers a source driver under `alias`.
    ///
    /// # Panics
    ///
    /// Panics when `alias` was already registered on this registry. Shadowing
    /// an inherited alias is allowed; registering one alias twice on the same
    /// registry is a programming error.
    pub fn register_source_driver(&mut self, alias: impl Into<String>, driver: SourceDriver) {
        let alias = alias.into();
        if self.local.sources.contains_key(&alias) {
            panic!("source driver alias \"{alias}\" is already registered");
        }
        self.local.sources.insert(alias, driver);
    }

    /// Registers a VCS driver under `alias`.
    ///
    /// # Panics
    ///
    /// Panics when `alias` was already registered on this registry. Shadowing
    /// an inherited alias is allowed; registering one alias twice on the same
    /// registry is a programming error.
    pub fn register_vcs_driver(&mut self, alias: impl Into<String>, driver: VcsDriver) {
        let alias = alias.into();
        if self.local.vcs.contains_key(&alias) {
            panic!("VCS driver alias \"{alias}\" is already registered");
        }
        self.local.vcs.insert(alias, driver);
    }

    /// Looks up the source driver registered under `alias`.
    ///
    /// Local registrations win over inherited ones; among inherited layers
    /// the innermost wins.
    pub fn source_driver(&self, alias: &str) -> Option<&SourceDriver> {
        if let Some(driver) = self.local.sources.get(alias) {
            return Some(driver);
        }
        self.inherited
            .iter()
            .rev()
            .find_map(|layer| layer.sources.get(alias))
    }

    /// Looks up the VCS driver registered under `alias`.
    pub fn vcs_driver(&self, alias: &str) -> Option<&VcsDriver> {
        if let Some(driver) = self.local.vcs.get(alias) {
            return Some(driver);
        }
        self.inherited
            .iter()
            .rev()
            .find_map(|layer| layer.vcs.get(alias))
    }

    /// Every visible source driver, keyed by alias in sorted order.
    ///
    /// Shadowed entries are omitted: one alias maps to the driver the
    /// innermost registration put there.
    pub fn source_drivers(&self) -> BTreeMap<String, SourceDriver> {
        let mut merged = BTreeMap::new();
        for layer in &self.inherited {
            for (alias, driver) in &layer.sources {
                merged.insert(alias.clone(), driver.clone());
            }
        }
        for (alias, driver) in &self.local.sources {
            merged.insert(alias.clone(), driver.clone());
        }
        merged
    }

    /// Every visible VCS driver, keyed by alias in sorted order.
    pub fn vcs_drivers(&self) -> BTreeMap<String, VcsDriver> {
        let mut merged = BTreeMap::new();
        for layer in &self.inherited {
            for (alias, driver) in &layer.vcs {
                merged.insert(alias.clone(), driver.clone());
            }
        }
        for (alias, driver) in &self.local.vcs {
            merged.insert(alias.clone(), driver.clone());
        }
        merged
    }

    /// The visible source driver aliases, sorted.
    pub fn source_aliases(&self) -> Vec<String> {
        self.source_drivers().into_keys().collect()
    }

    /// The visible VCS driver aliases, sorted.
    pub fn vcs_aliases(&self) -> Vec<String> {
        self.vcs_drivers().into_keys().collect()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
