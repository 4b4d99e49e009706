//! Driver registration for the repo-warden binaries.

use config_resolver::DriverRegistry;

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;

/// Builds the registry of built-in drivers.
///
/// Registration is explicit and happens exactly once per registry value;
/// there is no process-global driver table. Embedders that ship their own
/// drivers layer a child on top with [`DriverRegistry::with_parent`] and
/// register there, shadowing the built-ins where names collide.
pub fn build_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register_vcs_driver(git_vcs::DRIVER_NAME, git_vcs::driver());
    registry.register_source_driver(github_source::DRIVER_NAME, github_source::driver());
    registry
}
