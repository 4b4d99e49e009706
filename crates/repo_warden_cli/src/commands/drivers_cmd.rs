//! Listing of the source and VCS drivers compiled into the daemon.

use std::fmt::Write;

use config_resolver::DriverRegistry;
use tracing::instrument;

use crate::bootstrap::build_registry;

#[cfg(test)]
#[path = "drivers_cmd_tests.rs"]
mod tests;

/// Prints every registered driver with its description.
#[instrument]
pub fn drivers() {
    print!("{}", render_drivers(&build_registry()));
}

fn render_drivers(registry: &DriverRegistry) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "source drivers:");
    for (alias, driver) in registry.source_drivers() {
        let _ = writeln!(out, "  {alias}: {}", driver.description);
    }

    let _ = writeln!(out, "vcs drivers:");
    for (alias, driver) in registry.vcs_drivers() {
        let _ = writeln!(out, "  {alias}: {}", driver.description);
    }

    out
}
