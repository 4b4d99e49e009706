//! Configuration commands: `check` and `show`.

use std::fmt::Write;

use config_resolver::Config;
use tracing::{info, instrument};

use crate::bootstrap::build_registry;
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Resolve the configuration and report the outcome.
#[instrument]
pub fn check(config_dir: &str) -> Result<(), Error> {
    let registry = build_registry();
    let config = config_resolver::load(config_dir, &registry)?;

    info!(
        message = "configuration resolved",
        sources = config.sources.len(),
    );
    println!(
        "configuration ok: {} source(s), daemon socket {}",
        config.sources.len(),
        config.daemon.socket.display()
    );
    Ok(())
}

/// Resolve the configuration and print it.
#[instrument]
pub fn show(config_dir: &str, verbose: bool) -> Result<(), Error> {
    let registry = build_registry();
    let config = config_resolver::load(config_dir, &registry)?;

    print!("{}", render_config(&config, verbose));
    Ok(())
}

fn render_config(config: &Config, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "daemon socket: {}", config.daemon.socket.display());
    for source in &config.sources {
        let state = if source.enabled { "enabled" } else { "disabled" };
        let _ = writeln!(out, "source {} ({state})", source.name);
        let _ = writeln!(out, "  clones: {}", source.clone_dir.display());
        if verbose {
            let _ = writeln!(out, "  driver: {:?}", source.driver_config);
        }
    }
    out
}
