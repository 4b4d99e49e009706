//! Configuration directory selection for the repo-warden CLI.
//!
//! The CLI reads the same directory the daemon does. Selection order: the
//! `--config-dir` flag, then the `REPO_WARDEN_CONFIG_DIR` environment
//! variable, then the default under the user's home. Tilde expansion is
//! left to the resolver, which handles it for every directory argument.

use std::env;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Directory read when neither the flag nor the environment names one.
pub const DEFAULT_CONFIG_DIR: &str = "~/.config/repo-warden";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "REPO_WARDEN_CONFIG_DIR";

/// Selects the configuration directory.
///
/// Empty values are treated as unset so that `--config-dir ""` or an empty
/// environment variable fall through instead of pointing resolution at the
/// current directory.
pub fn config_dir(flag: Option<&str>) -> String {
    if let Some(dir) = flag {
        if !dir.is_empty() {
            return dir.to_string();
        }
    }
    match env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => dir,
        _ => DEFAULT_CONFIG_DIR.to_string(),
    }
}
