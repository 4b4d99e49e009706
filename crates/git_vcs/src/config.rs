//! Git driver configuration: defaults, override merging, validation.

use std::path::PathBuf;
use std::sync::Arc;

use config_resolver::{
    ConfigContext, ConfigError, ConfigResult, VcsConfig, VcsConfigLoader, VcsDriver,
};
use serde::Deserialize;
use tracing::debug;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// The driver implementation name, used for registration and for
/// type-directed lookups from source drivers.
pub const DRIVER_NAME: &str = "git";

/// How repo-warden talks to Git remotes.
///
/// The zero value is usable as-is: SSH clone URLs with whatever keys the
/// ambient SSH configuration provides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfig {
    /// Prefer HTTPS clone URLs over SSH ones.
    pub prefer_http: bool,

    /// Private key used for SSH clones, absolute once resolved.
    pub ssh_key_file: Option<PathBuf>,

    /// Passphrase unlocking [`ssh_key_file`](Self::ssh_key_file).
    pub ssh_key_passphrase: Option<String>,
}

impl VcsConfig for GitConfig {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn clone_box(&self) -> Box<dyn VcsConfig> {
        Box::new(self.clone())
    }
}

/// The body of a `[vcs.git]` block.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GitBlock {
    prefer_http: Option<bool>,
    ssh_key_file: Option<String>,
    ssh_key_passphrase: Option<String>,
}

/// Configuration loader of the git driver.
#[derive(Debug, Default)]
pub struct GitConfigLoader;

impl VcsConfigLoader for GitConfigLoader {
    fn defaults(&self, _ctx: &ConfigContext<'_>) -> ConfigResult<Box<dyn VcsConfig>> {
        Ok(Box::new(GitConfig::default()))
    }

    /// Field-wise replacement on a clone of the base. An empty string
    /// clears `ssh_key_file` or `ssh_key_passphrase` back to unset, which
    /// is how a source opts out of an inherited key.
    fn merge(
        &self,
        ctx: &ConfigContext<'_>,
        base: &dyn VcsConfig,
        body: toml::Table,
    ) -> ConfigResult<Box<dyn VcsConfig>> {
        let base = base
            .as_any()
            .downcast_ref::<GitConfig>()
            .ok_or_else(|| ConfigError::Decode {
                driver: DRIVER_NAME.to_string(),
                message: "the inherited value is not a git configuration".to_string(),
            })?;
        let block: GitBlock =
            toml::Value::Table(body)
                .try_into()
                .map_err(|error| ConfigError::Decode {
                    driver: DRIVER_NAME.to_string(),
                    message: error.to_string(),
                })?;

        let mut merged = base.clone();
        if let Some(prefer_http) = block.prefer_http {
            merged.prefer_http = prefer_http;
        }
        if let Some(raw) = block.ssh_key_file {
            merged.ssh_key_file = if raw.is_empty() {
                None
            } else {
                Some(ctx.normalize_path(&raw)?)
            };
        }
        if let Some(passphrase) = block.ssh_key_passphrase {
            merged.ssh_key_passphrase = if passphrase.is_empty() {
                None
            } else {
                Some(passphrase)
            };
        }

        // Validated on the composed value, so a passphrase may come from
        // the global block and the key from an override, or vice versa.
        if merged.ssh_key_passphrase.is_some() && merged.ssh_key_file.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "ssh_key_passphrase".to_string(),
                reason: "requires ssh_key_file to be set".to_string(),
            });
        }

        debug!(
            message = "merged git configuration",
            prefer_http = merged.prefer_http,
            has_ssh_key = merged.ssh_key_file.is_some(),
        );
        Ok(Box::new(merged))
    }
}

/// The `git` driver registration.
pub fn driver() -> VcsDriver {
    VcsDriver::new(
        DRIVER_NAME,
        "clones and updates repositories with git",
        Arc::new(GitConfigLoader),
    )
}
