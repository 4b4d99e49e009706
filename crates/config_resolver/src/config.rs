//! The resolved configuration handed to the daemon.
//!
//! Everything here is the *output* side of resolution: defaults applied,
//! paths absolute, every source carrying a finalized driver configuration.
//! Values are plain data; nothing refers back to the files or the registry
//! that produced them, so a [`Config`] can be held for the life of the
//! process and compared against a freshly loaded one.

use std::path::PathBuf;

use crate::driver::SourceConfig;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Control socket path used when no `[daemon]` block sets one.
pub const DEFAULT_DAEMON_SOCKET: &str = "~/.repo-warden/daemon.sock";

/// Clone directory used when no `[clones]` block sets one.
pub const DEFAULT_CLONES_DIR: &str = "~/repo-warden";

/// Extension a file must carry to be read from a configuration directory.
pub const CONFIG_EXTENSION: &str = "toml";

/// Daemon-level settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Absolute path of the daemon's control socket.
    pub socket: PathBuf,
}

/// One resolved source of repositories.
#[derive(Clone, Debug)]
pub struct Source {
    /// The source name, unique case-insensitively across the configuration.
    pub name: String,

    /// Whether the daemon acts on this source.
    pub enabled: bool,

    /// Absolute directory this source's clones live under.
    pub clone_dir: PathBuf,

    /// The source driver's configuration value.
    pub driver_config: Box<dyn SourceConfig>,
}

impl Source {
    /// The driver configuration downcast to its concrete type.
    ///
    /// Returns `None` when the source was produced by a different driver
    /// than the one `T` belongs to.
    pub fn driver_config_as<T: SourceConfig>(&self) -> Option<&T> {
        self.driver_config.as_any().downcast_ref()
    }
}

/// A fully resolved configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Daemon-level settings.
    pub daemon: DaemonConfig,

    /// Every configured source, sorted by lowercased name.
    pub sources: Vec<Source>,
}

impl Config {
    /// Looks up a source by name, case-insensitively.
    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources
            .iter()
            .find(|source| source.name.eq_ignore_ascii_case(name))
    }
}
