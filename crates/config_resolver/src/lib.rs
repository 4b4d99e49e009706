//! Configuration resolution for the repo-warden daemon.
//!
//! repo-warden reads its configuration from a directory of TOML files. The
//! files declare daemon settings, VCS defaults, and sources of repositories;
//! how a file's blocks are distributed across the directory carries no
//! meaning, and most behavior comes from pluggable *drivers* rather than
//! from this crate. A source driver (GitHub is the built-in one) decides
//! what a source block means; a VCS driver (Git is the built-in one)
//! decides what a `vcs` block means and how overrides stack.
//!
//! [`load`] is the entry point: given a directory and a
//! [`DriverRegistry`], it merges every file, applies defaults, invokes the
//! registered drivers, and returns an immutable [`Config`]. Drivers receive
//! a [`ConfigContext`] that anchors relative paths at the declaring file
//! and exposes the VCS configurations in scope.
//!
//! # Examples
//!
//! ```
//! use config_resolver::{load, DriverRegistry};
//!
//! // A missing directory behaves like an empty one.
//! let registry = DriverRegistry::new();
//! let config = load("/nonexistent/repo-warden/conf.d", &registry)?;
//! assert!(config.sources.is_empty());
//! # Ok::<(), config_resolver::ConfigError>(())
//! ```

mod config;
mod context;
mod driver;
mod errors;
mod paths;
mod registry;
mod resolver;
mod schema;

pub use config::{
    Config, DaemonConfig, Source, CONFIG_EXTENSION, DEFAULT_CLONES_DIR, DEFAULT_DAEMON_SOCKET,
};
pub use context::ConfigContext;
pub use driver::{
    ImplicitSource, SourceConfig, SourceConfigLoader, SourceDriver, VcsConfig, VcsConfigLoader,
    VcsDriver,
};
pub use errors::{ConfigError, ConfigResult};
pub use registry::DriverRegistry;
pub use resolver::load;
