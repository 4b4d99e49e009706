//! Git VCS driver for repo-warden.
//!
//! This crate contributes the configuration side of the built-in `git`
//! driver: what a `[vcs.git]` block may say, what the defaults are, and how
//! per-source overrides stack on top of global values. Source drivers that
//! clone over Git pick the result up through
//! [`ConfigContext::resolve_vcs_config`](config_resolver::ConfigContext::resolve_vcs_config)
//! as a [`GitConfig`].
//!
//! Register the driver with [`driver`]:
//!
//! ```
//! use config_resolver::DriverRegistry;
//!
//! let mut registry = DriverRegistry::new();
//! registry.register_vcs_driver(git_vcs::DRIVER_NAME, git_vcs::driver());
//! assert!(registry.vcs_driver("git").is_some());
//! ```

mod config;

pub use config::{driver, GitConfig, GitConfigLoader, DRIVER_NAME};
