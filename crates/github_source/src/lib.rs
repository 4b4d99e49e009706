//! GitHub source driver for repo-warden.
//!
//! A github source watches the repositories of a GitHub instance and clones
//! them over Git. This crate contributes the configuration side: decoding
//! `[source.<name>]` blocks that use the driver, the implicit `github`
//! source that exists without any configuration, and the typed dependency
//! on [`git_vcs::GitConfig`] for the clone settings.
//!
//! The driver requires the `git` VCS driver to be registered in the same
//! registry; its configuration is resolved by type through the context,
//! and registration without it fails at load time.
//!
//! ```
//! use config_resolver::{load, DriverRegistry};
//!
//! let mut registry = DriverRegistry::new();
//! registry.register_vcs_driver(git_vcs::DRIVER_NAME, git_vcs::driver());
//! registry.register_source_driver(github_source::DRIVER_NAME, github_source::driver());
//!
//! // With no configuration at all, the implicit github.com source exists.
//! let config = load("/nonexistent/repo-warden/conf.d", &registry)?;
//! let github = config.source("github").expect("implicit source");
//! let settings = github.driver_config_as::<github_source::GitHubConfig>().unwrap();
//! assert_eq!(settings.domain, "github.com");
//! # Ok::<(), config_resolver::ConfigError>(())
//! ```

mod config;

pub use config::{driver, GitHubConfig, GitHubConfigLoader, DEFAULT_DOMAIN, DRIVER_NAME};
