//! Driver capability traits and registration records.
//!
//! A driver contributes configuration behavior, not configuration data: the
//! resolver never looks inside a driver's config value, it only carries the
//! value from the loader that produced it to the [`Config`](crate::Config)
//! handed to the daemon. Two driver kinds exist:
//!
//! * **Source drivers** (GitHub, ...) decode the driver-specific body of a
//!   `source` block into a typed value and may contribute implicit sources
//!   that exist without any user configuration.
//! * **VCS drivers** (Git, ...) provide a default configuration and know how
//!   to merge an override block on top of an existing value, which is how
//!   the global-default → per-source override composition works without the
//!   resolver knowing any driver's config shape.
//!
//! Config values are type-erased behind [`SourceConfig`]/[`VcsConfig`] and
//! recovered by concrete type at the plugin boundary (see
//! [`ConfigContext::resolve_vcs_config`]). Implementations live outside this
//! crate; the `git_vcs` and `github_source` crates are the built-in ones.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ConfigContext;
use crate::errors::ConfigResult;

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;

/// A type-erased source driver configuration value.
///
/// Implemented by the concrete config type of every source driver. The two
/// methods exist so the resolver can clone configs it does not know the
/// shape of, and so consumers can get the typed value back.
///
/// # Examples
///
/// ```
/// use std::any::Any;
/// use config_resolver::SourceConfig;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct ExampleConfig {
///     url: String,
/// }
///
/// impl SourceConfig for ExampleConfig {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn clone_box(&self) -> Box<dyn SourceConfig> {
///         Box::new(self.clone())
///     }
/// }
///
/// let boxed: Box<dyn SourceConfig> = Box::new(ExampleConfig {
///     url: "https://example.com".to_string(),
/// });
/// let typed = boxed.as_any().downcast_ref::<ExampleConfig>().unwrap();
/// assert_eq!(typed.url, "https://example.com");
/// ```
pub trait SourceConfig: fmt::Debug + Send + Sync + 'static {
    /// The value as `Any`, for downcasting to the concrete config type.
    fn as_any(&self) -> &dyn Any;

    /// Clones the value behind the trait object.
    fn clone_box(&self) -> Box<dyn SourceConfig>;
}

impl Clone for Box<dyn SourceConfig> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A type-erased VCS driver configuration value.
///
/// The resolver treats these as opaque: it stores them tagged with the
/// driver name that produced them and hands them back to that driver's
/// [`VcsConfigLoader::merge`], or to source drivers through the
/// type-directed [`ConfigContext::resolve_vcs_config`] lookup.
pub trait VcsConfig: fmt::Debug + Send + Sync + 'static {
    /// The value as `Any`, for downcasting to the concrete config type.
    fn as_any(&self) -> &dyn Any;

    /// Clones the value behind the trait object.
    fn clone_box(&self) -> Box<dyn VcsConfig>;
}

impl Clone for Box<dyn VcsConfig> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A source contributed by a driver instead of by user configuration.
///
/// Implicit sources let a driver exist out of the box; the GitHub driver
/// contributes a `github` source pointed at github.com. An implicit source
/// is dropped when the user explicitly configures a source with the same
/// name.
#[derive(Debug)]
pub struct ImplicitSource {
    /// The source name, compared case-insensitively against user sources.
    pub name: String,

    /// The fully-built driver configuration for the source.
    pub config: Box<dyn SourceConfig>,
}

/// The configuration capability of a source driver.
pub trait SourceConfigLoader: Send + Sync {
    /// Decodes the driver-specific body of a `source` block.
    ///
    /// `body` holds every key of the block that the resolver does not claim
    /// for itself (`driver`, `enabled`, `clones`, `vcs`). The context
    /// resolves relative paths against the declaring file and answers
    /// VCS-config lookups scoped to the source being finalized.
    ///
    /// # Errors
    ///
    /// Implementations report undecodable bodies with
    /// [`ConfigError::Decode`](crate::ConfigError::Decode) and invalid field
    /// values with [`ConfigError::InvalidValue`](crate::ConfigError::InvalidValue);
    /// the resolver anchors the error to the block's file.
    fn unmarshal(
        &self,
        ctx: &ConfigContext<'_>,
        body: toml::Table,
    ) -> ConfigResult<Box<dyn SourceConfig>>;

    /// The sources this driver contributes automatically.
    ///
    /// Called once per resolution, after every VCS driver has a global
    /// configuration value. Names already configured by the user (compared
    /// case-insensitively) are ignored. The default implementation
    /// contributes nothing.
    fn implicit_sources(&self, ctx: &ConfigContext<'_>) -> ConfigResult<Vec<ImplicitSource>> {
        let _ = ctx;
        Ok(Vec::new())
    }
}

/// The configuration capability of a VCS driver.
pub trait VcsConfigLoader: Send + Sync {
    /// The driver's configuration with no overrides applied.
    ///
    /// Every registered VCS driver is given a global value through this
    /// method before any source is finalized, so a source can always
    /// resolve a VCS configuration even when the user wrote no `vcs` block.
    fn defaults(&self, ctx: &ConfigContext<'_>) -> ConfigResult<Box<dyn VcsConfig>>;

    /// Applies an override block on top of an existing configuration.
    ///
    /// Called once with the global `vcs` block (over the defaults) and once
    /// per source-specific `vcs` block (over the global value). `base` must
    /// not be mutated; implementations clone it and replace the fields the
    /// block sets.
    fn merge(
        &self,
        ctx: &ConfigContext<'_>,
        base: &dyn VcsConfig,
        body: toml::Table,
    ) -> ConfigResult<Box<dyn VcsConfig>>;
}

/// A registered source driver.
///
/// `name` identifies the driver implementation; the alias a driver is
/// registered under defaults to its name but may differ, and several
/// aliases may share one name (see
/// [`DriverRegistry`](crate::DriverRegistry)).
#[derive(Clone)]
pub struct SourceDriver {
    /// The driver implementation name.
    pub name: String,

    /// A one-line human-readable description, shown by driver listings.
    pub description: String,

    /// The driver's configuration loader.
    pub config_loader: Arc<dyn SourceConfigLoader>,
}

impl SourceDriver {
    /// Creates a source driver registration.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        config_loader: Arc<dyn SourceConfigLoader>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config_loader,
        }
    }
}

impl fmt::Debug for SourceDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDriver")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A registered VCS driver.
#[derive(Clone)]
pub struct VcsDriver {
    /// The driver implementation name, matched by
    /// [`ConfigContext::resolve_vcs_config`].
    pub name: String,

    /// A one-line human-readable description, shown by driver listings.
    pub description: String,

    /// The driver's configuration loader.
    pub config_loader: Arc<dyn VcsConfigLoader>,
}

impl VcsDriver {
    /// Creates a VCS driver registration.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        config_loader: Arc<dyn VcsConfigLoader>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config_loader,
        }
    }
}

impl fmt::Debug for VcsDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VcsDriver")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
