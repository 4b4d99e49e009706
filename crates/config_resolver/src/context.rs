//! The context handed to driver loaders during resolution.
//!
//! A [`ConfigContext`] is a borrowed view of resolution state: where
//! relative paths anchor, and which VCS configurations are visible. The
//! resolver builds a fresh context for every loader call, so the anchor
//! always matches the file being processed and a source driver only ever
//! sees the VCS values scoped to its own source.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::driver::VcsConfig;
use crate::errors::{ConfigError, ConfigResult};
use crate::paths;

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// A finalized VCS configuration entry, tagged with its origin.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedVcs {
    /// The alias the entry was registered under.
    pub(crate) alias: String,

    /// Name of the driver implementation that produced the value.
    pub(crate) driver: String,

    /// The finalized configuration value.
    pub(crate) config: Arc<dyn VcsConfig>,

    /// Whether a per-source override block contributed to the value.
    pub(crate) from_override: bool,
}

/// Resolution state visible to a driver loader.
#[derive(Clone, Copy, Debug)]
pub struct ConfigContext<'a> {
    base_dir: &'a Path,
    vcs: &'a [ResolvedVcs],
}

impl<'a> ConfigContext<'a> {
    /// Creates a context anchored at `base_dir` with no VCS configurations.
    ///
    /// Loaders called through [`load`](crate::load) always receive contexts
    /// built by the resolver; this constructor exists for driver tests.
    pub fn new(base_dir: &'a Path) -> Self {
        Self {
            base_dir,
            vcs: &[],
        }
    }

    pub(crate) fn with_vcs(base_dir: &'a Path, vcs: &'a [ResolvedVcs]) -> Self {
        Self { base_dir, vcs }
    }

    /// The directory relative paths resolve against.
    ///
    /// During resolution this is the directory of the file that declared
    /// the value being processed, so `./key.pem` in a configuration file
    /// means the file next to it.
    pub fn base_dir(&self) -> &Path {
        self.base_dir
    }

    /// Expands and anchors a path from a configuration value.
    ///
    /// A leading `~` becomes the current user's home directory, relative
    /// paths are joined onto [`base_dir`](Self::base_dir), and `.`/`..`
    /// segments are folded away lexically. The filesystem is never
    /// consulted and symlinks are not followed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use config_resolver::ConfigContext;
    ///
    /// let ctx = ConfigContext::new(Path::new("/etc/repo-warden"));
    /// let path = ctx.normalize_path("../keys/deploy.pem").unwrap();
    /// assert_eq!(path, Path::new("/etc/keys/deploy.pem"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PathExpansion`] when the path names another
    /// user's home (`~user/...`) or the current user's home directory
    /// cannot be determined.
    pub fn normalize_path(&self, raw: &str) -> ConfigResult<PathBuf> {
        paths::resolve(raw, self.base_dir)
    }

    /// Looks up the configuration of the VCS driver named `driver`,
    /// downcast to the concrete type `T`.
    ///
    /// Matching is by driver implementation name, not alias: a source block
    /// declaring `vcs = "git"` finds whichever registered entry the `git`
    /// driver produced, whatever alias it was registered under. When several
    /// aliases share the driver name, entries a per-source override block
    /// contributed to are preferred, then the alphabetically first alias;
    /// among those, the first whose value downcasts to `T` wins.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnrecognizedVcs`] when no entry carries the
    /// driver name, and [`ConfigError::IncompatibleVcs`] when entries exist
    /// but none holds a `T`.
    pub fn resolve_vcs_config<T>(&self, driver: &str) -> ConfigResult<T>
    where
        T: VcsConfig + Clone,
    {
        let mut candidates: Vec<&ResolvedVcs> = self
            .vcs
            .iter()
            .filter(|entry| entry.driver == driver)
            .collect();
        if candidates.is_empty() {
            return Err(ConfigError::UnrecognizedVcs {
                driver: driver.to_string(),
            });
        }

        candidates.sort_by_key(|entry| (!entry.from_override, entry.alias.clone()));
        for entry in &candidates {
            if let Some(config) = entry.config.as_any().downcast_ref::<T>() {
                return Ok(config.clone());
            }
        }

        let mut aliases: Vec<String> = candidates
            .iter()
            .map(|entry| entry.alias.clone())
            .collect();
        aliases.sort();
        Err(ConfigError::IncompatibleVcs {
            driver: driver.to_string(),
            aliases,
        })
    }
}
