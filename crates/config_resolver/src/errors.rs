//! Configuration system error types.
//!
//! Every failure surfaced by the resolver, the registry, or a driver's
//! config loader is a [`ConfigError`]. Errors that can be tied to a file
//! carry the offending file (and, for duplicate definitions, the file that
//! defined the block first) so that messages read like
//! `a.toml: the daemon configuration is already defined in b.toml`.
//!
//! Location handling follows one rule: an error is prefixed with its origin
//! exactly once. Parser errors already carry a position and are passed
//! through verbatim; everything else is wrapped with the origin file (or the
//! implicit-source name) at the point where the origin is known.

use std::path::Path;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Configuration system errors.
///
/// These errors occur while scanning the configuration directory, merging
/// blocks across files, resolving defaults and inheritance, or invoking a
/// driver's config loader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The declarative-format parser rejected a file.
    ///
    /// The parser output already names the position (line and column) and is
    /// reproduced verbatim, prefixed only with the file it came from.
    #[error("{file}: {message}")]
    Parse { file: String, message: String },

    /// An error produced while processing the given file.
    ///
    /// Wraps driver-reported and path-resolution errors with the file they
    /// originate from. Never nested: wrapping an already-located error is a
    /// no-op (see [`ConfigError::in_file`]).
    #[error("{file}: {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// An error produced while finalizing an implicit source.
    ///
    /// Implicit sources are contributed by drivers rather than by a file, so
    /// failures are anchored to the source name instead.
    #[error("implicit source \"{name}\": {source}")]
    InSource {
        name: String,
        #[source]
        source: Box<ConfigError>,
    },

    /// A file or directory could not be read.
    #[error("failed to access {path}: {reason}")]
    FileAccess { path: String, reason: String },

    /// A second `daemon` block was found in another file.
    #[error("{file}: the daemon configuration is already defined in {existing}")]
    DuplicateDaemon { file: String, existing: String },

    /// A second global `clones` block was found in another file.
    #[error("{file}: the clones configuration is already defined in {existing}")]
    DuplicateClones { file: String, existing: String },

    /// A global `vcs` block for this alias was already merged from another
    /// file.
    #[error("{file}: the \"{alias}\" VCS configuration is already defined in {existing}")]
    DuplicateVcs {
        alias: String,
        file: String,
        existing: String,
    },

    /// A source with this name (compared case-insensitively) was already
    /// merged from another file.
    #[error("{file}: the \"{name}\" source is already defined in {existing}")]
    DuplicateSource {
        name: String,
        file: String,
        existing: String,
    },

    /// A source name is empty or contains characters outside `[A-Za-z_]`.
    #[error("{file}: \"{name}\" is not a valid source name, names may contain only letters and underscores")]
    InvalidSourceName { name: String, file: String },

    /// A source block does not say which driver it uses.
    #[error("{file}: the \"{name}\" source does not name a driver")]
    MissingSourceDriver { name: String, file: String },

    /// A `vcs` block was declared with an empty driver alias.
    #[error("{file}: a vcs block has an empty driver alias")]
    EmptyVcsAlias { file: String },

    /// A source block names a driver alias that is not registered.
    ///
    /// `known` holds every registered source driver alias, sorted ascending,
    /// and is reproduced in the message.
    #[error("{file}: unrecognized source driver \"{alias}\", the supported drivers are: {}", .known.join(", "))]
    UnrecognizedSourceDriver {
        alias: String,
        file: String,
        known: Vec<String>,
    },

    /// A `vcs` block names a driver alias that is not registered.
    #[error("{file}: unrecognized VCS driver \"{alias}\", the supported drivers are: {}", .known.join(", "))]
    UnrecognizedVcsDriver {
        alias: String,
        file: String,
        known: Vec<String>,
    },

    /// A driver asked for a VCS by name but no registered VCS driver has
    /// that name.
    ///
    /// Distinct from [`ConfigError::UnrecognizedVcsDriver`]: this is the
    /// type-directed lookup performed through the config context, which
    /// searches by driver *name* rather than by alias.
    #[error("unrecognized VCS \"{driver}\"")]
    UnrecognizedVcs { driver: String },

    /// VCS drivers with the requested name exist, but none produced a
    /// configuration of the type the caller expects.
    #[error("the VCS drivers named \"{driver}\" ({}) are incompatible with this source", .aliases.join(", "))]
    IncompatibleVcs {
        driver: String,
        aliases: Vec<String>,
    },

    /// A path could not be expanded, for example because the home directory
    /// is not known.
    #[error("failed to expand \"{path}\": {reason}")]
    PathExpansion { path: String, reason: String },

    /// A driver could not decode its block body.
    #[error("invalid {driver} configuration: {message}")]
    Decode { driver: String, message: String },

    /// A decoded value failed a driver's validation.
    #[error("invalid value for \"{field}\": {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Anchors an error to the configuration file it came from.
    ///
    /// Errors that already carry a location (parser errors, previously
    /// wrapped errors) are returned unchanged so messages are never
    /// double-prefixed.
    pub(crate) fn in_file(self, file: &Path) -> ConfigError {
        if self.is_located() {
            return self;
        }
        ConfigError::InFile {
            file: file.display().to_string(),
            source: Box::new(self),
        }
    }

    /// Anchors an error to the implicit source it was produced for.
    pub(crate) fn in_source(self, name: &str) -> ConfigError {
        if self.is_located() {
            return self;
        }
        ConfigError::InSource {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// Whether the error already names where it came from.
    fn is_located(&self) -> bool {
        matches!(
            self,
            ConfigError::Parse { .. } | ConfigError::InFile { .. } | ConfigError::InSource { .. }
        )
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
