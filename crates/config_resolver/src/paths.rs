//! Path normalization for configuration values.
//!
//! Paths written in configuration files support a leading `~` for the
//! current user's home directory and may be relative. Relative paths are
//! resolved against the file that declared them (or against the
//! configuration directory for synthesized defaults), then cleaned
//! lexically so the resolver never hands out paths containing `.` or `..`
//! components. Nothing here touches the filesystem; the target of a path
//! does not have to exist.

use std::path::{Component, Path, PathBuf};

use crate::errors::{ConfigError, ConfigResult};

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;

/// Expands a leading `~` to the current user's home directory.
///
/// Only the bare `~` and the `~/...` forms are supported; `~user` forms are
/// rejected. Paths without a `~` prefix are returned unchanged.
///
/// # Errors
///
/// Returns [`ConfigError::PathExpansion`] when the home directory cannot be
/// determined, or when the path uses an unsupported `~user` form. The error
/// always names the offending path.
pub fn expand_home(path: &str) -> ConfigResult<PathBuf> {
    if path == "~" {
        return home_dir(path);
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir(path)?.join(rest));
    }
    if path.starts_with('~') {
        return Err(ConfigError::PathExpansion {
            path: path.to_string(),
            reason: "user-specific home directories are not supported".to_string(),
        });
    }
    Ok(PathBuf::from(path))
}

/// Resolves a configuration path against the directory it belongs to.
///
/// The path is home-expanded, absolutized against `base` when relative, and
/// cleaned. `base` must be absolute; the result always is.
///
/// # Errors
///
/// Returns [`ConfigError::PathExpansion`] under the same conditions as
/// [`expand_home`].
pub fn resolve(path: &str, base: &Path) -> ConfigResult<PathBuf> {
    let expanded = expand_home(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    Ok(clean(&absolute))
}

/// Removes `.` and `..` components lexically.
///
/// A `..` at the root stays at the root; `..` components at the front of a
/// relative path are kept, since there is nothing to pop.
pub fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

fn home_dir(original: &str) -> ConfigResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| ConfigError::PathExpansion {
        path: original.to_string(),
        reason: "the home directory cannot be determined".to_string(),
    })
}
