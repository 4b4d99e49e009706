//! Directory loading, merging, and finalization.
//!
//! Resolution runs in two phases. The *merge* phase reads every
//! configuration file in the directory in sorted filename order and
//! accumulates their blocks into an unresolved form, rejecting duplicates
//! and unknown driver aliases as it goes; nothing is interpreted yet beyond
//! TOML syntax and the reserved keys. The *finalize* phase then applies
//! defaults, resolves paths, gives every registered VCS driver a global
//! configuration value, collects implicit sources, and invokes each source
//! driver's loader to produce the immutable [`Config`].
//!
//! The split keeps file-order concerns (who declared what first, which file
//! a block came from) out of the semantic rules, and it means a block's
//! position in the directory never changes the result; only duplicate
//! errors mention file identity at all.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, instrument};

use crate::config::{
    Config, DaemonConfig, Source, CONFIG_EXTENSION, DEFAULT_CLONES_DIR, DEFAULT_DAEMON_SOCKET,
};
use crate::context::{ConfigContext, ResolvedVcs};
use crate::driver::{SourceConfig, SourceDriver, VcsDriver};
use crate::errors::{ConfigError, ConfigResult};
use crate::paths;
use crate::registry::DriverRegistry;
use crate::schema::{ConfigFile, SourceBlock};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Loads and resolves the configuration directory at `dir`.
///
/// Every regular file in `dir` with the `toml` extension is read, except
/// files whose name starts with `.` or `_`. Files merge into one logical
/// configuration regardless of how blocks are split across them; a missing
/// directory behaves like an empty one. Relative `dir` values are taken
/// against the current working directory, and a leading `~` expands to the
/// current user's home.
///
/// The registry supplies the drivers configuration may reference. Driver
/// lookups happen against the registrations visible when `load` is called;
/// the returned [`Config`] holds no reference to the registry.
///
/// # Examples
///
/// ```
/// use config_resolver::{load, DriverRegistry};
///
/// let registry = DriverRegistry::new();
/// let config = load("/nonexistent/repo-warden/conf.d", &registry)?;
/// assert!(config.sources.is_empty());
/// # Ok::<(), config_resolver::ConfigError>(())
/// ```
///
/// # Errors
///
/// Returns a [`ConfigError`] when a file cannot be read or parsed, a block
/// is declared twice, a driver alias is unknown, a path cannot be expanded,
/// or a driver loader rejects its configuration. Errors carry the file they
/// are anchored to wherever one exists.
#[instrument(skip_all, fields(dir = ?dir.as_ref()))]
pub fn load(dir: impl AsRef<Path>, registry: &DriverRegistry) -> ConfigResult<Config> {
    let dir = absolute_config_dir(dir.as_ref())?;
    let unresolved = merge_directory(&dir, registry)?;
    finalize(&dir, unresolved, registry)
}

/// Accumulated state of the merge phase.
struct UnresolvedConfig {
    /// The `[daemon]` block's socket value and declaring file, if any.
    daemon: Option<BlockAt<Option<String>>>,

    /// The top-level `[clones]` block's dir value and declaring file.
    clones: Option<BlockAt<Option<String>>>,

    /// Global `[vcs.<alias>]` blocks, keyed by the exact alias.
    vcs: BTreeMap<String, UnresolvedVcs>,

    /// Source blocks keyed by lowercased name, original case kept inside.
    sources: BTreeMap<String, UnresolvedSource>,
}

/// A merged value together with the file that declared it.
struct BlockAt<T> {
    value: T,
    file: PathBuf,
}

/// A global `vcs` block awaiting its driver's merge call.
struct UnresolvedVcs {
    body: toml::Table,
    file: PathBuf,
}

/// One source awaiting finalization.
struct UnresolvedSource {
    name: String,
    driver: SourceDriver,
    enabled: Option<bool>,
    clone_dir: Option<String>,
    vcs: BTreeMap<String, VcsOverride>,
    body: SourceBody,
    origin: SourceOrigin,
}

/// A per-source `vcs` block with the driver captured at merge time.
struct VcsOverride {
    driver: VcsDriver,
    body: toml::Table,
}

/// Where a source's driver configuration comes from.
enum SourceBody {
    /// A raw block body the driver's loader still has to decode.
    Raw(toml::Table),

    /// A value a driver contributed directly, for implicit sources.
    Prebuilt(Box<dyn SourceConfig>),
}

/// What declared a source.
enum SourceOrigin {
    File(PathBuf),
    Implicit,
}

fn absolute_config_dir(dir: &Path) -> ConfigResult<PathBuf> {
    let expanded = match dir.to_str() {
        Some(text) => paths::expand_home(text)?,
        None => dir.to_path_buf(),
    };
    if expanded.is_absolute() {
        return Ok(paths::clean(&expanded));
    }
    let cwd = std::env::current_dir().map_err(|error| ConfigError::FileAccess {
        path: dir.display().to_string(),
        reason: error.to_string(),
    })?;
    Ok(paths::clean(&cwd.join(expanded)))
}

fn merge_directory(dir: &Path, registry: &DriverRegistry) -> ConfigResult<UnresolvedConfig> {
    let mut unresolved = UnresolvedConfig {
        daemon: None,
        clones: None,
        vcs: BTreeMap::new(),
        sources: BTreeMap::new(),
    };

    for file in config_files(dir)? {
        let text = std::fs::read_to_string(&file).map_err(|error| ConfigError::FileAccess {
            path: file.display().to_string(),
            reason: error.to_string(),
        })?;
        let parsed: ConfigFile = toml::from_str(&text).map_err(|error| ConfigError::Parse {
            file: file.display().to_string(),
            message: error.to_string(),
        })?;
        merge_file(&mut unresolved, registry, &file, parsed)?;
        debug!(message = "merged configuration file", file = %file.display());
    }

    Ok(unresolved)
}

/// Enumerates the files the merge phase reads, in sorted filename order.
fn config_files(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!(message = "configuration directory does not exist", dir = %dir.display());
            return Ok(Vec::new());
        }
        Err(error) => {
            return Err(ConfigError::FileAccess {
                path: dir.display().to_string(),
                reason: error.to_string(),
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| ConfigError::FileAccess {
            path: dir.display().to_string(),
            reason: error.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some(CONFIG_EXTENSION) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    debug!(message = "enumerated configuration files", dir = %dir.display(), count = files.len());
    Ok(files)
}

fn merge_file(
    unresolved: &mut UnresolvedConfig,
    registry: &DriverRegistry,
    file: &Path,
    parsed: ConfigFile,
) -> ConfigResult<()> {
    if let Some(daemon) = parsed.daemon {
        if let Some(existing) = &unresolved.daemon {
            return Err(ConfigError::DuplicateDaemon {
                file: file.display().to_string(),
                existing: existing.file.display().to_string(),
            });
        }
        unresolved.daemon = Some(BlockAt {
            value: daemon.socket,
            file: file.to_path_buf(),
        });
    }

    if let Some(clones) = parsed.clones {
        if let Some(existing) = &unresolved.clones {
            return Err(ConfigError::DuplicateClones {
                file: file.display().to_string(),
                existing: existing.file.display().to_string(),
            });
        }
        unresolved.clones = Some(BlockAt {
            value: clones.dir,
            file: file.to_path_buf(),
        });
    }

    for (alias, body) in parsed.vcs {
        vcs_driver_for(registry, file, &alias)?;
        if let Some(existing) = unresolved.vcs.get(&alias) {
            return Err(ConfigError::DuplicateVcs {
                alias,
                file: file.display().to_string(),
                existing: existing.file.display().to_string(),
            });
        }
        unresolved.vcs.insert(
            alias,
            UnresolvedVcs {
                body,
                file: file.to_path_buf(),
            },
        );
    }

    for (name, block) in parsed.sources {
        merge_source_block(unresolved, registry, file, name, block)?;
    }

    Ok(())
}

/// Validates a `vcs` block alias and resolves its driver.
fn vcs_driver_for<'r>(
    registry: &'r DriverRegistry,
    file: &Path,
    alias: &str,
) -> ConfigResult<&'r VcsDriver> {
    if alias.is_empty() {
        return Err(ConfigError::EmptyVcsAlias {
            file: file.display().to_string(),
        });
    }
    registry
        .vcs_driver(alias)
        .ok_or_else(|| ConfigError::UnrecognizedVcsDriver {
            alias: alias.to_string(),
            file: file.display().to_string(),
            known: registry.vcs_aliases(),
        })
}

fn merge_source_block(
    unresolved: &mut UnresolvedConfig,
    registry: &DriverRegistry,
    file: &Path,
    name: String,
    block: SourceBlock,
) -> ConfigResult<()> {
    if !valid_source_name(&name) {
        return Err(ConfigError::InvalidSourceName {
            name,
            file: file.display().to_string(),
        });
    }

    let key = name.to_lowercase();
    if let Some(existing) = unresolved.sources.get(&key) {
        let existing_at = match &existing.origin {
            SourceOrigin::File(path) => path.display().to_string(),
            SourceOrigin::Implicit => format!("the {} driver", existing.driver.name),
        };
        return Err(ConfigError::DuplicateSource {
            name,
            file: file.display().to_string(),
            existing: existing_at,
        });
    }

    let driver_alias = block.driver.as_deref().unwrap_or("");
    if driver_alias.is_empty() {
        return Err(ConfigError::MissingSourceDriver {
            name,
            file: file.display().to_string(),
        });
    }
    let Some(driver) = registry.source_driver(driver_alias) else {
        return Err(ConfigError::UnrecognizedSourceDriver {
            alias: driver_alias.to_string(),
            file: file.display().to_string(),
            known: registry.source_aliases(),
        });
    };

    let mut overrides = BTreeMap::new();
    for (alias, body) in block.vcs {
        let vcs_driver = vcs_driver_for(registry, file, &alias)?;
        overrides.insert(
            alias,
            VcsOverride {
                driver: vcs_driver.clone(),
                body,
            },
        );
    }

    unresolved.sources.insert(
        key,
        UnresolvedSource {
            name,
            driver: driver.clone(),
            enabled: block.enabled,
            clone_dir: block.clones.and_then(|clones| clones.dir),
            vcs: overrides,
            body: SourceBody::Raw(block.options),
            origin: SourceOrigin::File(file.to_path_buf()),
        },
    );
    Ok(())
}

/// Source names are single bare words so they can double as directory
/// names and daemon command arguments.
fn valid_source_name(name: &str) -> bool {
    static NAME: OnceLock<Regex> = OnceLock::new();
    let pattern = NAME.get_or_init(|| Regex::new("^[A-Za-z_]+$").expect("valid regex"));
    pattern.is_match(name)
}

fn finalize(
    dir: &Path,
    unresolved: UnresolvedConfig,
    registry: &DriverRegistry,
) -> ConfigResult<Config> {
    let UnresolvedConfig {
        daemon,
        clones,
        vcs,
        mut sources,
    } = unresolved;

    let socket = resolve_block_path(daemon.as_ref(), DEFAULT_DAEMON_SOCKET, dir)?;
    let clones_dir = resolve_block_path(clones.as_ref(), DEFAULT_CLONES_DIR, dir)?;
    debug!(
        message = "daemon paths resolved",
        socket = %socket.display(),
        clones_dir = %clones_dir.display(),
    );

    // Give every registered VCS driver a global value, with the global
    // block merged over the driver's defaults where one was declared.
    let mut globals = Vec::new();
    for (alias, driver) in registry.vcs_drivers() {
        let defaults_ctx = ConfigContext::new(dir);
        let mut value = driver.config_loader.defaults(&defaults_ctx)?;
        if let Some(block) = vcs.get(&alias) {
            let base = parent_dir(&block.file, dir);
            let merge_ctx = ConfigContext::new(base);
            value = driver
                .config_loader
                .merge(&merge_ctx, value.as_ref(), block.body.clone())
                .map_err(|error| error.in_file(&block.file))?;
        }
        globals.push(ResolvedVcs {
            alias,
            driver: driver.name,
            config: Arc::from(value),
            from_override: false,
        });
    }

    // Implicit sources only exist where no configured source took the name.
    let implicit_ctx = ConfigContext::with_vcs(dir, &globals);
    for (alias, driver) in registry.source_drivers() {
        let contributed = driver
            .config_loader
            .implicit_sources(&implicit_ctx)
            .map_err(|error| error.in_source(&alias))?;
        for implicit in contributed {
            let key = implicit.name.to_lowercase();
            if sources.contains_key(&key) {
                debug!(
                    message = "implicit source suppressed by configured source",
                    name = %implicit.name,
                );
                continue;
            }
            sources.insert(
                key,
                UnresolvedSource {
                    name: implicit.name,
                    driver: driver.clone(),
                    enabled: None,
                    clone_dir: None,
                    vcs: BTreeMap::new(),
                    body: SourceBody::Prebuilt(implicit.config),
                    origin: SourceOrigin::Implicit,
                },
            );
        }
    }

    let mut resolved = Vec::with_capacity(sources.len());
    for (_, source) in sources {
        resolved.push(finalize_source(source, dir, &clones_dir, &globals)?);
    }

    Ok(Config {
        daemon: DaemonConfig { socket },
        sources: resolved,
    })
}

/// Resolves a merged `socket`/`dir` value, falling back to `default`.
///
/// An empty string counts as unset. Values resolve relative to the file
/// that declared them; the default resolves against the configuration
/// directory, though both defaults are home-anchored anyway.
fn resolve_block_path(
    block: Option<&BlockAt<Option<String>>>,
    default: &str,
    dir: &Path,
) -> ConfigResult<PathBuf> {
    if let Some(block) = block {
        if let Some(raw) = block.value.as_deref().filter(|value| !value.is_empty()) {
            let base = parent_dir(&block.file, dir);
            return paths::resolve(raw, base).map_err(|error| error.in_file(&block.file));
        }
    }
    paths::resolve(default, dir)
}

fn parent_dir<'p>(file: &'p Path, dir: &'p Path) -> &'p Path {
    file.parent().unwrap_or(dir)
}

fn finalize_source(
    source: UnresolvedSource,
    dir: &Path,
    clones_dir: &Path,
    globals: &[ResolvedVcs],
) -> ConfigResult<Source> {
    let UnresolvedSource {
        name,
        driver,
        enabled,
        clone_dir,
        vcs: mut overrides,
        body,
        origin,
    } = source;

    let base = match &origin {
        SourceOrigin::File(file) => parent_dir(file, dir),
        SourceOrigin::Implicit => dir,
    };

    let clone_dir = match clone_dir.as_deref().filter(|value| !value.is_empty()) {
        Some(raw) => {
            paths::resolve(raw, base).map_err(|error| locate_in_source(error, &origin, &name))?
        }
        None => paths::clean(&clones_dir.join(&name)),
    };

    // The source's VCS view: the global chain with this source's override
    // blocks merged on top of the matching entries.
    let mut entries = Vec::with_capacity(globals.len());
    for global in globals {
        match overrides.remove(&global.alias) {
            Some(vcs_override) => {
                let merge_ctx = ConfigContext::new(base);
                let merged = vcs_override
                    .driver
                    .config_loader
                    .merge(&merge_ctx, global.config.as_ref(), vcs_override.body)
                    .map_err(|error| locate_in_source(error, &origin, &name))?;
                entries.push(ResolvedVcs {
                    alias: global.alias.clone(),
                    driver: global.driver.clone(),
                    config: Arc::from(merged),
                    from_override: true,
                });
            }
            None => entries.push(global.clone()),
        }
    }
    debug_assert!(overrides.is_empty(), "override alias missing from globals");

    let driver_config = match body {
        SourceBody::Prebuilt(config) => config,
        SourceBody::Raw(options) => {
            let ctx = ConfigContext::with_vcs(base, &entries);
            driver
                .config_loader
                .unmarshal(&ctx, options)
                .map_err(|error| locate_in_source(error, &origin, &name))?
        }
    };

    let enabled = enabled.unwrap_or(true);
    debug!(message = "source finalized", source = %name, enabled);
    Ok(Source {
        name,
        enabled,
        clone_dir,
        driver_config,
    })
}

/// Anchors a finalization error to the source's file, or to the source
/// name for implicit sources that have no file.
fn locate_in_source(error: ConfigError, origin: &SourceOrigin, name: &str) -> ConfigError {
    match origin {
        SourceOrigin::File(file) => error.in_file(file),
        SourceOrigin::Implicit => error.in_source(name),
    }
}
