//! On-disk configuration file shapes.
//!
//! These types mirror the TOML surface of a configuration file and nothing
//! more. All cross-file rules (duplicate detection, driver lookup, default
//! application, path normalization) live in the resolver; here a file is
//! parsed in isolation, and every field stays optional and raw.
//!
//! Inside a `source` block the resolver claims four keys for itself
//! (`driver`, `enabled`, `clones`, `vcs`). Every other key belongs to the
//! source driver and is captured unparsed; the driver's loader decodes it
//! during finalization. Global and per-source `vcs` block bodies stay raw
//! tables for the same reason.

use std::collections::BTreeMap;

use serde::Deserialize;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// One parsed configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    /// The `[daemon]` block, at most one per resolved directory.
    pub(crate) daemon: Option<DaemonBlock>,

    /// The top-level `[clones]` block, at most one per resolved directory.
    pub(crate) clones: Option<ClonesBlock>,

    /// Global `[vcs.<alias>]` blocks, bodies kept raw for the driver.
    #[serde(default)]
    pub(crate) vcs: BTreeMap<String, toml::Table>,

    /// `[source.<name>]` blocks.
    #[serde(default, rename = "source")]
    pub(crate) sources: BTreeMap<String, SourceBlock>,
}

/// The `[daemon]` block.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DaemonBlock {
    /// Path of the daemon's control socket.
    pub(crate) socket: Option<String>,
}

/// A `[clones]` block, top-level or inside a source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ClonesBlock {
    /// Directory that clones are placed under.
    pub(crate) dir: Option<String>,
}

/// A `[source.<name>]` block.
///
/// No `deny_unknown_fields` here: unknown keys are the point, they form the
/// driver-specific body collected into `options`.
#[derive(Debug, Deserialize)]
pub(crate) struct SourceBlock {
    /// Alias of the source driver this block configures.
    pub(crate) driver: Option<String>,

    /// Whether the daemon should act on this source. Defaults to enabled.
    pub(crate) enabled: Option<bool>,

    /// Per-source clone directory override.
    pub(crate) clones: Option<ClonesBlock>,

    /// Per-source `vcs` override blocks, bodies kept raw for the driver.
    #[serde(default)]
    pub(crate) vcs: BTreeMap<String, toml::Table>,

    /// Everything else in the block, owned by the source driver.
    #[serde(flatten)]
    pub(crate) options: toml::Table,
}
