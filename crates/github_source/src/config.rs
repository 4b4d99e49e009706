//! GitHub driver configuration: block decoding and the implicit source.

use std::sync::Arc;

use config_resolver::{
    ConfigContext, ConfigError, ConfigResult, ImplicitSource, SourceConfig, SourceConfigLoader,
    SourceDriver,
};
use git_vcs::GitConfig;
use serde::Deserialize;
use tracing::debug;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// The driver implementation name.
pub const DRIVER_NAME: &str = "github";

/// Domain used when a block does not name one.
pub const DEFAULT_DOMAIN: &str = "github.com";

/// A GitHub-backed source of repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    /// The GitHub instance the source watches.
    pub domain: String,

    /// API token; unauthenticated access when unset.
    pub token: Option<String>,

    /// Git settings in effect for this source's clones.
    pub git: GitConfig,
}

impl SourceConfig for GitHubConfig {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn clone_box(&self) -> Box<dyn SourceConfig> {
        Box::new(self.clone())
    }
}

/// The driver-specific body of a github source block.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GitHubBlock {
    domain: Option<String>,
    token: Option<String>,
}

fn config_from_block(ctx: &ConfigContext<'_>, block: GitHubBlock) -> ConfigResult<GitHubConfig> {
    let domain = match block.domain {
        Some(domain) if domain.is_empty() => {
            return Err(ConfigError::InvalidValue {
                field: "domain".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Some(domain) => domain,
        None => DEFAULT_DOMAIN.to_string(),
    };
    let git: GitConfig = ctx.resolve_vcs_config(git_vcs::DRIVER_NAME)?;
    Ok(GitHubConfig {
        domain,
        token: block.token.filter(|token| !token.is_empty()),
        git,
    })
}

/// Configuration loader of the github driver.
#[derive(Debug, Default)]
pub struct GitHubConfigLoader;

impl SourceConfigLoader for GitHubConfigLoader {
    fn unmarshal(
        &self,
        ctx: &ConfigContext<'_>,
        body: toml::Table,
    ) -> ConfigResult<Box<dyn SourceConfig>> {
        let block: GitHubBlock =
            toml::Value::Table(body)
                .try_into()
                .map_err(|error| ConfigError::Decode {
                    driver: DRIVER_NAME.to_string(),
                    message: error.to_string(),
                })?;
        let config = config_from_block(ctx, block)?;
        debug!(
            message = "decoded github source configuration",
            domain = %config.domain,
            authenticated = config.token.is_some(),
        );
        Ok(Box::new(config))
    }

    /// One unauthenticated github.com source, carrying whatever Git
    /// configuration is globally in effect.
    fn implicit_sources(&self, ctx: &ConfigContext<'_>) -> ConfigResult<Vec<ImplicitSource>> {
        let git: GitConfig = ctx.resolve_vcs_config(git_vcs::DRIVER_NAME)?;
        Ok(vec![ImplicitSource {
            name: DRIVER_NAME.to_string(),
            config: Box::new(GitHubConfig {
                domain: DEFAULT_DOMAIN.to_string(),
                token: None,
                git,
            }),
        }])
    }
}

/// The `github` driver registration.
pub fn driver() -> SourceDriver {
    SourceDriver::new(
        DRIVER_NAME,
        "watches the repositories of a GitHub instance",
        Arc::new(GitHubConfigLoader),
    )
}
