use std::path::Path;
use std::sync::Arc;

use config_resolver::{load, Config, DriverRegistry, VcsConfig, VcsConfigLoader, VcsDriver};
use tempfile::TempDir;

use super::*;

fn full_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register_vcs_driver(git_vcs::DRIVER_NAME, git_vcs::driver());
    registry.register_source_driver(DRIVER_NAME, driver());
    registry
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn github_config<'c>(config: &'c Config, name: &str) -> &'c GitHubConfig {
    config
        .source(name)
        .unwrap()
        .driver_config_as::<GitHubConfig>()
        .unwrap()
}

/// Registers under the `git` name without producing a [`GitConfig`].
#[derive(Debug, Clone)]
struct OpaqueVcsConfig;

impl VcsConfig for OpaqueVcsConfig {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn clone_box(&self) -> Box<dyn VcsConfig> {
        Box::new(self.clone())
    }
}

struct OpaqueVcsLoader;

impl VcsConfigLoader for OpaqueVcsLoader {
    fn defaults(&self, _ctx: &ConfigContext<'_>) -> ConfigResult<Box<dyn VcsConfig>> {
        Ok(Box::new(OpaqueVcsConfig))
    }

    fn merge(
        &self,
        _ctx: &ConfigContext<'_>,
        base: &dyn VcsConfig,
        _body: toml::Table,
    ) -> ConfigResult<Box<dyn VcsConfig>> {
        Ok(base.clone_box())
    }
}

fn opaque_git_driver() -> VcsDriver {
    VcsDriver::new("git", "holds foreign settings", Arc::new(OpaqueVcsLoader))
}

#[test]
fn test_implicit_source_exists_with_empty_configuration() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "a.toml", "[clones]\ndir = \"/data/clones\"\n");

    let config = load(temp.path(), &full_registry()).unwrap();

    assert_eq!(config.sources.len(), 1);
    let github = config.source("github").unwrap();
    assert!(github.enabled);
    assert_eq!(github.clone_dir, Path::new("/data/clones/github"));
    assert_eq!(
        github_config(&config, "github"),
        &GitHubConfig {
            domain: DEFAULT_DOMAIN.to_string(),
            token: None,
            git: GitConfig::default(),
        }
    );
}

#[test]
fn test_explicit_github_block_replaces_the_implicit_source() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[source.github]\ndriver = \"github\"\ndomain = \"ghe.example.com\"\ntoken = \"t0ken\"\n",
    );

    let config = load(temp.path(), &full_registry()).unwrap();

    assert_eq!(config.sources.len(), 1);
    let github = github_config(&config, "github");
    assert_eq!(github.domain, "ghe.example.com");
    assert_eq!(github.token.as_deref(), Some("t0ken"));
}

#[test]
fn test_domain_defaults_when_the_block_omits_it() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[source.work]\ndriver = \"github\"\ntoken = \"t0ken\"\n",
    );

    let config = load(temp.path(), &full_registry()).unwrap();

    assert_eq!(github_config(&config, "work").domain, DEFAULT_DOMAIN);
}

#[test]
fn test_empty_token_means_unauthenticated() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[source.work]\ndriver = \"github\"\ntoken = \"\"\n",
    );

    let config = load(temp.path(), &full_registry()).unwrap();

    assert!(github_config(&config, "work").token.is_none());
}

#[test]
fn test_empty_domain_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[source.work]\ndriver = \"github\"\ndomain = \"\"\n",
    );

    let result = load(temp.path(), &full_registry());

    match result {
        Err(ConfigError::InFile { file, source }) => {
            assert!(file.ends_with("a.toml"), "got: {file}");
            match *source {
                ConfigError::InvalidValue { ref field, .. } => assert_eq!(field, "domain"),
                ref other => panic!("expected InvalidValue inside InFile, got {other:?}"),
            }
        }
        other => panic!("expected InFile error, got {other:?}"),
    }
}

#[test]
fn test_unknown_block_key_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[source.work]\ndriver = \"github\"\nowner = \"octocat\"\n",
    );

    let result = load(temp.path(), &full_registry());

    match result {
        Err(ConfigError::InFile { source, .. }) => match *source {
            ConfigError::Decode {
                ref driver,
                ref message,
            } => {
                assert_eq!(driver, "github");
                assert!(message.contains("unknown field"), "got: {message}");
            }
            ref other => panic!("expected Decode inside InFile, got {other:?}"),
        },
        other => panic!("expected InFile error, got {other:?}"),
    }
}

#[test]
fn test_global_git_configuration_flows_into_sources() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[vcs.git]\nprefer_http = true\n\n[source.work]\ndriver = \"github\"\n",
    );

    let config = load(temp.path(), &full_registry()).unwrap();

    assert!(github_config(&config, "work").git.prefer_http);
}

#[test]
fn test_implicit_source_inherits_the_global_git_configuration() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "a.toml", "[vcs.git]\nprefer_http = true\n");

    let config = load(temp.path(), &full_registry()).unwrap();

    assert!(github_config(&config, "github").git.prefer_http);
}

#[test]
fn test_source_git_override_stays_scoped_to_its_source() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        concat!(
            "[vcs.git]\nssh_key_file = \"/keys/shared\"\n\n",
            "[source.work]\ndriver = \"github\"\n\n",
            "[source.work.vcs.git]\nprefer_http = true\n\n",
            "[source.oss]\ndriver = \"github\"\n",
        ),
    );

    let config = load(temp.path(), &full_registry()).unwrap();

    let work = github_config(&config, "work");
    assert!(work.git.prefer_http);
    assert_eq!(work.git.ssh_key_file.as_deref(), Some(Path::new("/keys/shared")));

    let oss = github_config(&config, "oss");
    assert!(!oss.git.prefer_http);
    assert_eq!(oss.git.ssh_key_file.as_deref(), Some(Path::new("/keys/shared")));
}

#[test]
fn test_ssh_key_paths_resolve_against_the_declaring_file() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[vcs.git]\nssh_key_file = \"keys/deploy\"\n\n[source.work]\ndriver = \"github\"\n",
    );

    let config = load(temp.path(), &full_registry()).unwrap();

    assert_eq!(
        github_config(&config, "work").git.ssh_key_file,
        Some(temp.path().join("keys/deploy"))
    );
}

#[test]
fn test_key_and_passphrase_may_come_from_different_levels() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        concat!(
            "[vcs.git]\nssh_key_file = \"/keys/shared\"\n\n",
            "[source.work]\ndriver = \"github\"\n\n",
            "[source.work.vcs.git]\nssh_key_passphrase = \"hunter2\"\n",
        ),
    );

    let config = load(temp.path(), &full_registry()).unwrap();

    let work = github_config(&config, "work");
    assert_eq!(work.git.ssh_key_file.as_deref(), Some(Path::new("/keys/shared")));
    assert_eq!(work.git.ssh_key_passphrase.as_deref(), Some("hunter2"));
}

#[test]
fn test_passphrase_without_a_key_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "a.toml",
        "[vcs.git]\nssh_key_passphrase = \"hunter2\"\n",
    );

    let result = load(temp.path(), &full_registry());

    match result {
        Err(ConfigError::InFile { file, source }) => {
            assert!(file.ends_with("a.toml"), "got: {file}");
            match *source {
                ConfigError::InvalidValue { ref field, .. } => {
                    assert_eq!(field, "ssh_key_passphrase")
                }
                ref other => panic!("expected InvalidValue inside InFile, got {other:?}"),
            }
        }
        other => panic!("expected InFile error, got {other:?}"),
    }
}

#[test]
fn test_registry_without_the_git_driver_fails_loudly() {
    let temp = TempDir::new().unwrap();
    let mut registry = DriverRegistry::new();
    registry.register_source_driver(DRIVER_NAME, driver());

    let result = load(temp.path(), &registry);

    match result {
        Err(ConfigError::InSource { name, source }) => {
            assert_eq!(name, "github");
            match *source {
                ConfigError::UnrecognizedVcs { ref driver } => assert_eq!(driver, "git"),
                ref other => panic!("expected UnrecognizedVcs inside InSource, got {other:?}"),
            }
        }
        other => panic!("expected InSource error, got {other:?}"),
    }
}

#[test]
fn test_git_named_driver_with_a_foreign_config_is_incompatible() {
    let temp = TempDir::new().unwrap();
    let mut registry = DriverRegistry::new();
    registry.register_vcs_driver("git", opaque_git_driver());
    registry.register_source_driver(DRIVER_NAME, driver());

    let result = load(temp.path(), &registry);

    match result {
        Err(ConfigError::InSource { name, source }) => {
            assert_eq!(name, "github");
            match *source {
                ConfigError::IncompatibleVcs {
                    ref driver,
                    ref aliases,
                } => {
                    assert_eq!(driver, "git");
                    assert_eq!(aliases, &["git".to_string()]);
                }
                ref other => panic!("expected IncompatibleVcs inside InSource, got {other:?}"),
            }
        }
        other => panic!("expected InSource error, got {other:?}"),
    }
}

#[test]
fn test_compatible_alias_is_selected_among_same_named_drivers() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "a.toml", "[source.work]\ndriver = \"github\"\n");
    let mut registry = DriverRegistry::new();
    registry.register_vcs_driver("alt", opaque_git_driver());
    registry.register_vcs_driver(git_vcs::DRIVER_NAME, git_vcs::driver());
    registry.register_source_driver(DRIVER_NAME, driver());

    let config = load(temp.path(), &registry).unwrap();

    assert_eq!(github_config(&config, "work").git, GitConfig::default());
}

#[test]
fn test_unmarshal_outside_a_resolution_has_no_git_config() {
    let loader = GitHubConfigLoader;
    let ctx = ConfigContext::new(Path::new("/etc/repo-warden"));

    let result = loader.unmarshal(&ctx, toml::Table::new());

    match result {
        Err(ConfigError::UnrecognizedVcs { driver }) => assert_eq!(driver, "git"),
        other => panic!("expected UnrecognizedVcs error, got {other:?}"),
    }
}

#[test]
fn test_driver_registers_under_the_github_name() {
    let registration = driver();

    assert_eq!(registration.name, DRIVER_NAME);
    assert!(!registration.description.is_empty());
}
