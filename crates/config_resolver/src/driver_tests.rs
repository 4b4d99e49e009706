use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct StubSourceConfig {
    url: String,
}

impl SourceConfig for StubSourceConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn SourceConfig> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct StubVcsConfig {
    depth: u32,
}

impl VcsConfig for StubVcsConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn VcsConfig> {
        Box::new(self.clone())
    }
}

struct StubSourceLoader;

impl SourceConfigLoader for StubSourceLoader {
    fn unmarshal(
        &self,
        _ctx: &ConfigContext<'_>,
        _body: toml::Table,
    ) -> ConfigResult<Box<dyn SourceConfig>> {
        Ok(Box::new(StubSourceConfig {
            url: "https://example.com".to_string(),
        }))
    }
}

struct StubVcsLoader;

impl VcsConfigLoader for StubVcsLoader {
    fn defaults(&self, _ctx: &ConfigContext<'_>) -> ConfigResult<Box<dyn VcsConfig>> {
        Ok(Box::new(StubVcsConfig { depth: 0 }))
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

#[test]
fn test_boxed_source_config_clone_preserves_value() {
    let original: Box<dyn SourceConfig> = Box::new(StubSourceConfig {
        url: "https://example.com".to_string(),
    });

    let cloned = original.clone();

    let typed = cloned.as_any().downcast_ref::<StubSourceConfig>();
    assert_eq!(
        typed,
        Some(&StubSourceConfig {
            url: "https://example.com".to_string()
        })
    );
}

#[test]
fn test_boxed_vcs_config_clone_preserves_value() {
    let original: Box<dyn VcsConfig> = Box::new(StubVcsConfig { depth: 7 });

    let cloned = original.clone();

    let typed = cloned.as_any().downcast_ref::<StubVcsConfig>();
    assert_eq!(typed, Some(&StubVcsConfig { depth: 7 }));
}

#[test]
fn test_source_config_downcast_to_wrong_type_returns_none() {
    let boxed: Box<dyn SourceConfig> = Box::new(StubSourceConfig {
        url: "https://example.com".to_string(),
    });

    assert!(boxed.as_any().downcast_ref::<String>().is_none());
}

#[test]
fn test_implicit_sources_default_is_empty() {
    let loader = StubSourceLoader;
    let ctx = ConfigContext::new(Path::new("/etc/repo-warden"));

    let sources = loader.implicit_sources(&ctx).unwrap();

    assert!(sources.is_empty());
}

#[test]
fn test_source_driver_new_stores_fields() {
    let driver = SourceDriver::new("github", "GitHub repositories", Arc::new(StubSourceLoader));

    assert_eq!(driver.name, "github");
    assert_eq!(driver.description, "GitHub repositories");
}

#[test]
fn test_vcs_driver_new_stores_fields() {
    let driver = VcsDriver::new("git", "Git repositories", Arc::new(StubVcsLoader));

    assert_eq!(driver.name, "git");
    assert_eq!(driver.description, "Git repositories");
}

#[test]
fn test_source_driver_clone_shares_loader() {
    let loader = Arc::new(StubSourceLoader);
    let driver = SourceDriver::new("github", "GitHub repositories", loader.clone());

    let cloned = driver.clone();

    assert_eq!(cloned.name, driver.name);
    assert_eq!(Arc::strong_count(&loader), 3);
}

#[test]
fn test_driver_debug_output_names_the_driver() {
    let driver = VcsDriver::new("git", "Git repositories", Arc::new(StubVcsLoader));

    let rendered = format!("{driver:?}");

    assert!(rendered.contains("VcsDriver"));
    assert!(rendered.contains("git"));
}
