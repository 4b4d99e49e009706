use config_resolver::DriverRegistry;
use tempfile::TempDir;

use super::*;

#[test]
fn test_built_in_drivers_are_registered() {
    let registry = build_registry();

    assert!(registry.source_driver("github").is_some());
    assert!(registry.vcs_driver("git").is_some());
}

#[test]
fn test_alias_listings_are_stable() {
    let registry = build_registry();

    assert_eq!(registry.source_aliases(), vec!["github"]);
    assert_eq!(registry.vcs_aliases(), vec!["git"]);
}

#[test]
fn test_embedders_can_layer_on_the_built_ins() {
    let parent = build_registry();

    let child = DriverRegistry::with_parent(&parent);

    assert!(child.source_driver("github").is_some());
    assert!(child.vcs_driver("git").is_some());
}

#[test]
fn test_empty_directory_yields_the_implicit_github_source() {
    let temp = TempDir::new().unwrap();

    let config = config_resolver::load(temp.path(), &build_registry()).unwrap();

    assert_eq!(config.sources.len(), 1);
    assert_eq!(config.sources[0].name, "github");
    assert!(config.sources[0].enabled);
}
