use config_resolver::ConfigError;

use super::*;

#[test]
fn test_load_errors_pass_the_resolver_message_through_verbatim() {
    let inner = ConfigError::UnrecognizedVcs {
        driver: "git".to_string(),
    };

    let error = Error::from(inner.clone());

    assert_eq!(error.to_string(), inner.to_string());
}

#[test]
fn test_load_errors_keep_the_resolver_variant() {
    let error = Error::from(ConfigError::EmptyVcsAlias {
        file: "/etc/repo-warden/a.toml".to_string(),
    });

    assert!(matches!(
        error,
        Error::Load(ConfigError::EmptyVcsAlias { .. })
    ));
}
