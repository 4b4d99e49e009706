use config_resolver::ConfigError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the repo-warden CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration resolution failed.
    ///
    /// The resolver's message is shown verbatim; it already names the file
    /// and block the problem sits in.
    #[error(transparent)]
    Load(#[from] ConfigError),
}
