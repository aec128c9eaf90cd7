//! CLI error types.

use lti_config::ConfigError;
use lti_provider::{AuthError, SignError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Sign(#[from] SignError),

    #[error("launch rejected ({reason}): {0}", reason = .0.reason())]
    Rejected(#[from] AuthError),

    #[error("{0}")]
    Validation(String),
}
