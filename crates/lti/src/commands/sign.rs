//! `lti sign` command implementation.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use lti_config::Config;
use lti_provider::LaunchSigner;
use lti_provider::params::{BASIC_LAUNCH_REQUEST, LTI_MESSAGE_TYPE, LTI_VERSION};

use crate::error::CliError;

/// LTI version sent when the caller does not supply one.
const DEFAULT_LTI_VERSION: &str = "LTI-1p0";

/// Arguments for the sign command.
#[derive(Args)]
pub(crate) struct SignArgs {
    /// Launch parameters as NAME=VALUE pairs.
    #[arg(value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// OAuth consumer key.
    #[arg(short, long)]
    key: String,

    /// Shared secret (default: from the matching consumer in config).
    #[arg(short, long, env = "LTI_CONSUMER_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Launch URL (default: provider.launch_url from config).
    #[arg(short, long)]
    url: Option<String>,

    /// Path to configuration file (default: auto-discover lti.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SignArgs {
    /// Execute the sign command.
    ///
    /// Writes the signed `application/x-www-form-urlencoded` body to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret or URL cannot be resolved or signing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;

        let secret = self
            .secret
            .or_else(|| config.consumer(&self.key).map(|c| c.secret.clone()))
            .ok_or_else(|| {
                CliError::Validation(format!(
                    "secret required for consumer '{}' (via --secret or config)",
                    self.key
                ))
            })?;

        let url = self
            .url
            .or_else(|| config.provider.launch_url.clone())
            .ok_or_else(|| CliError::Validation("url required (via --url or config)".to_owned()))?;

        let params = with_launch_defaults(self.params);
        let signed = LaunchSigner::new(&self.key, secret).sign(&url, params)?;

        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&signed)
            .finish();
        writeln!(io::stdout(), "{body}")?;

        Ok(())
    }
}

/// Fill in message type and version when absent.
fn with_launch_defaults(params: Vec<(String, String)>) -> BTreeMap<String, String> {
    let mut params: BTreeMap<String, String> = params.into_iter().collect();
    params
        .entry(LTI_MESSAGE_TYPE.to_owned())
        .or_insert_with(|| BASIC_LAUNCH_REQUEST.to_owned());
    params
        .entry(LTI_VERSION.to_owned())
        .or_insert_with(|| DEFAULT_LTI_VERSION.to_owned());
    params
}

/// Parse a `NAME=VALUE` argument.
fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("empty parameter name in '{arg}'")),
        Some((name, value)) => Ok((name.to_owned(), value.to_owned())),
        None => Err(format!("expected NAME=VALUE, got '{arg}'")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("roles=Learner,Instructor").unwrap(),
            ("roles".to_owned(), "Learner,Instructor".to_owned())
        );
        assert_eq!(
            parse_param("custom_q=a=b").unwrap(),
            ("custom_q".to_owned(), "a=b".to_owned())
        );
        assert_eq!(
            parse_param("empty=").unwrap(),
            ("empty".to_owned(), String::new())
        );
    }

    #[test]
    fn test_parse_param_errors() {
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_with_launch_defaults() {
        let params = with_launch_defaults(vec![("lti_version".to_owned(), "LTI-1p1".to_owned())]);

        assert_eq!(params["lti_message_type"], "basic-lti-launch-request");
        assert_eq!(params["lti_version"], "LTI-1p1");
    }
}
