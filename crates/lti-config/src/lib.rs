//! Configuration management for LTI launch verification.
//!
//! Parses `lti.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `provider.launch_url`
//! - `consumers[].key`
//! - `consumers[].secret`

mod expand;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override timestamp freshness window.
    pub freshness_window_secs: Option<u64>,
    /// Override the launch URL used as signature base URI.
    pub launch_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lti.toml";

/// Default timestamp freshness window in seconds.
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 60;

/// Upper bound for the freshness window.
const MAX_FRESHNESS_WINDOW_SECS: u64 = 3600;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tool provider configuration.
    pub provider: ProviderConfig,
    /// Statically provisioned consumers.
    pub consumers: Vec<ConsumerConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Tool provider configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Maximum allowed distance between `oauth_timestamp` and now, in seconds.
    pub freshness_window_secs: u64,
    /// Public launch URL. When set, it replaces the request URI in the
    /// signature base string (for tools behind a rewriting proxy).
    pub launch_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            launch_url: None,
        }
    }
}

/// A consumer entry in `[[consumers]]`.
#[derive(Clone, Deserialize)]
pub struct ConsumerConfig {
    /// OAuth consumer key.
    pub key: String,
    /// Shared secret.
    pub secret: String,
    /// Whether launches from this consumer are accepted.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl fmt::Debug for ConsumerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerConfig")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("active", &self.active)
            .finish()
    }
}

fn default_active() -> bool {
    true
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`consumers[0].secret`").
        field: String,
        /// Error message (e.g., "${`LMS_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lti.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(window) = settings.freshness_window_secs {
            self.provider.freshness_window_secs = window;
        }
        if let Some(launch_url) = &settings.launch_url {
            self.provider.launch_url = Some(launch_url.clone());
        }
    }

    /// Look up a configured consumer by key.
    pub fn consumer(&self, key: &str) -> Option<&ConsumerConfig> {
        self.consumers.iter().find(|c| c.key == key)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_provider()?;
        self.validate_consumers()?;
        Ok(())
    }

    fn validate_provider(&self) -> Result<(), ConfigError> {
        let window = self.provider.freshness_window_secs;
        if window == 0 {
            return Err(ConfigError::Validation(
                "provider.freshness_window_secs must be greater than 0".to_owned(),
            ));
        }
        if window > MAX_FRESHNESS_WINDOW_SECS {
            return Err(ConfigError::Validation(format!(
                "provider.freshness_window_secs cannot exceed {MAX_FRESHNESS_WINDOW_SECS}"
            )));
        }

        if let Some(ref url) = self.provider.launch_url {
            require_non_empty(url, "provider.launch_url")?;
            require_http_url(url, "provider.launch_url")?;
        }

        Ok(())
    }

    fn validate_consumers(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (i, consumer) in self.consumers.iter().enumerate() {
            require_non_empty(&consumer.key, &format!("consumers[{i}].key"))?;
            require_non_empty(&consumer.secret, &format!("consumers[{i}].secret"))?;
            if !seen.insert(consumer.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "consumers[{i}].key duplicates consumer '{}'",
                    consumer.key
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.provider.launch_url {
            self.provider.launch_url = Some(expand::expand_env(url, "provider.launch_url")?);
        }

        for (i, consumer) in self.consumers.iter_mut().enumerate() {
            consumer.key = expand::expand_env(&consumer.key, &format!("consumers[{i}].key"))?;
            consumer.secret =
                expand::expand_env(&consumer.secret, &format!("consumers[{i}].secret"))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.freshness_window_secs, 60);
        assert!(config.provider.launch_url.is_none());
        assert!(config.consumers.is_empty());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.provider.freshness_window_secs, 60);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[provider]
freshness_window_secs = 120
launch_url = "https://tool.example/launch"

[[consumers]]
key = "lms-1"
secret = "s3cret"

[[consumers]]
key = "lms-2"
secret = "other"
active = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.provider.freshness_window_secs, 120);
        assert_eq!(
            config.provider.launch_url.as_deref(),
            Some("https://tool.example/launch")
        );
        assert_eq!(config.consumers.len(), 2);
        assert!(config.consumers[0].active);
        assert!(!config.consumers[1].active);
        assert_eq!(config.consumer("lms-2").unwrap().secret, "other");
        assert!(config.consumer("missing").is_none());
    }

    #[test]
    fn test_consumer_debug_redacts_secret() {
        let consumer = ConsumerConfig {
            key: "lms-1".to_owned(),
            secret: "s3cret".to_owned(),
            active: true,
        };
        assert!(!format!("{consumer:?}").contains("s3cret"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            freshness_window_secs: Some(300),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.provider.freshness_window_secs, 300);
        assert!(config.provider.launch_url.is_none()); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.provider.freshness_window_secs, 60);
    }

    #[test]
    fn test_expand_env_vars_consumer_secret() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_LTI_SECRET", "from-env");
        }

        let toml = r#"
[[consumers]]
key = "${TEST_LTI_KEY:-lms-1}"
secret = "${TEST_LTI_SECRET}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.consumers[0].key, "lms-1");
        assert_eq!(config.consumers[0].secret, "from-env");

        unsafe {
            std::env::remove_var("TEST_LTI_SECRET");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_LTI_VAR_CONFIG_TEST");
        }

        let toml = r#"
[provider]
launch_url = "${MISSING_LTI_VAR_CONFIG_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_LTI_VAR_CONFIG_TEST"));
        assert!(err.to_string().contains("provider.launch_url"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    fn consumer(key: &str, secret: &str) -> ConsumerConfig {
        ConsumerConfig {
            key: key.to_owned(),
            secret: secret.to_owned(),
            active: true,
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_window_zero() {
        let mut config = Config::default();
        config.provider.freshness_window_secs = 0;
        assert_validation_error(&config, &["freshness_window_secs", "greater than 0"]);
    }

    #[test]
    fn test_validate_window_too_large() {
        let mut config = Config::default();
        config.provider.freshness_window_secs = 7200;
        assert_validation_error(&config, &["freshness_window_secs", "3600"]);
    }

    #[test]
    fn test_validate_launch_url_scheme() {
        let mut config = Config::default();
        config.provider.launch_url = Some("ftp://tool.example".to_owned());
        assert_validation_error(&config, &["provider.launch_url", "http"]);
    }

    #[test]
    fn test_validate_empty_secret() {
        let mut config = Config::default();
        config.consumers.push(consumer("lms-1", ""));
        assert_validation_error(&config, &["consumers[0].secret", "empty"]);
    }

    #[test]
    fn test_validate_duplicate_keys() {
        let mut config = Config::default();
        config.consumers.push(consumer("lms-1", "a"));
        config.consumers.push(consumer("lms-1", "b"));
        assert_validation_error(&config, &["consumers[1].key", "lms-1"]);
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/lti.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[provider]
freshness_window_secs = 90

[[consumers]]
key = "lms-1"
secret = "s3cret"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path()), None).unwrap();

        assert_eq!(config.provider.freshness_window_secs, 90);
        assert_eq!(config.consumers.len(), 1);
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_cli_settings_take_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[provider]\nfreshness_window_secs = 90").unwrap();
        let overrides = CliSettings {
            freshness_window_secs: Some(30),
            launch_url: Some("https://tool.example/launch".to_owned()),
        };

        let config = Config::load(Some(file.path()), Some(&overrides)).unwrap();

        assert_eq!(config.provider.freshness_window_secs, 30);
        assert_eq!(
            config.provider.launch_url.as_deref(),
            Some("https://tool.example/launch")
        );
    }

    #[test]
    fn test_load_invalid_file_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[provider]\nfreshness_window_secs = 0").unwrap();

        let err = Config::load(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
