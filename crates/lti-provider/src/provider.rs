//! Launch validation entry point.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lti_config::ProviderConfig;
use lti_store::ConsumerStore;

use crate::context::LaunchContext;
use crate::error::AuthError;
use crate::oauth::{OAuthParams, require};
use crate::params::{LTI_MESSAGE_TYPE, LTI_VERSION};
use crate::replay::{DEFAULT_FRESHNESS_WINDOW, ReplayGuard};
use crate::request::LaunchRequest;
use crate::signature::{RequestTarget, verify_request_signature};

/// Runtime settings of a [`ToolProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Maximum distance between `oauth_timestamp` and now.
    pub freshness_window: Duration,
    /// Signed launch URL replacing the request URI, if pinned.
    pub launch_url: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            launch_url: None,
        }
    }
}

impl From<&ProviderConfig> for ProviderSettings {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            freshness_window: Duration::from_secs(config.freshness_window_secs),
            launch_url: config.launch_url.clone(),
        }
    }
}

/// Authenticates LTI launch requests against a [`ConsumerStore`].
///
/// # Example
///
/// ```
/// use lti_provider::{LaunchRequest, ToolProvider};
/// use lti_store::{Consumer, MemoryStore};
///
/// let store = MemoryStore::new().with_consumer(Consumer::new("lms-1", "s3cret"));
/// let provider = ToolProvider::new(store);
///
/// let request = LaunchRequest::new("POST", "https://tool.example/launch", [("oauth_consumer_key", "lms-1")]);
/// let err = provider.validate(request).unwrap_err();
/// assert_eq!(err.public_message(), "unauthorized");
/// ```
#[derive(Debug)]
pub struct ToolProvider<S> {
    store: S,
    settings: ProviderSettings,
    replay: ReplayGuard,
}

impl<S: ConsumerStore> ToolProvider<S> {
    /// Create a provider with default settings.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, ProviderSettings::default())
    }

    pub fn with_settings(store: S, settings: ProviderSettings) -> Self {
        let replay = ReplayGuard::new(settings.freshness_window);
        Self {
            store,
            settings,
            replay,
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate a launch against the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] describing the first failed check.
    pub fn validate(&self, request: LaunchRequest) -> Result<LaunchContext, AuthError> {
        self.validate_at(request, unix_now())
    }

    /// Validate a launch at an explicit Unix time.
    ///
    /// Checks run in order: required parameters, consumer lookup, consumer
    /// state, signature, timestamp, nonce. The nonce is consumed only after
    /// every other check has passed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] describing the first failed check.
    pub fn validate_at(&self, request: LaunchRequest, now: i64) -> Result<LaunchContext, AuthError> {
        match self.authenticate(&request, now) {
            Ok(consumer_key) => {
                tracing::info!(consumer_key = %consumer_key, "Accepted LTI launch");
                Ok(LaunchContext::new(consumer_key, request.into_classified()))
            }
            Err(err) => {
                let consumer_key = request
                    .classified()
                    .oauth
                    .get(crate::oauth::OAUTH_CONSUMER_KEY)
                    .map_or("", String::as_str);
                tracing::warn!(
                    consumer_key = %consumer_key,
                    reason = err.reason(),
                    error = %err,
                    "Rejected LTI launch"
                );
                Err(err)
            }
        }
    }

    /// Run every check; returns the accepted consumer key.
    fn authenticate(&self, request: &LaunchRequest, now: i64) -> Result<String, AuthError> {
        let classified = request.classified();
        let oauth = OAuthParams::extract(&classified.oauth)?;
        require(&classified.lti, LTI_MESSAGE_TYPE)?;
        require(&classified.lti, LTI_VERSION)?;

        let signed_uri = self.settings.launch_url.as_deref().unwrap_or(request.uri());
        let target = RequestTarget::parse(signed_uri)?;

        let consumer = self
            .store
            .find_by_key(oauth.consumer_key)?
            .ok_or_else(|| AuthError::UnknownConsumer {
                key: oauth.consumer_key.to_owned(),
            })?;
        if !consumer.is_active() {
            return Err(AuthError::InactiveConsumer {
                key: oauth.consumer_key.to_owned(),
            });
        }

        verify_request_signature(
            request.method(),
            &target,
            request.raw_parameters(),
            consumer.secret(),
            oauth.signature,
        )?;

        let mut replay = self.replay.begin(&consumer, oauth.nonce, oauth.timestamp);
        replay.check_timestamp(now)?;
        replay.check_nonce(&self.store)?;
        replay.accept(&self.store)?;

        Ok(consumer.key().to_owned())
    }
}

/// Current Unix time in seconds.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = ProviderConfig {
            freshness_window_secs: 120,
            launch_url: Some("https://tool.example/launch".to_owned()),
        };

        let settings = ProviderSettings::from(&config);

        assert_eq!(settings.freshness_window, Duration::from_secs(120));
        assert_eq!(
            settings.launch_url.as_deref(),
            Some("https://tool.example/launch")
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.freshness_window, Duration::from_secs(60));
        assert!(settings.launch_url.is_none());
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2020-01-01
        assert!(unix_now() > 1_577_836_800);
    }
}
