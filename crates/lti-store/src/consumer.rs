//! Trusted tool consumer (an LMS instance).

use std::fmt;

/// A tool consumer identified by an OAuth key/secret pair.
///
/// Consumers are provisioned out of band; the verifier only reads them.
#[derive(Clone, PartialEq, Eq)]
pub struct Consumer {
    key: String,
    secret: String,
    active: bool,
}

impl Consumer {
    /// Create an active consumer.
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            active: true,
        }
    }

    /// Set the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// OAuth consumer key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared secret used as the first half of the HMAC signing key.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Inactive consumers are rejected regardless of signature validity.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("active", &self.active)
            .finish()
    }
}
