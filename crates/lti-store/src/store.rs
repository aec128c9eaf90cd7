//! Store trait and error types.
//!
//! Provides the [`ConsumerStore`] trait consumed by the launch verifier, along
//! with [`StoreError`] for unified error handling across backends.
//!
//! # Nonce Protocol
//!
//! The verifier calls [`ConsumerStore::validate_nonce`] as a read-only check and
//! only calls [`ConsumerStore::create_nonce`] once every other check has passed.
//! Backends must make `create_nonce` an atomic insert-if-absent: when two
//! requests race on the same `(consumer, nonce)` pair, exactly one call returns
//! `true`.

use std::fmt;

use crate::consumer::Consumer;

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Backend identifier (e.g., "Memory", "Postgres").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            backend: None,
            source: None,
        }
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create an unavailable error for a backend.
    #[must_use]
    pub fn unavailable(backend: &'static str) -> Self {
        Self::new(StoreErrorKind::Unavailable).with_backend(backend)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "[Backend] Kind: source"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Consumer lookup and nonce bookkeeping used during launch verification.
///
/// Implementations must be safe to share between request handlers. Calls may
/// block on I/O; timeouts and cancellation belong to the surrounding transport.
pub trait ConsumerStore: Send + Sync {
    /// Resolve a consumer by its OAuth key.
    ///
    /// Returns `Ok(None)` when no consumer is registered under `key`.
    fn find_by_key(&self, key: &str) -> Result<Option<Consumer>, StoreError>;

    /// Check whether `nonce` is still unused for `consumer`.
    ///
    /// Must not mutate state. Returns `false` if the pair was already recorded.
    ///
    /// # Arguments
    ///
    /// * `consumer` - Consumer resolved by [`find_by_key`](Self::find_by_key)
    /// * `nonce` - Opaque `oauth_nonce` value
    /// * `timestamp` - `oauth_timestamp` in seconds since Unix epoch
    fn validate_nonce(
        &self,
        consumer: &Consumer,
        nonce: &str,
        timestamp: i64,
    ) -> Result<bool, StoreError>;

    /// Record `nonce` as consumed for `consumer`.
    ///
    /// Returns `false` if the pair was recorded concurrently by another request.
    fn create_nonce(
        &self,
        consumer: &Consumer,
        nonce: &str,
        timestamp: i64,
    ) -> Result<bool, StoreError>;
}

impl<S: ConsumerStore + ?Sized> ConsumerStore for &S {
    fn find_by_key(&self, key: &str) -> Result<Option<Consumer>, StoreError> {
        (**self).find_by_key(key)
    }

    fn validate_nonce(
        &self,
        consumer: &Consumer,
        nonce: &str,
        timestamp: i64,
    ) -> Result<bool, StoreError> {
        (**self).validate_nonce(consumer, nonce, timestamp)
    }

    fn create_nonce(
        &self,
        consumer: &Consumer,
        nonce: &str,
        timestamp: i64,
    ) -> Result<bool, StoreError> {
        (**self).create_nonce(consumer, nonce, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_store_error_new() {
        let err = StoreError::new(StoreErrorKind::Timeout);

        assert_eq!(err.kind, StoreErrorKind::Timeout);
        assert!(err.backend.is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_store_error_display_with_backend() {
        let err = StoreError::unavailable("Postgres");

        assert_eq!(err.to_string(), "[Postgres] Unavailable");
    }

    #[test]
    fn test_store_error_display_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = StoreError::new(StoreErrorKind::Other).with_source(io);

        assert_eq!(err.to_string(), "Error: reset");
        assert!(err.source().is_some());
    }
}
