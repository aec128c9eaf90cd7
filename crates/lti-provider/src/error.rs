//! Launch authentication errors.

use lti_store::StoreError;

/// Message returned to the untrusted caller for every rejection.
pub const UNAUTHORIZED: &str = "unauthorized";

/// Why a launch request is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MalformedReason {
    /// A required parameter is absent or empty.
    #[error("missing required parameter {0}")]
    MissingParameter(&'static str),

    /// `oauth_signature_method` is not `HMAC-SHA1`.
    #[error("unsupported signature method {0:?}")]
    UnsupportedSignatureMethod(String),

    /// `oauth_version` is present but not `1.0`.
    #[error("unsupported OAuth version {0:?}")]
    UnsupportedVersion(String),

    /// `oauth_timestamp` is not an integer.
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    /// The request URI cannot be parsed as an absolute URL.
    #[error("invalid request URI {0:?}")]
    InvalidUri(String),
}

/// Launch rejection.
///
/// Variants are distinguishable for logging. The `Display` output may carry
/// internal detail; only [`AuthError::public_message`] goes back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No consumer registered under the supplied key.
    #[error("unknown consumer {key:?}")]
    UnknownConsumer {
        /// Supplied `oauth_consumer_key`.
        key: String,
    },

    /// Consumer exists but is disabled.
    #[error("inactive consumer {key:?}")]
    InactiveConsumer {
        /// Supplied `oauth_consumer_key`.
        key: String,
    },

    /// Missing or unsupported protocol parameters.
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] MalformedReason),

    /// Supplied signature does not match the canonical signature.
    #[error("invalid signature")]
    InvalidSignature,

    /// `oauth_timestamp` is outside the freshness window.
    #[error("stale timestamp {timestamp} (now {now}, window {window_secs}s)")]
    StaleTimestamp {
        /// Supplied `oauth_timestamp`.
        timestamp: i64,
        /// Verification time.
        now: i64,
        /// Configured window.
        window_secs: u64,
    },

    /// Nonce already consumed for this consumer.
    #[error("replayed nonce")]
    ReplayedNonce,

    /// The consumer store could not answer.
    #[error("consumer store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Stable reason code for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnknownConsumer { .. } => "unknown_consumer",
            Self::InactiveConsumer { .. } => "inactive_consumer",
            Self::MalformedRequest(_) => "malformed_request",
            Self::InvalidSignature => "invalid_signature",
            Self::StaleTimestamp { .. } => "stale_timestamp",
            Self::ReplayedNonce => "replayed_nonce",
            Self::Store(_) => "store_unavailable",
        }
    }

    /// Message safe to echo to the caller. Identical for every variant.
    pub fn public_message(&self) -> &'static str {
        UNAUTHORIZED
    }
}
