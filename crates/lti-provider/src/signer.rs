//! Consumer-side launch signing.
//!
//! Produces the signed POST parameters an LMS sends to a tool. Used to emulate
//! a consumer in tests and developer tooling.

use std::collections::BTreeMap;

use rand::RngExt;

use crate::error::MalformedReason;
use crate::oauth::{
    OAUTH_CALLBACK, OAUTH_CONSUMER_KEY, OAUTH_NONCE, OAUTH_SIGNATURE_METHOD, OAUTH_TIMESTAMP,
    OAUTH_VERSION, OAUTH_VERSION_1,
};
use crate::provider::unix_now;
use crate::signature::{
    HMAC_SHA1, OAUTH_SIGNATURE, RequestTarget, build_signature_base_string, sign_hmac_sha1,
    signature_parameters, signing_key,
};

/// Error while signing a launch.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The launch URL is not an absolute URL.
    #[error("cannot sign launch: {0}")]
    InvalidUri(#[from] MalformedReason),
}

/// Generate cryptographically random nonce (32 hex characters).
fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// Signs launches on behalf of one consumer.
#[derive(Clone)]
pub struct LaunchSigner {
    consumer_key: String,
    consumer_secret: String,
}

impl std::fmt::Debug for LaunchSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchSigner")
            .field("consumer_key", &self.consumer_key)
            .finish_non_exhaustive()
    }
}

impl LaunchSigner {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Sign a POST to `url` with a fresh nonce and the current time.
    ///
    /// Returns `params` extended with the OAuth protocol parameters and
    /// `oauth_signature`.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidUri`] if `url` is not absolute.
    pub fn sign(
        &self,
        url: &str,
        params: BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, SignError> {
        self.sign_with(url, params, &generate_nonce(), unix_now())
    }

    /// Sign a POST to `url` with an explicit nonce and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidUri`] if `url` is not absolute.
    pub fn sign_with(
        &self,
        url: &str,
        mut params: BTreeMap<String, String>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<BTreeMap<String, String>, SignError> {
        let target = RequestTarget::parse(url)?;

        params.insert(OAUTH_CONSUMER_KEY.to_owned(), self.consumer_key.clone());
        params.insert(OAUTH_NONCE.to_owned(), nonce.to_owned());
        params.insert(OAUTH_SIGNATURE_METHOD.to_owned(), HMAC_SHA1.to_owned());
        params.insert(OAUTH_TIMESTAMP.to_owned(), timestamp.to_string());
        params.insert(OAUTH_VERSION.to_owned(), OAUTH_VERSION_1.to_owned());
        params
            .entry(OAUTH_CALLBACK.to_owned())
            .or_insert_with(|| "about:blank".to_owned());
        params.remove(OAUTH_SIGNATURE);

        let signed = signature_parameters(&params, &target.query);
        let base_string = build_signature_base_string("POST", &target.base_uri, &signed);
        let signature = sign_hmac_sha1(&signing_key(&self.consumer_secret, ""), &base_string);
        params.insert(OAUTH_SIGNATURE.to_owned(), signature);

        Ok(params)
    }
}
