//! Required OAuth protocol parameters of a launch.

use std::collections::BTreeMap;

use crate::error::MalformedReason;
use crate::signature::{HMAC_SHA1, OAUTH_SIGNATURE};

pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
pub const OAUTH_NONCE: &str = "oauth_nonce";
pub const OAUTH_VERSION: &str = "oauth_version";
pub const OAUTH_CALLBACK: &str = "oauth_callback";
pub const OAUTH_VERSION_1: &str = "1.0";

/// Validated OAuth parameters borrowed from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OAuthParams<'a> {
    pub consumer_key: &'a str,
    pub signature: &'a str,
    pub nonce: &'a str,
    pub timestamp: i64,
}

impl<'a> OAuthParams<'a> {
    /// Extract and check the OAuth parameters of a launch.
    pub(crate) fn extract(oauth: &'a BTreeMap<String, String>) -> Result<Self, MalformedReason> {
        let consumer_key = require(oauth, OAUTH_CONSUMER_KEY)?;
        let method = require(oauth, OAUTH_SIGNATURE_METHOD)?;
        let signature = require(oauth, OAUTH_SIGNATURE)?;
        let timestamp = require(oauth, OAUTH_TIMESTAMP)?;
        let nonce = require(oauth, OAUTH_NONCE)?;

        if method != HMAC_SHA1 {
            return Err(MalformedReason::UnsupportedSignatureMethod(
                method.to_owned(),
            ));
        }

        if let Some(version) = oauth.get(OAUTH_VERSION)
            && version != OAUTH_VERSION_1
        {
            return Err(MalformedReason::UnsupportedVersion(version.clone()));
        }

        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|_| MalformedReason::InvalidTimestamp(timestamp.to_owned()))?;

        Ok(Self {
            consumer_key,
            signature,
            nonce,
            timestamp,
        })
    }
}

/// Require a non-empty parameter.
pub(crate) fn require<'a>(
    params: &'a BTreeMap<String, String>,
    name: &'static str,
) -> Result<&'a str, MalformedReason> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(MalformedReason::MissingParameter(name))
}
