//! Incoming launch request.

use std::collections::BTreeMap;

use crate::classify::{ClassifiedParameters, classify};

/// A launch request as received by the transport.
///
/// Parameters are classified once, at construction.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    method: String,
    uri: String,
    raw: BTreeMap<String, String>,
    classified: ClassifiedParameters,
}

impl LaunchRequest {
    /// Create a request from already-parsed POST parameters.
    ///
    /// # Arguments
    /// * `method` - HTTP method (always `POST` for a launch)
    /// * `uri` - Full request URI, including any query string
    /// * `parameters` - Form body parameters
    pub fn new<K, V>(
        method: impl Into<String>,
        uri: impl Into<String>,
        parameters: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let raw: BTreeMap<String, String> = parameters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let classified = classify(&raw);
        Self {
            method: method.into(),
            uri: uri.into(),
            raw,
            classified,
        }
    }

    /// Create a POST request from an `application/x-www-form-urlencoded` body.
    ///
    /// When a name repeats, the last value wins.
    pub fn from_form_body(uri: impl Into<String>, body: &str) -> Self {
        Self::new(
            "POST",
            uri,
            url::form_urlencoded::parse(body.as_bytes()).into_owned(),
        )
    }

    /// HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Full request URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Parameters exactly as received.
    pub fn raw_parameters(&self) -> &BTreeMap<String, String> {
        &self.raw
    }

    /// Parameters grouped by category.
    pub fn classified(&self) -> &ClassifiedParameters {
        &self.classified
    }

    pub(crate) fn into_classified(self) -> ClassifiedParameters {
        self.classified
    }
}
