//! LTI 1.x tool launch verification.
//!
//! Authenticates launch requests an LMS (the consumer) sends to a tool (the
//! provider), using OAuth 1.0a HMAC-SHA1 request signing:
//!
//! 1. Classify the POST parameters into OAuth, LTI, custom and extension sets
//! 2. Resolve the consumer through a [`ConsumerStore`](lti_store::ConsumerStore)
//! 3. Verify the signature over the canonical base string
//! 4. Enforce timestamp freshness and nonce one-time use
//! 5. Expose the accepted launch as a [`LaunchContext`]
//!
//! Every failure is an [`AuthError`]. Its variants are distinct for logging;
//! callers must answer the client with [`AuthError::public_message`] only.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use lti_provider::{LaunchRequest, LaunchSigner, ToolProvider};
//! use lti_store::{Consumer, MemoryStore};
//!
//! let url = "https://tool.example/launch";
//! let params = BTreeMap::from([
//!     ("lti_message_type".to_owned(), "basic-lti-launch-request".to_owned()),
//!     ("lti_version".to_owned(), "LTI-1p0".to_owned()),
//!     ("roles".to_owned(), "Instructor".to_owned()),
//! ]);
//! let signed = LaunchSigner::new("lms-1", "s3cret").sign(url, params).unwrap();
//!
//! let provider = ToolProvider::new(MemoryStore::new().with_consumer(Consumer::new("lms-1", "s3cret")));
//! let launch = provider.validate(LaunchRequest::new("POST", url, signed)).unwrap();
//! assert!(launch.is_instructor());
//! ```

mod classify;
mod context;
mod error;
mod oauth;
pub mod params;
mod provider;
mod replay;
mod request;
mod signature;
mod signer;

pub use classify::{ClassifiedParameters, ParameterCategory, classify};
pub use context::LaunchContext;
pub use error::{AuthError, MalformedReason, UNAUTHORIZED};
pub use provider::{ProviderSettings, ToolProvider};
pub use replay::{DEFAULT_FRESHNESS_WINDOW, ReplayCheck, ReplayGuard, ReplayState};
pub use request::LaunchRequest;
pub use signature::{
    HMAC_SHA1, build_signature_base_string, oauth_encode, sign_hmac_sha1, signing_key,
    verify_hmac_sha1,
};
pub use signer::{LaunchSigner, SignError};
