//! Consumer and nonce storage abstraction for LTI launch verification.
//!
//! The launch verifier never owns persistent state. It resolves consumers and
//! records consumed nonces through the [`ConsumerStore`] trait, which keeps the
//! protocol logic independent of the backend:
//!
//! - **Unit testing** against the in-memory [`MemoryStore`]
//! - **Backend flexibility** (SQL, Redis, a provisioning service)
//! - **Replay exclusivity** enforced where it belongs, at the store
//!
//! # Example
//!
//! ```
//! use lti_store::{Consumer, ConsumerStore, MemoryStore};
//!
//! let store = MemoryStore::new().with_consumer(Consumer::new("lms-1", "s3cret"));
//! let consumer = store.find_by_key("lms-1").unwrap().unwrap();
//! assert!(consumer.is_active());
//! assert!(store.validate_nonce(&consumer, "n-1", 1_700_000_000).unwrap());
//! ```

mod consumer;
mod memory;
mod store;

pub use consumer::Consumer;
pub use memory::MemoryStore;
pub use store::{ConsumerStore, StoreError, StoreErrorKind};
