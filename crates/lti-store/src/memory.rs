//! In-memory consumer store.
//!
//! Provides [`MemoryStore`] for tests, development tooling and single-process
//! deployments. Nonce exclusivity holds within one process only.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use crate::consumer::Consumer;
use crate::store::{ConsumerStore, StoreError};

/// Recorded nonce, scoped to one consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NonceKey {
    consumer_key: String,
    nonce: String,
}

impl NonceKey {
    fn new(consumer: &Consumer, nonce: &str) -> Self {
        Self {
            consumer_key: consumer.key().to_owned(),
            nonce: nonce.to_owned(),
        }
    }
}

/// In-memory store.
///
/// Consumers are registered with the builder methods. Consumed nonces are kept
/// with their timestamp until [`prune_nonces`](Self::prune_nonces) drops the
/// ones that fell out of the freshness window. With a retention window set
/// through [`with_nonce_retention`](Self::with_nonce_retention), every
/// recorded nonce also drops the ones older than the retention behind it.
///
/// # Example
///
/// ```
/// use lti_store::{Consumer, ConsumerStore, MemoryStore};
///
/// let store = MemoryStore::new().with_consumer(Consumer::new("lms-1", "s3cret"));
/// let consumer = store.find_by_key("lms-1").unwrap().unwrap();
///
/// assert!(store.create_nonce(&consumer, "abc", 1_700_000_000).unwrap());
/// assert!(!store.validate_nonce(&consumer, "abc", 1_700_000_000).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    consumers: RwLock<HashMap<String, Consumer>>,
    nonces: Mutex<HashMap<NonceKey, i64>>,
    retention: Option<Duration>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with consumers.
    #[must_use]
    pub fn from_consumers(consumers: impl IntoIterator<Item = Consumer>) -> Self {
        consumers
            .into_iter()
            .fold(Self::new(), MemoryStore::with_consumer)
    }

    /// Prune nonces on every insert, keeping those within `retention` of the
    /// newly recorded timestamp.
    ///
    /// Timestamps are accepted on both sides of now, so `retention` must be at
    /// least twice the provider's freshness window. A shorter one lets a
    /// pruned nonce be replayed while its timestamp is still fresh.
    #[must_use]
    pub fn with_nonce_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    /// Register a consumer, replacing any consumer with the same key.
    #[must_use]
    pub fn with_consumer(self, consumer: Consumer) -> Self {
        self.insert_consumer(consumer);
        self
    }

    /// Register a consumer, replacing any consumer with the same key.
    pub fn insert_consumer(&self, consumer: Consumer) {
        self.consumers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(consumer.key().to_owned(), consumer);
    }

    /// Enable or disable a registered consumer.
    ///
    /// Returns `false` if no consumer is registered under `key`.
    pub fn set_active(&self, key: &str, active: bool) -> bool {
        let mut consumers = self
            .consumers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match consumers.remove(key) {
            Some(consumer) => {
                consumers.insert(key.to_owned(), consumer.with_active(active));
                true
            }
            None => false,
        }
    }

    /// Drop nonces recorded with a timestamp strictly before `older_than`.
    ///
    /// Returns the number of nonces removed.
    pub fn prune_nonces(&self, older_than: i64) -> usize {
        let mut nonces = self.nonces.lock().unwrap_or_else(PoisonError::into_inner);
        prune(&mut nonces, older_than)
    }

    /// Number of recorded nonces.
    pub fn nonce_count(&self) -> usize {
        self.nonces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

}

fn prune(nonces: &mut HashMap<NonceKey, i64>, older_than: i64) -> usize {
    let before = nonces.len();
    nonces.retain(|_, timestamp| *timestamp >= older_than);
    let removed = before - nonces.len();
    if removed > 0 {
        tracing::debug!(removed, remaining = nonces.len(), "Pruned expired nonces");
    }
    removed
}

impl ConsumerStore for MemoryStore {
    fn find_by_key(&self, key: &str) -> Result<Option<Consumer>, StoreError> {
        Ok(self
            .consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn validate_nonce(
        &self,
        consumer: &Consumer,
        nonce: &str,
        _timestamp: i64,
    ) -> Result<bool, StoreError> {
        let nonces = self.nonces.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(!nonces.contains_key(&NonceKey::new(consumer, nonce)))
    }

    fn create_nonce(
        &self,
        consumer: &Consumer,
        nonce: &str,
        timestamp: i64,
    ) -> Result<bool, StoreError> {
        let mut nonces = self.nonces.lock().unwrap_or_else(PoisonError::into_inner);
        let key = NonceKey::new(consumer, nonce);
        if nonces.contains_key(&key) {
            return Ok(false);
        }
        nonces.insert(key, timestamp);
        if let Some(retention) = self.retention {
            let secs = i64::try_from(retention.as_secs()).unwrap_or(i64::MAX);
            prune(&mut nonces, timestamp.saturating_sub(secs));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_consumer(Consumer::new("lms-1", "s3cret"))
            .with_consumer(Consumer::new("lms-2", "other"))
    }

    #[test]
    fn test_find_by_key() {
        let store = store();

        let consumer = store.find_by_key("lms-1").unwrap().unwrap();
        assert_eq!(consumer.secret(), "s3cret");
        assert!(store.find_by_key("missing").unwrap().is_none());
    }

    #[test]
    fn test_from_consumers() {
        let store = MemoryStore::from_consumers([
            Consumer::new("a", "1"),
            Consumer::new("b", "2").with_active(false),
        ]);

        assert!(store.find_by_key("a").unwrap().unwrap().is_active());
        assert!(!store.find_by_key("b").unwrap().unwrap().is_active());
    }

    #[test]
    fn test_set_active() {
        let store = store();

        assert!(store.set_active("lms-1", false));
        assert!(!store.find_by_key("lms-1").unwrap().unwrap().is_active());
        assert!(!store.set_active("missing", false));
    }

    #[test]
    fn test_validate_nonce_does_not_record() {
        let store = store();
        let consumer = store.find_by_key("lms-1").unwrap().unwrap();

        assert!(store.validate_nonce(&consumer, "n1", 100).unwrap());
        assert!(store.validate_nonce(&consumer, "n1", 100).unwrap());
        assert_eq!(store.nonce_count(), 0);
    }

    #[test]
    fn test_create_nonce_once() {
        let store = store();
        let consumer = store.find_by_key("lms-1").unwrap().unwrap();

        assert!(store.create_nonce(&consumer, "n1", 100).unwrap());
        assert!(!store.create_nonce(&consumer, "n1", 100).unwrap());
        assert!(!store.validate_nonce(&consumer, "n1", 100).unwrap());
    }

    #[test]
    fn test_nonce_scoped_per_consumer() {
        let store = store();
        let first = store.find_by_key("lms-1").unwrap().unwrap();
        let second = store.find_by_key("lms-2").unwrap().unwrap();

        assert!(store.create_nonce(&first, "shared", 100).unwrap());
        assert!(store.validate_nonce(&second, "shared", 100).unwrap());
        assert!(store.create_nonce(&second, "shared", 100).unwrap());
        assert!(!store.validate_nonce(&first, "shared", 100).unwrap());
        assert_eq!(store.nonce_count(), 2);
    }

    #[test]
    fn test_prune_nonces() {
        let store = store();
        let consumer = store.find_by_key("lms-1").unwrap().unwrap();
        store.create_nonce(&consumer, "old", 100).unwrap();
        store.create_nonce(&consumer, "new", 200).unwrap();

        assert_eq!(store.prune_nonces(150), 1);
        assert_eq!(store.nonce_count(), 1);
        assert!(store.validate_nonce(&consumer, "old", 100).unwrap());
        assert!(!store.validate_nonce(&consumer, "new", 200).unwrap());
    }

    #[test]
    fn test_retention_prunes_on_insert() {
        let store = store().with_nonce_retention(Duration::from_secs(120));
        let consumer = store.find_by_key("lms-1").unwrap().unwrap();

        for ts in [100, 150, 200] {
            store.create_nonce(&consumer, &format!("n{ts}"), ts).unwrap();
        }
        assert_eq!(store.nonce_count(), 3);

        // 300 - 120 = 180 drops n100 and n150
        store.create_nonce(&consumer, "n300", 300).unwrap();
        assert_eq!(store.nonce_count(), 2);
        assert!(!store.validate_nonce(&consumer, "n200", 200).unwrap());
    }

    #[test]
    fn test_without_retention_nonces_kept() {
        let store = store();
        let consumer = store.find_by_key("lms-1").unwrap().unwrap();

        store.create_nonce(&consumer, "old", 0).unwrap();
        store.create_nonce(&consumer, "new", 1_000_000).unwrap();

        assert_eq!(store.nonce_count(), 2);
    }

    #[test]
    fn test_concurrent_create_nonce_single_winner() {
        let store = store();
        let consumer = store.find_by_key("lms-1").unwrap().unwrap();

        let wins = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.create_nonce(&consumer, "race", 100).unwrap()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|won| *won)
                .count()
        });

        assert_eq!(wins, 1);
    }
}
