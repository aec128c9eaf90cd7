//! Timestamp freshness and nonce one-time-use checks.
//!
//! The timestamp bounds the window in which a captured request is usable; the
//! nonce prevents reuse within that window. A [`ReplayCheck`] walks one
//! request through `Fresh → TimestampChecked → NonceChecked → Accepted`,
//! falling to `Rejected` at the first failed step.

use std::time::Duration;

use lti_store::{Consumer, ConsumerStore};

use crate::error::AuthError;

/// Default freshness window.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(60);

/// Progress of a single request through the replay checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Fresh,
    TimestampChecked,
    NonceChecked,
    Accepted,
    Rejected,
}

/// Replay protection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayGuard {
    window: Duration,
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_WINDOW)
    }
}

impl ReplayGuard {
    /// Create a guard accepting timestamps within `window` of now.
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Freshness window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start checking one request.
    pub fn begin<'a>(
        &self,
        consumer: &'a Consumer,
        nonce: &'a str,
        timestamp: i64,
    ) -> ReplayCheck<'a> {
        ReplayCheck {
            window: self.window,
            consumer,
            nonce,
            timestamp,
            state: ReplayState::Fresh,
        }
    }
}

/// Per-request replay state machine. Not persisted beyond one validation.
#[derive(Debug)]
pub struct ReplayCheck<'a> {
    window: Duration,
    consumer: &'a Consumer,
    nonce: &'a str,
    timestamp: i64,
    state: ReplayState,
}

impl ReplayCheck<'_> {
    /// Current state.
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Reject if `|now - timestamp|` exceeds the window.
    pub fn check_timestamp(&mut self, now: i64) -> Result<(), AuthError> {
        debug_assert_eq!(self.state, ReplayState::Fresh);
        if self.timestamp.abs_diff(now) > self.window.as_secs() {
            self.state = ReplayState::Rejected;
            return Err(AuthError::StaleTimestamp {
                timestamp: self.timestamp,
                now,
                window_secs: self.window.as_secs(),
            });
        }
        self.state = ReplayState::TimestampChecked;
        Ok(())
    }

    /// Reject if the store has already seen the nonce. Read-only.
    pub fn check_nonce<S: ConsumerStore + ?Sized>(&mut self, store: &S) -> Result<(), AuthError> {
        debug_assert_eq!(self.state, ReplayState::TimestampChecked);
        match store.validate_nonce(self.consumer, self.nonce, self.timestamp) {
            Ok(true) => {
                self.state = ReplayState::NonceChecked;
                Ok(())
            }
            Ok(false) => {
                self.state = ReplayState::Rejected;
                Err(AuthError::ReplayedNonce)
            }
            Err(e) => {
                self.state = ReplayState::Rejected;
                Err(e.into())
            }
        }
    }

    /// Consume the nonce. Must be the last gate of a validation.
    ///
    /// Losing a concurrent race on the same nonce counts as a replay.
    pub fn accept<S: ConsumerStore + ?Sized>(&mut self, store: &S) -> Result<(), AuthError> {
        debug_assert_eq!(self.state, ReplayState::NonceChecked);
        match store.create_nonce(self.consumer, self.nonce, self.timestamp) {
            Ok(true) => {
                self.state = ReplayState::Accepted;
                Ok(())
            }
            Ok(false) => {
                self.state = ReplayState::Rejected;
                Err(AuthError::ReplayedNonce)
            }
            Err(e) => {
                self.state = ReplayState::Rejected;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lti_store::{MemoryStore, StoreError};

    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn consumer() -> Consumer {
        Consumer::new("lms-1", "s3cret")
    }

    #[test]
    fn test_timestamp_within_window() {
        let guard = ReplayGuard::default();
        let consumer = consumer();

        for ts in [NOW, NOW - 60, NOW + 60] {
            let mut check = guard.begin(&consumer, "n", ts);
            assert!(check.check_timestamp(NOW).is_ok(), "ts offset {}", ts - NOW);
            assert_eq!(check.state(), ReplayState::TimestampChecked);
        }
    }

    #[test]
    fn test_timestamp_outside_window_both_directions() {
        let guard = ReplayGuard::default();
        let consumer = consumer();

        for ts in [NOW - 61, NOW + 61, 0] {
            let mut check = guard.begin(&consumer, "n", ts);
            let err = check.check_timestamp(NOW).unwrap_err();
            assert!(matches!(err, AuthError::StaleTimestamp { .. }));
            assert_eq!(check.state(), ReplayState::Rejected);
        }
    }

    #[test]
    fn test_custom_window() {
        let guard = ReplayGuard::new(Duration::from_secs(300));
        let consumer = consumer();

        let mut check = guard.begin(&consumer, "n", NOW - 299);
        assert!(check.check_timestamp(NOW).is_ok());
        assert_eq!(guard.window(), Duration::from_secs(300));
    }

    #[test]
    fn test_full_acceptance_records_nonce() {
        let store = MemoryStore::new().with_consumer(consumer());
        let consumer = consumer();
        let guard = ReplayGuard::default();

        let mut check = guard.begin(&consumer, "n1", NOW);
        check.check_timestamp(NOW).unwrap();
        check.check_nonce(&store).unwrap();
        assert_eq!(store.nonce_count(), 0);
        check.accept(&store).unwrap();

        assert_eq!(check.state(), ReplayState::Accepted);
        assert_eq!(store.nonce_count(), 1);
    }

    #[test]
    fn test_seen_nonce_rejected() {
        let store = MemoryStore::new();
        let consumer = consumer();
        store.create_nonce(&consumer, "n1", NOW).unwrap();
        let guard = ReplayGuard::default();

        let mut check = guard.begin(&consumer, "n1", NOW);
        check.check_timestamp(NOW).unwrap();
        let err = check.check_nonce(&store).unwrap_err();

        assert!(matches!(err, AuthError::ReplayedNonce));
        assert_eq!(check.state(), ReplayState::Rejected);
    }

    #[test]
    fn test_lost_race_rejected() {
        let store = MemoryStore::new();
        let consumer = consumer();
        let guard = ReplayGuard::default();

        let mut check = guard.begin(&consumer, "n1", NOW);
        check.check_timestamp(NOW).unwrap();
        check.check_nonce(&store).unwrap();
        // Another request consumes the nonce between check and accept
        store.create_nonce(&consumer, "n1", NOW).unwrap();

        assert!(matches!(
            check.accept(&store).unwrap_err(),
            AuthError::ReplayedNonce
        ));
    }

    struct FailingStore;

    impl ConsumerStore for FailingStore {
        fn find_by_key(&self, _key: &str) -> Result<Option<Consumer>, StoreError> {
            Err(StoreError::unavailable("Failing"))
        }

        fn validate_nonce(&self, _: &Consumer, _: &str, _: i64) -> Result<bool, StoreError> {
            Err(StoreError::unavailable("Failing"))
        }

        fn create_nonce(&self, _: &Consumer, _: &str, _: i64) -> Result<bool, StoreError> {
            Err(StoreError::unavailable("Failing"))
        }
    }

    #[test]
    fn test_store_failure_rejects() {
        let consumer = consumer();
        let guard = ReplayGuard::default();

        let mut check = guard.begin(&consumer, "n1", NOW);
        check.check_timestamp(NOW).unwrap();
        let err = check.check_nonce(&FailingStore).unwrap_err();

        assert_eq!(err.reason(), "store_unavailable");
        assert_eq!(check.state(), ReplayState::Rejected);
    }
}
