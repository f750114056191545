//! Ephemeral state → pending-authorization mapping with per-entry expiry.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// One login attempt waiting for its provider callback. The challenge is
/// derived from the verifier at creation and never set independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthorization {
    pub verifier: String,
    pub challenge: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: String,
}

#[derive(Debug)]
struct PendingEntry {
    record: PendingAuthorization,
    expires_at: DateTime<Utc>,
}

/// In-memory transaction store keyed by state token. Cloning shares the
/// underlying map, so one store instance can be injected into both flow
/// handlers and the health surface.
///
/// The mutex guard is only ever held for map access; callers must finish
/// store calls before any network I/O.
#[derive(Clone)]
pub struct TransactionStore {
    entries: Arc<Mutex<HashMap<String, PendingEntry>>>,
    ttl: Duration,
}

impl TransactionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Record a new pending login under `state`, stamped with its expiry.
    pub async fn insert(&self, state: String, record: PendingAuthorization) {
        let entry = PendingEntry {
            record,
            expires_at: Utc::now() + self.ttl,
        };
        self.entries.lock().await.insert(state, entry);
    }

    /// Atomically remove and return the record for `state`. The first caller
    /// wins; a replayed or expired state yields `None`. Expired entries are
    /// dropped here even before the sweeper gets to them.
    pub async fn consume(&self, state: &str) -> Option<PendingAuthorization> {
        let entry = self.entries.lock().await.remove(state)?;
        if Utc::now() > entry.expires_at {
            return None;
        }
        Some(entry.record)
    }

    /// Drop all expired entries, returning how many were removed.
    pub async fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        let now = Utc::now();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Background sweeper: periodically evict logins whose callback never came,
/// so abandoned attempts cannot grow the map forever.
pub fn spawn_sweeper(store: TransactionStore) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            let removed = store.sweep().await;
            if removed > 0 {
                debug!(removed, "swept expired login transactions");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: &str) -> PendingAuthorization {
        PendingAuthorization {
            verifier: format!("verifier-{tag}"),
            challenge: format!("challenge-{tag}"),
            client_id: "client".to_string(),
            redirect_uri: "https://app/cb".to_string(),
            scopes: "account_info.read".to_string(),
        }
    }

    #[tokio::test]
    async fn consume_returns_stored_record_once() {
        let store = TransactionStore::new(Duration::minutes(10));
        store.insert("abc".to_string(), record("a")).await;

        assert_eq!(store.consume("abc").await, Some(record("a")));
        // Replay with the same state must observe absence
        assert_eq!(store.consume("abc").await, None);
    }

    #[tokio::test]
    async fn unknown_state_is_absent() {
        let store = TransactionStore::new(Duration::minutes(10));
        assert_eq!(store.consume("never-issued").await, None);
    }

    #[tokio::test]
    async fn expired_entry_is_not_consumable() {
        let store = TransactionStore::new(Duration::seconds(-1));
        store.insert("old".to_string(), record("old")).await;
        assert_eq!(store.consume("old").await, None);
    }

    #[tokio::test]
    async fn sweep_drops_only_expired_entries() {
        let expired = TransactionStore::new(Duration::seconds(-1));
        expired.insert("dead".to_string(), record("dead")).await;
        assert_eq!(expired.sweep().await, 1);
        assert_eq!(expired.len().await, 0);

        let live = TransactionStore::new(Duration::minutes(10));
        live.insert("alive".to_string(), record("alive")).await;
        assert_eq!(live.sweep().await, 0);
        assert_eq!(live.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_consume_has_exactly_one_winner() {
        let store = TransactionStore::new(Duration::minutes(10));
        store.insert("race".to_string(), record("race")).await;

        let (a, b) = tokio::join!(store.consume("race"), store.consume("race"));
        assert!(a.is_some() ^ b.is_some(), "exactly one caller may win");
    }

    #[tokio::test]
    async fn distinct_states_do_not_interfere() {
        let store = TransactionStore::new(Duration::minutes(10));
        store.insert("one".to_string(), record("1")).await;
        store.insert("two".to_string(), record("2")).await;

        assert_eq!(store.consume("one").await, Some(record("1")));
        assert_eq!(store.consume("two").await, Some(record("2")));
    }
}
