//! Time-bounded memo of subscription oracle results.
//!
//! Entries expire after a TTL and the whole map is additionally swept on
//! a fixed period, bounding worst-case staleness to TTL + one sweep
//! interval. An expired entry is treated as absent, never as `false`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use tollgate_types::UserId;

use super::SubscriptionOracle;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    subscribed: bool,
    cached_at: Instant,
}

/// Shared TTL cache over subscription oracle calls.
///
/// Lost updates between concurrent flows are harmless: values are
/// idempotent booleans and the next TTL expiry re-converges.
pub struct SubscriptionCache {
    entries: DashMap<UserId, CacheEntry>,
    ttl: Duration,
}

impl SubscriptionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Resolve a user's subscription status, consulting the oracle only
    /// on a miss or stale entry.
    ///
    /// An oracle failure is treated as "not subscribed" for this call
    /// and is NOT cached, so the next message retries the oracle instead
    /// of locking the user out of entitlement on a transient error.
    pub async fn is_subscribed<O: SubscriptionOracle>(
        &self,
        user_id: UserId,
        oracle: &O,
    ) -> bool {
        if let Some(entry) = self.entries.get(&user_id) {
            if entry.cached_at.elapsed() < self.ttl {
                return entry.subscribed;
            }
        }

        match oracle.check(user_id).await {
            Ok(subscribed) => {
                self.entries.insert(
                    user_id,
                    CacheEntry {
                        subscribed,
                        cached_at: Instant::now(),
                    },
                );
                subscribed
            }
            Err(e) => {
                warn!(user_id, error = %e, "membership check failed; treating as not subscribed");
                false
            }
        }
    }

    /// Drop all entries unconditionally.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spawn the periodic bulk sweep on its own task.
    ///
    /// Runs independently of message handling; in-flight lookups are
    /// never blocked by the sweep. Cancelling the token stops the task.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // interval fires immediately; skip the startup tick.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!(entries = cache.len(), "sweeping subscription cache");
                        cache.clear();
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tollgate_types::error::OracleError;

    /// Oracle fake returning a scripted sequence of results, counting calls.
    struct ScriptedOracle {
        results: Mutex<Vec<Result<bool, OracleError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedOracle {
        fn new(results: Vec<Result<bool, OracleError>>) -> Self {
            Self {
                results: Mutex::new(results),
                calls: AtomicUsize::new(0),
            }
        }

        /// Once the script runs out, every call answers `Ok(true)`.
        fn subscribed() -> Self {
            Self::new(Vec::new())
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SubscriptionOracle for ScriptedOracle {
        async fn check(&self, _user_id: UserId) -> Result<bool, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                Ok(true)
            } else {
                results.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_oracle() {
        let cache = SubscriptionCache::new(Duration::from_secs(60));
        let oracle = ScriptedOracle::subscribed();

        assert!(cache.is_subscribed(1, &oracle).await);
        assert!(cache.is_subscribed(1, &oracle).await);
        assert!(cache.is_subscribed(1, &oracle).await);
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn test_miss_invokes_oracle_exactly_once() {
        let cache = SubscriptionCache::new(Duration::from_secs(60));
        let oracle = ScriptedOracle::new(vec![Ok(false)]);

        assert!(!cache.is_subscribed(1, &oracle).await);
        assert_eq!(oracle.call_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_treated_as_absent() {
        // Zero TTL: every entry is immediately stale.
        let cache = SubscriptionCache::new(Duration::ZERO);
        let oracle = ScriptedOracle::new(vec![Ok(true), Ok(false)]);

        assert!(cache.is_subscribed(1, &oracle).await);
        // The stale `true` is not returned; the oracle is re-consulted.
        assert!(!cache.is_subscribed(1, &oracle).await);
        assert_eq!(oracle.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_not_cached() {
        let cache = SubscriptionCache::new(Duration::from_secs(60));
        let oracle = ScriptedOracle::new(vec![
            Err(OracleError::Transient("network".to_string())),
            Ok(true),
        ]);

        // Transient failure reads as not-subscribed but leaves no entry.
        assert!(!cache.is_subscribed(1, &oracle).await);
        assert!(cache.is_empty());

        // The next call retries the oracle and caches the real answer.
        assert!(cache.is_subscribed(1, &oracle).await);
        assert_eq!(oracle.call_count(), 2);
        assert!(cache.is_subscribed(1, &oracle).await);
        assert_eq!(oracle.call_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_all_entries() {
        let cache = SubscriptionCache::new(Duration::from_secs(60));
        let oracle = ScriptedOracle::subscribed();

        cache.is_subscribed(1, &oracle).await;
        cache.is_subscribed(2, &oracle).await;
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());

        // After the sweep the oracle is consulted again.
        cache.is_subscribed(1, &oracle).await;
        assert_eq!(oracle.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_clears_periodically() {
        let cache = Arc::new(SubscriptionCache::new(Duration::from_secs(3600)));
        let oracle = ScriptedOracle::subscribed();
        cache.is_subscribed(1, &oracle).await;
        assert_eq!(cache.len(), 1);

        let shutdown = CancellationToken::new();
        let handle = cache.spawn_sweeper(Duration::from_secs(10), shutdown.clone());

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(cache.is_empty());

        shutdown.cancel();
        handle.await.unwrap();
    }
}
