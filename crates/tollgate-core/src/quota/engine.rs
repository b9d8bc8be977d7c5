//! Quota engine: per-user entitlement state with daily replenishment.
//!
//! The engine owns the authoritative in-memory map of `QuotaRecord`s and
//! writes through to a `QuotaStore` after every mutation, so a crash
//! right after a decision cannot silently lose quota state. Persistence
//! failures are logged and the turn continues on in-memory state;
//! replaying a write after a mid-write crash is an accepted risk (the
//! write-through is not atomic across process restarts).

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

use tollgate_types::error::StoreError;
use tollgate_types::quota::{QuotaPolicy, QuotaRecord};
use tollgate_types::UserId;

use crate::storage::QuotaStore;

/// Per-user request quota with additive, capped daily replenishment.
///
/// Generic over `QuotaStore` so the engine never depends on the
/// persistence layer. The map is owned by the engine and passed around
/// by handle; there is no ambient global state.
pub struct QuotaEngine<S: QuotaStore> {
    records: DashMap<UserId, QuotaRecord>,
    policy: QuotaPolicy,
    store: S,
}

impl<S: QuotaStore> QuotaEngine<S> {
    pub fn new(store: S, policy: QuotaPolicy) -> Self {
        Self {
            records: DashMap::new(),
            policy,
            store,
        }
    }

    /// Load persisted records into the in-memory map.
    ///
    /// Called once at startup, before any message is handled.
    pub async fn hydrate(&self) -> Result<(), StoreError> {
        let persisted = self.store.load_all().await?;
        let count = persisted.len();
        for (user_id, record) in persisted {
            self.records.insert(user_id, record);
        }
        debug!(records = count, "quota records hydrated");
        Ok(())
    }

    /// Check a user's quota, applying daily replenishment if due.
    ///
    /// A never-seen user gets a fresh record at full capacity. If at
    /// least one full day has elapsed since the last replenishment (or
    /// the record has no timestamp at all), `daily_increment` is added,
    /// capped at `max_limit`, and the timestamp is stamped to now --
    /// additive, never a reset-to-max. Repeated calls inside the same
    /// 24h window never double-replenish.
    pub async fn check_and_replenish(&self, user_id: UserId) -> u32 {
        self.check_and_replenish_at(user_id, Utc::now()).await
    }

    /// Consume one request, floored at zero.
    ///
    /// No-op for a user without a record; `check_and_replenish` is
    /// expected to have run first.
    pub async fn consume(&self, user_id: UserId) {
        let updated = match self.records.get_mut(&user_id) {
            Some(mut entry) => {
                let record = entry.value_mut();
                record.requests_remaining = record.requests_remaining.saturating_sub(1);
                record.clone()
            }
            None => {
                warn!(user_id, "consume called for user without a quota record");
                return;
            }
        };

        self.persist(user_id, &updated).await;
    }

    /// Current remaining count without mutation, for status displays.
    pub fn remaining(&self, user_id: UserId) -> Option<u32> {
        self.records.get(&user_id).map(|r| r.requests_remaining)
    }

    /// Clock-explicit variant of `check_and_replenish`.
    ///
    /// The mutation happens under the map entry lock; the guard is
    /// released before the write-through await.
    pub(crate) async fn check_and_replenish_at(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> u32 {
        let updated = {
            let mut entry = self
                .records
                .entry(user_id)
                .or_insert_with(|| QuotaRecord::fresh(&self.policy, now));
            let record = entry.value_mut();

            let due = match record.last_replenish_at {
                None => true,
                Some(last) => now.signed_duration_since(last) >= TimeDelta::days(1),
            };
            if due {
                record.requests_remaining = record
                    .requests_remaining
                    .saturating_add(self.policy.daily_increment)
                    .min(self.policy.max_limit);
                record.last_replenish_at = Some(now);
            }
            record.clone()
        };

        self.persist(user_id, &updated).await;
        updated.requests_remaining
    }

    /// Write-through to the store. Failures degrade to in-memory-only
    /// state for this turn, at the cost of possible loss on crash.
    async fn persist(&self, user_id: UserId, record: &QuotaRecord) {
        if let Err(e) = self.store.put(user_id, record).await {
            warn!(user_id, error = %e, "failed to persist quota record; continuing in memory");
        }
    }
}
