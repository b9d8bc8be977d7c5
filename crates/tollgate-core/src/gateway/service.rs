//! Gateway service composing quota, subscription, persistence, and the
//! model call into the per-message decision sequence.
//!
//! Per inbound message: load transcript, resolve subscription, gate and
//! consume quota for non-subscribers, call the model, append the
//! exchange, persist. Subscribed users skip quota entirely; their quota
//! record, if any, is left untouched for the message.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use tollgate_types::chat::Transcript;
use tollgate_types::quota::QuotaPolicy;
use tollgate_types::UserId;

use crate::llm::ChatModel;
use crate::quota::QuotaEngine;
use crate::storage::{QuotaStore, TranscriptStore};
use crate::subscription::{SubscriptionCache, SubscriptionOracle};

/// Fixed user-visible reply when the model call fails or times out.
///
/// Deliberately also appended to the transcript as the assistant turn,
/// so the model sees its own past failures as context.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Outcome of handling one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model (or the fallback) answered.
    Reply {
        text: String,
        /// Post-consumption remaining count; `None` for subscribers,
        /// who are exempt from quota bookkeeping.
        requests_remaining: Option<u32>,
    },
    /// Quota hit zero: no model call, no transcript mutation.
    QuotaExhausted,
}

/// Conversational-access gateway.
///
/// Generic over the persistence, oracle, and model ports so the core
/// stays free of infrastructure. The subscription cache is shared with
/// the sweeper task via `Arc`.
pub struct Gateway<Q, T, O, M>
where
    Q: QuotaStore,
    T: TranscriptStore,
    O: SubscriptionOracle,
    M: ChatModel,
{
    quota: QuotaEngine<Q>,
    cache: Arc<SubscriptionCache>,
    transcripts: T,
    oracle: O,
    model: M,
    /// Per-user turn locks: rapid double-sends from one user are
    /// serialized so the read-modify-write on their quota record cannot
    /// race. Distinct users proceed concurrently.
    turn_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl<Q, T, O, M> Gateway<Q, T, O, M>
where
    Q: QuotaStore,
    T: TranscriptStore,
    O: SubscriptionOracle,
    M: ChatModel,
{
    pub fn new(
        quota_store: Q,
        policy: QuotaPolicy,
        cache: Arc<SubscriptionCache>,
        transcripts: T,
        oracle: O,
        model: M,
    ) -> Self {
        Self {
            quota: QuotaEngine::new(quota_store, policy),
            cache,
            transcripts,
            oracle,
            model,
            turn_locks: DashMap::new(),
        }
    }

    /// Load persisted quota state. Call once before handling messages.
    pub async fn hydrate(&self) -> Result<(), tollgate_types::error::StoreError> {
        self.quota.hydrate().await
    }

    /// Handle one inbound message from `user_id`.
    pub async fn handle_message(&self, user_id: UserId, text: &str) -> TurnOutcome {
        let lock = self
            .turn_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _turn = lock.lock().await;

        let mut transcript = self.load_transcript(user_id).await;

        let subscribed = self.cache.is_subscribed(user_id, &self.oracle).await;

        let requests_remaining = if subscribed {
            None
        } else {
            let remaining = self.quota.check_and_replenish(user_id).await;
            if remaining == 0 {
                info!(user_id, "quota exhausted");
                return TurnOutcome::QuotaExhausted;
            }
            self.quota.consume(user_id).await;
            Some(remaining - 1)
        };

        let reply = match self.model.complete(text, &transcript).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user_id, error = %e, "model call failed; substituting fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        transcript.push_exchange(text, reply.clone());
        if let Err(e) = self.transcripts.save(user_id, &transcript).await {
            warn!(user_id, error = %e, "failed to persist transcript; continuing");
        }

        TurnOutcome::Reply {
            text: reply,
            requests_remaining,
        }
    }

    /// Replenish-aware remaining count, with no consumption.
    ///
    /// Used for greeting/status messages; creates the record for a
    /// never-seen user just like a real check would.
    pub async fn remaining(&self, user_id: UserId) -> u32 {
        self.quota.check_and_replenish(user_id).await
    }

    async fn load_transcript(&self, user_id: UserId) -> Transcript {
        match self.transcripts.load(user_id).await {
            Ok(Some(transcript)) => transcript,
            Ok(None) => Transcript::new(),
            Err(e) => {
                warn!(user_id, error = %e, "failed to load transcript; starting empty for this turn");
                Transcript::new()
            }
        }
    }
}
