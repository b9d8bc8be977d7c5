//! Per-user quota types.
//!
//! A `QuotaRecord` tracks how many requests a user has left and when the
//! daily replenishment last fired. Records are created at full capacity
//! on first observation and never deleted (growth is unbounded -- a
//! known limitation inherited from the upstream design).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Replenishment policy applied to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    /// Ceiling for `requests_remaining`.
    pub max_limit: u32,
    /// Requests added per elapsed day, capped at `max_limit`.
    pub daily_increment: u32,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            max_limit: 6,
            daily_increment: 2,
        }
    }
}

/// Remaining-request counter for a single user.
///
/// Invariant: `requests_remaining` never exceeds the policy's
/// `max_limit` and never goes negative (enforced by the quota engine;
/// the counter is unsigned so the floor holds by construction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub requests_remaining: u32,
    /// When replenishment last fired. `None` for legacy records that
    /// predate timestamping; the engine treats those as due immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_replenish_at: Option<DateTime<Utc>>,
}

impl QuotaRecord {
    /// A fresh record at full capacity, stamped at `now`.
    pub fn fresh(policy: &QuotaPolicy, now: DateTime<Utc>) -> Self {
        Self {
            requests_remaining: policy.max_limit,
            last_replenish_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = QuotaPolicy::default();
        assert_eq!(policy.max_limit, 6);
        assert_eq!(policy.daily_increment, 2);
    }

    #[test]
    fn test_fresh_record_at_capacity() {
        let now = Utc::now();
        let record = QuotaRecord::fresh(&QuotaPolicy::default(), now);
        assert_eq!(record.requests_remaining, 6);
        assert_eq!(record.last_replenish_at, Some(now));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = QuotaRecord {
            requests_remaining: 3,
            last_replenish_at: Some(Utc::now()),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: QuotaRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_legacy_record_without_timestamp() {
        // Records persisted before timestamping deserialize with None.
        let parsed: QuotaRecord =
            serde_json::from_str(r#"{"requests_remaining": 4}"#).unwrap();
        assert_eq!(parsed.requests_remaining, 4);
        assert!(parsed.last_replenish_at.is_none());

        // And the absent field stays absent on the way back out.
        let json = serde_json::to_string(&parsed).unwrap();
        assert!(!json.contains("last_replenish_at"));
    }
}
