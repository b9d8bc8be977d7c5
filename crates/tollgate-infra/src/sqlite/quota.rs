//! SQLite quota record store.
//!
//! Implements `QuotaStore` from `tollgate-core` using sqlx with split
//! read/write pools. Timestamps are stored as RFC 3339 text; a NULL
//! `last_replenish_at` maps to a legacy record with no timestamp.

use chrono::{DateTime, Utc};
use sqlx::Row;

use tollgate_core::storage::QuotaStore;
use tollgate_types::error::StoreError;
use tollgate_types::quota::QuotaRecord;
use tollgate_types::UserId;

use std::collections::HashMap;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `QuotaStore`.
pub struct SqliteQuotaStore {
    pool: DatabasePool,
}

impl SqliteQuotaStore {
    /// Create a new quota store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("invalid datetime: {e}")))
}

impl QuotaStore for SqliteQuotaStore {
    async fn load_all(&self) -> Result<HashMap<UserId, QuotaRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT user_id, requests_remaining, last_replenish_at FROM quota_records",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut records = HashMap::with_capacity(rows.len());
        for row in &rows {
            let user_id: i64 = row
                .try_get("user_id")
                .map_err(|e| StoreError::Query(e.to_string()))?;
            let requests_remaining: i64 = row
                .try_get("requests_remaining")
                .map_err(|e| StoreError::Query(e.to_string()))?;
            let last_replenish_at: Option<String> = row
                .try_get("last_replenish_at")
                .map_err(|e| StoreError::Query(e.to_string()))?;

            let record = QuotaRecord {
                requests_remaining: u32::try_from(requests_remaining).map_err(|_| {
                    StoreError::Serialization(format!(
                        "negative requests_remaining for user {user_id}"
                    ))
                })?,
                last_replenish_at: last_replenish_at.as_deref().map(parse_datetime).transpose()?,
            };
            records.insert(user_id, record);
        }

        Ok(records)
    }

    async fn put(&self, user_id: UserId, record: &QuotaRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO quota_records (user_id, requests_remaining, last_replenish_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET
                   requests_remaining = excluded.requests_remaining,
                   last_replenish_at = excluded.last_replenish_at,
                   updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(i64::from(record.requests_remaining))
        .bind(record.last_replenish_at.map(|dt| dt.to_rfc3339()))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }
}
