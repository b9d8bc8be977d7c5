//! Quota record persistence trait.

use tollgate_types::error::StoreError;
use tollgate_types::quota::QuotaRecord;
use tollgate_types::UserId;

use std::collections::HashMap;

/// Trait for persisting per-user quota records.
///
/// The quota engine holds the authoritative in-memory map and writes
/// through to this store after every mutation; `load_all` hydrates the
/// map at startup. Uses RPITIT (native async fn in traits, Rust 2024
/// edition). Implementations live in tollgate-infra.
pub trait QuotaStore: Send + Sync {
    /// Load every persisted quota record.
    fn load_all(
        &self,
    ) -> impl std::future::Future<Output = Result<HashMap<UserId, QuotaRecord>, StoreError>> + Send;

    /// Persist one user's record (upsert).
    fn put(
        &self,
        user_id: UserId,
        record: &QuotaRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
