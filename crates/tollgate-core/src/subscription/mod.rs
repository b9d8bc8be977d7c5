//! Subscription (group membership) checking.
//!
//! The oracle is an external, possibly slow membership check; the cache
//! memoizes its answers within a TTL so subscribers do not pay that
//! latency on every message.

pub mod cache;

pub use cache::SubscriptionCache;

use tollgate_types::error::OracleError;
use tollgate_types::UserId;

/// Trait for the external membership check.
///
/// Treated as unreliable and slow: any failure is transient and the
/// caller decides how to degrade. Uses RPITIT (native async fn in
/// traits, Rust 2024 edition). Implementations live in tollgate-infra.
pub trait SubscriptionOracle: Send + Sync {
    /// Whether the user is currently a member of the designated group.
    fn check(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<bool, OracleError>> + Send;
}
