//! Persistence port traits.
//!
//! Implementations live in tollgate-infra.

pub mod quota_store;
pub mod transcript_store;

pub use quota_store::QuotaStore;
pub use transcript_store::TranscriptStore;
