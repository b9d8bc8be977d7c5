//! Transcript persistence trait.

use tollgate_types::chat::Transcript;
use tollgate_types::error::StoreError;
use tollgate_types::UserId;

/// Trait for persisting per-user conversation transcripts.
///
/// Transcripts are saved as a whole snapshot after every append; there
/// is no incremental write. Uses RPITIT (native async fn in traits,
/// Rust 2024 edition). Implementations live in tollgate-infra.
pub trait TranscriptStore: Send + Sync {
    /// Load a user's transcript. Returns None for a never-seen user.
    fn load(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<Transcript>, StoreError>> + Send;

    /// Persist a user's transcript in full (upsert).
    fn save(
        &self,
        user_id: UserId,
        transcript: &Transcript,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
