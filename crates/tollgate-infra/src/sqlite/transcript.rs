//! SQLite transcript store.
//!
//! Implements `TranscriptStore` from `tollgate-core`. A transcript is
//! stored as one row per user with the entries as a JSON array, rewritten
//! in full after every append (snapshot persistence).

use chrono::Utc;
use sqlx::Row;

use tollgate_core::storage::TranscriptStore;
use tollgate_types::chat::Transcript;
use tollgate_types::error::StoreError;
use tollgate_types::UserId;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TranscriptStore`.
pub struct SqliteTranscriptStore {
    pool: DatabasePool,
}

impl SqliteTranscriptStore {
    /// Create a new transcript store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl TranscriptStore for SqliteTranscriptStore {
    async fn load(&self, user_id: UserId) -> Result<Option<Transcript>, StoreError> {
        let row = sqlx::query("SELECT entries FROM transcripts WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let entries: String = row
                    .try_get("entries")
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                let transcript: Transcript = serde_json::from_str(&entries)
                    .map_err(|e| StoreError::Serialization(format!("invalid transcript: {e}")))?;
                Ok(Some(transcript))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, user_id: UserId, transcript: &Transcript) -> Result<(), StoreError> {
        let entries = serde_json::to_string(transcript)
            .map_err(|e| StoreError::Serialization(format!("failed to serialize transcript: {e}")))?;

        sqlx::query(
            r#"INSERT INTO transcripts (user_id, entries, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET
                   entries = excluded.entries,
                   updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(&entries)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_nonexistent_returns_none() {
        let store = SqliteTranscriptStore::new(test_pool().await);
        assert!(store.load(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_then_reload_is_identical() {
        let store = SqliteTranscriptStore::new(test_pool().await);

        let mut transcript = Transcript::new();
        transcript.push_exchange("hello", "hi there");
        transcript.push_exchange("second question", "second answer");
        store.save(1, &transcript).await.unwrap();

        let loaded = store.load(1).await.unwrap().unwrap();
        assert_eq!(loaded, transcript);
    }

    #[tokio::test]
    async fn test_save_overwrites_snapshot() {
        let store = SqliteTranscriptStore::new(test_pool().await);

        let mut transcript = Transcript::new();
        transcript.push_exchange("a", "b");
        store.save(1, &transcript).await.unwrap();

        transcript.push_exchange("c", "d");
        store.save(1, &transcript).await.unwrap();

        let loaded = store.load(1).await.unwrap().unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.entries()[3].content, "d");
    }

    #[tokio::test]
    async fn test_transcripts_are_per_user() {
        let store = SqliteTranscriptStore::new(test_pool().await);

        let mut first = Transcript::new();
        first.push_exchange("from one", "reply one");
        store.save(1, &first).await.unwrap();

        let mut second = Transcript::new();
        second.push_exchange("from two", "reply two");
        store.save(2, &second).await.unwrap();

        assert_eq!(store.load(1).await.unwrap().unwrap(), first);
        assert_eq!(store.load(2).await.unwrap().unwrap(), second);
    }

    #[tokio::test]
    async fn test_unicode_content_roundtrip() {
        let store = SqliteTranscriptStore::new(test_pool().await);

        let mut transcript = Transcript::new();
        transcript.push_exchange("Привет, как дела?", "Всё хорошо 😊");
        store.save(1, &transcript).await.unwrap();

        assert_eq!(store.load(1).await.unwrap().unwrap(), transcript);
    }
}
