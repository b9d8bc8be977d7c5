//! SQLite persistence.

pub mod pool;
pub mod quota;
pub mod transcript;

pub use pool::DatabasePool;
pub use quota::SqliteQuotaStore;
pub use transcript::SqliteTranscriptStore;
