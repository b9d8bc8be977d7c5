//! Infrastructure layer for Tollgate.
//!
//! Contains implementations of the port traits defined in
//! `tollgate-core`: SQLite storage for quota records and transcripts,
//! an OpenAI-compatible chat-completions client, the Telegram
//! group-membership oracle, and tracing initialization.

pub mod llm;
pub mod sqlite;
pub mod telegram;
pub mod telemetry;
