//! Shared domain types for Tollgate.
//!
//! This crate contains the core domain types used across the Tollgate
//! gateway: quota records, transcripts, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod quota;

/// Platform-assigned numeric user identifier.
///
/// The chat transport hands us its own numeric ids (e.g. Telegram chat
/// ids), so user identity is an `i64` rather than a generated UUID.
pub type UserId = i64;
