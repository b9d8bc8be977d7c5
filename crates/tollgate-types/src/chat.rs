//! Conversation transcript types for Tollgate.
//!
//! A transcript is the ordered history of one user's conversation with
//! the model. Entries are appended in strict user-then-assistant pairs
//! and the sequence is never reordered or truncated by this core.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single turn within a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    pub content: String,
}

impl TranscriptEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation history for a single user.
///
/// Serializes as a bare JSON array of `{role, content}` objects, the
/// shape the model context is built from. Growth is unbounded; no
/// eviction policy is applied here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a completed user/assistant exchange.
    ///
    /// Appending both turns together keeps the pair invariant at the
    /// type boundary: a user turn is never persisted without its
    /// assistant counterpart.
    pub fn push_exchange(
        &mut self,
        user_message: impl Into<String>,
        assistant_message: impl Into<String>,
    ) {
        self.entries.push(TranscriptEntry::user(user_message));
        self.entries.push(TranscriptEntry::assistant(assistant_message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_invalid_role_rejected() {
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_push_exchange_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push_exchange("hello", "hi there");
        transcript.push_exchange("how are you?", "fine");

        let roles: Vec<MessageRole> = transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
            ]
        );
        assert_eq!(transcript.entries()[2].content, "how are you?");
    }

    #[test]
    fn test_transcript_serializes_as_array() {
        let mut transcript = Transcript::new();
        transcript.push_exchange("q", "a");

        let json = serde_json::to_string(&transcript).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"role\":\"user\""));

        let parsed: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, transcript);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
        assert_eq!(serde_json::to_string(&transcript).unwrap(), "[]");
    }
}
