//! Telegram group-membership oracle.
//!
//! Implements `SubscriptionOracle` against the Bot API `getChatMember`
//! method: a user counts as subscribed when their status in the
//! designated group is member, administrator, or creator. Any transport,
//! HTTP, or decode failure is transient -- the subscription cache maps
//! it to "not subscribed" for the current message without caching it.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use tollgate_core::subscription::SubscriptionOracle;
use tollgate_types::error::OracleError;
use tollgate_types::UserId;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Membership oracle backed by the Telegram Bot API.
///
/// Does NOT derive Debug: the bot token is part of every request URL
/// and must never leak into logs.
pub struct TelegramMembershipOracle {
    client: reqwest::Client,
    bot_token: SecretString,
    group_id: String,
    base_url: String,
}

impl TelegramMembershipOracle {
    /// Create a new oracle for the given bot token and group chat id.
    pub fn new(bot_token: SecretString, group_id: impl Into<String>) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| OracleError::Transient(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            bot_token,
            group_id: group_id.into(),
            base_url: TELEGRAM_API_BASE.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GetChatMemberResponse {
    ok: bool,
    #[serde(default)]
    result: Option<ChatMember>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: String,
}

/// Whether a `getChatMember` status string counts as group membership.
fn is_member_status(status: &str) -> bool {
    matches!(status, "member" | "administrator" | "creator")
}

impl SubscriptionOracle for TelegramMembershipOracle {
    async fn check(&self, user_id: UserId) -> Result<bool, OracleError> {
        let url = format!(
            "{}/bot{}/getChatMember",
            self.base_url,
            self.bot_token.expose_secret()
        );

        let user_id = user_id.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("chat_id", self.group_id.as_str()), ("user_id", user_id.as_str())])
            .send()
            .await
            .map_err(|e| OracleError::Transient(e.to_string()))?;

        let body: GetChatMemberResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Transient(format!("invalid response: {e}")))?;

        if !body.ok {
            return Err(OracleError::Transient(
                body.description
                    .unwrap_or_else(|| "getChatMember returned ok=false".to_string()),
            ));
        }

        let member = body
            .result
            .ok_or_else(|| OracleError::Transient("ok response without result".to_string()))?;

        Ok(is_member_status(&member.status))
    }
}
