//! Gateway configuration.
//!
//! `GatewayConfig` represents the process-start constants of the quota
//! and entitlement engine. Loaded from TOML; all fields have defaults
//! matching the upstream deployment.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::quota::QuotaPolicy;

/// Top-level configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Ceiling for a user's remaining requests.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Requests replenished per elapsed day.
    #[serde(default = "default_daily_increment")]
    pub daily_increment: u32,

    /// How long a cached subscription result stays valid.
    #[serde(default = "default_subscription_ttl_secs")]
    pub subscription_ttl_secs: u64,

    /// Period of the bulk cache sweep.
    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,

    /// Timeout for a single model call.
    #[serde(default = "default_model_timeout_secs")]
    pub model_timeout_secs: u64,

    /// System prompt prepended to every model call, if any.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_limit() -> u32 {
    6
}

fn default_daily_increment() -> u32 {
    2
}

fn default_subscription_ttl_secs() -> u64 {
    3600
}

fn default_cache_sweep_interval_secs() -> u64 {
    3600
}

fn default_model_timeout_secs() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
            daily_increment: default_daily_increment(),
            subscription_ttl_secs: default_subscription_ttl_secs(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
            model_timeout_secs: default_model_timeout_secs(),
            system_prompt: None,
        }
    }
}

impl GatewayConfig {
    pub fn quota_policy(&self) -> QuotaPolicy {
        QuotaPolicy {
            max_limit: self.max_limit,
            daily_increment: self.daily_increment,
        }
    }

    pub fn subscription_ttl(&self) -> Duration {
        Duration::from_secs(self.subscription_ttl_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }
}
