//! Daily-replenished request quota.

pub mod engine;

pub use engine::QuotaEngine;
