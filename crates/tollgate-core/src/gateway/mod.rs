//! Per-message orchestration.

pub mod service;

pub use service::{Gateway, TurnOutcome};
