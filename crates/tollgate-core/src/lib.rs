//! Entitlement logic and port trait definitions for Tollgate.
//!
//! This crate owns the quota engine, the subscription cache, and the
//! per-message gateway orchestration, and defines the "ports" (storage,
//! oracle, and model traits) that the infrastructure layer implements.
//! It depends only on `tollgate-types` -- never on `tollgate-infra` or
//! any database/HTTP crate.

pub mod gateway;
pub mod llm;
pub mod quota;
pub mod storage;
pub mod subscription;
