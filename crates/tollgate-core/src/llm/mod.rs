//! Language-model port.

pub mod provider;

pub use provider::ChatModel;
