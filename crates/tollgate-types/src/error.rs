use thiserror::Error;

/// Errors from persistence operations (quota records and transcripts).
///
/// No store error is fatal to a turn: callers log the failure and carry
/// on with in-memory state, accepting possible loss on crash.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from the external membership check.
///
/// Always transient from the gateway's point of view: the caller treats
/// the check as "not subscribed" for the current message and retries on
/// the next one.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("membership check failed: {0}")]
    Transient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_oracle_error_display() {
        let err = OracleError::Transient("timeout".to_string());
        assert_eq!(err.to_string(), "membership check failed: timeout");
    }
}
