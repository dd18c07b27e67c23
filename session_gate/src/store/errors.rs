use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The round-trip, or the wait for a pooled connection, exceeded the bound
    #[error("Store operation timed out")]
    Timeout,

    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.kind() == redis::ErrorKind::IoError
            || err.is_connection_refusal()
            || err.is_connection_dropped()
        {
            Self::Connection(err.to_string())
        } else {
            Self::Storage(err.to_string())
        }
    }
}
