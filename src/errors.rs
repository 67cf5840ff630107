use thiserror::Error;

/// Faults a body-delivery channel can raise while the adapter drains it.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("connection lost: {0}")]
    Connection(String),

    #[error("receive timed out: {0}")]
    Timeout(String),
}

/// Failure classes the adapter catches at its boundary.
///
/// Each variant's display string is exactly what ends up in the
/// `x-error` header of the diagnostic event, so callers can match on the
/// prefix to classify the fault.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Missing key: {0}")]
    MissingKey(String),
}

impl From<ChannelError> for AdapterError {
    fn from(error: ChannelError) -> Self {
        AdapterError::Connection(error.to_string())
    }
}

impl From<std::string::FromUtf8Error> for AdapterError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        AdapterError::Encoding(error.to_string())
    }
}
