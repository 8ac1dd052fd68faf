//! Error types shared across the client.

use thiserror::Error;

/// Why an inbound message was not turned into a snapshot. Always logged and dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("schema violation: {0}")]
    SchemaViolation(String),
}

/// Channel-level failures. These drive reconnection, never a crash.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("failed to open channel: {0}")]
    Open(String),

    #[error("channel error: {0}")]
    Stream(String),

    #[error("gave up after {attempts} connection attempts")]
    ExhaustedRetries { attempts: u32 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("{field} must be at least 1")]
    OutOfRange { field: &'static str },

    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
