use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Stream API error: {0}")]
    StreamApi(#[from] StreamApiError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamApiError {
    #[error("Unexpected status code: {status_code}")]
    UnexpectedStatus { status_code: u16 },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Malformed stream record at index {index}: field `{field}` {problem}")]
    MalformedRecord {
        index: usize,
        field: String,
        problem: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Channel not found: {channel_id}")]
    NotFound { channel_id: u64 },

    #[error("Channel {channel_id} is not a text channel")]
    NotTextChannel { channel_id: u64 },

    #[error("Message history unavailable: {reason}")]
    HistoryUnavailable { reason: String },

    #[error("Failed to {operation} message {target}: {reason}")]
    WriteRejected {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("Gateway connection failed: {reason}")]
    ConnectionFailed { reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {details}")]
    InvalidFormat { details: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Permission denied accessing config: {path}")]
    PermissionDenied { path: String },
}
