use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::StreamApi(e) => {
                error!("Stream API error details: {:?}", e);
            }
            CoreError::Channel(e) => {
                error!("Channel error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::StreamApi(e) => e.user_friendly_message(),
            CoreError::Channel(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network error while contacting the stream API.".to_string()
            }
            CoreError::Serialization(_) => {
                "Stream API returned data that could not be decoded.".to_string()
            }
            _ => "An unexpected error occurred. The next cycle will try again.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::StreamApi(_) => "STREAM_API".to_string(),
            CoreError::Channel(_) => "CHANNEL".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for StreamApiError {
    fn log_error(&self) -> &Self {
        error!("StreamApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("StreamApiError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            StreamApiError::UnexpectedStatus { status_code } => format!(
                "Stream API answered with status {}. Skipping this cycle.",
                status_code
            ),
            StreamApiError::RequestTimeout => {
                "Request to the stream API timed out. Skipping this cycle.".to_string()
            }
            StreamApiError::InvalidResponse { .. } => {
                "Stream API response was not a list of streams.".to_string()
            }
            StreamApiError::MalformedRecord { index, field, .. } => format!(
                "Stream #{} in the API response has a bad `{}` field.",
                index, field
            ),
        }
    }

    fn error_code(&self) -> String {
        match self {
            StreamApiError::UnexpectedStatus { .. } => "STREAM_API_STATUS".to_string(),
            StreamApiError::RequestTimeout => "STREAM_API_TIMEOUT".to_string(),
            StreamApiError::InvalidResponse { .. } => "STREAM_API_INVALID_RESPONSE".to_string(),
            StreamApiError::MalformedRecord { .. } => "STREAM_API_MALFORMED_RECORD".to_string(),
        }
    }
}

impl ErrorExt for ChannelError {
    fn log_error(&self) -> &Self {
        error!("ChannelError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ChannelError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ChannelError::NotFound { channel_id } => {
                format!("Failed to find channel {}.", channel_id)
            }
            ChannelError::NotTextChannel { channel_id } => {
                format!("Expected a text channel for {}.", channel_id)
            }
            ChannelError::HistoryUnavailable { .. } => {
                "Could not read the channel history.".to_string()
            }
            ChannelError::WriteRejected { operation, .. } => {
                format!("Discord rejected a message {}.", operation)
            }
            ChannelError::ConnectionFailed { .. } => {
                "Could not connect to Discord. Please check the bot token.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ChannelError::NotFound { .. } => "CHANNEL_NOT_FOUND".to_string(),
            ChannelError::NotTextChannel { .. } => "CHANNEL_NOT_TEXT".to_string(),
            ChannelError::HistoryUnavailable { .. } => "CHANNEL_HISTORY_UNAVAILABLE".to_string(),
            ChannelError::WriteRejected { .. } => "CHANNEL_WRITE_REJECTED".to_string(),
            ChannelError::ConnectionFailed { .. } => "CHANNEL_CONNECTION_FAILED".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidFormat { .. } => {
                "Configuration file is not a valid JSON object.".to_string()
            }
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::PermissionDenied { .. } => {
                "Permission denied accessing configuration. Please check file permissions."
                    .to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidFormat { .. } => "CONFIG_INVALID_FORMAT".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED".to_string(),
        }
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
            info!(
                code = %error.error_code(),
                "{}",
                error.user_friendly_message()
            );
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
