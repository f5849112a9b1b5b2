use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "streams-bot-config.json";

/// Runtime configuration, loaded once at startup.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Channel announcements are synced to.
    pub channel: u64,

    /// Endpoint listing the streams that are currently live.
    #[serde(rename = "api-path")]
    pub api_path: String,

    /// Sent as the `key` query parameter.
    #[serde(rename = "api-key")]
    pub api_key: String,

    #[serde(rename = "discord-token")]
    pub discord_token: String,
}

impl Config {
    pub const REQUIRED_FIELDS: [&'static str; 4] =
        ["channel", "api-path", "api-key", "discord-token"];

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            ErrorKind::PermissionDenied => ConfigError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => ConfigError::InvalidFormat {
                details: format!("{}: {}", path.display(), e),
            },
        })?;

        let config = Self::from_json(&raw)?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| ConfigError::InvalidFormat {
            details: e.to_string(),
        })?;

        let object = value.as_object().ok_or_else(|| ConfigError::InvalidFormat {
            details: "top-level value is not an object".to_string(),
        })?;

        if let Some(missing) = Self::REQUIRED_FIELDS
            .iter()
            .find(|field| !object.contains_key(**field))
        {
            return Err(ConfigError::MissingField {
                field: missing.to_string(),
            });
        }

        let config: Config =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidFormat {
                details: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.channel == 0 {
            return Err(ConfigError::InvalidValue {
                field: "channel".to_string(),
                value: self.channel.to_string(),
            });
        }
        if Url::parse(&self.api_path).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "api-path".to_string(),
                value: self.api_path.clone(),
            });
        }
        if self.discord_token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "discord-token".to_string(),
                value: String::new(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("channel", &self.channel)
            .field("api_path", &self.api_path)
            .field("api_key", &"[REDACTED]")
            .field("discord_token", &"[REDACTED]")
            .finish()
    }
}
