use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use streams_core::{Config, CoreError, StreamApiError, StreamMap, StreamRecord, StreamSource};
use tracing::{debug, error, info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const USER_AGENT: &str = concat!("streams-bot/", env!("CARGO_PKG_VERSION"));

/// Client for the endpoint listing currently live streams.
pub struct StreamsApiClient {
    http_client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for StreamsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamsApiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl StreamsApiClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self, CoreError> {
        Self::with_timeout(endpoint, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        Self::new(config.api_path.clone(), config.api_key.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the keyed GET. Anything but a 200 is an error.
    async fn make_request(&self) -> Result<Response, CoreError> {
        debug!("Requesting live streams from {}", self.endpoint);

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                error!("Network error for {}: {}", self.endpoint, e);
                if e.is_timeout() {
                    CoreError::StreamApi(StreamApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        if response.status() != StatusCode::OK {
            warn!(
                "Request failed with status: {} for {}",
                response.status(),
                self.endpoint
            );
            return Err(CoreError::StreamApi(StreamApiError::UnexpectedStatus {
                status_code: response.status().as_u16(),
            }));
        }

        Ok(response)
    }

    /// Fetches and parses the current stream list.
    ///
    /// All or nothing: one malformed element fails the whole fetch.
    pub async fn fetch_streams(&self) -> Result<StreamMap, CoreError> {
        let response = self.make_request().await?;

        let body: Value = response.json().await.map_err(|e| {
            error!("Failed to decode stream list: {}", e);
            CoreError::StreamApi(StreamApiError::InvalidResponse {
                details: format!("body is not JSON: {}", e),
            })
        })?;

        let records = parse_stream_list(&body)?;
        info!("Retrieved {} live streams", records.len());
        Ok(records)
    }
}

/// Turns the decoded response body into a URL-keyed map.
///
/// A later element with the same URL replaces an earlier one.
pub fn parse_stream_list(body: &Value) -> Result<StreamMap, StreamApiError> {
    let elements = body
        .as_array()
        .ok_or_else(|| StreamApiError::InvalidResponse {
            details: "expected a JSON array of streams".to_string(),
        })?;

    let mut records = StreamMap::new();
    for (index, element) in elements.iter().enumerate() {
        let record = StreamRecord::from_value(index, element)?;
        if let Some(previous) = records.insert(record.url.clone(), record) {
            debug!("Stream {} listed more than once", previous.url);
        }
    }
    Ok(records)
}

#[async_trait]
impl StreamSource for StreamsApiClient {
    async fn fetch_streams(&self) -> Result<StreamMap, CoreError> {
        StreamsApiClient::fetch_streams(self).await
    }
}
