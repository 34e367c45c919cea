// GitHub API HTTP client.
// Handles authentication headers, status checks, and JSON decoding.

use std::time::Duration;

use reqwest::{
    Client, ClientBuilder, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GitHubConfig;
use crate::error::{RepofetchError, Result};

/// A single GET against the hosting API, decoded as JSON.
///
/// Implementations make exactly one attempt per call. Only a `200 OK` with a
/// JSON body is a success.
#[allow(async_fn_in_trait)]
pub trait Api {
    async fn request(&self, endpoint: &str) -> Result<Value>;
}

/// GitHub API client with a fixed credential and accept header.
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    /// Create a new GitHub client from its configuration section.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(config: &GitHubConfig, builder: ClientBuilder) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(RepofetchError::MissingToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {}", token))
                .map_err(|e| RepofetchError::Config(format!("invalid token: {}", e)))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| RepofetchError::Config(format!("invalid accept header: {}", e)))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| RepofetchError::Config(format!("invalid user agent: {}", e)))?,
        );

        let client = builder
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RepofetchError::Config(format!("failed to build HTTP client: {}", e)))?;

        info!(api_base = %config.api_url, "GitHub client initialized");

        Ok(Self {
            client,
            api_base: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Log the remaining rate limit, if GitHub reported one.
    fn log_rate_limit(&self, response: &reqwest::Response) {
        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            debug!(remaining, "GitHub rate limit");
        }
    }
}

impl Api for GitHubClient {
    async fn request(&self, endpoint: &str) -> Result<Value> {
        info!(endpoint, "Making GitHub API request");
        let url = format!("{}{}", self.api_base, endpoint);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(endpoint, error = %e, "GitHub API transport error");
            RepofetchError::from(e)
        })?;

        self.log_rate_limit(&response);
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(endpoint, status = status.as_u16(), %body, "GitHub API request failed");
            return Err(RepofetchError::Api {
                status: status.as_u16(),
                message: error_message(&body),
                endpoint: endpoint.to_string(),
            });
        }

        let value = serde_json::from_str(&body).map_err(|e| RepofetchError::Api {
            status: status.as_u16(),
            message: format!("invalid JSON body: {}", e),
            endpoint: endpoint.to_string(),
        })?;

        debug!(endpoint, "GitHub API request successful");
        Ok(value)
    }
}

/// Extract GitHub's `message` field from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string())
}
