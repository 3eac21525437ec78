//! Blocking HTTP client for the Hacker News API

use super::source::PostSource;
use crate::config::ApiConfig;
use crate::error::{HnError, HnResult};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Client for `https://hacker-news.firebaseio.com/v0`
pub struct HnClient {
    agent: Agent,
    base_url: String,
}

impl HnClient {
    /// Create a client from API settings
    pub fn new(config: &ApiConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl PostSource for HnClient {
    fn fetch_json(&self, path: &str) -> HnResult<Value> {
        let url = self.url(path);
        debug!("GET {}", url);

        let mut response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => HnError::Http {
                status,
                url: url.clone(),
            },
            other => HnError::Network {
                url: url.clone(),
                reason: other.to_string(),
            },
        })?;

        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| HnError::ApiDecode {
                url,
                reason: e.to_string(),
            })
    }
}
