//! Client configuration

use std::collections::BTreeMap;
use std::time::Duration;

use ctgforge_common::resilience::RetryConfig;
use ctgforge_domain::constants::{
    DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use ctgforge_domain::{CtgError, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};

use crate::http::{HttpClient, HttpClientBuilder};

/// Largest page the search endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Immutable settings for a ClinicalTrials.gov client
///
/// Every field has a default, so an empty file or no environment at all
/// yields a working configuration.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout, in (fractional) seconds on disk
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra request headers; they override the defaults
    pub headers: BTreeMap<String, String>,
    /// Records requested per search page
    pub page_size: u32,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Check the settings for consistency
    ///
    /// # Errors
    /// Returns `CtgError::Config` for an unparseable base URL, a page size
    /// outside `1..=1000`, or an inconsistent retry policy.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| CtgError::Config(format!("Invalid base_url {}: {}", self.base_url, e)))?;

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(CtgError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        self.retry.validate().map_err(|e| CtgError::Config(format!("Invalid retry policy: {e}")))
    }

    /// Builder for an HTTP client carrying these settings
    pub fn http_client_builder(&self) -> HttpClientBuilder {
        self.headers.iter().fold(
            HttpClient::builder()
                .base_url(&self.base_url)
                .timeout(self.timeout)
                .user_agent(&self.user_agent)
                .retry(self.retry.clone()),
            |builder, (name, value)| builder.header(name, value),
        )
    }
}
