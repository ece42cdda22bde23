//! Configuration types for the chat bot factories and their HTTP transport.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::errors::{ChatBotError, Result};

/// Endpoints and query parameters used by the factories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBotConfig {
    /// Geocoding search endpoint.
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    /// Country filter for geocoding (`countrycodes`).
    #[serde(default = "default_country_codes")]
    pub country_codes: String,
    /// Maximum number of geocoding results requested.
    #[serde(default = "default_geocode_limit")]
    pub geocode_limit: u32,
    /// Encyclopedia API endpoint used for geosearch and extracts.
    #[serde(default = "default_wiki_api_url")]
    pub wiki_api_url: String,
    /// Geosearch radius around the point, in meters.
    #[serde(default = "default_geosearch_radius")]
    pub geosearch_radius_meters: u32,
    /// Maximum number of nearby pages requested.
    #[serde(default = "default_geosearch_limit")]
    pub geosearch_limit: u32,
    /// Number of sentences in a page extract.
    #[serde(default = "default_extract_sentences")]
    pub extract_sentences: u32,
    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_country_codes() -> String {
    "fr".to_string()
}

fn default_geocode_limit() -> u32 {
    1
}

fn default_wiki_api_url() -> String {
    "https://fr.wikipedia.org/w/api.php".to_string()
}

fn default_geosearch_radius() -> u32 {
    10_000
}

fn default_geosearch_limit() -> u32 {
    10
}

fn default_extract_sentences() -> u32 {
    3
}

impl Default for ChatBotConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            country_codes: default_country_codes(),
            geocode_limit: default_geocode_limit(),
            wiki_api_url: default_wiki_api_url(),
            geosearch_radius_meters: default_geosearch_radius(),
            geosearch_limit: default_geosearch_limit(),
            extract_sentences: default_extract_sentences(),
            http: HttpConfig::default(),
        }
    }
}

impl ChatBotConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ChatBotError::configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Sets the geocoding endpoint.
    #[must_use]
    pub fn with_geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    /// Sets the encyclopedia API endpoint.
    #[must_use]
    pub fn with_wiki_api_url(mut self, url: impl Into<String>) -> Self {
        self.wiki_api_url = url.into();
        self
    }

    /// Sets the geocoding country filter.
    #[must_use]
    pub fn with_country_codes(mut self, codes: impl Into<String>) -> Self {
        self.country_codes = codes.into();
        self
    }

    /// Sets the geosearch radius.
    #[must_use]
    pub fn with_geosearch_radius(mut self, meters: u32) -> Self {
        self.geosearch_radius_meters = meters;
        self
    }

    /// Sets the HTTP settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.geocode_url.trim().is_empty() {
            return Err(ChatBotError::configuration("geocode_url must not be empty"));
        }
        if self.wiki_api_url.trim().is_empty() {
            return Err(ChatBotError::configuration("wiki_api_url must not be empty"));
        }
        if self.geocode_limit == 0 || self.geosearch_limit == 0 {
            return Err(ChatBotError::configuration("result limits must be positive"));
        }
        if self.geosearch_radius_meters == 0 {
            return Err(ChatBotError::configuration(
                "geosearch_radius_meters must be positive",
            ));
        }
        if self.extract_sentences == 0 {
            return Err(ChatBotError::configuration("extract_sentences must be positive"));
        }
        self.http.validate()
    }
}

/// Configuration for HTTP fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string. The geocoding service rejects anonymous clients.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Retry configuration.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout() -> f64 {
    10.0
}

fn default_user_agent() -> String {
    concat!("grandpybot/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Gets timeout as Duration.
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout_seconds <= 0.0 {
            return Err(ChatBotError::configuration("timeout_seconds must be positive"));
        }
        seconds_to_duration("timeout_seconds", self.timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        self.timeout()?;
        seconds_to_duration("retry_delay_seconds", self.retry.retry_delay_seconds)?;
        seconds_to_duration("max_delay_seconds", self.retry.max_delay_seconds)?;
        Ok(())
    }
}

fn seconds_to_duration(field: &str, seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|e| {
        ChatBotError::configuration(format!("{field} is not a usable duration ({seconds}): {e}"))
    })
}

/// Retry configuration for failed requests.
///
/// Defaults to no retries at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call.
    #[serde(default)]
    pub max_retries: usize,
    /// Initial delay between retries in seconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: f64,
    /// Backoff multiplier.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Maximum delay between retries.
    #[serde(default = "default_max_delay")]
    pub max_delay_seconds: f64,
    /// Status codes that should trigger a retry.
    #[serde(default = "default_retry_status_codes")]
    pub retry_status_codes: HashSet<u16>,
}

fn default_retry_delay() -> f64 {
    0.5
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_delay() -> f64 {
    5.0
}

fn default_retry_status_codes() -> HashSet<u16> {
    [429, 500, 502, 503, 504].into_iter().collect()
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_delay_seconds: default_retry_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_seconds: default_max_delay(),
            retry_status_codes: default_retry_status_codes(),
        }
    }
}

impl RetryConfig {
    /// A single retry on transient failures.
    #[must_use]
    pub fn single() -> Self {
        Self {
            max_retries: 1,
            ..Self::default()
        }
    }

    /// Calculates the delay for a given attempt.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.retry_delay_seconds * self.backoff_multiplier.powi(exponent);
        let capped = delay.min(self.max_delay_seconds).max(0.0);
        Duration::try_from_secs_f64(capped).unwrap_or(Duration::MAX)
    }

    /// Whether a status code should trigger a retry.
    #[must_use]
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_status_codes.contains(&status)
    }
}
