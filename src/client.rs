use crate::error::{CargusError, Result};
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_CHARSET, CONTENT_TYPE};
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API Uri
pub const API_URI: &str = "https://urgentcargus.azure-api.net/api/";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Create the HTTP client used for every API request.
///
/// Redirects are never followed and the fixed JSON headers are attached
/// to each request.
pub fn create_http_client(config: &Config) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));

    ClientBuilder::new()
        .default_headers(headers)
        .user_agent(config.user_agent.as_str())
        .redirect(Policy::none())
        .timeout(config.timeout)
        .build()
        .map_err(|e| CargusError::Configuration(format!("failed to create HTTP client: {}", e)))
}

/// Configuration for the UrgentCargus client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URI every endpoint is resolved against
    pub base_uri: String,
    /// Timeout applied to the whole request
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_uri: API_URI.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("UrgentCargusAPI-Rust (v{})", VERSION),
        }
    }
}

impl Config {
    /// Create a new configuration pointing at the given base URI.
    /// An empty URI selects the default service endpoint.
    pub fn new(base_uri: &str) -> Self {
        Config::default().with_base_uri(base_uri)
    }

    /// Set the base URI (empty keeps the default)
    pub fn with_base_uri(mut self, base_uri: &str) -> Self {
        self.base_uri = if base_uri.is_empty() {
            API_URI.to_string()
        } else {
            base_uri.to_string()
        };
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Parse the base URI
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_uri).map_err(|e| {
            CargusError::Configuration(format!("invalid base URI {:?}: {}", self.base_uri, e))
        })
    }
}
