//! HTTP forwarder for validated property searches.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::params::{SearchArgs, SearchParameters, ValidationError};

pub const DEFAULT_API_BASE_URL: &str = "http://0.0.0.0:3000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROPERTIES_PATH: &str = "properties";
const UNKNOWN_STATUS_TEXT: &str = "Unknown Status";

/// Configuration for the property API client.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl SearchClientConfig {
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_API_BASE_URL).expect("valid default API base URL"))
    }
}

#[derive(Debug)]
pub enum SearchError {
    Validation(ValidationError),
    RemoteApi { status: u16, status_text: String },
    NoResponse,
    RequestFailed(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::RemoteApi {
                status,
                status_text,
            } => write!(f, "API Error {status}: {status_text}"),
            Self::NoResponse => write!(f, "No response from API server."),
            Self::RequestFailed(message) => write!(f, "Request failed: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for SearchError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Client that forwards property searches to the remote `/properties` endpoint.
///
/// Holds no per-call state, so a single instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct PropertySearchClient {
    http: Client,
    endpoint: Url,
}

impl PropertySearchClient {
    /// Builds a client for the configured base URL and timeout.
    ///
    /// # Errors
    /// Returns [`SearchError::RequestFailed`] if the endpoint URL cannot be
    /// derived from the base URL or the HTTP client cannot be built.
    pub fn new(config: SearchClientConfig) -> Result<Self, SearchError> {
        let endpoint = properties_endpoint(&config.base_url)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| SearchError::RequestFailed(err.to_string()))?;
        Ok(Self { http, endpoint })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Performs one GET against the properties endpoint and returns the body
    /// as indented JSON text. An empty success body is returned as `""`.
    ///
    /// # Errors
    /// Returns [`SearchError::RemoteApi`] for a non-success status,
    /// [`SearchError::NoResponse`] when the server could not be reached or
    /// did not answer in time, and [`SearchError::RequestFailed`] otherwise.
    pub async fn search(&self, params: &SearchParameters) -> Result<String, SearchError> {
        debug!(
            endpoint = %self.endpoint,
            limit = params.limit(),
            "forwarding property search"
        );

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&params.query_pairs())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status_text(&response);
            warn!(
                status = status.as_u16(),
                status_text = %status_text,
                "property API returned an error status"
            );
            return Err(SearchError::RemoteApi {
                status: status.as_u16(),
                status_text,
            });
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        if body.is_empty() {
            return Ok(String::new());
        }
        let result: Value = serde_json::from_slice(&body)
            .map_err(|err| SearchError::RequestFailed(format!("invalid JSON response: {err}")))?;
        serde_json::to_string_pretty(&result)
            .map_err(|err| SearchError::RequestFailed(err.to_string()))
    }

    /// Validates raw arguments and forwards them.
    ///
    /// Nothing is sent when validation fails.
    ///
    /// # Errors
    /// Returns [`SearchError::Validation`] for invalid arguments, or any error
    /// from [`Self::search`].
    pub async fn search_args(&self, args: SearchArgs) -> Result<String, SearchError> {
        let params = SearchParameters::try_from(args)?;
        self.search(&params).await
    }
}

fn properties_endpoint(base_url: &Url) -> Result<Url, SearchError> {
    if base_url.cannot_be_a_base() {
        return Err(SearchError::RequestFailed(format!(
            "base URL cannot hold a path: {base_url}"
        )));
    }
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(PROPERTIES_PATH)
        .map_err(|err| SearchError::RequestFailed(err.to_string()))
}

/// Reason phrase the server sent, falling back to the canonical one.
fn status_text(response: &Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).trim().to_string())
        .filter(|reason| !reason.is_empty())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_STATUS_TEXT.to_string())
}

fn map_transport_error(err: reqwest::Error) -> SearchError {
    if err.is_builder() {
        return SearchError::RequestFailed(err.to_string());
    }
    if err.is_timeout() || err.is_connect() || err.is_request() {
        warn!(error = %err, "no response from property API");
        return SearchError::NoResponse;
    }
    warn!(error = %err, "property API request failed");
    SearchError::RequestFailed(err.to_string())
}
