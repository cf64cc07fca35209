//! Gateway HTTP client implementation

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sourdough_core::{Envelope, Filters, RecordId};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};
use crate::types::{ErrorBody, HealthStatus};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// API base used outside production (the dev server's gateway)
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:3001/api";

/// Where the gateway lives relative to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Same-origin deployment: the gateway is mounted at `{origin}/api`
    Production { origin: Url },
    /// Local development against [`DEVELOPMENT_BASE_URL`]
    Development,
}

impl Environment {
    /// Resolve the API base URL for this environment
    pub fn base_url(&self) -> Result<Url> {
        match self {
            Environment::Production { origin } => Ok(origin.join("/api")?),
            Environment::Development => Ok(Url::parse(DEVELOPMENT_BASE_URL)?),
        }
    }
}

/// Gateway REST API client
///
/// The five record methods never fail: every outcome, including transport
/// errors, is returned as an [`Envelope`].
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new gateway client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the gateway API (e.g., "http://localhost:3001/api")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client whose base URL is derived from the environment
    pub fn for_environment(env: &Environment) -> Result<Self> {
        Self::new(env.base_url()?.as_str())
    }

    /// Create a new gateway client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Health Check
    // =========================================================================

    /// Check server health (`/health` lives at the server root, beside `/api`)
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.base_url.join("/health")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            Err(ClientError::server_error(
                status.as_u16(),
                format!("HTTP {}", status),
            ))
        }
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Create a record in `collection`
    #[instrument(skip(self, payload))]
    pub async fn create<T, P>(&self, collection: &str, payload: &P) -> Envelope<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = match self.segments_url(&[collection]) {
            Ok(url) => url,
            Err(e) => return failure(e),
        };
        self.send_json(Method::POST, url, Some(payload)).await
    }

    /// List records of `collection` matching `filters`
    #[instrument(skip(self))]
    pub async fn list<T>(&self, collection: &str, filters: &Filters) -> Envelope<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut url = match self.segments_url(&[collection]) {
            Ok(url) => url,
            Err(e) => return failure(e),
        };
        if !filters.is_empty() {
            url.query_pairs_mut().extend_pairs(filters.iter());
        }
        self.send_json::<_, ()>(Method::GET, url, None).await
    }

    /// Read a single record by ID
    #[instrument(skip(self, id))]
    pub async fn get_by_id<T>(&self, collection: &str, id: impl Into<RecordId>) -> Envelope<T>
    where
        T: DeserializeOwned,
    {
        let id = id.into().to_string();
        let url = match self.segments_url(&[collection, &id]) {
            Ok(url) => url,
            Err(e) => return failure(e),
        };
        self.send_json::<_, ()>(Method::GET, url, None).await
    }

    /// Merge `payload` into the record `id`
    #[instrument(skip(self, id, payload))]
    pub async fn update<T, P>(
        &self,
        collection: &str,
        id: impl Into<RecordId>,
        payload: &P,
    ) -> Envelope<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let id = id.into().to_string();
        let url = match self.segments_url(&[collection, &id]) {
            Ok(url) => url,
            Err(e) => return failure(e),
        };
        self.send_json(Method::PUT, url, Some(payload)).await
    }

    /// Delete the record `id`
    #[instrument(skip(self, id))]
    pub async fn delete(&self, collection: &str, id: impl Into<RecordId>) -> Envelope<()> {
        let id = id.into().to_string();
        let url = match self.segments_url(&[collection, &id]) {
            Ok(url) => url,
            Err(e) => return failure(e),
        };
        self.send_json::<_, ()>(Method::DELETE, url, None).await
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Append percent-encoded path segments to the base URL
    fn segments_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a request and normalize every outcome into an envelope
    async fn send_json<T, P>(&self, method: Method, url: Url, payload: Option<&P>) -> Envelope<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(payload) = payload {
            match serde_json::to_vec(payload) {
                Ok(body) => request = request.body(body),
                Err(e) => return failure(ClientError::ParseError(e.to_string())),
            }
        }

        match self.execute(request).await {
            Ok(envelope) => envelope,
            Err(e) => failure(e),
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>> {
        let response = request.send().await.map_err(ClientError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::transport)?;

        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Ok(Envelope::failure(error));
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

fn failure<T>(err: ClientError) -> Envelope<T> {
    debug!(error = %err, "Gateway request failed");
    Envelope::failure(err.to_string())
}
