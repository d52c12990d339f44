//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ChildChunksApi, DatasetsApi, DocumentsApi, MetadataApi, SegmentsApi};
use crate::error::{api_error, Error, Result};

/// Default connect timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Default read timeout.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Default write timeout.
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Connection settings for a [`DifyKbClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, including the version prefix (e.g. `https://api.dify.ai/v1`).
    pub base_url: String,
    /// Knowledge API key, sent as a bearer token.
    pub api_key: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Write timeout in milliseconds.
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_millis() as u64
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT.as_millis() as u64
}

fn default_write_timeout_ms() -> u64 {
    DEFAULT_WRITE_TIMEOUT.as_millis() as u64
}

impl ClientConfig {
    /// Create a config with default timeouts.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}

/// Dify knowledge base API client.
///
/// Provides typed access to the dataset, document, segment, child chunk,
/// metadata and retrieval endpoints.
///
/// # Example
///
/// ```no_run
/// use dify_kb_client::DifyKbClient;
///
/// # async fn example() -> dify_kb_client::Result<()> {
/// let client = DifyKbClient::new("https://api.dify.ai/v1", "dataset-xxxx")?;
///
/// let datasets = client.datasets().list(1, 20).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DifyKbClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests, always ending in `/`.
    pub(crate) base_url: Url,
    /// Overall deadline for a single request.
    pub(crate) request_timeout: Duration,
}

impl DifyKbClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a base URL and API key with default timeouts.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).api_key(api_key).build()
    }

    /// Create a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder()
            .base_url(&config.base_url)
            .api_key(&config.api_key)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .read_timeout(Duration::from_millis(config.read_timeout_ms))
            .write_timeout(Duration::from_millis(config.write_timeout_ms))
            .build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the datasets API (including retrieval).
    pub fn datasets(&self) -> DatasetsApi {
        DatasetsApi::new(self.clone())
    }

    /// Access the documents API.
    pub fn documents(&self) -> DocumentsApi {
        DocumentsApi::new(self.clone())
    }

    /// Access the segments API.
    pub fn segments(&self) -> SegmentsApi {
        SegmentsApi::new(self.clone())
    }

    /// Access the child chunks API.
    pub fn child_chunks(&self) -> ChildChunksApi {
        ChildChunksApi::new(self.clone())
    }

    /// Access the metadata API.
    pub fn metadata(&self) -> MetadataApi {
        MetadataApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL under the base URL, one path segment per element.
    ///
    /// Each segment is percent-encoded, so `/`, `?` and `#` inside an ID
    /// stay part of that segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!(method = "GET", path = url.path(), "sending request");
        let request = self.inner.http.get(url);
        self.handle_response(self.send(request).await?).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &[&str], query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(method = "GET", path = url.path(), "sending request");
        let request = self.inner.http.get(url).query(query);
        self.handle_response(self.send(request).await?).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(method = "POST", path = url.path(), "sending request");
        let request = self.inner.http.post(url).json(body);
        self.handle_response(self.send(request).await?).await
    }

    /// Make a POST request whose response body carries nothing of interest.
    pub(crate) async fn post_unit<B>(&self, path: &[&str], body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(method = "POST", path = url.path(), "sending request");
        let request = self.inner.http.post(url).json(body);
        self.handle_empty(self.send(request).await?).await
    }

    /// Make a multipart POST request.
    pub(crate) async fn post_multipart<T: serde::de::DeserializeOwned>(
        &self,
        path: &[&str],
        form: Form,
    ) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!(method = "POST", path = url.path(), "sending multipart request");
        let request = self.inner.http.post(url).multipart(form);
        self.handle_response(self.send(request).await?).await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(method = "PATCH", path = url.path(), "sending request");
        let request = self.inner.http.patch(url).json(body);
        self.handle_response(self.send(request).await?).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &[&str]) -> Result<()> {
        let url = self.url(path)?;
        tracing::debug!(method = "DELETE", path = url.path(), "sending request");
        let request = self.inner.http.delete(url);
        self.handle_empty(self.send(request).await?).await
    }

    /// Apply the per-request deadline and send.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.timeout(self.inner.request_timeout).send().await?;
        tracing::debug!(status = response.status().as_u16(), "received response");
        Ok(response)
    }

    /// Handle a response, decoding the body or extracting the error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Handle a response whose body is ignored on success.
    async fn handle_empty(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Error::Http(e),
        };
        let err = api_error(status, &body);
        tracing::warn!(status, error = %err, "knowledge API returned an error");
        err
    }
}

/// Builder for creating a [`DifyKbClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    connect_timeout: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the API root (including the version prefix).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the knowledge API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the write timeout.
    ///
    /// reqwest has no write-phase timeout, so this extends the overall
    /// per-request deadline (`write + read`).
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DifyKbClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("api_key is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| Error::Config("Invalid API key".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("dify-kb-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()?;

        Ok(DifyKbClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                request_timeout: self.write_timeout + self.read_timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().api_key("key").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = ClientBuilder::new()
            .base_url("http://localhost/v1")
            .api_key("   ")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = DifyKbClient::new("not a url", "key");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = DifyKbClient::new("http://localhost/v1", "key").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost/v1/");

        let client = DifyKbClient::new("http://localhost/v1/", "key").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost/v1/");
    }

    #[test]
    fn test_url_building_keeps_version_prefix() {
        let client = DifyKbClient::new("https://api.dify.ai/v1", "key").unwrap();

        let url = client.url(&["datasets"]).unwrap();
        assert_eq!(url.as_str(), "https://api.dify.ai/v1/datasets");

        let url = client.url(&["datasets", "abc", "documents"]).unwrap();
        assert_eq!(url.as_str(), "https://api.dify.ai/v1/datasets/abc/documents");
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let client = DifyKbClient::new("https://api.dify.ai/v1", "key").unwrap();

        let url = client.url(&["datasets", "x/../../other"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dify.ai/v1/datasets/x%2F..%2F..%2Fother"
        );

        let url = client.url(&["datasets", "doc?force=1#frag"]).unwrap();
        assert_eq!(url.path(), "/v1/datasets/doc%3Fforce=1%23frag");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_from_config_timeouts() {
        let config = ClientConfig {
            connect_timeout_ms: 1_000,
            read_timeout_ms: 2_000,
            write_timeout_ms: 3_000,
            ..ClientConfig::new("http://localhost/v1", "key")
        };
        let client = DifyKbClient::from_config(&config).unwrap();
        assert_eq!(client.inner.request_timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn test_client_config_defaults_from_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost/v1","api_key":"k"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("http://localhost/v1", "k"));
        assert_eq!(config.connect_timeout_ms, 5_000);
        assert_eq!(config.read_timeout_ms, 60_000);
        assert_eq!(config.write_timeout_ms, 30_000);
    }
}
