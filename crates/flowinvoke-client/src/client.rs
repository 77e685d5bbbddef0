//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::RequestBuilder;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{ExecutionsApi, FlowsApi};
use crate::auth::Credentials;
use crate::error::{Error, Result};

/// Default timeout for a single request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Root of the REST API on the server.
const API_ROOT: &str = "oo/rest/v1/";

/// Operations Orchestration API client.
///
/// Blocking, and meant to be driven by a single thread of control. Clones
/// share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use flowinvoke_client::{Credentials, OoClient};
///
/// # fn example() -> flowinvoke_client::Result<()> {
/// let client = OoClient::builder()
///     .host("oo.example.com:8443")
///     .credentials(Credentials::basic("admin", "admin"))
///     .build()?;
///
/// let flow = client.flows().get("2f0e1c4a-0000-4000-8000-000000000001")?;
/// println!("{}", flow.name);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OoClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::blocking::Client,
    /// Base URL of the server.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
}

impl OoClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the flows API.
    pub fn flows(&self) -> FlowsApi {
        FlowsApi::new(self.clone())
    }

    /// Access the executions API.
    pub fn executions(&self) -> ExecutionsApi {
        ExecutionsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(&format!("{}{}", API_ROOT, path))
            .map_err(Error::from)
    }

    /// GET a path, requiring `200 OK`, and return the raw body.
    pub(crate) fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path)?;
        let request = self.inner.http.get(url).timeout(self.inner.timeout);
        self.send(request, path, StatusCode::OK)
    }

    /// GET a path, requiring `200 OK`, and decode the body.
    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.get_text(path)?;
        decode(path, &body)
    }

    /// POST a JSON body, requiring `201 Created`, and decode the response.
    pub(crate) fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.timeout);
        let body = self.send(request, path, StatusCode::CREATED)?;
        decode(path, &body)
    }

    /// Send a request and check for the one status the call accepts.
    fn send(&self, request: RequestBuilder, path: &str, expected: StatusCode) -> Result<String> {
        let response = request.send()?;
        let status = response.status();

        if status != expected {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            tracing::debug!(endpoint = path, status = status.as_u16(), %reason, "unexpected status");
            return Err(Error::Remote {
                status: status.as_u16(),
                reason,
                endpoint: path.to_string(),
            });
        }

        let body = response.text()?;
        tracing::debug!(endpoint = path, body = %body, "response");
        Ok(body)
    }
}

/// Decode a JSON body, naming the endpoint on failure.
pub(crate) fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| Error::Decode {
        endpoint: path.to_string(),
        source,
    })
}

/// Builder for creating an OoClient.
#[derive(Debug)]
pub struct ClientBuilder {
    host: Option<String>,
    credentials: Option<Credentials>,
    timeout: Duration,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            host: None,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            accept_invalid_certs: true,
        }
    }

    /// Set the server host.
    ///
    /// `host:port` without a scheme is reached over HTTPS. A value with an
    /// explicit scheme is used as given.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the credentials sent with every request.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Whether to accept certificates that fail validation (default: true).
    ///
    /// Orchestration servers are routinely deployed with self-signed
    /// certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<OoClient> {
        let host = self
            .host
            .ok_or_else(|| Error::Config("host is required".to_string()))?;
        let base_url = base_url_for(&host)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(credentials) = &self.credentials {
            let mut value = HeaderValue::from_str(&credentials.header_value())
                .map_err(|_| Error::Config("Invalid credentials".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("flowinvoke/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()?;

        tracing::debug!(base_url = %base_url, timeout_secs = self.timeout.as_secs(), "created client");

        Ok(OoClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a host setting into a base URL ending in `/`.
fn base_url_for(host: &str) -> Result<Url> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::Config("host is empty".to_string()));
    }

    let mut url = if host.contains("://") {
        Url::parse(host)?
    } else {
        Url::parse(&format!("https://{}", host))?
    };

    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}
