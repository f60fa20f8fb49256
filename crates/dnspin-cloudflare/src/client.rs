//! Cloudflare v4 API client.

use crate::api::{DnsRecordsApi, ZonesApi};
use crate::config::{RateLimitConfig, RetryConfig};
use dnspin_core::{DnsPinError, Result};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// The Cloudflare API base URL
const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare error code for "Record does not exist"
const RECORD_NOT_FOUND_CODE: u32 = 81044;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Cloudflare API client
#[derive(Clone)]
pub struct CloudflareClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_token: String,
    base_url: String,
    timeout: Duration,
    retry_config: RetryConfig,
    rate_limiter: DirectLimiter,
}

/// Response envelope shared by every Cloudflare endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// Error or informational message in an envelope
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

/// Pagination block of list responses
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ResultInfo {
    #[serde(default)]
    pub total_pages: u32,
}

impl CloudflareClient {
    /// Create a new client with the given API token using default settings
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        CloudflareClientBuilder::new(api_token).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_token: impl Into<String>) -> CloudflareClientBuilder {
        CloudflareClientBuilder::new(api_token)
    }

    /// Access zone endpoints
    #[must_use]
    pub const fn zones(&self) -> ZonesApi<'_> {
        ZonesApi::new(self)
    }

    /// Access DNS record endpoints of one zone
    #[must_use]
    pub fn dns_records<'a>(&'a self, zone_id: &'a str) -> DnsRecordsApi<'a> {
        DnsRecordsApi::new(self, zone_id)
    }

    /// Perform a GET request with query parameters
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Envelope<T>> {
        self.execute::<T, ()>(Method::GET, path, params, None).await
    }

    /// Perform a POST request with JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    /// Perform a DELETE request
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        self.execute::<T, ()>(Method::DELETE, path, &[], None).await
    }

    /// Send a request, retrying retryable failures with backoff.
    ///
    /// POST creates a record, so it is resent only after a rate limit
    /// refusal. GET and DELETE are retried on any retryable error.
    async fn execute<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Envelope<T>> {
        let url = self.build_url(path, params)?;
        let idempotent = method != Method::POST;
        let mut attempt = 0;

        loop {
            match self.send_once(method.clone(), &url, body).await {
                Ok(envelope) => return Ok(envelope),
                Err(e)
                    if self
                        .inner
                        .retry_config
                        .should_retry_request(&e, attempt, idempotent) =>
                {
                    let backoff = self.inner.retry_config.backoff_for(attempt);
                    warn!(%method, url = %url, attempt, ?backoff, error = %e, "retrying Cloudflare request");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<Envelope<T>> {
        self.inner.rate_limiter.until_ready().await;
        debug!(%method, url = %url, "Cloudflare API request");

        let mut request = self
            .inner
            .http
            .request(method, url.clone())
            .bearer_auth(&self.inner.api_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        self.handle_response(response).await
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.inner.base_url.trim_end_matches('/'), path);
        let mut url =
            Url::parse(&raw).map_err(|e| DnsPinError::Config(format!("invalid URL {raw}: {e}")))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    fn transport_error(&self, e: &reqwest::Error) -> DnsPinError {
        if e.is_timeout() {
            DnsPinError::Timeout(self.inner.timeout)
        } else if e.is_connect() {
            DnsPinError::Connection(e.to_string())
        } else {
            DnsPinError::Http(e.to_string())
        }
    }

    /// Decode the envelope, turning HTTP and API failures into errors
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Envelope<T>> {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| DnsPinError::Http(e.to_string()))?;

        let envelope = serde_json::from_str::<Envelope<T>>(&body);

        match envelope {
            Ok(envelope) if (200..300).contains(&status) && envelope.success => Ok(envelope),
            Ok(envelope) => Err(Self::api_error(status, &envelope.errors, retry_after)),
            Err(e) if (200..300).contains(&status) => Err(DnsPinError::Json(e)),
            Err(_) => Err(Self::api_error(
                status,
                &[ApiMessage {
                    code: 0,
                    message: body,
                }],
                retry_after,
            )),
        }
    }

    /// Convert an error response to a `DnsPinError`
    fn api_error(status: u16, errors: &[ApiMessage], retry_after: Option<u64>) -> DnsPinError {
        let message = errors
            .iter()
            .map(|e| {
                if e.code == 0 {
                    e.message.clone()
                } else {
                    format!("{} (code {})", e.message, e.code)
                }
            })
            .collect::<Vec<_>>()
            .join("; ");

        if errors.iter().any(|e| e.code == RECORD_NOT_FOUND_CODE) {
            return DnsPinError::NotFound { resource: message };
        }

        match status {
            401 | 403 => DnsPinError::Unauthorized,
            404 => DnsPinError::NotFound { resource: message },
            429 => {
                warn!("Rate limited by Cloudflare API");
                DnsPinError::RateLimited { retry_after }
            }
            _ => DnsPinError::Provider { status, message },
        }
    }
}

/// Builder for configuring a [`CloudflareClient`]
pub struct CloudflareClientBuilder {
    api_token: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    retry_config: RetryConfig,
    rate_limit: RateLimitConfig,
}

impl CloudflareClientBuilder {
    /// Create a new builder with the given API token
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("dnspin/{}", env!("CARGO_PKG_VERSION")),
            retry_config: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set retry configuration
    #[must_use]
    pub const fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set the client-side rate limit
    #[must_use]
    pub const fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<CloudflareClient> {
        if self.api_token.trim().is_empty() {
            return Err(DnsPinError::MissingCredential);
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| DnsPinError::Http(format!("failed to build HTTP client: {e}")))?;

        let per_second = NonZeroU32::new(self.rate_limit.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.rate_limit.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Ok(CloudflareClient {
            inner: Arc::new(ClientInner {
                http,
                api_token: self.api_token,
                base_url: self.base_url,
                timeout: self.timeout,
                retry_config: self.retry_config,
                rate_limiter: RateLimiter::direct(quota),
            }),
        })
    }
}
