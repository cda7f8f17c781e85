use std::borrow::Cow;
use std::time::Duration;

use ctgforge_common::resilience::{parse_retry_after, RetryConfig, RetryDecision};
use ctgforge_core::query::QueryParams;
use ctgforge_core::search::RawRecord;
use ctgforge_domain::constants::{ACCEPT_JSON, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use ctgforge_domain::{excerpt, BoxedError, HttpStatusError, TransportError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::{Client as ReqwestClient, Response};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Retrying JSON-over-HTTP client bound to one API base URL.
///
/// Every call is a side-effect-free GET, so transient failures (retryable
/// statuses, timeouts, refused connections) are retried under the
/// configured [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    headers: HeaderMap,
    retry: RetryConfig,
    owns_client: bool,
}

/// Result of a single attempt.
enum Attempt {
    Done(Result<RawRecord, TransportError>),
    Retry { cause: BoxedError, status: Option<u16>, retry_after: Option<Duration> },
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Whether the connection pool was created by this client.
    pub fn owns_client(&self) -> bool {
        self.owns_client
    }

    /// Build the request URL for `path` with `params` appended verbatim.
    ///
    /// Values are already in the API's wire form (`+` for spaces), so the
    /// query string is assembled by hand instead of form-encoding it again.
    /// Only `%` and `&` are escaped, which keeps literal text intact.
    pub fn url_for(&self, path: &str, params: &QueryParams) -> Result<Url, TransportError> {
        self.url_with(path, params, &[])
    }

    /// Like [`url_for`](Self::url_for), then append `encoded` pairs untouched.
    ///
    /// `encoded` values must already be percent-encoded (opaque page tokens).
    pub fn url_with(
        &self,
        path: &str,
        params: &QueryParams,
        encoded: &[(&str, &str)],
    ) -> Result<Url, TransportError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| TransportError::Request(format!("invalid URL for {path}: {err}")))?;

        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", escape_literals(key), escape_literals(value)))
            .chain(encoded.iter().map(|(key, value)| format!("{key}={value}")))
            .collect::<Vec<_>>()
            .join("&");
        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        Ok(url)
    }

    /// GET `path` and decode the body as a JSON object, retrying transient failures.
    pub async fn get_json(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<RawRecord, TransportError> {
        self.get_json_with(path, params, &[]).await
    }

    /// GET with extra pre-encoded query pairs; see [`url_with`](Self::url_with).
    #[instrument(skip(self, params, encoded), fields(base_url = %self.base_url))]
    pub async fn get_json_with(
        &self,
        path: &str,
        params: &QueryParams,
        encoded: &[(&str, &str)],
    ) -> Result<RawRecord, TransportError> {
        let url = self.url_with(path, params, encoded)?;
        let attempts = self.retry.total_attempts();
        let mut last_failure: Option<(BoxedError, Option<u16>)> = None;

        for attempt in 0..attempts {
            debug!(attempt = attempt + 1, %url, "sending HTTP request");

            match self.attempt(&url, path).await {
                Attempt::Done(result) => return result,
                Attempt::Retry { cause, status, retry_after } => {
                    debug!(attempt = attempt + 1, ?status, error = %cause, "transient failure");
                    if let RetryDecision::RetryAfter(delay) = self.retry.decide(attempt, retry_after) {
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                    last_failure = Some((cause, status));
                }
            }
        }

        let (source, last_status) =
            last_failure.unwrap_or_else(|| ("no attempt was made".into(), None));
        warn!(%url, attempts, ?last_status, error = %source, "retries exhausted");

        Err(TransportError::RetriesExhausted { path: path.to_string(), attempts, last_status, source })
    }

    async fn attempt(&self, url: &Url, path: &str) -> Attempt {
        let response =
            match self.client.get(url.clone()).headers(self.headers.clone()).send().await {
                Ok(response) => response,
                Err(err) if should_retry_error(&err) => {
                    return Attempt::Retry { cause: Box::new(err), status: None, retry_after: None };
                }
                Err(err) => return Attempt::Done(Err(TransportError::Request(err.to_string()))),
            };

        let status = response.status();
        debug!(%url, %status, "received HTTP response");

        if self.retry.is_retryable_status(status.as_u16()) {
            let retry_after = retry_after_hint(&response);
            let body = response.text().await.unwrap_or_default();
            return Attempt::Retry {
                cause: Box::new(HttpStatusError { status: status.as_u16(), body: excerpt(&body) }),
                status: Some(status.as_u16()),
                retry_after,
            };
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, %status, "non-retryable HTTP error");
            return Attempt::Done(Err(TransportError::http(path, status.as_u16(), &body)));
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                return Attempt::Retry { cause: Box::new(err), status: None, retry_after: None }
            }
        };

        Attempt::Done(decode_object(path, &bytes))
    }

    /// Release the client.
    ///
    /// An owned connection pool is shut down once the last clone is
    /// dropped; an injected client is left to its owner.
    pub fn close(self) {
        if self.owns_client {
            info!(base_url = %self.base_url, "closing owned HTTP client");
        } else {
            debug!(base_url = %self.base_url, "leaving injected HTTP client open");
        }
    }
}

fn decode_object(path: &str, bytes: &[u8]) -> Result<RawRecord, TransportError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| TransportError::Decoding { path: path.to_string(), message: err.to_string() })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(TransportError::Decoding {
            path: path.to_string(),
            message: format!("expected a JSON object, got {}", json_type(&other)),
        }),
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn retry_after_hint(response: &Response) -> Option<Duration> {
    response.headers().get(RETRY_AFTER)?.to_str().ok().and_then(parse_retry_after)
}

/// Percent-encode `%` then `&`; `+` stays as the encoded space.
fn escape_literals(raw: &str) -> Cow<'_, str> {
    if raw.contains(['%', '&']) {
        Cow::Owned(raw.replace('%', "%25").replace('&', "%26"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    extra_headers: Vec<(String, String)>,
    retry: RetryConfig,
    client: Option<ReqwestClient>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_headers: Vec::new(),
            retry: RetryConfig::default(),
            client: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout for an owned client. Ignored for injected clients.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Add a header sent with every request; it overrides the defaults.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Use a caller-owned reqwest client instead of creating one.
    pub fn client(mut self, client: ReqwestClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpClient, TransportError> {
        self.retry
            .validate()
            .map_err(|err| TransportError::Request(format!("invalid retry policy: {err}")))?;

        let base_url = self.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|err| TransportError::Request(format!("invalid base URL {base_url}: {err}")))?;

        let headers = build_headers(&self.user_agent, &self.extra_headers)?;

        let (client, owns_client) = match self.client {
            Some(client) => (client, false),
            None => {
                let client = ReqwestClient::builder()
                    .timeout(self.timeout)
                    .no_proxy()
                    .build()
                    .map_err(|err| TransportError::Request(err.to_string()))?;
                (client, true)
            }
        };

        Ok(HttpClient { client, base_url, headers, retry: self.retry, owns_client })
    }
}

fn build_headers(
    user_agent: &str,
    extra_headers: &[(String, String)],
) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|err| TransportError::Request(format!("invalid User-Agent: {err}")))?,
    );

    for (name, value) in extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| TransportError::Request(format!("invalid header name {name}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| TransportError::Request(format!("invalid value for {name}: {err}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}
