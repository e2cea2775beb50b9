//! HTTP client that runs endpoints through build, send and validate.
//!
//! The [`Client`] type is the main entry point for making requests.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{
    decode::decode,
    endpoint::Endpoint,
    logger::{LogLevel, NetworkLogger},
    progress::{observed_body, ProgressCallback},
    reachability::{AlwaysReachable, ConnectionStatus, Reachability},
    request::{build_request, WireRequest},
    upload::Upload,
    validate::validate_response,
    Error, Result,
};
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::HeaderValue;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Default timeout for [`Client::request`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Default timeout for [`Client::upload`].
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-call settings.
///
/// # Examples
///
/// ```no_run
/// use lightnet::{CallOptions, Client, Endpoint, LogLevel, Upload, UploadKind};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), lightnet::Error> {
/// let client = Client::new("https://api.example.com", LogLevel::Info)?;
/// let cancel = CancellationToken::new();
///
/// let options = CallOptions::new()
///     .timeout(Duration::from_secs(120))
///     .cancel_token(cancel.clone())
///     .on_progress(Arc::new(|fraction| println!("{:.0}%", fraction * 100.0)));
///
/// let upload = Upload::new(UploadKind::Video, std::fs::read("clip.mp4").unwrap());
/// client
///     .upload_with(&Endpoint::post("/videos"), &upload, options)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct CallOptions {
    /// Overrides the client's default timeout for this call.
    pub timeout: Option<Duration>,
    /// Cancels the call when triggered.
    pub cancel: Option<CancellationToken>,
    /// Upload progress observer. Ignored by plain requests.
    pub on_progress: Option<ProgressCallback>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a cancellation token.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Sets the upload progress callback.
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("timeout", &self.timeout)
            .field("cancel", &self.cancel)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

/// An HTTP client that turns [`Endpoint`]s into validated response bodies.
///
/// The client is cheap to clone and designed to be reused: clones share one
/// connection pool, and any number of calls may run concurrently.
///
/// # Examples
///
/// ```no_run
/// use lightnet::{Client, Endpoint, LogLevel};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Site {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), lightnet::Error> {
/// let client = Client::new("https://api.example.com", LogLevel::Debug)?;
///
/// // Raw bytes
/// let body = client.request(&Endpoint::get("/api/ping")).await?;
/// println!("{} bytes", body.len());
///
/// // Decoded JSON
/// let endpoint = Endpoint::get("/api/sites").with_url_param("region", "north");
/// let sites: Vec<Site> = client.fetch(&endpoint).await?;
/// println!("{} sites", sites.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    logger: NetworkLogger,
    reachability: Box<dyn Reachability>,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl Client {
    /// Creates a client for `base_url` with default settings.
    ///
    /// The base URL is validated when requests are built, so a malformed one
    /// surfaces as [`Error::InvalidUrl`] from each call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, log_level: LogLevel) -> Result<Self> {
        Self::builder().base_url(base_url).log_level(log_level).build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base URL every endpoint path is appended to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The network logger's level.
    pub fn log_level(&self) -> LogLevel {
        self.inner.logger.level()
    }

    /// Sends `endpoint` and returns the validated response body.
    ///
    /// Uses the client's request timeout (20 seconds unless configured).
    ///
    /// # Errors
    ///
    /// * [`Error::NoNetwork`] if the reachability oracle reports no network;
    ///   nothing is sent in that case.
    /// * [`Error::InvalidUrl`] / [`Error::EncodingFailed`] from request building.
    /// * [`Error::Timeout`] / [`Error::NoResponse`] from the transport.
    /// * [`Error::BadStatusCode`] / [`Error::Unknown`] from validation.
    pub async fn request(&self, endpoint: &Endpoint) -> Result<Bytes> {
        self.request_with(endpoint, CallOptions::default()).await
    }

    /// Like [`request`](Self::request) with per-call options.
    pub async fn request_with(&self, endpoint: &Endpoint, options: CallOptions) -> Result<Bytes> {
        let timeout = options.timeout.unwrap_or(self.inner.request_timeout);
        self.execute(endpoint, None, timeout, options).await
    }

    /// Uploads `upload` as a multipart body alongside the endpoint's body
    /// parameters and returns the validated response body.
    ///
    /// Uses the client's upload timeout (60 seconds unless configured). An
    /// upload without bytes is sent as a plain request.
    pub async fn upload(&self, endpoint: &Endpoint, upload: &Upload) -> Result<Bytes> {
        self.upload_with(endpoint, upload, CallOptions::default()).await
    }

    /// Like [`upload`](Self::upload) with per-call options, including the
    /// progress callback.
    pub async fn upload_with(
        &self,
        endpoint: &Endpoint,
        upload: &Upload,
        options: CallOptions,
    ) -> Result<Bytes> {
        let timeout = options.timeout.unwrap_or(self.inner.upload_timeout);
        self.execute(endpoint, Some(upload), timeout, options).await
    }

    /// Sends `endpoint` and decodes the JSON response into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`request`](Self::request) returns, plus
    /// [`Error::MissingData`] for an empty body and [`Error::DecodingFailed`]
    /// for a body that is not valid JSON for `T`.
    pub async fn fetch<T>(&self, endpoint: &Endpoint) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.fetch_with(endpoint, CallOptions::default()).await
    }

    /// Like [`fetch`](Self::fetch) with per-call options.
    pub async fn fetch_with<T>(&self, endpoint: &Endpoint, options: CallOptions) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.request_with(endpoint, options).await?;
        if body.is_empty() {
            return Err(Error::MissingData);
        }
        decode(Some(&body[..]))
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        upload: Option<&Upload>,
        timeout: Duration,
        options: CallOptions,
    ) -> Result<Bytes> {
        if self.inner.reachability.connection_status() == ConnectionStatus::Unavailable {
            tracing::warn!(path = %endpoint.path(), "No network connection, request not sent");
            return Err(Error::NoNetwork);
        }

        let request = build_request(endpoint, &self.inner.base_url, timeout, upload)?;
        self.inner.logger.log_request(&request);

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            timeout_ms = timeout.as_millis(),
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let on_progress = options.on_progress.filter(|_| upload.is_some());
        let exchange = async {
            let response = self.send(request, on_progress).await?;
            let status = response.status();
            let url = response.url().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, url, body))
        };

        let (status, url, body) = match options.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(path = %endpoint.path(), "Request cancelled");
                    return Err(Error::Cancelled);
                }
                result = exchange => result,
            },
            None => exchange.await,
        }
        .map_err(|e| {
            tracing::warn!(error = %e, path = %endpoint.path(), "Request failed");
            Error::from(e)
        })?;

        tracing::debug!(
            status = status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "Received HTTP response"
        );
        self.inner.logger.log_response(status, &url, Some(&body[..]));

        validate_response(Some(status), Some(body))
    }

    /// Hands a built request to reqwest, streaming the body through the
    /// progress callback when one is set.
    async fn send(
        &self,
        request: WireRequest,
        on_progress: Option<ProgressCallback>,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let WireRequest {
            url,
            method,
            mut headers,
            body,
            timeout,
        } = request;

        let body = match (body, on_progress) {
            (Some(body), Some(on_progress)) => {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
                Some(reqwest::Body::wrap_stream(observed_body(body, on_progress)))
            }
            (Some(body), None) => Some(reqwest::Body::from(body)),
            (None, _) => None,
        };

        let mut builder = self
            .inner
            .http_client
            .request(method, url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder.send().await
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use lightnet::{ClientBuilder, ConnectionStatus, LogLevel};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), lightnet::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.example.com")
///     .log_level(LogLevel::Info)
///     .request_timeout(Duration::from_secs(10))
///     .upload_timeout(Duration::from_secs(300))
///     .reachability(|| ConnectionStatus::Available)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: String,
    log_level: LogLevel,
    reachability: Option<Box<dyn Reachability>>,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: String::new(),
            log_level: LogLevel::Off,
            reachability: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    /// Sets the base URL endpoint paths are appended to.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets how much of each exchange is logged.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Sets the connectivity oracle consulted before each call.
    ///
    /// Defaults to [`AlwaysReachable`].
    pub fn reachability(mut self, oracle: impl Reachability + 'static) -> Self {
        self.reachability = Some(Box::new(oracle));
        self
    }

    /// Sets the default timeout for [`Client::request`].
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the default timeout for [`Client::upload`].
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let reachability = self
            .reachability
            .unwrap_or_else(|| Box::new(AlwaysReachable));

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: self.base_url,
                logger: NetworkLogger::new(self.log_level),
                reachability,
                request_timeout: self.request_timeout,
                upload_timeout: self.upload_timeout,
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
    fn test_builder_defaults() {
        let client = Client::new("https://x.test", LogLevel::Info).unwrap();
        assert_eq!(client.base_url(), "https://x.test");
        assert_eq!(client.log_level(), LogLevel::Info);
        assert_eq!(client.inner.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(client.inner.upload_timeout, DEFAULT_UPLOAD_TIMEOUT);
    }

    #[test]
    fn test_call_options_debug_hides_callback() {
        let options = CallOptions::new().on_progress(Arc::new(|_| {}));
        let debug = format!("{:?}", options);
        assert!(debug.contains("on_progress: Some(\"{ ... }\")"));
    }

    #[tokio::test]
    async fn test_invalid_base_url_surfaces_per_call() {
        let client = Client::new("not a url", LogLevel::Off).unwrap();
        let err = client.request(&Endpoint::get("/x")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_short_circuits() {
        let client = Client::new("http://127.0.0.1:9", LogLevel::Off).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let err = client
            .request_with(&Endpoint::get("/"), CallOptions::new().cancel_token(token))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
