//! Error types for endpoint calls.
//!
//! Every stage of a call (connectivity check, request construction, transport,
//! response validation and decoding) reports failures through the single flat
//! [`Error`] enum. Nothing in the pipeline retries or recovers silently.

use http::StatusCode;

/// The main error type for endpoint calls.
///
/// # Examples
///
/// ```no_run
/// use lightnet::{Client, Endpoint, Error, LogLevel};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("https://api.example.com", LogLevel::Off)?;
///
/// match client.request(&Endpoint::get("/status")).await {
///     Ok(body) => println!("{} bytes", body.len()),
///     Err(Error::BadStatusCode { status, raw_response }) => {
///         eprintln!("HTTP {}: {}", status, raw_response);
///     }
///     Err(Error::NoNetwork) => eprintln!("offline"),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The reachability oracle reported the network as unavailable.
    ///
    /// Raised before any request is built or sent.
    #[error("No network connection")]
    NoNetwork,

    /// The base URL could not be parsed or the endpoint path could not be
    /// joined onto it.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL text
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A parameter, header or body could not be encoded for the wire.
    #[error("Failed to encode request: {0}")]
    EncodingFailed(String),

    /// The response body could not be decoded into the requested type.
    ///
    /// Also returned when decoding is asked for but no bytes are available.
    #[error("Failed to decode response: {serde_error}")]
    DecodingFailed {
        /// The raw body that failed to decode (lossy UTF-8)
        raw_response: String,
        /// The serde error message
        serde_error: String,
    },

    /// The transport produced no usable HTTP response.
    ///
    /// Carries the transport error when one is available.
    #[error("No response")]
    NoResponse(#[source] Option<reqwest::Error>),

    /// The server answered with a status code outside `[200, 400)`.
    #[error("Bad status code {status}: {raw_response}")]
    BadStatusCode {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body (lossy UTF-8), empty if none was read
        raw_response: String,
    },

    /// The status was acceptable but the body a decode step needs is empty.
    #[error("Response contained no data")]
    MissingData,

    /// A success-path gap that has no more specific kind, such as an
    /// acceptable status whose body could not be read.
    #[error("Unknown error")]
    Unknown,

    /// The request did not complete within its timeout.
    #[error("Request timed out")]
    Timeout,

    /// The call was cancelled through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// The HTTP client itself could not be configured.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    ///
    /// ```
    /// use lightnet::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::BadStatusCode {
    ///     status: StatusCode::NOT_FOUND,
    ///     raw_response: String::new(),
    /// };
    /// assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    /// assert_eq!(Error::NoNetwork.status(), None);
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::BadStatusCode { status, .. } => Some(*status),
            Error::NoResponse(Some(e)) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::BadStatusCode { raw_response, .. } => Some(raw_response),
            Error::DecodingFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::NoResponse(Some(e))
        }
    }
}

/// A specialized `Result` type for endpoint calls.
pub type Result<T> = std::result::Result<T, Error>;
