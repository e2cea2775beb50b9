//! Request and response logging through `tracing`.
//!
//! The logger is a pure observer: it never fails and never alters what it
//! sees. Its [`LogLevel`] is fixed when the client is built.

use crate::request::WireRequest;
use http::StatusCode;
use url::Url;

/// How much of each exchange the network logger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Nothing is logged.
    #[default]
    Off,
    /// Request line, headers and body; response status and URL.
    Info,
    /// Everything in `Info` plus the response body, pretty-printed when it is JSON.
    Debug,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct NetworkLogger {
    level: LogLevel,
}

impl NetworkLogger {
    pub(crate) fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub(crate) fn level(&self) -> LogLevel {
        self.level
    }

    pub(crate) fn log_request(&self, request: &WireRequest) {
        if self.level == LogLevel::Off {
            return;
        }

        let headers = request
            .headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())))
            .collect::<Vec<_>>()
            .join(", ");

        // Binary bodies (multipart uploads) are summarized by size only.
        let body = request
            .body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok());

        tracing::info!(
            method = %request.method,
            url = %request.url,
            headers = %headers,
            body = body.unwrap_or_default(),
            body_bytes = request.body.as_ref().map_or(0, |b| b.len()),
            "Outgoing request"
        );
    }

    pub(crate) fn log_response(&self, status: StatusCode, url: &Url, body: Option<&[u8]>) {
        if self.level == LogLevel::Off {
            return;
        }

        tracing::info!(
            status = status.as_u16(),
            url = %url,
            body_bytes = body.map_or(0, <[u8]>::len),
            "Received response"
        );

        if self.level == LogLevel::Debug {
            if let Some(body) = body {
                tracing::debug!(body = %pretty_body(body), "Response body");
            }
        }
    }
}

/// Pretty-printed JSON if `body` parses as JSON, lossy UTF-8 text otherwise.
fn pretty_body(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
