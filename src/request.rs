//! Turns an [`Endpoint`] into a fully resolved wire request.
//!
//! Construction runs in a fixed order because Content-Type precedence depends
//! on it:
//!
//! 1. join the endpoint path onto the base URL;
//! 2. encode URL parameters into the query string and default the
//!    Content-Type to `application/x-www-form-urlencoded; charset=utf-8`;
//! 3. encode the body: multipart when an upload carries bytes, pretty JSON
//!    when body parameters are present (`application/json` only if no
//!    Content-Type is set yet, so the form default from step 2 wins);
//! 4. apply the caller's headers, overwriting same-named ones;
//! 5. for multipart bodies, force the multipart Content-Type over everything.

use crate::{endpoint::Endpoint, upload::Upload, Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::time::Duration;
use url::Url;

/// Characters left unescaped in query keys and values: `A-Z a-z 0-9 - . _ ~`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(crate) const FORM_URLENCODED: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub(crate) const APPLICATION_JSON: &str = "application/json";

/// A request ready to hand to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    /// Absolute URL including the encoded query string.
    pub url: Url,
    /// The HTTP method.
    pub method: Method,
    /// Final request headers.
    pub headers: HeaderMap,
    /// Encoded body, if any.
    pub body: Option<Bytes>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WireRequest {
    /// The Content-Type header as text, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }

    /// Multipart boundary parsed back out of the Content-Type header.
    pub fn multipart_boundary(&self) -> Option<&str> {
        self.content_type()?
            .strip_prefix("multipart/form-data; boundary=")
    }
}

/// Builds a wire request for `endpoint` against `base_url`.
///
/// A fresh multipart boundary is generated when `upload` carries bytes.
///
/// # Errors
///
/// * [`Error::InvalidUrl`] if `base_url` does not parse or cannot take a path.
/// * [`Error::EncodingFailed`] if the JSON body or a header cannot be encoded.
///
/// # Examples
///
/// ```
/// use lightnet::{build_request, Endpoint};
/// use std::time::Duration;
///
/// let endpoint = Endpoint::get("/api/ping").with_url_param("q", "a b");
/// let request = build_request(&endpoint, "https://x.test", Duration::from_secs(20), None).unwrap();
///
/// assert_eq!(request.url.as_str(), "https://x.test/api/ping?q=a%20b");
/// assert_eq!(
///     request.content_type(),
///     Some("application/x-www-form-urlencoded; charset=utf-8")
/// );
/// ```
pub fn build_request(
    endpoint: &Endpoint,
    base_url: &str,
    timeout: Duration,
    upload: Option<&Upload>,
) -> Result<WireRequest> {
    build_request_with_boundary(endpoint, base_url, timeout, upload, &generate_boundary())
}

/// Same as [`build_request`] but with a caller-chosen multipart boundary.
pub fn build_request_with_boundary(
    endpoint: &Endpoint,
    base_url: &str,
    timeout: Duration,
    upload: Option<&Upload>,
    boundary: &str,
) -> Result<WireRequest> {
    let mut url = join_url(base_url, endpoint.path())?;

    let mut headers = HeaderMap::new();
    let params = endpoint.url_params();
    if !params.is_empty() {
        url.set_query(Some(&encode_query(params)));
        set_if_absent(&mut headers, FORM_URLENCODED);
    }

    let mut multipart = false;

    let body = match upload.filter(|u| u.has_payload()) {
        Some(upload) => {
            multipart = true;
            Some(multipart_body(endpoint.body_params(), upload, boundary))
        }
        None => match endpoint.body_params().filter(|p| !p.is_empty()) {
            Some(body_params) => {
                let json = serde_json::to_vec_pretty(body_params)
                    .map_err(|e| Error::EncodingFailed(e.to_string()))?;
                set_if_absent(&mut headers, APPLICATION_JSON);
                Some(Bytes::from(json))
            }
            None => None,
        },
    };

    for (name, value) in endpoint.headers() {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::EncodingFailed(format!("Invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| Error::EncodingFailed(format!("Invalid header value for '{}': {}", name, e)))?;
        headers.insert(name, value);
    }

    if multipart {
        let value = HeaderValue::try_from(format!("multipart/form-data; boundary={}", boundary))
            .map_err(|e| Error::EncodingFailed(format!("Invalid multipart boundary: {}", e)))?;
        headers.insert(CONTENT_TYPE, value);
    }

    Ok(WireRequest {
        url,
        method: endpoint.method().clone(),
        headers,
        body,
        timeout,
    })
}

/// Generates a multipart boundary of the form `Boundary=<UUID>`.
pub fn generate_boundary() -> String {
    format!("Boundary={}", uuid::Uuid::new_v4().to_string().to_uppercase())
}

/// Appends `path` to the base URL's path.
fn join_url(base_url: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| Error::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl {
            url: base_url.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }

    let relative = path.trim_start_matches('/');
    if !relative.is_empty() {
        let joined = format!("{}/{}", url.path().trim_end_matches('/'), relative);
        url.set_path(&joined);
    }

    Ok(url)
}

/// Encodes parameters as `key=value` pairs joined by `&`.
///
/// Keys go through the same unreserved-only set as values, so a key can never
/// smuggle in `&`, `=` or `#`.
fn encode_query(params: &Map<String, Value>) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_VALUE),
                utf8_percent_encode(&param_text(value), QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Text form of a parameter: strings verbatim, everything else as compact JSON.
fn param_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

fn multipart_body(params: Option<&Map<String, Value>>, upload: &Upload, boundary: &str) -> Bytes {
    let kind = upload.kind();
    let data = upload.data().map(|d| &d[..]).unwrap_or_default();
    let mut body = BytesMut::with_capacity(data.len() + 256);

    for (key, value) in params.into_iter().flatten() {
        put_str(&mut body, &format!("--{}\r\n", boundary));
        put_str(
            &mut body,
            &format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", key),
        );
        put_str(&mut body, &format!("{}\r\n", param_text(value)));
    }

    put_str(&mut body, &format!("--{}\r\n", boundary));
    put_str(
        &mut body,
        &format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            kind.field_name(),
            kind.placeholder_filename()
        ),
    );
    put_str(&mut body, &format!("Content-Type: {}\r\n\r\n", kind.mime_type()));
    body.put_slice(data);
    put_str(&mut body, "\r\n");
    put_str(&mut body, &format!("--{}--\r\n", boundary));

    body.freeze()
}

fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_slice(s.as_bytes());
}

fn set_if_absent(headers: &mut HeaderMap, content_type: &'static str) {
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
}
