//! Classification of transport responses into success or a specific error.

use crate::{Error, Result};
use bytes::Bytes;
use http::StatusCode;

/// Checks a response's status and body.
///
/// Rules apply in order:
///
/// 1. no status code at all → [`Error::NoResponse`];
/// 2. status outside `[200, 400)` → [`Error::BadStatusCode`];
/// 3. no body → [`Error::Unknown`];
/// 4. otherwise the body is returned unchanged.
///
/// ```
/// use bytes::Bytes;
/// use http::StatusCode;
/// use lightnet::{validate_response, Error};
///
/// let body = validate_response(Some(StatusCode::OK), Some(Bytes::from_static(b"{}"))).unwrap();
/// assert_eq!(&body[..], b"{}");
///
/// let err = validate_response(Some(StatusCode::BAD_REQUEST), None).unwrap_err();
/// assert!(matches!(err, Error::BadStatusCode { .. }));
/// ```
pub fn validate_response(status: Option<StatusCode>, body: Option<Bytes>) -> Result<Bytes> {
    let status = status.ok_or(Error::NoResponse(None))?;

    if !(200..400).contains(&status.as_u16()) {
        let raw_response = body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default();
        return Err(Error::BadStatusCode {
            status,
            raw_response,
        });
    }

    body.ok_or(Error::Unknown)
}
