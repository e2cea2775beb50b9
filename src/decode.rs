//! JSON decoding of validated response bodies.

use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// Decodes JSON bytes into `T`.
///
/// Absent bytes and malformed JSON both fail with [`Error::DecodingFailed`];
/// the raw text is kept on the error for debugging.
///
/// ```
/// use lightnet::decode;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Site { id: u32 }
///
/// let site: Site = decode(Some(br#"{"id": 7}"#.as_slice())).unwrap();
/// assert_eq!(site.id, 7);
/// assert!(decode::<Site>(None).is_err());
/// ```
pub fn decode<T: DeserializeOwned>(data: Option<&[u8]>) -> Result<T> {
    let data = data.ok_or_else(|| Error::DecodingFailed {
        raw_response: String::new(),
        serde_error: "no data to decode".to_string(),
    })?;

    serde_json::from_slice(data).map_err(|e| {
        let raw_response = String::from_utf8_lossy(data).into_owned();
        tracing::error!(
            error = %e,
            raw_response = %raw_response,
            "Failed to decode response"
        );
        Error::DecodingFailed {
            raw_response,
            serde_error: e.to_string(),
        }
    })
}
