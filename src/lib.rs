//! # Lightnet - declarative HTTP endpoints on top of `reqwest`
//!
//! Describe a call as an [`Endpoint`] (path, method, URL parameters, body
//! parameters, headers), hand it to a [`Client`], and get back the validated
//! response body or a precise [`Error`]. Multipart file uploads with per-call
//! progress reporting are built in.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lightnet::{Client, Endpoint, LogLevel};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Site {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lightnet::Error> {
//!     let client = Client::new("https://api.example.com", LogLevel::Info)?;
//!
//!     // GET /api/sites?region=north%20east
//!     let endpoint = Endpoint::get("/api/sites").with_url_param("region", "north east");
//!     let sites: Vec<Site> = client.fetch(&endpoint).await?;
//!     println!("{} sites", sites.len());
//!
//!     // POST a JSON body
//!     let endpoint = Endpoint::post("/api/sites")
//!         .with_body_param("name", "Harbor")
//!         .with_body_param("beds", 40);
//!     let raw = client.request(&endpoint).await?;
//!     println!("{}", String::from_utf8_lossy(&raw));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Uploads
//!
//! ```no_run
//! use lightnet::{CallOptions, Client, Endpoint, LogLevel, Upload, UploadKind};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), lightnet::Error> {
//! let client = Client::new("https://api.example.com", LogLevel::Off)?;
//!
//! let endpoint = Endpoint::post("/api/photos").with_body_param("caption", "Sunrise");
//! let upload = Upload::new(UploadKind::Image, std::fs::read("sunrise.jpg").unwrap());
//!
//! let options = CallOptions::new()
//!     .on_progress(Arc::new(|fraction| println!("{:.0}% sent", fraction * 100.0)));
//! client.upload_with(&endpoint, &upload, options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Request encoding
//!
//! * URL parameters become the query string. Keys and values alike are
//!   percent-encoded with only `A-Z a-z 0-9 - . _ ~` left as is; this is
//!   deliberately stricter than general query encoding.
//! * Requests with URL parameters get
//!   `Content-Type: application/x-www-form-urlencoded; charset=utf-8`, even
//!   when they also carry a JSON body.
//! * Body parameters become a pretty-printed JSON body with
//!   `Content-Type: application/json` when nothing above or the caller set one.
//! * Uploads become `multipart/form-data`; that Content-Type always wins,
//!   even over a caller-supplied header.
//!
//! ## Logging
//!
//! Requests and responses are logged through `tracing` at the client's
//! [`LogLevel`]; install a subscriber (e.g. `tracing-subscriber`) to see them.

mod client;
mod decode;
mod endpoint;
mod error;
mod logger;
mod progress;
mod reachability;
mod request;
mod upload;
mod validate;

pub use client::{
    CallOptions, Client, ClientBuilder, DEFAULT_REQUEST_TIMEOUT, DEFAULT_UPLOAD_TIMEOUT,
};
pub use decode::decode;
pub use endpoint::{Endpoint, Params};
pub use error::{Error, Result};
pub use logger::LogLevel;
pub use progress::{ProgressCallback, ProgressTracker};
pub use reachability::{AlwaysReachable, ConnectionStatus, ProbeError, Reachability};
pub use request::{build_request, build_request_with_boundary, generate_boundary, WireRequest};
pub use upload::{Upload, UploadKind};
pub use validate::validate_response;
