//! Declarative description of a single HTTP call.

use http::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A parameter map with insertion order and last-write-wins per key.
pub type Params = Map<String, Value>;

/// Everything needed to build one request against a client's base URL.
///
/// Endpoints are plain values. The mutators only ever insert or overwrite a
/// single entry; nothing is validated until the request is built.
///
/// # Examples
///
/// ```
/// use lightnet::Endpoint;
///
/// let endpoint = Endpoint::post("/api/patients")
///     .with_url_param("site", 12)
///     .with_body_param("name", "Ada")
///     .with_header("Accept-Encoding", "gzip");
///
/// assert_eq!(endpoint.path(), "/api/patients");
/// assert_eq!(endpoint.url_params()["site"], 12);
/// assert_eq!(endpoint.body_params().unwrap()["name"], "Ada");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    path: String,
    method: Method,
    url_params: Params,
    body_params: Option<Params>,
    headers: HashMap<String, String>,
}

impl Endpoint {
    /// Creates a GET endpoint for `path`, relative to the client's base URL.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            url_params: Params::new(),
            body_params: None,
            headers: HashMap::new(),
        }
    }

    /// Creates a GET endpoint.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path)
    }

    /// Creates a POST endpoint.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path).with_method(Method::POST)
    }

    /// Sets the HTTP method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Inserts or overwrites a URL query parameter.
    pub fn add_url_param(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.url_params.insert(name.into(), value.into());
    }

    /// Inserts or overwrites a body parameter, creating the body map on first use.
    pub fn add_body_param(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.body_params
            .get_or_insert_with(Params::new)
            .insert(name.into(), value.into());
    }

    /// Inserts or overwrites an extra HTTP header.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Builder form of [`add_url_param`](Self::add_url_param).
    pub fn with_url_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_url_param(name, value);
        self
    }

    /// Builder form of [`add_body_param`](Self::add_body_param).
    pub fn with_body_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_body_param(name, value);
        self
    }

    /// Builder form of [`add_header`](Self::add_header).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    /// Adds multiple URL query parameters.
    pub fn with_url_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in params {
            self.add_url_param(name, value);
        }
        self
    }

    /// The path appended to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Query parameters in insertion order.
    pub fn url_params(&self) -> &Params {
        &self.url_params
    }

    /// Body parameters, if any were ever added.
    pub fn body_params(&self) -> Option<&Params> {
        self.body_params.as_ref()
    }

    /// Extra headers supplied by the caller.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_endpoint_is_bare_get() {
        let endpoint = Endpoint::new("/ping");
        assert_eq!(endpoint.method(), &Method::GET);
        assert!(endpoint.url_params().is_empty());
        assert!(endpoint.body_params().is_none());
        assert!(endpoint.headers().is_empty());
    }

    #[test]
    fn test_url_param_overwrite_keeps_position() {
        let endpoint = Endpoint::get("/")
            .with_url_param("a", 1)
            .with_url_param("b", 2)
            .with_url_param("a", 3);

        let keys: Vec<_> = endpoint.url_params().keys().cloned().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(endpoint.url_params()["a"], json!(3));
    }

    #[test]
    fn test_add_body_param_creates_map_lazily() {
        let mut endpoint = Endpoint::post("/items");
        assert!(endpoint.body_params().is_none());

        endpoint.add_body_param("name", "widget");
        endpoint.add_body_param("count", 4);

        let body = endpoint.body_params().unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body["count"], json!(4));
    }

    #[test]
    fn test_header_overwrite() {
        let endpoint = Endpoint::get("/")
            .with_header("X-Trace", "one")
            .with_header("X-Trace", "two");
        assert_eq!(endpoint.headers().get("X-Trace").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Endpoint::get("/").with_url_param("q", "a");
        let mut copy = original.clone();
        copy.add_url_param("q", "b");
        assert_eq!(original.url_params()["q"], json!("a"));
    }
}
