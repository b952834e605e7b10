//! Request descriptors

use crate::error::ApiResult;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Everything the transport needs to issue one call
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Path relative to the base URL, query string included
    pub path: String,
    /// HTTP method
    pub method: Method,
    /// JSON body, omitted when `None`
    pub body: Option<Value>,
    /// Extra headers, merged over the defaults
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Create a request with no body or extra headers
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Builder-style method to attach a serializable body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Builder-style method to attach a JSON value
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Builder-style method to add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Path with exactly one leading slash
    #[must_use]
    pub fn normalized_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}
