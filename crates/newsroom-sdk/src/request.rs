//! HTTP Request representation for handlers

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};

/// Represents an incoming HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: String,

    /// Request path (e.g., "/api/news/news_1")
    pub path: String,

    /// Request body as text
    #[serde(default)]
    pub body: Option<String>,
}

impl Request {
    /// Create a request for the given method and path with no body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: None,
        }
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Parse the body as JSON into a typed value.
    ///
    /// A missing body is treated as an empty document and fails to parse,
    /// the same as a malformed one.
    ///
    /// # Example
    /// ```ignore
    /// let body: serde_json::Value = req.json()?;
    /// ```
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, HandlerError> {
        let raw = self.body.as_deref().unwrap_or("");
        Ok(serde_json::from_str(raw)?)
    }

    /// Check if request method matches (case-insensitive).
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_json_body() {
        let req = Request::new("POST", "/api/news").with_body(r#"{"title":"Hello"}"#);
        let body: Value = req.json().unwrap();
        assert_eq!(body, json!({"title": "Hello"}));
    }

    #[test]
    fn test_missing_and_malformed_body_are_bad_requests() {
        let req = Request::new("POST", "/api/news");
        let err = req.json::<Value>().unwrap_err();
        assert_eq!(err.status_code(), 400);

        let req = req.with_body("{not json");
        let err = req.json::<Value>().unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_is_method() {
        let req = Request::new("post", "/api/subscribe");
        assert!(req.is_method("POST"));
        assert!(!req.is_method("GET"));
    }
}
