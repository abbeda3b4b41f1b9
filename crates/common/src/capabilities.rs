//! Collaborator traits consumed by the discovery pipeline
//!
//! The pipeline never talks to the network or the file system directly.
//! It goes through these traits so callers can plug in their own transport
//! stack, and tests can substitute mocks.

use crate::{GlobalOptions, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// A plain GET request for a discovery document or list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

impl TransportRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Fetches documents over HTTP and returns the decoded JSON body
#[async_trait]
pub trait Transporter: Send + Sync {
    async fn request(&self, request: TransportRequest) -> Result<Value>;
}

/// Target of an API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Fully built URL template (path parameters still in `{name}` form)
    pub url: String,
    /// HTTP method (GET, POST, ...)
    pub method: String,
    /// Per-method API version override, if the document declares one
    pub api_version: Option<String>,
}

/// One method invocation handed to a [`RequestExecutor`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub options: RequestOptions,
    /// Parameters that must be present, in declaration order
    pub required_params: Vec<String>,
    /// Parameters substituted into the URL path
    pub path_params: Vec<String>,
    pub params: GlobalOptions,
    /// Endpoint context; carries the endpoint options under `_options`
    pub context: Value,
    /// Simple media upload URL for methods that accept uploads
    pub media_url: Option<String>,
}

/// Turns an [`ApiRequest`] into an actual HTTP call
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<Value>;
}

/// Reads local discovery documents as UTF-8 text
#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read_text(&self, path: &Path) -> Result<String>;
}

/// Type-erased transporter
pub type DynTransporter = Arc<dyn Transporter>;

/// Type-erased request executor
pub type DynExecutor = Arc<dyn RequestExecutor>;

/// Type-erased file reader
pub type DynFileReader = Arc<dyn FileReader>;

/// Whether `source` carries a URL scheme.
///
/// Purely syntactic. Relative paths, protocol-relative URLs (`//host/x`)
/// and malformed URLs are all reported as not being URLs.
pub fn is_url(source: &str) -> bool {
    url::Url::parse(source).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://www.googleapis.com/discovery/v1/apis"));
        assert!(is_url("http://localhost:8080/$discovery/rest?version=v1"));
        assert!(is_url("file:///tmp/storage.json"));
    }

    #[test]
    fn test_is_not_url() {
        assert!(!is_url("./schema.json"));
        assert!(!is_url("schemas/storage-v1.json"));
        assert!(!is_url("/var/lib/discovery/drive.json"));
        assert!(!is_url("//www.googleapis.com/discovery/v1/apis"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_transport_request_headers() {
        let request = TransportRequest::new("https://example.com").with_header("X-User-Ip", "0.0.0.0");
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.headers.get("X-User-Ip").map(String::as_str), Some("0.0.0.0"));
    }
}
