//! Resolution of a single discovery document

use discovery_runtime_common::{
    is_url, ApiRequest, DiscoveryError, DiscoveryOptions, DynExecutor, DynFileReader,
    DynTransporter, GlobalOptions, RequestOptions, Result, TransportRequest,
};
use discovery_runtime_parser::{DiscoveryDoc, DiscoveryParser};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Where a discovery document comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoverySource {
    /// Absolute URL, fetched through the transporter
    Url(String),
    /// Local file
    Path(PathBuf),
    /// Dynamic discovery call executed through the request executor
    Request { url: String, params: GlobalOptions },
}

impl DiscoverySource {
    /// Classify a string: anything with a URL scheme is fetched, the rest
    /// is read from disk
    pub fn parse(source: &str) -> Self {
        if is_url(source) {
            DiscoverySource::Url(source.to_string())
        } else {
            DiscoverySource::Path(PathBuf::from(source))
        }
    }

    /// Build a dynamic discovery request from an object with a `url` field;
    /// every other field becomes a request parameter
    pub fn request(mut params: GlobalOptions) -> Result<Self> {
        match params.remove("url") {
            Some(Value::String(url)) => Ok(DiscoverySource::Request { url, params }),
            _ => Err(DiscoveryError::Argument(
                "Discovery request requires a string `url` field".to_string(),
            )),
        }
    }
}

impl From<&str> for DiscoverySource {
    fn from(source: &str) -> Self {
        DiscoverySource::parse(source)
    }
}

impl From<String> for DiscoverySource {
    fn from(source: String) -> Self {
        DiscoverySource::parse(&source)
    }
}

impl TryFrom<Value> for DiscoverySource {
    type Error = DiscoveryError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(source) => Ok(DiscoverySource::parse(&source)),
            Value::Object(params) => DiscoverySource::request(params),
            other => Err(DiscoveryError::Argument(format!(
                "Discovery source must be a string or an object, got {}",
                other
            ))),
        }
    }
}

/// Fetches or reads exactly one discovery document
#[derive(Clone)]
pub struct DiscoveryResolver {
    options: DiscoveryOptions,
    transporter: DynTransporter,
    executor: DynExecutor,
    files: DynFileReader,
}

impl DiscoveryResolver {
    pub fn new(
        options: DiscoveryOptions,
        transporter: DynTransporter,
        executor: DynExecutor,
        files: DynFileReader,
    ) -> Self {
        Self {
            options,
            transporter,
            executor,
            files,
        }
    }

    /// Resolve and parse one document
    pub async fn resolve(&self, source: &DiscoverySource) -> Result<DiscoveryDoc> {
        let parser = match source {
            DiscoverySource::Url(url) => {
                if self.options.debug {
                    tracing::info!("requesting {}", url);
                }
                let body = self
                    .transporter
                    .request(TransportRequest::new(url.as_str()))
                    .await?;
                DiscoveryParser::from_value(body)?
            }
            DiscoverySource::Path(path) => {
                if self.options.debug {
                    tracing::info!("reading from file {}", path.display());
                }
                let text = self.files.read_text(path).await?;
                DiscoveryParser::from_json(&text)?
            }
            DiscoverySource::Request { url, params } => {
                if self.options.debug {
                    tracing::info!("requesting {} with {} parameter(s)", url, params.len());
                }
                let body = self.executor.execute(discovery_request(url, params)).await?;
                DiscoveryParser::from_value(body)?
            }
        };

        Ok(parser.into_doc())
    }
}

fn discovery_request(url: &str, params: &GlobalOptions) -> ApiRequest {
    ApiRequest {
        options: RequestOptions {
            url: url.to_string(),
            method: "GET".to_string(),
            api_version: None,
        },
        required_params: Vec::new(),
        path_params: Vec::new(),
        params: params.clone(),
        context: json!({ "_options": {} }),
        media_url: None,
    }
}
