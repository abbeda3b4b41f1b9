//! Common types and utilities for discovery-runtime
//!
//! This crate contains the error taxonomy, process-wide options and the
//! collaborator traits (transport, request execution, file access) shared
//! by the parser, endpoint builder and client crates.

mod capabilities;
mod options;

pub use capabilities::{
    is_url, ApiRequest, DynExecutor, DynFileReader, DynTransporter, FileReader, RequestExecutor,
    RequestOptions, TransportRequest, Transporter,
};
pub use options::{DiscoveryOptions, GlobalOptions};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering and materializing APIs
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Network or HTTP failure reaching a discovery document or list
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Local discovery document could not be read
    #[error("File error: {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not a valid discovery document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Schema is structurally insufficient to build a call tree
    #[error("Failed to build endpoint for {api} {version}: {source}")]
    EndpointBuild {
        api: String,
        version: String,
        #[source]
        source: Box<DiscoveryError>,
    },

    /// Caller passed an unsupported argument
    #[error("Argument error: {0}")]
    Argument(String),

    /// Requested name/version pair is unknown or could not be built
    #[error("Unable to load endpoint {api}(\"{version}\"): {message}")]
    EndpointSelection {
        api: String,
        version: String,
        message: String,
    },

    /// Options file is unreadable or invalid
    #[error("Config error: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// Transport failure without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        DiscoveryError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status carried by a transport failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            DiscoveryError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Parse(err.to_string())
    }
}

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_build_error_names_api_and_version() {
        let err = DiscoveryError::EndpointBuild {
            api: "storage".to_string(),
            version: "v1".to_string(),
            source: Box::new(DiscoveryError::Parse("method 'get' has no body".to_string())),
        };

        let message = err.to_string();
        assert!(message.contains("storage"));
        assert!(message.contains("v1"));
        assert!(message.contains("method 'get' has no body"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_selection_error_message() {
        let err = DiscoveryError::EndpointSelection {
            api: "drive".to_string(),
            version: "v9".to_string(),
            message: "version not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to load endpoint drive(\"v9\"): version not found"
        );
    }

    #[test]
    fn test_transport_status() {
        let err = DiscoveryError::Transport {
            status: Some(404),
            message: "not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(DiscoveryError::transport("refused").status(), None);
    }

    #[test]
    fn test_json_error_is_parse_error() {
        let err: DiscoveryError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, DiscoveryError::Parse(_)));
    }
}
