//! Discovery document parser

use super::types::DiscoveryDoc;
use discovery_runtime_common::{DiscoveryError, Result};
use serde_json::Value;

/// Discovery Document parser
///
/// Accepts either raw JSON text (local files) or an already decoded JSON
/// body (HTTP responses, executor results).
#[derive(Debug, Clone)]
pub struct DiscoveryParser {
    /// Loaded Discovery document
    doc: DiscoveryDoc,
}

impl DiscoveryParser {
    /// Parse Discovery document from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| DiscoveryError::Parse(format!("Failed to parse Discovery JSON: {}", e)))?;

        Self::from_value(value)
    }

    /// Parse Discovery document from a decoded JSON body
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DiscoveryError::Parse(
                "Discovery document must be a JSON object".to_string(),
            ));
        }

        let doc: DiscoveryDoc = serde_json::from_value(value).map_err(|e| {
            DiscoveryError::Parse(format!("Invalid Discovery document: {}", e))
        })?;

        Ok(Self { doc })
    }

    /// Get reference to the underlying Discovery document
    pub fn doc(&self) -> &DiscoveryDoc {
        &self.doc
    }

    pub fn into_doc(self) -> DiscoveryDoc {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_discovery() {
        let discovery_json = r##"{
            "discoveryVersion": "v1",
            "name": "storage",
            "version": "v1",
            "title": "Cloud Storage JSON API",
            "rootUrl": "https://storage.googleapis.com/",
            "servicePath": "storage/v1/"
        }"##;

        let parser = DiscoveryParser::from_json(discovery_json);
        assert!(parser.is_ok());

        let parser = parser.unwrap();
        assert_eq!(parser.doc.name, "storage");
        assert_eq!(parser.doc.version, "v1");
        assert!(parser.doc.resources.is_empty());
    }

    #[test]
    fn test_parse_legacy_document() {
        let discovery_json = r##"{
            "name": "urlshortener",
            "version": "v1",
            "baseUrl": "https://www.googleapis.com/urlshortener/v1/"
        }"##;

        let doc = DiscoveryParser::from_json(discovery_json).unwrap().into_doc();
        assert!(doc.root_url.is_empty());
        assert_eq!(
            doc.base_url.as_deref(),
            Some("https://www.googleapis.com/urlshortener/v1/")
        );
    }

    #[test]
    fn test_reject_malformed_json() {
        let result = DiscoveryParser::from_json("<html>not found</html>");
        assert!(matches!(result, Err(DiscoveryError::Parse(_))));
    }

    #[test]
    fn test_reject_non_object() {
        let result = DiscoveryParser::from_value(Value::String("hello".to_string()));
        assert!(matches!(result, Err(DiscoveryError::Parse(_))));
    }

    #[test]
    fn test_reject_wrong_field_type() {
        let result = DiscoveryParser::from_json(r#"{"name": "x", "resources": []}"#);
        assert!(matches!(result, Err(DiscoveryError::Parse(_))));
    }
}
