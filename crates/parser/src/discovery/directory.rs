//! Discovery directory list (`GET /discovery/v1/apis`)

use discovery_runtime_common::{DiscoveryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Master list of every known API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryList {
    /// Always "discovery#directoryList"
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(rename = "discoveryVersion")]
    #[serde(default)]
    pub discovery_version: Option<String>,

    /// One entry per API name + version
    #[serde(default)]
    pub items: Vec<ApiDescriptor>,
}

/// One entry of the directory list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescriptor {
    /// API id (e.g., "drive:v3")
    #[serde(default)]
    pub id: Option<String>,

    /// API name (e.g., "drive")
    pub name: String,

    /// API version (e.g., "v3")
    pub version: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Where the API's discovery document lives
    #[serde(rename = "discoveryRestUrl")]
    pub discovery_rest_url: String,

    /// Whether this is the preferred version of the API
    #[serde(default)]
    pub preferred: bool,
}

impl DirectoryList {
    /// Parse a directory list from a decoded JSON body
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| DiscoveryError::Parse(format!("Invalid discovery list: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_directory_list() {
        let list = DirectoryList::from_value(json!({
            "kind": "discovery#directoryList",
            "discoveryVersion": "v1",
            "items": [
                {
                    "kind": "discovery#directoryItem",
                    "id": "drive:v2",
                    "name": "drive",
                    "version": "v2",
                    "discoveryRestUrl": "https://www.googleapis.com/discovery/v1/apis/drive/v2/rest",
                    "preferred": false
                },
                {
                    "id": "drive:v3",
                    "name": "drive",
                    "version": "v3",
                    "discoveryRestUrl": "https://www.googleapis.com/discovery/v1/apis/drive/v3/rest",
                    "preferred": true
                }
            ]
        }))
        .unwrap();

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[1].name, "drive");
        assert_eq!(list.items[1].version, "v3");
        assert!(list.items[1].preferred);
    }

    #[test]
    fn test_empty_directory_list() {
        let list = DirectoryList::from_value(json!({"kind": "discovery#directoryList"})).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_descriptor_without_rest_url() {
        let result = DirectoryList::from_value(json!({
            "items": [{"name": "drive", "version": "v3"}]
        }));
        assert!(matches!(result, Err(DiscoveryError::Parse(_))));
    }
}
