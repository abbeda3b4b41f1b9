//! Process-wide discovery options
//!
//! Options can be constructed in code or loaded from a YAML (or JSON) file:
//!
//! ```yaml
//! includePrivate: false
//! debug: true
//! ```

use crate::{DiscoveryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-call configuration merged into a built endpoint.
///
/// The key `version` is reserved for version selection and is never passed
/// through to the endpoint.
pub type GlobalOptions = serde_json::Map<String, serde_json::Value>;

/// Configuration shared by every resolution performed by one orchestrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryOptions {
    /// Include private/internal APIs when listing the catalog
    pub include_private: bool,
    /// Emit a trace line for every document fetched or read
    pub debug: bool,
}

impl DiscoveryOptions {
    /// Load options from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DiscoveryError::Config(format!("Failed to read options file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            DiscoveryError::Config(msg) => {
                DiscoveryError::Config(format!("{} (in {:?})", msg, path))
            }
            other => other,
        })
    }

    /// Parse options from a YAML document; an empty document yields defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content)
            .map_err(|e| DiscoveryError::Config(format!("Failed to parse options: {}", e)))
    }

    pub fn with_include_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = DiscoveryOptions::default();
        assert!(!options.include_private);
        assert!(!options.debug);
    }

    #[test]
    fn test_from_yaml() {
        let options = DiscoveryOptions::from_yaml("includePrivate: true\ndebug: true\n").unwrap();
        assert!(options.include_private);
        assert!(options.debug);
    }

    #[test]
    fn test_from_yaml_partial_and_empty() {
        let options = DiscoveryOptions::from_yaml("debug: true").unwrap();
        assert!(!options.include_private);
        assert!(options.debug);

        assert_eq!(
            DiscoveryOptions::from_yaml("").unwrap(),
            DiscoveryOptions::default()
        );
    }

    #[test]
    fn test_from_json_document() {
        let options = DiscoveryOptions::from_yaml(r#"{"includePrivate": true}"#).unwrap();
        assert!(options.include_private);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = DiscoveryOptions::from_yaml("debug: [not, a, bool]");
        assert!(matches!(result, Err(DiscoveryError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "includePrivate: true").unwrap();

        let options = DiscoveryOptions::load(file.path()).unwrap();
        assert!(options.include_private);
        assert!(!options.debug);
    }

    #[test]
    fn test_load_missing_file() {
        let result = DiscoveryOptions::load(Path::new("/nonexistent/options.yaml"));
        assert!(matches!(result, Err(DiscoveryError::Config(_))));
    }
}
