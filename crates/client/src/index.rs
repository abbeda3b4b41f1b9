//! Name → version index over every discovered API

use discovery_runtime_common::{DiscoveryError, GlobalOptions, Result};
use discovery_runtime_endpoint::{Endpoint, EndpointCreator};
use discovery_runtime_parser::ApiDescriptor;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// `index[name][version]` for every resolved API
pub type VersionIndex = BTreeMap<String, BTreeMap<String, EndpointCreator>>;

/// Argument of a version selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorArg {
    /// Version string, endpoint built with empty options
    Version(String),
    /// Options carrying the version under the `version` key
    Options(GlobalOptions),
}

impl SelectorArg {
    /// Split into the requested version and the endpoint options
    fn into_parts(self) -> (String, GlobalOptions) {
        match self {
            SelectorArg::Version(version) => (version, GlobalOptions::new()),
            SelectorArg::Options(mut options) => {
                let version = match options.remove("version") {
                    Some(Value::String(version)) => version,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                (version, options)
            }
        }
    }

    fn version(&self) -> String {
        match self {
            SelectorArg::Version(version) => version.clone(),
            SelectorArg::Options(options) => match options.get("version") {
                Some(Value::String(version)) => version.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            },
        }
    }
}

impl From<&str> for SelectorArg {
    fn from(version: &str) -> Self {
        SelectorArg::Version(version.to_string())
    }
}

impl From<String> for SelectorArg {
    fn from(version: String) -> Self {
        SelectorArg::Version(version)
    }
}

impl From<GlobalOptions> for SelectorArg {
    fn from(options: GlobalOptions) -> Self {
        SelectorArg::Options(options)
    }
}

impl TryFrom<Value> for SelectorArg {
    type Error = DiscoveryError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(version) => Ok(SelectorArg::Version(version)),
            Value::Object(options) => Ok(SelectorArg::Options(options)),
            other => Err(DiscoveryError::Argument(format!(
                "Selector accepts only a version string or an options object, got {}",
                other
            ))),
        }
    }
}

/// Builds endpoints for one API name, by version
#[derive(Clone)]
pub struct VersionSelector {
    name: String,
    index: Arc<VersionIndex>,
}

impl VersionSelector {
    /// API name this selector serves
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every known version, sorted
    pub fn versions(&self) -> Vec<&str> {
        self.index
            .get(&self.name)
            .map(|versions| versions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn creator(&self, version: &str) -> Option<&EndpointCreator> {
        self.index.get(&self.name)?.get(version)
    }

    /// Build an endpoint for a version (`"v2"`) or options
    /// (`{"version": "v2", ...}`)
    pub fn select(&self, arg: impl Into<SelectorArg>) -> Result<Endpoint> {
        let (version, options) = arg.into().into_parts();

        let creator = self
            .creator(&version)
            .ok_or_else(|| self.selection_error(&version, "version not found".to_string()))?;

        creator
            .create(options)
            .map_err(|e| self.selection_error(&version, e.to_string()))
    }

    /// Like [`select`](Self::select), for loosely typed callers; anything
    /// but a string or an object is rejected before any endpoint is built
    pub fn select_value(&self, arg: Value) -> Result<Endpoint> {
        self.select(SelectorArg::try_from(arg)?)
    }

    fn selection_error(&self, version: &str, message: String) -> DiscoveryError {
        DiscoveryError::EndpointSelection {
            api: self.name.clone(),
            version: version.to_string(),
            message,
        }
    }
}

impl fmt::Debug for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionSelector")
            .field("name", &self.name)
            .field("versions", &self.versions())
            .finish()
    }
}

/// Every discovered API, addressable by name
#[derive(Debug, Clone, Default)]
pub struct ApiIndex {
    index: Arc<VersionIndex>,
    apis: BTreeMap<String, VersionSelector>,
}

impl ApiIndex {
    /// Fold resolved descriptors into the two-level index
    pub fn from_resolved(resolved: Vec<(ApiDescriptor, EndpointCreator)>) -> Self {
        let mut index = VersionIndex::new();
        for (api, creator) in resolved {
            index
                .entry(api.name)
                .or_default()
                .insert(api.version, creator);
        }

        let index = Arc::new(index);
        let apis = index
            .keys()
            .map(|name| {
                let selector = VersionSelector {
                    name: name.clone(),
                    index: Arc::clone(&index),
                };
                (name.clone(), selector)
            })
            .collect();

        Self { index, apis }
    }

    /// Selector for an API name
    pub fn get(&self, name: &str) -> Option<&VersionSelector> {
        self.apis.get(name)
    }

    /// API names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apis.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VersionSelector)> {
        self.apis.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Full name → version → creator table
    pub fn version_index(&self) -> &VersionIndex {
        &self.index
    }

    /// Build an endpoint for `name` at the version described by `arg`
    pub fn select(&self, name: &str, arg: impl Into<SelectorArg>) -> Result<Endpoint> {
        let arg = arg.into();
        match self.apis.get(name) {
            Some(selector) => selector.select(arg),
            None => Err(DiscoveryError::EndpointSelection {
                api: name.to_string(),
                version: arg.version(),
                message: "API not found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_and_options_are_equivalent() {
        let (version, options) = SelectorArg::from("v2").into_parts();
        assert_eq!(version, "v2");
        assert!(options.is_empty());

        let arg = SelectorArg::try_from(json!({"version": "v2"})).unwrap();
        let (version, options) = arg.into_parts();
        assert_eq!(version, "v2");
        assert!(options.is_empty());
    }

    #[test]
    fn test_options_keep_other_fields() {
        let arg = SelectorArg::try_from(json!({"version": "v1", "timeout": 30})).unwrap();
        let (version, options) = arg.into_parts();
        assert_eq!(version, "v1");
        assert!(!options.contains_key("version"));
        assert_eq!(options["timeout"], 30);
    }

    #[test]
    fn test_rejects_other_types() {
        for value in [json!(2), json!(true), json!(null), json!(["v1"])] {
            let result = SelectorArg::try_from(value);
            assert!(matches!(result, Err(DiscoveryError::Argument(_))));
        }
    }

    #[test]
    fn test_empty_index() {
        let index = ApiIndex::default();
        assert!(index.is_empty());

        let err = index.select("drive", "v3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to load endpoint drive(\"v3\"): API not found"
        );
    }
}
