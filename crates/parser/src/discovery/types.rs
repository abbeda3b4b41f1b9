//! Google Discovery Document type definitions
//!
//! Based on JSON Schema Draft 3 with Google-specific extensions.
//! Every field that real-world documents omit is optional or defaulted so
//! partial and legacy documents still load. Resources, methods and schemas
//! stay raw JSON until something asks for them, so an oddly shaped entry
//! only fails the operation that decodes it.

use discovery_runtime_common::{DiscoveryError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Discovery Document root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryDoc {
    /// Discovery format version (e.g., "v1")
    #[serde(rename = "discoveryVersion")]
    #[serde(default)]
    pub discovery_version: Option<String>,

    /// API id (e.g., "storage:v1")
    #[serde(default)]
    pub id: Option<String>,

    /// API name (e.g., "storage", "compute")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// API version (e.g., "v1")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,

    /// API title
    #[serde(default)]
    pub title: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Root URL (e.g., "<https://storage.googleapis.com/>")
    #[serde(rename = "rootUrl")]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub root_url: String,

    /// Service path (e.g., "storage/v1/")
    #[serde(rename = "servicePath")]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service_path: String,

    /// Base path
    #[serde(rename = "basePath")]
    #[serde(default)]
    pub base_path: Option<String>,

    /// Legacy base URL, used when `rootUrl` is absent
    #[serde(rename = "baseUrl")]
    #[serde(default)]
    pub base_url: Option<String>,

    /// Where this document itself can be fetched
    #[serde(rename = "discoveryRestUrl")]
    #[serde(default)]
    pub discovery_rest_url: Option<String>,

    /// Parameters shared by every method
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: BTreeMap<String, Parameter>,

    /// Authentication scopes
    #[serde(default)]
    pub auth: Option<Auth>,

    /// Schemas (data types), decoded on lookup
    #[serde(default, deserialize_with = "null_as_empty")]
    pub schemas: BTreeMap<String, Value>,

    /// Resources (collections of methods), kept raw until an endpoint is built
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resources: BTreeMap<String, Value>,

    /// Methods at root level, kept raw until an endpoint is built
    #[serde(default, deserialize_with = "null_as_empty")]
    pub methods: BTreeMap<String, Value>,
}

/// Authentication information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    /// OAuth 2.0 scopes
    #[serde(default)]
    pub oauth2: Option<OAuth2>,
}

/// OAuth 2.0 configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuth2 {
    /// Scopes
    #[serde(default, deserialize_with = "null_as_empty")]
    pub scopes: BTreeMap<String, Scope>,
}

/// OAuth scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    /// Scope description
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameter definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter type (string, integer, boolean, etc.)
    #[serde(rename = "type")]
    #[serde(default)]
    pub param_type: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Default value, as written in the document (usually a string)
    #[serde(default)]
    pub default: Option<Value>,

    /// Required flag
    #[serde(default)]
    pub required: bool,

    /// Location (query, path)
    #[serde(default)]
    pub location: Option<String>,

    /// Enum values
    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<String>,

    /// Whether the parameter may be given more than once
    #[serde(default)]
    pub repeated: bool,

    /// Regular expression the value must match
    #[serde(default)]
    pub pattern: Option<String>,

    /// Format (e.g., "int64", "google-fieldmask")
    #[serde(default)]
    pub format: Option<String>,
}

impl Parameter {
    pub fn is_path(&self) -> bool {
        self.location.as_deref() == Some("path")
    }
}

/// Schema (data type) definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema ID
    #[serde(default)]
    pub id: Option<String>,

    /// Type (string, object, array, etc.)
    #[serde(rename = "type")]
    #[serde(default)]
    pub schema_type: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Properties (for object type)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: BTreeMap<String, Schema>,

    /// Additional properties
    #[serde(rename = "additionalProperties")]
    #[serde(default)]
    pub additional_properties: Option<Box<Schema>>,

    /// Items (for array type)
    #[serde(default)]
    pub items: Option<Box<Schema>>,

    /// Reference to another schema
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_schema: Option<String>,

    /// Format (e.g., "int32", "date-time")
    #[serde(default)]
    pub format: Option<String>,

    /// Enum values
    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<Value>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub required: Required,
}

/// `required` of a schema
///
/// Draft 3 marks a single property with `true`; later drafts list the
/// required property names on the enclosing object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    Flag(bool),
    Properties(Vec<String>),
}

impl Default for Required {
    fn default() -> Self {
        Required::Properties(Vec::new())
    }
}

impl Required {
    /// Whether this schema itself is marked required (Draft 3)
    pub fn is_set(&self) -> bool {
        matches!(self, Required::Flag(true))
    }

    /// Names of the required properties (empty for the Draft 3 form)
    pub fn properties(&self) -> &[String] {
        match self {
            Required::Flag(_) => &[],
            Required::Properties(names) => names,
        }
    }
}

/// Resource (collection of methods)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Methods for this resource, kept raw until an endpoint is built
    #[serde(default, deserialize_with = "null_as_empty")]
    pub methods: BTreeMap<String, Value>,

    /// Nested resources, kept raw until an endpoint is built
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resources: BTreeMap<String, Value>,
}

/// Method (API operation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Method ID (e.g., "storage.buckets.insert")
    #[serde(default)]
    pub id: Option<String>,

    /// HTTP path, relative to the service path
    pub path: String,

    /// HTTP method (GET, POST, PUT, DELETE, PATCH)
    #[serde(rename = "httpMethod")]
    pub http_method: String,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Parameters
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: BTreeMap<String, Parameter>,

    /// Required parameters, in call order
    #[serde(rename = "parameterOrder")]
    #[serde(default)]
    pub parameter_order: Vec<String>,

    /// Request body schema
    #[serde(default)]
    pub request: Option<SchemaRef>,

    /// Response schema
    #[serde(default)]
    pub response: Option<SchemaRef>,

    /// Scopes required
    #[serde(default)]
    pub scopes: Vec<String>,

    #[serde(rename = "supportsMediaUpload")]
    #[serde(default)]
    pub supports_media_upload: bool,

    /// Media upload configuration
    #[serde(rename = "mediaUpload")]
    #[serde(default)]
    pub media_upload: Option<MediaUpload>,

    /// Per-method API version override
    #[serde(rename = "apiVersion")]
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Reference to a named schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "$ref")]
    pub ref_schema: String,

    /// Name under which the request body is passed (legacy documents)
    #[serde(rename = "parameterName")]
    #[serde(default)]
    pub parameter_name: Option<String>,
}

/// Media upload configuration of a method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaUpload {
    /// Accepted MIME ranges
    #[serde(default)]
    pub accept: Vec<String>,

    /// Maximum upload size (e.g., "5TB")
    #[serde(rename = "maxSize")]
    #[serde(default)]
    pub max_size: Option<String>,

    #[serde(default)]
    pub protocols: Option<MediaUploadProtocols>,
}

/// Upload protocols supported by a method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaUploadProtocols {
    #[serde(default)]
    pub simple: Option<MediaUploadProtocol>,

    #[serde(default)]
    pub resumable: Option<MediaUploadProtocol>,
}

/// One upload protocol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaUploadProtocol {
    #[serde(default)]
    pub multipart: bool,

    /// Upload path, relative to the root URL
    #[serde(default)]
    pub path: String,
}

impl DiscoveryDoc {
    /// Get a schema by reference
    /// e.g., "Bucket" -> returns Bucket schema
    ///
    /// `Ok(None)` when no schema has that name; an error when it does not
    /// decode.
    pub fn resolve_schema_ref(&self, ref_name: &str) -> Result<Option<Schema>> {
        self.schemas
            .get(ref_name)
            .map(|raw| {
                Schema::deserialize(raw).map_err(|e| {
                    DiscoveryError::Parse(format!("Invalid schema '{}': {}", ref_name, e))
                })
            })
            .transpose()
    }

    /// Number of resources in the tree, nested ones included
    pub fn resource_count(&self) -> usize {
        self.resources.values().map(|r| count_tree(r).0).sum()
    }

    /// Number of method entries in the tree, root methods included
    pub fn method_count(&self) -> usize {
        self.methods.len() + self.resources.values().map(|r| count_tree(r).1).sum::<usize>()
    }
}

/// (resources, methods) under a raw resource, itself included
fn count_tree(resource: &Value) -> (usize, usize) {
    let methods = entries(resource, "methods").count();
    entries(resource, "resources")
        .map(count_tree)
        .fold((1, methods), |(r, m), (cr, cm)| (r + cr, m + cm))
}

fn entries<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|map| map.values())
}

impl Resource {
    /// Decode a raw resource entry
    ///
    /// Missing or null `methods`/`resources` mean an empty collection; a
    /// resource that is not an object fails.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DiscoveryError::Parse(format!(
                "Resource '{}' has no definition (found {})",
                name,
                json_kind(value)
            )));
        }

        Resource::deserialize(value)
            .map_err(|e| DiscoveryError::Parse(format!("Invalid resource '{}': {}", name, e)))
    }
}

impl Method {
    /// Decode a raw method entry
    ///
    /// Fails when the entry is not an object or lacks `path`/`httpMethod`.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DiscoveryError::Parse(format!(
                "Method '{}' has no definition (found {})",
                name,
                json_kind(value)
            )));
        }

        Method::deserialize(value)
            .map_err(|e| DiscoveryError::Parse(format!("Invalid method '{}': {}", name, e)))
    }

    /// Names of the parameters substituted into the URL path
    pub fn path_params(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|(_, p)| p.is_path())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Path of the simple media upload protocol, if any
    pub fn simple_upload_path(&self) -> Option<&str> {
        self.media_upload
            .as_ref()
            .and_then(|m| m.protocols.as_ref())
            .and_then(|p| p.simple.as_ref())
            .map(|s| s.path.as_str())
            .filter(|p| !p.is_empty())
    }
}

/// Treat an explicit `null` collection like a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_from_value() {
        let value = json!({
            "id": "storage.buckets.get",
            "path": "b/{bucket}",
            "httpMethod": "GET",
            "parameters": {
                "bucket": {"type": "string", "required": true, "location": "path"},
                "projection": {"type": "string", "location": "query"}
            },
            "parameterOrder": ["bucket"]
        });

        let method = Method::from_value("get", &value).unwrap();
        assert_eq!(method.id.as_deref(), Some("storage.buckets.get"));
        assert_eq!(method.http_method, "GET");
        assert_eq!(method.parameter_order, vec!["bucket".to_string()]);
        assert_eq!(method.path_params(), vec!["bucket".to_string()]);
    }

    #[test]
    fn test_method_without_body() {
        let err = Method::from_value("ping", &Value::Null).unwrap_err();
        assert!(err.to_string().contains("ping"));
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_method_missing_http_method() {
        let err = Method::from_value("ping", &json!({"path": "ping"})).unwrap_err();
        assert!(matches!(err, DiscoveryError::Parse(_)));
        assert!(err.to_string().contains("httpMethod"));
    }

    #[test]
    fn test_simple_upload_path() {
        let method = Method::from_value(
            "insert",
            &json!({
                "path": "b/{bucket}/o",
                "httpMethod": "POST",
                "supportsMediaUpload": true,
                "mediaUpload": {
                    "accept": ["*/*"],
                    "protocols": {
                        "simple": {"multipart": true, "path": "/upload/storage/v1/b/{bucket}/o"}
                    }
                }
            }),
        )
        .unwrap();

        assert!(method.supports_media_upload);
        assert_eq!(
            method.simple_upload_path(),
            Some("/upload/storage/v1/b/{bucket}/o")
        );
    }

    #[test]
    fn test_counts() {
        let doc: DiscoveryDoc = serde_json::from_value(json!({
            "name": "x",
            "version": "v1",
            "methods": {"root": {"path": "r", "httpMethod": "GET"}},
            "resources": {
                "a": {
                    "methods": {"list": {"path": "a", "httpMethod": "GET"}},
                    "resources": {
                        "b": {"methods": {"get": {"path": "a/b", "httpMethod": "GET"}}}
                    }
                },
                "c": {}
            }
        }))
        .unwrap();

        assert_eq!(doc.resource_count(), 3);
        assert_eq!(doc.method_count(), 3);
    }

    #[test]
    fn test_counts_tolerate_odd_resources() {
        let doc: DiscoveryDoc = serde_json::from_value(json!({
            "name": "x",
            "version": "v1",
            "methods": null,
            "resources": {
                "gone": null,
                "empty": {"methods": null, "resources": null}
            }
        }))
        .unwrap();

        assert_eq!(doc.resource_count(), 2);
        assert_eq!(doc.method_count(), 0);
    }

    #[test]
    fn test_resource_from_value() {
        let resource = Resource::from_value(
            "things",
            &json!({"methods": null, "resources": {"inner": {}}}),
        )
        .unwrap();
        assert!(resource.methods.is_empty());
        assert_eq!(resource.resources.len(), 1);

        let err = Resource::from_value("things", &Value::Null).unwrap_err();
        assert!(matches!(err, DiscoveryError::Parse(_)));
        assert!(err.to_string().contains("things"));

        let err = Resource::from_value("things", &json!({"methods": "list"})).unwrap_err();
        assert!(err.to_string().contains("Invalid resource 'things'"));
    }

    #[test]
    fn test_lenient_schema_and_parameter() {
        let doc: DiscoveryDoc = serde_json::from_value(json!({
            "name": "x",
            "version": "v1",
            "parameters": {
                "maxResults": {"type": "integer", "default": 5, "location": "query"}
            },
            "schemas": {
                "Item": {
                    "id": "Item",
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "required": true}
                    }
                },
                "Broken": "not a schema"
            }
        }))
        .unwrap();

        assert_eq!(doc.parameters["maxResults"].default, Some(json!(5)));

        let item = doc.resolve_schema_ref("Item").unwrap().expect("Item schema");
        assert!(item.properties["name"].required.is_set());
        assert!(item.required.properties().is_empty());

        assert!(doc.resolve_schema_ref("Missing").unwrap().is_none());
        let err = doc.resolve_schema_ref("Broken").unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }
}
