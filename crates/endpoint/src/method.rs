//! Invocable method leaves

use discovery_runtime_common::{
    ApiRequest, DynExecutor, GlobalOptions, RequestOptions, Result,
};
use discovery_runtime_parser::{DiscoveryDoc, Method, Schema, SchemaRef};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// One invocable API method bound to its root document and executor
#[derive(Clone)]
pub struct ApiMethod {
    name: String,
    path: String,
    schema: Method,
    root: Arc<DiscoveryDoc>,
    url: String,
    media_url: Option<String>,
    options: Arc<GlobalOptions>,
    executor: DynExecutor,
}

impl ApiMethod {
    pub(crate) fn new(
        root: &Arc<DiscoveryDoc>,
        name: &str,
        path: String,
        schema: Method,
        options: &Arc<GlobalOptions>,
        executor: &DynExecutor,
    ) -> Self {
        let url = method_url(root, &schema);
        let media_url = schema
            .simple_upload_path()
            .zip(media_root(root))
            .map(|(upload, base)| build_url(&format!("{}{}", base, upload)));

        Self {
            name: name.to_string(),
            path,
            schema,
            root: Arc::clone(root),
            url,
            media_url,
            options: Arc::clone(options),
            executor: Arc::clone(executor),
        }
    }

    /// Method name within its resource (e.g., "insert")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the endpoint root (e.g., "buckets.insert")
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Method ID declared by the document (e.g., "storage.buckets.insert")
    pub fn id(&self) -> Option<&str> {
        self.schema.id.as_deref()
    }

    pub fn http_method(&self) -> &str {
        &self.schema.http_method
    }

    pub fn schema(&self) -> &Method {
        &self.schema
    }

    /// Request URL template, path parameters still unexpanded
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn media_url(&self) -> Option<&str> {
        self.media_url.as_deref()
    }

    pub fn required_params(&self) -> &[String] {
        &self.schema.parameter_order
    }

    pub fn path_params(&self) -> Vec<String> {
        self.schema.path_params()
    }

    /// Request body schema, resolved against the root document
    pub fn request_schema(&self) -> Result<Option<Schema>> {
        self.resolve(self.schema.request.as_ref())
    }

    /// Response schema, resolved against the root document
    pub fn response_schema(&self) -> Result<Option<Schema>> {
        self.resolve(self.schema.response.as_ref())
    }

    fn resolve(&self, reference: Option<&SchemaRef>) -> Result<Option<Schema>> {
        match reference {
            Some(r) => self.root.resolve_schema_ref(&r.ref_schema),
            None => Ok(None),
        }
    }

    /// Build the executor request for this method without sending it
    pub fn request(&self, params: GlobalOptions) -> ApiRequest {
        ApiRequest {
            options: RequestOptions {
                url: self.url.clone(),
                method: self.schema.http_method.clone(),
                api_version: self.schema.api_version.clone(),
            },
            required_params: self.schema.parameter_order.clone(),
            path_params: self.schema.path_params(),
            params,
            context: json!({ "_options": Value::Object((*self.options).clone()) }),
            media_url: self.media_url.clone(),
        }
    }

    /// Invoke the method through the bound executor
    pub async fn invoke(&self, params: GlobalOptions) -> Result<Value> {
        self.executor.execute(self.request(params)).await
    }
}

impl fmt::Debug for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiMethod")
            .field("path", &self.path)
            .field("http_method", &self.schema.http_method)
            .field("url", &self.url)
            .finish()
    }
}

fn method_url(root: &DiscoveryDoc, schema: &Method) -> String {
    let base = if root.root_url.is_empty() {
        root.base_url.clone().unwrap_or_default()
    } else {
        format!("{}{}", root.root_url, root.service_path)
    };
    build_url(&format!("{}{}", base, schema.path))
}

/// Absolute root that upload paths hang off
///
/// Legacy documents only carry `baseUrl`; their uploads live at its origin.
fn media_root(root: &DiscoveryDoc) -> Option<String> {
    if !root.root_url.is_empty() {
        return Some(root.root_url.clone());
    }

    let base = url::Url::parse(root.base_url.as_deref()?).ok()?;
    let origin = base.origin();
    origin
        .is_tuple()
        .then(|| format!("{}/", origin.ascii_serialization()))
}

/// Collapse repeated slashes, except the ones following a scheme colon
///
/// `https://www.googleapis.com//drive/v3//files` becomes
/// `https://www.googleapis.com/drive/v3/files`.
pub fn build_url(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = None;
    let mut before_last = None;

    for c in input.chars() {
        let repeated = c == '/' && last == Some('/') && before_last.is_some_and(|b| b != ':');
        if repeated {
            continue;
        }
        out.push(c);
        before_last = last;
        last = Some(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_keeps_scheme() {
        assert_eq!(
            build_url("https://storage.googleapis.com/storage/v1/b"),
            "https://storage.googleapis.com/storage/v1/b"
        );
    }

    #[test]
    fn test_build_url_collapses_slashes() {
        assert_eq!(
            build_url("https://storage.googleapis.com//upload/storage/v1///b/{bucket}/o"),
            "https://storage.googleapis.com/upload/storage/v1/b/{bucket}/o"
        );
    }

    fn legacy_doc(base_url: Option<&str>) -> DiscoveryDoc {
        DiscoveryDoc {
            name: "storage".to_string(),
            version: "v1".to_string(),
            base_url: base_url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_media_root() {
        let doc = DiscoveryDoc {
            root_url: "https://storage.googleapis.com/".to_string(),
            ..legacy_doc(Some("https://www.googleapis.com/storage/v1/"))
        };
        assert_eq!(
            media_root(&doc).as_deref(),
            Some("https://storage.googleapis.com/")
        );

        assert_eq!(
            media_root(&legacy_doc(Some("https://www.googleapis.com/storage/v1/"))).as_deref(),
            Some("https://www.googleapis.com/")
        );
        assert_eq!(
            media_root(&legacy_doc(Some("http://localhost:8080/api/"))).as_deref(),
            Some("http://localhost:8080/")
        );

        assert!(media_root(&legacy_doc(Some("storage/v1/"))).is_none());
        assert!(media_root(&legacy_doc(None)).is_none());
    }

    #[test]
    fn test_build_url_leading_slashes() {
        assert_eq!(build_url("///x"), "//x");
        assert_eq!(build_url(""), "");
    }
}
