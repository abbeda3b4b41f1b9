//! Default HTTP collaborators backed by reqwest

use async_trait::async_trait;
use discovery_runtime_common::{
    ApiRequest, DiscoveryError, GlobalOptions, RequestExecutor, Result, TransportRequest,
    Transporter,
};
use serde_json::Value;

/// Fetches discovery documents with a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransporter {
    client: reqwest::Client,
}

impl ReqwestTransporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transporter for ReqwestTransporter {
    async fn request(&self, request: TransportRequest) -> Result<Value> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(transport_error)?;
        decode_response(response).await
    }
}

/// Executes method invocations as plain JSON-over-HTTP calls
///
/// Path parameters are expanded into the URL template, a `requestBody` (or
/// legacy `resource`) parameter is sent as the JSON body and every other
/// parameter becomes a query parameter. Defaults from the endpoint options
/// (`_options.params`) apply under the call's own parameters.
#[derive(Debug, Clone, Default)]
pub struct HttpRequestExecutor {
    client: reqwest::Client,
}

impl HttpRequestExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestExecutor for HttpRequestExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let mut params = merged_params(&request);
        check_required(&request.required_params, &params)?;

        let body = params
            .remove("requestBody")
            .or_else(|| params.remove("resource"));
        let url = expand_path(&request.options.url, &request.path_params, &mut params);

        let method = reqwest::Method::from_bytes(request.options.method.to_uppercase().as_bytes())
            .map_err(|_| {
                DiscoveryError::Argument(format!(
                    "Unsupported HTTP method: {}",
                    request.options.method
                ))
            })?;

        let mut builder = self
            .client
            .request(method, &url)
            .query(&query_pairs(&params));
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        decode_response(response).await
    }
}

fn transport_error(err: reqwest::Error) -> DiscoveryError {
    DiscoveryError::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

async fn decode_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(DiscoveryError::Transport {
            status: Some(status.as_u16()),
            message: format!("{} returned {}: {}", url, status, snippet(&body)),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| {
        DiscoveryError::Parse(format!("Response from {} is not valid JSON: {}", url, e))
    })
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

fn merged_params(request: &ApiRequest) -> GlobalOptions {
    let mut params = match request.context["_options"].get("params") {
        Some(Value::Object(defaults)) => defaults.clone(),
        _ => GlobalOptions::new(),
    };
    params.extend(request.params.clone());
    params
}

fn check_required(required: &[String], params: &GlobalOptions) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|name| params.get(name.as_str()).map_or(true, Value::is_null))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DiscoveryError::Argument(format!(
            "Missing required parameters: {}",
            missing.join(", ")
        )))
    }
}

/// Substitute `{name}` (percent-encoded) and `{+name}` (verbatim) templates,
/// consuming the substituted parameters
fn expand_path(template: &str, path_params: &[String], params: &mut GlobalOptions) -> String {
    let mut url = template.to_string();
    for name in path_params {
        let Some(value) = params.remove(name) else {
            continue;
        };
        let text = param_text(&value);
        url = url.replace(&format!("{{+{}}}", name), &text);
        url = url.replace(&format!("{{{}}}", name), &urlencoding::encode(&text));
    }
    url
}

fn query_pairs(params: &GlobalOptions) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in params {
        match value {
            Value::Null => {}
            Value::Array(values) => {
                pairs.extend(values.iter().map(|v| (name.clone(), param_text(v))));
            }
            other => pairs.push((name.clone(), param_text(other))),
        }
    }
    pairs
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
