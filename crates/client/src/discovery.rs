//! Discovery orchestrator

use crate::files::FsReader;
use crate::http::{HttpRequestExecutor, ReqwestTransporter};
use crate::index::ApiIndex;
use crate::resolver::{DiscoveryResolver, DiscoverySource};
use discovery_runtime_common::{
    DiscoveryError, DiscoveryOptions, DynExecutor, DynFileReader, DynTransporter, Result,
    TransportRequest,
};
use discovery_runtime_endpoint::{EndpointBuilder, EndpointCreator};
use discovery_runtime_parser::DirectoryList;
use futures::future::try_join_all;
use std::fmt;
use std::sync::Arc;

/// Public discovery list of Google APIs
pub const DEFAULT_DISCOVERY_URL: &str = "https://www.googleapis.com/discovery/v1/apis";

/// Resolves discovery documents and turns them into endpoints
///
/// Each instance carries its own options and collaborators; nothing is
/// cached between calls.
pub struct Discovery {
    options: DiscoveryOptions,
    transporter: DynTransporter,
    resolver: DiscoveryResolver,
    builder: EndpointBuilder,
}

impl Discovery {
    /// Orchestrator backed by reqwest and the local file system
    pub fn new(options: DiscoveryOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DiscoveryError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::from_parts(
            options,
            Arc::new(ReqwestTransporter::with_client(client.clone())),
            Arc::new(HttpRequestExecutor::with_client(client)),
            Arc::new(FsReader),
        ))
    }

    /// Orchestrator with caller-provided collaborators
    pub fn from_parts(
        options: DiscoveryOptions,
        transporter: DynTransporter,
        executor: DynExecutor,
        files: DynFileReader,
    ) -> Self {
        let resolver = DiscoveryResolver::new(
            options,
            Arc::clone(&transporter),
            Arc::clone(&executor),
            files,
        );

        Self {
            options,
            transporter,
            resolver,
            builder: EndpointBuilder::new(executor),
        }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Resolve one discovery document into an endpoint factory
    pub async fn discover_api(&self, source: impl Into<DiscoverySource>) -> Result<EndpointCreator> {
        let doc = self.resolver.resolve(&source.into()).await?;
        Ok(self.builder.build(doc))
    }

    /// Resolve every API of a discovery list
    ///
    /// Documents are resolved concurrently. The first failure fails the
    /// whole call; no partial index is ever returned.
    pub async fn discover_all_apis(&self, discovery_url: &str) -> Result<ApiIndex> {
        let mut request = TransportRequest::new(discovery_url);
        if !self.options.include_private {
            request = request.with_header("X-User-Ip", "0.0.0.0");
        }

        if self.options.debug {
            tracing::info!("requesting {}", discovery_url);
        }
        let list = DirectoryList::from_value(self.transporter.request(request).await?)?;

        let resolved = try_join_all(list.items.into_iter().map(|api| async move {
            let source = DiscoverySource::from(api.discovery_rest_url.as_str());
            let creator = self.discover_api(source).await?;
            Ok::<_, DiscoveryError>((api, creator))
        }))
        .await?;

        if self.options.debug {
            tracing::info!("resolved {} API version(s)", resolved.len());
        }

        Ok(ApiIndex::from_resolved(resolved))
    }
}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery")
            .field("options", &self.options)
            .finish()
    }
}
