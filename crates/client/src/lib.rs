//! Runtime API discovery
//!
//! [`Discovery`] resolves discovery documents and materializes them into
//! callable [`Endpoint`]s:
//!
//! - [`Discovery::discover_api`] resolves one document (URL, local path or
//!   inline discovery request) into an [`EndpointCreator`].
//! - [`Discovery::discover_all_apis`] fetches the discovery list, resolves
//!   every listed API concurrently and returns an [`ApiIndex`] keyed by API
//!   name, with a [`VersionSelector`] per name.
//!
//! ## Usage
//! ```rust,no_run
//! use discovery_runtime_client::{Discovery, DiscoveryOptions, DEFAULT_DISCOVERY_URL};
//!
//! # async fn run() -> discovery_runtime_client::Result<()> {
//! let discovery = Discovery::new(DiscoveryOptions::default())?;
//! let apis = discovery.discover_all_apis(DEFAULT_DISCOVERY_URL).await?;
//! let drive = apis.select("drive", "v3")?;
//! for method in drive.methods() {
//!     println!("{} {}", method.http_method(), method.path());
//! }
//! # Ok(())
//! # }
//! ```

mod discovery;
mod files;
mod http;
mod index;
mod resolver;

pub use discovery::{Discovery, DEFAULT_DISCOVERY_URL};
pub use files::FsReader;
pub use http::{HttpRequestExecutor, ReqwestTransporter};
pub use index::{ApiIndex, SelectorArg, VersionIndex, VersionSelector};
pub use resolver::{DiscoveryResolver, DiscoverySource};

pub use discovery_runtime_common::{
    DiscoveryError, DiscoveryOptions, GlobalOptions, Result,
};
pub use discovery_runtime_endpoint::{ApiMethod, Endpoint, EndpointCreator, Namespace, Node};
