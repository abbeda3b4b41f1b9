//! Endpoint materialization for discovery documents
//!
//! This crate turns a parsed [`DiscoveryDoc`](discovery_runtime_parser::DiscoveryDoc)
//! into an [`Endpoint`]: an immutable tree whose inner nodes are resource
//! namespaces and whose leaves are invocable [`ApiMethod`]s.
//!
//! Building is split in two phases:
//! - [`EndpointBuilder::build`] captures the document and returns an
//!   [`EndpointCreator`] without looking at any method.
//! - [`EndpointCreator::create`] walks the tree and produces one endpoint
//!   per call. Structural problems in the document are reported here as
//!   `EndpointBuild` errors carrying the API name and version.

mod builder;
mod method;
mod node;

pub use builder::{EndpointBuilder, EndpointCreator};
pub use method::{build_url, ApiMethod};
pub use node::{Endpoint, Namespace, Node};
