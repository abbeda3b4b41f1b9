//! Discovery document parsing
//!
//! This crate holds the typed representation of a discovery document
//! (API metadata, recursive resource/method tree, parameter and schema
//! definitions) and of the discovery directory list that enumerates every
//! known API.
//!
//! Resources, method bodies and schemas are kept as raw JSON until they are
//! needed, so a document with a broken entry still parses; the failure
//! surfaces when the entry is decoded with [`Resource::from_value`],
//! [`Method::from_value`] or [`DiscoveryDoc::resolve_schema_ref`].

pub mod discovery;

pub use discovery::{
    ApiDescriptor, Auth, DirectoryList, DiscoveryDoc, DiscoveryParser, MediaUpload,
    MediaUploadProtocol, MediaUploadProtocols, Method, OAuth2, Parameter, Required, Resource,
    Schema, SchemaRef, Scope,
};
