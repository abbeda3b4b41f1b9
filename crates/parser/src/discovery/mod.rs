//! Google Discovery Document model
//!
//! ## Discovery Document Format
//!
//! Google-style APIs publish "Discovery Documents" that describe REST APIs.
//! Format is based on JSON Schema Draft 3 with Google-specific extensions.
//!
//! ## Discovery Sources
//!
//! - **List all APIs**: `GET https://www.googleapis.com/discovery/v1/apis`
//! - **Get specific API**: `GET https://{service}.googleapis.com/$discovery/rest?version={version}`
//!
//! ## Usage
//! ```rust,ignore
//! use discovery_runtime_parser::{DiscoveryParser, Resource};
//!
//! let doc = DiscoveryParser::from_json(&content)?.into_doc();
//! for (name, raw) in &doc.resources {
//!     let resource = Resource::from_value(name, raw)?;
//!     println!("{} has {} methods", name, resource.methods.len());
//! }
//! ```

mod directory;
mod parser;
mod types;

pub use directory::{ApiDescriptor, DirectoryList};
pub use parser::DiscoveryParser;
pub use types::*;
