//! Endpoint construction from a discovery document

use crate::method::ApiMethod;
use crate::node::{Endpoint, Namespace, Node};
use discovery_runtime_common::{DiscoveryError, DynExecutor, GlobalOptions, Result};
use discovery_runtime_parser::{DiscoveryDoc, Method, Resource};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Turns discovery documents into [`EndpointCreator`]s
///
/// Every method of every endpoint built here is bound to the same executor.
#[derive(Clone)]
pub struct EndpointBuilder {
    executor: DynExecutor,
}

impl EndpointBuilder {
    pub fn new(executor: DynExecutor) -> Self {
        Self { executor }
    }

    /// Capture a document; no method is decoded until `create` is called
    pub fn build(&self, schema: DiscoveryDoc) -> EndpointCreator {
        EndpointCreator {
            schema: Arc::new(schema),
            executor: Arc::clone(&self.executor),
        }
    }
}

/// Reusable factory for endpoints of one API version
///
/// Cheap to clone. Each [`create`](EndpointCreator::create) call builds an
/// independent endpoint.
#[derive(Clone)]
pub struct EndpointCreator {
    schema: Arc<DiscoveryDoc>,
    executor: DynExecutor,
}

impl EndpointCreator {
    /// Document this creator was built from
    pub fn schema(&self) -> &DiscoveryDoc {
        &self.schema
    }

    /// Build one endpoint with the given caller options
    pub fn create(&self, options: GlobalOptions) -> Result<Endpoint> {
        let options = Arc::new(options);
        let context = BuildContext {
            root: &self.schema,
            options: &options,
            executor: &self.executor,
        };

        let mut root = Namespace::new(String::new());
        context
            .apply(&mut root, &self.schema.methods, &self.schema.resources)
            .map_err(|e| DiscoveryError::EndpointBuild {
                api: self.schema.name.clone(),
                version: self.schema.version.clone(),
                source: Box::new(e),
            })?;

        Ok(Endpoint::new(
            self.schema.name.clone(),
            self.schema.version.clone(),
            options,
            root,
        ))
    }
}

impl fmt::Debug for EndpointCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointCreator")
            .field("name", &self.schema.name)
            .field("version", &self.schema.version)
            .finish()
    }
}

struct BuildContext<'a> {
    root: &'a Arc<DiscoveryDoc>,
    options: &'a Arc<GlobalOptions>,
    executor: &'a DynExecutor,
}

impl BuildContext<'_> {
    /// Attach methods, then resources; a resource replaces a same-named method
    fn apply(
        &self,
        target: &mut Namespace,
        methods: &BTreeMap<String, Value>,
        resources: &BTreeMap<String, Value>,
    ) -> Result<()> {
        for (name, raw) in methods {
            let path = child_path(target.path(), name);
            let schema = Method::from_value(&path, raw)?;
            let method = ApiMethod::new(self.root, name, path, schema, self.options, self.executor);
            target.insert(name.clone(), Node::Method(method));
        }

        for (name, raw) in resources {
            let mut namespace = Namespace::new(child_path(target.path(), name));
            let resource = Resource::from_value(namespace.path(), raw)?;
            self.apply(&mut namespace, &resource.methods, &resource.resources)?;
            target.insert(name.clone(), Node::Namespace(namespace));
        }

        Ok(())
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}
