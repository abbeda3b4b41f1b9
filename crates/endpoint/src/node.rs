//! Endpoint tree: resource namespaces and method leaves
//!
//! Nothing here exposes a mutator once an [`Endpoint`] has been handed out;
//! the tree is frozen at construction and can be shared freely.

use crate::method::ApiMethod;
use discovery_runtime_common::{DiscoveryError, GlobalOptions, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A node of the endpoint tree
#[derive(Debug, Clone)]
pub enum Node {
    /// Resource: holds nested resources and methods
    Namespace(Namespace),
    /// Invocable leaf
    Method(ApiMethod),
}

impl Node {
    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Node::Namespace(ns) => Some(ns),
            Node::Method(_) => None,
        }
    }

    pub fn as_method(&self) -> Option<&ApiMethod> {
        match self {
            Node::Method(m) => Some(m),
            Node::Namespace(_) => None,
        }
    }
}

/// Resource namespace
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    path: String,
    children: BTreeMap<String, Node>,
}

impl Namespace {
    pub(crate) fn new(path: String) -> Self {
        Self {
            path,
            children: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, name: String, node: Node) {
        self.children.insert(name, node);
    }

    /// Dotted path from the endpoint root; empty for the root itself
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Direct child by name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Direct children, sorted by name
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Direct child resources
    pub fn resources(&self) -> impl Iterator<Item = &Namespace> {
        self.children.values().filter_map(Node::as_namespace)
    }

    /// Direct child methods
    pub fn methods(&self) -> impl Iterator<Item = &ApiMethod> {
        self.children.values().filter_map(Node::as_method)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Walk a dotted path (e.g., "projects.zones.instances.list")
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('.');
        let mut node = self.children.get(segments.next()?)?;
        for segment in segments {
            node = node.as_namespace()?.children.get(segment)?;
        }
        Some(node)
    }

    fn collect<'a>(&'a self, namespaces: &mut Vec<&'a Namespace>, methods: &mut Vec<&'a ApiMethod>) {
        for node in self.children.values() {
            match node {
                Node::Namespace(ns) => {
                    namespaces.push(ns);
                    ns.collect(namespaces, methods);
                }
                Node::Method(m) => methods.push(m),
            }
        }
    }
}

/// The materialized, callable tree for one API version
#[derive(Debug, Clone)]
pub struct Endpoint {
    name: String,
    version: String,
    options: Arc<GlobalOptions>,
    root: Namespace,
}

impl Endpoint {
    pub(crate) fn new(
        name: String,
        version: String,
        options: Arc<GlobalOptions>,
        root: Namespace,
    ) -> Self {
        Self {
            name,
            version,
            options,
            root,
        }
    }

    /// API name (e.g., "storage")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// API version (e.g., "v1")
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Caller options this endpoint was built with
    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    /// Root namespace: root methods and top-level resources
    pub fn root(&self) -> &Namespace {
        &self.root
    }

    /// Node at a dotted path
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.root.lookup(path)
    }

    /// Resource namespace at a dotted path
    pub fn resource(&self, path: &str) -> Option<&Namespace> {
        self.get(path).and_then(Node::as_namespace)
    }

    /// Method at a dotted path
    pub fn method(&self, path: &str) -> Option<&ApiMethod> {
        self.get(path).and_then(Node::as_method)
    }

    /// Every resource namespace, depth first
    pub fn namespaces(&self) -> Vec<&Namespace> {
        let mut namespaces = Vec::new();
        let mut methods = Vec::new();
        self.root.collect(&mut namespaces, &mut methods);
        namespaces
    }

    /// Every invocable method, depth first
    pub fn methods(&self) -> Vec<&ApiMethod> {
        let mut namespaces = Vec::new();
        let mut methods = Vec::new();
        self.root.collect(&mut namespaces, &mut methods);
        methods
    }

    /// Invoke the method at a dotted path
    pub async fn call(&self, path: &str, params: GlobalOptions) -> Result<Value> {
        let method = self.method(path).ok_or_else(|| {
            DiscoveryError::Argument(format!(
                "{} {} has no method '{}'",
                self.name, self.version, path
            ))
        })?;
        method.invoke(params).await
    }
}
