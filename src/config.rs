#![allow(clippy::self_named_module_files)]

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

pub mod reader;
pub mod writer;

/// A cluster-access credential store: named clusters, users and contexts tied together by name.
///
/// Entry order is significant and preserved across decode, merge and encode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Configuration {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(rename = "current-context")]
    pub current_context: String,
    pub clusters: Vec<ClusterEntry>,
    pub contexts: Vec<ContextEntry>,
    pub users: Vec<UserEntry>,
    // Catch-all for top-level fields such as `preferences`
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusterEntry {
    pub name: String,
    pub cluster: Cluster,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cluster {
    /// Base64-encoded authority certificate material, kept opaque
    #[serde(rename = "certificate-authority-data")]
    pub certificate_authority_data: String,
    pub server: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserEntry {
    pub name: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct User {
    #[serde(rename = "client-certificate-data")]
    pub client_certificate_data: String,
    #[serde(rename = "client-key-data")]
    pub client_key_data: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContextEntry {
    pub name: String,
    pub context: Context,
}

/// Binds a cluster to a user by name.
///
/// The names are weak references: nothing here guarantees that they resolve within the
/// owning [`Configuration`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Context {
    pub cluster: String,
    pub user: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Entries addressable by a unique name within their collection
pub trait NamedEntry {
    fn name(&self) -> &str;

    /// Build an entry carrying `name` and an empty payload
    fn with_name(name: &str) -> Self;
}

impl NamedEntry for ClusterEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn with_name(name: &str) -> Self {
        Self { name: name.to_string(), cluster: Cluster::default() }
    }
}

impl NamedEntry for UserEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn with_name(name: &str) -> Self {
        Self { name: name.to_string(), user: User::default() }
    }
}

impl NamedEntry for ContextEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn with_name(name: &str) -> Self {
        Self { name: name.to_string(), context: Context::default() }
    }
}

fn lookup<'a, E: NamedEntry>(entries: &'a [E], name: &str) -> Option<&'a E> {
    entries.iter().find(|entry| entry.name() == name)
}

impl Configuration {
    /// Configuration used when no destination file exists yet
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup_cluster(&self, name: &str) -> Option<&ClusterEntry> {
        lookup(&self.clusters, name)
    }

    pub fn lookup_user(&self, name: &str) -> Option<&UserEntry> {
        lookup(&self.users, name)
    }

    pub fn lookup_context(&self, name: &str) -> Option<&ContextEntry> {
        lookup(&self.contexts, name)
    }

    /// Contexts whose cluster or user reference does not resolve in this configuration
    pub fn dangling_contexts(&self) -> Vec<&ContextEntry> {
        self.contexts
            .iter()
            .filter(|entry| {
                self.lookup_cluster(&entry.context.cluster).is_none()
                    || self.lookup_user(&entry.context.user).is_none()
            })
            .collect()
    }
}
