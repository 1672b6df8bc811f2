use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A full vault export: the item sequence the pipeline works on plus
/// every other top-level field, carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultExport {
    #[serde(default)]
    pub items: Vec<VaultItem>,

    /// Top-level fields the pipeline never inspects (folders,
    /// collections, encryption flags, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One stored vault item.
///
/// Only `name` and `login` are ever inspected; every other field rides
/// along in `extra` with its value preserved exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultItem {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<Login>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The login sub-record of an item.
///
/// An item lacking any of username, password, or uris is never
/// normalized or deduplicated; it passes through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Login {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub uris: Option<Vec<UriEntry>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single stored URI. The string itself is nullable in real exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UriEntry {
    #[serde(default)]
    pub uri: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UriEntry {
    /// Creates a freshly normalized `{uri: ...}` entry
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            extra: Map::new(),
        }
    }
}

/// Snapshot of a deleted item plus the reason it was removed.
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedItem {
    #[serde(flatten)]
    pub item: VaultItem,

    #[serde(rename = "reasonForDeletion")]
    pub reason: String,
}
