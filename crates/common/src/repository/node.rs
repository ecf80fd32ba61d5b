use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::User;

/**
 * Nodes
 * =====
 * A node is the raw repository representation of anything that lives at a
 *  path: the workspace root, folders, text and binary content, and
 *  categories.
 * Locale-bearing kinds keep one `Variant` per locale. Each variant carries
 *  a typed property map, its own comment list and category references, so
 *  `(path, locale)` is the identity of a versionable entity.
 * Folders and the root have no variants; comments made on a folder are kept
 *  on the node itself.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Folder,
    Text,
    Binary,
    Category,
}

impl NodeKind {
    /// Whether nodes of this kind are keyed by locale.
    pub fn is_localized(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Binary | NodeKind::Category)
    }

    /// Whether nodes of this kind may hold children.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Folder | NodeKind::Category)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Root => "root",
            NodeKind::Folder => "folder",
            NodeKind::Text => "text",
            NodeKind::Binary => "binary",
            NodeKind::Category => "category",
        };
        write!(f, "{}", name)
    }
}

/// A single typed property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Long(u64),
    Binary(Vec<u8>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<u64> {
        match self {
            PropertyValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Binary(v) => Some(v),
            _ => None,
        }
    }
}

pub type Properties = BTreeMap<String, PropertyValue>;

/// Property names used by the content commands.
pub mod props {
    pub const HTML: &str = "html";
    pub const ENCODING: &str = "encoding";
    pub const CONTENT_TYPE: &str = "contentType";
    pub const FILE_NAME: &str = "fileName";
    pub const SIZE: &str = "size";
    pub const DATA: &str = "data";
    pub const DESCRIPTION: &str = "description";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    pub author: User,
    pub created: DateTime<Utc>,
    pub text: String,
}

impl RawComment {
    pub fn new(author: User, text: impl Into<String>) -> Self {
        Self {
            author,
            created: Utc::now(),
            text: text.into(),
        }
    }
}

/// One locale of a localized node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub comments: Vec<RawComment>,
    /// Absolute paths of referenced category nodes.
    #[serde(default)]
    pub categories: Vec<String>,
    pub version: u64,
    pub created: DateTime<Utc>,
    pub created_by: String,
    pub modified: DateTime<Utc>,
    pub modified_by: String,
}

impl Variant {
    /// A first version authored by `author` now.
    pub fn new(author: &str, properties: Properties) -> Self {
        let now = Utc::now();
        Self {
            properties,
            comments: Vec::new(),
            categories: Vec::new(),
            version: 1,
            created: now,
            created_by: author.to_string(),
            modified: now,
            modified_by: author.to_string(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub uuid: Uuid,
    pub path: String,
    pub kind: NodeKind,
    pub created: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub variants: BTreeMap<String, Variant>,
    #[serde(default)]
    pub comments: Vec<RawComment>,
}

impl Node {
    pub fn new(path: impl Into<String>, kind: NodeKind, author: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            path: path.into(),
            kind,
            created: Utc::now(),
            created_by: author.to_string(),
            variants: BTreeMap::new(),
            comments: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        crate::path::name(&self.path)
    }

    pub fn variant(&self, locale: &str) -> Option<&Variant> {
        self.variants.get(locale)
    }

    pub fn variant_mut(&mut self, locale: &str) -> Option<&mut Variant> {
        self.variants.get_mut(locale)
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.variants.contains_key(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_starts_at_version_one() {
        let variant = Variant::new("admin", Properties::new());
        assert_eq!(variant.version, 1);
        assert_eq!(variant.created, variant.modified);
        assert!(variant.comments.is_empty());
    }

    #[test]
    fn test_node_deserializes_without_optional_lists() {
        let json = r#"{
            "uuid": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "path": "/news",
            "kind": "folder",
            "created": "2024-01-01T00:00:00Z",
            "created_by": "admin"
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.id(), "news");
        assert!(node.variants.is_empty());
        assert!(node.comments.is_empty());
    }

    #[test]
    fn test_property_value_roundtrip_tags() {
        let value = PropertyValue::Long(42);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"type":"long","value":42}"#);
    }
}
