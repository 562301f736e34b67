//! Tag Data Structures
//!
//! This module defines the wire and in-memory shapes of the tag taxonomy:
//!
//! - [`TagRecord`] - a tag as returned by the tag store (nested or flat, no tier)
//! - [`TagNode`] - a built tree node annotated with its [`Tier`]
//! - [`TagTree`] - caller-owned tree value passed into and returned from every operation
//! - [`NewTag`] / [`TagUpdate`] - write payloads sent to the tag store
//!
//! # Examples
//!
//! ```rust
//! use taxonomy_core::models::TagRecord;
//!
//! let records: Vec<TagRecord> = serde_json::from_str(
//!     r#"[{"id": 1, "name": "Finance", "parent_id": null,
//!          "children": [{"id": 2, "name": "Invoices", "parent_id": 1}]}]"#,
//! ).unwrap();
//! assert_eq!(records[0].children[0].name, "Invoices");
//! ```

use super::index::TagIndex;
use super::tier::Tier;
use serde::{Deserialize, Deserializer, Serialize};

/// Tag identity, assigned by the tag store
pub type TagId = i64;

/// A tag as stored and returned by the tag store.
///
/// `children` is lenient: a missing, null, or non-array value is read as no
/// children. The store may send the name as `tag_name`; when both fields are
/// present, `name` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredTag")]
pub struct TagRecord {
    pub id: TagId,
    pub name: String,
    pub parent_id: Option<TagId>,
    pub children: Vec<TagRecord>,
}

/// Wire shape of a stored tag before the name fields are reconciled
#[derive(Deserialize)]
struct StoredTag {
    id: TagId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    parent_id: Option<TagId>,
    #[serde(default, deserialize_with = "lenient_children")]
    children: Vec<TagRecord>,
}

impl TryFrom<StoredTag> for TagRecord {
    type Error = String;

    fn try_from(stored: StoredTag) -> Result<Self, Self::Error> {
        let name = stored
            .name
            .or(stored.tag_name)
            .ok_or_else(|| format!("tag {} has neither name nor tag_name", stored.id))?;
        Ok(Self {
            id: stored.id,
            name,
            parent_id: stored.parent_id,
            children: stored.children,
        })
    }
}

impl TagRecord {
    /// Create a childless record
    pub fn new(id: TagId, name: impl Into<String>, parent_id: Option<TagId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
            children: Vec::new(),
        }
    }

    /// Attach children (builder style)
    pub fn with_children(mut self, children: Vec<TagRecord>) -> Self {
        self.children = children;
        self
    }
}

fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<TagRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| TagRecord::deserialize(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// A node of a built taxonomy tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNode {
    pub id: TagId,
    pub name: String,
    /// Structural parent (always consistent with the tree shape)
    pub parent_id: Option<TagId>,
    /// Derived from depth on every build
    pub tier: Tier,
    pub children: Vec<TagNode>,
}

impl TagNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// A complete, tier-annotated taxonomy.
///
/// The tree is an ordinary value owned by the caller. Nothing in this crate
/// keeps a hidden copy of it between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagTree {
    roots: Vec<TagNode>,
}

impl TagTree {
    pub fn new(roots: Vec<TagNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[TagNode] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<TagNode> {
        self.roots
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.roots.iter().map(|r| 1 + r.descendant_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Preorder walk yielding `(depth, node)`
    pub fn iter(&self) -> TagTreeIter<'_> {
        TagTreeIter {
            stack: self.roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }

    /// Find a node by id
    pub fn find(&self, id: TagId) -> Option<&TagNode> {
        self.iter().map(|(_, node)| node).find(|node| node.id == id)
    }

    /// Build the id-indexed view used for structural decisions
    pub fn index(&self) -> TagIndex {
        TagIndex::from_tree(self)
    }

    /// Names from the root down to `id` (inclusive), or `None` if unknown
    pub fn path_names(&self, id: TagId) -> Option<Vec<String>> {
        fn walk(nodes: &[TagNode], id: TagId, path: &mut Vec<String>) -> bool {
            for node in nodes {
                path.push(node.name.clone());
                if node.id == id || walk(&node.children, id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        walk(&self.roots, id, &mut path).then_some(path)
    }

    /// Flatten back into childless records in preorder
    pub fn flatten(&self) -> Vec<TagRecord> {
        self.iter()
            .map(|(_, node)| TagRecord::new(node.id, node.name.clone(), node.parent_id))
            .collect()
    }
}

/// Preorder iterator over a [`TagTree`]
pub struct TagTreeIter<'a> {
    stack: Vec<(usize, &'a TagNode)>,
}

impl<'a> Iterator for TagTreeIter<'a> {
    type Item = (usize, &'a TagNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

/// Body of a create request
///
/// `parent_path` carries the ancestor names (root first, parent last) for
/// stores that resolve parents by name path rather than id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    pub tag_name: String,

    #[serde(default)]
    pub parent_id: Option<TagId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<Vec<String>>,
}

/// Body of an update request (sparse: only set fields are sent)
///
/// `parent_id: Some(None)` serializes as an explicit `null` and moves the tag
/// to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub parent_id: Option<Option<TagId>>,
}

impl TagUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            tag_name: Some(name.into()),
            parent_id: None,
        }
    }

    pub fn reparent(parent_id: Option<TagId>) -> Self {
        Self {
            tag_name: None,
            parent_id: Some(parent_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tag_name.is_none() && self.parent_id.is_none()
    }
}

// A present field (even `null`) becomes `Some(_)`; absence is handled by `default`.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<TagId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TagId>::deserialize(deserializer).map(Some)
}
