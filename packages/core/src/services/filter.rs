//! Search/Filter Engine
//!
//! Produces an ancestor-preserving view of a taxonomy: a node survives if its
//! name contains the query (case-insensitive) or if any descendant does.
//! Ancestors of a match are always kept so the path to it stays visible;
//! subtrees without a match are pruned entirely.

use crate::models::{TagId, TagNode, TagTree};

/// Filter `tree` by `query`, returning a new tree
///
/// A blank query returns an unchanged copy. Any other query is matched as
/// given, surrounding whitespace included.
pub fn filter_tree(tree: &TagTree, query: &str) -> TagTree {
    if query.trim().is_empty() {
        return tree.clone();
    }
    let needle = query.to_lowercase();

    TagTree::new(
        tree.roots()
            .iter()
            .filter_map(|root| filter_node(root, &needle))
            .collect(),
    )
}

fn filter_node(node: &TagNode, needle: &str) -> Option<TagNode> {
    let children: Vec<TagNode> = node
        .children
        .iter()
        .filter_map(|child| filter_node(child, needle))
        .collect();

    if name_matches(&node.name, needle) || !children.is_empty() {
        Some(TagNode {
            id: node.id,
            name: node.name.clone(),
            parent_id: node.parent_id,
            tier: node.tier,
            children,
        })
    } else {
        None
    }
}

/// Ids whose own name matches `query`, in preorder
///
/// Useful for highlighting the direct hits inside a filtered tree.
pub fn match_ids(tree: &TagTree, query: &str) -> Vec<TagId> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    tree.iter()
        .filter(|(_, node)| name_matches(&node.name, &needle))
        .map(|(_, node)| node.id)
        .collect()
}

fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}
