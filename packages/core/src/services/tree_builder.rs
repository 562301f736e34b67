//! Tree Builder & Tier Classifier
//!
//! Converts tag store records into a tier-annotated [`TagTree`].
//!
//! Input may be nested (children inside their parent), flat (`parent_id`
//! links only), or a mix of both. Construction follows an adjacency list
//! strategy:
//!
//! 1. Flatten the input into entries in encounter order. A record found inside
//!    another record's `children` belongs to that record; a top-level record
//!    uses its own `parent_id`.
//! 2. Build a `parent_id → [child]` adjacency list preserving sibling order.
//! 3. Walk depth-first from the roots, assigning each node's tier from its depth.
//!
//! Malformed input never fails the build: unknown parents are promoted to
//! roots, duplicate ids keep their first occurrence, and records only reachable
//! through a parent cycle are dropped. Each case is logged.

use crate::models::{TagId, TagNode, TagRecord, TagTree, Tier};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

struct Entry {
    id: TagId,
    name: String,
    parent_id: Option<TagId>,
}

/// Build a tier-annotated tree from store records
pub fn build_tree(records: Vec<TagRecord>) -> TagTree {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    flatten_records(records, None, &mut entries, &mut seen);

    let known: HashSet<TagId> = entries.iter().map(|e| e.id).collect();

    // Adjacency list: parent id → child entry positions, in encounter order
    let mut adjacency: HashMap<TagId, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (position, entry) in entries.iter().enumerate() {
        match entry.parent_id {
            Some(parent_id) if parent_id != entry.id && known.contains(&parent_id) => {
                adjacency.entry(parent_id).or_default().push(position);
            }
            Some(parent_id) => {
                warn!(
                    "Tag {} references missing parent {}; treating it as a root",
                    entry.id, parent_id
                );
                roots.push(position);
            }
            None => roots.push(position),
        }
    }

    let mut visited = HashSet::new();
    let tree_roots: Vec<TagNode> = roots
        .into_iter()
        .filter_map(|position| assemble(position, 0, None, &entries, &adjacency, &mut visited))
        .collect();

    if visited.len() < entries.len() {
        let dropped: Vec<TagId> = entries
            .iter()
            .map(|e| e.id)
            .filter(|id| !visited.contains(id))
            .collect();
        warn!(
            "Dropping {} tag(s) unreachable from any root (parent cycle): {:?}",
            dropped.len(),
            dropped
        );
    }

    debug!(
        "Built taxonomy with {} root(s) and {} tag(s)",
        tree_roots.len(),
        visited.len()
    );
    TagTree::new(tree_roots)
}

fn flatten_records(
    records: Vec<TagRecord>,
    nesting_parent: Option<TagId>,
    entries: &mut Vec<Entry>,
    seen: &mut HashSet<TagId>,
) {
    for record in records {
        let TagRecord {
            id,
            name,
            parent_id,
            children,
        } = record;

        if seen.insert(id) {
            entries.push(Entry {
                id,
                name,
                parent_id: nesting_parent.or(parent_id),
            });
        } else {
            warn!("Duplicate tag id {} ('{}'); keeping first occurrence", id, name);
        }

        flatten_records(children, Some(id), entries, seen);
    }
}

fn assemble(
    position: usize,
    depth: usize,
    parent_id: Option<TagId>,
    entries: &[Entry],
    adjacency: &HashMap<TagId, Vec<usize>>,
    visited: &mut HashSet<TagId>,
) -> Option<TagNode> {
    let entry = &entries[position];
    if !visited.insert(entry.id) {
        return None;
    }

    let children = adjacency
        .get(&entry.id)
        .map(|positions| {
            positions
                .iter()
                .filter_map(|child| {
                    assemble(*child, depth + 1, Some(entry.id), entries, adjacency, visited)
                })
                .collect()
        })
        .unwrap_or_default();

    Some(TagNode {
        id: entry.id,
        name: entry.name.clone(),
        parent_id,
        tier: Tier::from_depth(depth),
        children,
    })
}
