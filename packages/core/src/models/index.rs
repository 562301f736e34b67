//! Id-indexed view of a taxonomy tree
//!
//! Structural decisions (cycle checks, depth limits, sibling lookups) work on
//! ids through this map, never on node identity inside the nested tree.

use super::tag::{TagId, TagNode, TagTree};
use super::tier::Tier;
use std::collections::{HashMap, HashSet};

/// One entry of a [`TagIndex`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTag {
    pub id: TagId,
    pub name: String,
    pub parent_id: Option<TagId>,
    pub depth: usize,
    pub tier: Tier,
    /// Child ids in tree order
    pub children: Vec<TagId>,
}

/// Map of `id → IndexedTag` plus the ordered root ids
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: HashMap<TagId, IndexedTag>,
    roots: Vec<TagId>,
}

impl TagIndex {
    pub fn from_tree(tree: &TagTree) -> Self {
        let mut index = Self::default();
        for root in tree.roots() {
            index.roots.push(root.id);
            index.insert(root, None, 0);
        }
        index
    }

    fn insert(&mut self, node: &TagNode, parent_id: Option<TagId>, depth: usize) {
        self.tags.insert(
            node.id,
            IndexedTag {
                id: node.id,
                name: node.name.clone(),
                parent_id,
                depth,
                tier: Tier::from_depth(depth),
                children: node.children.iter().map(|c| c.id).collect(),
            },
        );
        for child in &node.children {
            self.insert(child, Some(node.id), depth + 1);
        }
    }

    pub fn get(&self, id: TagId) -> Option<&IndexedTag> {
        self.tags.get(&id)
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.tags.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Child ids of `parent`, or the root ids when `parent` is `None`
    pub fn children_of(&self, parent: Option<TagId>) -> &[TagId] {
        match parent {
            None => &self.roots,
            Some(id) => self
                .tags
                .get(&id)
                .map(|tag| tag.children.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Ids of `id` and everything below it (depth-first). Empty when `id` is unknown.
    pub fn descendant_ids(&self, id: TagId) -> HashSet<TagId> {
        let mut seen = HashSet::new();
        if !self.contains(id) {
            return seen;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(tag) = self.tags.get(&current) {
                stack.extend(tag.children.iter().copied());
            }
        }
        seen
    }

    /// Levels below `id` (0 for a leaf or an unknown id)
    pub fn subtree_height(&self, id: TagId) -> usize {
        let Some(tag) = self.tags.get(&id) else {
            return 0;
        };
        let mut height = 0;
        let mut stack: Vec<(TagId, usize)> = tag.children.iter().map(|c| (*c, 1)).collect();
        while let Some((current, level)) = stack.pop() {
            height = height.max(level);
            if let Some(child) = self.tags.get(&current) {
                stack.extend(child.children.iter().map(|c| (*c, level + 1)));
            }
        }
        height
    }

    /// Ancestor names from the root down to `id` (inclusive)
    pub fn path_names(&self, id: TagId) -> Option<Vec<String>> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cursor) = current {
            let tag = self.tags.get(&cursor)?;
            names.push(tag.name.clone());
            current = tag.parent_id;
        }
        names.reverse();
        Some(names)
    }
}
