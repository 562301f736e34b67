//! In-process tag store
//!
//! Keeps a flat list of records behind an async lock and enforces the same
//! structural rules as the validator, answering with the status codes a real
//! tag service would use:
//!
//! | Rule                                   | Status |
//! |----------------------------------------|--------|
//! | empty name, tertiary parent, too deep  | 422    |
//! | unknown tag or parent                  | 404    |
//! | cyclic reparent, duplicate sibling     | 409    |

use super::{StoreError, TagStore};
use crate::models::{NewTag, TagId, TagIndex, TagNode, TagRecord, TagUpdate};
use crate::services::error::ValidationError;
use crate::services::tree_builder::build_tree;
use crate::services::validator;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Default)]
struct StoreState {
    /// Flat records, insertion order
    tags: Vec<TagRecord>,
    next_id: TagId,
}

impl StoreState {
    fn index(&self) -> TagIndex {
        build_tree(self.tags.clone()).index()
    }

    fn get_mut(&mut self, id: TagId) -> Option<&mut TagRecord> {
        self.tags.iter_mut().find(|tag| tag.id == id)
    }
}

/// [`TagStore`] held entirely in memory
#[derive(Debug)]
pub struct InMemoryTagStore {
    state: RwLock<StoreState>,
}

impl Default for InMemoryTagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTagStore {
    /// Create an empty store; ids start at 1
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                tags: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store holding `records` (nested or flat)
    ///
    /// Records are normalized the same way a fetched taxonomy is, so orphans
    /// become roots and duplicate ids keep their first occurrence.
    pub fn seeded(records: Vec<TagRecord>) -> Self {
        let tags = build_tree(records).flatten();
        let next_id = tags.iter().map(|tag| tag.id).max().unwrap_or(0) + 1;
        Self {
            state: RwLock::new(StoreState { tags, next_id }),
        }
    }

    /// Number of stored tags
    pub async fn len(&self) -> usize {
        self.state.read().await.tags.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.tags.is_empty()
    }
}

/// Map a rule violation to the status a tag service answers with
fn reject(err: ValidationError) -> StoreError {
    let status = match err {
        ValidationError::TagNotFound { .. } | ValidationError::ParentNotFound { .. } => 404,
        ValidationError::CyclicReparent { .. } | ValidationError::DuplicateSibling { .. } => 409,
        ValidationError::EmptyName
        | ValidationError::TertiaryParent { .. }
        | ValidationError::DepthExceeded { .. } => 422,
    };
    StoreError::rejected(status, err.rule(), err.to_string())
}

/// Walk `path` from the roots matching names case-insensitively
fn resolve_path(index: &TagIndex, path: &[String]) -> Option<TagId> {
    let mut parent = None;
    for segment in path {
        let wanted = validator::normalize_name(segment);
        let found = index
            .children_of(parent)
            .iter()
            .copied()
            .find(|id| {
                index
                    .get(*id)
                    .is_some_and(|tag| validator::normalize_name(&tag.name) == wanted)
            })?;
        parent = Some(found);
    }
    parent
}

fn to_records(nodes: &[TagNode]) -> Vec<TagRecord> {
    nodes
        .iter()
        .map(|node| {
            TagRecord::new(node.id, node.name.clone(), node.parent_id)
                .with_children(to_records(&node.children))
        })
        .collect()
}

#[async_trait]
impl TagStore for InMemoryTagStore {
    async fn list_tags(&self) -> Result<Vec<TagRecord>, StoreError> {
        let state = self.state.read().await;
        let tree = build_tree(state.tags.clone());
        Ok(to_records(tree.roots()))
    }

    async fn create_tag(&self, tag: NewTag) -> Result<TagRecord, StoreError> {
        let mut state = self.state.write().await;
        let index = state.index();

        let parent_id = match (tag.parent_id, tag.parent_path.as_deref()) {
            (Some(id), _) => Some(id),
            (None, Some(path)) if !path.is_empty() => {
                let resolved = resolve_path(&index, path).ok_or_else(|| {
                    StoreError::rejected(
                        404,
                        "PARENT_NOT_FOUND",
                        format!("No tag at path '{}'", path.join(" / ")),
                    )
                })?;
                Some(resolved)
            }
            _ => None,
        };

        let name = validator::check_create(&index, &tag.tag_name, parent_id).map_err(reject)?;

        let record = TagRecord::new(state.next_id, name, parent_id);
        state.next_id += 1;
        state.tags.push(record.clone());

        info!("Stored tag {} '{}'", record.id, record.name);
        Ok(record)
    }

    async fn update_tag(&self, id: TagId, update: TagUpdate) -> Result<TagRecord, StoreError> {
        let mut state = self.state.write().await;
        let index = state.index();
        let update = validator::check_update(&index, id, &update).map_err(reject)?;

        // The flat record may hold a stale parent link (e.g. a promoted orphan),
        // so start from the structural parent
        let structural_parent = index.get(id).and_then(|tag| tag.parent_id);
        let record = state
            .get_mut(id)
            .ok_or_else(|| reject(ValidationError::TagNotFound { tag_id: id }))?;
        record.parent_id = structural_parent;

        if let Some(name) = update.tag_name {
            record.name = name;
        }
        if let Some(parent_id) = update.parent_id {
            record.parent_id = parent_id;
        }

        Ok(record.clone())
    }

    async fn delete_tag(&self, id: TagId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let index = state.index();
        validator::check_delete(&index, id).map_err(reject)?;

        let doomed = index.descendant_ids(id);
        state.tags.retain(|tag| !doomed.contains(&tag.id));

        info!("Deleted tag {} and {} descendant(s)", id, doomed.len() - 1);
        Ok(())
    }
}
