//! Taxonomy Service - Validated Mutations with Canonical Refresh
//!
//! This module is the entry point for everything a UI or CLI does with the
//! taxonomy:
//!
//! - `load` - fetch the canonical taxonomy and build the tier-annotated tree
//! - `search` - pure, local filtering of a tree
//! - `create_tag`, `rename_tag`, `move_tag`, `update_tag`, `delete_tag`
//!
//! # Mutation Protocol
//!
//! 1. Validate against the caller's current tree. A violation returns
//!    [`TaxonomyError::Validation`] and the store is never contacted.
//! 2. Send the write to the tag store with only the fields it needs.
//! 3. Re-fetch the whole taxonomy and rebuild the tree from it.
//!
//! The caller's tree is only ever borrowed, so a failed operation leaves it
//! exactly as it was. The tree returned in [`MutationOutcome`] comes from the
//! refresh, never from a local patch, so changes made by other clients show up
//! too.

use crate::models::{NewTag, TagId, TagRecord, TagTree, TagUpdate};
use crate::services::error::{TaxonomyError, ValidationError};
use crate::services::filter::filter_tree;
use crate::services::tree_builder::build_tree;
use crate::services::validator;
use crate::store::{StoreError, TagStore};
use std::sync::Arc;

/// Result of a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Freshly fetched canonical tree
    pub tree: TagTree,
    /// Record returned by the store, when the write returns one
    pub tag: Option<TagRecord>,
}

/// Taxonomy operations over a [`TagStore`]
#[derive(Clone)]
pub struct TaxonomyService {
    store: Arc<dyn TagStore>,
}

impl TaxonomyService {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TagStore> {
        &self.store
    }

    /// Fetch the canonical taxonomy and build the tree
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<TagTree, TaxonomyError> {
        let records = self.store.list_tags().await?;
        let tree = build_tree(records);
        tracing::debug!("Loaded taxonomy with {} tags", tree.len());
        Ok(tree)
    }

    /// Filter `tree` by a case-insensitive name query
    pub fn search(&self, tree: &TagTree, query: &str) -> TagTree {
        filter_tree(tree, query)
    }

    /// Create a tag under `parent_id` (`None` = new root)
    ///
    /// # Examples
    ///
    /// ```
    /// use taxonomy_core::services::TaxonomyService;
    /// use taxonomy_core::store::InMemoryTagStore;
    /// use std::sync::Arc;
    ///
    /// # tokio_test::block_on(async {
    /// let service = TaxonomyService::new(Arc::new(InMemoryTagStore::new()));
    /// let tree = service.load().await.unwrap();
    ///
    /// let outcome = service.create_tag(&tree, "Finance", None).await.unwrap();
    /// assert_eq!(outcome.tree.len(), 1);
    ///
    /// // Blank names never reach the store
    /// assert!(service.create_tag(&outcome.tree, "  ", None).await.is_err());
    /// # });
    /// ```
    #[tracing::instrument(skip(self, tree))]
    pub async fn create_tag(
        &self,
        tree: &TagTree,
        name: &str,
        parent_id: Option<TagId>,
    ) -> Result<MutationOutcome, TaxonomyError> {
        let index = tree.index();
        let tag_name = validator::check_create(&index, name, parent_id)
            .map_err(|e| rejected("create", e))?;

        let body = NewTag {
            tag_name,
            parent_id,
            parent_path: parent_id.and_then(|id| index.path_names(id)),
        };

        let created = self
            .store
            .create_tag(body)
            .await
            .map_err(|e| write_failed("create", e))?;
        tracing::info!("Created tag {} '{}'", created.id, created.name);

        self.refresh(Some(created)).await
    }

    /// Rename a tag
    pub async fn rename_tag(
        &self,
        tree: &TagTree,
        id: TagId,
        name: &str,
    ) -> Result<MutationOutcome, TaxonomyError> {
        self.update_tag(tree, id, TagUpdate::rename(name)).await
    }

    /// Move a tag under `new_parent` (`None` = make it a root)
    pub async fn move_tag(
        &self,
        tree: &TagTree,
        id: TagId,
        new_parent: Option<TagId>,
    ) -> Result<MutationOutcome, TaxonomyError> {
        self.update_tag(tree, id, TagUpdate::reparent(new_parent))
            .await
    }

    /// Apply a sparse update (rename, move, or both)
    ///
    /// An update with no fields set is validated but not sent; the outcome
    /// carries a copy of the input tree.
    #[tracing::instrument(skip(self, tree))]
    pub async fn update_tag(
        &self,
        tree: &TagTree,
        id: TagId,
        update: TagUpdate,
    ) -> Result<MutationOutcome, TaxonomyError> {
        let update = validator::check_update(&tree.index(), id, &update)
            .map_err(|e| rejected("update", e))?;

        if update.is_empty() {
            return Ok(MutationOutcome {
                tree: tree.clone(),
                tag: None,
            });
        }

        let updated = self
            .store
            .update_tag(id, update)
            .await
            .map_err(|e| write_failed("update", e))?;
        tracing::info!("Updated tag {} '{}'", updated.id, updated.name);

        self.refresh(Some(updated)).await
    }

    /// Delete a tag and its subtree
    #[tracing::instrument(skip(self, tree))]
    pub async fn delete_tag(
        &self,
        tree: &TagTree,
        id: TagId,
    ) -> Result<MutationOutcome, TaxonomyError> {
        validator::check_delete(&tree.index(), id).map_err(|e| rejected("delete", e))?;

        self.store
            .delete_tag(id)
            .await
            .map_err(|e| write_failed("delete", e))?;
        tracing::info!("Deleted tag {}", id);

        self.refresh(None).await
    }

    async fn refresh(&self, tag: Option<TagRecord>) -> Result<MutationOutcome, TaxonomyError> {
        let records = self.store.list_tags().await.map_err(|e| {
            tracing::warn!("Refresh after write failed: {}", e);
            TaxonomyError::refresh_failed(e)
        })?;

        Ok(MutationOutcome {
            tree: build_tree(records),
            tag,
        })
    }
}

fn rejected(operation: &str, err: ValidationError) -> TaxonomyError {
    tracing::warn!("Rejected {} ({}): {}", operation, err.rule(), err);
    TaxonomyError::Validation(err)
}

fn write_failed(operation: &str, err: StoreError) -> TaxonomyError {
    tracing::warn!("Tag store {} failed: {}", operation, err);
    TaxonomyError::Store(err)
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "taxonomy_service_test.rs"]
mod taxonomy_service_test;
