//! Service Layer Error Types
//!
//! This module defines error types for taxonomy operations:
//!
//! - [`ValidationError`] - a mutation broke a structural rule; resolved locally,
//!   no store call is ever made
//! - [`TaxonomyError`] - everything a [`TaxonomyService`](super::TaxonomyService)
//!   call can fail with

use crate::models::TagId;
use crate::store::StoreError;
use thiserror::Error;

/// Structural rule violations detected before any store call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or whitespace only
    #[error("name required")]
    EmptyName,

    /// Target parent is the tag itself or one of its descendants
    #[error("Cannot move tag {tag_id} under itself or its descendant {parent_id}")]
    CyclicReparent { tag_id: TagId, parent_id: TagId },

    /// Tertiary tags cannot have children
    #[error("Tertiary tag {parent_id} cannot have children")]
    TertiaryParent { parent_id: TagId },

    /// Referenced parent does not exist
    #[error("Parent tag {parent_id} does not exist")]
    ParentNotFound { parent_id: TagId },

    /// Referenced tag does not exist
    #[error("Tag {tag_id} does not exist")]
    TagNotFound { tag_id: TagId },

    /// Reparent would push part of the subtree below the tertiary tier
    #[error("Moving tag {tag_id} under tag {parent_id} would nest tags deeper than three tiers")]
    DepthExceeded { tag_id: TagId, parent_id: TagId },

    /// Another child of the same parent already has this name
    #[error("A sibling tag named '{name}' already exists")]
    DuplicateSibling { name: String },
}

impl ValidationError {
    /// Machine-readable rule identifier
    pub fn rule(&self) -> &'static str {
        match self {
            Self::EmptyName => "EMPTY_NAME",
            Self::CyclicReparent { .. } => "CYCLIC_REPARENT",
            Self::TertiaryParent { .. } => "TERTIARY_PARENT",
            Self::ParentNotFound { .. } => "PARENT_NOT_FOUND",
            Self::TagNotFound { .. } => "TAG_NOT_FOUND",
            Self::DepthExceeded { .. } => "DEPTH_EXCEEDED",
            Self::DuplicateSibling { .. } => "DUPLICATE_SIBLING",
        }
    }

    /// Create a cyclic reparent error
    pub fn cyclic_reparent(tag_id: TagId, parent_id: TagId) -> Self {
        Self::CyclicReparent { tag_id, parent_id }
    }

    /// Create a duplicate sibling error
    pub fn duplicate_sibling(name: impl Into<String>) -> Self {
        Self::DuplicateSibling { name: name.into() }
    }
}

/// Taxonomy operation errors
///
/// A failed operation never alters the caller's tree.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// Mutation rejected locally
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Tag store unreachable, rejected the write, or answered garbage
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The write was accepted but the canonical refresh that follows it failed
    #[error("Write succeeded but refreshing the taxonomy failed: {source}")]
    RefreshFailed { source: StoreError },
}

impl TaxonomyError {
    /// Create a refresh failed error
    pub fn refresh_failed(source: StoreError) -> Self {
        Self::RefreshFailed { source }
    }

    /// The validation failure, if this is one
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
