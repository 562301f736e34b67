//! TagStore Trait - Tag Persistence Abstraction
//!
//! The tag store owns the canonical taxonomy. This module defines the
//! [`TagStore`] trait that the taxonomy service talks to, plus two backends:
//!
//! - [`HttpTagStore`] - the remote store, reached through the
//!   [`UpstreamResolver`](crate::upstream::UpstreamResolver)
//! - [`InMemoryTagStore`] - an in-process store used by tests and the
//!   development server
//!
//! # Examples
//!
//! ```rust,no_run
//! use taxonomy_core::store::{HttpTagStore, TagStore};
//! use taxonomy_core::upstream::UpstreamConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn TagStore> =
//!         Arc::new(HttpTagStore::from_config(&UpstreamConfig::from_env())?);
//!     let records = store.list_tags().await?;
//!     println!("{} root tags", records.len());
//!     Ok(())
//! }
//! ```

mod error;
mod http_store;
mod memory_store;

pub use error::StoreError;
pub use http_store::HttpTagStore;
pub use memory_store::InMemoryTagStore;

use crate::models::{NewTag, TagId, TagRecord, TagUpdate};
use async_trait::async_trait;

/// Abstraction over the canonical tag store
///
/// Implementations must be `Send + Sync` so one store can be shared between
/// services and request handlers.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Fetch the full taxonomy, nested or flat
    async fn list_tags(&self) -> Result<Vec<TagRecord>, StoreError>;

    /// Create a tag, returning the stored record with its assigned id
    async fn create_tag(&self, tag: NewTag) -> Result<TagRecord, StoreError>;

    /// Apply a sparse update, returning the stored record
    async fn update_tag(&self, id: TagId, update: TagUpdate) -> Result<TagRecord, StoreError>;

    /// Delete a tag and its whole subtree
    async fn delete_tag(&self, id: TagId) -> Result<(), StoreError>;
}
