//! Taxonomy Core - Tiered Tag Taxonomy Client
//!
//! This crate keeps a three-tier tag taxonomy (Primary → Secondary → Tertiary)
//! consistent with a remote tag store that owns the canonical data.
//!
//! # Architecture
//!
//! - **Store is authoritative**: every successful write is followed by a full
//!   re-fetch; local trees are disposable snapshots
//! - **Validate locally first**: structural violations never reach the network
//! - **Tiers are derived**: a node's tier is a function of its depth only
//! - **Self-locating upstream**: each request probes origin and path-prefix
//!   candidates in order until a tag store answers
//!
//! # Modules
//!
//! - [`models`] - Tag records, tier-annotated trees, write payloads
//! - [`services`] - Tree building, validation, filtering, `TaxonomyService`
//! - [`store`] - `TagStore` trait with HTTP and in-memory backends
//! - [`upstream`] - Reachability resolver and HTTP transport
//! - [`dev_server`] - axum server exposing a `TagStore` for local development

pub mod dev_server;
pub mod models;
pub mod services;
pub mod store;
pub mod upstream;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use store::{HttpTagStore, InMemoryTagStore, StoreError, TagStore};
pub use upstream::{UpstreamConfig, UpstreamError, UpstreamResolver};
