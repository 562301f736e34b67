//! Development Tag Store Binary
//!
//! Standalone binary that serves the tag store API from an in-memory store
//! seeded with a small sample taxonomy.
//!
//! # Usage
//!
//! ```bash
//! # Default port 8000, no prefix
//! cargo run --bin dev-tag-store
//!
//! # Behind a gateway-style service prefix
//! DEV_TAG_STORE_PREFIX=/tag-service cargo run --bin dev-tag-store
//! ```
//!
//! # Environment Variables
//!
//! - `DEV_TAG_STORE_PORT`: Server port (default: 8000)
//! - `DEV_TAG_STORE_PREFIX`: Optional path prefix for every route
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::sync::Arc;

use taxonomy_core::dev_server;
use taxonomy_core::{InMemoryTagStore, TagRecord};

fn sample_taxonomy() -> Vec<TagRecord> {
    vec![
        TagRecord::new(1, "Finance", None).with_children(vec![
            TagRecord::new(2, "Invoices", Some(1))
                .with_children(vec![TagRecord::new(3, "2024", Some(2))]),
            TagRecord::new(4, "Receipts", Some(1)),
        ]),
        TagRecord::new(5, "Legal", None)
            .with_children(vec![TagRecord::new(6, "Contracts", Some(5))]),
        TagRecord::new(7, "People", None),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port = env::var("DEV_TAG_STORE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);
    let prefix = env::var("DEV_TAG_STORE_PREFIX")
        .ok()
        .filter(|p| !p.trim().is_empty());

    let store = InMemoryTagStore::seeded(sample_taxonomy());
    tracing::info!("Seeded dev tag store with {} tags", store.len().await);

    dev_server::start_server(Arc::new(store), port, prefix.as_deref()).await
}
