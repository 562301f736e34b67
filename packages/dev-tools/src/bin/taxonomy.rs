//! Taxonomy command-line client
//!
//! Talks to whichever tag store the resolver finds (see `TAG_STORE_*`
//! environment variables) and prints the taxonomy as an indented tree.
//!
//! ```bash
//! taxonomy list --query invoice
//! taxonomy create "Q1" --parent 2
//! taxonomy move 4 --parent 5
//! taxonomy probe
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::sync::Arc;
use taxonomy_core::upstream::{UpstreamRequest, UpstreamResolver};
use taxonomy_core::{
    match_ids, HttpTagStore, MutationOutcome, TagId, TagTree, TaxonomyService, UpstreamConfig,
};

#[derive(Parser)]
#[command(name = "taxonomy", about = "Browse and edit the tag taxonomy")]
struct Cli {
    /// Print trees as JSON instead of an indented listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the taxonomy, optionally filtered by name
    List {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Create a tag
    Create {
        name: String,
        /// Parent tag id (omit for a primary tag)
        #[arg(long)]
        parent: Option<TagId>,
    },
    /// Rename a tag
    Rename { id: TagId, name: String },
    /// Move a tag under another tag, or to the root when --parent is omitted
    Move {
        id: TagId,
        #[arg(long)]
        parent: Option<TagId>,
    },
    /// Delete a tag and everything below it
    Delete { id: TagId },
    /// Show which tag store candidate answers, attempt by attempt
    Probe,
}

fn print_tree(tree: &TagTree, highlight: &HashSet<TagId>, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(tree)?);
        return Ok(());
    }
    if tree.is_empty() {
        println!("(no tags)");
        return Ok(());
    }

    for (depth, node) in tree.iter() {
        let profile = node.tier.profile();
        let marker = if highlight.contains(&node.id) { "*" } else { " " };
        println!(
            "{}{}[{}] {} (#{}, {})",
            "  ".repeat(depth),
            marker,
            profile.badge,
            node.name,
            node.id,
            profile.label
        );
    }
    Ok(())
}

fn print_outcome(outcome: &MutationOutcome, as_json: bool) -> Result<()> {
    if let Some(tag) = &outcome.tag {
        eprintln!("ok: #{} '{}'", tag.id, tag.name);
    }
    print_tree(&outcome.tree, &HashSet::new(), as_json)
}

async fn probe(config: &UpstreamConfig) -> Result<()> {
    let resolver = UpstreamResolver::from_config(config)?;
    match resolver.execute(&UpstreamRequest::get("/tags")).await {
        Ok(resolved) => {
            for attempt in &resolved.attempts {
                println!("{}", attempt);
            }
            println!("selected: {}{}", resolved.origin, resolved.prefix);
            Ok(())
        }
        Err(err) => {
            for attempt in err.attempts() {
                println!("{}", attempt);
            }
            Err(err.into())
        }
    }
}

/// Build the service and fetch the current taxonomy
async fn connect(config: &UpstreamConfig) -> Result<(TaxonomyService, TagTree)> {
    let store = HttpTagStore::from_config(config)?;
    let service = TaxonomyService::new(Arc::new(store));
    let tree = service.load().await.context("loading taxonomy")?;
    Ok((service, tree))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = UpstreamConfig::from_env();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid tag store configuration")?;

    match cli.command {
        Commands::Probe => probe(&config).await?,
        Commands::List { query } => {
            let (service, tree) = connect(&config).await?;
            let query = query.unwrap_or_default();
            let filtered = service.search(&tree, &query);
            let hits: HashSet<TagId> = match_ids(&filtered, &query).into_iter().collect();
            print_tree(&filtered, &hits, cli.json)?;
        }
        Commands::Create { name, parent } => {
            let (service, tree) = connect(&config).await?;
            let outcome = service.create_tag(&tree, &name, parent).await?;
            print_outcome(&outcome, cli.json)?;
        }
        Commands::Rename { id, name } => {
            let (service, tree) = connect(&config).await?;
            let outcome = service.rename_tag(&tree, id, &name).await?;
            print_outcome(&outcome, cli.json)?;
        }
        Commands::Move { id, parent } => {
            let (service, tree) = connect(&config).await?;
            let outcome = service.move_tag(&tree, id, parent).await?;
            print_outcome(&outcome, cli.json)?;
        }
        Commands::Delete { id } => {
            let (service, tree) = connect(&config).await?;
            let outcome = service.delete_tag(&tree, id).await?;
            print_outcome(&outcome, cli.json)?;
        }
    }

    Ok(())
}
