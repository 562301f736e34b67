//! Business Services
//!
//! This module contains the taxonomy logic:
//!
//! - `tree_builder` - tier-annotated trees from flat or nested store records
//! - `validator` - structural rules checked before any write
//! - `filter` - case-insensitive name search that keeps ancestor chains
//! - `TaxonomyService` - validated mutations followed by a canonical refresh
//!
//! Everything except `TaxonomyService` is pure and synchronous.

pub mod error;
pub mod filter;
pub mod taxonomy_service;
pub mod tree_builder;
pub mod validator;

pub use error::{TaxonomyError, ValidationError};
pub use filter::{filter_tree, match_ids};
pub use taxonomy_service::{MutationOutcome, TaxonomyService};
pub use tree_builder::build_tree;
