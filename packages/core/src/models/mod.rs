//! Data Models
//!
//! This module contains the data structures of the tag taxonomy:
//!
//! - `TagRecord` - a tag as the tag store returns it
//! - `TagNode` / `TagTree` - the built, tier-annotated taxonomy
//! - `TagIndex` - id-indexed view used for structural checks
//! - `Tier` / `TierProfile` - depth-derived classification and its lookup table

mod index;
mod tag;
mod tier;

pub use index::{IndexedTag, TagIndex};
pub use tag::{NewTag, TagId, TagNode, TagRecord, TagTree, TagTreeIter, TagUpdate};
pub use tier::{Tier, TierProfile, MAX_TIER_DEPTH, TIER_PROFILES};
