//! Tier Classification
//!
//! Every tag is classified into one of three tiers purely by its depth in the
//! taxonomy. Tier is derived on every tree build and is never accepted as input.
//!
//! Per-tier behavior and presentation live in a single lookup table
//! ([`TIER_PROFILES`]) rather than being re-derived at each call site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deepest depth a tag may occupy (0-based). Nodes at this depth are Tertiary.
pub const MAX_TIER_DEPTH: usize = 2;

/// Tier of a tag node, derived from its depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Depth 0 (root tags)
    Primary,
    /// Depth 1
    Secondary,
    /// Depth 2 and anything deeper
    Tertiary,
}

/// Static description of how a tier behaves and is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierProfile {
    pub tier: Tier,
    /// Human-readable label
    pub label: &'static str,
    /// Short badge used in compact listings
    pub badge: &'static str,
    /// Whether nodes of this tier may have children
    pub accepts_children: bool,
}

/// Tier lookup table, indexed by depth (clamped to [`MAX_TIER_DEPTH`])
pub const TIER_PROFILES: [TierProfile; 3] = [
    TierProfile {
        tier: Tier::Primary,
        label: "Primary",
        badge: "P",
        accepts_children: true,
    },
    TierProfile {
        tier: Tier::Secondary,
        label: "Secondary",
        badge: "S",
        accepts_children: true,
    },
    TierProfile {
        tier: Tier::Tertiary,
        label: "Tertiary",
        badge: "T",
        accepts_children: false,
    },
];

impl Tier {
    /// Classify a node by its depth from the implicit root
    pub fn from_depth(depth: usize) -> Self {
        TIER_PROFILES[depth.min(MAX_TIER_DEPTH)].tier
    }

    pub fn profile(self) -> &'static TierProfile {
        match self {
            Tier::Primary => &TIER_PROFILES[0],
            Tier::Secondary => &TIER_PROFILES[1],
            Tier::Tertiary => &TIER_PROFILES[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    pub fn accepts_children(self) -> bool {
        self.profile().accepts_children
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
