//! Reachability configuration for the upstream tag store
//!
//! Origins are tried in order: explicit values first, then a fixed list of
//! well-known local, container-network and gateway addresses. Path prefixes
//! are tried in order too: none, then the named-service prefix.
//!
//! # Environment Variables
//!
//! - `TAG_STORE_ORIGINS`: comma-separated explicit origins
//! - `TAG_STORE_URL`: one more explicit origin, tried after `TAG_STORE_ORIGINS`
//! - `TAG_STORE_SERVICE_PREFIX`: named-service prefix (default `/tag-service`, empty disables)
//! - `TAG_STORE_TIMEOUT_MS`: per-attempt timeout (default 5000)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Well-known addresses tried after any explicit origin
pub const DEFAULT_FALLBACK_ORIGINS: [&str; 5] = [
    "http://127.0.0.1:8000",
    "http://localhost:8000",
    "http://tag-service:8000",
    "http://host.docker.internal:8000",
    "http://gateway:8080",
];

/// Prefix used when the store sits behind a gateway under its service name
pub const DEFAULT_SERVICE_PREFIX: &str = "/tag-service";

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Candidate lists and timeouts for reaching the tag store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Explicit origins, tried first
    pub origins: Vec<String>,

    /// Fallback origins, tried after the explicit ones
    pub fallback_origins: Vec<String>,

    /// Named-service prefix tried after the bare path (`None` = bare path only)
    pub service_prefix: Option<String>,

    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origins: Vec::new(),
            fallback_origins: DEFAULT_FALLBACK_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            service_prefix: Some(DEFAULT_SERVICE_PREFIX.to_string()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl UpstreamConfig {
    /// Build from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment-style)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(list) = lookup("TAG_STORE_ORIGINS") {
            config.origins.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string),
            );
        }
        if let Some(url) = lookup("TAG_STORE_URL") {
            if !url.trim().is_empty() {
                config.origins.push(url.trim().to_string());
            }
        }
        if let Some(prefix) = lookup("TAG_STORE_SERVICE_PREFIX") {
            config.service_prefix = Some(prefix);
        }
        if let Some(timeout) = lookup("TAG_STORE_TIMEOUT_MS").and_then(|t| t.trim().parse().ok()) {
            config.timeout_ms = timeout;
        }

        config
    }

    /// Replace the explicit origins (builder style)
    pub fn with_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Drop the well-known fallback origins (builder style)
    pub fn without_fallbacks(mut self) -> Self {
        self.fallback_origins.clear();
        self
    }

    /// Replace the named-service prefix (builder style)
    pub fn with_service_prefix(mut self, prefix: Option<&str>) -> Self {
        self.service_prefix = prefix.map(str::to_string);
        self
    }

    /// Ordered, normalized, deduplicated origin candidates
    pub fn origin_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        for origin in self.origins.iter().chain(self.fallback_origins.iter()) {
            if let Some(origin) = normalize_origin(origin) {
                if !candidates.contains(&origin) {
                    candidates.push(origin);
                }
            }
        }
        candidates
    }

    /// Ordered path-prefix candidates: bare path first, then the service prefix
    pub fn prefix_candidates(&self) -> Vec<String> {
        let mut prefixes = vec![String::new()];
        if let Some(prefix) = self.service_prefix.as_deref().map(normalize_prefix) {
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        prefixes
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.origin_candidates().is_empty() {
            return Err("at least one tag store origin is required".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Trim whitespace and trailing slashes; `None` for blank input
pub fn normalize_origin(origin: &str) -> Option<String> {
    let trimmed = origin.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Normalize to `""` or `/segment[/segment...]` without a trailing slash
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
