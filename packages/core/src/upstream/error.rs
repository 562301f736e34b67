//! Probe log and resolver errors

use super::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Result of trying one (origin, prefix) candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Qualifying response; probing stopped here
    Accepted { status: u16 },
    /// Body not declared as JSON
    NonJson {
        status: u16,
        content_type: Option<String>,
    },
    /// JSON body with a non-success status on a read
    Unsuccessful { status: u16 },
    /// Nothing came back
    TransportFailed(TransportError),
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { status } => write!(f, "accepted ({})", status),
            Self::NonJson {
                status,
                content_type,
            } => write!(
                f,
                "non-JSON response ({}, content-type {})",
                status,
                content_type.as_deref().unwrap_or("none")
            ),
            Self::Unsuccessful { status } => write!(f, "unsuccessful JSON response ({})", status),
            Self::TransportFailed(err) => write!(f, "transport error: {}", err),
        }
    }
}

/// One entry of the probe log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub origin: String,
    pub prefix: String,
    pub outcome: ProbeOutcome,
}

impl fmt::Display for ProbeAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.prefix.is_empty() {
            "(none)"
        } else {
            self.prefix.as_str()
        };
        write!(f, "{} prefix {} -> {}", self.origin, prefix, self.outcome)
    }
}

/// Resolver failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Every candidate was tried and none qualified
    #[error(
        "Tag store unreachable for {operation} after {} attempt(s): [{}]",
        .attempts.len(),
        format_attempts(.attempts)
    )]
    Unreachable {
        operation: String,
        attempts: Vec<ProbeAttempt>,
    },
}

impl UpstreamError {
    pub fn unreachable(operation: impl Into<String>, attempts: Vec<ProbeAttempt>) -> Self {
        Self::Unreachable {
            operation: operation.into(),
            attempts,
        }
    }

    /// The ordered probe log
    pub fn attempts(&self) -> &[ProbeAttempt] {
        match self {
            Self::Unreachable { attempts, .. } => attempts,
        }
    }
}

fn format_attempts(attempts: &[ProbeAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
