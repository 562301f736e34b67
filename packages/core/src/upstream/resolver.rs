//! Upstream Reachability Resolver
//!
//! Finds a working tag store instance for each logical request by walking the
//! Cartesian product of origin and prefix candidates, strictly in order and one
//! at a time:
//!
//! ```text
//! (origin 1, "")  (origin 1, "/tag-service")  (origin 2, "")  ...
//! ```
//!
//! # Selection Rules
//!
//! - **Reads** (`GET`): the first success status with a JSON body wins
//! - **Writes**: the first JSON body wins whatever the status, so store-side
//!   error bodies reach the caller
//! - A `DELETE` answered with an empty success body (e.g. `204 No Content`)
//!   also wins. This is an intentional extension of the JSON-only write rule,
//!   since a bodiless ack means the delete already happened. A non-empty
//!   non-JSON body still does not qualify.
//! - Non-JSON answers and transport failures are logged and probing continues
//!
//! Nothing is cached between calls: every request re-probes from the top of
//! the list, so restarts or topology changes are picked up immediately.

use super::config::UpstreamConfig;
use super::error::{ProbeAttempt, ProbeOutcome, UpstreamError};
use super::transport::{
    HttpMethod, HttpTransport, ReqwestTransport, TransportError, UpstreamRequest, UpstreamResponse,
};
use tracing::{debug, instrument, warn};

/// A qualifying response and how it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub origin: String,
    pub prefix: String,
    pub response: UpstreamResponse,
    /// Every attempt made, the accepted one last
    pub attempts: Vec<ProbeAttempt>,
}

/// Sequential candidate prober
pub struct UpstreamResolver<T = ReqwestTransport>
where
    T: HttpTransport,
{
    origins: Vec<String>,
    prefixes: Vec<String>,
    transport: T,
}

impl UpstreamResolver<ReqwestTransport> {
    /// Create a resolver with a reqwest transport using the configured timeout
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, TransportError> {
        Ok(Self::new(config, ReqwestTransport::new(config.timeout())?))
    }
}

impl<T> UpstreamResolver<T>
where
    T: HttpTransport,
{
    pub fn new(config: &UpstreamConfig, transport: T) -> Self {
        Self {
            origins: config.origin_candidates(),
            prefixes: config.prefix_candidates(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Candidate (origin, prefix) pairs in probe order
    pub fn candidates(&self) -> Vec<(&str, &str)> {
        self.origins
            .iter()
            .flat_map(|origin| {
                self.prefixes
                    .iter()
                    .map(move |prefix| (origin.as_str(), prefix.as_str()))
            })
            .collect()
    }

    /// Probe candidates in order until one qualifies for `request`
    #[instrument(skip(self, request), fields(operation = %request.describe()))]
    pub async fn execute(&self, request: &UpstreamRequest) -> Result<Resolved, UpstreamError> {
        let mut attempts = Vec::new();

        for (origin, prefix) in self.candidates() {
            let url = format!("{}{}{}", origin, prefix, request.path);
            let outcome = match self.transport.send(&url, request).await {
                Ok(response) => {
                    let outcome = classify(request.method, &response);
                    if outcome.is_accepted() {
                        debug!("{} answered by {}", request.describe(), url);
                        attempts.push(ProbeAttempt {
                            origin: origin.to_string(),
                            prefix: prefix.to_string(),
                            outcome,
                        });
                        return Ok(Resolved {
                            origin: origin.to_string(),
                            prefix: prefix.to_string(),
                            response,
                            attempts,
                        });
                    }
                    outcome
                }
                Err(err) => ProbeOutcome::TransportFailed(err),
            };

            debug!("Candidate {} did not qualify: {}", url, outcome);
            attempts.push(ProbeAttempt {
                origin: origin.to_string(),
                prefix: prefix.to_string(),
                outcome,
            });
        }

        let err = UpstreamError::unreachable(request.describe(), attempts);
        warn!("{}", err);
        Err(err)
    }
}

/// Apply the read/write selection rules to one response
fn classify(method: HttpMethod, response: &UpstreamResponse) -> ProbeOutcome {
    let status = response.status;

    if !response.is_json() {
        let empty_delete_ack = method == HttpMethod::Delete
            && response.is_success()
            && response.body.trim().is_empty();
        if empty_delete_ack {
            return ProbeOutcome::Accepted { status };
        }
        return ProbeOutcome::NonJson {
            status,
            content_type: response.content_type.clone(),
        };
    }

    match method {
        HttpMethod::Get if !response.is_success() => ProbeOutcome::Unsuccessful { status },
        _ => ProbeOutcome::Accepted { status },
    }
}
