//! Upstream tag store reachability
//!
//! - [`UpstreamConfig`] - ordered origin and prefix candidates
//! - [`HttpTransport`] - transport seam ([`ReqwestTransport`] in production)
//! - [`UpstreamResolver`] - sequential, short-circuiting candidate prober

pub mod config;
mod error;
pub mod resolver;
pub mod transport;

pub use config::UpstreamConfig;
pub use error::{ProbeAttempt, ProbeOutcome, UpstreamError};
pub use resolver::{Resolved, UpstreamResolver};
pub use transport::{
    HttpMethod, HttpTransport, ReqwestTransport, TransportError, UpstreamRequest, UpstreamResponse,
};
