//! Upstream failure types and their classification.
//!
//! Every upstream call ends in an [`UpstreamError`]. Before an error leaves the
//! engine it is classified into a [`FailureKind`] and wrapped in a
//! [`KlineError`], which the HTTP layer maps to a retryable
//! "upstream unavailable" response or a generic internal error.

use std::time::Duration;
use thiserror::Error;

/// Failure raised by an upstream client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The call exceeded its timeout.
    #[error("{upstream} request timeout after {}ms", .after.as_millis())]
    Timeout {
        /// Upstream that timed out.
        upstream: &'static str,
        /// Configured timeout.
        after: Duration,
    },

    /// Every candidate direct-exchange endpoint failed.
    #[error("all {} endpoints failed: {}", .failures.len(), .failures.join("; "))]
    AllEndpointsFailed {
        /// One `"<endpoint>: <error>"` entry per attempted endpoint, in order.
        failures: Vec<String>,
    },

    /// Transport-level failure (connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Upstream payload could not be decoded.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// The indexer knows no trading venue for the token.
    #[error("no trading venue found for token {token} on chain {chain_id}")]
    NoVenue {
        /// Chain id.
        chain_id: u64,
        /// Token address.
        token: String,
    },

    /// The chain has no configured network.
    #[error("chain {0} is not supported")]
    UnsupportedChain(u64),

    /// The direct-exchange client was built without endpoints.
    #[error("no direct-exchange endpoints configured")]
    NoEndpoints,
}

impl UpstreamError {
    /// Converts a `reqwest` error, turning client timeouts into [`UpstreamError::Timeout`].
    #[must_use]
    pub fn from_transport(err: reqwest::Error, upstream: &'static str, after: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { upstream, after }
        } else {
            Self::Transport(err)
        }
    }

    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        classify(self)
    }
}

/// Longest upstream error body kept in an error message.
pub const MAX_ERROR_BODY: usize = 256;

/// Cuts an upstream error body to [`MAX_ERROR_BODY`] bytes on a char boundary.
#[must_use]
pub fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    body
}

/// Classification of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeout or availability failure; the caller may retry later.
    Timeout,
    /// Any other failure.
    Other,
}

/// Classifies an upstream error.
///
/// An error is a [`FailureKind::Timeout`] when it is a timeout, when every
/// direct-exchange endpoint failed, when the transport reports a timeout, or
/// when its message mentions `"timeout"`.
#[must_use]
pub fn classify(err: &UpstreamError) -> FailureKind {
    match err {
        UpstreamError::Timeout { .. } | UpstreamError::AllEndpointsFailed { .. } => {
            FailureKind::Timeout
        }
        UpstreamError::Transport(e) if e.is_timeout() => FailureKind::Timeout,
        other if other.to_string().contains("timeout") => FailureKind::Timeout,
        _ => FailureKind::Other,
    }
}

/// Error returned by the kline engine, annotated with its classification.
#[derive(Debug, Error)]
pub enum KlineError {
    /// Upstream timed out or was unavailable.
    #[error("upstream unavailable: {0}")]
    Timeout(#[source] UpstreamError),

    /// Any other upstream failure.
    #[error("upstream error: {0}")]
    Upstream(#[source] UpstreamError),
}

impl KlineError {
    /// Returns the classification.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout(_) => FailureKind::Timeout,
            Self::Upstream(_) => FailureKind::Other,
        }
    }

    /// Returns the unmodified upstream error.
    #[must_use]
    pub fn upstream(&self) -> &UpstreamError {
        match self {
            Self::Timeout(e) | Self::Upstream(e) => e,
        }
    }
}

impl From<UpstreamError> for KlineError {
    fn from(err: UpstreamError) -> Self {
        match classify(&err) {
            FailureKind::Timeout => Self::Timeout(err),
            FailureKind::Other => Self::Upstream(err),
        }
    }
}
