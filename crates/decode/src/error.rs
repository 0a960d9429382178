use thiserror::Error;

/// Failure of the remote decode service.
///
/// Only `Timeout` is ever retried; every variant ends in the structural
/// fallback rather than a hard failure of resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("remote lookup timed out ({attempts} attempt(s), retries exhausted)")]
    Timeout { attempts: u32 },

    #[error("remote lookup HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("remote lookup returned no results")]
    Empty,

    #[error("remote lookup failed: {0}")]
    Other(String),
}

impl ResolverError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
