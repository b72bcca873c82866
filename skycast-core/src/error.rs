//! Failure taxonomy for weather lookups.
//!
//! `ProviderError` covers a single adapter call and is absorbed by the
//! fallback chain; `ResolveError` is what escapes the chain when every
//! adapter has failed.

use thiserror::Error;

use crate::provider::ProviderId;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success HTTP status.
    #[error("provider returned status {status}")]
    Unavailable { status: u16 },

    /// The provider answered, but the body could not be decoded.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The provider could not be reached at all (timeout, DNS, refused
    /// connection).
    #[error("provider unreachable: {0}")]
    Unreachable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Unavailable { status: status.as_u16() }
        } else {
            ProviderError::Unreachable(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Every adapter in the chain failed. Cannot occur while the terminal
    /// mock adapter is configured; kept for chains rebuilt without it.
    #[error("All weather services unavailable")]
    AllProvidersFailed {
        attempts: Vec<(ProviderId, ProviderError)>,
    },
}
