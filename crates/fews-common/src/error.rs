//! Error types for fews-bridge crates.

use thiserror::Error;

/// Result type alias using FewsError.
pub type FewsResult<T> = Result<T, FewsError>;

/// Primary error type for remote lookups and cache access.
///
/// A closed set of tagged variants; callers match on the variant, not on
/// a class hierarchy. The gateway produces the remote-side variants, the
/// resolver adds the lookup-level ones.
#[derive(Debug, Error)]
pub enum FewsError {
    // === Remote failures ===
    /// The remote endpoint could not be reached at all (DNS failure,
    /// connection refused, timeout). Distinct from a reachable endpoint
    /// answering garbage.
    #[error("FEWS endpoint not available: {message}")]
    RemoteUnavailable { message: String },

    /// The remote answered a query with a sentinel integer instead of a
    /// result set. Carries the offending statement for diagnostics.
    #[error("FEWS query [{statement}] returned error code {code}")]
    RemoteQueryError { code: i64, statement: String },

    /// The remote answered, but the response could not be parsed.
    #[error("Malformed response from FEWS endpoint: {0}")]
    MalformedResponse(String),

    // === Contract violations ===
    /// A row's arity did not match the expected column count.
    #[error("Row has {actual} columns, expected {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// A lookup expected at least one row and got zero.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A compact remote timestamp could not be parsed.
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    // === Infrastructure ===
    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl FewsError {
    /// Build a `RemoteUnavailable` from any underlying transport error.
    pub fn remote_unavailable(err: impl std::fmt::Display) -> Self {
        FewsError::RemoteUnavailable {
            message: err.to_string(),
        }
    }

    /// True for the failure modes the filter-tree lookup degrades on
    /// instead of propagating.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            FewsError::RemoteUnavailable { .. }
                | FewsError::RemoteQueryError { .. }
                | FewsError::MalformedResponse(_)
        )
    }
}

impl From<serde_json::Error> for FewsError {
    fn from(err: serde_json::Error) -> Self {
        FewsError::CacheError(format!("JSON error: {}", err))
    }
}
