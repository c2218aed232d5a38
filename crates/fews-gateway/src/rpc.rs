//! RPC client trait for the remote transport.

use async_trait::async_trait;
use thiserror::Error;

use fews_common::Scalar;

/// Transport-level failure modes.
///
/// The distinction matters: a `Network` failure means the endpoint was
/// never reached and maps to `RemoteUnavailable`; a `Malformed` failure
/// means the endpoint answered something unparseable. During the config
/// read a `Malformed` result is how an unregistered tag shows up.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Raw outcome of a statement execution.
///
/// The remote returns either a tabular result or a bare integer; the
/// integer is a sentinel error code, not data.
#[derive(Debug, Clone)]
pub enum ExecuteOutcome {
    Rows(Vec<Vec<Scalar>>),
    Code(i64),
}

/// Injected remote transport.
///
/// One client serves every configured source; the endpoint URL is passed
/// per call. Implementations must be safe to share across concurrent
/// lookups.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Liveness probe against the endpoint.
    async fn ping(&self, url: &str) -> Result<(), RpcError>;

    /// Read a named configuration value on the remote side.
    async fn config_get(&self, url: &str, tag: &str) -> Result<Scalar, RpcError>;

    /// Write a named configuration value on the remote side.
    ///
    /// Must be idempotent; concurrent duplicate writes of the same tag
    /// are allowed and last write wins.
    async fn config_put(&self, url: &str, tag: &str, value: &str) -> Result<(), RpcError>;

    /// Execute a statement scoped to the given tags.
    async fn execute(
        &self,
        url: &str,
        statement: &str,
        tags: &[String],
    ) -> Result<ExecuteOutcome, RpcError>;
}
