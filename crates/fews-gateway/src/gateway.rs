//! Query execution against a configured source.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use fews_common::{FewsError, FewsResult, Scalar, Source};

use crate::rpc::{ExecuteOutcome, RpcClient, RpcError};

/// Upper bound for each remote round-trip (ping, config access, execute).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes statements against remote sources.
///
/// Every query runs the same sequence: liveness probe, lazy tag
/// registration, execution, outcome classification. The registration
/// write is an idempotent upsert; two callers racing to provision the
/// same tag both succeed.
pub struct QueryGateway {
    client: Arc<dyn RpcClient>,
    timeout: Duration,
}

impl QueryGateway {
    pub fn new(client: Arc<dyn RpcClient>) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(client: Arc<dyn RpcClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Run a statement against the source and return its rows.
    ///
    /// Failure modes:
    /// - endpoint unreachable or round-trip timed out: `RemoteUnavailable`
    /// - remote answered a sentinel integer: `RemoteQueryError`
    /// - remote answered garbage: `MalformedResponse`
    pub async fn query(&self, source: &Source, statement: &str) -> FewsResult<Vec<Vec<Scalar>>> {
        if statement.contains('"') {
            warn!(
                source = %source.slug,
                statement,
                "double quotes in statement, is that intended?"
            );
        }

        self.bounded(self.client.ping(&source.url))
            .await
            .map_err(FewsError::remote_unavailable)?;

        self.ensure_registered(source).await?;

        let outcome = self
            .bounded(self.client.execute(&source.url, statement, &[source.tag_name.clone()]))
            .await
            .map_err(|e| match e {
                RpcError::Network(_) => FewsError::remote_unavailable(e),
                RpcError::Malformed(msg) => FewsError::MalformedResponse(msg),
            })?;

        match outcome {
            ExecuteOutcome::Rows(rows) => {
                debug!(source = %source.slug, rows = rows.len(), "query returned");
                Ok(rows)
            }
            ExecuteOutcome::Code(code) => Err(FewsError::RemoteQueryError {
                code,
                statement: statement.to_string(),
            }),
        }
    }

    /// Make sure the source's tag is registered on the remote side.
    ///
    /// A malformed/absent config read means the tag was never written;
    /// the connector string is then upserted before the query proceeds.
    /// A network failure here is a `RemoteUnavailable` like any other.
    async fn ensure_registered(&self, source: &Source) -> FewsResult<()> {
        match self
            .bounded(self.client.config_get(&source.url, &source.tag_name))
            .await
        {
            Ok(_) => Ok(()),
            Err(RpcError::Malformed(_)) => {
                debug!(
                    source = %source.slug,
                    tag = %source.tag_name,
                    "registering connection tag"
                );
                self.bounded(self.client.config_put(
                    &source.url,
                    &source.tag_name,
                    &source.connector_string,
                ))
                .await
                .map_err(|e| match e {
                    RpcError::Network(_) => FewsError::remote_unavailable(e),
                    RpcError::Malformed(msg) => FewsError::MalformedResponse(msg),
                })
            }
            Err(e @ RpcError::Network(_)) => Err(FewsError::remote_unavailable(e)),
        }
    }

    /// Bound a remote round-trip by the gateway timeout.
    ///
    /// Elapsed timeouts behave exactly like an unreachable host.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, RpcError>>,
    ) -> Result<T, RpcError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::Network(format!(
                "remote call timed out after {:?}",
                self.timeout
            ))),
        }
    }
}
