//! Scriptable mock RPC client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use fews_common::Scalar;
use fews_gateway::{ExecuteOutcome, RpcClient, RpcError};

/// Snapshot of how often each RPC method was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub ping: usize,
    pub config_get: usize,
    pub config_put: usize,
    pub execute: usize,
}

/// Mock transport with per-statement scripted outcomes.
///
/// Unscripted statements return an empty row set, so tests only script
/// what they assert on. Every method call is counted and appended to an
/// ordered log for sequencing assertions.
pub struct MockRpcClient {
    outcomes: Mutex<HashMap<String, ExecuteOutcome>>,
    statements: Mutex<Vec<String>>,
    log: Mutex<Vec<&'static str>>,
    ping_calls: AtomicUsize,
    config_get_calls: AtomicUsize,
    config_put_calls: AtomicUsize,
    execute_calls: AtomicUsize,
    tag_registered: AtomicBool,
    unreachable: bool,
    garbled_config_put: bool,
    ping_delay: Option<Duration>,
}

impl MockRpcClient {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            statements: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
            ping_calls: AtomicUsize::new(0),
            config_get_calls: AtomicUsize::new(0),
            config_put_calls: AtomicUsize::new(0),
            execute_calls: AtomicUsize::new(0),
            tag_registered: AtomicBool::new(true),
            unreachable: false,
            garbled_config_put: false,
            ping_delay: None,
        }
    }

    /// Script a tabular result for a statement.
    pub fn with_rows(self, statement: &str, rows: Vec<Vec<Scalar>>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(statement.to_string(), ExecuteOutcome::Rows(rows));
        self
    }

    /// Script a sentinel error code for a statement.
    pub fn with_code(self, statement: &str, code: i64) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(statement.to_string(), ExecuteOutcome::Code(code));
        self
    }

    /// Every call fails at the network level, as if the host were gone.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Start with no tag registered; config reads report malformed until
    /// a put happens.
    pub fn with_unregistered_tag(self) -> Self {
        self.tag_registered.store(false, Ordering::SeqCst);
        self
    }

    /// Config writes reach the endpoint but come back unparseable.
    pub fn with_garbled_config_put(mut self) -> Self {
        self.garbled_config_put = true;
        self
    }

    /// Delay pings, for timeout tests.
    pub fn with_ping_delay(mut self, delay: Duration) -> Self {
        self.ping_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            ping: self.ping_calls.load(Ordering::SeqCst),
            config_get: self.config_get_calls.load(Ordering::SeqCst),
            config_put: self.config_put_calls.load(Ordering::SeqCst),
            execute: self.execute_calls.load(Ordering::SeqCst),
        }
    }

    /// Ordered names of every RPC method invoked so far.
    pub fn call_log(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    /// Statements passed to `execute`, in order.
    pub fn executed_statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(method);
    }

    fn network_check(&self) -> Result<(), RpcError> {
        if self.unreachable {
            Err(RpcError::Network("host unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockRpcClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcClient for MockRpcClient {
    async fn ping(&self, _url: &str) -> Result<(), RpcError> {
        self.record("ping", &self.ping_calls);
        if let Some(delay) = self.ping_delay {
            tokio::time::sleep(delay).await;
        }
        self.network_check()
    }

    async fn config_get(&self, _url: &str, tag: &str) -> Result<Scalar, RpcError> {
        self.record("config_get", &self.config_get_calls);
        self.network_check()?;
        if self.tag_registered.load(Ordering::SeqCst) {
            Ok(Scalar::Text(tag.to_string()))
        } else {
            Err(RpcError::Malformed("unexpected token in response".to_string()))
        }
    }

    async fn config_put(&self, _url: &str, _tag: &str, _value: &str) -> Result<(), RpcError> {
        self.record("config_put", &self.config_put_calls);
        self.network_check()?;
        if self.garbled_config_put {
            return Err(RpcError::Malformed("unexpected token in response".to_string()));
        }
        self.tag_registered.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(
        &self,
        _url: &str,
        statement: &str,
        _tags: &[String],
    ) -> Result<ExecuteOutcome, RpcError> {
        self.record("execute", &self.execute_calls);
        self.network_check()?;
        self.statements.lock().unwrap().push(statement.to_string());

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(statement)
            .cloned()
            .unwrap_or(ExecuteOutcome::Rows(vec![]));
        Ok(outcome)
    }
}
