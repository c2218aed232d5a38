//! Remote query gateway for FEWS JDBC endpoints.
//!
//! Owns the query sequence against a remote source: liveness probe, lazy
//! tag registration, statement execution and outcome classification. The
//! actual transport is injected through the [`RpcClient`] trait.

pub mod gateway;
pub mod rpc;

pub use gateway::{QueryGateway, DEFAULT_TIMEOUT};
pub use rpc::{ExecuteOutcome, RpcClient, RpcError};
