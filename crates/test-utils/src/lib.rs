//! Shared test utilities for the fews-bridge workspace.
//!
//! Provides a scriptable mock RPC client with call accounting and a few
//! canonical source fixtures. Used from `[dev-dependencies]` of the
//! gateway and resolver crates.

mod fixtures;
mod mock_rpc;

pub use fixtures::{custom_filter_source, filter_rows, sample_source};
pub use mock_rpc::{CallCounts, MockRpcClient};
