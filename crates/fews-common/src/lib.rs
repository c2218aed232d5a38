//! Shared types for the fews-bridge workspace.
//!
//! Everything the gateway, cache and resolver crates have in common:
//! the error taxonomy, raw scalar cells, the domain types served to
//! presentation layers, source configuration records and timestamp
//! handling for the remote FEWS representation.

pub mod error;
pub mod scalar;
pub mod source;
pub mod time;
pub mod types;

pub use error::{FewsError, FewsResult};
pub use scalar::Scalar;
pub use source::Source;
pub use time::{format_jdbc, parse_fews_timestamp, JDBC_DATE_FORMAT};
pub use types::{FilterNode, FilterRecord, Location, Parameter, TimeSeriesPoint};

/// Sentinel the remote side uses for "no parent" / "top level".
///
/// Chosen negative so it can never collide with a legitimate filter id.
pub const JDBC_NONE: i64 = -999;
