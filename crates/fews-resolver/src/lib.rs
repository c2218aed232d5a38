//! Cached resource resolver over a remote tabular time-series source.
//!
//! Turns the flat relational results served by a FEWS JDBC endpoint into
//! a navigable hierarchy: filters, parameters, locations, time series.
//! Each lookup runs cache-first against an injected [`fews_cache::CacheStore`]
//! and falls back to the [`fews_gateway::QueryGateway`] on a miss.

pub mod config;
pub mod keys;
pub mod ops;
pub mod resolver;
pub mod tree;

pub use config::{SourceProvider, YamlSourceProvider};
pub use resolver::{FilterTree, Resolver, FILTER_TREE_TTL};
pub use tree::build_tree;
