//! The cached resource resolver.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use fews_cache::CacheStore;
use fews_common::{
    format_jdbc, parse_fews_timestamp, FewsError, FewsResult, FilterNode, FilterRecord, Location,
    Parameter, Scalar, Source, TimeSeriesPoint, JDBC_NONE,
};
use fews_gateway::QueryGateway;

use crate::keys::cache_key;
use crate::{ops, tree};

const FILTER_NS: &str = "fews:filters";
const PARAMETER_NS: &str = "fews:parameters";
const PARAMETER_NAME_NS: &str = "fews:parameter-name";
const LOCATION_NS: &str = "fews:locations";

const FILTER_QUERY: &str = "select id, name, parentid from filters";

/// TTL for filter trees, parameter lists and parameter names.
pub const FILTER_TREE_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Result of a filter-tree lookup.
///
/// The tree lookup never propagates remote failures; navigation UIs
/// render it inline and must get something displayable. A failure comes
/// back as the `Degraded` variant with a human-readable message and the
/// underlying error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum FilterTree {
    Nodes(Vec<FilterNode>),
    Degraded { message: String, error: String },
}

impl FilterTree {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FilterTree::Degraded { .. })
    }

    /// Leaf nodes across the whole forest. Their ids are the references
    /// a caller resolves into parameter lookups.
    pub fn leaves(&self) -> Vec<&FilterNode> {
        match self {
            FilterTree::Nodes(nodes) => nodes.iter().flat_map(|n| n.leaves()).collect(),
            FilterTree::Degraded { .. } => Vec::new(),
        }
    }
}

/// Serves hierarchy lookups against a remote source, cache-first.
///
/// Stateless apart from the injected cache; safe to share across
/// concurrent requests behind an `Arc`. No lookup is retried; a failed
/// remote query surfaces to the caller, except the filter tree which
/// degrades instead.
pub struct Resolver {
    gateway: QueryGateway,
    cache: Arc<dyn CacheStore>,
}

impl Resolver {
    pub fn new(gateway: QueryGateway, cache: Arc<dyn CacheStore>) -> Self {
        Self { gateway, cache }
    }

    /// Resolve the filter hierarchy of a source.
    ///
    /// A source with a custom filter list is built from configuration and
    /// never touches the remote. Remote failures come back as
    /// [`FilterTree::Degraded`] and are not cached. TTL: 8 hours.
    pub async fn filter_tree(&self, source: &Source) -> FewsResult<FilterTree> {
        let key = cache_key(FILTER_NS, &[&source.slug]);
        if let Some(nodes) = self.cached::<Vec<FilterNode>>(&key).await {
            return Ok(FilterTree::Nodes(nodes));
        }

        let (records, root_parent) = if let Some(custom) = &source.custom_filter {
            (custom.clone(), None)
        } else {
            let rows = match self.gateway.query(source, FILTER_QUERY).await {
                Ok(rows) => rows,
                Err(err) if err.is_remote_failure() => {
                    error!(source = %source.slug, error = %err, "filter tree lookup degraded");
                    return Ok(degraded(&err));
                }
                Err(err) => return Err(err),
            };
            let named = ops::named_rows(ops::dedup(rows), &["id", "name", "parentid"])?;
            let records: Vec<FilterRecord> = named.iter().map(filter_record).collect();
            (records, source.filter_tree_root.clone())
        };

        let nodes = tree::build_tree(&records, root_parent.as_deref());
        self.store(&key, &nodes, Some(FILTER_TREE_TTL)).await;
        Ok(FilterTree::Nodes(nodes))
    }

    /// Parameters available below one filter. TTL: 8 hours.
    pub async fn parameters(&self, source: &Source, filter_id: &str) -> FewsResult<Vec<Parameter>> {
        let key = cache_key(PARAMETER_NS, &[&source.slug, filter_id]);
        if let Some(parameters) = self.cached::<Vec<Parameter>>(&key).await {
            return Ok(parameters);
        }

        let statement = format!(
            "select name, parameterid, parameter from filters where id='{}'",
            sql_quote(filter_id)
        );
        let rows = self.gateway.query(source, &statement).await?;
        let named = ops::named_rows(ops::dedup(rows), &["name", "parameterid", "parameter"])?;
        let parameters: Vec<Parameter> = named
            .iter()
            .map(|row| Parameter {
                name: cell(row, "name").to_text(),
                parameter_id: cell(row, "parameterid").to_text(),
                parameter: cell(row, "parameter").to_text(),
            })
            .collect();

        self.store(&key, &parameters, Some(FILTER_TREE_TTL)).await;
        Ok(parameters)
    }

    /// Display name of a parameter. TTL: 8 hours.
    pub async fn parameter_name(&self, source: &Source, parameter_id: &str) -> FewsResult<String> {
        let key = cache_key(PARAMETER_NAME_NS, &[&source.slug, parameter_id]);
        if let Some(name) = self.cached::<String>(&key).await {
            return Ok(name);
        }

        let statement = format!(
            "select name from parameters where id='{}'",
            sql_quote(parameter_id)
        );
        let rows = self.gateway.query(source, &statement).await?;
        let name = first_cell(&rows)
            .ok_or_else(|| FewsError::NotFound(format!("parameter '{}'", parameter_id)))?
            .to_text();

        self.store(&key, &name, Some(FILTER_TREE_TTL)).await;
        Ok(name)
    }

    /// Locations for a (filter, parameter) pair.
    ///
    /// Cached without TTL: the entry lives until the cache backend's own
    /// eviction removes it.
    pub async fn locations(
        &self,
        source: &Source,
        filter_id: &str,
        parameter_id: &str,
    ) -> FewsResult<Vec<Location>> {
        let key = cache_key(LOCATION_NS, &[&source.slug, filter_id, parameter_id]);
        if let Some(locations) = self.cached::<Vec<Location>>(&key).await {
            return Ok(locations);
        }

        let statement = format!(
            "select longitude, latitude, location, locationid from filters \
             where id='{}' and parameterid='{}'",
            sql_quote(filter_id),
            sql_quote(parameter_id)
        );
        let rows = self.gateway.query(source, &statement).await?;
        let named = ops::named_rows(
            ops::dedup(rows),
            &["longitude", "latitude", "location", "locationid"],
        )?;
        let locations: Vec<Location> = named
            .iter()
            .map(|row| {
                Ok(Location {
                    location_id: cell(row, "locationid").to_text(),
                    location: cell(row, "location").to_text(),
                    longitude: cell(row, "longitude").to_f64("longitude")?,
                    latitude: cell(row, "latitude").to_f64("latitude")?,
                })
            })
            .collect::<FewsResult<_>>()?;

        self.store(&key, &locations, None).await;
        Ok(locations)
    }

    /// Time series for (filter, location, parameter) within a date range.
    ///
    /// Never cached: the range makes keys unbounded and the data is live.
    pub async fn time_series(
        &self,
        source: &Source,
        filter_id: &str,
        location_id: &str,
        parameter_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> FewsResult<Vec<TimeSeriesPoint>> {
        let statement = format!(
            "select time, value, flag, detection, comment from extimeseries \
             where filterid='{}' and locationid='{}' and parameterid='{}' \
             and time between '{}' and '{}'",
            sql_quote(filter_id),
            sql_quote(location_id),
            sql_quote(parameter_id),
            format_jdbc(&start),
            format_jdbc(&end)
        );
        let rows = self.gateway.query(source, &statement).await?;
        let named = ops::named_rows(rows, &["time", "value", "flag", "detection", "comment"])?;

        named
            .iter()
            .map(|row| {
                Ok(TimeSeriesPoint {
                    time: parse_fews_timestamp(&cell(row, "time").to_text())?,
                    value: cell(row, "value").to_f64_opt("value")?,
                    flag: cell(row, "flag").to_text_opt(),
                    detection_limit: cell(row, "detection").to_text_opt(),
                    comment: cell(row, "comment").to_text_opt(),
                })
            })
            .collect()
    }

    /// Unit of a parameter. Assumes the remote returns one row.
    pub async fn unit(&self, source: &Source, parameter_id: &str) -> FewsResult<String> {
        let statement = format!(
            "select unit from parameters where id='{}'",
            sql_quote(parameter_id)
        );
        let rows = self.gateway.query(source, &statement).await?;
        let unit = first_cell(&rows)
            .ok_or_else(|| FewsError::NotFound(format!("unit of parameter '{}'", parameter_id)))?
            .to_text();
        Ok(unit)
    }

    /// Read and decode a cached value; backend failures count as misses.
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    Some(value)
                }
                Err(err) => {
                    warn!(key, error = %err, "dropping undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "cache read failed");
                None
            }
        }
    }

    /// Encode and store a value; backend failures only log.
    async fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let payload = match serde_json::to_vec(value) {
            Ok(payload) => Bytes::from(payload),
            Err(err) => {
                warn!(key, error = %err, "cache encode failed");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, payload, ttl).await {
            warn!(key, error = %err, "cache write failed");
        }
    }
}

fn degraded(err: &FewsError) -> FilterTree {
    let message = match err {
        FewsError::RemoteUnavailable { .. } => "FEWS endpoint not available.",
        _ => "FEWS data source not available.",
    };
    FilterTree::Degraded {
        message: message.to_string(),
        error: err.to_string(),
    }
}

static NULL_CELL: Scalar = Scalar::Null;

fn cell<'a>(row: &'a HashMap<String, Scalar>, column: &str) -> &'a Scalar {
    row.get(column).unwrap_or(&NULL_CELL)
}

fn first_cell(rows: &[Vec<Scalar>]) -> Option<&Scalar> {
    rows.first().and_then(|row| row.first())
}

/// Normalize a raw `parentid` cell into the typed parent reference.
///
/// Null and the `-999` sentinel both mean "top level".
fn parent_of(raw: &Scalar) -> Option<String> {
    if raw.is_null() || raw.as_i64() == Some(JDBC_NONE) {
        return None;
    }
    Some(raw.to_text())
}

fn filter_record(row: &HashMap<String, Scalar>) -> FilterRecord {
    FilterRecord {
        id: cell(row, "id").to_text(),
        name: cell(row, "name").to_text(),
        parent_id: parent_of(cell(row, "parentid")),
    }
}

/// Escape a value for embedding in a statement literal.
fn sql_quote(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_normalization() {
        assert_eq!(parent_of(&Scalar::Null), None);
        assert_eq!(parent_of(&Scalar::Int(-999)), None);
        assert_eq!(parent_of(&Scalar::Text("-999".into())), None);
        assert_eq!(parent_of(&Scalar::Text("f1".into())), Some("f1".into()));
        assert_eq!(parent_of(&Scalar::Int(12)), Some("12".into()));
    }

    #[test]
    fn test_sql_quote_doubles_single_quotes() {
        assert_eq!(sql_quote("O'Brien"), "O''Brien");
        assert_eq!(sql_quote("plain"), "plain");
    }

    #[test]
    fn test_degraded_message_distinguishes_failure_modes() {
        let unavailable = degraded(&FewsError::RemoteUnavailable {
            message: "dns".into(),
        });
        match unavailable {
            FilterTree::Degraded { message, .. } => {
                assert_eq!(message, "FEWS endpoint not available.")
            }
            _ => panic!("expected degraded"),
        }

        let query = degraded(&FewsError::RemoteQueryError {
            code: -1,
            statement: "q".into(),
        });
        match query {
            FilterTree::Degraded { message, error } => {
                assert_eq!(message, "FEWS data source not available.");
                assert!(error.contains("-1"));
            }
            _ => panic!("expected degraded"),
        }
    }
}
