//! Source configuration records.

use serde::{Deserialize, Serialize};

use crate::types::FilterRecord;

/// A configured remote tabular endpoint.
///
/// Read-only to the core; produced by a configuration provider and shared
/// across concurrent lookups. The custom filter, when present, is a typed
/// record list parsed from configuration. A source with a custom filter
/// never issues the remote filter query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Unique identity, used in cache keys.
    pub slug: String,
    /// Human-readable display name.
    pub name: String,
    /// Remote endpoint address.
    pub url: String,
    /// Config tag registered on the remote side before querying.
    pub tag_name: String,
    /// Value written for the tag on first use (connection payload).
    pub connector_string: String,
    /// Filter id to use as tree root instead of the top-level sentinel.
    /// Ignored when a custom filter is set.
    #[serde(default)]
    pub filter_tree_root: Option<String>,
    /// Literal filter records used instead of querying the remote server.
    #[serde(default)]
    pub custom_filter: Option<Vec<FilterRecord>>,
}

impl Source {
    pub fn has_custom_filter(&self) -> bool {
        self.custom_filter.is_some()
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{
            "slug": "demo",
            "name": "Demo source",
            "url": "http://fews.example.com:8080/xmlrpc",
            "tag_name": "demo-tag",
            "connector_string": "jdbc:vjdbc:rmi://fews:2000/VJdbc,FewsDataStore"
        }"#;
        let source: Source = serde_json::from_str(json).unwrap();
        assert_eq!(source.slug, "demo");
        assert_eq!(source.filter_tree_root, None);
        assert!(!source.has_custom_filter());
    }

    #[test]
    fn test_deserialize_custom_filter() {
        let json = r#"{
            "slug": "fixed",
            "name": "Fixed tree",
            "url": "http://fews.example.com:8080/xmlrpc",
            "tag_name": "fixed-tag",
            "connector_string": "jdbc:...",
            "custom_filter": [
                {"id": "a", "name": "Top", "parentid": null},
                {"id": "b", "name": "Child", "parentid": "a"}
            ]
        }"#;
        let source: Source = serde_json::from_str(json).unwrap();
        let records = source.custom_filter.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parent_id.as_deref(), Some("a"));
    }
}
