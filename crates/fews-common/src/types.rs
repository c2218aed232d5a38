//! Domain types served to presentation layers.

use serde::{Deserialize, Serialize};

/// One flat filter record as stored remotely or in a custom filter list.
///
/// `parent_id` of `None` marks a top-level record. Ids are not guaranteed
/// unique by the remote source; the resolver de-duplicates full records
/// before tree building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRecord {
    pub id: String,
    pub name: String,
    /// Owning filter id, or None for a top-level record.
    #[serde(default, alias = "parentid")]
    pub parent_id: Option<String>,
}

impl FilterRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(String::from),
        }
    }
}

/// A node in the built filter hierarchy.
///
/// Invariant: `is_leaf` is true iff `children` is empty. Leaves are the
/// nodes a caller turns into parameter lookups; the node's `id` is the
/// reusable reference for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterNode {
    pub id: String,
    pub name: String,
    pub children: Vec<FilterNode>,
    pub is_leaf: bool,
}

impl FilterNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, children: Vec<FilterNode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_leaf: children.is_empty(),
            children,
        }
    }

    /// Depth-first walk collecting the leaf nodes of this subtree.
    pub fn leaves(&self) -> Vec<&FilterNode> {
        if self.is_leaf {
            return vec![self];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }
}

/// A measurable quantity scoped to one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the owning filter.
    pub name: String,
    pub parameter_id: String,
    /// Display name of the parameter.
    pub parameter: String,
}

/// A geographic point scoped to a (filter, parameter) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: String,
    /// Display name of the location.
    pub location: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// One timestamped measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub time: chrono::DateTime<chrono::Utc>,
    /// Measured value; None when the remote reports a gap.
    pub value: Option<f64>,
    pub flag: Option<String>,
    pub detection_limit: Option<String>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_invariant() {
        let leaf = FilterNode::new("2", "Lake A", vec![]);
        assert!(leaf.is_leaf);
        let parent = FilterNode::new("1", "Rivers", vec![leaf]);
        assert!(!parent.is_leaf);
        assert_eq!(parent.leaves().len(), 1);
        assert_eq!(parent.leaves()[0].id, "2");
    }

    #[test]
    fn test_filter_record_parentid_alias() {
        // Custom filter lists use the remote column spelling.
        let record: FilterRecord =
            serde_json::from_str(r#"{"id": "f1", "name": "Rivers", "parentid": null}"#).unwrap();
        assert_eq!(record.parent_id, None);

        let child: FilterRecord =
            serde_json::from_str(r#"{"id": "f2", "name": "Lake", "parentid": "f1"}"#).unwrap();
        assert_eq!(child.parent_id.as_deref(), Some("f1"));
    }
}
