//! Canonical fixtures shared by gateway and resolver tests.

use fews_common::{FilterRecord, Scalar, Source};

/// A plain source without custom filter or root override.
pub fn sample_source() -> Source {
    Source {
        slug: "demo".to_string(),
        name: "Demo source".to_string(),
        url: "http://fews.example.com:8080/xmlrpc".to_string(),
        tag_name: "demo-tag".to_string(),
        connector_string: "jdbc:vjdbc:rmi://fews:2000/VJdbc,FewsDataStore".to_string(),
        filter_tree_root: None,
        custom_filter: None,
    }
}

/// A source whose filter tree comes from configuration, not the remote.
pub fn custom_filter_source() -> Source {
    Source {
        slug: "fixed".to_string(),
        custom_filter: Some(vec![
            FilterRecord::new("a", "Top", None),
            FilterRecord::new("b", "Child", Some("a")),
            FilterRecord::new("c", "Sibling", Some("a")),
        ]),
        ..sample_source()
    }
}

/// Remote filter rows for the canonical two-node tree:
/// "Rivers" at the top with "Lake A" below it.
pub fn filter_rows() -> Vec<Vec<Scalar>> {
    vec![
        vec!["1".into(), "Rivers".into(), Scalar::Null],
        vec!["2".into(), "Lake A".into(), "1".into()],
    ]
}
