//! Filter tree construction from flat records.

use std::collections::HashSet;

use fews_common::{FilterNode, FilterRecord};

/// Build a forest from flat records.
///
/// Records whose `parent_id` equals `root_parent` start the top-level
/// sequence; children keep the input order. A record whose parent never
/// resolves to a built ancestor is an orphan and is silently dropped.
/// Records that would become their own ancestor are dropped the same way,
/// so malformed input cannot recurse forever.
pub fn build_tree(records: &[FilterRecord], root_parent: Option<&str>) -> Vec<FilterNode> {
    let mut path = HashSet::new();
    build_children(records, root_parent, &mut path)
}

fn build_children(
    records: &[FilterRecord],
    parent: Option<&str>,
    path: &mut HashSet<String>,
) -> Vec<FilterNode> {
    let mut nodes = Vec::new();
    for record in records.iter().filter(|r| r.parent_id.as_deref() == parent) {
        if !path.insert(record.id.clone()) {
            continue;
        }
        let children = build_children(records, Some(&record.id), path);
        path.remove(&record.id);
        nodes.push(FilterNode::new(
            record.id.clone(),
            record.name.clone(),
            children,
        ));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, parent: Option<&str>) -> FilterRecord {
        FilterRecord::new(id, name, parent)
    }

    #[test]
    fn test_two_level_tree() {
        let records = vec![
            record("1", "Rivers", None),
            record("2", "Lake A", Some("1")),
        ];
        let tree = build_tree(&records, None);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, "1");
        assert_eq!(tree[0].name, "Rivers");
        assert!(!tree[0].is_leaf);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].id, "2");
        assert!(tree[0].children[0].is_leaf);
    }

    #[test]
    fn test_children_keep_input_order() {
        let records = vec![
            record("r", "Root", None),
            record("z", "Zulu", Some("r")),
            record("a", "Alpha", Some("r")),
            record("m", "Mike", Some("r")),
        ];
        let tree = build_tree(&records, None);
        let order: Vec<&str> = tree[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_orphans_are_dropped_not_an_error() {
        let records = vec![
            record("a", "A", None),
            record("b", "B", Some("missing")),
        ];
        let tree = build_tree(&records, None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, "a");
    }

    #[test]
    fn test_leaf_set_is_records_without_children() {
        let records = vec![
            record("1", "Top", None),
            record("2", "Mid", Some("1")),
            record("3", "Leaf A", Some("2")),
            record("4", "Leaf B", Some("1")),
        ];
        let tree = build_tree(&records, None);
        let leaves: Vec<&str> = tree
            .iter()
            .flat_map(|n| n.leaves())
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(leaves, vec!["3", "4"]);
    }

    #[test]
    fn test_explicit_root_parent() {
        let records = vec![
            record("sub1", "Sub one", Some("F")),
            record("sub2", "Sub two", Some("sub1")),
            record("other", "Elsewhere", None),
        ];
        let tree = build_tree(&records, Some("F"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, "sub1");
        assert_eq!(tree[0].children[0].id, "sub2");
    }

    #[test]
    fn test_self_parent_does_not_recurse() {
        let records = vec![
            record("x", "Loop", None),
            record("x", "Loop", Some("x")),
        ];
        let tree = build_tree(&records, None);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_depth_matches_parent_chain() {
        let records = vec![
            record("1", "a", None),
            record("2", "b", Some("1")),
            record("3", "c", Some("2")),
        ];
        let tree = build_tree(&records, None);
        assert_eq!(tree[0].children[0].children[0].id, "3");
        assert!(tree[0].children[0].children[0].is_leaf);
    }
}
