//! Row mapping operations on raw remote result sets.

use std::collections::HashMap;

use fews_common::{FewsError, FewsResult, Scalar};

/// Drop rows that are exact duplicates of an earlier row.
///
/// First occurrence wins; the relative order of distinct rows is
/// preserved. The remote source does not guarantee unique rows, so this
/// runs before any mapping step.
pub fn dedup(rows: Vec<Vec<Scalar>>) -> Vec<Vec<Scalar>> {
    let mut unique: Vec<Vec<Scalar>> = Vec::with_capacity(rows.len());
    for row in rows {
        if !unique.contains(&row) {
            unique.push(row);
        }
    }
    unique
}

/// Zip each row positionally with the given column names.
///
/// Fails with `SchemaMismatch` when any row's arity differs from the
/// column count; that means the remote answered a different shape than
/// the statement asked for.
pub fn named_rows(
    rows: Vec<Vec<Scalar>>,
    columns: &[&str],
) -> FewsResult<Vec<HashMap<String, Scalar>>> {
    rows.into_iter()
        .map(|row| {
            if row.len() != columns.len() {
                return Err(FewsError::SchemaMismatch {
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            Ok(columns
                .iter()
                .map(|c| c.to_string())
                .zip(row)
                .collect::<HashMap<String, Scalar>>())
        })
        .collect()
}
