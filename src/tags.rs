use std::collections::BTreeSet;

use crate::record::GraphRecord;

/// Every distinct tag across `records`, sorted ascending.
///
/// Recomputed on each call; the collection is small enough that no index is kept.
pub fn unique_sorted_tags(records: &[GraphRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.tags.iter().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
