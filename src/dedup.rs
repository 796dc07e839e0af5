/**
Removal of duplicated records inside a single collection. Two records are duplicates when they
share their `MatchKey`. The first occurrence is kept, so the order of the collection is preserved.
*/
use crate::annotation::{AnnotationRecord, Collection, MatchKey};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::fmt::Display;

/// Emitted when duplicated records were collapsed. This is not an error: the evaluation goes on
/// with the deduplicated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupWarning {
    /// Collection in which the duplicates were found.
    pub collection: Collection,
    /// Number of records removed.
    pub removed: usize,
    /// Among the removed records, how many had a `text` or an `annotation_id` different from
    /// the record that was kept. These are often deliberate re-annotations rather than copies.
    pub conflicting: usize,
}

impl Display for DedupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Duplicated entries found and removed in the {} collection: {} record(s) collapsed",
            self.collection, self.removed
        )?;
        if self.conflicting > 0 {
            write!(
                f,
                " ({} with a different text or annotation id than the record kept)",
                self.conflicting
            )?;
        }
        Ok(())
    }
}

/// Removes the records sharing a `MatchKey` with an earlier record of the same collection.
/// Returns the deduplicated records and, if anything was removed, a warning describing it.
pub fn deduplicate(
    records: Vec<AnnotationRecord>,
    collection: Collection,
) -> (Vec<AnnotationRecord>, Option<DedupWarning>) {
    let mut first_seen: AHashMap<MatchKey<'_>, usize> = AHashMap::with_capacity(records.len());
    let mut keep = Vec::with_capacity(records.len());
    let mut conflicting = 0;
    for (index, record) in records.iter().enumerate() {
        match first_seen.entry(record.match_key()) {
            Entry::Occupied(kept) => {
                if !records[*kept.get()].same_annotation(record) {
                    conflicting += 1;
                }
                keep.push(false);
            }
            Entry::Vacant(slot) => {
                slot.insert(index);
                keep.push(true);
            }
        }
    }
    let removed = keep.iter().filter(|k| !**k).count();
    let deduplicated: Vec<_> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, kept)| kept.then_some(record))
        .collect();
    let warning = (removed > 0).then_some(DedupWarning {
        collection,
        removed,
        conflicting,
    });
    (deduplicated, warning)
}
