/**
This module matches the predicted records against the reference records, document by document,
and counts the true positives, false positives and false negatives of each document.
*/
use crate::annotation::{AnnotationRecord, Collection, MatchKey};
use crate::filter::LabelFilter;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Counts of true positives, false positives and false negatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tally {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

/// Sum of the tallies of every document.
pub type CorpusTally = Tally;

impl Tally {
    pub fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }
    /// Number of in-scope predicted records (TP + FP).
    pub fn predicted(&self) -> usize {
        self.true_positives + self.false_positives
    }
    /// Number of in-scope reference records (TP + FN).
    pub fn reference(&self) -> usize {
        self.true_positives + self.false_negatives
    }
}

impl Add for Tally {
    type Output = Tally;
    fn add(self, rhs: Self) -> Self::Output {
        Tally {
            true_positives: self.true_positives + rhs.true_positives,
            false_positives: self.false_positives + rhs.false_positives,
            false_negatives: self.false_negatives + rhs.false_negatives,
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs
    }
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Tally::default(), Add::add)
    }
}

impl<'a> Sum<&'a Tally> for Tally {
    fn sum<I: Iterator<Item = &'a Tally>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TP: {}, FP: {}, FN: {}",
            self.true_positives, self.false_positives, self.false_negatives
        )
    }
}

/// The tally of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentTally {
    pub document_id: String,
    pub tally: Tally,
}

/// In-scope keys of one document, split by collection.
#[derive(Default)]
struct DocumentKeys<'a> {
    reference: AHashSet<MatchKey<'a>>,
    predicted: AHashSet<MatchKey<'a>>,
}

impl<'a> DocumentKeys<'a> {
    fn insert(&mut self, collection: Collection, key: MatchKey<'a>) {
        match collection {
            Collection::Reference => self.reference.insert(key),
            Collection::Predicted => self.predicted.insert(key),
        };
    }

    fn tally(&self) -> Tally {
        let true_positives = self.predicted.intersection(&self.reference).count();
        Tally {
            true_positives,
            false_positives: self.predicted.len() - true_positives,
            false_negatives: self.reference.len() - true_positives,
        }
    }
}

/// Matches the records of both collections and returns one tally per document found in either
/// collection, in order of first appearance (reference records first, then predicted ones).
/// A document seen only through out-of-scope records still gets an all-zero tally.
///
/// The records are expected to be deduplicated, but the matching works on sets of keys so a
/// duplicated record is never counted twice.
pub fn match_documents(
    reference: &[AnnotationRecord],
    predicted: &[AnnotationRecord],
    filter: &LabelFilter,
) -> Vec<DocumentTally> {
    let mut documents: AHashMap<&str, DocumentKeys> = AHashMap::default();
    let mut order: Vec<&str> = Vec::new();
    for (collection, records) in [
        (Collection::Reference, reference),
        (Collection::Predicted, predicted),
    ] {
        for record in records {
            let document_id = record.document_id.as_str();
            let keys = documents.entry(document_id).or_insert_with(|| {
                order.push(document_id);
                DocumentKeys::default()
            });
            if filter.is_in_scope(record) {
                keys.insert(collection, record.match_key());
            }
        }
    }
    tracing::debug!(documents = order.len(), "matched reference and predicted records");
    order
        .into_iter()
        .map(|document_id| DocumentTally {
            document_id: document_id.to_string(),
            tally: documents
                .get(document_id)
                .map(DocumentKeys::tally)
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::record;
    use crate::dedup::deduplicate;
    use quickcheck::{QuickCheck, TestResult};
    use rstest::rstest;

    fn only_tally(tallies: &[DocumentTally]) -> Tally {
        assert_eq!(tallies.len(), 1);
        tallies[0].tally
    }

    #[test]
    fn test_exact_match() {
        let reference = vec![record("doc1", "PROC", 10, 20)];
        let predicted = vec![record("doc1", "PROC", 10, 20)];
        let tallies = match_documents(&reference, &predicted, &LabelFilter::NoFilter);
        assert_eq!(only_tally(&tallies), Tally::new(1, 0, 0));
        assert_eq!(tallies[0].document_id, "doc1");
    }

    #[rstest]
    #[case(record("doc1", "PROC", 10, 21))]
    #[case(record("doc1", "PROC", 9, 20))]
    #[case(record("doc1", "PROC", 11, 19))]
    #[case(record("doc1", "DISEASE", 10, 20))]
    fn test_near_miss_is_no_match(#[case] near_miss: AnnotationRecord) {
        let reference = vec![record("doc1", "PROC", 10, 20)];
        let tallies = match_documents(&reference, &[near_miss], &LabelFilter::NoFilter);
        assert_eq!(only_tally(&tallies), Tally::new(0, 1, 1));
    }

    #[test]
    fn test_informational_fields_do_not_matter() {
        let reference = vec![AnnotationRecord::new("doc1", "T1", "PROC", 10, 20, "biopsia")];
        let predicted = vec![AnnotationRecord::new("doc1", "T9", "PROC", 10, 20, "")];
        let tallies = match_documents(&reference, &predicted, &LabelFilter::NoFilter);
        assert_eq!(only_tally(&tallies), Tally::new(1, 0, 0));
    }

    #[test]
    fn test_label_filter_is_symmetric() {
        let reference = vec![record("doc1", "A", 0, 5), record("doc1", "B", 0, 5)];
        let predicted = vec![record("doc1", "A", 0, 5)];
        let tallies = match_documents(&reference, &predicted, &LabelFilter::filter_to(["B"]));
        assert_eq!(only_tally(&tallies), Tally::new(0, 0, 1));
    }

    #[test]
    fn test_empty_filter_gives_zero_tallies() {
        let reference = vec![record("doc1", "A", 0, 5)];
        let predicted = vec![record("doc2", "A", 0, 5)];
        let filter = LabelFilter::filter_to(Vec::<String>::new());
        let tallies = match_documents(&reference, &predicted, &filter);
        assert_eq!(tallies.len(), 2);
        assert!(tallies.iter().all(|t| t.tally == Tally::default()));
    }

    #[test]
    fn test_documents_in_one_collection_only() {
        let reference = vec![
            record("doc1", "PROC", 0, 5),
            record("doc2", "PROC", 0, 5),
            record("doc2", "PROC", 8, 12),
        ];
        let predicted = vec![record("doc1", "PROC", 0, 5), record("doc3", "PROC", 3, 4)];
        let tallies = match_documents(&reference, &predicted, &LabelFilter::NoFilter);
        let expected = vec![
            DocumentTally {
                document_id: String::from("doc1"),
                tally: Tally::new(1, 0, 0),
            },
            DocumentTally {
                document_id: String::from("doc2"),
                tally: Tally::new(0, 0, 2),
            },
            DocumentTally {
                document_id: String::from("doc3"),
                tally: Tally::new(0, 1, 0),
            },
        ];
        assert_eq!(tallies, expected);
    }

    #[test]
    fn test_same_span_in_other_document_is_no_match() {
        let reference = vec![record("doc1", "PROC", 0, 5)];
        let predicted = vec![record("doc2", "PROC", 0, 5)];
        let tallies = match_documents(&reference, &predicted, &LabelFilter::NoFilter);
        let total: Tally = tallies.iter().map(|t| &t.tally).sum();
        assert_eq!(total, Tally::new(0, 1, 1));
    }

    #[test]
    fn test_malformed_spans_are_opaque() {
        let reference = vec![record("doc1", "PROC", 20, 10), record("doc1", "PROC", 5, 5)];
        let predicted = vec![record("doc1", "PROC", 20, 10)];
        let tallies = match_documents(&reference, &predicted, &LabelFilter::NoFilter);
        assert_eq!(only_tally(&tallies), Tally::new(1, 0, 1));
    }

    #[test]
    fn test_no_records() {
        assert!(match_documents(&[], &[], &LabelFilter::NoFilter).is_empty());
    }

    #[test]
    fn test_tally_sum() {
        let tallies = [Tally::new(1, 2, 3), Tally::new(4, 5, 6)];
        let total: Tally = tallies.iter().sum();
        assert_eq!(total, Tally::new(5, 7, 9));
        assert_eq!(total.predicted(), 12);
        assert_eq!(total.reference(), 14);
        assert_eq!(total.to_string(), "TP: 5, FP: 7, FN: 9");
    }

    #[test]
    fn test_property_counts_match_in_scope_records() {
        fn counts(
            reference: Vec<AnnotationRecord>,
            predicted: Vec<AnnotationRecord>,
            filtered: bool,
        ) -> TestResult {
            let filter = if filtered {
                LabelFilter::filter_to(["PROC", "DISEASE"])
            } else {
                LabelFilter::NoFilter
            };
            let (reference, _) = deduplicate(reference, Collection::Reference);
            let (predicted, _) = deduplicate(predicted, Collection::Predicted);
            let tallies = match_documents(&reference, &predicted, &filter);
            for document in tallies.iter() {
                let in_scope = |records: &[AnnotationRecord]| {
                    records
                        .iter()
                        .filter(|r| r.document_id == document.document_id)
                        .filter(|r| filter.is_in_scope(r))
                        .count()
                };
                if document.tally.reference() != in_scope(&reference)
                    || document.tally.predicted() != in_scope(&predicted)
                {
                    return TestResult::failed();
                }
            }
            TestResult::passed()
        }
        let mut qc = QuickCheck::new().tests(1000);
        qc.quickcheck(
            counts
                as fn(
                    reference: Vec<AnnotationRecord>,
                    predicted: Vec<AnnotationRecord>,
                    filtered: bool,
                ) -> TestResult,
        )
    }
}
