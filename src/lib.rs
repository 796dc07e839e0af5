/*!
This library evaluates span-level entity annotations, such as the output of a named entity
recognition model, against a gold standard. Both sets are given as annotation records grouped by
document, usually flattened from the BRAT standoff format into tab-separated rows.

# MATCHING
A predicted record is a true positive if and only if the reference holds a record with the same
document, the same label, the same start offset and the same end offset. There is no partial
credit: a span off by one character, or with another label, is a false positive *and* leaves the
reference record as a false negative.

Before matching, each collection is deduplicated on its own. Duplicates are collapsed, and the
evaluation returns a warning for each collection in which some were found. An optional label
filter restricts both collections to a set of labels.

# METRICS
Precision, recall and f1-score are micro-averaged: the true positives, false positives and false
negatives are summed over every document before dividing. The same formulas are applied to each
document on its own. A zero denominator always yields `0`.

# Terminology
* A document is identified by its `document_id` (the `filename` column of the TSV files).
* A label is the type of an entity, such as `PER` or `PROCEDIMIENTO`. Labels are compared byte for
    byte.
* A `MatchKey` is the tuple `(document_id, label, start_span, end_span)`.
*/

mod annotation;
mod config;
mod dedup;
mod filter;
mod loader;
mod matcher;
mod metrics;
mod reporter;

// The public api starts here
pub use annotation::{AnnotationRecord, Collection, MatchKey};

pub use config::{EvalConfig, EvalConfigBuilder};

pub use dedup::{deduplicate, DedupWarning};

pub use filter::LabelFilter;

pub use loader::{read_annotations, read_annotations_from_path, LoadError, REQUIRED_COLUMNS};

pub use matcher::{match_documents, CorpusTally, DocumentTally, Tally};

pub use metrics::{micro_average, per_document, Metrics};

pub use reporter::{DocumentReport, EvaluationReport, OVERALL_MICRO};

/// Main entrypoint of the library. This function deduplicates both collections, matches the
/// predicted records against the reference records and computes the micro-averaged metrics of
/// the corpus and of each document.
///
/// * `reference`: Gold standard records
/// * `predicted`: Predicted records
/// * `label_filter`: Labels to evaluate. `LabelFilter::NoFilter` evaluates every label.
///
/// # Example
/// ```rust
/// use spaneval::{evaluate, AnnotationRecord, LabelFilter, Metrics};
///
/// let reference = vec![
///     AnnotationRecord::new("doc1", "T1", "PROC", 10, 20, "biopsia"),
///     AnnotationRecord::new("doc1", "T2", "PROC", 10, 20, "biopsia"),
/// ];
/// let predicted = vec![AnnotationRecord::new("doc1", "T1", "PROC", 10, 21, "biopsia ")];
///
/// let report = evaluate(reference, predicted, LabelFilter::NoFilter);
///
/// assert_eq!(report.corpus_metrics(), Metrics::new(0., 0., 0.));
/// assert_eq!(report.warning_messages().len(), 1);
/// ```
pub fn evaluate(
    reference: Vec<AnnotationRecord>,
    predicted: Vec<AnnotationRecord>,
    label_filter: LabelFilter,
) -> EvaluationReport {
    let config = EvalConfigBuilder::new().label_filter(label_filter).build();
    evaluate_conf(reference, predicted, config)
}

/// Same as `evaluate`, but takes an `EvalConfig` struct, which can also turn on the parallel
/// computation of the per-document metrics.
///
/// * `reference`: Gold standard records
/// * `predicted`: Predicted records
/// * `config`: Parameters used to evaluate the records.
///
/// # Example
/// ```rust
/// use spaneval::{evaluate_conf, AnnotationRecord, EvalConfigBuilder, Tally};
///
/// let reference = vec![
///     AnnotationRecord::new("doc1", "T1", "A", 0, 5, "alpha"),
///     AnnotationRecord::new("doc1", "T2", "B", 0, 5, "alpha"),
/// ];
/// let predicted = vec![AnnotationRecord::new("doc1", "T1", "A", 0, 5, "alpha")];
/// let config = EvalConfigBuilder::new().labels(["B"]).parallel(true).build();
///
/// let report = evaluate_conf(reference, predicted, config);
///
/// assert_eq!(report.corpus_tally(), Tally::new(0, 0, 1));
/// ```
pub fn evaluate_conf(
    reference: Vec<AnnotationRecord>,
    predicted: Vec<AnnotationRecord>,
    config: EvalConfig,
) -> EvaluationReport {
    let (label_filter, parallel): (LabelFilter, bool) = config.into();
    let (reference, reference_warning) = deduplicate(reference, Collection::Reference);
    let (predicted, predicted_warning) = deduplicate(predicted, Collection::Predicted);
    let dedup_warnings: Vec<_> = [reference_warning, predicted_warning]
        .into_iter()
        .flatten()
        .collect();
    tracing::debug!(
        reference = reference.len(),
        predicted = predicted.len(),
        filter = %label_filter,
        "deduplicated records"
    );

    let tallies = match_documents(&reference, &predicted, &label_filter);
    let (corpus_tally, corpus_metrics) = micro_average(&tallies, parallel);
    let metrics = per_document(&tallies, parallel);
    let documents = tallies
        .into_iter()
        .zip(metrics)
        .map(|(document, metrics)| DocumentReport {
            document_id: document.document_id,
            tally: document.tally,
            metrics,
        })
        .collect();

    EvaluationReport {
        corpus_tally,
        corpus_metrics,
        documents,
        dedup_warnings,
    }
}
