/**
This modules holds the result of an evaluation and gives a few tools to prettyprint it.
*/
use crate::dedup::DedupWarning;
use crate::matcher::{CorpusTally, Tally};
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Name of the row holding the corpus metrics when the report is displayed.
pub const OVERALL_MICRO: &str = "Overall_Micro";

/// The report holds the corpus metrics, the metrics of each document and the warnings issued
/// while deduplicating the inputs. It can be displayed as if it was collected into a dataframe
/// and it can be serialized. The report is built with the `evaluate` function.
///
/// # Example
///
/// ```rust
/// use spaneval::{evaluate, AnnotationRecord, LabelFilter};
///
/// let reference = vec![
///     AnnotationRecord::new("doc1", "T1", "PROC", 10, 20, "biopsia"),
///     AnnotationRecord::new("doc2", "T1", "PROC", 0, 4, "tac"),
/// ];
/// let predicted = vec![AnnotationRecord::new("doc1", "T1", "PROC", 10, 20, "biopsia")];
///
/// let report = evaluate(reference, predicted, LabelFilter::NoFilter);
///
/// let expected_report = "Document, Precision, Recall, Fscore, TP, FP, FN
/// Overall_Micro, 1, 0.5, 0.6666666666666666, 1, 0, 1
/// doc1, 1, 1, 1, 1, 0, 0
/// doc2, 0, 0, 0, 0, 0, 1\n";
///
/// assert_eq!(expected_report, report.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub(crate) corpus_tally: CorpusTally,
    pub(crate) corpus_metrics: Metrics,
    pub(crate) documents: Vec<DocumentReport>,
    pub(crate) dedup_warnings: Vec<DedupWarning>,
}

/// Tally and metrics of a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub document_id: String,
    pub tally: Tally,
    pub metrics: Metrics,
}

impl EvaluationReport {
    /// Micro-averaged metrics of the whole corpus.
    pub fn corpus_metrics(&self) -> Metrics {
        self.corpus_metrics
    }

    /// Tally summed over every document.
    pub fn corpus_tally(&self) -> CorpusTally {
        self.corpus_tally
    }

    /// Documents in order of first appearance in the inputs, reference first.
    pub fn documents(&self) -> &[DocumentReport] {
        &self.documents
    }

    /// Metrics of each document, in the same order as `documents`.
    pub fn per_document_metrics(&self) -> impl Iterator<Item = (&str, Metrics)> + '_ {
        self.documents
            .iter()
            .map(|d| (d.document_id.as_str(), d.metrics))
    }

    /// Looks up a single document.
    pub fn document(&self, document_id: &str) -> Option<&DocumentReport> {
        self.documents.iter().find(|d| d.document_id == document_id)
    }

    pub fn dedup_warnings(&self) -> &[DedupWarning] {
        &self.dedup_warnings
    }

    /// The deduplication warnings as messages, reference collection first.
    pub fn warning_messages(&self) -> Vec<String> {
        self.dedup_warnings.iter().map(|w| w.to_string()).collect()
    }

    /// Writes only the corpus row. This is the short summary printed by default.
    pub fn summary(&self) -> String {
        format!(
            "Micro-average Precision: {}\nMicro-average Recall: {}\nMicro-average F1 score: {}\n",
            self.corpus_metrics.precision, self.corpus_metrics.recall, self.corpus_metrics.f1
        )
    }
}

fn write_row(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    metrics: &Metrics,
    tally: &Tally,
) -> std::fmt::Result {
    writeln!(
        f,
        "{}, {}, {}, {}, {}, {}, {}",
        name,
        metrics.precision,
        metrics.recall,
        metrics.f1,
        tally.true_positives,
        tally.false_positives,
        tally.false_negatives
    )
}

/// The report acts as a dataframe when displayed. The first row holds the corpus metrics.
impl Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Document, Precision, Recall, Fscore, TP, FP, FN")?;
        write_row(f, OVERALL_MICRO, &self.corpus_metrics, &self.corpus_tally)?;
        for document in self.documents.iter() {
            write_row(f, &document.document_id, &document.metrics, &document.tally)?
        }
        Ok(())
    }
}

/// The document report acts as a line in a dataframe when displayed.
impl Display for DocumentReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}, {}",
            self.document_id,
            self.metrics.precision,
            self.metrics.recall,
            self.metrics.f1,
            self.tally.true_positives,
            self.tally.false_positives,
            self.tally.false_negatives
        )
    }
}
