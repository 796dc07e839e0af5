/**
This module turns tallies into precision, recall and f1-score. Every division goes through
`prf_divide`, which returns `0` where the denominator is `0`. No metric is ever `NaN` or infinite.
*/
use crate::matcher::{CorpusTally, DocumentTally, Tally};
use itertools::multizip;
use ndarray::{array, Array1};
use num::Num;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Precision, recall and f1-score of a document or of the whole corpus.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Metrics {
    pub fn new(precision: f64, recall: f64, f1: f64) -> Self {
        Self {
            precision,
            recall,
            f1,
        }
    }
}

impl From<Tally> for Metrics {
    fn from(value: Tally) -> Self {
        prf_metrics(&[value], false)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Precision: {}, Recall: {}, F1: {}",
            self.precision, self.recall, self.f1
        )
    }
}

/// Divides `numerator` by `denominator` element-wise. Where the denominator is `0`, the result is
/// `0`. The zeros of the denominator are replaced by ones before dividing and the quotient is then
/// multiplied by a mask holding `0` at those positions.
///
/// * `numerator`: Numerator of the division
/// * `denominator`: Denominator of the division
/// * `parallel`: Replace the zeros of the denominator on the rayon thread pool
fn prf_divide<I: Num + Copy + Send + Sync>(
    numerator: Array1<I>,
    mut denominator: Array1<I>,
    parallel: bool,
) -> Array1<I> {
    let zero_mask = denominator.mapv(|d| if d == I::zero() { I::zero() } else { I::one() });
    if parallel {
        denominator.par_mapv_inplace(|d| if d == I::zero() { I::one() } else { d });
    } else {
        denominator.mapv_inplace(|d| if d == I::zero() { I::one() } else { d });
    }
    numerator / denominator * zero_mask
}

/// Computes the metrics of every tally, independently of each other.
fn prf_metrics(tallies: &[Tally], parallel: bool) -> Vec<Metrics> {
    let tp_sum = Array1::from_iter(tallies.iter().map(|t| t.true_positives as f64));
    let pred_sum = Array1::from_iter(tallies.iter().map(|t| t.predicted() as f64));
    let true_sum = Array1::from_iter(tallies.iter().map(|t| t.reference() as f64));

    let precision = prf_divide(tp_sum.clone(), pred_sum, parallel);
    let recall = prf_divide(tp_sum, true_sum, parallel);
    let f1 = prf_divide(
        &precision * &recall * 2.0,
        &precision + &recall,
        parallel,
    );
    multizip((precision.iter(), recall.iter(), f1.iter()))
        .map(|(p, r, f)| Metrics::new(*p, *r, *f))
        .collect()
}

/// Micro-average over the corpus: the tallies are summed first and the metrics are computed on the
/// sums. This is *not* the mean of the per-document metrics.
pub fn micro_average(tallies: &[DocumentTally], parallel: bool) -> (CorpusTally, Metrics) {
    let corpus: CorpusTally = tallies.iter().map(|d| &d.tally).sum();
    let tp_sum = array![corpus.true_positives as f64];
    let pred_sum = array![corpus.predicted() as f64];
    let true_sum = array![corpus.reference() as f64];
    let precision = prf_divide(tp_sum.clone(), pred_sum, parallel)[0];
    let recall = prf_divide(tp_sum, true_sum, parallel)[0];
    let f1 = prf_divide(
        array![2.0 * precision * recall],
        array![precision + recall],
        parallel,
    )[0];
    (corpus, Metrics::new(precision, recall, f1))
}

/// Metrics of each document, in the order of `tallies`.
pub fn per_document(tallies: &[DocumentTally], parallel: bool) -> Vec<Metrics> {
    let inner: Vec<Tally> = tallies.iter().map(|d| d.tally).collect();
    prf_metrics(&inner, parallel)
}
