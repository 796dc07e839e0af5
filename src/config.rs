/*
 * This modules contains the `EvalConfig` struct, which implements the default trait. This config
 * can be passed to the `evaluate_conf` function to simplify its arguments.
*/
use crate::filter::LabelFilter;
use std::fmt::Display;

#[derive(Clone, Debug, Eq, PartialEq, Default)]
/// Config struct used to simplify the inputs of parameters to the main functions of `spaneval`.
/// It implements the default trait: every label is evaluated, sequentially.
pub struct EvalConfig {
    /// Which labels take part in the evaluation. See `LabelFilter`.
    label_filter: LabelFilter,
    /// Can we use multiple cores to compute the per-document metrics? The results are the same
    /// either way. On small corpora it is better to *not* parallelize the computations.
    parallel: bool,
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn label_filter(&self) -> &LabelFilter {
        &self.label_filter
    }
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

impl From<EvalConfigBuilder> for EvalConfig {
    fn from(value: EvalConfigBuilder) -> Self {
        Self {
            label_filter: value.label_filter,
            parallel: value.parallel,
        }
    }
}

impl From<(LabelFilter, bool)> for EvalConfig {
    fn from(value: (LabelFilter, bool)) -> Self {
        Self {
            label_filter: value.0,
            parallel: value.1,
        }
    }
}

impl From<EvalConfig> for (LabelFilter, bool) {
    fn from(value: EvalConfig) -> Self {
        (value.label_filter, value.parallel)
    }
}

impl Display for EvalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Evaluated labels: {}\n Using parallel computations: {}",
            self.label_filter, self.parallel
        )
    }
}

/// This builder can be used to build and customize an `EvalConfig` stucture.
#[derive(Clone, Debug, Default)]
pub struct EvalConfigBuilder {
    label_filter: LabelFilter,
    parallel: bool,
}

impl EvalConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn label_filter(mut self, label_filter: LabelFilter) -> Self {
        self.label_filter = label_filter;
        self
    }
    /// Shorthand for `label_filter(LabelFilter::filter_to(labels))`.
    pub fn labels<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label_filter(LabelFilter::filter_to(labels))
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn build(self) -> EvalConfig {
        EvalConfig::from(self)
    }
}
