use crate::annotation::AnnotationRecord;
use ahash::AHashSet;
use std::collections::BTreeSet;
use std::fmt::Display;

/// Selects the labels taking part in the evaluation. The filter is applied to the reference and
/// to the predicted records alike: an excluded predicted record is never a false positive and an
/// excluded reference record is never a false negative.
///
/// Labels are compared byte for byte. `FilterTo` with an empty set keeps nothing, which is not the
/// same as `NoFilter`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LabelFilter {
    /// Every record is in scope.
    #[default]
    NoFilter,
    /// Only the records whose label is in the set are in scope.
    FilterTo(AHashSet<String>),
}

impl LabelFilter {
    /// Builds a `FilterTo` variant from any list of labels.
    pub fn filter_to<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FilterTo(labels.into_iter().map(Into::into).collect())
    }

    pub fn is_label_in_scope(&self, label: &str) -> bool {
        match self {
            Self::NoFilter => true,
            Self::FilterTo(labels) => labels.contains(label),
        }
    }

    pub fn is_in_scope(&self, record: &AnnotationRecord) -> bool {
        self.is_label_in_scope(&record.label)
    }
}

/// `None` means no filtering. `Some` of an empty list means that nothing is in scope.
impl<S: Into<String>> From<Option<Vec<S>>> for LabelFilter {
    fn from(value: Option<Vec<S>>) -> Self {
        match value {
            None => Self::NoFilter,
            Some(labels) => Self::filter_to(labels),
        }
    }
}

impl Display for LabelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFilter => write!(f, "all labels"),
            Self::FilterTo(labels) => {
                // sorted, the hash set order is random
                let sorted: BTreeSet<_> = labels.iter().collect();
                write!(f, "{:?}", sorted)
            }
        }
    }
}
