/**
Records handed to the evaluation by the loader, and the key used to match them.
*/
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A single labeled span of a document, as found in a gold standard or in the output of a model.
/// Only the document, the label and the offsets take part in the matching. The `text` and the
/// `annotation_id` are carried along for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Identifier of the source document (the `filename` column of the TSV files).
    pub document_id: String,
    /// Identifier of the annotation in its source (the `ann_id` column).
    pub annotation_id: String,
    /// Entity type, such as `PROCEDIMIENTO` or `PER`.
    pub label: String,
    /// Character offset of the first character of the span.
    pub start_span: usize,
    /// Character offset one past the last character of the span.
    pub end_span: usize,
    /// Annotated substring.
    pub text: String,
}

impl AnnotationRecord {
    pub fn new(
        document_id: impl Into<String>,
        annotation_id: impl Into<String>,
        label: impl Into<String>,
        start_span: usize,
        end_span: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            annotation_id: annotation_id.into(),
            label: label.into(),
            start_span,
            end_span,
            text: text.into(),
        }
    }

    /// Key under which this record is matched against the other collection.
    pub fn match_key(&self) -> MatchKey<'_> {
        MatchKey {
            document_id: &self.document_id,
            label: &self.label,
            start: self.start_span,
            end: self.end_span,
        }
    }

    /// Two records are the *same annotation* if they agree on their key and on their
    /// informational fields.
    pub(crate) fn same_annotation(&self, other: &Self) -> bool {
        self.match_key() == other.match_key()
            && self.text == other.text
            && self.annotation_id == other.annotation_id
    }
}

impl Display for AnnotationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {:?})",
            self.document_id, self.label, self.start_span, self.end_span, self.text
        )
    }
}

/// The tuple `(document_id, label, start, end)`. A predicted record matches a reference record
/// if and only if their keys are equal. There is no tolerance on the offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey<'a> {
    pub document_id: &'a str,
    pub label: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Display for MatchKey<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.document_id, self.label, self.start, self.end
        )
    }
}

/// Which side of the evaluation a set of records comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Reference,
    Predicted,
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Predicted => write!(f, "predicted"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use quickcheck::Arbitrary;

    const DOCUMENTS: [&str; 3] = ["doc1", "doc2", "doc3"];
    const LABELS: [&str; 3] = ["PROC", "DISEASE", "SYMPTOM"];
    const TEXTS: [&str; 2] = ["biopsia", "fiebre"];

    /// Records drawn from a very small universe, so that random collections contain matches and
    /// duplicates often enough to be interesting.
    impl quickcheck::Arbitrary for AnnotationRecord {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let start = *g.choose(&[0usize, 10, 20]).unwrap();
            let length = *g.choose(&[5usize, 10]).unwrap();
            AnnotationRecord::new(
                *g.choose(&DOCUMENTS).unwrap(),
                format!("T{}", u8::arbitrary(g) % 4),
                *g.choose(&LABELS).unwrap(),
                start,
                start + length,
                *g.choose(&TEXTS).unwrap(),
            )
        }
    }

    /// Shorthand used across the test modules of the crate.
    pub(crate) fn record(doc: &str, label: &str, start: usize, end: usize) -> AnnotationRecord {
        AnnotationRecord::new(doc, "T1", label, start, end, "text")
    }

    #[test]
    fn test_match_key_ignores_informational_fields() {
        let a = AnnotationRecord::new("doc1", "T1", "PROC", 10, 20, "biopsia");
        let b = AnnotationRecord::new("doc1", "T7", "PROC", 10, 20, "Biopsia");
        assert_eq!(a.match_key(), b.match_key());
        assert!(!a.same_annotation(&b));
    }

    #[test]
    fn test_match_key_is_exact_on_offsets() {
        let a = record("doc1", "PROC", 10, 20);
        let b = record("doc1", "PROC", 10, 21);
        assert_ne!(a.match_key(), b.match_key());
    }

    #[test]
    fn test_display() {
        let a = record("doc1", "PROC", 10, 20);
        assert_eq!(a.match_key().to_string(), "(doc1, PROC, 10, 20)");
        assert_eq!(a.to_string(), "(doc1, PROC, 10, 20, \"text\")");
        assert_eq!(Collection::Predicted.to_string(), "predicted");
    }
}
