/**
Loading of annotation records from tab-separated files. Each file has a header row naming at least
the columns `filename`, `ann_id`, `label`, `start_span`, `end_span` and `text`, in any order. Other
columns are ignored. Fields are never quoted and empty fields are kept as empty strings.
*/
use crate::annotation::AnnotationRecord;
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Columns every input file must have.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "filename",
    "ann_id",
    "label",
    "start_span",
    "end_span",
    "text",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed tab-separated input: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column `{0}` in the header row")]
    MissingColumn(&'static str),
    #[error("line {line}: `{column}` is not a character offset: {value:?}")]
    InvalidOffset {
        line: u64,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawRow<'a> {
    filename: &'a str,
    ann_id: &'a str,
    label: &'a str,
    start_span: &'a str,
    end_span: &'a str,
    text: &'a str,
}

fn parse_offset(value: &str, column: &'static str, line: u64) -> Result<usize, LoadError> {
    value
        .trim()
        .parse()
        .map_err(|_| LoadError::InvalidOffset {
            line,
            column,
            value: String::from(value),
        })
}

impl<'a> RawRow<'a> {
    fn into_record(self, line: u64) -> Result<AnnotationRecord, LoadError> {
        Ok(AnnotationRecord {
            document_id: String::from(self.filename),
            annotation_id: String::from(self.ann_id),
            label: String::from(self.label),
            start_span: parse_offset(self.start_span, "start_span", line)?,
            end_span: parse_offset(self.end_span, "end_span", line)?,
            text: String::from(self.text),
        })
    }
}

/// Reads every record of a tab-separated input, in file order. Spans are not validated: a record
/// whose start is not before its end is loaded as is.
pub fn read_annotations<R: io::Read>(reader: R) -> Result<Vec<AnnotationRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(LoadError::MissingColumn(missing));
    }
    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawRow = row.deserialize(Some(&headers))?;
        records.push(raw.into_record(line)?);
    }
    tracing::debug!(records = records.len(), "loaded annotation records");
    Ok(records)
}

/// Same as `read_annotations`, reading from a file.
pub fn read_annotations_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<AnnotationRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_annotations(io::BufReader::new(file))
}
