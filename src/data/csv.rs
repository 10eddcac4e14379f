// CSV column extraction into one-value-per-line emitter input
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::{debug, info};

use super::DataError;
use crate::utils::parse_finite;

/// Counts reported by a column extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub rows: usize,
    pub written: usize,
    pub skipped: usize,
}

/// Extracts a single numeric column from a headered CSV dataset
pub struct ColumnExtractor {
    column: String,
    multiplier: Option<String>,
    positive_only: bool,
    exclusions: Vec<(String, String)>,
    required: Vec<String>,
    delimiter: u8,
}

impl ColumnExtractor {
    /// Create a new extractor for the named column
    pub fn new<S: Into<String>>(column: S) -> Self {
        ColumnExtractor {
            column: column.into(),
            multiplier: None,
            positive_only: false,
            exclusions: Vec::new(),
            required: Vec::new(),
            delimiter: b',',
        }
    }

    /// Multiply each value by the value of a second column in the same row
    pub fn times<S: Into<String>>(mut self, column: S) -> Self {
        self.multiplier = Some(column.into());
        self
    }

    /// Drop values that are zero or negative
    pub fn positive_only(mut self, positive_only: bool) -> Self {
        self.positive_only = positive_only;
        self
    }

    /// Drop rows whose `column` starts with `prefix`, e.g. cancelled invoices
    /// marked with a leading `C`
    pub fn exclude_prefix<C: Into<String>, P: Into<String>>(mut self, column: C, prefix: P) -> Self {
        self.exclusions.push((column.into(), prefix.into()));
        self
    }

    /// Drop rows where `column` is empty
    pub fn require<S: Into<String>>(mut self, column: S) -> Self {
        self.required.push(column.into());
        self
    }

    /// Set the field delimiter byte
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Extract from a CSV file on disk
    pub fn extract_file<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        output: W,
    ) -> Result<ExtractSummary, DataError> {
        let file = File::open(path.as_ref())?;
        info!("Reading dataset from {}", path.as_ref().display());
        self.extract(BufReader::new(file), output)
    }

    /// Extract from any CSV reader, writing one value per line
    pub fn extract<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<ExtractSummary, DataError> {
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(input);

        let headers = csv_reader.headers()?.clone();
        let col_idx = Self::find_column(&headers, &self.column)?;
        let multiplier_idx = match &self.multiplier {
            Some(name) => Some(Self::find_column(&headers, name)?),
            None => None,
        };
        let exclusions = self.exclusions
            .iter()
            .map(|(name, prefix)| Self::find_column(&headers, name).map(|idx| (idx, prefix.as_str())))
            .collect::<Result<Vec<_>, DataError>>()?;
        let required = self.required
            .iter()
            .map(|name| Self::find_column(&headers, name))
            .collect::<Result<Vec<_>, DataError>>()?;

        let mut summary = ExtractSummary::default();

        for result in csv_reader.records() {
            let record = result?;
            summary.rows += 1;

            let incomplete = required
                .iter()
                .any(|&idx| record.get(idx).map_or(true, |field| field.trim().is_empty()));
            let excluded = exclusions
                .iter()
                .any(|&(idx, prefix)| record.get(idx).map_or(false, |field| field.trim().starts_with(prefix)));
            if incomplete || excluded {
                debug!("Filtering out row {}", summary.rows);
                summary.skipped += 1;
                continue;
            }

            let value = record.get(col_idx).and_then(parse_finite);
            let value = match (value, multiplier_idx) {
                (Some(v), Some(idx)) => record.get(idx).and_then(parse_finite).map(|m| v * m),
                (value, None) => value,
                (None, Some(_)) => None,
            };

            match value {
                Some(v) if v.is_finite() && (!self.positive_only || v > 0.0) => {
                    writeln!(output, "{}", v)?;
                    summary.written += 1;
                }
                _ => {
                    debug!("Skipping row {} of column '{}'", summary.rows, self.column);
                    summary.skipped += 1;
                }
            }
        }

        output.flush()?;
        info!(
            "Extracted {} of {} rows from column '{}'",
            summary.written, summary.rows, self.column
        );

        Ok(summary)
    }

    fn find_column(headers: &::csv::StringRecord, name: &str) -> Result<usize, DataError> {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }
}
