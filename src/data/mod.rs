// Data module for records, value sets and dataset preprocessing
// Author: Gabriel Demetrios Lafis

mod csv;
mod record;
mod result;
mod value_set;

pub use csv::*;
pub use record::*;
pub use result::*;
pub use value_set::*;

use thiserror::Error;

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),

    /// A record line did not split into exactly two fields
    #[error("expected 2 tab-separated fields, found {0}")]
    FieldCount(usize),

    #[error("invalid numeric value '{0}'")]
    InvalidNumber(String),

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
