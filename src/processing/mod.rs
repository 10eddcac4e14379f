// Processing module: record emission and statistic reduction
// Author: Gabriel Demetrios Lafis

mod emit;
mod reduce;
mod stats;

pub use emit::*;
pub use reduce::*;
pub use stats::*;

use thiserror::Error;

use crate::data::DataError;

/// Represents an error in the processing module
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Selector outside {median, stddev, minmax, percentile, skewness}
    #[error("Unknown function: {0}")]
    UnknownStatistic(String),

    /// A record line violated the key/value protocol; `line` is 1-based
    #[error("Protocol error on line {line}: {source}")]
    Protocol {
        line: usize,
        #[source]
        source: DataError,
    },

    #[error("No values to aggregate: the input contained no records")]
    EmptyValueSet,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
