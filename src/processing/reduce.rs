// Aggregation engine (reducer stage)
// Author: Gabriel Demetrios Lafis

use std::io::{BufRead, Write};

use log::info;

use crate::data::{DataError, Record, ResultLine, ValueSet};
use super::{ProcessingError, Statistic, StatsProcessor};

/// Outcome of a completed reducer run
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceOutcome {
    pub result: ResultLine,
    pub records: usize,
}

/// Consumes key/value records and reports one statistic over their values.
///
/// Each run owns its value set; a reducer can be reused and carries nothing
/// from one run to the next.
#[derive(Debug, Clone)]
pub struct Reducer {
    processor: StatsProcessor,
}

impl Reducer {
    /// Create a new reducer for the given statistic
    pub fn new(processor: StatsProcessor) -> Self {
        Reducer { processor }
    }

    /// Create a reducer from a command-line selector (case-insensitive)
    pub fn from_selector(selector: &str) -> Result<Self, ProcessingError> {
        let statistic: Statistic = selector.parse()?;
        Ok(Reducer::new(StatsProcessor::new(statistic)))
    }

    pub fn statistic(&self) -> Statistic {
        self.processor.statistic()
    }

    /// Read records until end of input and collect their values.
    ///
    /// The first line that is not exactly `<key>\t<number>` aborts the run.
    /// Keys are not compared; grouping is the shuffle stage's job.
    pub fn ingest<R: BufRead>(&self, mut input: R) -> Result<ValueSet, ProcessingError> {
        let mut values = ValueSet::new();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = std::str::from_utf8(&buf).map_err(|e| ProcessingError::Protocol {
                line: line_no,
                source: DataError::ParseError(e.to_string()),
            })?;
            let record = Record::parse_line(line).map_err(|source| ProcessingError::Protocol {
                line: line_no,
                source,
            })?;

            values.push(record.value);
        }

        info!("Read {} records for {}", values.len(), self.statistic());
        Ok(values)
    }

    /// Compute the statistic over a complete value set
    pub fn finish(&self, values: &ValueSet) -> Result<ResultLine, ProcessingError> {
        self.processor.compute(values)
    }

    /// Ingest, compute and write the single result line
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<ReduceOutcome, ProcessingError> {
        let values = self.ingest(input)?;
        let result = self.finish(&values)?;
        write_result(&result, output)?;

        Ok(ReduceOutcome {
            result,
            records: values.len(),
        })
    }
}

/// Write a result line followed by a newline and flush
pub fn write_result<W: Write>(result: &ResultLine, mut output: W) -> Result<(), ProcessingError> {
    writeln!(output, "{}", result)?;
    output.flush()?;
    Ok(())
}
