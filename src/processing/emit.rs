// Record emitter (mapper stage)
// Author: Gabriel Demetrios Lafis

use std::io::{BufRead, Write};

use log::{debug, info};

use crate::data::{Record, DEFAULT_KEY};
use crate::utils::parse_finite;
use super::ProcessingError;

/// Counts reported by an emitter run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub emitted: usize,
    pub skipped: usize,
}

/// Tags every valid numeric input line with a constant key
#[derive(Debug, Clone)]
pub struct Emitter {
    key: String,
}

impl Emitter {
    /// Create a new emitter using the given record key
    pub fn new<S: Into<String>>(key: S) -> Self {
        Emitter { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Turn one raw input line into a record, if it holds a finite number
    pub fn emit_line(&self, line: &str) -> Option<Record> {
        parse_finite(line).map(|value| Record::new(self.key.as_str(), value))
    }

    /// Read raw lines until end of input, writing one record per valid line.
    ///
    /// Blank, non-numeric, non-finite and non-UTF-8 lines are skipped and
    /// counted; only I/O failures end the run early.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<EmitSummary, ProcessingError> {
        let mut summary = EmitSummary::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            match self.emit_line(&line) {
                Some(record) => {
                    writeln!(output, "{}", record)?;
                    summary.emitted += 1;
                }
                None => {
                    debug!("Skipping line {}: not a finite number: {:?}", line_no, line.trim_end());
                    summary.skipped += 1;
                }
            }
        }

        output.flush()?;
        info!("Emitted {} records, skipped {} lines", summary.emitted, summary.skipped);

        Ok(summary)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Emitter::new(DEFAULT_KEY)
    }
}
