// Key/value record codec shared by the emitter and the reducer
// Author: Gabriel Demetrios Lafis

use std::fmt;

use super::DataError;
use crate::utils::parse_finite;

/// Key used by the emitter when none is configured
pub const DEFAULT_KEY: &str = "values";

/// Field delimiter of the record protocol
pub const FIELD_DELIMITER: char = '\t';

/// A tagged value travelling from the emitter to the reducer
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub value: f64,
}

impl Record {
    /// Create a new record
    pub fn new<K: Into<String>>(key: K, value: f64) -> Self {
        Record {
            key: key.into(),
            value,
        }
    }

    /// Parse one protocol line of the form `<key>\t<value>`.
    ///
    /// A trailing newline (`\n` or `\r\n`) is tolerated. Anything other than
    /// exactly two fields, or a value that is not a finite decimal number, is
    /// rejected.
    pub fn parse_line(line: &str) -> Result<Self, DataError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

        if fields.len() != 2 {
            return Err(DataError::FieldCount(fields.len()));
        }

        let value = parse_finite(fields[1])
            .ok_or_else(|| DataError::InvalidNumber(fields[1].to_string()))?;

        Ok(Record::new(fields[0], value))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.key, FIELD_DELIMITER, self.value)
    }
}
