// Result line written by the reducer and read back by result extraction
// Author: Gabriel Demetrios Lafis

use std::fmt;

use super::{DataError, FIELD_DELIMITER};

/// A single `<Label>\t<Value>` result line
#[derive(Debug, Clone, PartialEq)]
pub struct ResultLine {
    pub label: String,
    pub value: String,
}

impl ResultLine {
    /// Create a new result line
    pub fn new<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        ResultLine {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Parse a result line.
    ///
    /// Any whitespace separates the two fields, matching extractors that
    /// split on whitespace rather than on the tab delimiter.
    pub fn parse(line: &str) -> Result<Self, DataError> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        match fields.as_slice() {
            [label, value] => Ok(ResultLine::new(*label, *value)),
            _ => Err(DataError::FieldCount(fields.len())),
        }
    }

    /// Parse the value as a single number, if it is one
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.parse().ok()
    }

    /// Split a `min=<a>,max=<b>` value into its two bounds
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let (min_part, max_part) = self.value.split_once(',')?;
        let min = min_part.strip_prefix("min=")?.parse().ok()?;
        let max = max_part.strip_prefix("max=")?.parse().ok()?;
        Some((min, max))
    }
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.label, FIELD_DELIMITER, self.value)
    }
}
