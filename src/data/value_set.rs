// Value set accumulated during a single reducer run
// Author: Gabriel Demetrios Lafis

/// All values consumed by one reducer run, in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSet {
    values: Vec<f64>,
}

impl ValueSet {
    /// Create a new empty value set
    pub fn new() -> Self {
        ValueSet { values: Vec::new() }
    }

    /// Append a value
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Get the number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the value set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in arrival order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for ValueSet {
    fn from(values: Vec<f64>) -> Self {
        ValueSet { values }
    }
}
