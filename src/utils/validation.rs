// Validation utilities
// Author: Gabriel Demetrios Lafis

/// Parse a decimal literal, accepting only finite numbers.
///
/// Leading and trailing whitespace is ignored. Blank input, non-numeric text,
/// `NaN` and infinities all yield `None`.
pub fn parse_finite(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validate that a percentile lies in (0, 100]
pub fn validate_percentile(percentile: f64) -> Result<(), String> {
    if percentile.is_nan() || percentile <= 0.0 {
        return Err("'percentile' must be positive".to_string());
    }

    validate_range(percentile, 0.0, 100.0, "percentile")
}

/// Validate that a numeric value is in range
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: T,
    max: T,
    name: &str,
) -> Result<(), String> {
    if value < min || value > max {
        Err(format!(
            "'{}' must be between {} and {}",
            name, min, max
        ))
    } else {
        Ok(())
    }
}
