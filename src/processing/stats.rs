// Statistical operations over a materialized value set
// Author: Gabriel Demetrios Lafis

use std::fmt;
use std::str::FromStr;

use crate::data::{ResultLine, ValueSet};
use crate::utils::validate_percentile;
use super::ProcessingError;

/// Percentile reported by the `percentile` selector unless configured otherwise
pub const DEFAULT_PERCENTILE: f64 = 90.0;

/// Statistic selected for a reducer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Median,
    StdDev,
    MinMax,
    Percentile,
    Skewness,
}

impl Statistic {
    /// All selectors, in the order they are usually run
    pub const ALL: [Statistic; 5] = [
        Statistic::Median,
        Statistic::StdDev,
        Statistic::MinMax,
        Statistic::Percentile,
        Statistic::Skewness,
    ];

    /// Selector name as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Median => "median",
            Statistic::StdDev => "stddev",
            Statistic::MinMax => "minmax",
            Statistic::Percentile => "percentile",
            Statistic::Skewness => "skewness",
        }
    }
}

impl FromStr for Statistic {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "median" => Ok(Statistic::Median),
            "stddev" => Ok(Statistic::StdDev),
            "minmax" => Ok(Statistic::MinMax),
            "percentile" => Ok(Statistic::Percentile),
            "skewness" => Ok(Statistic::Skewness),
            _ => Err(ProcessingError::UnknownStatistic(s.to_string())),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How numbers are rendered in the result line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueFormat {
    /// Shortest decimal that round-trips, e.g. `2`, `2.5`
    #[default]
    Native,
    /// Fixed number of decimals
    Fixed(usize),
}

impl ValueFormat {
    pub fn from_precision(precision: Option<usize>) -> Self {
        precision.map_or(ValueFormat::Native, ValueFormat::Fixed)
    }

    pub fn format(&self, value: f64) -> String {
        // -0.0 would otherwise print as "-0"
        let value = if value == 0.0 { 0.0 } else { value };
        match self {
            ValueFormat::Native => format!("{}", value),
            ValueFormat::Fixed(decimals) => format!("{:.*}", *decimals, value),
        }
    }
}

/// Computes one statistic over a value set and renders its result line
#[derive(Debug, Clone)]
pub struct StatsProcessor {
    statistic: Statistic,
    percentile: f64,
    format: ValueFormat,
}

impl StatsProcessor {
    /// Create a new stats processor
    pub fn new(statistic: Statistic) -> Self {
        StatsProcessor {
            statistic,
            percentile: DEFAULT_PERCENTILE,
            format: ValueFormat::Native,
        }
    }

    /// Use a percentile other than the 90th for `percentile`
    pub fn with_percentile(mut self, percentile: f64) -> Result<Self, ProcessingError> {
        validate_percentile(percentile).map_err(ProcessingError::InvalidArgument)?;
        self.percentile = percentile;
        Ok(self)
    }

    /// Set the number format of the result value
    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// Label written in front of the result value
    pub fn label(&self) -> String {
        match self.statistic {
            Statistic::Median => "Median".to_string(),
            Statistic::StdDev => "StandardDeviation".to_string(),
            Statistic::MinMax => "MinMax".to_string(),
            Statistic::Percentile => format!("{}Percentile", ordinal(self.percentile)),
            Statistic::Skewness => "Skewness".to_string(),
        }
    }

    /// Compute the selected statistic and build the result line
    pub fn compute(&self, values: &ValueSet) -> Result<ResultLine, ProcessingError> {
        let values = values.as_slice();

        let value = match self.statistic {
            Statistic::Median => self.format.format(median(values)?),
            Statistic::StdDev => self.format.format(std_dev(values)?),
            Statistic::MinMax => {
                let (min, max) = min_max(values)?;
                format!("min={},max={}", self.format.format(min), self.format.format(max))
            }
            Statistic::Percentile => self.format.format(percentile(values, self.percentile)?),
            Statistic::Skewness => self.format.format(skewness(values)?),
        };

        Ok(ResultLine::new(self.label(), value))
    }
}

fn non_empty(values: &[f64]) -> Result<(), ProcessingError> {
    if values.is_empty() {
        Err(ProcessingError::EmptyValueSet)
    } else {
        Ok(())
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Power of two that brings the largest magnitude into [1, 2).
///
/// Dividing by it is exact, and keeps sums, squares and cubes of deviations
/// finite for any finite input.
fn magnitude_scale(values: &[f64]) -> f64 {
    let max_abs = values.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
    if max_abs == 0.0 {
        return 1.0;
    }

    let exponent = ((max_abs.to_bits() >> 52) & 0x7ff) as i64 - 1023;
    f64::from_bits(((exponent.max(-1022) + 1023) as u64) << 52)
}

/// Scale, scaled mean and scaled population standard deviation
fn scaled_moments(values: &[f64]) -> Result<(f64, f64, f64), ProcessingError> {
    non_empty(values)?;
    let scale = magnitude_scale(values);
    let n = values.len() as f64;

    let mean = values.iter().map(|&x| x / scale).sum::<f64>() / n;

    let (min, max) = min_max(values)?;
    if min == max {
        return Ok((scale, mean, 0.0));
    }

    let variance = values.iter()
        .map(|&x| (x / scale - mean).powi(2))
        .sum::<f64>() / n;

    Ok((scale, mean, variance.sqrt()))
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64, ProcessingError> {
    let (scale, mean, _) = scaled_moments(values)?;
    Ok(mean * scale)
}

/// Middle element of the sorted values, or the midpoint of the two central ones
pub fn median(values: &[f64]) -> Result<f64, ProcessingError> {
    non_empty(values)?;
    let sorted = sorted(values);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok(midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Ok(sorted[mid])
    }
}

/// Midpoint of `a <= b` without overflowing
fn midpoint(a: f64, b: f64) -> f64 {
    if (a < 0.0) != (b < 0.0) {
        (a + b) / 2.0
    } else {
        a + (b - a) / 2.0
    }
}

/// Population variance (divides by N); exactly 0 for a constant sequence.
///
/// May be infinite when the standard deviation exceeds `sqrt(f64::MAX)`.
pub fn variance(values: &[f64]) -> Result<f64, ProcessingError> {
    Ok(std_dev(values)?.powi(2))
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64, ProcessingError> {
    let (scale, _, std_dev) = scaled_moments(values)?;
    Ok(std_dev * scale)
}

/// Smallest and largest value
pub fn min_max(values: &[f64]) -> Result<(f64, f64), ProcessingError> {
    non_empty(values)?;
    Ok(values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
        (min.min(x), max.max(x))
    }))
}

/// Per-element `(x - min) / (max - min)`; all zeros when max == min
pub fn normalize(values: &[f64]) -> Result<Vec<f64>, ProcessingError> {
    let (min, max) = min_max(values)?;
    let scale = magnitude_scale(values);
    let (min, range) = (min / scale, max / scale - min / scale);

    Ok(values.iter()
        .map(|&x| if range > 0.0 { (x / scale - min) / range } else { 0.0 })
        .collect())
}

/// Nearest-rank percentile: the element at 0-based index `ceil(p/100 * N) - 1`
/// of the sorted values, clamped into range.
pub fn percentile(values: &[f64], p: f64) -> Result<f64, ProcessingError> {
    non_empty(values)?;
    let sorted = sorted(values);

    let rank = (p * sorted.len() as f64 / 100.0).ceil();
    let index = (rank.max(1.0) as usize - 1).min(sorted.len() - 1);

    Ok(sorted[index])
}

/// Population Fisher skewness; 0 when all values are identical
pub fn skewness(values: &[f64]) -> Result<f64, ProcessingError> {
    let (scale, mean, std_dev) = scaled_moments(values)?;

    if std_dev == 0.0 {
        return Ok(0.0);
    }

    Ok(values.iter()
        .map(|&x| ((x / scale - mean) / std_dev).powi(3))
        .sum::<f64>() / values.len() as f64)
}

fn ordinal(p: f64) -> String {
    if p.fract() != 0.0 {
        return format!("{}th", p);
    }

    let n = p as u64;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
