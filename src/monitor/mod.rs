// Resource sampling around a reducer run
// Author: Gabriel Demetrios Lafis

mod system;

pub use system::*;

use std::io::Write;
use std::time::Instant;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker lines delimiting the metrics report on the error stream
pub const REPORT_START: &str = "PERFORMANCE_METRICS_START";
pub const REPORT_END: &str = "PERFORMANCE_METRICS_END";

/// Represents an error in the monitor module
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("sampling facility unavailable: {0}")]
    Unavailable(String),

    #[error("process {0} not found")]
    ProcessNotFound(u32),
}

/// Raw numbers supplied by a sampling facility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

/// Represents a source of CPU and memory readings
pub trait SampleSource {
    /// Take one reading
    fn read_usage(&mut self) -> Result<Reading, MonitorError>;
}

/// One timestamped observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub elapsed_seconds: f64,
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

/// Sample series and totals of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub runtime_seconds: f64,
    pub records_processed: usize,
    pub throughput: f64,
    pub samples: Vec<ResourceSample>,
}

/// Aggregates derived from a run's metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub runtime_seconds: f64,
    pub records_processed: usize,
    pub throughput: f64,
    pub avg_cpu_usage: f64,
    pub max_cpu_usage: f64,
    pub avg_memory_mb: f64,
    pub max_memory_mb: f64,
}

impl RunMetrics {
    /// Compute the summary over the collected samples
    pub fn summary(&self) -> MetricsSummary {
        let (avg_cpu_usage, max_cpu_usage) = avg_max(self.samples.iter().map(|s| s.cpu_percent));
        let (avg_memory_mb, max_memory_mb) = avg_max(self.samples.iter().map(|s| s.memory_mb));

        MetricsSummary {
            runtime_seconds: self.runtime_seconds,
            records_processed: self.records_processed,
            throughput: self.throughput,
            avg_cpu_usage,
            max_cpu_usage,
            avg_memory_mb,
            max_memory_mb,
        }
    }
}

fn avg_max<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let (count, sum, max) = values.fold((0usize, 0.0, f64::NEG_INFINITY), |(count, sum, max), v| {
        (count + 1, sum + v, max.max(v))
    });

    if count == 0 {
        (0.0, 0.0)
    } else {
        (sum / count as f64, max)
    }
}

impl MetricsSummary {
    /// Write the `key: value` report block framed by the marker lines
    pub fn write_report<W: Write>(&self, mut output: W) -> std::io::Result<()> {
        writeln!(output, "{}", REPORT_START)?;
        writeln!(output, "runtime_seconds: {:.4}", self.runtime_seconds)?;
        writeln!(output, "records_processed: {}", self.records_processed)?;
        writeln!(output, "throughput: {:.2}", self.throughput)?;
        writeln!(output, "avg_cpu_usage: {:.2}", self.avg_cpu_usage)?;
        writeln!(output, "max_cpu_usage: {:.2}", self.max_cpu_usage)?;
        writeln!(output, "avg_memory_mb: {:.2}", self.avg_memory_mb)?;
        writeln!(output, "max_memory_mb: {:.2}", self.max_memory_mb)?;
        writeln!(output, "{}", REPORT_END)?;
        output.flush()
    }
}

/// Samples CPU and memory at the start and end of a run (and on demand
/// in between) and derives throughput once the run stops.
///
/// Sampling failures are logged and the sample is dropped; the monitor never
/// reports an error to its caller.
pub struct ResourceMonitor<S: SampleSource> {
    source: S,
    started: Option<Instant>,
    metrics: RunMetrics,
}

impl<S: SampleSource> ResourceMonitor<S> {
    /// Create a new monitor over a sample source
    pub fn new(source: S) -> Self {
        ResourceMonitor {
            source,
            started: None,
            metrics: RunMetrics::default(),
        }
    }

    /// Reset the series and take the baseline sample
    pub fn start(&mut self) {
        self.metrics = RunMetrics::default();
        self.started = Some(Instant::now());
        self.sample();
    }

    /// Take one sample; ignored before `start`
    pub fn sample(&mut self) {
        let started = match self.started {
            Some(started) => started,
            None => {
                warn!("Resource sample requested before monitoring started");
                return;
            }
        };

        // Timestamp before reading so the baseline sample sits at zero
        let elapsed_seconds = started.elapsed().as_secs_f64();

        match self.source.read_usage() {
            Ok(reading) => self.metrics.samples.push(ResourceSample {
                elapsed_seconds,
                cpu_percent: reading.cpu_percent,
                memory_mb: reading.memory_mb,
            }),
            Err(err) => warn!("Skipping resource sample: {}", err),
        }
    }

    /// Take the final sample and derive runtime and throughput
    pub fn stop(&mut self, records_processed: usize) -> MetricsSummary {
        self.sample();

        let runtime = self.started
            .map(|started| started.elapsed().as_secs_f64())
            .unwrap_or(0.0);

        self.metrics.runtime_seconds = runtime;
        self.metrics.records_processed = records_processed;
        self.metrics.throughput = if runtime > 0.0 {
            records_processed as f64 / runtime
        } else {
            0.0
        };

        self.summary()
    }

    pub fn summary(&self) -> MetricsSummary {
        self.metrics.summary()
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }
}
