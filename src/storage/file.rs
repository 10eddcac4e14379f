// File storage for metrics documents and plots
// Author: Gabriel Demetrios Lafis

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::monitor::{MetricsSummary, ResourceSample, RunMetrics};
use super::{render_svg, StorageError};

/// Persisted form of a run's metrics
#[derive(Debug, Serialize)]
struct MetricsDocument<'a> {
    function: &'a str,
    generated_at: String,
    summary: MetricsSummary,
    samples: &'a [ResourceSample],
}

/// Writes run artifacts under a logs directory
pub struct MetricsStore {
    base_dir: PathBuf,
}

impl MetricsStore {
    /// Create a new store, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
        }

        Ok(MetricsStore { base_dir })
    }

    /// Path of an artifact, unique per function and second
    fn get_path(&self, prefix: &str, function: &str, extension: &str) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.base_dir.join(format!("{}_{}_{}.{}", prefix, function, timestamp, extension))
    }

    /// Save the summary and sample series as pretty-printed JSON
    pub fn save_metrics(&self, function: &str, metrics: &RunMetrics) -> Result<PathBuf, StorageError> {
        let path = self.get_path("metrics", function, "json");

        let document = MetricsDocument {
            function,
            generated_at: chrono::Local::now().to_rfc3339(),
            summary: metrics.summary(),
            samples: &metrics.samples,
        };

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.flush()?;

        Ok(path)
    }

    /// Render the CPU and memory series as a two-panel SVG
    pub fn save_plot(&self, function: &str, metrics: &RunMetrics) -> Result<PathBuf, StorageError> {
        let path = self.get_path("performance_plot", function, "svg");

        let svg = render_svg(function, metrics)?;
        fs::write(&path, svg)?;

        Ok(path)
    }
}
