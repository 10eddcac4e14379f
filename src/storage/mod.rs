// Storage module for run artifacts
// Author: Gabriel Demetrios Lafis

mod file;
mod plot;

pub use file::*;
pub use plot::*;

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::monitor::RunMetrics;

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Write the requested artifacts for a run, logging failures as warnings.
///
/// Returns the paths that were written; a failure never propagates.
pub fn persist_run_artifacts(
    dir: &Path,
    function: &str,
    metrics: &RunMetrics,
    save_metrics: bool,
    save_plot: bool,
) -> Vec<PathBuf> {
    let mut written = Vec::new();
    if !save_metrics && !save_plot {
        return written;
    }

    let store = match MetricsStore::new(dir) {
        Ok(store) => store,
        Err(err) => {
            warn!("Could not prepare logs directory {}: {}", dir.display(), err);
            return written;
        }
    };

    if save_metrics {
        match store.save_metrics(function, metrics) {
            Ok(path) => {
                info!("Metrics saved to {}", path.display());
                written.push(path);
            }
            Err(err) => warn!("Could not save metrics: {}", err),
        }
    }

    if save_plot {
        match store.save_plot(function, metrics) {
            Ok(path) => {
                info!("Performance plot saved to {}", path.display());
                written.push(path);
            }
            Err(err) => warn!("Could not save performance plot: {}", err),
        }
    }

    written
}
