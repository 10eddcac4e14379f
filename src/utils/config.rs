// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{validate_percentile, AppError, AppResult};
use crate::data::DEFAULT_KEY;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emitter: EmitterConfig,
    pub reducer: ReducerConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

/// Emitter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub key: String,
}

/// Reducer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    /// Fixed number of decimals; native formatting when absent
    pub precision: Option<usize>,
    pub percentile: f64,
}

/// Resource monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub logs_dir: String,
    pub save_metrics: bool,
    pub save_plot: bool,
    pub report: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        EmitterConfig {
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Default for ReducerConfig {
    fn default() -> Self {
        ReducerConfig {
            precision: None,
            percentile: 90.0,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            enabled: false,
            logs_dir: "performance_logs".to_string(),
            save_metrics: true,
            save_plot: true,
            report: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Config = if path.as_ref().extension().map_or(false, |ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| AppError::Config(e.to_string()))?
        } else if path.as_ref().extension().map_or(false, |ext| ext == "yaml" || ext == "yml") {
            serde_yaml::from_str(&contents).map_err(|e| AppError::Config(e.to_string()))?
        } else {
            return Err(AppError::Config("Unsupported config file format".to_string()));
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot constrain
    pub fn validate(&self) -> AppResult<()> {
        if self.emitter.key.is_empty() || self.emitter.key.contains(['\t', '\n']) {
            return Err(AppError::Config(
                "emitter key must be non-empty and free of tabs and newlines".to_string(),
            ));
        }

        validate_percentile(self.reducer.percentile).map_err(AppError::Config)
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Warn,
        }
    }
}
