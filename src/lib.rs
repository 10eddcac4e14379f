// Rust Streaming Stats
// Author: Gabriel Demetrios Lafis

//! # Rust Streaming Stats
//!
//! A mapper/reducer pair computing summary statistics over a single numeric
//! column, meant to run as the two stages of a streaming batch job.
//!
//! ## Features
//!
//! - Record emitter tagging each valid numeric line with a constant key
//! - Aggregation engine for median, population standard deviation, min/max,
//!   90th percentile and skewness
//! - Optional CPU and memory sampling with JSON and SVG artifacts
//! - CSV column extraction to prepare emitter input
//!
//! ## Example
//!
//! ```rust
//! use rust_streaming_stats::processing::{Emitter, Reducer};
//!
//! let raw = "1\n2\nnot a number\n3\n4\n";
//!
//! // Map
//! let mut records = Vec::new();
//! let summary = Emitter::default().run(raw.as_bytes(), &mut records).unwrap();
//! assert_eq!(summary.skipped, 1);
//!
//! // Reduce
//! let mut output = Vec::new();
//! let reducer = Reducer::from_selector("median").unwrap();
//! reducer.run(records.as_slice(), &mut output).unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "Median\t2.5\n");
//! ```

pub mod data;
pub mod monitor;
pub mod processing;
pub mod storage;
pub mod utils;

// Re-export main types
pub use data::{Record, ResultLine, ValueSet};
pub use monitor::{ResourceMonitor, SystemSampler};
pub use processing::{Emitter, Reducer, Statistic, StatsProcessor};
pub use storage::MetricsStore;
pub use utils::Config;
