//! MPX Analyzer Library
//!
//! Configuration, text/JSON reporting and plot export for the frequency
//! response of the MPX conditioning chain.
//!
//! This library exposes the building blocks of the `mpx-analyzer` binary for testing.

pub mod config;
pub mod error;
pub mod export;
pub mod report;

// Re-export commonly used types for convenience
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use export::{build_plot_data, write_plot_data, Panel, PlotData, ReferenceLine, Series};
pub use report::{grade_ripple, run, AnalysisReport, JsonReport};
