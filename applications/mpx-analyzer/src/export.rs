//! Plot series export
//!
//! Writes the data behind three frequency-response plots as JSON so any
//! plotting tool can render them:
//!
//! 1. Per-stage magnitude over the full band
//! 2. Cascade magnitude and phase over the full band
//! 3. Cascade magnitude over the passband with max/min/mean reference lines

use crate::config::AnalyzerConfig;
use crate::error::Result;
use mpx_response::{analyze_chain, ChainAnalysis};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct PlotData {
    pub sample_rate: f64,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Logarithmic frequency axis
    pub x_log: bool,
    pub series: Vec<Series>,
    pub reference_lines: Vec<ReferenceLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub label: String,
    pub frequencies: Vec<f64>,
    pub values: Vec<f64>,
}

/// Horizontal line at a constant y value
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
}

impl Panel {
    fn new(title: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: "Frequency (Hz)".to_string(),
            y_label: y_label.to_string(),
            x_log: true,
            series: Vec::new(),
            reference_lines: Vec::new(),
        }
    }
}

fn series(label: &str, frequencies: &[f64], values: Vec<f64>) -> Series {
    Series {
        label: label.to_string(),
        frequencies: frequencies.to_vec(),
        values,
    }
}

fn stage_panel(full: &ChainAnalysis) -> Panel {
    let mut panel = Panel::new("Individual Stage Responses", "Magnitude (dB)");
    let freqs = full.grid.frequencies();
    for stage in &full.stages {
        panel
            .series
            .push(series(&stage.name, freqs, stage.response.magnitude_db()));
    }
    panel
}

fn cascade_panel(full: &ChainAnalysis) -> Panel {
    let mut panel = Panel::new(
        "Cascaded Response",
        "Magnitude (dB) / Phase (degrees)",
    );
    let freqs = full.grid.frequencies();
    panel
        .series
        .push(series("Magnitude (dB)", freqs, full.cascade.magnitude_db()));
    panel
        .series
        .push(series("Phase (degrees)", freqs, full.cascade.phase_deg()));
    panel
}

fn passband_panel(passband: &ChainAnalysis) -> Panel {
    let r = &passband.cascade_ripple;
    let mut panel = Panel::new(
        &format!("Passband Detail ({}), ripple {:.4} dB", r.passband, r.ripple_db),
        "Magnitude (dB)",
    );
    panel.series.push(series(
        "Cascade",
        passband.grid.frequencies(),
        passband.cascade.magnitude_db(),
    ));
    panel.reference_lines = vec![
        ReferenceLine {
            label: "Max".to_string(),
            value: r.max_db,
        },
        ReferenceLine {
            label: "Min".to_string(),
            value: r.min_db,
        },
        ReferenceLine {
            label: "Mean".to_string(),
            value: r.mean_db,
        },
    ];
    panel
}

/// Evaluate the configured chain for plotting
pub fn build_plot_data(config: &AnalyzerConfig) -> Result<PlotData> {
    config.validate()?;

    let stages = config.build_stages()?;
    let passband = config.passband()?;

    let full = analyze_chain(&stages, &config.plot_grid()?, passband)?;
    let detail = analyze_chain(&stages, &config.sweep_grid()?, passband)?;

    Ok(PlotData {
        sample_rate: config.analysis.sample_rate,
        panels: vec![stage_panel(&full), cascade_panel(&full), passband_panel(&detail)],
    })
}

/// Write plot data as pretty-printed JSON
pub fn write_plot_data(data: &PlotData, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, data)?;
    info!("Plot data saved to: {}", path.display());
    Ok(())
}
