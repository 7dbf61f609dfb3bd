//! Passband flatness metrics
//!
//! Ripple is the peak-to-peak variation of a magnitude series (in dB) over
//! the grid points that fall inside a passband, both ends inclusive.

use crate::error::{ResponseError, Result};
use crate::grid::FrequencyGrid;
use serde::Serialize;
use std::fmt;

/// Default lower passband edge (Hz)
pub const DEFAULT_PASSBAND_MIN_HZ: f64 = 20.0;

/// Default upper passband edge (Hz), the top of the FM audio band
pub const DEFAULT_PASSBAND_MAX_HZ: f64 = 15000.0;

/// Closed frequency interval `[min_hz, max_hz]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PassbandBounds {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl PassbandBounds {
    /// Create passband bounds
    ///
    /// # Errors
    /// Returns `InvalidRange` if either edge is negative or non-finite, or
    /// if `min_hz > max_hz`
    pub fn new(min_hz: f64, max_hz: f64) -> Result<Self> {
        if !min_hz.is_finite() || !max_hz.is_finite() || min_hz < 0.0 || min_hz > max_hz {
            return Err(ResponseError::range(format!(
                "invalid passband {} Hz .. {} Hz",
                min_hz, max_hz
            )));
        }
        Ok(Self { min_hz, max_hz })
    }

    pub fn contains(&self, freq_hz: f64) -> bool {
        freq_hz >= self.min_hz && freq_hz <= self.max_hz
    }
}

impl Default for PassbandBounds {
    fn default() -> Self {
        Self {
            min_hz: DEFAULT_PASSBAND_MIN_HZ,
            max_hz: DEFAULT_PASSBAND_MAX_HZ,
        }
    }
}

impl fmt::Display for PassbandBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz - {} Hz", self.min_hz, self.max_hz)
    }
}

/// Flatness statistics of a magnitude series over a passband
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RippleReport {
    /// Peak-to-peak variation, max_db − min_db (≥ 0)
    pub ripple_db: f64,
    pub max_db: f64,
    pub min_db: f64,
    pub mean_db: f64,
    /// Population standard deviation
    pub std_db: f64,
    /// Frequency of the first maximum
    pub max_freq: f64,
    /// Frequency of the first minimum
    pub min_freq: f64,
    pub passband: PassbandBounds,
    /// Number of grid points inside the passband
    pub point_count: usize,
}

impl fmt::Display for RippleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ripple: {:.4} dB over {} (max {:.4} dB at {:.1} Hz, min {:.4} dB at {:.1} Hz)",
            self.ripple_db, self.passband, self.max_db, self.max_freq, self.min_db, self.min_freq
        )
    }
}

/// Compute passband flatness of `magnitude_db` over `band`
///
/// # Errors
/// - `InvalidRange` if the series is not aligned with the grid, the band
///   lies outside `[0, fs/2]`, or no grid point falls inside the band
/// - `NumericDomain` if a selected value is not finite
pub fn ripple(
    magnitude_db: &[f64],
    grid: &FrequencyGrid,
    band: PassbandBounds,
) -> Result<RippleReport> {
    if magnitude_db.len() != grid.len() {
        return Err(ResponseError::range(format!(
            "{} magnitude values for a {}-point grid",
            magnitude_db.len(),
            grid.len()
        )));
    }
    PassbandBounds::new(band.min_hz, band.max_hz)?;
    if band.max_hz > grid.nyquist() {
        return Err(ResponseError::range(format!(
            "passband {} lies outside 0 Hz - {} Hz",
            band,
            grid.nyquist()
        )));
    }

    let selected: Vec<(f64, f64)> = grid
        .frequencies()
        .iter()
        .zip(magnitude_db)
        .filter(|(&f, _)| band.contains(f))
        .map(|(&f, &db)| (f, db))
        .collect();

    if selected.is_empty() {
        return Err(ResponseError::range(format!(
            "no grid points fall inside passband {}",
            band
        )));
    }
    if let Some(&(f, db)) = selected.iter().find(|(_, db)| !db.is_finite()) {
        return Err(ResponseError::NumericDomain(format!(
            "magnitude {} dB at {} Hz is not finite",
            db, f
        )));
    }

    let (mut max_freq, mut max_db) = selected[0];
    let (mut min_freq, mut min_db) = selected[0];
    for &(f, db) in &selected[1..] {
        if db > max_db {
            max_db = db;
            max_freq = f;
        }
        if db < min_db {
            min_db = db;
            min_freq = f;
        }
    }

    let n = selected.len() as f64;
    let mean_db = selected.iter().map(|(_, db)| db).sum::<f64>() / n;
    let variance = selected
        .iter()
        .map(|(_, db)| (db - mean_db).powi(2))
        .sum::<f64>()
        / n;

    Ok(RippleReport {
        ripple_db: max_db - min_db,
        max_db,
        min_db,
        mean_db,
        std_db: variance.sqrt(),
        max_freq,
        min_freq,
        passband: band,
        point_count: selected.len(),
    })
}
