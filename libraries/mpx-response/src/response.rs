//! Frequency-response evaluation
//!
//! [`evaluate`] maps a filter stage over a [`FrequencyGrid`] and returns one
//! complex gain per grid point, in grid order.

use crate::error::{ResponseError, Result};
use crate::filters::{FilterSpec, TransferFunction};
use crate::grid::FrequencyGrid;
use rustfft::num_complex::Complex64;
use serde::Serialize;
use std::f64::consts::PI;

/// Magnitudes below this are clamped before taking the logarithm
pub const MAGNITUDE_FLOOR: f64 = 1e-15;

/// dB value of [`MAGNITUDE_FLOOR`]
pub const MAGNITUDE_FLOOR_DB: f64 = -300.0;

/// Complex gain per grid frequency
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexResponse {
    /// Sample rate of the grid the response was evaluated on
    sample_rate: f64,
    frequencies: Vec<f64>,
    values: Vec<Complex64>,
}

impl ComplexResponse {
    /// Build a response from aligned frequencies and gains
    ///
    /// `sample_rate` is the rate of the grid the gains were taken on.
    ///
    /// # Errors
    /// Returns `InvalidRange` if the two sequences differ in length
    pub fn new(sample_rate: f64, frequencies: Vec<f64>, values: Vec<Complex64>) -> Result<Self> {
        if frequencies.len() != values.len() {
            return Err(ResponseError::range(format!(
                "{} gains for {} frequencies",
                values.len(),
                frequencies.len()
            )));
        }
        Ok(Self {
            sample_rate,
            frequencies,
            values,
        })
    }

    /// Sample rate of the grid the response belongs to (Hz)
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Complex gains H(f)
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Linear magnitude |H(f)|
    pub fn magnitude(&self) -> Vec<f64> {
        self.values.iter().map(|h| h.norm()).collect()
    }

    /// Magnitude in dB, floored at [`MAGNITUDE_FLOOR_DB`]
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.values.iter().map(|h| linear_to_db(h.norm())).collect()
    }

    /// Phase in radians, wrapped to (−π, π]
    pub fn phase(&self) -> Vec<f64> {
        self.values.iter().map(|h| h.arg()).collect()
    }

    /// Phase in degrees, wrapped to (−180°, 180°]
    pub fn phase_deg(&self) -> Vec<f64> {
        self.values.iter().map(|h| h.arg().to_degrees()).collect()
    }

    /// Phase in radians with 2π jumps between neighbouring points removed
    pub fn unwrapped_phase(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.values.len());
        let mut offset = 0.0;
        let mut prev: Option<f64> = None;

        for h in &self.values {
            let phase = h.arg();
            if let Some(p) = prev {
                let delta = phase - p;
                if delta > PI {
                    offset -= 2.0 * PI;
                } else if delta < -PI {
                    offset += 2.0 * PI;
                }
            }
            prev = Some(phase);
            out.push(phase + offset);
        }

        out
    }

    /// Serializable per-point view
    pub fn points(&self) -> Vec<ResponsePoint> {
        self.frequencies
            .iter()
            .zip(&self.values)
            .map(|(&frequency_hz, h)| ResponsePoint {
                frequency_hz,
                magnitude: h.norm(),
                magnitude_db: linear_to_db(h.norm()),
                phase_deg: h.arg().to_degrees(),
            })
            .collect()
    }
}

/// One evaluated grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponsePoint {
    pub frequency_hz: f64,
    pub magnitude: f64,
    pub magnitude_db: f64,
    pub phase_deg: f64,
}

/// Convert a linear magnitude to dB, clamping at the floor
pub fn linear_to_db(magnitude: f64) -> f64 {
    if magnitude.is_nan() || magnitude < MAGNITUDE_FLOOR {
        MAGNITUDE_FLOOR_DB
    } else {
        20.0 * magnitude.log10()
    }
}

/// Evaluate a filter stage over a frequency grid
///
/// # Errors
/// Returns `InvalidRange` if any grid frequency lies outside the band the
/// stage can be evaluated on (`[0, fs/2]` of the stage's reference rate).
pub fn evaluate(stage: &FilterSpec, grid: &FrequencyGrid) -> Result<ComplexResponse> {
    let rate = grid.sample_rate();
    let limit = stage.max_frequency(rate);

    if let Some(&freq) = grid.frequencies().iter().find(|&&f| f > limit) {
        return Err(ResponseError::range(format!(
            "{} cannot be evaluated at {} Hz (valid range 0..={} Hz)",
            stage.kind(),
            freq,
            limit
        )));
    }

    let values = grid
        .frequencies()
        .iter()
        .map(|&f| stage.response_at(f, rate))
        .collect();

    Ok(ComplexResponse {
        sample_rate: rate,
        frequencies: grid.frequencies().to_vec(),
        values,
    })
}
