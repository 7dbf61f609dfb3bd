//! Frequency grids
//!
//! A grid pairs a sample rate with an ordered list of analysis frequencies.
//! Every frequency is finite, lies in `[0, sample_rate / 2]`, and the list is
//! monotonically non-decreasing.

use crate::error::{ResponseError, Result};
use serde::Serialize;

/// Ordered set of analysis frequencies at a given sample rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyGrid {
    sample_rate: f64,
    frequencies: Vec<f64>,
}

impl FrequencyGrid {
    /// Create a grid from an explicit list of frequencies
    ///
    /// # Errors
    /// - `InvalidParameter` if the sample rate is not positive
    /// - `InvalidRange` if the list is empty, unsorted, or leaves `[0, fs/2]`
    pub fn new(sample_rate: f64, frequencies: Vec<f64>) -> Result<Self> {
        validate_sample_rate(sample_rate)?;

        if frequencies.is_empty() {
            return Err(ResponseError::range("frequency grid is empty"));
        }

        let nyquist = sample_rate / 2.0;
        for (i, &freq) in frequencies.iter().enumerate() {
            if !freq.is_finite() || freq < 0.0 || freq > nyquist {
                return Err(ResponseError::range(format!(
                    "frequency {} Hz at index {} is outside [0, {}] Hz",
                    freq, i, nyquist
                )));
            }
            if i > 0 && freq < frequencies[i - 1] {
                return Err(ResponseError::range(format!(
                    "frequency grid is not non-decreasing at index {} ({} Hz after {} Hz)",
                    i,
                    freq,
                    frequencies[i - 1]
                )));
            }
        }

        Ok(Self {
            sample_rate,
            frequencies,
        })
    }

    /// Create a logarithmically spaced grid from `min_hz` to `max_hz` inclusive
    ///
    /// Both endpoints are placed exactly, so a passband sharing them always
    /// selects the first and last point. A single-point grid needs
    /// `min_hz == max_hz`.
    pub fn logarithmic(sample_rate: f64, min_hz: f64, max_hz: f64, count: usize) -> Result<Self> {
        if min_hz.is_nan() || min_hz <= 0.0 {
            return Err(ResponseError::range(format!(
                "logarithmic grid requires a positive start frequency, got {} Hz",
                min_hz
            )));
        }
        let frequencies = spaced(min_hz, max_hz, count, |t| {
            min_hz * (max_hz / min_hz).powf(t)
        })?;
        Self::new(sample_rate, frequencies)
    }

    /// Create a linearly spaced grid from `min_hz` to `max_hz` inclusive
    pub fn linear(sample_rate: f64, min_hz: f64, max_hz: f64, count: usize) -> Result<Self> {
        let frequencies = spaced(min_hz, max_hz, count, |t| min_hz + (max_hz - min_hz) * t)?;
        Self::new(sample_rate, frequencies)
    }

    /// Sample rate the grid was built against (Hz)
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Nyquist frequency of the grid's sample rate (Hz)
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Grid frequencies in order (Hz)
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(ResponseError::parameter(format!(
            "sample rate must be positive, got {} Hz",
            sample_rate
        )));
    }
    Ok(())
}

fn spaced(min_hz: f64, max_hz: f64, count: usize, point: impl Fn(f64) -> f64) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(ResponseError::range("grid point count must be at least 1"));
    }
    if !min_hz.is_finite() || !max_hz.is_finite() || max_hz < min_hz {
        return Err(ResponseError::range(format!(
            "invalid grid span {} Hz .. {} Hz",
            min_hz, max_hz
        )));
    }
    if count == 1 {
        if max_hz != min_hz {
            return Err(ResponseError::range(format!(
                "a single-point grid needs min_hz == max_hz, got {} Hz .. {} Hz",
                min_hz, max_hz
            )));
        }
        return Ok(vec![min_hz]);
    }

    let last = count - 1;
    Ok((0..count)
        .map(|i| match i {
            0 => min_hz,
            i if i == last => max_hz,
            i => point(i as f64 / last as f64),
        })
        .collect())
}
