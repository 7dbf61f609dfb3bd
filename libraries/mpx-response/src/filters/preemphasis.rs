//! First-order FIR pre-emphasis
//!
//! H(e^jω) = gain · (1 − α · e^(−jω))
//!
//! A high-pass shelf: gain·(1−α) at DC rising monotonically to gain·(1+α) at
//! Nyquist. The stage has no sample rate of its own; it is evaluated at the
//! rate of the grid it runs on.

use super::{unit_delay, TransferFunction};
use crate::error::{ResponseError, Result};
use rustfft::num_complex::Complex64;
use tracing::debug;

/// Pre-emphasis shelf filter
#[derive(Debug, Clone, PartialEq)]
pub struct PreEmphasisFilter {
    gain: f64,
    alpha: f64,
    /// FIR coefficients `[gain, −gain·α]`
    b: [f64; 2],
}

impl PreEmphasisFilter {
    /// Create a pre-emphasis filter
    ///
    /// # Arguments
    /// * `gain` - Output gain (> 0)
    /// * `alpha` - Feedforward coefficient in `[0, 1)`
    ///
    /// # Errors
    /// Returns `InvalidParameter` if gain ≤ 0 or alpha ∉ [0, 1)
    pub fn new(gain: f64, alpha: f64) -> Result<Self> {
        if !gain.is_finite() || gain <= 0.0 {
            return Err(ResponseError::parameter(format!(
                "pre-emphasis gain must be positive, got {}",
                gain
            )));
        }
        if !(0.0..1.0).contains(&alpha) {
            return Err(ResponseError::parameter(format!(
                "pre-emphasis alpha must be in [0, 1), got {}",
                alpha
            )));
        }

        let b = [gain, -gain * alpha];
        debug!("Pre-emphasis: gain={}, alpha={}, b={:?}", gain, alpha, b);

        Ok(Self { gain, alpha, b })
    }

    /// Create a pre-emphasis filter from an RC time constant
    ///
    /// α = exp(−1 / (τ · fs)). 50 µs at 48 kHz gives α ≈ 0.6592.
    pub fn from_time_constant(time_constant_us: f64, sample_rate: f64, gain: f64) -> Result<Self> {
        if !time_constant_us.is_finite() || time_constant_us <= 0.0 {
            return Err(ResponseError::parameter(format!(
                "time constant must be positive, got {} us",
                time_constant_us
            )));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ResponseError::parameter(format!(
                "sample rate must be positive, got {} Hz",
                sample_rate
            )));
        }

        let alpha = (-1.0 / (time_constant_us * 1e-6 * sample_rate)).exp();
        Self::new(gain, alpha)
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// FIR coefficients `[b0, b1]`
    pub fn coefficients(&self) -> [f64; 2] {
        self.b
    }

    /// Gain at Nyquist, gain·(1+α)
    pub fn nyquist_gain(&self) -> f64 {
        self.gain * (1.0 + self.alpha)
    }
}

impl TransferFunction for PreEmphasisFilter {
    fn response_at(&self, freq_hz: f64, grid_rate: f64) -> Complex64 {
        self.b[0] + self.b[1] * unit_delay(freq_hz, grid_rate)
    }

    fn max_frequency(&self, grid_rate: f64) -> f64 {
        grid_rate / 2.0
    }

    fn dc_gain(&self) -> f64 {
        self.gain * (1.0 - self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(matches!(
            PreEmphasisFilter::new(0.0, 0.5),
            Err(ResponseError::InvalidParameter(_))
        ));
        assert!(matches!(
            PreEmphasisFilter::new(1.0, 1.0),
            Err(ResponseError::InvalidParameter(_))
        ));
        assert!(matches!(
            PreEmphasisFilter::new(1.0, -0.1),
            Err(ResponseError::InvalidParameter(_))
        ));
        assert!(matches!(
            PreEmphasisFilter::new(1.0, f64::NAN),
            Err(ResponseError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_dc_and_nyquist_gain() {
        let filter = PreEmphasisFilter::new(3.0, 0.6592).unwrap();
        let dc = filter.response_at(0.0, 48000.0);
        let nyq = filter.response_at(24000.0, 48000.0);

        assert!((dc.norm() - 3.0 * (1.0 - 0.6592)).abs() < 1e-12);
        assert!((nyq.norm() - filter.nyquist_gain()).abs() < 1e-12);
    }

    #[test]
    fn test_time_constant_alpha() {
        let filter = PreEmphasisFilter::from_time_constant(50.0, 48000.0, 3.0).unwrap();
        assert!((filter.alpha() - 0.6592).abs() < 1e-4);
    }

    #[test]
    fn test_alpha_zero_is_flat() {
        let filter = PreEmphasisFilter::new(2.0, 0.0).unwrap();
        for f in [0.0, 1000.0, 12000.0, 24000.0] {
            assert!((filter.response_at(f, 48000.0).norm() - 2.0).abs() < 1e-12);
        }
    }
}
