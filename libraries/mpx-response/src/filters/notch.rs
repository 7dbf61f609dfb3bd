//! Biquad notch for the 19 kHz stereo pilot
//!
//! Constant-Q design via the bilinear transform:
//!
//! ```text
//! w0 = 2π·f0/fs        Δω = w0/Q        k = 1 / (1 + tan(Δω/2))
//!
//! b = k · [1, −2·cos w0, 1]
//! a = [1, −2·k·cos w0, 2k − 1]
//! ```
//!
//! The zeros sit on the unit circle at ±w0, so the response is nulled exactly
//! at the center frequency. The poles share the zeros' angle at radius
//! √(2k − 1) < 1, which places the −3 dB points f0/Q apart. DC gain is 1.

use super::{unit_delay, TransferFunction};
use crate::error::{ResponseError, Result};
use rustfft::num_complex::Complex64;
use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

/// Normalized biquad coefficients (a0 = 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Evaluate (b0 + b1·z⁻¹ + b2·z⁻²) / (a0 + a1·z⁻¹ + a2·z⁻²)
    fn evaluate(&self, z_inv: Complex64) -> Complex64 {
        let z_inv2 = z_inv * z_inv;
        let num = self.b0 + self.b1 * z_inv + self.b2 * z_inv2;
        let den = self.a0 + self.a1 * z_inv + self.a2 * z_inv2;
        num / den
    }
}

/// Second-order IIR notch filter
#[derive(Debug, Clone, PartialEq)]
pub struct NotchFilter {
    center_freq: f64,
    q: f64,
    sample_rate: f64,
    coefficients: BiquadCoefficients,
}

impl NotchFilter {
    /// Create a notch filter
    ///
    /// # Arguments
    /// * `center_freq` - Notch frequency in Hz, inside `(0, fs/2)`
    /// * `q` - Quality factor, center_freq / bandwidth_hz (> 0)
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    /// Returns `InvalidParameter` on any violated constraint
    pub fn new(center_freq: f64, q: f64, sample_rate: f64) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ResponseError::parameter(format!(
                "notch sample rate must be positive, got {} Hz",
                sample_rate
            )));
        }
        if !q.is_finite() || q <= 0.0 {
            return Err(ResponseError::parameter(format!(
                "notch Q must be positive, got {}",
                q
            )));
        }
        let nyquist = sample_rate / 2.0;
        if !(center_freq > 0.0 && center_freq < nyquist) {
            return Err(ResponseError::parameter(format!(
                "notch center {} Hz must lie in (0, {}) Hz",
                center_freq, nyquist
            )));
        }
        if center_freq / q >= nyquist {
            return Err(ResponseError::parameter(format!(
                "notch bandwidth {} Hz (f0/Q) must be below {} Hz",
                center_freq / q,
                nyquist
            )));
        }

        let w0 = 2.0 * PI * center_freq / sample_rate;
        let bandwidth = w0 / q;
        let k = 1.0 / (1.0 + (bandwidth / 2.0).tan());
        let cos_w0 = w0.cos();

        let coefficients = BiquadCoefficients {
            b0: k,
            b1: -2.0 * k * cos_w0,
            b2: k,
            a0: 1.0,
            a1: -2.0 * k * cos_w0,
            a2: 2.0 * k - 1.0,
        };

        debug!(
            "Notch: f0={} Hz, Q={}, fs={} Hz, coefficients={:?}",
            center_freq, q, sample_rate, coefficients
        );

        Ok(Self {
            center_freq,
            q,
            sample_rate,
            coefficients,
        })
    }

    /// Create a notch from a pole radius, mapping r to Q ≈ 1 / (2·(1 − r))
    ///
    /// A radius of 0.98 gives Q = 25.
    pub fn from_pole_radius(center_freq: f64, radius: f64, sample_rate: f64) -> Result<Self> {
        if !(radius > 0.0 && radius < 1.0) {
            return Err(ResponseError::parameter(format!(
                "notch pole radius must be in (0, 1), got {}",
                radius
            )));
        }
        Self::new(center_freq, 1.0 / (2.0 * (1.0 - radius)), sample_rate)
    }

    pub fn center_freq(&self) -> f64 {
        self.center_freq
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// −3 dB bandwidth in Hz
    pub fn bandwidth_hz(&self) -> f64 {
        self.center_freq / self.q
    }

    /// Radius of the conjugate pole pair, √|a2|
    pub fn pole_radius(&self) -> f64 {
        self.coefficients.a2.abs().sqrt()
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coefficients
    }
}

impl TransferFunction for NotchFilter {
    fn response_at(&self, freq_hz: f64, _grid_rate: f64) -> Complex64 {
        self.coefficients
            .evaluate(unit_delay(freq_hz, self.sample_rate))
    }

    fn max_frequency(&self, _grid_rate: f64) -> f64 {
        self.sample_rate / 2.0
    }

    fn dc_gain(&self) -> f64 {
        let c = &self.coefficients;
        (c.b0 + c.b1 + c.b2) / (c.a0 + c.a1 + c.a2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pilot_notch() -> NotchFilter {
        NotchFilter::new(19000.0, 25.0, 48000.0).unwrap()
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(NotchFilter::new(19000.0, 0.0, 48000.0).is_err());
        assert!(NotchFilter::new(0.0, 25.0, 48000.0).is_err());
        assert!(NotchFilter::new(24000.0, 25.0, 48000.0).is_err());
        assert!(NotchFilter::new(19000.0, 25.0, 0.0).is_err());
        assert!(NotchFilter::new(f64::NAN, 25.0, 48000.0).is_err());
        // 19 kHz wide notch cannot fit below Nyquist
        assert!(NotchFilter::new(19000.0, 0.5, 48000.0).is_err());
    }

    #[test]
    fn test_null_at_center() {
        let notch = pilot_notch();
        assert!(notch.response_at(19000.0, 48000.0).norm() < 1e-9);
    }

    #[test]
    fn test_unity_dc_gain() {
        let notch = pilot_notch();
        assert!((notch.dc_gain() - 1.0).abs() < 1e-12);
        assert!((notch.response_at(0.0, 48000.0).norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_poles_inside_unit_circle() {
        let r = pilot_notch().pole_radius();
        assert!(r > 0.9 && r < 1.0, "pole radius {}", r);
    }

    #[test]
    fn test_half_power_bandwidth() {
        let notch = pilot_notch();
        let half_power = std::f64::consts::FRAC_1_SQRT_2;

        // Scan for the -3 dB crossings on either side of the notch
        let mut lower = 0.0;
        let mut upper = 0.0;
        let mut f = 17000.0;
        while f < 19000.0 {
            if notch.response_at(f, 48000.0).norm() < half_power {
                lower = f;
                break;
            }
            f += 0.5;
        }
        let mut f = 21000.0;
        while f > 19000.0 {
            if notch.response_at(f, 48000.0).norm() < half_power {
                upper = f;
                break;
            }
            f -= 0.5;
        }

        let measured = upper - lower;
        assert!(
            (measured - notch.bandwidth_hz()).abs() < 0.1 * notch.bandwidth_hz(),
            "measured bandwidth {} Hz, expected {} Hz",
            measured,
            notch.bandwidth_hz()
        );
    }

    #[test]
    fn test_pole_radius_mapping() {
        let notch = NotchFilter::from_pole_radius(19000.0, 0.98, 48000.0).unwrap();
        assert!((notch.q() - 25.0).abs() < 1e-9);
        assert!(NotchFilter::from_pole_radius(19000.0, 1.0, 48000.0).is_err());
    }
}
