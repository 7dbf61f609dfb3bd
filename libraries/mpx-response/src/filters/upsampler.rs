//! Polyphase FIR interpolation filter
//!
//! Models the anti-imaging low-pass used when upsampling by an integer factor
//! L. The prototype runs at the output rate fs_out = fs_in · L; its taps are
//! split into L polyphase branches in the real-time path, but for frequency
//! analysis the full prototype is evaluated directly:
//!
//! H(e^jω) = Σ h[n]·e^(−jωn),  ω = 2π·f / fs_out
//!
//! Zero insertion divides the signal amplitude by L, so the taps are scaled to
//! sum to L and the interpolated output keeps unity gain.

use super::kaiser::{
    kaiser_beta, kaiser_window, passband_ripple_attenuation_db, windowed_sinc_lowpass,
};
use super::{unit_delay, TransferFunction};
use crate::error::{ResponseError, Result};
use rustfft::num_complex::Complex64;
use tracing::debug;

/// Passband ripple the default Kaiser design targets (dB, peak-to-peak)
pub const PASSBAND_RIPPLE_TARGET_DB: f64 = 0.01;

/// Stopband attenuation the default Kaiser design targets (dB)
pub const STOPBAND_ATTENUATION_TARGET_DB: f64 = 80.0;

/// Kaiser-windowed interpolation low-pass
#[derive(Debug, Clone, PartialEq)]
pub struct PolyphaseUpsampler {
    factor: usize,
    cutoff_freq: f64,
    input_rate: f64,
    beta: f64,
    taps: Vec<f64>,
}

impl PolyphaseUpsampler {
    /// Create an upsampler with β derived from the ripple/attenuation targets
    ///
    /// # Arguments
    /// * `factor` - Upsample factor L (≥ 2)
    /// * `num_taps` - Prototype length N (≥ 1)
    /// * `cutoff_freq` - Cutoff in Hz, referenced to the output rate
    /// * `input_rate` - Input sample rate in Hz
    pub fn new(factor: usize, num_taps: usize, cutoff_freq: f64, input_rate: f64) -> Result<Self> {
        let required_db = STOPBAND_ATTENUATION_TARGET_DB
            .max(passband_ripple_attenuation_db(PASSBAND_RIPPLE_TARGET_DB));
        Self::with_kaiser_beta(factor, num_taps, cutoff_freq, input_rate, kaiser_beta(required_db))
    }

    /// Create an upsampler with an explicit Kaiser β
    pub fn with_kaiser_beta(
        factor: usize,
        num_taps: usize,
        cutoff_freq: f64,
        input_rate: f64,
        beta: f64,
    ) -> Result<Self> {
        if factor < 2 {
            return Err(ResponseError::parameter(format!(
                "upsample factor must be at least 2, got {}",
                factor
            )));
        }
        if num_taps < 1 {
            return Err(ResponseError::parameter("upsampler needs at least 1 tap"));
        }
        if !input_rate.is_finite() || input_rate <= 0.0 {
            return Err(ResponseError::parameter(format!(
                "upsampler input rate must be positive, got {} Hz",
                input_rate
            )));
        }
        if !beta.is_finite() || beta < 0.0 {
            return Err(ResponseError::parameter(format!(
                "Kaiser beta must be non-negative, got {}",
                beta
            )));
        }

        let output_nyquist = input_rate * factor as f64 / 2.0;
        if !(cutoff_freq > 0.0 && cutoff_freq < output_nyquist) {
            return Err(ResponseError::parameter(format!(
                "upsampler cutoff {} Hz must lie in (0, {}) Hz",
                cutoff_freq, output_nyquist
            )));
        }

        let window = kaiser_window(num_taps, beta);
        let mut taps = windowed_sinc_lowpass(cutoff_freq / output_nyquist, &window)
            .ok_or_else(|| {
                ResponseError::parameter(format!(
                    "{} taps at cutoff {} Hz cannot be normalized to unity gain",
                    num_taps, cutoff_freq
                ))
            })?;
        for tap in &mut taps {
            *tap *= factor as f64;
        }

        debug!(
            "Upsampler: L={}, N={}, fc={} Hz, fs_in={} Hz, beta={:.3}",
            factor, num_taps, cutoff_freq, input_rate, beta
        );

        Ok(Self {
            factor,
            cutoff_freq,
            input_rate,
            beta,
            taps,
        })
    }

    /// Upsample factor L
    pub fn factor(&self) -> usize {
        self.factor
    }

    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    pub fn cutoff_freq(&self) -> f64 {
        self.cutoff_freq
    }

    pub fn input_rate(&self) -> f64 {
        self.input_rate
    }

    /// Output sample rate, fs_in · L
    pub fn output_rate(&self) -> f64 {
        self.input_rate * self.factor as f64
    }

    pub fn kaiser_beta(&self) -> f64 {
        self.beta
    }

    /// Prototype taps (sum = L)
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Taps per polyphase branch, ⌈N / L⌉
    pub fn taps_per_phase(&self) -> usize {
        self.taps.len().div_ceil(self.factor)
    }

    /// Split the prototype into its L polyphase branches
    ///
    /// Branch p holds h[p], h[p + L], h[p + 2L], …
    pub fn polyphase_branches(&self) -> Vec<Vec<f64>> {
        (0..self.factor)
            .map(|phase| {
                self.taps
                    .iter()
                    .skip(phase)
                    .step_by(self.factor)
                    .copied()
                    .collect()
            })
            .collect()
    }
}

impl TransferFunction for PolyphaseUpsampler {
    fn response_at(&self, freq_hz: f64, _grid_rate: f64) -> Complex64 {
        let z_inv = unit_delay(freq_hz, self.output_rate());

        // Horner's rule over z⁻¹
        self.taps
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &h| acc * z_inv + h)
    }

    fn max_frequency(&self, _grid_rate: f64) -> f64 {
        self.input_rate / 2.0
    }

    fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }
}
