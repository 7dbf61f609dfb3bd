//! Closed-form filter models for the MPX conditioning chain
//!
//! The chain has three stages, in signal order:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────────────┐
//! │ Pre-emphasis │ ──► │ 19 kHz notch │ ──► │ Polyphase upsampler │
//! └──────────────┘     └──────────────┘     └─────────────────────┘
//! ```
//!
//! Each model derives its coefficients once at construction and is immutable
//! afterwards. [`FilterSpec`] is the tagged variant the rest of the crate works
//! with; every variant implements [`TransferFunction`].

pub mod kaiser;
mod notch;
mod preemphasis;
mod upsampler;

pub use notch::{BiquadCoefficients, NotchFilter};
pub use preemphasis::PreEmphasisFilter;
pub use upsampler::{PolyphaseUpsampler, PASSBAND_RIPPLE_TARGET_DB, STOPBAND_ATTENUATION_TARGET_DB};

use rustfft::num_complex::Complex64;
use serde::Serialize;
use std::fmt;

/// Capability shared by every filter model: evaluate H(e^jω) at a frequency
pub trait TransferFunction {
    /// Complex gain at `freq_hz`
    ///
    /// `grid_rate` is the sample rate of the grid being evaluated. Models that
    /// carry their own rate (notch, upsampler) ignore it.
    fn response_at(&self, freq_hz: f64, grid_rate: f64) -> Complex64;

    /// Highest frequency (Hz) at which the model may be evaluated
    fn max_frequency(&self, grid_rate: f64) -> f64;

    /// Analytic gain at 0 Hz
    fn dc_gain(&self) -> f64;
}

/// Kind of filter stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    PreEmphasis,
    Notch,
    PolyphaseUpsampler,
}

impl StageKind {
    /// Human-readable stage label
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreEmphasis => "Pre-emphasis filter",
            Self::Notch => "Notch filter",
            Self::PolyphaseUpsampler => "Upsampler FIR",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One filter stage of the chain
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    PreEmphasis(PreEmphasisFilter),
    Notch(NotchFilter),
    PolyphaseUpsampler(PolyphaseUpsampler),
}

impl FilterSpec {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::PreEmphasis(_) => StageKind::PreEmphasis,
            Self::Notch(_) => StageKind::Notch,
            Self::PolyphaseUpsampler(_) => StageKind::PolyphaseUpsampler,
        }
    }
}

impl TransferFunction for FilterSpec {
    fn response_at(&self, freq_hz: f64, grid_rate: f64) -> Complex64 {
        match self {
            Self::PreEmphasis(f) => f.response_at(freq_hz, grid_rate),
            Self::Notch(f) => f.response_at(freq_hz, grid_rate),
            Self::PolyphaseUpsampler(f) => f.response_at(freq_hz, grid_rate),
        }
    }

    fn max_frequency(&self, grid_rate: f64) -> f64 {
        match self {
            Self::PreEmphasis(f) => f.max_frequency(grid_rate),
            Self::Notch(f) => f.max_frequency(grid_rate),
            Self::PolyphaseUpsampler(f) => f.max_frequency(grid_rate),
        }
    }

    fn dc_gain(&self) -> f64 {
        match self {
            Self::PreEmphasis(f) => f.dc_gain(),
            Self::Notch(f) => f.dc_gain(),
            Self::PolyphaseUpsampler(f) => f.dc_gain(),
        }
    }
}

impl From<PreEmphasisFilter> for FilterSpec {
    fn from(filter: PreEmphasisFilter) -> Self {
        Self::PreEmphasis(filter)
    }
}

impl From<NotchFilter> for FilterSpec {
    fn from(filter: NotchFilter) -> Self {
        Self::Notch(filter)
    }
}

impl From<PolyphaseUpsampler> for FilterSpec {
    fn from(filter: PolyphaseUpsampler) -> Self {
        Self::PolyphaseUpsampler(filter)
    }
}

/// e^(−jω) for a frequency and sample rate
pub(crate) fn unit_delay(freq_hz: f64, sample_rate: f64) -> Complex64 {
    let omega = 2.0 * std::f64::consts::PI * freq_hz / sample_rate;
    Complex64::from_polar(1.0, -omega)
}
