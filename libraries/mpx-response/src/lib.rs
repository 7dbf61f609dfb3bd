//! Frequency-response analysis for the FM MPX audio conditioning chain
//!
//! This crate provides:
//! - Closed-form models of the pre-emphasis, pilot notch and polyphase
//!   upsampler stages
//! - Complex frequency-response evaluation over a frequency grid
//! - Cascade composition of stage responses
//! - Passband ripple metrics and a flatness quality grade
//! - Ranking of the stages that limit overall flatness
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌────────────┐     ┌─────────┐     ┌────────┐     ┌─────────┐
//! │ FilterSpec │ ──► │  evaluate  │ ──► │ cascade │ ──► │ ripple │ ──► │ classify│
//! └────────────┘     └────────────┘     └─────────┘     └────────┘     └─────────┘
//!                          │                                 ▲
//!                          └──── per-stage ripple ───────────┘──► rank_contributors
//! ```
//!
//! All types are immutable values; every function is pure.
//!
//! # Example
//!
//! ```rust
//! use mpx_response::{analyze_chain, reference_chain, FrequencyGrid, PassbandBounds};
//!
//! let grid = FrequencyGrid::logarithmic(48000.0, 20.0, 15000.0, 1000).unwrap();
//! let chain = reference_chain(48000.0).unwrap();
//! let analysis = analyze_chain(&chain, &grid, PassbandBounds::default()).unwrap();
//!
//! println!("{}", analysis.cascade_ripple);
//! println!("Quality: {}", analysis.grade);
//! ```

mod analysis;
mod cascade;
mod error;
pub mod filters;
mod grid;
mod quality;
mod response;
mod ripple;

pub use analysis::{
    analyze_chain, reference_chain, ChainAnalysis, NamedStage, StageAnalysis,
    PILOT_FREQUENCY_HZ, REFERENCE_NOTCH_Q, REFERENCE_PREEMPHASIS_ALPHA,
    REFERENCE_PREEMPHASIS_GAIN, REFERENCE_UPSAMPLER_CUTOFF_HZ, REFERENCE_UPSAMPLER_TAPS,
    REFERENCE_UPSAMPLE_FACTOR,
};
pub use cascade::cascade;
pub use error::{ResponseError, Result};
pub use filters::{
    FilterSpec, NotchFilter, PolyphaseUpsampler, PreEmphasisFilter, StageKind, TransferFunction,
};
pub use grid::FrequencyGrid;
pub use quality::{classify, primary_limiter, rank_contributors, Contributor, QualityGrade};
pub use response::{
    evaluate, linear_to_db, ComplexResponse, ResponsePoint, MAGNITUDE_FLOOR, MAGNITUDE_FLOOR_DB,
};
pub use ripple::{
    ripple, PassbandBounds, RippleReport, DEFAULT_PASSBAND_MAX_HZ, DEFAULT_PASSBAND_MIN_HZ,
};

/// Complex number type used for transfer function values
pub use rustfft::num_complex::Complex64;
