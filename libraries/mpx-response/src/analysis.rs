//! End-to-end chain analysis
//!
//! Runs the whole flow for a list of named stages on one grid: evaluate each
//! stage, multiply into the cascade, measure ripple for the cascade and for
//! every stage on its own, grade the cascade and rank the stages.

use crate::cascade::cascade;
use crate::error::Result;
use crate::filters::{FilterSpec, NotchFilter, PolyphaseUpsampler, PreEmphasisFilter};
use crate::grid::FrequencyGrid;
use crate::quality::{classify, primary_limiter, rank_contributors, Contributor, QualityGrade};
use crate::response::{evaluate, ComplexResponse};
use crate::ripple::{ripple, PassbandBounds, RippleReport};
use tracing::debug;

/// Pre-emphasis gain of the reference chain
pub const REFERENCE_PREEMPHASIS_GAIN: f64 = 3.0;

/// Pre-emphasis α of the reference chain (50 µs at 48 kHz)
pub const REFERENCE_PREEMPHASIS_ALPHA: f64 = 0.6592;

/// Stereo pilot frequency (Hz)
pub const PILOT_FREQUENCY_HZ: f64 = 19000.0;

/// Pilot notch Q of the reference chain
pub const REFERENCE_NOTCH_Q: f64 = 25.0;

/// Upsample factor of the reference chain
pub const REFERENCE_UPSAMPLE_FACTOR: usize = 4;

/// Interpolation filter length of the reference chain
pub const REFERENCE_UPSAMPLER_TAPS: usize = 96;

/// Interpolation filter cutoff of the reference chain (Hz)
pub const REFERENCE_UPSAMPLER_CUTOFF_HZ: f64 = 15000.0;

/// A filter stage with a display name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStage {
    pub name: String,
    pub spec: FilterSpec,
}

impl NamedStage {
    pub fn new(name: impl Into<String>, spec: impl Into<FilterSpec>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

/// One stage's response and its own passband ripple
#[derive(Debug, Clone)]
pub struct StageAnalysis {
    pub name: String,
    pub spec: FilterSpec,
    pub response: ComplexResponse,
    pub ripple: RippleReport,
}

/// Result of analyzing a chain on one grid
#[derive(Debug, Clone)]
pub struct ChainAnalysis {
    pub grid: FrequencyGrid,
    pub stages: Vec<StageAnalysis>,
    pub cascade: ComplexResponse,
    pub cascade_ripple: RippleReport,
    pub grade: QualityGrade,
    /// Stages ranked by individual ripple, largest first
    pub contributors: Vec<Contributor>,
}

impl ChainAnalysis {
    /// The stage limiting overall flatness
    pub fn primary_limiter(&self) -> Option<&Contributor> {
        primary_limiter(&self.contributors)
    }

    /// Look up a stage by name
    pub fn stage(&self, name: &str) -> Option<&StageAnalysis> {
        self.stages.iter().find(|s| s.name == name)
    }
}

/// Analyze a chain of stages on a grid over a passband
///
/// # Errors
/// Propagates evaluation, cascade and ripple errors; an empty stage list is
/// `InvalidParameter`.
pub fn analyze_chain(
    stages: &[NamedStage],
    grid: &FrequencyGrid,
    band: PassbandBounds,
) -> Result<ChainAnalysis> {
    let mut analyses = Vec::with_capacity(stages.len());
    for stage in stages {
        let response = evaluate(&stage.spec, grid)?;
        let ripple = ripple(&response.magnitude_db(), grid, band)?;
        debug!("{}: {}", stage.name, ripple);

        analyses.push(StageAnalysis {
            name: stage.name.clone(),
            spec: stage.spec.clone(),
            response,
            ripple,
        });
    }

    let responses: Vec<ComplexResponse> = analyses.iter().map(|s| s.response.clone()).collect();
    let total = cascade(&responses)?;
    let cascade_ripple = ripple(&total.magnitude_db(), grid, band)?;
    let grade = classify(cascade_ripple.ripple_db);

    let reports: Vec<(&str, RippleReport)> = analyses
        .iter()
        .map(|s| (s.name.as_str(), s.ripple.clone()))
        .collect();
    let contributors = rank_contributors(&reports);

    debug!(
        "Cascade: {} -> {} ({} stages, {} points)",
        cascade_ripple,
        grade,
        analyses.len(),
        grid.len()
    );

    Ok(ChainAnalysis {
        grid: grid.clone(),
        stages: analyses,
        cascade: total,
        cascade_ripple,
        grade,
        contributors,
    })
}

/// The MPX encoder's conditioning chain at input rate `sample_rate`
///
/// Pre-emphasis (gain 3.0, α 0.6592) → 19 kHz notch (Q 25) → 4× polyphase
/// upsampler (96 taps, 15 kHz cutoff).
pub fn reference_chain(sample_rate: f64) -> Result<Vec<NamedStage>> {
    Ok(vec![
        NamedStage::new(
            "Pre-emphasis",
            PreEmphasisFilter::new(REFERENCE_PREEMPHASIS_GAIN, REFERENCE_PREEMPHASIS_ALPHA)?,
        ),
        NamedStage::new(
            "Notch filter",
            NotchFilter::new(PILOT_FREQUENCY_HZ, REFERENCE_NOTCH_Q, sample_rate)?,
        ),
        NamedStage::new(
            "Upsampler FIR",
            PolyphaseUpsampler::new(
                REFERENCE_UPSAMPLE_FACTOR,
                REFERENCE_UPSAMPLER_TAPS,
                REFERENCE_UPSAMPLER_CUTOFF_HZ,
                sample_rate,
            )?,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResponseError;

    #[test]
    fn test_empty_chain_is_error() {
        let grid = FrequencyGrid::new(48000.0, vec![1000.0]).unwrap();
        assert!(matches!(
            analyze_chain(&[], &grid, PassbandBounds::default()),
            Err(ResponseError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_reference_chain_order() {
        let chain = reference_chain(48000.0).unwrap();
        let names: Vec<&str> = chain.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Pre-emphasis", "Notch filter", "Upsampler FIR"]);
    }

    #[test]
    fn test_reference_chain_rejects_low_rate() {
        // 19 kHz is above Nyquist at 32 kHz
        assert!(reference_chain(32000.0).is_err());
    }

    #[test]
    fn test_stage_lookup() {
        let grid = FrequencyGrid::new(48000.0, vec![20.0, 1000.0, 15000.0]).unwrap();
        let analysis =
            analyze_chain(&reference_chain(48000.0).unwrap(), &grid, PassbandBounds::default())
                .unwrap();
        assert!(analysis.stage("Notch filter").is_some());
        assert!(analysis.stage("missing").is_none());
    }
}
