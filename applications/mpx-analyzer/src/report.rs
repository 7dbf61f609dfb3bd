//! Chain analysis report
//!
//! The chain is analyzed twice: on the configured test points for the
//! tables, and on the high-resolution passband sweep for ripple, grade and
//! contributor ranking.

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use mpx_response::{
    analyze_chain, classify, linear_to_db, ChainAnalysis, Contributor, FilterSpec, PassbandBounds,
    QualityGrade, ResponsePoint, RippleReport, TransferFunction,
};
use serde::Serialize;
use std::fmt;
use tracing::info;

const RULE_WIDTH: usize = 80;

/// Both analyses of one configured chain
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub sample_rate: f64,
    pub passband: PassbandBounds,
    /// Analysis on the test points
    pub test_points: ChainAnalysis,
    /// Analysis on the passband sweep
    pub sweep: ChainAnalysis,
}

/// Run the configured analysis
pub fn run(config: &AnalyzerConfig) -> Result<AnalysisReport> {
    config.validate()?;

    let stages = config.build_stages()?;
    let passband = config.passband()?;

    let test_points = analyze_chain(&stages, &config.test_point_grid()?, passband)?;
    let sweep = analyze_chain(&stages, &config.sweep_grid()?, passband)?;

    info!(
        "Analyzed {} stages: {} test points, {}-point sweep, ripple {:.4} dB ({})",
        stages.len(),
        test_points.grid.len(),
        sweep.grid.len(),
        sweep.cascade_ripple.ripple_db,
        sweep.grade
    );

    Ok(AnalysisReport {
        sample_rate: config.analysis.sample_rate,
        passband,
        test_points,
        sweep,
    })
}

/// Grade a measured peak-to-peak ripple
///
/// Ripple is never negative, so negative or non-finite input is rejected.
pub fn grade_ripple(ripple_db: f64) -> Result<QualityGrade> {
    if !ripple_db.is_finite() || ripple_db < 0.0 {
        return Err(AnalyzerError::InvalidInput(format!(
            "ripple must be a finite, non-negative dB value, got {}",
            ripple_db
        )));
    }
    Ok(classify(ripple_db))
}

impl AnalysisReport {
    pub fn grade(&self) -> QualityGrade {
        self.sweep.grade
    }

    pub fn ripple(&self) -> &RippleReport {
        &self.sweep.cascade_ripple
    }

    pub fn contributors(&self) -> &[Contributor] {
        &self.sweep.contributors
    }

    pub fn primary_limiter(&self) -> Option<&Contributor> {
        self.sweep.primary_limiter()
    }

    /// Serializable summary
    pub fn to_json_report(&self) -> JsonReport {
        let stages = self
            .test_points
            .stages
            .iter()
            .zip(&self.sweep.stages)
            .map(|(points, sweep)| StageSummary {
                name: points.name.clone(),
                kind: points.spec.kind().label().to_string(),
                dc_gain: points.spec.dc_gain(),
                test_points: points.response.points(),
                ripple: sweep.ripple.clone(),
            })
            .collect();

        JsonReport {
            sample_rate: self.sample_rate,
            passband: self.passband,
            stages,
            cascade: CascadeSummary {
                test_points: self.test_points.cascade.points(),
                ripple: self.sweep.cascade_ripple.clone(),
            },
            grade: self.grade(),
            contributors: self.contributors().to_vec(),
            primary_limiter: self.primary_limiter().map(|c| c.stage.clone()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_report())?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub sample_rate: f64,
    pub passband: PassbandBounds,
    pub stages: Vec<StageSummary>,
    pub cascade: CascadeSummary,
    pub grade: QualityGrade,
    pub contributors: Vec<Contributor>,
    pub primary_limiter: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub name: String,
    pub kind: String,
    pub dc_gain: f64,
    pub test_points: Vec<ResponsePoint>,
    pub ripple: RippleReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct CascadeSummary {
    pub test_points: Vec<ResponsePoint>,
    pub ripple: RippleReport,
}

fn heavy_rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn light_rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

/// One-line description of a stage's parameters
fn stage_heading(spec: &FilterSpec) -> String {
    match spec {
        FilterSpec::PreEmphasis(p) => format!(
            "PRE-EMPHASIS FILTER: H(z) = {} * (1 - {}*z^-1)",
            p.gain(),
            p.alpha()
        ),
        FilterSpec::Notch(n) => format!(
            "NOTCH FILTER: {} Hz center, Q = {}",
            n.center_freq(),
            n.q()
        ),
        FilterSpec::PolyphaseUpsampler(u) => format!(
            "POLYPHASE FIR UPSAMPLER: {}x, {}-tap Kaiser, {} Hz LPF",
            u.factor(),
            u.num_taps(),
            u.cutoff_freq()
        ),
    }
}

fn write_stage_details(
    f: &mut fmt::Formatter<'_>,
    spec: &FilterSpec,
    sample_rate: f64,
) -> fmt::Result {
    match spec {
        FilterSpec::PreEmphasis(p) => {
            writeln!(f, "DC Gain (f=0): {:.6}", p.dc_gain())?;
            writeln!(
                f,
                "Nyquist Gain (f={}): {:.6}",
                sample_rate / 2.0,
                p.nyquist_gain()
            )?;
        }
        FilterSpec::Notch(n) => {
            let depth = linear_to_db(n.response_at(n.center_freq(), sample_rate).norm());
            writeln!(f, "Notch Frequency: {} Hz", n.center_freq())?;
            writeln!(f, "Q Factor: {}", n.q())?;
            writeln!(f, "Bandwidth: {:.1} Hz", n.bandwidth_hz())?;
            writeln!(f, "Pole Radius: {:.6}", n.pole_radius())?;
            writeln!(f, "Attenuation at {} Hz: {:.2} dB", n.center_freq(), depth)?;
        }
        FilterSpec::PolyphaseUpsampler(u) => {
            writeln!(f, "Upsampling Factor: {}x", u.factor())?;
            writeln!(f, "Input Sample Rate: {} Hz", u.input_rate())?;
            writeln!(f, "Output Sample Rate: {} Hz", u.output_rate())?;
            writeln!(f, "Number of Taps: {}", u.num_taps())?;
            writeln!(f, "Taps per Phase: {}", u.taps_per_phase())?;
            writeln!(f, "Kaiser Beta: {:.3}", u.kaiser_beta())?;
            writeln!(f, "Cutoff Frequency: {} Hz", u.cutoff_freq())?;
        }
    }
    Ok(())
}

fn write_test_point_table(f: &mut fmt::Formatter<'_>, points: &[ResponsePoint]) -> fmt::Result {
    writeln!(f, "Frequency Response at Test Points:")?;
    writeln!(
        f,
        "{:<12} {:<20} {:<15}",
        "Frequency", "Magnitude (linear)", "Magnitude (dB)"
    )?;
    writeln!(f, "{}", "-".repeat(50))?;
    for p in points {
        writeln!(
            f,
            "{:>8} Hz   {:>18.6}   {:>13.4} dB",
            p.frequency_hz, p.magnitude, p.magnitude_db
        )?;
    }
    writeln!(f)
}

fn write_grade_legend(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Flatness grades (peak-to-peak passband ripple):")?;
    let mut lower: Option<f64> = None;
    for grade in QualityGrade::ALL {
        let label = format!("{}:", grade);
        match (lower, grade.upper_bound_db()) {
            (None, Some(upper)) => writeln!(f, "  {:<11} < {} dB ripple", label, upper)?,
            (Some(lower), Some(upper)) => {
                writeln!(f, "  {:<11} {} - {} dB ripple", label, lower, upper)?;
            }
            (Some(lower), None) => writeln!(f, "  {:<11} >= {} dB ripple", label, lower)?,
            (None, None) => writeln!(f, "  {}", label)?,
        }
        lower = grade.upper_bound_db();
    }
    writeln!(f)
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heavy_rule(f)?;
        writeln!(f, "FREQUENCY RESPONSE ANALYSIS - MPX FILTER CHAIN")?;
        heavy_rule(f)?;
        writeln!(f, "Sample Rate: {} Hz", self.sample_rate)?;
        writeln!(f, "Audio Band: {}", self.passband)?;
        writeln!(f)?;

        for (index, (points, sweep)) in self
            .test_points
            .stages
            .iter()
            .zip(&self.sweep.stages)
            .enumerate()
        {
            light_rule(f)?;
            writeln!(f, "{}. {}", index + 1, stage_heading(&points.spec))?;
            light_rule(f)?;
            write_stage_details(f, &points.spec, self.sample_rate)?;
            writeln!(f)?;
            write_test_point_table(f, &points.response.points())?;

            let r = &sweep.ripple;
            writeln!(
                f,
                "Passband Ripple ({}): {:.4} dB",
                self.passband, r.ripple_db
            )?;
            writeln!(f, "  Max: {:.4} dB at {:.1} Hz", r.max_db, r.max_freq)?;
            writeln!(f, "  Min: {:.4} dB at {:.1} Hz", r.min_db, r.min_freq)?;
            writeln!(f)?;
        }

        heavy_rule(f)?;
        writeln!(f, "CASCADED FREQUENCY RESPONSE (All Stages)")?;
        heavy_rule(f)?;
        writeln!(f)?;
        writeln!(f, "Frequency Response at Test Points:")?;
        write!(f, "{:<12}", "Frequency")?;
        for i in 1..=self.test_points.stages.len() {
            write!(f, " {:<12}", format!("H{} (dB)", i))?;
        }
        writeln!(f, " {:<12} {:<15}", "Total (dB)", "Total (linear)")?;
        light_rule(f)?;

        let stage_db: Vec<Vec<f64>> = self
            .test_points
            .stages
            .iter()
            .map(|s| s.response.magnitude_db())
            .collect();
        for (k, total) in self.test_points.cascade.points().iter().enumerate() {
            write!(f, "{:>8} Hz ", total.frequency_hz)?;
            for db in &stage_db {
                write!(f, "  {:>10.4} ", db[k])?;
            }
            writeln!(
                f,
                "  {:>10.4}   {:>13.6}",
                total.magnitude_db, total.magnitude
            )?;
        }
        writeln!(f)?;

        let r = self.ripple();
        writeln!(f, "PASSBAND RIPPLE ANALYSIS ({}):", self.passband)?;
        writeln!(f, "  Peak-to-Peak Ripple: {:.4} dB", r.ripple_db)?;
        writeln!(f, "  Maximum Gain: {:.4} dB at {:.1} Hz", r.max_db, r.max_freq)?;
        writeln!(f, "  Minimum Gain: {:.4} dB at {:.1} Hz", r.min_db, r.min_freq)?;
        writeln!(f, "  Mean Gain: {:.4} dB", r.mean_db)?;
        writeln!(f, "  Standard Deviation: {:.4} dB", r.std_db)?;
        writeln!(f, "  Sweep Points: {}", r.point_count)?;
        writeln!(f)?;

        heavy_rule(f)?;
        writeln!(f, "FLATNESS QUALITY ASSESSMENT")?;
        heavy_rule(f)?;
        writeln!(f)?;
        write_grade_legend(f)?;
        writeln!(f, "Measured Ripple: {:.4} dB", r.ripple_db)?;
        writeln!(f, "Quality Rating: {}", self.grade())?;
        writeln!(f)?;

        writeln!(f, "DOMINANT FLATNESS CONTRIBUTORS:")?;
        for c in self.contributors() {
            writeln!(f, "  {}: {:.4} dB", c.stage, c.ripple_db)?;
        }
        writeln!(f)?;
        if let Some(limiter) = self.primary_limiter() {
            writeln!(
                f,
                "PRIMARY LIMITER: {} ({:.4} dB ripple)",
                limiter.stage, limiter.ripple_db
            )?;
            writeln!(f)?;
        }

        heavy_rule(f)?;
        writeln!(f, "ANALYSIS COMPLETE")?;
        heavy_rule(f)
    }
}
