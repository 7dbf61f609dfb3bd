/// Analyzer configuration
use crate::error::{AnalyzerError, Result};
use mpx_response::{
    FrequencyGrid, NamedStage, NotchFilter, PassbandBounds, PolyphaseUpsampler,
    PreEmphasisFilter,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "mpx-analyzer.toml";

/// Environment variable prefix (`MPX__NOTCH__Q=30`)
pub const ENV_PREFIX: &str = "MPX";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_analysis")]
    pub analysis: AnalysisSettings,

    #[serde(default = "default_preemphasis")]
    pub preemphasis: PreEmphasisSettings,

    #[serde(default = "default_notch")]
    pub notch: NotchSettings,

    #[serde(default = "default_upsampler")]
    pub upsampler: UpsamplerSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisSettings {
    /// Input sample rate of the chain (Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    #[serde(default = "default_passband_min_hz")]
    pub passband_min_hz: f64,

    #[serde(default = "default_passband_max_hz")]
    pub passband_max_hz: f64,

    /// Frequencies tabulated in the text report
    #[serde(default = "default_test_points")]
    pub test_points: Vec<f64>,

    /// Log-spaced points across the passband used for ripple
    #[serde(default = "default_sweep_points")]
    pub sweep_points: usize,

    /// Log-spaced points from `plot_min_hz` to Nyquist for plot export
    #[serde(default = "default_plot_points")]
    pub plot_points: usize,

    #[serde(default = "default_plot_min_hz")]
    pub plot_min_hz: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PreEmphasisSettings {
    #[serde(default = "default_preemphasis_gain")]
    pub gain: f64,

    #[serde(default = "default_preemphasis_alpha")]
    pub alpha: f64,

    /// Overrides `alpha` when set
    #[serde(default)]
    pub time_constant_us: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotchSettings {
    #[serde(default = "default_notch_center_hz")]
    pub center_hz: f64,

    #[serde(default = "default_notch_q")]
    pub q: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UpsamplerSettings {
    #[serde(default = "default_upsample_factor")]
    pub factor: usize,

    #[serde(default = "default_upsampler_taps")]
    pub taps: usize,

    #[serde(default = "default_upsampler_cutoff_hz")]
    pub cutoff_hz: f64,

    /// Explicit Kaiser β; derived from the attenuation targets when unset
    #[serde(default)]
    pub kaiser_beta: Option<f64>,
}

impl AnalyzerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `mpx-analyzer.toml` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`AnalyzerConfig::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AnalyzerError::Config(format!(
                        "config file not found: {:?}",
                        path
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (MPX__SECTION__KEY)
        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    ///
    /// Filter parameters themselves are checked when the stages are built.
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;

        if !analysis.sample_rate.is_finite() || analysis.sample_rate <= 0.0 {
            return Err(AnalyzerError::Config(format!(
                "sample_rate must be positive, got {}",
                analysis.sample_rate
            )));
        }

        let nyquist = analysis.sample_rate / 2.0;
        if !(analysis.passband_min_hz > 0.0 && analysis.passband_min_hz < analysis.passband_max_hz)
        {
            return Err(AnalyzerError::Config(format!(
                "passband must satisfy 0 < min < max, got {} Hz .. {} Hz",
                analysis.passband_min_hz, analysis.passband_max_hz
            )));
        }
        if analysis.passband_max_hz > nyquist {
            return Err(AnalyzerError::Config(format!(
                "passband_max_hz {} exceeds Nyquist ({} Hz)",
                analysis.passband_max_hz, nyquist
            )));
        }

        if analysis.test_points.is_empty() {
            return Err(AnalyzerError::Config(
                "at least one test point is required".to_string(),
            ));
        }
        if let Some(f) = analysis
            .test_points
            .iter()
            .find(|&&f| !(0.0..=nyquist).contains(&f))
        {
            return Err(AnalyzerError::Config(format!(
                "test point {} Hz outside 0 Hz .. {} Hz",
                f, nyquist
            )));
        }

        if analysis.sweep_points < 2 || analysis.plot_points < 2 {
            return Err(AnalyzerError::Config(format!(
                "sweep_points and plot_points need at least 2 points, got {} and {}",
                analysis.sweep_points, analysis.plot_points
            )));
        }
        if !(analysis.plot_min_hz > 0.0 && analysis.plot_min_hz < nyquist) {
            return Err(AnalyzerError::Config(format!(
                "plot_min_hz must lie in (0, {}) Hz, got {}",
                nyquist, analysis.plot_min_hz
            )));
        }

        Ok(())
    }

    pub fn passband(&self) -> Result<PassbandBounds> {
        Ok(PassbandBounds::new(
            self.analysis.passband_min_hz,
            self.analysis.passband_max_hz,
        )?)
    }

    /// Test points, sorted, as a grid
    pub fn test_point_grid(&self) -> Result<FrequencyGrid> {
        let mut points = self.analysis.test_points.clone();
        points.sort_by(f64::total_cmp);
        points.dedup();
        Ok(FrequencyGrid::new(self.analysis.sample_rate, points)?)
    }

    /// High-resolution sweep across the passband
    pub fn sweep_grid(&self) -> Result<FrequencyGrid> {
        Ok(FrequencyGrid::logarithmic(
            self.analysis.sample_rate,
            self.analysis.passband_min_hz,
            self.analysis.passband_max_hz,
            self.analysis.sweep_points,
        )?)
    }

    /// Full-band sweep for plots, `plot_min_hz` to Nyquist
    pub fn plot_grid(&self) -> Result<FrequencyGrid> {
        Ok(FrequencyGrid::logarithmic(
            self.analysis.sample_rate,
            self.analysis.plot_min_hz,
            self.analysis.sample_rate / 2.0,
            self.analysis.plot_points,
        )?)
    }

    /// Build the configured chain in signal order
    pub fn build_stages(&self) -> Result<Vec<NamedStage>> {
        let fs = self.analysis.sample_rate;

        let preemphasis = match self.preemphasis.time_constant_us {
            Some(tau) => PreEmphasisFilter::from_time_constant(tau, fs, self.preemphasis.gain)?,
            None => PreEmphasisFilter::new(self.preemphasis.gain, self.preemphasis.alpha)?,
        };

        let notch = NotchFilter::new(self.notch.center_hz, self.notch.q, fs)?;

        let upsampler = match self.upsampler.kaiser_beta {
            Some(beta) => PolyphaseUpsampler::with_kaiser_beta(
                self.upsampler.factor,
                self.upsampler.taps,
                self.upsampler.cutoff_hz,
                fs,
                beta,
            )?,
            None => PolyphaseUpsampler::new(
                self.upsampler.factor,
                self.upsampler.taps,
                self.upsampler.cutoff_hz,
                fs,
            )?,
        };

        Ok(vec![
            NamedStage::new("Pre-emphasis", preemphasis),
            NamedStage::new("Notch filter", notch),
            NamedStage::new("Upsampler FIR", upsampler),
        ])
    }
}

// Default values
fn default_analysis() -> AnalysisSettings {
    AnalysisSettings {
        sample_rate: default_sample_rate(),
        passband_min_hz: default_passband_min_hz(),
        passband_max_hz: default_passband_max_hz(),
        test_points: default_test_points(),
        sweep_points: default_sweep_points(),
        plot_points: default_plot_points(),
        plot_min_hz: default_plot_min_hz(),
    }
}

fn default_sample_rate() -> f64 {
    48000.0
}

fn default_passband_min_hz() -> f64 {
    mpx_response::DEFAULT_PASSBAND_MIN_HZ
}

fn default_passband_max_hz() -> f64 {
    mpx_response::DEFAULT_PASSBAND_MAX_HZ
}

fn default_test_points() -> Vec<f64> {
    vec![20.0, 100.0, 1000.0, 5000.0, 10000.0, 15000.0]
}

fn default_sweep_points() -> usize {
    1000
}

fn default_plot_points() -> usize {
    2000
}

fn default_plot_min_hz() -> f64 {
    10.0
}

fn default_preemphasis() -> PreEmphasisSettings {
    PreEmphasisSettings {
        gain: default_preemphasis_gain(),
        alpha: default_preemphasis_alpha(),
        time_constant_us: None,
    }
}

fn default_preemphasis_gain() -> f64 {
    mpx_response::REFERENCE_PREEMPHASIS_GAIN
}

fn default_preemphasis_alpha() -> f64 {
    mpx_response::REFERENCE_PREEMPHASIS_ALPHA
}

fn default_notch() -> NotchSettings {
    NotchSettings {
        center_hz: default_notch_center_hz(),
        q: default_notch_q(),
    }
}

fn default_notch_center_hz() -> f64 {
    mpx_response::PILOT_FREQUENCY_HZ
}

fn default_notch_q() -> f64 {
    mpx_response::REFERENCE_NOTCH_Q
}

fn default_upsampler() -> UpsamplerSettings {
    UpsamplerSettings {
        factor: default_upsample_factor(),
        taps: default_upsampler_taps(),
        cutoff_hz: default_upsampler_cutoff_hz(),
        kaiser_beta: None,
    }
}

fn default_upsample_factor() -> usize {
    mpx_response::REFERENCE_UPSAMPLE_FACTOR
}

fn default_upsampler_taps() -> usize {
    mpx_response::REFERENCE_UPSAMPLER_TAPS
}

fn default_upsampler_cutoff_hz() -> f64 {
    mpx_response::REFERENCE_UPSAMPLER_CUTOFF_HZ
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            analysis: default_analysis(),
            preemphasis: default_preemphasis(),
            notch: default_notch(),
            upsampler: default_upsampler(),
        }
    }
}
