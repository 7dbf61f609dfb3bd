//! Configuration loading tests
//!
//! Each test uses its own environment prefix so parallel tests never see
//! each other's overrides.

use mpx_analyzer::{AnalyzerConfig, AnalyzerError};
use mpx_response::{reference_chain, FilterSpec};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_match_reference_chain() {
    let config = AnalyzerConfig::default();
    config.validate().unwrap();

    let stages = config.build_stages().unwrap();
    assert_eq!(stages, reference_chain(48000.0).unwrap());
}

#[test]
fn test_missing_sections_use_defaults() {
    let file = write_config(
        r#"
[notch]
q = 30.0
"#,
    );
    let config = AnalyzerConfig::load_with_prefix(Some(file.path()), "MPXTEST_SECTIONS").unwrap();

    assert_eq!(config.notch.q, 30.0);
    assert_eq!(config.notch.center_hz, 19000.0);
    assert_eq!(config.analysis, AnalyzerConfig::default().analysis);
    assert_eq!(config.upsampler, AnalyzerConfig::default().upsampler);
}

#[test]
fn test_full_file_round_trip() {
    let file = write_config(
        r#"
[analysis]
sample_rate = 96000.0
passband_min_hz = 30.0
passband_max_hz = 16000.0
test_points = [1000.0, 30.0]
sweep_points = 200

[preemphasis]
gain = 1.0
time_constant_us = 75.0

[upsampler]
factor = 2
taps = 64
cutoff_hz = 20000.0
kaiser_beta = 5.0
"#,
    );
    let config = AnalyzerConfig::load_with_prefix(Some(file.path()), "MPXTEST_FULL").unwrap();
    config.validate().unwrap();

    // Test points are sorted into a grid
    let grid = config.test_point_grid().unwrap();
    assert_eq!(grid.frequencies(), &[30.0, 1000.0]);
    assert_eq!(config.sweep_grid().unwrap().len(), 200);

    let stages = config.build_stages().unwrap();
    match &stages[0].spec {
        FilterSpec::PreEmphasis(p) => {
            let expected = (-1.0 / (75e-6 * 96000.0_f64)).exp();
            assert!((p.alpha() - expected).abs() < 1e-12);
        }
        other => panic!("unexpected first stage {:?}", other),
    }
    match &stages[2].spec {
        FilterSpec::PolyphaseUpsampler(u) => {
            assert_eq!(u.factor(), 2);
            assert_eq!(u.num_taps(), 64);
            assert_eq!(u.kaiser_beta(), 5.0);
        }
        other => panic!("unexpected last stage {:?}", other),
    }
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
[notch]
q = 30.0
"#,
    );
    std::env::set_var("MPXTEST_ENV__NOTCH__Q", "12");
    std::env::set_var("MPXTEST_ENV__ANALYSIS__SWEEP_POINTS", "250");

    let config = AnalyzerConfig::load_with_prefix(Some(file.path()), "MPXTEST_ENV").unwrap();

    std::env::remove_var("MPXTEST_ENV__NOTCH__Q");
    std::env::remove_var("MPXTEST_ENV__ANALYSIS__SWEEP_POINTS");

    assert_eq!(config.notch.q, 12.0);
    assert_eq!(config.analysis.sweep_points, 250);
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let result = AnalyzerConfig::load_with_prefix(Some(path.as_path()), "MPXTEST_MISSING");
    assert!(matches!(result, Err(AnalyzerError::Config(_))));
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = write_config("[notch]\nq = \"not a number\"\n");
    let result = AnalyzerConfig::load_with_prefix(Some(file.path()), "MPXTEST_MALFORMED");
    assert!(matches!(result, Err(AnalyzerError::Config(_))));
}

#[test]
fn test_validate_rejects_bad_analysis_settings() {
    let mut config = AnalyzerConfig::default();
    config.analysis.passband_max_hz = 30000.0;
    assert!(matches!(config.validate(), Err(AnalyzerError::Config(_))));

    let mut config = AnalyzerConfig::default();
    config.analysis.sweep_points = 1;
    assert!(config.validate().is_err());

    let mut config = AnalyzerConfig::default();
    config.analysis.test_points = vec![];
    assert!(config.validate().is_err());

    let mut config = AnalyzerConfig::default();
    config.analysis.test_points = vec![1000.0, 25000.0];
    assert!(config.validate().is_err());

    let mut config = AnalyzerConfig::default();
    config.analysis.passband_min_hz = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_filter_parameters_surface_as_analysis_errors() {
    let mut config = AnalyzerConfig::default();
    config.notch.center_hz = 30000.0;
    assert!(matches!(
        config.build_stages(),
        Err(AnalyzerError::Analysis(_))
    ));

    let mut config = AnalyzerConfig::default();
    config.upsampler.factor = 1;
    assert!(matches!(
        config.build_stages(),
        Err(AnalyzerError::Analysis(_))
    ));
}
