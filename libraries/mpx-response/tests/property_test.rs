//! Property-based tests for the response analysis core
//!
//! These tests use proptest to verify invariants across many random inputs.

use mpx_response::{
    cascade, classify, evaluate, ripple, FilterSpec, FrequencyGrid, NotchFilter, PassbandBounds,
    PolyphaseUpsampler, PreEmphasisFilter, TransferFunction,
};
use proptest::prelude::*;

// Helper: Check if a series contains only finite values
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn audio_grid(fs: f64) -> FrequencyGrid {
    FrequencyGrid::logarithmic(fs, 20.0, fs / 2.0, 128).unwrap()
}

proptest! {
    /// Property: pre-emphasis DC gain is gain·(1−α)
    #[test]
    fn preemphasis_dc_gain(gain in 0.01f64..10.0, alpha in 0.0f64..0.999) {
        let stage: FilterSpec = PreEmphasisFilter::new(gain, alpha).unwrap().into();
        let grid = FrequencyGrid::new(48000.0, vec![0.0]).unwrap();
        let dc = evaluate(&stage, &grid).unwrap().magnitude()[0];
        prop_assert!((dc - gain * (1.0 - alpha)).abs() < 1e-6);
    }

    /// Property: pre-emphasis never decreases with frequency
    #[test]
    fn preemphasis_monotonic(gain in 0.1f64..10.0, alpha in 0.01f64..0.99) {
        let stage: FilterSpec = PreEmphasisFilter::new(gain, alpha).unwrap().into();
        let mags = evaluate(&stage, &audio_grid(48000.0)).unwrap().magnitude();
        prop_assert!(mags.windows(2).all(|w| w[1] > w[0]));
    }

    /// Property: the notch nulls its center and passes DC at unity
    #[test]
    fn notch_null_and_unity_dc(
        fs in prop::sample::select(vec![44100.0f64, 48000.0, 96000.0]),
        center_frac in 0.02f64..0.48,
        q in 1.0f64..50.0,
    ) {
        let center = center_frac * fs;
        let notch = NotchFilter::new(center, q, fs).unwrap();
        prop_assert!(notch.response_at(center, fs).norm() < 1e-9);
        prop_assert!((notch.dc_gain() - 1.0).abs() < 1e-9);
        prop_assert!(notch.pole_radius() < 1.0);
    }

    /// Property: interpolation taps always sum to the upsample factor
    #[test]
    fn upsampler_tap_sum(
        factor in 2usize..8,
        taps in 1usize..256,
        cutoff_frac in 0.05f64..0.95,
    ) {
        let fs_in = 48000.0;
        let cutoff = cutoff_frac * fs_in * factor as f64 / 2.0;
        if let Ok(up) = PolyphaseUpsampler::new(factor, taps, cutoff, fs_in) {
            let sum: f64 = up.taps().iter().sum();
            prop_assert!((sum - factor as f64).abs() < 1e-9 * factor as f64);
            prop_assert_eq!(up.num_taps(), taps);
        }
    }

    /// Property: magnitude_db is always finite, even at a null
    #[test]
    fn magnitude_db_always_finite(center_frac in 0.05f64..0.45, q in 1.0f64..40.0) {
        let fs = 48000.0;
        let center = center_frac * fs;
        let stage: FilterSpec = NotchFilter::new(center, q, fs).unwrap().into();
        let grid = FrequencyGrid::new(fs, vec![0.0, center, fs / 2.0]).unwrap();
        prop_assert!(all_finite(&evaluate(&stage, &grid).unwrap().magnitude_db()));
    }

    /// Property: cascade magnitude equals the product of stage magnitudes
    #[test]
    fn cascade_is_product(
        g1 in 0.1f64..5.0, a1 in 0.0f64..0.95,
        g2 in 0.1f64..5.0, a2 in 0.0f64..0.95,
    ) {
        let grid = audio_grid(48000.0);
        let s1: FilterSpec = PreEmphasisFilter::new(g1, a1).unwrap().into();
        let s2: FilterSpec = PreEmphasisFilter::new(g2, a2).unwrap().into();
        let h1 = evaluate(&s1, &grid).unwrap();
        let h2 = evaluate(&s2, &grid).unwrap();
        let total = cascade(&[h1.clone(), h2.clone()]).unwrap();

        for ((t, m1), m2) in total.magnitude().iter().zip(h1.magnitude()).zip(h2.magnitude()) {
            prop_assert!((t - m1 * m2).abs() <= 1e-9 * (m1 * m2));
        }
    }

    /// Property: ripple is non-negative and bounded by the series range
    #[test]
    fn ripple_non_negative(values in prop::collection::vec(-60.0f64..20.0, 1..200)) {
        let n = values.len();
        let freqs: Vec<f64> = (0..n).map(|i| 20.0 + i as f64 * 50.0).collect();
        let grid = FrequencyGrid::new(48000.0, freqs).unwrap();
        let band = PassbandBounds::new(0.0, 24000.0).unwrap();
        let report = ripple(&values, &grid, band).unwrap();

        prop_assert!(report.ripple_db >= 0.0);
        prop_assert!(report.std_db >= 0.0);
        prop_assert_eq!(report.point_count, n);
    }

    /// Property: grading is monotonic in ripple
    #[test]
    fn classify_monotonic(a in 0.0f64..10.0, b in 0.0f64..10.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo) <= classify(hi));
    }
}
