//! Kaiser-windowed sinc low-pass design
//!
//! Everything here is computed from the defining formulas: I0 by its power
//! series, β by Kaiser's empirical attenuation fit, and the prototype by
//! sampling the ideal low-pass impulse response.

use std::f64::consts::PI;

/// Zeroth-order modified Bessel function of the first kind
///
/// I0(x) = Σ ((x/2)^k / k!)²
pub fn bessel_i0(x: f64) -> f64 {
    let y = x * x / 4.0;
    let mut sum = 1.0;
    let mut term = 1.0;

    for k in 1..200 {
        let k = k as f64;
        term *= y / (k * k);
        sum += term;
        if term < sum * 1e-16 {
            break;
        }
    }

    sum
}

/// Kaiser β for a target attenuation in dB
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > 50.0 {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db >= 21.0 {
        0.5842 * (attenuation_db - 21.0).powf(0.4) + 0.07886 * (attenuation_db - 21.0)
    } else {
        0.0
    }
}

/// Attenuation (dB) equivalent to a peak-to-peak passband ripple target
///
/// Kaiser designs have equal ripple δ in both bands, so a passband ripple of
/// `ripple_db` requires δ = 10^(ripple_db/20) − 1.
pub fn passband_ripple_attenuation_db(ripple_db: f64) -> f64 {
    let delta = 10.0_f64.powf(ripple_db / 20.0) - 1.0;
    -20.0 * delta.log10()
}

/// Kaiser window of length `len`
///
/// Lengths 0 and 1 give an empty window and `[1.0]`.
pub fn kaiser_window(len: usize, beta: f64) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }

    let denom = bessel_i0(beta);
    let order = (len - 1) as f64;

    (0..len)
        .map(|n| {
            let r = 2.0 * n as f64 / order - 1.0;
            let arg = (1.0 - r * r).max(0.0).sqrt();
            bessel_i0(beta * arg) / denom
        })
        .collect()
}

/// Windowed-sinc low-pass prototype scaled to unity DC gain
///
/// # Arguments
/// * `cutoff` - Cutoff normalized to Nyquist, in `(0, 1)`
/// * `window` - Window samples; the filter length is `window.len()`
///
/// Returns `None` when the taps sum to zero and cannot be normalized.
pub fn windowed_sinc_lowpass(cutoff: f64, window: &[f64]) -> Option<Vec<f64>> {
    let center = (window.len() as f64 - 1.0) / 2.0;

    let mut taps: Vec<f64> = window
        .iter()
        .enumerate()
        .map(|(n, w)| {
            let m = n as f64 - center;
            cutoff * sinc(cutoff * m) * w
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    if sum.abs() < f64::EPSILON {
        return None;
    }
    for tap in &mut taps {
        *tap /= sum;
    }

    Some(taps)
}

/// Normalized sinc, sin(πx)/(πx)
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}
