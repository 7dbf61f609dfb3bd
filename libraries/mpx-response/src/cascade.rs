//! Cascade composition
//!
//! Stages in series multiply: H_total(f) = Π H_i(f). Magnitudes multiply and
//! phases add; [`ComplexResponse::phase`] reports the sum wrapped to (−π, π].

use crate::error::{ResponseError, Result};
use crate::response::ComplexResponse;

/// Multiply stage responses point by point, in the given order
///
/// # Errors
/// - `InvalidParameter` if `responses` is empty
/// - `InvalidRange` if the responses were evaluated on different grids
pub fn cascade(responses: &[ComplexResponse]) -> Result<ComplexResponse> {
    let (first, rest) = responses
        .split_first()
        .ok_or_else(|| ResponseError::parameter("cascade needs at least one stage response"))?;

    for (i, response) in rest.iter().enumerate() {
        if response.sample_rate() != first.sample_rate()
            || response.frequencies() != first.frequencies()
        {
            return Err(ResponseError::range(format!(
                "stage {} was evaluated on a different grid than stage 0",
                i + 1
            )));
        }
    }

    let mut values = first.values().to_vec();
    for response in rest {
        for (total, h) in values.iter_mut().zip(response.values()) {
            *total *= *h;
        }
    }

    ComplexResponse::new(first.sample_rate(), first.frequencies().to_vec(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex64;

    fn response(freqs: &[f64], gains: &[(f64, f64)]) -> ComplexResponse {
        response_at_rate(48000.0, freqs, gains)
    }

    fn response_at_rate(sample_rate: f64, freqs: &[f64], gains: &[(f64, f64)]) -> ComplexResponse {
        ComplexResponse::new(
            sample_rate,
            freqs.to_vec(),
            gains
                .iter()
                .map(|&(mag, phase)| Complex64::from_polar(mag, phase))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_stage_is_identity() {
        let a = response(&[10.0, 20.0], &[(2.0, 0.1), (3.0, -0.2)]);
        assert_eq!(cascade(std::slice::from_ref(&a)).unwrap(), a);
    }

    #[test]
    fn test_magnitudes_multiply_phases_add() {
        let a = response(&[10.0, 20.0], &[(2.0, 0.5), (0.5, 1.0)]);
        let b = response(&[10.0, 20.0], &[(3.0, 0.25), (4.0, -2.0)]);
        let total = cascade(&[a, b]).unwrap();

        let mags = total.magnitude();
        assert!((mags[0] - 6.0).abs() < 1e-12);
        assert!((mags[1] - 2.0).abs() < 1e-12);

        let phases = total.phase();
        assert!((phases[0] - 0.75).abs() < 1e-12);
        assert!((phases[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_mismatched_grids() {
        let a = response(&[10.0, 20.0], &[(1.0, 0.0), (1.0, 0.0)]);
        let b = response(&[10.0, 30.0], &[(1.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            cascade(&[a, b]),
            Err(ResponseError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_rejects_same_frequencies_at_different_rates() {
        let a = response_at_rate(48000.0, &[100.0, 10000.0], &[(1.0, 0.0), (1.0, 0.0)]);
        let b = response_at_rate(96000.0, &[100.0, 10000.0], &[(1.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            cascade(&[a, b]),
            Err(ResponseError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_keeps_sample_rate() {
        let a = response_at_rate(44100.0, &[10.0], &[(2.0, 0.0)]);
        let b = response_at_rate(44100.0, &[10.0], &[(3.0, 0.0)]);
        assert_eq!(cascade(&[a, b]).unwrap().sample_rate(), 44100.0);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            cascade(&[]),
            Err(ResponseError::InvalidParameter(_))
        ));
    }
}
