//! Ratio of the strongest competing output to the candidate label's output.
use crate::measure::NonConformityMeasure;
use serde::{Deserialize, Serialize};

/// Floor applied to the candidate output before dividing.
const MIN_DENOMINATOR: f64 = 1e-12;

#[derive(Default, Debug, Deserialize, Serialize, Clone)]
/// `max_{j != label} output[j] / output[label]`.
///
/// Below one when the candidate label beats every other label, above one otherwise.
pub struct Ratio {}

impl NonConformityMeasure for Ratio {
    #[inline]
    fn measure(&self, output: &[f64], label: usize) -> f64 {
        let competitor = output
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != label)
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        if competitor == f64::NEG_INFINITY {
            // Single label, nothing competes with it.
            return 0.0;
        }
        competitor / output[label].max(MIN_DENOMINATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        let m = Ratio::default();
        let out = [0.2, 0.5, 0.3];
        assert_eq!(m.measure(&out, 1), 0.3 / 0.5);
        assert_eq!(m.measure(&out, 0), 0.5 / 0.2);
        assert!(m.measure(&out, 1) < m.measure(&out, 2));
        assert_eq!(m.measure(&[1.0], 0), 0.0);
    }

    #[test]
    fn test_ratio_zero_output() {
        let m = Ratio::default();
        assert!(m.measure(&[0.0, 1.0], 0).is_finite());
    }
}
