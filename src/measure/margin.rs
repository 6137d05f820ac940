//! Margin between the strongest competing output and the candidate label's output.
use crate::measure::NonConformityMeasure;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Deserialize, Serialize, Clone)]
/// `max_{j != label} output[j] - output[label]`.
pub struct Margin {}

impl NonConformityMeasure for Margin {
    #[inline]
    fn measure(&self, output: &[f64], label: usize) -> f64 {
        let competitor = output
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != label)
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);
        if competitor == f64::NEG_INFINITY {
            return 0.0;
        }
        competitor - output[label]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin() {
        let m = Margin::default();
        let out = [0.25, 0.5, 0.25];
        assert_eq!(m.measure(&out, 1), -0.25);
        assert_eq!(m.measure(&out, 0), 0.25);
        assert_eq!(m.measure(&[3.0], 0), 0.0);
    }
}
