//! One minus the probability assigned to the candidate label.
use crate::measure::NonConformityMeasure;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Deserialize, Serialize, Clone)]
/// `1 - p[label]`, with `p[label]` clamped to `[0, 1]`.
pub struct InverseProbability {}

impl NonConformityMeasure for InverseProbability {
    #[inline]
    fn measure(&self, output: &[f64], label: usize) -> f64 {
        1.0 - output[label].clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_probability() {
        let m = InverseProbability::default();
        assert_eq!(m.measure(&[0.25, 0.75], 1), 0.25);
        assert_eq!(m.measure(&[1.5, 0.0], 0), 0.0);
        assert_eq!(m.measure(&[-0.5, 0.0], 0), 1.0);
    }
}
