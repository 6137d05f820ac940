//! Threshold calibration
//!
//! Scores every calibration row against its own true label, then turns the
//! per-label score lists into thresholds with a linear-interpolation percentile.
use crate::conformal::config::ThresholdMode;
use crate::data::Matrix;
use crate::errors::ConformalError;
use crate::measure::NonConformityMeasure;
use crate::utils::{argmax, percentile};
use log::{debug, warn};

/// Non-conformity score of every row against its true label, grouped by that label.
///
/// Returns one list per column of `model_output`; labels without rows get an empty list.
pub(crate) fn true_label_scores<M>(measure: &M, model_output: &Matrix<f64>, actual: &Matrix<f64>) -> Vec<Vec<f64>>
where
    M: NonConformityMeasure + ?Sized,
{
    let mut scores = vec![Vec::new(); model_output.cols];
    for i in 0..model_output.rows {
        let label = argmax(&actual.get_row(i));
        let output = model_output.get_row(i);
        scores[label].push(measure.measure(&output, label));
    }
    scores
}

/// Thresholds at the `100 - epsilon` percentile of the calibration scores.
///
/// * `scores` - True label scores, grouped by label.
/// * `epsilon` - Percent of calibration scores allowed above the threshold.
/// * `mode` - Per-label or global thresholds.
pub(crate) fn label_thresholds(
    scores: &[Vec<f64>],
    epsilon: u8,
    mode: ThresholdMode,
) -> Result<Vec<f64>, ConformalError> {
    let q = 100.0 - f64::from(epsilon);
    match mode {
        ThresholdMode::PerLabel => scores
            .iter()
            .enumerate()
            .map(|(label, s)| -> Result<f64, ConformalError> {
                if s.is_empty() {
                    return Err(ConformalError::UndefinedStatistic(format!(
                        "label {} has no calibration samples, its threshold can not be computed",
                        label
                    )));
                }
                warn_if_too_few(label, s.len(), epsilon);
                let t = percentile(s, q)?;
                debug!("Label {}: {} calibration scores, threshold {:.6}", label, s.len(), t);
                Ok(t)
            })
            .collect(),
        ThresholdMode::Global => {
            let pooled: Vec<f64> = scores.iter().flatten().copied().collect();
            if pooled.is_empty() {
                return Err(ConformalError::UndefinedStatistic(
                    "no calibration samples, the global threshold can not be computed".to_string(),
                ));
            }
            let t = percentile(&pooled, q)?;
            debug!("Global threshold {:.6} from {} calibration scores", t, pooled.len());
            Ok(vec![t; scores.len()])
        }
    }
}

// With fewer than 100 / epsilon scores the percentile is an interpolation
// between the two largest scores rather than an observed tail.
fn warn_if_too_few(label: usize, n: usize, epsilon: u8) {
    if epsilon == 0 {
        return;
    }
    let needed = (100 + usize::from(epsilon) - 1) / usize::from(epsilon);
    if n < needed {
        warn!(
            "Label {} has only {} calibration samples, at least {} are needed for epsilon {}.",
            label, n, needed, epsilon
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::one_hot;

    fn grouped() -> Vec<Vec<f64>> {
        vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]
    }

    #[test]
    fn test_per_label_median() {
        let t = label_thresholds(&grouped(), 50, ThresholdMode::PerLabel).unwrap();
        assert_eq!(t, vec![1.5, 3.5, 5.5]);
    }

    #[test]
    fn test_per_label_extremes() {
        let t = label_thresholds(&grouped(), 0, ThresholdMode::PerLabel).unwrap();
        assert_eq!(t, vec![2.0, 4.0, 6.0]);
        let t = label_thresholds(&grouped(), 100, ThresholdMode::PerLabel).unwrap();
        assert_eq!(t, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_global_shared() {
        let t = label_thresholds(&grouped(), 50, ThresholdMode::Global).unwrap();
        assert_eq!(t, vec![3.5; 3]);
        let t = label_thresholds(&grouped(), 0, ThresholdMode::Global).unwrap();
        assert_eq!(t, vec![6.0; 3]);
    }

    #[test]
    fn test_empty_label() {
        let scores = vec![vec![1.0], Vec::new()];
        assert!(matches!(
            label_thresholds(&scores, 5, ThresholdMode::PerLabel),
            Err(ConformalError::UndefinedStatistic(_))
        ));
        // The pool is not empty, so the global threshold is defined.
        assert_eq!(label_thresholds(&scores, 5, ThresholdMode::Global).unwrap(), vec![1.0, 1.0]);
        let none: Vec<Vec<f64>> = vec![Vec::new(), Vec::new()];
        assert!(matches!(
            label_thresholds(&none, 5, ThresholdMode::Global),
            Err(ConformalError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn test_nan_score() {
        let scores = vec![vec![1.0, f64::NAN]];
        assert!(matches!(
            label_thresholds(&scores, 5, ThresholdMode::PerLabel),
            Err(ConformalError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn test_infinite_score_keeps_max_threshold() {
        let scores = vec![vec![1.0, f64::INFINITY], vec![2.0, 3.0]];
        let t = label_thresholds(&scores, 0, ThresholdMode::PerLabel).unwrap();
        assert_eq!(t, vec![f64::INFINITY, 3.0]);
        let t = label_thresholds(&scores, 0, ThresholdMode::Global).unwrap();
        assert_eq!(t, vec![f64::INFINITY; 2]);
        let t = label_thresholds(&scores, 100, ThresholdMode::PerLabel).unwrap();
        assert_eq!(t, vec![1.0, 2.0]);
    }

    #[test]
    fn test_true_label_scores_uses_true_label_only() {
        // Rows in column-major order: label columns [row0, row1, row2].
        let data = vec![0.9, 0.2, 0.3, 0.1, 0.8, 0.7];
        let x = Matrix::new(&data, 3, 2);
        let actual = one_hot(&[0, 1, 0], 2).unwrap();
        let y = Matrix::new(&actual, 3, 2);
        let measure = |output: &[f64], label: usize| 1.0 - output[label];
        let scores = true_label_scores(&measure, &x, &y);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].len(), 2);
        assert!((scores[0][0] - 0.1).abs() < 1e-12);
        assert!((scores[0][1] - 0.7).abs() < 1e-12);
        assert_eq!(scores[1].len(), 1);
        assert!((scores[1][0] - 0.2).abs() < 1e-12);
    }
}
