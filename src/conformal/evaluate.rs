//! Coverage of prediction sets against ground truth.
use crate::conformal::core::ConformalPredictor;
use crate::data::Matrix;
use crate::errors::ConformalError;
use crate::utils::argmax;

fn validate_pairs(predicted_labels: &[Vec<usize>], actual_labels: &Matrix<f64>) -> Result<(), ConformalError> {
    actual_labels.validate("actual_labels")?;
    if predicted_labels.len() != actual_labels.rows {
        return Err(ConformalError::InvalidInputType(
            "predicted_labels".to_string(),
            format!(
                "expected one prediction set per ground truth row ({}), found {}",
                actual_labels.rows,
                predicted_labels.len()
            ),
        ));
    }
    Ok(())
}

impl ConformalPredictor {
    /// Fraction of samples whose prediction set holds the true label.
    ///
    /// * `predicted_labels` - One prediction set per sample, as returned by `predict`.
    /// * `actual_labels` - One-hot ground truth, one row per sample.
    pub fn evaluate(predicted_labels: &[Vec<usize>], actual_labels: &Matrix<f64>) -> Result<f64, ConformalError> {
        validate_pairs(predicted_labels, actual_labels)?;
        if predicted_labels.is_empty() {
            return Err(ConformalError::UndefinedStatistic(
                "accuracy of zero samples".to_string(),
            ));
        }
        let correct = predicted_labels
            .iter()
            .enumerate()
            .filter(|(i, labels)| labels.contains(&argmax(&actual_labels.get_row(*i))))
            .count();
        Ok(correct as f64 / predicted_labels.len() as f64)
    }

    /// Coverage of every label over the samples that carry it.
    ///
    /// Entry `j` is `None` when no sample has true label `j`.
    pub fn evaluate_by_label(
        predicted_labels: &[Vec<usize>],
        actual_labels: &Matrix<f64>,
    ) -> Result<Vec<Option<f64>>, ConformalError> {
        validate_pairs(predicted_labels, actual_labels)?;
        let mut seen = vec![0usize; actual_labels.cols];
        let mut covered = vec![0usize; actual_labels.cols];
        for (i, labels) in predicted_labels.iter().enumerate() {
            let t = argmax(&actual_labels.get_row(i));
            seen[t] += 1;
            if labels.contains(&t) {
                covered[t] += 1;
            }
        }
        Ok(seen
            .iter()
            .zip(covered)
            .map(|(&n, c)| if n == 0 { None } else { Some(c as f64 / n as f64) })
            .collect())
    }

    /// Mean number of labels per prediction set.
    pub fn average_set_size(predictions: &[Vec<usize>]) -> Result<f64, ConformalError> {
        if predictions.is_empty() {
            return Err(ConformalError::UndefinedStatistic(
                "average set size of zero predictions".to_string(),
            ));
        }
        let total: usize = predictions.iter().map(|p| p.len()).sum();
        Ok(total as f64 / predictions.len() as f64)
    }
}
