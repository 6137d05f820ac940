use crate::conformal::core::{validate_ground_truth, ConformalPredictor};
use crate::conformal::thresholds::true_label_scores;
use crate::data::{Matrix, RowMajorMatrix};
use crate::errors::ConformalError;
use crate::measure::NonConformityMeasure;
use hashbrown::HashMap;
use rayon::prelude::*;

impl ConformalPredictor {
    /// Prediction set of every row: the labels whose score is within that label's threshold.
    ///
    /// * `model_output` - Model outputs, one row per sample and one column per label.
    /// * `parallel` - Score rows on the rayon thread pool. Row order is preserved either way.
    pub fn predict(&self, model_output: &Matrix<f64>, parallel: bool) -> Result<Vec<Vec<usize>>, ConformalError> {
        self.validate_output(model_output)?;
        let predictions: Vec<Vec<usize>> = if parallel {
            model_output
                .index
                .par_iter()
                .map(|row| self.predict_row(&model_output.get_row(*row)))
                .collect()
        } else {
            model_output
                .index
                .iter()
                .map(|row| self.predict_row(&model_output.get_row(*row)))
                .collect()
        };
        Ok(predictions)
    }

    /// Labels of a single output vector that fall within their threshold, ascending.
    pub(crate) fn predict_row(&self, output: &[f64]) -> Vec<usize> {
        (0..self.n_labels())
            .filter(|&label| self.measure().measure(output, label) <= self.thresholds()[label])
            .collect()
    }

    /// Raw non-conformity score of every label for every row, without thresholding.
    ///
    /// Like `predict`, fails with `InvalidParameter` while the measure is detached.
    ///
    /// Returns a `rows` x `n_labels` matrix, column `j` holding the score of label `j`.
    pub fn confidence(&self, model_output: &Matrix<f64>, parallel: bool) -> Result<RowMajorMatrix<f64>, ConformalError> {
        self.validate_output(model_output)?;
        let scores: Vec<Vec<f64>> = if parallel {
            model_output
                .index
                .par_iter()
                .map(|row| self.row_scores(&model_output.get_row(*row)))
                .collect()
        } else {
            model_output
                .index
                .iter()
                .map(|row| self.row_scores(&model_output.get_row(*row)))
                .collect()
        };
        Ok(RowMajorMatrix::new(scores.concat(), model_output.rows, self.n_labels()))
    }

    fn row_scores(&self, output: &[f64]) -> Vec<f64> {
        (0..self.n_labels())
            .map(|label| self.measure().measure(output, label))
            .collect()
    }

    /// True label scores of a labeled batch, grouped by label.
    ///
    /// The same grouping calibration starts from, for inspecting score
    /// distributions before settling on an epsilon. Every label is a key,
    /// labels without rows map to an empty list. Stored thresholds are untouched.
    pub fn threshold_measure(
        &self,
        model_output: &Matrix<f64>,
        actual: &Matrix<f64>,
    ) -> Result<HashMap<usize, Vec<f64>>, ConformalError> {
        self.validate_output(model_output)?;
        validate_ground_truth(model_output, actual)?;
        Ok(true_label_scores(self.measure(), model_output, actual)
            .into_iter()
            .enumerate()
            .collect())
    }
}
