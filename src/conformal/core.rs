use crate::conformal::config::{PredictorConfig, PredictorIO, ThresholdMode};
use crate::conformal::thresholds::{label_thresholds, true_label_scores};
use crate::data::Matrix;
use crate::errors::ConformalError;
use crate::measure::Measure;
use crate::utils::fmt_vec_output;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Conformal Predictor
///
/// Holds the label thresholds calibrated on a held-out batch. Once built the
/// thresholds never change, so a predictor can be shared between threads and
/// queried concurrently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConformalPredictor {
    /// Calibration configuration the thresholds were computed with.
    cfg: PredictorConfig,
    /// Number of labels, the column count of every model output batch.
    n_labels: usize,
    /// Score ceiling of every label, indexed by label.
    thresholds: Vec<f64>,
}

impl ConformalPredictor {
    /// Calibrate a predictor on a held-out batch.
    ///
    /// * `model_output` - Model outputs, one row per sample and one column per label.
    /// * `actual` - One-hot ground truth with the same shape as `model_output`.
    /// * `cfg` - Epsilon, threshold mode and measure.
    pub fn new(
        model_output: &Matrix<f64>,
        actual: &Matrix<f64>,
        cfg: PredictorConfig,
    ) -> Result<Self, ConformalError> {
        model_output.validate("model_output")?;
        cfg.validate()?;
        cfg.measure.check_attached()?;
        validate_ground_truth(model_output, actual)?;

        let scores = true_label_scores(&cfg.measure, model_output, actual);
        let thresholds = label_thresholds(&scores, cfg.epsilon, cfg.threshold_mode)?;

        info!(
            "Calibrated {} labels on {} samples, epsilon {}, {:?} thresholds.",
            model_output.cols, model_output.rows, cfg.epsilon, cfg.threshold_mode
        );
        debug!("Thresholds: {}", fmt_vec_output(&thresholds));

        Ok(ConformalPredictor {
            cfg,
            n_labels: model_output.cols,
            thresholds,
        })
    }

    /// Calibrate a predictor from raw parameters.
    ///
    /// * `epsilon` - Integer in `[0, 100]`.
    /// * `measure` - The non-conformity measure.
    /// * `threshold_mode` - `0` for per-label, `1` for global thresholds.
    pub fn from_params(
        model_output: &Matrix<f64>,
        actual: &Matrix<f64>,
        epsilon: i64,
        measure: Measure,
        threshold_mode: i64,
    ) -> Result<Self, ConformalError> {
        let cfg = PredictorConfig::from_params(epsilon, threshold_mode, measure)?;
        Self::new(model_output, actual, cfg)
    }

    /// Threshold of every label, indexed by label.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of labels seen at calibration.
    pub fn n_labels(&self) -> usize {
        self.n_labels
    }

    /// Configuration the predictor was calibrated with.
    ///
    /// Read only, the thresholds are tied to it:
    ///
    /// ```compile_fail
    /// # fn bump(mut p: conformal::ConformalPredictor) {
    /// p.cfg.epsilon = 90;
    /// # }
    /// ```
    pub fn config(&self) -> &PredictorConfig {
        &self.cfg
    }

    pub fn epsilon(&self) -> u8 {
        self.cfg.epsilon
    }

    pub fn threshold_mode(&self) -> ThresholdMode {
        self.cfg.threshold_mode
    }

    pub fn measure(&self) -> &Measure {
        &self.cfg.measure
    }

    /// Replace the measure, keeping the calibrated thresholds.
    ///
    /// Meant for re-attaching a `Measure::Custom` after loading from json, where it comes back `Detached`;
    /// the thresholds are only meaningful for the measure they were calibrated with.
    pub fn set_measure(mut self, measure: Measure) -> Self {
        self.cfg.measure = measure;
        self
    }

    /// Check that the measure can score and that a batch has the column
    /// count seen at calibration.
    pub(crate) fn validate_output(&self, model_output: &Matrix<f64>) -> Result<(), ConformalError> {
        self.cfg.measure.check_attached()?;
        model_output.validate("model_output")?;
        if model_output.cols != self.n_labels {
            return Err(ConformalError::InvalidInputType(
                "model_output".to_string(),
                format!(
                    "expected {} columns, one per label, found {}",
                    self.n_labels, model_output.cols
                ),
            ));
        }
        Ok(())
    }
}

/// Ground truth must be a valid array holding one row per model output row.
pub(crate) fn validate_ground_truth(model_output: &Matrix<f64>, actual: &Matrix<f64>) -> Result<(), ConformalError> {
    actual.validate("actual")?;
    if actual.rows != model_output.rows || actual.cols != model_output.cols {
        return Err(ConformalError::InvalidInputType(
            "actual".to_string(),
            format!(
                "expected a {}x{} one-hot array, found {}x{}",
                model_output.rows, model_output.cols, actual.rows, actual.cols
            ),
        ));
    }
    Ok(())
}

impl PredictorIO for ConformalPredictor {
    fn from_json(json_str: &str) -> Result<Self, ConformalError> {
        let predictor = serde_json::from_str::<Self>(json_str).map_err(|e| ConformalError::UnableToRead(e.to_string()))?;
        predictor.cfg.validate()?;
        if predictor.n_labels == 0 || predictor.thresholds.len() != predictor.n_labels {
            return Err(ConformalError::UnableToRead(format!(
                "expected {} thresholds, found {}",
                predictor.n_labels,
                predictor.thresholds.len()
            )));
        }
        if predictor.thresholds.iter().any(|t| t.is_nan()) {
            return Err(ConformalError::UnableToRead("thresholds contain NaN".to_string()));
        }
        Ok(predictor)
    }
}
