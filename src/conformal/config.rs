//! Predictor Configuration
//!
//! Defines the calibration parameters of a `ConformalPredictor` and the json
//! persistence shared by everything that can be saved to disk.
use crate::errors::ConformalError;
use crate::measure::Measure;
use crate::utils::{items_to_strings, validate_int_parameter};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// How calibration scores are turned into label thresholds.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ThresholdMode {
    /// Every label gets the percentile of its own calibration scores.
    #[default]
    PerLabel,
    /// One percentile over the scores of all labels, shared by every label.
    Global,
}

impl ThresholdMode {
    /// Integer code of the mode, `0` for per-label and `1` for global.
    pub fn code(&self) -> i64 {
        match self {
            ThresholdMode::PerLabel => 0,
            ThresholdMode::Global => 1,
        }
    }
}

impl TryFrom<i64> for ThresholdMode {
    type Error = ConformalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ThresholdMode::PerLabel),
            1 => Ok(ThresholdMode::Global),
            _ => Err(ConformalError::InvalidParameter(
                "threshold_mode".to_string(),
                "an integer in [0, 1]".to_string(),
                value.to_string(),
            )),
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = ConformalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PerLabel" | "0" => Ok(ThresholdMode::PerLabel),
            "Global" | "1" => Ok(ThresholdMode::Global),
            _ => Err(ConformalError::InvalidParameter(
                "threshold_mode".to_string(),
                format!("one of {}", items_to_strings(&["PerLabel", "Global"])),
                s.to_string(),
            )),
        }
    }
}

fn default_epsilon() -> u8 {
    5
}

/// Configuration for the `ConformalPredictor`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Percent of calibration scores allowed above the threshold, in `[0, 100]`.
    #[serde(default = "default_epsilon")]
    pub epsilon: u8,
    /// Per-label or global thresholds.
    #[serde(default)]
    pub threshold_mode: ThresholdMode,
    /// Non-conformity measure used for calibration and prediction.
    #[serde(default)]
    pub measure: Measure,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig {
            epsilon: default_epsilon(),
            threshold_mode: ThresholdMode::PerLabel,
            measure: Measure::Ratio,
        }
    }
}

impl PredictorConfig {
    /// Build a configuration from raw parameters, as they arrive from a binding.
    ///
    /// * `epsilon` - Integer in `[0, 100]`.
    /// * `threshold_mode` - `0` for per-label, `1` for global thresholds.
    /// * `measure` - The non-conformity measure.
    pub fn from_params(epsilon: i64, threshold_mode: i64, measure: Measure) -> Result<Self, ConformalError> {
        validate_int_parameter(epsilon, 0, 100, "epsilon")?;
        let threshold_mode = ThresholdMode::try_from(threshold_mode)?;
        Ok(PredictorConfig {
            epsilon: epsilon as u8,
            threshold_mode,
            measure,
        })
    }

    /// Set epsilon.
    /// * `epsilon` - Target miscoverage in percent.
    pub fn set_epsilon(mut self, epsilon: u8) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the threshold mode.
    /// * `threshold_mode` - Per-label or global thresholds.
    pub fn set_threshold_mode(mut self, threshold_mode: ThresholdMode) -> Self {
        self.threshold_mode = threshold_mode;
        self
    }

    /// Set the measure.
    /// * `measure` - The non-conformity measure.
    pub fn set_measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    /// Percentile of the calibration scores used as threshold.
    pub fn percentile(&self) -> f64 {
        100.0 - f64::from(self.epsilon)
    }

    pub fn validate(&self) -> Result<(), ConformalError> {
        validate_int_parameter(i64::from(self.epsilon), 0, 100, "epsilon")
    }
}

/// IO
pub trait PredictorIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save_predictor<P: AsRef<Path>>(&self, path: P) -> Result<(), ConformalError> {
        fs::write(path, self.json_dump()?).map_err(|e| ConformalError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, ConformalError> {
        serde_json::to_string(self).map_err(|e| ConformalError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, ConformalError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| ConformalError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load_predictor<P: AsRef<Path>>(path: P) -> Result<Self, ConformalError> {
        let json_str = fs::read_to_string(path).map_err(|e| ConformalError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl PredictorIO for PredictorConfig {}
