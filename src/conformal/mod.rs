//! Conformal Prediction
//!
//! Calibrates label thresholds on a held-out batch of model outputs and turns
//! new outputs into prediction sets. With exchangeable calibration and test
//! data, a prediction set holds the true label with probability of at least
//! `1 - epsilon / 100`.
//!
//! # Submodules
//!
//! * `config`: Calibration parameters and json persistence.
//! * `core`: The `ConformalPredictor` and its calibration entry points.
//! * `thresholds`: Score grouping and percentile thresholds.
//! * `predict`: Prediction sets, raw scores and score inspection.
//! * `evaluate`: Coverage of prediction sets against ground truth.

pub mod config;
pub mod core;
pub mod evaluate;
pub mod predict;
pub mod thresholds;

pub use self::config::{PredictorConfig, PredictorIO, ThresholdMode};
pub use self::core::ConformalPredictor;
