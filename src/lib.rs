//! Conformal prediction sets for multi-class classifiers.
//!
//! A [`ConformalPredictor`] is calibrated once on a labeled batch of model
//! outputs. It then maps every new output vector to the set of labels whose
//! non-conformity score stays within that label's threshold.
//!
//! ```
//! use conformal::{ConformalPredictor, Matrix, PredictorConfig};
//! use conformal::measure::Measure;
//! use conformal::utils::one_hot;
//!
//! // Column-major, 4 samples by 2 labels.
//! let outputs = vec![0.9, 0.8, 0.3, 0.2, 0.1, 0.2, 0.7, 0.8];
//! let truth = one_hot(&[0, 0, 1, 1], 2).unwrap();
//! let cfg = PredictorConfig::default()
//!     .set_epsilon(0)
//!     .set_measure(Measure::InverseProbability);
//! let predictor = ConformalPredictor::new(
//!     &Matrix::new(&outputs, 4, 2),
//!     &Matrix::new(&truth, 4, 2),
//!     cfg,
//! )
//! .unwrap();
//!
//! let new = vec![0.85, 0.15];
//! let sets = predictor.predict(&Matrix::new(&new, 1, 2), false).unwrap();
//! assert_eq!(sets, vec![vec![0]]);
//! ```

// Modules
pub mod conformal;
pub mod data;
pub mod errors;
pub mod histogram;
pub mod measure;
pub mod plot;
pub mod utils;

// Individual classes, and functions
pub use conformal::{ConformalPredictor, PredictorConfig, PredictorIO, ThresholdMode};
pub use data::{Matrix, RowMajorMatrix};
pub use errors::ConformalError;
pub use measure::{Measure, NonConformityMeasure};
