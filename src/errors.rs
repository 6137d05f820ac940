//! Errors
//!
//! Custom error types used throughout the `conformal` crate.
use thiserror::Error;

/// Errors that can occur while calibrating or querying a conformal predictor.
#[derive(Debug, Error)]
pub enum ConformalError {
    /// An array argument does not have the expected numeric layout or shape.
    #[error("Invalid input for {0}: {1}")]
    InvalidInputType(String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// A statistic was requested over data for which it is not defined.
    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(String),
    /// Unable to write predictor to file.
    #[error("Unable to write predictor to file: {0}")]
    UnableToWrite(String),
    /// Unable to read predictor from file.
    #[error("Unable to read predictor from a file {0}")]
    UnableToRead(String),
    /// The histogram sink failed to produce its artifact.
    #[error("Unable to render histogram: {0}")]
    UnableToRender(String),
}
