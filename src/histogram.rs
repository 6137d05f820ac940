//! Histogram
//!
//! Distribution of prediction set sizes. Bin `i` counts the prediction sets
//! holding exactly `i` labels, for `i` in `0..=n_labels`.
use crate::conformal::ConformalPredictor;
use crate::errors::ConformalError;
use crate::plot::HistogramSink;
use std::path::{Path, PathBuf};

/// Title used when none is given.
pub const DEFAULT_TITLE: &str = "Label Histogram";

/// Tally prediction set sizes into `n_labels + 1` bins.
///
/// * `predictions` - Prediction sets, as returned by `ConformalPredictor::predict`.
/// * `n_labels` - Number of labels, the largest possible set size.
pub fn set_size_histogram(predictions: &[Vec<usize>], n_labels: usize) -> Result<Vec<usize>, ConformalError> {
    let mut histogram = vec![0usize; n_labels + 1];
    for (i, p) in predictions.iter().enumerate() {
        match histogram.get_mut(p.len()) {
            Some(count) => *count += 1,
            None => {
                return Err(ConformalError::InvalidInputType(
                    "predictions".to_string(),
                    format!(
                        "prediction {} holds {} labels, at most {} are possible",
                        i,
                        p.len(),
                        n_labels
                    ),
                ))
            }
        }
    }
    Ok(histogram)
}

impl ConformalPredictor {
    /// Histogram of prediction set sizes, `n_labels + 1` exact counts.
    pub fn label_histogram(&self, predictions: &[Vec<usize>]) -> Result<Vec<usize>, ConformalError> {
        set_size_histogram(predictions, self.n_labels())
    }

    /// Histogram of prediction set sizes, also handed to a rendering sink.
    ///
    /// * `sink` - Where the histogram is drawn.
    /// * `save_path` - Output path, the sink appends its own file suffix.
    /// * `title` - Chart title, `DEFAULT_TITLE` when `None`.
    ///
    /// Returns the histogram and the path of the written artifact.
    pub fn save_label_histogram<S, P>(
        &self,
        predictions: &[Vec<usize>],
        sink: &S,
        save_path: P,
        title: Option<&str>,
    ) -> Result<(Vec<usize>, PathBuf), ConformalError>
    where
        S: HistogramSink + ?Sized,
        P: AsRef<Path>,
    {
        let histogram = self.label_histogram(predictions)?;
        let out = sink.render(
            &histogram,
            self.n_labels(),
            save_path.as_ref(),
            title.unwrap_or(DEFAULT_TITLE),
        )?;
        Ok((histogram, out))
    }
}
