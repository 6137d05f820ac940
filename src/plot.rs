//! Plot
//!
//! Rendering sinks for label histograms. Styling is passed in through
//! `PlotConfig` at construction, nothing is configured globally.
use crate::errors::ConformalError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File suffix of rendered histograms.
pub const IMAGE_SUFFIX: &str = ".png";

/// Something that turns a histogram into an image artifact.
pub trait HistogramSink {
    /// Draw `histogram`, whose bars are labelled `0..=bins`.
    ///
    /// * `path` - Output path without suffix, the sink appends `IMAGE_SUFFIX`.
    /// * `title` - Chart title.
    ///
    /// Returns the path of the written file.
    fn render(&self, histogram: &[usize], bins: usize, path: &Path, title: &str) -> Result<PathBuf, ConformalError>;
}

/// `path` with `IMAGE_SUFFIX` appended.
pub fn image_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(IMAGE_SUFFIX);
    PathBuf::from(s)
}

/// Chart styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Top of the y axis, sized from the tallest bar when `None`.
    pub y_max: Option<usize>,
    /// X axis description.
    pub x_desc: String,
    /// Y axis description.
    pub y_desc: String,
    /// Draw grid lines.
    pub grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            width: 640,
            height: 480,
            y_max: None,
            x_desc: "# labels in prediction".to_string(),
            y_desc: "# of predictions".to_string(),
            grid: true,
        }
    }
}

impl PlotConfig {
    /// Upper bound of the y axis for a histogram.
    pub fn y_top(&self, histogram: &[usize]) -> usize {
        match self.y_max {
            Some(y) => y,
            None => {
                let tallest = histogram.iter().copied().max().unwrap_or(0);
                tallest + tallest / 10 + 1
            }
        }
    }
}

/// Headless sink, writes nothing and reports where the image would have gone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl HistogramSink for NoopSink {
    fn render(&self, histogram: &[usize], bins: usize, path: &Path, title: &str) -> Result<PathBuf, ConformalError> {
        let out = image_path(path);
        debug!(
            "Skipping render of '{}' ({} bins, {} predictions) to {}",
            title,
            bins + 1,
            histogram.iter().sum::<usize>(),
            out.display()
        );
        Ok(out)
    }
}

/// Bar chart drawn with `plotters` onto a bitmap.
#[cfg(feature = "plots")]
#[derive(Debug, Default, Clone)]
pub struct PlottersSink {
    pub config: PlotConfig,
}

#[cfg(feature = "plots")]
impl PlottersSink {
    pub fn new(config: PlotConfig) -> Self {
        PlottersSink { config }
    }
}

#[cfg(feature = "plots")]
fn render_err<E: std::fmt::Display>(e: E) -> ConformalError {
    ConformalError::UnableToRender(e.to_string())
}

#[cfg(feature = "plots")]
impl HistogramSink for PlottersSink {
    fn render(&self, histogram: &[usize], bins: usize, path: &Path, title: &str) -> Result<PathBuf, ConformalError> {
        use plotters::prelude::*;

        let out = image_path(path);
        let root = BitMapBackend::new(&out, (self.config.width, self.config.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let y_top = self.config.y_top(histogram);
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(title, ("sans-serif", 22))
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((0usize..bins + 1).into_segmented(), 0usize..y_top)
            .map_err(render_err)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.config.x_desc.as_str())
            .y_desc(self.config.y_desc.as_str());
        if !self.config.grid {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(render_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BLUE.mix(0.5).filled())
                    .margin(10)
                    .data(histogram.iter().enumerate().map(|(size, count)| (size, *count))),
            )
            .map_err(render_err)?;

        // Count above every bar.
        chart
            .draw_series(histogram.iter().enumerate().map(|(size, count)| {
                Text::new(
                    count.to_string(),
                    (SegmentValue::CenterOf(size), *count),
                    ("sans-serif", 14).into_font(),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(out)
    }
}
