//! Rendering seam between the pipeline and the drawing backend.

use std::path::Path;
use thiserror::Error;
use crate::domain::BandPlot;

/// Errors that can occur while drawing a band map
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save map to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Draws one band's aggregated grid squares to an image file.
pub trait MapRenderer {
    /// Renders `plot` for `callsign` into `output`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the image cannot be drawn or written.
    fn render(&self, plot: &BandPlot, callsign: &str, output: &Path) -> RenderResult<()>;
}
