//! Raster line charts written as JPEG.

pub mod canvas;
pub mod chart;
pub mod font;
pub mod ticks;

use std::path::PathBuf;

use thiserror::Error;

pub use chart::{Chart, LineSeries, PALETTE};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Chart has no series")]
    Empty,
    #[error("Series \"{0}\" has no points")]
    EmptySeries(String),
    #[error("Series \"{label}\" has {xs} x values but {ys} y values")]
    LengthMismatch { label: String, xs: usize, ys: usize },
    #[error("Series \"{0}\" contains non-finite values")]
    NonFinite(String),
    #[error("Canvas {width}x{height} leaves no room for the plot area")]
    InvalidCanvas { width: u32, height: u32 },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
