//! Render a 3×3 grid of labeled images, optionally with predicted labels,
//! for eyeballing a classifier during development.

pub mod batch;
pub mod batch_file;
pub mod canvas;
pub mod config;
pub mod error;
pub mod grid;
pub mod pixels;
pub mod synthetic;
pub mod telemetry;

pub use batch::{ClassNames, GridBatch, Labels};
pub use canvas::{Canvas, FigureCanvas, RecordingCanvas, Spacing};
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use grid::{show_images, RenderOutcome};
pub use pixels::Image;
