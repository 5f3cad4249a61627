//! Plotting collaborators for the grid renderer.
//!
//! [`Canvas`] is the narrow contract the renderer relies on: lay out a grid
//! of axes, blit an image into one, caption it, tidy its ticks, and finally
//! present the figure.

mod figure;
mod recording;

pub use figure::{CellRect, FigureCanvas};
pub use recording::{CanvasCall, CellState, RecordingCanvas};

use crate::error::CanvasFailure;
use crate::pixels::Image;

pub type CanvasResult = std::result::Result<(), CanvasFailure>;

/// Gap between neighbouring axes, as fractions of the mean axes size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Vertical gap as a fraction of the mean axes height.
    pub hspace: f64,
    /// Horizontal gap as a fraction of the mean axes width.
    pub wspace: f64,
}

pub trait Canvas {
    /// Lay out `rows × cols` axes. Cells are addressed in row-major order.
    fn subplots(&mut self, rows: usize, cols: usize, spacing: Spacing) -> CanvasResult;

    fn imshow(&mut self, cell: usize, image: &Image) -> CanvasResult;

    fn set_xlabel(&mut self, cell: usize, text: &str) -> CanvasResult;

    /// Remove tick marks on both axes of a cell.
    fn clear_ticks(&mut self, cell: usize) -> CanvasResult;

    /// Hide a cell's axes entirely.
    fn axis_off(&mut self, cell: usize) -> CanvasResult;

    /// Present the assembled figure. Blocks until the figure is flushed.
    fn show(&mut self) -> CanvasResult;
}

pub(crate) fn no_such_cell(cell: usize, cells: usize) -> CanvasFailure {
    format!("cell {} does not exist in a grid of {} cells", cell, cells).into()
}
