//! The 3×3 labeled image grid.

use tracing::{debug, warn};

use crate::batch::{ClassNames, GridBatch, Labels};
use crate::canvas::{Canvas, Spacing};
use crate::error::{GridError, Result};
use crate::pixels::Image;

pub const ROWS: usize = 3;
pub const COLS: usize = 3;
pub const CELLS: usize = ROWS * COLS;

pub const SPACING: Spacing = Spacing {
    hspace: 0.8,
    wspace: 0.4,
};

/// How a render call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The grid was presented with this many populated cells.
    Rendered { populated: usize },
    /// More than nine images were passed; nothing was drawn.
    TooManyImages { count: usize },
}

/// Caption for one cell: `True: X`, or `True: X\nPred: Y` with a prediction.
pub fn caption(true_name: &str, predicted_name: Option<&str>) -> String {
    match predicted_name {
        Some(pred) => format!("True: {}\nPred: {}", true_name, pred),
        None => format!("True: {}", true_name),
    }
}

/// Resolve every caption up front so bad input never leaves a half-drawn grid.
fn resolve_captions(
    count: usize,
    labels: &Labels,
    class_names: &ClassNames,
    predictions: Option<&Labels>,
) -> Result<Vec<String>> {
    if labels.len() != count {
        return Err(GridError::LengthMismatch {
            what: "label",
            expected: count,
            actual: labels.len(),
        });
    }
    if let Some(predictions) = predictions {
        if predictions.len() != count {
            return Err(GridError::LengthMismatch {
                what: "prediction",
                expected: count,
                actual: predictions.len(),
            });
        }
    }

    let mut captions = Vec::with_capacity(count);
    for (i, &label) in labels.as_slice().iter().enumerate() {
        let true_name = class_names.lookup(label)?;
        let predicted_name = match predictions {
            Some(predictions) => Some(class_names.lookup(predictions.as_slice()[i])?),
            None => None,
        };
        captions.push(caption(true_name, predicted_name));
    }
    Ok(captions)
}

/// Render up to nine images in a 3×3 grid with true (and optionally
/// predicted) class captions, then present the figure.
///
/// More than nine images is a usage error: a warning is logged and the call
/// returns [`RenderOutcome::TooManyImages`] without touching the canvas.
pub fn show_images<C: Canvas + ?Sized>(
    canvas: &mut C,
    images: &[Image],
    labels: &Labels,
    class_names: &ClassNames,
    predictions: Option<&Labels>,
) -> Result<RenderOutcome> {
    render_with_spacing(canvas, images, labels, class_names, predictions, SPACING)
}

/// [`show_images`] with caller-chosen spacing between axes.
pub fn render_with_spacing<C: Canvas + ?Sized>(
    canvas: &mut C,
    images: &[Image],
    labels: &Labels,
    class_names: &ClassNames,
    predictions: Option<&Labels>,
    spacing: Spacing,
) -> Result<RenderOutcome> {
    let count = images.len();
    if count > CELLS {
        warn!(count, "use {} or fewer images for the grid", CELLS);
        return Ok(RenderOutcome::TooManyImages { count });
    }

    let captions = resolve_captions(count, labels, class_names, predictions)?;

    canvas
        .subplots(ROWS, COLS, spacing)
        .map_err(GridError::Canvas)?;

    for cell in 0..CELLS {
        if cell >= count {
            canvas.axis_off(cell).map_err(GridError::Canvas)?;
            continue;
        }
        debug!(cell, caption = %captions[cell], "populating cell");
        canvas.imshow(cell, &images[cell]).map_err(GridError::Canvas)?;
        canvas
            .set_xlabel(cell, &captions[cell])
            .map_err(GridError::Canvas)?;
        canvas.clear_ticks(cell).map_err(GridError::Canvas)?;
    }

    canvas.show().map_err(GridError::Canvas)?;
    Ok(RenderOutcome::Rendered { populated: count })
}

/// Render a prepared [`GridBatch`].
pub fn render_batch<C: Canvas + ?Sized>(
    canvas: &mut C,
    batch: &GridBatch,
    spacing: Spacing,
) -> Result<RenderOutcome> {
    render_with_spacing(
        canvas,
        &batch.images,
        &batch.labels,
        &batch.class_names,
        batch.predictions.as_ref(),
        spacing,
    )
}
