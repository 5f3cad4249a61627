use super::{no_such_cell, Canvas, CanvasResult, Spacing};
use crate::pixels::Image;

/// One primitive issued against a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCall {
    Subplots {
        rows: usize,
        cols: usize,
        spacing: Spacing,
    },
    Imshow {
        cell: usize,
        width: u32,
        height: u32,
    },
    SetXlabel {
        cell: usize,
        text: String,
    },
    ClearTicks {
        cell: usize,
    },
    AxisOff {
        cell: usize,
    },
    Show,
}

/// What a single cell ended up holding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellState {
    pub image: Option<(u32, u32)>,
    pub xlabel: Option<String>,
    pub ticks_cleared: bool,
    pub axis_off: bool,
}

/// Canvas that draws nothing and remembers every call, in order.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<CanvasCall>,
    cells: Vec<CellState>,
    shown: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[CanvasCall] {
        &self.calls
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn was_shown(&self) -> bool {
        self.shown
    }

    /// Cells holding an image, in row-major order.
    pub fn populated(&self) -> usize {
        self.cells.iter().filter(|c| c.image.is_some()).count()
    }

    pub fn captions(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter_map(|c| c.xlabel.as_deref())
            .collect()
    }

    fn cell_mut(&mut self, cell: usize) -> Result<&mut CellState, crate::error::CanvasFailure> {
        let cells = self.cells.len();
        self.cells.get_mut(cell).ok_or_else(|| no_such_cell(cell, cells))
    }
}

impl Canvas for RecordingCanvas {
    fn subplots(&mut self, rows: usize, cols: usize, spacing: Spacing) -> CanvasResult {
        self.calls.push(CanvasCall::Subplots {
            rows,
            cols,
            spacing,
        });
        self.cells = vec![CellState::default(); rows * cols];
        Ok(())
    }

    fn imshow(&mut self, cell: usize, image: &Image) -> CanvasResult {
        let (width, height) = image.dimensions();
        self.calls.push(CanvasCall::Imshow {
            cell,
            width,
            height,
        });
        self.cell_mut(cell)?.image = Some((width, height));
        Ok(())
    }

    fn set_xlabel(&mut self, cell: usize, text: &str) -> CanvasResult {
        self.calls.push(CanvasCall::SetXlabel {
            cell,
            text: text.to_string(),
        });
        self.cell_mut(cell)?.xlabel = Some(text.to_string());
        Ok(())
    }

    fn clear_ticks(&mut self, cell: usize) -> CanvasResult {
        self.calls.push(CanvasCall::ClearTicks { cell });
        self.cell_mut(cell)?.ticks_cleared = true;
        Ok(())
    }

    fn axis_off(&mut self, cell: usize) -> CanvasResult {
        self.calls.push(CanvasCall::AxisOff { cell });
        self.cell_mut(cell)?.axis_off = true;
        Ok(())
    }

    fn show(&mut self) -> CanvasResult {
        self.calls.push(CanvasCall::Show);
        self.shown = true;
        Ok(())
    }
}
