use std::path::{Path, PathBuf};
use std::time::Instant;

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use super::{no_such_cell, Canvas, CanvasResult, Spacing};
use crate::config::GridConfig;
use crate::pixels::Image;

// Subplot margins as fractions of the figure size.
const LEFT: f64 = 0.125;
const RIGHT: f64 = 0.9;
const BOTTOM: f64 = 0.11;
const TOP: f64 = 0.88;

const TICKS_PER_AXIS: u32 = 5;
const TICK_LENGTH: f32 = 4.0;
const LABEL_PAD: i32 = 4;

const FRAME: Rgb<u8> = Rgb([0, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Pixel rectangle of one axes box; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    fn center_x(&self) -> i32 {
        self.x + self.width as i32 / 2
    }

    /// Largest rectangle with the given aspect that fits inside, centred.
    fn fit(&self, image_width: u32, image_height: u32) -> CellRect {
        let scale = (self.width as f64 / image_width as f64)
            .min(self.height as f64 / image_height as f64);
        let width = ((image_width as f64 * scale).round() as u32).clamp(1, self.width.max(1));
        let height = ((image_height as f64 * scale).round() as u32).clamp(1, self.height.max(1));
        CellRect {
            x: self.x + (self.width - width) as i32 / 2,
            y: self.y + (self.height - height) as i32 / 2,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone)]
struct FigureCell {
    rect: CellRect,
    image_area: Option<CellRect>,
    xlabel: Option<String>,
    ticks: bool,
    visible: bool,
}

/// Bitmap figure written to a PNG file when shown.
pub struct FigureCanvas {
    figure: RgbImage,
    font_size: u32,
    output_path: PathBuf,
    cells: Vec<FigureCell>,
}

impl FigureCanvas {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            figure: ImageBuffer::from_pixel(config.width, config.height, BACKGROUND),
            font_size: config.font_size,
            output_path: config.output_path.clone(),
            cells: Vec::new(),
        }
    }

    /// The figure as drawn so far.
    pub fn figure(&self) -> &RgbImage {
        &self.figure
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Axes boxes from the last `subplots` call, row-major.
    pub fn cell_rects(&self) -> Vec<CellRect> {
        self.cells.iter().map(|c| c.rect).collect()
    }

    /// Compute row-major axes boxes for a `rows × cols` grid.
    pub fn layout(width: u32, height: u32, rows: usize, cols: usize, spacing: Spacing) -> Vec<CellRect> {
        let avail_w = (RIGHT - LEFT) * width as f64;
        let avail_h = (TOP - BOTTOM) * height as f64;

        let cell_w = avail_w / (cols as f64 + spacing.wspace * (cols as f64 - 1.0));
        let cell_h = avail_h / (rows as f64 + spacing.hspace * (rows as f64 - 1.0));
        let gap_w = spacing.wspace * cell_w;
        let gap_h = spacing.hspace * cell_h;

        let origin_x = LEFT * width as f64;
        let origin_y = (1.0 - TOP) * height as f64;

        let mut rects = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let x = origin_x + col as f64 * (cell_w + gap_w);
                let y = origin_y + row as f64 * (cell_h + gap_h);
                rects.push(CellRect {
                    x: x.round() as i32,
                    y: y.round() as i32,
                    width: cell_w.floor().max(1.0) as u32,
                    height: cell_h.floor().max(1.0) as u32,
                });
            }
        }
        rects
    }

    fn cell_mut(&mut self, cell: usize) -> Result<&mut FigureCell, crate::error::CanvasFailure> {
        let cells = self.cells.len();
        self.cells.get_mut(cell).ok_or_else(|| no_such_cell(cell, cells))
    }

    fn draw_frames(&mut self) {
        for cell in self.cells.iter().filter(|c| c.visible) {
            let area = cell.image_area.unwrap_or(cell.rect);
            draw_hollow_rect_mut(
                &mut self.figure,
                Rect::at(area.x, area.y).of_size(area.width, area.height),
                FRAME,
            );

            if !cell.ticks {
                continue;
            }
            for i in 0..TICKS_PER_AXIS {
                let fraction = i as f32 / (TICKS_PER_AXIS - 1) as f32;
                let x = area.x as f32 + fraction * (area.width - 1) as f32;
                let y = area.y as f32 + fraction * (area.height - 1) as f32;
                let bottom = (area.bottom() - 1) as f32;
                draw_line_segment_mut(&mut self.figure, (x, bottom), (x, bottom + TICK_LENGTH), FRAME);
                draw_line_segment_mut(
                    &mut self.figure,
                    (area.x as f32 - TICK_LENGTH, y),
                    (area.x as f32, y),
                    FRAME,
                );
            }
        }
    }

    fn draw_labels(&mut self) -> CanvasResult {
        let line_height = (self.font_size as f64 * 1.2).ceil() as i32;
        let labels: Vec<(i32, i32, String)> = self
            .cells
            .iter()
            .filter(|c| c.visible)
            .filter_map(|c| {
                let area = c.image_area.unwrap_or(c.rect);
                let tick_room = if c.ticks { TICK_LENGTH as i32 } else { 0 };
                c.xlabel
                    .as_ref()
                    .map(|text| (area.center_x(), area.bottom() + tick_room + LABEL_PAD, text.clone()))
            })
            .collect();
        if labels.is_empty() {
            return Ok(());
        }

        let dims = self.figure.dimensions();
        let root = BitMapBackend::with_buffer(&mut self.figure, dims).into_drawing_area();
        let style = FontDesc::new(FontFamily::SansSerif, self.font_size as f64, FontStyle::Normal)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));

        for (x, y, text) in labels {
            for (line_no, line) in text.split('\n').enumerate() {
                root.draw(&Text::new(
                    line.to_string(),
                    (x, y + line_no as i32 * line_height),
                    style.clone(),
                ))
                .map_err(|e| format!("failed to draw label {:?}: {}", line, e))?;
            }
        }
        root.present()
            .map_err(|e| format!("failed to flush figure: {}", e))?;
        Ok(())
    }
}

impl Canvas for FigureCanvas {
    fn subplots(&mut self, rows: usize, cols: usize, spacing: Spacing) -> CanvasResult {
        let (width, height) = self.figure.dimensions();
        self.figure = ImageBuffer::from_pixel(width, height, BACKGROUND);
        self.cells = Self::layout(width, height, rows, cols, spacing)
            .into_iter()
            .map(|rect| FigureCell {
                rect,
                image_area: None,
                xlabel: None,
                ticks: true,
                visible: true,
            })
            .collect();
        debug!(rows, cols, width, height, "laid out subplot grid");
        Ok(())
    }

    fn imshow(&mut self, cell: usize, image: &Image) -> CanvasResult {
        let (image_width, image_height) = image.dimensions();
        let area = self.cell_mut(cell)?.rect.fit(image_width, image_height);
        self.cell_mut(cell)?.image_area = Some(area);

        let scaled = imageops::resize(&image.to_rgb(), area.width, area.height, FilterType::Nearest);
        imageops::replace(&mut self.figure, &scaled, area.x as i64, area.y as i64);
        Ok(())
    }

    fn set_xlabel(&mut self, cell: usize, text: &str) -> CanvasResult {
        self.cell_mut(cell)?.xlabel = Some(text.to_string());
        Ok(())
    }

    fn clear_ticks(&mut self, cell: usize) -> CanvasResult {
        self.cell_mut(cell)?.ticks = false;
        Ok(())
    }

    fn axis_off(&mut self, cell: usize) -> CanvasResult {
        self.cell_mut(cell)?.visible = false;
        Ok(())
    }

    fn show(&mut self) -> CanvasResult {
        let started = Instant::now();
        self.draw_frames();
        self.draw_labels()?;

        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.figure.save(&self.output_path)?;
        info!(
            path = %self.output_path.display(),
            elapsed = ?started.elapsed(),
            "image grid saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacing() -> Spacing {
        Spacing {
            hspace: 0.8,
            wspace: 0.4,
        }
    }

    #[test]
    fn layout_is_row_major_and_inside_margins() {
        let rects = FigureCanvas::layout(640, 480, 3, 3, spacing());
        assert_eq!(rects.len(), 9);

        assert_eq!(rects[0].x, 80);
        assert_eq!(rects[0].y, 58);
        assert!(rects[1].x > rects[0].x);
        assert_eq!(rects[1].y, rects[0].y);
        assert!(rects[3].y > rects[0].y);
        assert_eq!(rects[3].x, rects[0].x);

        let last = rects[8];
        assert!(last.x + last.width as i32 <= (0.9 * 640.0) as i32 + 1);
        assert!(last.y + last.height as i32 <= (0.89 * 480.0) as i32 + 1);
    }

    #[test]
    fn row_gap_follows_hspace() {
        let rects = FigureCanvas::layout(640, 480, 3, 3, spacing());
        let gap = rects[3].y - rects[0].bottom();
        let expected = 0.8 * rects[0].height as f64;
        assert!((gap as f64 - expected).abs() <= 2.0, "gap {} vs {}", gap, expected);
    }

    #[test]
    fn fit_keeps_aspect_and_centres() {
        let cell = CellRect {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
        };
        let fitted = cell.fit(28, 28);
        assert_eq!((fitted.width, fitted.height), (50, 50));
        assert_eq!(fitted.x, 35);
        assert_eq!(fitted.y, 20);
    }

    #[test]
    fn unknown_cell_is_an_error() {
        let mut canvas = FigureCanvas::new(&GridConfig::default());
        canvas.subplots(3, 3, spacing()).unwrap();
        assert!(canvas.clear_ticks(9).is_err());
        assert!(canvas.clear_ticks(8).is_ok());
    }
}
