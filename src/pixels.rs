use image::{ImageBuffer, Luma, Rgb, RgbImage};
use thiserror::Error;

/// Why a pixel array could not become an [`Image`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelError {
    #[error("image has no rows")]
    NoRows,
    #[error("image has no columns")]
    NoColumns,
    #[error("row {row} has {len} columns, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
    #[error("pixels have differing channel counts")]
    RaggedChannels,
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(usize),
    #[error("pixel buffer does not match its dimensions")]
    BufferSize,
}

/// Single-channel intensity plane, rendered through a colormap.
pub type IntensityImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// One displayable image from a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    /// H×W intensities, shown with the viridis colormap after min/max scaling.
    Intensity(IntensityImage),
    /// 8-bit RGB, shown as is.
    Color(RgbImage),
}

impl Image {
    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Image::Intensity(plane) => plane.dimensions(),
            Image::Color(rgb) => rgb.dimensions(),
        }
    }

    /// Build an intensity image from H rows of W values.
    pub fn from_intensity(rows: &[Vec<f32>]) -> Result<Self, PixelError> {
        let (height, width) = rectangular(rows.iter().map(Vec::len))?;
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        ImageBuffer::from_raw(width, height, data)
            .map(Image::Intensity)
            .ok_or(PixelError::BufferSize)
    }

    /// Build an image from H×W×C values.
    ///
    /// One channel is treated as intensity. Three or four channels are
    /// treated as RGB(A); alpha is dropped. When every value lies in [0, 1]
    /// the channels are scaled to 0..=255, otherwise they are clamped.
    pub fn from_channels(rows: &[Vec<Vec<f32>>]) -> Result<Self, PixelError> {
        let (height, width) = rectangular(rows.iter().map(Vec::len))?;
        let channels = rows[0][0].len();
        if rows.iter().flatten().any(|px| px.len() != channels) {
            return Err(PixelError::RaggedChannels);
        }

        match channels {
            1 => {
                let data: Vec<f32> = rows.iter().flatten().map(|px| px[0]).collect();
                ImageBuffer::from_raw(width, height, data)
                    .map(Image::Intensity)
                    .ok_or(PixelError::BufferSize)
            }
            3 | 4 => {
                let unit_range = rows
                    .iter()
                    .flatten()
                    .flat_map(|px| px[..3].iter())
                    .all(|v| (0.0..=1.0).contains(v));
                let scale = if unit_range { 255.0 } else { 1.0 };

                let data: Vec<u8> = rows
                    .iter()
                    .flatten()
                    .flat_map(|px| px[..3].iter())
                    .map(|v| (v * scale).round().clamp(0.0, 255.0) as u8)
                    .collect();
                ImageBuffer::from_raw(width, height, data)
                    .map(Image::Color)
                    .ok_or(PixelError::BufferSize)
            }
            other => Err(PixelError::UnsupportedChannels(other)),
        }
    }

    /// Convert to displayable RGB, applying the colormap to intensity planes.
    pub fn to_rgb(&self) -> RgbImage {
        match self {
            Image::Color(rgb) => rgb.clone(),
            Image::Intensity(plane) => {
                let (min, max) = plane
                    .pixels()
                    .map(|p| p.0[0])
                    .filter(|v| v.is_finite())
                    .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                let range = max - min;

                ImageBuffer::from_fn(plane.width(), plane.height(), |x, y| {
                    let v = plane.get_pixel(x, y).0[0];
                    let t = if range > 0.0 && v.is_finite() {
                        ((v - min) / range) as f64
                    } else {
                        0.0
                    };
                    viridis(t)
                })
            }
        }
    }
}

/// Returns (height, width) for a non-empty grid whose rows all share a length.
fn rectangular(mut row_lengths: impl Iterator<Item = usize>) -> Result<(u32, u32), PixelError> {
    let width = row_lengths
        .next()
        .ok_or(PixelError::NoRows)?;
    if width == 0 {
        return Err(PixelError::NoColumns);
    }

    let mut height = 1usize;
    for len in row_lengths {
        if len != width {
            return Err(PixelError::RaggedRow {
                row: height,
                len,
                expected: width,
            });
        }
        height += 1;
    }
    Ok((height as u32, width as u32))
}

/// Colour for a normalized intensity; `t` outside [0, 1] is clamped.
///
/// Intensity planes go through this so grayscale batches look the way
/// they would in a notebook image display.
pub fn viridis(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let r = (0.267 + t * (0.329 - 0.267 + t * (0.984 - 0.329))) * 255.0;
    let g = (0.005 + t * (0.569 - 0.005 + t * (0.906 - 0.569))) * 255.0;
    let b = (0.329 + t * (0.758 - 0.329 - t * (0.758 - 0.121))) * 255.0;

    Rgb([
        r.clamp(0.0, 255.0) as u8,
        g.clamp(0.0, 255.0) as u8,
        b.clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_rows_become_plane() {
        let image = Image::from_intensity(&[vec![0.0, 0.5, 1.0], vec![1.0, 0.5, 0.0]]).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Image::from_intensity(&[vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            PixelError::RaggedRow {
                row: 1,
                len: 1,
                expected: 2
            }
        );
        assert_eq!(Image::from_intensity(&[]), Err(PixelError::NoRows));
        assert_eq!(Image::from_intensity(&[vec![]]), Err(PixelError::NoColumns));
    }

    #[test]
    fn unit_range_color_is_scaled() {
        let rows = vec![vec![vec![1.0, 0.0, 0.5]]];
        match Image::from_channels(&rows).unwrap() {
            Image::Color(rgb) => assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 128]),
            other => panic!("expected color image, got {:?}", other),
        }
    }

    #[test]
    fn byte_range_color_is_clamped_and_alpha_dropped() {
        let rows = vec![vec![vec![300.0, 20.0, 7.0, 255.0]]];
        match Image::from_channels(&rows).unwrap() {
            Image::Color(rgb) => assert_eq!(rgb.get_pixel(0, 0).0, [255, 20, 7]),
            other => panic!("expected color image, got {:?}", other),
        }
    }

    #[test]
    fn single_channel_is_intensity() {
        let rows = vec![vec![vec![0.2], vec![0.4]]];
        assert!(matches!(Image::from_channels(&rows).unwrap(), Image::Intensity(_)));
        assert_eq!(
            Image::from_channels(&[vec![vec![0.0, 1.0]]]),
            Err(PixelError::UnsupportedChannels(2))
        );
        assert_eq!(
            Image::from_channels(&[vec![vec![0.0, 1.0, 0.0], vec![0.5]]]),
            Err(PixelError::RaggedChannels)
        );
    }

    #[test]
    fn intensity_uses_colormap_endpoints() {
        let image = Image::from_intensity(&[vec![-3.0, 7.0]]).unwrap();
        let rgb = image.to_rgb();
        assert_eq!(*rgb.get_pixel(0, 0), viridis(0.0));
        assert_eq!(*rgb.get_pixel(1, 0), viridis(1.0));
    }

    #[test]
    fn constant_plane_maps_to_low_end() {
        let image = Image::from_intensity(&[vec![4.0, 4.0]]).unwrap();
        let rgb = image.to_rgb();
        assert_eq!(*rgb.get_pixel(1, 0), viridis(0.0));
    }
}
