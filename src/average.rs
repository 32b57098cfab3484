//! Block averaging - splits the cropped image into a grid and averages each cell.

use crate::{PixelateError, Result};
use image::{Rgba, RgbaImage};

/// One averaged RGBA pixel per target cell.
pub type OutputGrid = RgbaImage;

/// Half-open source range `[x0, x1) × [y0, y1)` covered by one output cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl CellBounds {
    pub fn pixel_count(&self) -> u64 {
        (self.x1 - self.x0) as u64 * (self.y1 - self.y0) as u64
    }
}

pub struct BlockAverager<'a> {
    image: &'a RgbaImage,
    cols: u32,
    rows: u32,
}

impl<'a> BlockAverager<'a> {
    pub fn new(image: &'a RgbaImage, cols: u32, rows: u32) -> Self {
        debug_assert!(cols > 0 && rows > 0, "grid dimensions must be positive");
        Self { image, cols, rows }
    }

    /// Source range of cell (col, row); boundaries are `floor(k * size / cells)`
    /// so consecutive cells share edges and never overlap.
    pub fn cell_bounds(&self, col: u32, row: u32) -> CellBounds {
        let (w, h) = self.image.dimensions();
        CellBounds {
            x0: split_point(col, w, self.cols),
            x1: split_point(col + 1, w, self.cols),
            y0: split_point(row, h, self.rows),
            y1: split_point(row + 1, h, self.rows),
        }
    }

    /// Average of every source pixel in the cell, each channel rounded half up.
    /// Empty cells come out as transparent black.
    pub fn average_cell(&self, col: u32, row: u32) -> Rgba<u8> {
        let bounds = self.cell_bounds(col, row);
        let mut sum = [0u64; 4];
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let px = self.image.get_pixel(x, y).0;
                for (acc, &c) in sum.iter_mut().zip(px.iter()) {
                    *acc += c as u64;
                }
            }
        }

        // Empty cells divide by one, leaving every channel at zero
        let count = bounds.pixel_count().max(1);
        Rgba(sum.map(|s| ((s + count / 2) / count) as u8))
    }

    pub fn downsample(&self) -> OutputGrid {
        RgbaImage::from_fn(self.cols, self.rows, |col, row| self.average_cell(col, row))
    }
}

fn split_point(index: u32, size: u32, cells: u32) -> u32 {
    (index as u64 * size as u64 / cells as u64) as u32
}

/// Downsample an already-cropped image to `target_w × target_h` cells.
pub fn downsample(pixels: &RgbaImage, target_w: u32, target_h: u32) -> OutputGrid {
    BlockAverager::new(pixels, target_w, target_h).downsample()
}

/// Same as [`downsample`], for hosts that only hold a raw RGBA byte buffer.
pub fn downsample_raw(
    pixels: &[u8],
    crop_w: u32,
    crop_h: u32,
    target_w: u32,
    target_h: u32,
) -> Result<OutputGrid> {
    let expected = crop_w as usize * crop_h as usize * 4;
    if pixels.len() != expected {
        return Err(PixelateError::BufferSize { expected, actual: pixels.len() });
    }
    let image = RgbaImage::from_raw(crop_w, crop_h, pixels.to_vec())
        .ok_or(PixelateError::BufferSize { expected, actual: pixels.len() })?;
    Ok(downsample(&image, target_w, target_h))
}

/// Opacity of an averaged pixel as a fraction in [0, 1].
pub fn alpha_fraction(pixel: Rgba<u8>) -> f32 {
    pixel.0[3] as f32 / 255.0
}
