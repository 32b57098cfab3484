//! Crop an image to a target aspect ratio and pixelate it by block averaging.

pub mod average;
pub mod crop;
pub mod presets;
#[cfg(not(target_arch = "wasm32"))]
pub mod render;
pub mod session;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use average::{downsample, downsample_raw, BlockAverager, OutputGrid};
pub use crop::{compute_crop, exceeds_source, CropRect};
pub use presets::Preset;
pub use session::{Session, SessionState};

use image::{imageops, DynamicImage, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixelateError {
    #[error("Could not load file as an image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Invalid target size: {0}")]
    InvalidTargetSize(String),
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("No image loaded")]
    NoImage,
    #[error("No valid target size set")]
    NoTarget,
    #[error("Preset error: {0}")]
    Preset(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PixelateError>;

/// Output grid size in cells. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    width: u32,
    height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PixelateError::InvalidTargetSize(format!(
                "{}x{} (both sides must be positive)",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Parse user-entered text, as typed into the width/height fields.
    ///
    /// Like a browser's `parseInt`, leading whitespace is skipped and only the
    /// leading integer is read, so `"32px"` is 32 and `"3.5"` is 3.
    pub fn parse(width: &str, height: &str) -> Result<Self> {
        let (w, h) = (leading_int(width)?, leading_int(height)?);
        if w <= 0 || h <= 0 {
            return Err(PixelateError::InvalidTargetSize(format!(
                "{}x{} (both sides must be positive)",
                w, h
            )));
        }
        let w = u32::try_from(w).map_err(|_| PixelateError::InvalidTargetSize(format!("width {} is too large", w)))?;
        let h = u32::try_from(h).map_err(|_| PixelateError::InvalidTargetSize(format!("height {} is too large", h)))?;
        Self::new(w, h)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

fn leading_int(text: &str) -> Result<i64> {
    let s = text.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(PixelateError::InvalidTargetSize(format!("'{}' is not a number", text.trim())));
    }
    s[..sign_len + digits]
        .parse::<i64>()
        .map_err(|_| PixelateError::InvalidTargetSize(format!("'{}' is too large", text.trim())))
}

impl std::fmt::Display for TargetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Result of one pixelate run.
#[derive(Debug, Clone)]
pub struct Pixelated {
    pub crop: CropRect,
    pub grid: OutputGrid,
    /// Target had more cells than the source had pixels on some axis.
    pub upscaled: bool,
}

/// Crop-then-average pipeline for a fixed target size
pub struct Pixelator {
    target: TargetSize,
}

impl Pixelator {
    pub fn new(target: TargetSize) -> Self {
        Self { target }
    }

    pub fn target(&self) -> TargetSize {
        self.target
    }

    pub fn pixelate(&self, image: &DynamicImage) -> Pixelated {
        self.pixelate_rgba(&image.to_rgba8())
    }

    pub fn pixelate_rgba(&self, source: &RgbaImage) -> Pixelated {
        let (src_w, src_h) = source.dimensions();
        let (out_w, out_h) = (self.target.width(), self.target.height());

        let upscaled = exceeds_source(src_w, src_h, self.target);
        if upscaled {
            log::warn!(
                "target {} exceeds source {}x{}; output quality will suffer",
                self.target, src_w, src_h
            );
        }

        let crop = compute_crop(src_w, src_h, out_w, out_h);
        log::debug!("source {}x{} cropped to {:?}", src_w, src_h, crop);

        let cropped = imageops::crop_imm(source, crop.x, crop.y, crop.width, crop.height).to_image();
        let grid = downsample(&cropped, out_w, out_h);
        log::debug!("averaged into {}x{} grid", grid.width(), grid.height());

        Pixelated { crop, grid, upscaled }
    }
}
