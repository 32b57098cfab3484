//! Current image and target size, with the transitions between them.

use crate::{exceeds_source, PixelateError, Pixelated, Pixelator, Preset, Result, TargetSize};
use image::{DynamicImage, RgbaImage};
use std::path::Path;

fn read_image(path: &Path) -> Result<DynamicImage> {
    Ok(image::ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Pixelated,
}

#[derive(Default)]
pub struct Session {
    image: Option<RgbaImage>,
    target: Option<TargetSize>,
    active_preset: Option<String>,
    result: Option<Pixelated>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (&self.image, &self.result) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::Loaded,
            (Some(_), Some(_)) => SessionState::Pixelated,
        }
    }

    /// Decode and replace the current image. On failure the previous image
    /// is discarded, the session drops back to `Empty` and `Decode` is returned.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = image::load_from_memory(bytes).map_err(PixelateError::from);
        self.finish_load(decoded)
    }

    /// Read and decode a file. Any failure, unreadable file (`Io`) or
    /// undecodable contents (`Decode`), discards the previous image and
    /// leaves the session `Empty`.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let decoded = read_image(path);
        if decoded.is_ok() {
            log::debug!("loaded {}", path.display());
        }
        self.finish_load(decoded)
    }

    fn finish_load(&mut self, decoded: Result<DynamicImage>) -> Result<()> {
        self.result = None;
        match decoded {
            Ok(img) => {
                self.set_image(img.to_rgba8());
                Ok(())
            }
            Err(e) => {
                log::warn!("could not load image: {}", e);
                self.image = None;
                Err(e)
            }
        }
    }

    pub fn set_image(&mut self, image: RgbaImage) {
        self.result = None;
        self.image = Some(image);
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Custom size; clears any active preset.
    pub fn set_target(&mut self, target: TargetSize) {
        self.active_preset = None;
        self.replace_target(Some(target));
    }

    /// Validate typed width/height. Invalid input clears the target so that
    /// pixelating becomes unavailable.
    pub fn set_target_str(&mut self, width: &str, height: &str) -> Result<()> {
        self.active_preset = None;
        match TargetSize::parse(width, height) {
            Ok(target) => {
                self.replace_target(Some(target));
                Ok(())
            }
            Err(e) => {
                self.replace_target(None);
                Err(e)
            }
        }
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Result<()> {
        let target = preset.target()?;
        self.replace_target(Some(target));
        self.active_preset = Some(preset.name.clone());
        Ok(())
    }

    fn replace_target(&mut self, target: Option<TargetSize>) {
        if self.target != target {
            self.result = None;
        }
        self.target = target;
    }

    pub fn target(&self) -> Option<TargetSize> {
        self.target
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    pub fn can_pixelate(&self) -> bool {
        self.image.is_some() && self.target.is_some()
    }

    /// Non-fatal advisory shown when the grid is larger than the source.
    pub fn target_warning(&self) -> Option<String> {
        let (image, target) = (self.image.as_ref()?, self.target?);
        let (w, h) = image.dimensions();
        exceeds_source(w, h, target).then(|| {
            format!(
                "Target {} is larger than the source image ({}x{}); the result will be upscaled",
                target, w, h
            )
        })
    }

    pub fn pixelate(&mut self) -> Result<&Pixelated> {
        let image = self.image.as_ref().ok_or(PixelateError::NoImage)?;
        let target = self.target.ok_or(PixelateError::NoTarget)?;
        let result = Pixelator::new(target).pixelate_rgba(image);
        Ok(self.result.insert(result))
    }

    pub fn result(&self) -> Option<&Pixelated> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn walks_empty_loaded_pixelated() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(!session.can_pixelate());

        session.load_bytes(&png_bytes(8, 8)).unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(!session.can_pixelate());
        assert!(matches!(session.pixelate(), Err(PixelateError::NoTarget)));

        session.set_target(TargetSize::new(2, 2).unwrap());
        assert!(session.can_pixelate());
        let out = session.pixelate().unwrap();
        assert_eq!(out.grid.dimensions(), (2, 2));
        assert_eq!(session.state(), SessionState::Pixelated);
    }

    #[test]
    fn decode_failure_drops_image() {
        let mut session = Session::new();
        session.load_bytes(&png_bytes(4, 4)).unwrap();
        let err = session.load_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PixelateError::Decode(_)));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(matches!(session.pixelate(), Err(PixelateError::NoImage)));
    }

    #[test]
    fn missing_file_drops_image() {
        let mut session = Session::new();
        session.set_image(RgbaImage::new(4, 4));
        assert_eq!(session.state(), SessionState::Loaded);

        let err = session.load_path("/nonexistent/pixelate/input.png").unwrap_err();
        assert!(matches!(err, PixelateError::Io(_)));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(!session.can_pixelate());
    }

    #[test]
    fn non_image_file_drops_image() {
        let path = std::env::temp_dir().join(format!("pixelate-not-an-image-{}.txt", std::process::id()));
        std::fs::write(&path, b"plain text, not pixels").unwrap();

        let mut session = Session::new();
        session.set_image(RgbaImage::new(4, 4));
        let err = session.load_path(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, PixelateError::Decode(_)));
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn loads_png_from_disk() {
        let path = std::env::temp_dir().join(format!("pixelate-load-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes(6, 3)).unwrap();

        let mut session = Session::new();
        let loaded = session.load_path(&path);
        std::fs::remove_file(&path).unwrap();

        loaded.unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.image().map(|img| img.dimensions()), Some((6, 3)));
    }

    #[test]
    fn invalid_text_disables_pixelate() {
        let mut session = Session::new();
        session.load_bytes(&png_bytes(4, 4)).unwrap();
        session.set_target_str("4", "4").unwrap();
        assert!(session.can_pixelate());

        assert!(session.set_target_str("4", "zero").is_err());
        assert!(!session.can_pixelate());
        assert_eq!(session.target(), None);
    }

    #[test]
    fn changing_target_discards_result() {
        let mut session = Session::new();
        session.load_bytes(&png_bytes(4, 4)).unwrap();
        session.set_target(TargetSize::new(2, 2).unwrap());
        session.pixelate().unwrap();
        assert_eq!(session.state(), SessionState::Pixelated);

        session.set_target(TargetSize::new(1, 1).unwrap());
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn preset_is_active_until_custom_input() {
        let mut session = Session::new();
        session.apply_preset(&Preset::new("tiny", 2, 2)).unwrap();
        assert_eq!(session.active_preset(), Some("tiny"));
        assert_eq!(session.target(), Some(TargetSize::new(2, 2).unwrap()));

        session.set_target_str("3", "3").unwrap();
        assert_eq!(session.active_preset(), None);
    }

    #[test]
    fn warns_when_target_exceeds_source() {
        let mut session = Session::new();
        session.load_bytes(&png_bytes(50, 50)).unwrap();
        session.set_target(TargetSize::new(40, 40).unwrap());
        assert_eq!(session.target_warning(), None);

        session.set_target(TargetSize::new(100, 100).unwrap());
        assert!(session.target_warning().is_some());
        assert!(session.pixelate().unwrap().upscaled);
    }
}
