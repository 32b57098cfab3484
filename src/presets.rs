//! Named target sizes, built in or loaded from a JSON file.

use crate::{PixelateError, Result, TargetSize};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Preset {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self { name: name.into(), width, height }
    }

    pub fn target(&self) -> Result<TargetSize> {
        TargetSize::new(self.width, self.height)
            .map_err(|e| PixelateError::Preset(format!("'{}': {}", self.name, e)))
    }
}

/// Presets available when no file is given
pub fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new("16x16", 16, 16),
        Preset::new("32x32", 32, 32),
        Preset::new("64x64", 64, 64),
        Preset::new("128x128", 128, 128),
        Preset::new("32x18", 32, 18),
        Preset::new("64x36", 64, 36),
    ]
}

/// Load a JSON array of `{ "name", "width", "height" }` objects.
pub fn load_presets(path: impl AsRef<Path>) -> Result<Vec<Preset>> {
    parse_presets(&std::fs::read_to_string(path)?)
}

pub fn parse_presets(json: &str) -> Result<Vec<Preset>> {
    let presets: Vec<Preset> = serde_json::from_str(json)?;
    if presets.is_empty() {
        return Err(PixelateError::Preset("preset list is empty".into()));
    }
    for preset in &presets {
        preset.target()?;
    }
    Ok(presets)
}

/// Case-insensitive lookup by name
pub fn find_preset<'a>(presets: &'a [Preset], name: &str) -> Option<&'a Preset> {
    presets.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}
