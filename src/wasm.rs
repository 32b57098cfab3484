//! WebAssembly bindings for pixelate

use wasm_bindgen::prelude::*;
use crate::{compute_crop, exceeds_source, PixelateError, Pixelator, TargetSize};

fn to_js(err: PixelateError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WasmPixelator {
    pixelator: Option<Pixelator>,
}

#[wasm_bindgen]
impl WasmPixelator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmPixelator {
        WasmPixelator { pixelator: None }
    }

    /// Set the grid size from the raw input field values. Invalid values
    /// clear the target and return an error, leaving pixelate unavailable.
    #[wasm_bindgen]
    pub fn set_target(&mut self, width: &str, height: &str) -> Result<(), JsValue> {
        match TargetSize::parse(width, height) {
            Ok(target) => {
                self.pixelator = Some(Pixelator::new(target));
                Ok(())
            }
            Err(e) => {
                self.pixelator = None;
                Err(to_js(e))
            }
        }
    }

    #[wasm_bindgen]
    pub fn can_pixelate(&self) -> bool {
        self.pixelator.is_some()
    }

    /// True when the current target is larger than a `width × height` source.
    #[wasm_bindgen]
    pub fn exceeds_source(&self, width: u32, height: u32) -> bool {
        self.pixelator
            .as_ref()
            .is_some_and(|p| exceeds_source(width, height, p.target()))
    }

    /// Pixelate a full RGBA image (as read from a canvas).
    /// Returns `{ pixels: Uint8ClampedArray, width, height, crop: {x, y, width, height}, warning }`.
    #[wasm_bindgen]
    pub fn pixelate(&self, image_data: &[u8], width: u32, height: u32) -> Result<js_sys::Object, JsValue> {
        let pixelator = self
            .pixelator
            .as_ref()
            .ok_or_else(|| to_js(PixelateError::NoTarget))?;
        let img = image::RgbaImage::from_raw(width, height, image_data.to_vec())
            .ok_or_else(|| {
                to_js(PixelateError::BufferSize {
                    expected: width as usize * height as usize * 4,
                    actual: image_data.len(),
                })
            })?;

        let out = pixelator.pixelate_rgba(&img);
        if out.upscaled {
            web_sys::console::warn_1(&"pixelate: target exceeds source resolution".into());
        }

        let crop = js_sys::Object::new();
        js_sys::Reflect::set(&crop, &"x".into(), &out.crop.x.into())?;
        js_sys::Reflect::set(&crop, &"y".into(), &out.crop.y.into())?;
        js_sys::Reflect::set(&crop, &"width".into(), &out.crop.width.into())?;
        js_sys::Reflect::set(&crop, &"height".into(), &out.crop.height.into())?;

        let (out_w, out_h) = out.grid.dimensions();
        let pixels = js_sys::Uint8ClampedArray::from(out.grid.as_raw().as_slice());

        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"pixels".into(), &pixels)?;
        js_sys::Reflect::set(&result, &"width".into(), &out_w.into())?;
        js_sys::Reflect::set(&result, &"height".into(), &out_h.into())?;
        js_sys::Reflect::set(&result, &"crop".into(), &crop)?;
        js_sys::Reflect::set(&result, &"warning".into(), &out.upscaled.into())?;

        Ok(result)
    }
}

impl Default for WasmPixelator {
    fn default() -> Self {
        Self::new()
    }
}

/// Crop rectangle for a source and target size, as `[x, y, width, height]`.
#[wasm_bindgen]
pub fn crop_rect(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> Result<Vec<u32>, JsValue> {
    if src_w == 0 || src_h == 0 {
        return Err(JsValue::from_str("source dimensions must be positive"));
    }
    let target = TargetSize::new(target_w, target_h).map_err(to_js)?;
    let crop = compute_crop(src_w, src_h, target.width(), target.height());
    Ok(vec![crop.x, crop.y, crop.width, crop.height])
}
