//! Terminal preview of an output grid at integer zoom.

use crate::average::{alpha_fraction, OutputGrid};
use crossterm::{
    style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor},
    Command,
};
use image::Rgba;
use std::io;

pub const MAX_ZOOM: u32 = 16;

const HALF_BLOCK: char = '▀';

fn write_ansi_command(buf: &mut String, command: impl Command) -> io::Result<()> {
    command
        .write_ansi(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "failed to encode ANSI command"))
}

/// Blend a grid pixel over an opaque background colour.
pub fn composite(pixel: Rgba<u8>, background: [u8; 3]) -> [u8; 3] {
    let a = alpha_fraction(pixel);
    let mut out = [0u8; 3];
    for i in 0..3 {
        let c = pixel.0[i] as f32 * a + background[i] as f32 * (1.0 - a);
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Render the grid as truecolor half blocks. Every grid pixel becomes `zoom`
/// columns wide and `zoom` pixel rows tall; two pixel rows share one line.
pub fn render_ansi(grid: &OutputGrid, zoom: u32, background: [u8; 3]) -> io::Result<String> {
    let zoom = zoom.clamp(1, MAX_ZOOM);
    let (w, h) = grid.dimensions();
    let cols = w * zoom;
    let rows = h * zoom;

    let color_at = |x: u32, y: u32| -> [u8; 3] {
        if y >= rows {
            background
        } else {
            composite(*grid.get_pixel(x / zoom, y / zoom), background)
        }
    };

    let mut out = String::with_capacity((cols as usize * 20 + 8) * rows.div_ceil(2) as usize);
    let mut y = 0;
    while y < rows {
        let mut last: Option<([u8; 3], [u8; 3])> = None;
        for x in 0..cols {
            let top = color_at(x, y);
            let bottom = color_at(x, y + 1);
            if last.map(|(t, _)| t) != Some(top) {
                write_ansi_command(
                    &mut out,
                    SetForegroundColor(Color::Rgb { r: top[0], g: top[1], b: top[2] }),
                )?;
            }
            if last.map(|(_, b)| b) != Some(bottom) {
                write_ansi_command(
                    &mut out,
                    SetBackgroundColor(Color::Rgb { r: bottom[0], g: bottom[1], b: bottom[2] }),
                )?;
            }
            last = Some((top, bottom));
            out.push(HALF_BLOCK);
        }
        write_ansi_command(&mut out, ResetColor)?;
        out.push('\n');
        y += 2;
    }

    Ok(out)
}

/// Parse `RRGGBB` (optionally prefixed with `#`)
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn composite_respects_alpha() {
        let bg = [255, 255, 255];
        assert_eq!(composite(Rgba([10, 20, 30, 255]), bg), [10, 20, 30]);
        assert_eq!(composite(Rgba([0, 0, 0, 0]), bg), bg);
        assert_eq!(composite(Rgba([0, 0, 0, 128]), bg), [127, 127, 127]);
    }

    #[test]
    fn zoom_scales_line_and_column_count() {
        let grid = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let text = render_ansi(&grid, 2, [0, 0, 0]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // 2 rows * zoom 2 = 4 pixel rows -> 2 lines
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches(HALF_BLOCK).count(), 6);
    }

    #[test]
    fn zoom_is_clamped() {
        let grid = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let text = render_ansi(&grid, 0, [0, 0, 0]).unwrap();
        assert_eq!(text.lines().count(), 1);
        let text = render_ansi(&grid, 1000, [0, 0, 0]).unwrap();
        assert_eq!(text.lines().count(), (MAX_ZOOM / 2) as usize);
    }

    #[test]
    fn parses_hex_background() {
        assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("00FF00"), Some([0, 255, 0]));
        assert_eq!(parse_hex_color("fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }
}
