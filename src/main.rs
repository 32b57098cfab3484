//! pixelate CLI - crop an image to a grid's aspect ratio and show it pixelated

use clap::{error::ErrorKind, CommandFactory, Parser};
use pixelate::presets::{default_presets, find_preset, load_presets};
use pixelate::render::{parse_hex_color, render_ansi, MAX_ZOOM};
use pixelate::{PixelateError, Session, TargetSize};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pixelate", about = "Pixelate an image by block averaging")]
struct Args {
    /// Input image file
    input: Option<PathBuf>,
    /// Output width in cells
    #[arg(short = 'W', long, default_value = "32")]
    width: String,
    /// Output height in cells
    #[arg(short = 'H', long, default_value = "32")]
    height: String,
    /// Named preset, overrides width and height
    #[arg(short, long)]
    preset: Option<String>,
    /// JSON file with custom presets
    #[arg(long)]
    presets: Option<PathBuf>,
    /// Terminal cells per output pixel
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=MAX_ZOOM as i64))]
    zoom: u32,
    /// Background behind transparent pixels (RRGGBB)
    #[arg(long, default_value = "000000", value_parser = parse_background)]
    background: [u8; 3],
    /// Print available presets and exit
    #[arg(long)]
    list_presets: bool,
}

fn parse_background(s: &str) -> Result<[u8; 3], String> {
    parse_hex_color(s).ok_or_else(|| format!("'{}' is not an RRGGBB colour", s))
}

fn require_input(input: Option<PathBuf>) -> Result<PathBuf, clap::Error> {
    input.ok_or_else(|| {
        Args::command().error(
            ErrorKind::MissingRequiredArgument,
            "an input image is required unless --list-presets is given",
        )
    })
}

fn main() -> Result<(), PixelateError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let presets = match &args.presets {
        Some(path) => load_presets(path)?,
        None => default_presets(),
    };

    if args.list_presets {
        for preset in &presets {
            println!("{:<12} {}x{}", preset.name, preset.width, preset.height);
        }
        return Ok(());
    }

    let input = require_input(args.input).unwrap_or_else(|e| e.exit());

    let mut session = Session::new();
    match &args.preset {
        Some(name) => {
            let preset = find_preset(&presets, name)
                .ok_or_else(|| PixelateError::Preset(format!("unknown preset '{}'", name)))?;
            session.apply_preset(preset)?;
        }
        None => {
            let target = TargetSize::parse(&args.width, &args.height)?;
            session.set_target(target);
        }
    }

    session.load_path(&input)?;
    if let Some(warning) = session.target_warning() {
        eprintln!("warning: {}", warning);
    }

    let result = session.pixelate()?;
    log::info!(
        "crop {}x{} at ({}, {}) -> {}x{}",
        result.crop.width,
        result.crop.height,
        result.crop.x,
        result.crop.y,
        result.grid.width(),
        result.grid.height()
    );

    let text = render_ansi(&result.grid, args.zoom, args.background)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
