// Screenshot export
//
// Converts the current palette-index frame through the master palette
// and writes a PNG named after the ROM (with an optional timestamp) into
// the configured directory.

use super::config::ScreenshotConfig;
use crate::display::palette;
use crate::display::{SCREEN_HEIGHT, SCREEN_WIDTH};
use chrono::Local;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors while saving a screenshot
#[derive(Debug)]
pub enum ScreenshotError {
    /// Directory creation or file I/O failed
    Io(io::Error),
    /// PNG encoding failed
    Encoding(png::EncodingError),
}

impl fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenshotError::Io(err) => write!(f, "screenshot I/O error: {}", err),
            ScreenshotError::Encoding(err) => write!(f, "PNG encoding error: {}", err),
        }
    }
}

impl std::error::Error for ScreenshotError {}

impl From<io::Error> for ScreenshotError {
    fn from(err: io::Error) -> Self {
        ScreenshotError::Io(err)
    }
}

impl From<png::EncodingError> for ScreenshotError {
    fn from(err: png::EncodingError) -> Self {
        ScreenshotError::Encoding(err)
    }
}

/// Save one frame as a PNG; returns the written path
pub fn save_screenshot(
    frame: &[u8],
    config: &ScreenshotConfig,
    rom_path: Option<&Path>,
) -> Result<PathBuf, ScreenshotError> {
    fs::create_dir_all(&config.directory)?;

    let stem = rom_path
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("screenshot");

    let filename = if config.include_timestamp {
        format!("{}_{}.png", stem, Local::now().format("%Y%m%d_%H%M%S"))
    } else {
        format!("{}.png", stem)
    };
    let path = config.directory.join(filename);

    let mut rgb = Vec::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 3);
    for &index in frame.iter().take(SCREEN_WIDTH * SCREEN_HEIGHT) {
        let (r, g, b) = palette::color(index);
        rgb.push(r);
        rgb.push(g);
        rgb.push(b);
    }

    let file = fs::File::create(&path)?;
    let writer = io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.write_header()?.write_image_data(&rgb)?;

    Ok(path)
}
