//! Renders the summary image written after every successful refresh.
//!
//! The image is derived entirely from the refresh status and the five
//! countries with the highest estimated GDP, and is rewritten wholesale each
//! time. Text is drawn with the 8x8 bitmap glyphs from `font8x8`, scaled up.

use crate::core::catalog;
use crate::core::country::{Country, RefreshStatus};
use crate::core::error::Error;
use crate::store::CountryStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SNAPSHOT_FILE: &str = "summary.png";
pub const WIDTH: u32 = 720;
pub const HEIGHT: u32 = 400;
pub const TOP_N: usize = 5;

const SCALE: u32 = 2;
const GLYPH: u32 = 8;
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Rounds to whole units and groups thousands with commas.
pub fn format_amount(value: f64) -> String {
    let digits = (value.max(0.0).round() as u128).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn gdp_label(country: &Country) -> String {
    if country.has_estimate() {
        format!("${}", format_amount(country.estimated_gdp))
    } else {
        "N/A".to_string()
    }
}

pub fn format_refresh_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "never".to_string(),
        |at| at.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
    )
}

/// Text lines of the snapshot, top to bottom.
pub fn snapshot_lines(status: &RefreshStatus, top: &[Country]) -> Vec<String> {
    let mut lines = vec![
        format!("Total Countries: {}", status.total_countries),
        format!(
            "Last Refresh: {}",
            format_refresh_time(status.last_refreshed_at)
        ),
        "Top 5 Countries by Estimated GDP (USD)".to_string(),
    ];
    lines.extend(
        top.iter()
            .take(TOP_N)
            .enumerate()
            .map(|(i, c)| format!("{}. {}: {}", i + 1, c.name, gdp_label(c))),
    );
    lines
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

// Pixels falling outside the canvas are clipped.
fn draw_text(img: &mut RgbImage, text: &str, x: u32, y: u32) {
    let mut cursor = x;
    for ch in text.chars() {
        if cursor >= img.width() {
            break;
        }
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH {
                if *bits & (1u8 << col) == 0 {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        let px = cursor + col * SCALE + dx;
                        let py = y + row as u32 * SCALE + dy;
                        if px < img.width() && py < img.height() {
                            img.put_pixel(px, py, INK);
                        }
                    }
                }
            }
        }
        cursor += GLYPH * SCALE;
    }
}

/// Renders the summary as PNG bytes.
pub fn render_snapshot(status: &RefreshStatus, top: &[Country]) -> Result<Vec<u8>> {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, PAPER);
    let lines = snapshot_lines(status, top);

    for (i, line) in lines.iter().enumerate() {
        match i {
            0 => draw_text(&mut img, line, 40, 40),
            1 => draw_text(&mut img, line, 40, 72),
            2 => {
                // Heading is drawn twice, one pixel apart, for a bold face.
                draw_text(&mut img, line, 40, 130);
                draw_text(&mut img, line, 41, 130);
            }
            _ => draw_text(&mut img, line, 60, 175 + (i as u32 - 3) * 32),
        }
    }

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Failed to encode summary image")?;
    Ok(bytes)
}

/// Writes `bytes` to the snapshot file in `dir`, replacing any previous one.
pub fn write_snapshot(dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(SNAPSHOT_FILE);
    let tmp = dir.join(format!("{SNAPSHOT_FILE}.tmp"));
    std::fs::write(&tmp, bytes)
        .with_context(|| format!("Failed to write summary image to {}", tmp.display()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("Failed to move summary image to {}", path.display()))?;
    debug!("Wrote summary image to {}", path.display());
    Ok(path)
}

/// Renders the snapshot from the current store contents and writes it to `dir`.
pub fn generate_snapshot(store: &dyn CountryStore, dir: &Path) -> Result<PathBuf> {
    let status = catalog::get_status(store)?;
    let top = catalog::top_by_gdp(store, TOP_N)?;
    let bytes = render_snapshot(&status, &top)?;
    write_snapshot(dir, &bytes)
}

/// Path of the last written snapshot in `dir`.
pub fn snapshot_path(dir: &Path) -> Result<PathBuf, Error> {
    let path = dir.join(SNAPSHOT_FILE);
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::NotFound("Summary image".to_string()))
    }
}
