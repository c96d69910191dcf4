//! Top-down color preview of a heightfield.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use procgen::{height_color, Heightfield};

/// One pixel per cell, colored by height band and shaded by elevation.
pub fn render_preview(field: &Heightfield) -> RgbImage {
    RgbImage::from_fn(field.width() as u32, field.height() as u32, |x, y| {
        let h = field.get(x as usize, y as usize);
        let [r, g, b, _] = height_color(h);
        // Darken low ground slightly inside each band so relief stays readable.
        let shade = 0.75 + 0.25 * h.clamp(0.0, 1.0);
        Rgb([to_byte(r * shade), to_byte(g * shade), to_byte(b * shade)])
    })
}

pub fn save_preview(field: &Heightfield, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating preview directory {:?}", parent))?;
    }
    render_preview(field)
        .save(path)
        .with_context(|| format!("writing preview {:?}", path))?;
    log::info!("Preview written to {:?}", path);
    Ok(())
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
