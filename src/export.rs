//! Image export: rasterize the current scene to PNG bytes
//!
//! Export is strictly read-only with respect to tree and interaction state;
//! a failed rasterization or clipboard hand-off leaves the viewer untouched
//! and is reported as a recoverable error.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::infrastructure::{ClipboardWriter, InfraError};
use crate::render::{load_font, RenderError, Renderer};
use crate::view::Scene;

/// Knobs for one export run.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Pixel-density multiplier for sharper output (frontend parity: 2)
    pub pixel_ratio: f32,
    /// TTF/OTF file for label text; absent → boxes without labels
    pub font_path: Option<PathBuf>,
}

/// Rasterizes the scene and encodes it as PNG.
///
/// A missing or unreadable font degrades to label-less output rather than
/// failing the export.
#[instrument(level = "debug", skip(scene))]
pub fn to_png(scene: &Scene, options: &ExportOptions) -> Result<Vec<u8>, RenderError> {
    let font = match &options.font_path {
        Some(path) => match load_font(path) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!("label font unavailable, exporting without text: {e}");
                None
            }
        },
        None => None,
    };

    let pixel_ratio = if options.pixel_ratio > 0.0 {
        options.pixel_ratio
    } else {
        2.0
    };
    let renderer = Renderer::new(font, pixel_ratio);
    let pixmap = renderer.render(scene)?;
    pixmap
        .encode_png()
        .map_err(|e| RenderError::PngEncode(e.to_string()))
}

/// Writes PNG bytes to a file.
pub fn write_png_file(png: &[u8], path: &Path) -> Result<(), InfraError> {
    std::fs::write(path, png)
        .map_err(|source| InfraError::io(format!("writing image to {}", path.display()), source))?;
    info!(path = %path.display(), bytes = png.len(), "diagram exported");
    Ok(())
}

/// Places PNG bytes on the system clipboard through the configured writer.
pub fn copy_to_clipboard(png: &[u8], clipboard: &dyn ClipboardWriter) -> Result<(), InfraError> {
    clipboard.write_png(png)?;
    info!(bytes = png.len(), "diagram copied to clipboard");
    Ok(())
}
