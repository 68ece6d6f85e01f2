//! Diagram rasterization
//!
//! Turns a [`Scene`] into a tiny-skia pixmap: white background, curved
//! parent/child links, rounded node boxes colored by depth, and label text
//! when a font is available. The pixel-density multiplier is applied here so
//! exports come out sharper than the logical canvas size.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform,
};
use tracing::{debug, instrument};

use crate::layout::Rgb;
use crate::view::Scene;

const LINK_WIDTH: f32 = 3.0;
const NODE_STROKE_WIDTH: f32 = 2.0;
const HOVER_STROKE_WIDTH: f32 = 3.5;
const CORNER_RADIUS: f32 = 10.0;
const LABEL_SIZE: f32 = 14.0;
const LABEL_COLOR: Rgb = Rgb {
    r: 0xff,
    g: 0xff,
    b: 0xff,
};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create {width}x{height} pixmap")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("failed to read font file {path}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a usable font file: {path}")]
    InvalidFont { path: PathBuf },

    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}

/// Loads a TTF/OTF font for label rendering.
pub fn load_font(path: &Path) -> Result<FontVec, RenderError> {
    let bytes = std::fs::read(path).map_err(|source| RenderError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(bytes).map_err(|_| RenderError::InvalidFont {
        path: path.to_path_buf(),
    })
}

/// Scene rasterizer. Holds the optional label font and the pixel-density
/// multiplier; everything else comes in per call with the scene.
pub struct Renderer {
    font: Option<FontVec>,
    pixel_ratio: f32,
}

impl Renderer {
    pub fn new(font: Option<FontVec>, pixel_ratio: f32) -> Self {
        Self {
            font,
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Renders the scene at `canvas * pixel_ratio` pixels, honoring the
    /// scene's pan/zoom transform.
    #[instrument(level = "debug", skip(self, scene))]
    pub fn render(&self, scene: &Scene) -> Result<Pixmap, RenderError> {
        let pr = self.pixel_ratio;
        let width = (scene.layout.canvas.width * pr).round().max(1.0) as u32;
        let height = (scene.layout.canvas.height * pr).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::PixmapCreationFailed { width, height })?;
        pixmap.fill(Color::WHITE);

        let zoom = scene.transform.zoom;
        let (pan_x, pan_y) = scene.transform.pan;
        let ts = Transform::from_scale(zoom * pr, zoom * pr).post_translate(pan_x * pr, pan_y * pr);

        self.draw_links(&mut pixmap, scene, ts);
        self.draw_nodes(&mut pixmap, scene, ts);
        if let Some(font) = &self.font {
            self.draw_labels(&mut pixmap, scene, font);
        } else {
            debug!("no label font configured, rendering boxes only");
        }

        Ok(pixmap)
    }

    fn draw_links(&self, pixmap: &mut Pixmap, scene: &Scene, ts: Transform) {
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(0x93, 0xc5, 0xfd, 204));
        paint.anti_alias = true;
        let stroke = Stroke {
            width: LINK_WIDTH,
            ..Stroke::default()
        };

        for link in &scene.layout.links {
            let mut pb = PathBuilder::new();
            let mid_y = (link.y1 + link.y2) / 2.0;
            pb.move_to(link.x1, link.y1);
            pb.cubic_to(link.x1, mid_y, link.x2, mid_y, link.x2, link.y2);
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, ts, None);
            }
        }
    }

    fn draw_nodes(&self, pixmap: &mut Pixmap, scene: &Scene, ts: Transform) {
        for node in &scene.layout.nodes {
            let Some(path) = rounded_rect(
                node.x - node.width / 2.0,
                node.y - node.height / 2.0,
                node.width,
                node.height,
                CORNER_RADIUS,
            ) else {
                continue;
            };

            let mut fill = Paint::default();
            fill.set_color(Color::from_rgba8(
                node.fill.r, node.fill.g, node.fill.b, 255,
            ));
            fill.anti_alias = true;
            pixmap.fill_path(&path, &fill, FillRule::Winding, ts, None);

            let mut stroke_paint = Paint::default();
            stroke_paint.set_color(Color::WHITE);
            stroke_paint.anti_alias = true;
            let width = if scene.hovered == Some(node.id) {
                HOVER_STROKE_WIDTH
            } else {
                NODE_STROKE_WIDTH
            };
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &stroke_paint, &stroke, ts, None);
        }
    }

    /// Labels are drawn in device space (transform applied by hand) so glyph
    /// rasterization happens at the final pixel size.
    fn draw_labels(&self, pixmap: &mut Pixmap, scene: &Scene, font: &FontVec) {
        let pr = self.pixel_ratio;
        let zoom = scene.transform.zoom;
        let (pan_x, pan_y) = scene.transform.pan;
        let px = LABEL_SIZE * zoom * pr;

        for node in &scene.layout.nodes {
            let cx = (node.x * zoom + pan_x) * pr;
            let cy = (node.y * zoom + pan_y) * pr;
            draw_text_centered(pixmap, font, &node.label, cx, cy, px, LABEL_COLOR);
        }
    }
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<tiny_skia::Path> {
    let r = radius.min(w / 2.0).min(h / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

fn draw_text_centered(
    pixmap: &mut Pixmap,
    font: &FontVec,
    text: &str,
    cx: f32,
    cy: f32,
    px: f32,
    color: Rgb,
) {
    let scaled = font.as_scaled(PxScale::from(px));
    let total_width: f32 = text
        .chars()
        .map(|c| scaled.h_advance(scaled.glyph_id(c)))
        .sum();
    let mut pen_x = cx - total_width / 2.0;
    let baseline = cy + (scaled.ascent() + scaled.descent()) / 2.0;

    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        glyph.position = ab_glyph::point(pen_x, baseline);
        pen_x += scaled.h_advance(glyph.id);

        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let pm_width = pixmap.width() as i32;
            let pm_height = pixmap.height() as i32;
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                if x < 0 || y < 0 || x >= pm_width || y >= pm_height {
                    return;
                }
                let idx = (y * pm_width + x) as usize;
                let pixels = pixmap.pixels_mut();
                pixels[idx] = blend_over(pixels[idx], color, coverage);
            });
        }
    }
}

/// Source-over blend of a coverage-weighted solid color onto a
/// premultiplied destination pixel.
fn blend_over(dst: PremultipliedColorU8, src: Rgb, coverage: f32) -> PremultipliedColorU8 {
    let a = coverage.clamp(0.0, 1.0);
    let inv = 1.0 - a;
    let out_a = (255.0 * a + dst.alpha() as f32 * inv).round().min(255.0) as u8;
    let out_r = ((src.r as f32 * a + dst.red() as f32 * inv).round() as u8).min(out_a);
    let out_g = ((src.g as f32 * a + dst.green() as f32 * inv).round() as u8).min(out_a);
    let out_b = ((src.b as f32 * a + dst.blue() as f32 * inv).round() as u8).min(out_a);
    PremultipliedColorU8::from_rgba(out_r, out_g, out_b, out_a).unwrap_or(dst)
}
