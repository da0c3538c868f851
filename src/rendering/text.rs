//! Label drawing with `ab_glyph`.
//!
//! A label is painted in three passes, back to front:
//!
//! 1. **Shadow**: the glyphs in translucent black, shifted by `shadow_offset`.
//! 2. **Stroke**: the glyphs in white, stamped around a circle of radius
//!    `stroke_width / 2`. Cheaper than a real outline stroke and
//!    indistinguishable at placeholder sizes.
//! 3. **Fill**: the glyphs in the label color.
//!
//! Lines wrap greedily on whitespace at `wrap_width` and are stacked
//! `vertical_spacing` pixels apart. Dimension labels have no whitespace, so
//! in practice they are a single line.

use super::backend::RenderError;
use crate::style::{StyleParams, TextAlign};
use ab_glyph::{Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use std::path::Path;

const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 128]);
const STROKE: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Stamps used to approximate the stroke ring.
const STROKE_SAMPLES: usize = 16;

/// Load a TrueType/OpenType font file.
pub fn load_font(path: &Path) -> Result<FontVec, RenderError> {
    let data = std::fs::read(path).map_err(|e| RenderError::Font {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    FontVec::try_from_vec(data).map_err(|e| RenderError::Font {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Draw one label onto the canvas.
pub fn draw_label(canvas: &mut RgbaImage, font: &FontVec, style: &StyleParams) {
    if style.font_size <= 0.0 || style.text.is_empty() {
        return;
    }
    let scale = PxScale::from(style.font_size as f32);
    let [r, g, b] = style.color.to_rgb();
    let fill = Rgba([r, g, b, 255]);
    let (anchor_x, anchor_y) = (style.offset.0 as f32, style.offset.1 as f32);

    for (line_no, line) in wrap_lines(font, scale, &style.text, style.wrap_width as f32)
        .iter()
        .enumerate()
    {
        let (glyphs, width) = layout_line(font, scale, line);
        let x = match style.text_align {
            TextAlign::Left => anchor_x,
            TextAlign::Center => anchor_x - width / 2.0,
            TextAlign::Right => anchor_x - width,
        };
        let y = anchor_y + line_no as f32 * style.vertical_spacing as f32;

        let (sx, sy) = (style.shadow_offset.0 as f32, style.shadow_offset.1 as f32);
        paint(canvas, font, &glyphs, x + sx, y + sy, SHADOW);

        let radius = style.stroke_width as f32 / 2.0;
        if radius > 0.0 {
            for i in 0..STROKE_SAMPLES {
                let angle = i as f32 / STROKE_SAMPLES as f32 * std::f32::consts::TAU;
                let (dx, dy) = (radius * angle.cos(), radius * angle.sin());
                paint(canvas, font, &glyphs, x + dx, y + dy, STROKE);
            }
        }

        paint(canvas, font, &glyphs, x, y, fill);
    }
}

/// Horizontal advance of a line, kerning included.
pub fn line_width(font: &FontVec, scale: PxScale, text: &str) -> f32 {
    layout_line(font, scale, text).1
}

/// Position glyphs along a baseline at y = 0, starting at x = 0.
fn layout_line(font: &FontVec, scale: PxScale, text: &str) -> (Vec<Glyph>, f32) {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0;
    let mut previous: Option<GlyphId> = None;
    let mut glyphs = Vec::with_capacity(text.len());

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    (glyphs, caret)
}

/// Greedy whitespace wrap. A single word wider than `max_width` gets its own line.
fn wrap_lines(font: &FontVec, scale: PxScale, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && line_width(font, scale, &candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn paint(canvas: &mut RgbaImage, font: &FontVec, glyphs: &[Glyph], dx: f32, dy: f32, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();

    for glyph in glyphs {
        let mut glyph = glyph.clone();
        glyph.position = point(glyph.position.x + dx, glyph.position.y + dy);
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + i64::from(gx);
            let py = bounds.min.y as i64 + i64::from(gy);
            if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
                return;
            }
            blend(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
        });
    }
}

/// Source-over blend of `color` at `coverage` onto `dst`.
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * f32::from(color[3]) / 255.0;
    for c in 0..3 {
        let mixed = f32::from(color[c]) * alpha + f32::from(dst[c]) * (1.0 - alpha);
        dst[c] = mixed.round() as u8;
    }
    let out_alpha = alpha * 255.0 + f32::from(dst[3]) * (1.0 - alpha);
    dst[3] = out_alpha.round() as u8;
}
