//! Watermark rendering (§4.9), ported from
//! `original_source/src/watermark/watermark_renderer.h`'s contract.

use crate::annotation::renderer::{AnnotationRenderer, SoftwareRenderer};
use crate::config::{TextWatermarkConfig, WatermarkPosition};
use crate::image::Image;

pub trait WatermarkRenderer: Send + Sync {
    fn apply_text_watermark(&mut self, image: &mut Image, config: &TextWatermarkConfig);

    /// Tiles `config.text` across `image` with spacing `(sx, sy)`,
    /// rotating the tile grid by `angle_deg` about the image center; the
    /// tiling region is expanded by the image diagonal so coverage
    /// survives rotation.
    fn apply_tiled_text_watermark(
        &mut self,
        image: &mut Image,
        config: &TextWatermarkConfig,
        angle_deg: f32,
        sx: u32,
        sy: u32,
    );

    /// Alpha-blends `overlay` onto `target` at `(x, y)`, scaling the
    /// overlay's alpha by `clamp(opacity, 0, 1)`. Regions outside
    /// `target` are clipped.
    fn apply_image_watermark(&mut self, target: &mut Image, overlay: &Image, x: i32, y: i32, opacity: f32);
}

fn text_bounds(text: &str, font_size: i32) -> (i32, i32) {
    let size = font_size.max(1);
    let glyph_advance = size + size / 4;
    let width = text.chars().count() as i32 * glyph_advance;
    (width.max(1), size)
}

fn resolve_position(config: &TextWatermarkConfig, image_w: i32, image_h: i32) -> (i32, i32) {
    let margin = config.effective_margin();
    let (text_w, text_h) = text_bounds(&config.text, config.effective_font_size());
    match config.position {
        WatermarkPosition::TopLeft => (margin, margin),
        WatermarkPosition::TopRight => (image_w - text_w - margin, margin),
        WatermarkPosition::BottomLeft => (margin, image_h - text_h - margin),
        WatermarkPosition::BottomRight => (image_w - text_w - margin, image_h - text_h - margin),
        WatermarkPosition::Center => ((image_w - text_w) / 2, (image_h - text_h) / 2),
        WatermarkPosition::Custom => (config.x, config.y),
    }
}

/// Software `WatermarkRenderer`; text passes reuse
/// [`SoftwareRenderer::draw_text`] (black fill, white outline per §4.9)
/// and image passes reuse the annotation renderer's straight-alpha
/// source-over blend.
pub struct SoftwareWatermarkRenderer {
    text_renderer: SoftwareRenderer,
}

impl SoftwareWatermarkRenderer {
    pub fn new() -> Self {
        Self { text_renderer: SoftwareRenderer::new() }
    }

    /// Draws `config.text` with `(x, y)` as its top-left corner, rotating
    /// the glyph origins around the text's bounding-box center by
    /// `config.rotation` degrees first (§4.9: "optional rotation rotates
    /// around the text's bounding-box center").
    fn draw_outlined_text(&mut self, image: &mut Image, x: i32, y: i32, config: &TextWatermarkConfig) {
        let font_name = config.font_name.as_deref().unwrap_or("");
        let size = config.effective_font_size();
        if !self.text_renderer.begin_render(image) {
            return;
        }
        let (w, h) = text_bounds(&config.text, size);
        let center = (x as f32 + w as f32 / 2.0, y as f32 + h as f32 / 2.0);
        let (rx, ry) = rotate_around(x as f32, y as f32, center, config.rotation);
        let (x, y) = (rx.round() as i32, ry.round() as i32);
        // White outline: four 1px offsets behind the black fill.
        for (ox, oy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            self.text_renderer
                .draw_text(image, x + ox, y + oy, &config.text, font_name, size, 0xFFFFFFFF);
        }
        self.text_renderer.draw_text(image, x, y, &config.text, font_name, size, 0xFF000000);
        self.text_renderer.end_render();
    }
}

/// Rotates `(px, py)` by `angle_deg` degrees around `center`.
fn rotate_around(px: f32, py: f32, center: (f32, f32), angle_deg: f32) -> (f32, f32) {
    if angle_deg == 0.0 {
        return (px, py);
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (dx, dy) = (px - center.0, py - center.1);
    (center.0 + dx * cos - dy * sin, center.1 + dx * sin + dy * cos)
}

impl Default for SoftwareWatermarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WatermarkRenderer for SoftwareWatermarkRenderer {
    fn apply_text_watermark(&mut self, image: &mut Image, config: &TextWatermarkConfig) {
        let (image_w, image_h) = (image.width() as i32, image.height() as i32);
        let (x, y) = resolve_position(config, image_w, image_h);
        self.draw_outlined_text(image, x, y, config);
    }

    fn apply_tiled_text_watermark(
        &mut self,
        image: &mut Image,
        config: &TextWatermarkConfig,
        angle_deg: f32,
        sx: u32,
        sy: u32,
    ) {
        let (image_w, image_h) = (image.width() as i32, image.height() as i32);
        let diagonal = ((image_w * image_w + image_h * image_h) as f64).sqrt() as i32;
        let cx = image_w / 2;
        let cy = image_h / 2;

        let (sin, cos) = (angle_deg.to_radians().sin(), angle_deg.to_radians().cos());
        let sx = sx.max(1) as i32;
        let sy = sy.max(1) as i32;

        let mut ty = -diagonal;
        while ty <= diagonal {
            let mut tx = -diagonal;
            while tx <= diagonal {
                let rx = tx as f32 * cos - ty as f32 * sin;
                let ry = tx as f32 * sin + ty as f32 * cos;
                let px = cx + rx.round() as i32;
                let py = cy + ry.round() as i32;
                self.draw_outlined_text(image, px, py, config);
                tx += sx;
            }
            ty += sy;
        }
    }

    fn apply_image_watermark(&mut self, target: &mut Image, overlay: &Image, x: i32, y: i32, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        let (target_w, target_h) = (target.width() as i32, target.height() as i32);

        for oy in 0..overlay.height() as i32 {
            let ty = y + oy;
            if ty < 0 || ty >= target_h {
                continue;
            }
            for ox in 0..overlay.width() as i32 {
                let tx = x + ox;
                if tx < 0 || tx >= target_w {
                    continue;
                }
                let src_off = overlay.pixel_offset(ox as u32, oy as u32).unwrap();
                let src = overlay.data();
                let (sb, sg, sr, sa_raw) =
                    (src[src_off], src[src_off + 1], src[src_off + 2], src[src_off + 3]);
                let sa = (sa_raw as f32 * opacity / 255.0).clamp(0.0, 1.0);
                if sa <= 0.0 {
                    continue;
                }

                let dst_off = target.pixel_offset(tx as u32, ty as u32).unwrap();
                let dst = target.data_mut();
                let (db, dg, dr, da) = (dst[dst_off], dst[dst_off + 1], dst[dst_off + 2], dst[dst_off + 3]);

                let blend = |s: u8, d: u8| -> u8 {
                    (s as f32 * sa + d as f32 * (1.0 - sa)).round().clamp(0.0, 255.0) as u8
                };
                dst[dst_off] = blend(sb, db);
                dst[dst_off + 1] = blend(sg, dg);
                dst[dst_off + 2] = blend(sr, dr);
                dst[dst_off + 3] =
                    ((sa_raw as f32 * sa + da as f32 * (1.0 - sa)).round().clamp(0.0, 255.0)).min(255.0) as u8;
            }
        }
    }
}

/// Resolves the platform watermark renderer at build time; see
/// [`crate::capture::create_platform_capture_backend`] for the pattern.
pub fn create_platform_watermark_renderer() -> Box<dyn WatermarkRenderer> {
    Box::new(SoftwareWatermarkRenderer::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelFormat;

    #[test]
    fn custom_position_uses_x_y_verbatim() {
        let config = TextWatermarkConfig {
            text: "hi".into(),
            position: WatermarkPosition::Custom,
            x: 7,
            y: 9,
            ..Default::default()
        };
        assert_eq!(resolve_position(&config, 100, 100), (7, 9));
    }

    #[test]
    fn bottom_right_accounts_for_text_extent_and_margin() {
        let config = TextWatermarkConfig {
            text: "ab".into(),
            position: WatermarkPosition::BottomRight,
            ..Default::default()
        };
        let (x, y) = resolve_position(&config, 200, 100);
        assert!(x < 200 && y < 100);
    }

    #[test]
    fn rotate_around_is_identity_at_zero_degrees() {
        assert_eq!(rotate_around(3.0, 4.0, (0.0, 0.0), 0.0), (3.0, 4.0));
    }

    #[test]
    fn nonzero_rotation_moves_the_text_anchor() {
        let config = TextWatermarkConfig {
            text: "hi".into(),
            position: WatermarkPosition::Custom,
            x: 10,
            y: 10,
            rotation: 90.0,
            ..Default::default()
        };
        let mut plain = Image::create(64, 64, PixelFormat::Bgra8).unwrap();
        let mut rotated = Image::create(64, 64, PixelFormat::Bgra8).unwrap();
        let mut renderer = SoftwareWatermarkRenderer::new();
        renderer.apply_text_watermark(&mut plain, &TextWatermarkConfig { rotation: 0.0, ..config.clone() });
        renderer.apply_text_watermark(&mut rotated, &config);
        assert_ne!(plain.data(), rotated.data());
    }

    #[test]
    fn image_watermark_clips_to_target_bounds() {
        let mut target = Image::create(10, 10, PixelFormat::Bgra8).unwrap();
        let mut overlay = Image::create(4, 4, PixelFormat::Bgra8).unwrap();
        for px in overlay.data_mut().chunks_mut(4) {
            px[0] = 255;
            px[3] = 255;
        }
        let mut renderer = SoftwareWatermarkRenderer::new();
        renderer.apply_image_watermark(&mut target, &overlay, 8, 8, 1.0);
        let offset = target.pixel_offset(9, 9).unwrap();
        assert_eq!(target.data()[offset], 255);
    }

    #[test]
    fn image_watermark_scales_by_opacity() {
        let mut target = Image::create(4, 4, PixelFormat::Bgra8).unwrap();
        let mut overlay = Image::create(4, 4, PixelFormat::Bgra8).unwrap();
        for px in overlay.data_mut().chunks_mut(4) {
            px[0] = 200;
            px[3] = 255;
        }
        let mut renderer = SoftwareWatermarkRenderer::new();
        renderer.apply_image_watermark(&mut target, &overlay, 0, 0, 0.5);
        let offset = target.pixel_offset(0, 0).unwrap();
        assert_eq!(target.data()[offset], 100);
    }
}
