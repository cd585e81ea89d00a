//! Annotation rendering adapter (§4.3) and a software reference backend.
//!
//! Shaped like `CaptureBackend`/the teacher's `RenderBackend`: a small
//! stateful trait the session drives through `begin_render`/`end_render`
//! brackets, primitives in between.

use crate::image::Image;

/// Stroke/fill styling shared by every vector shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// ARGB, high byte is alpha.
    pub stroke_color: u32,
    /// ARGB; 0 means "no fill".
    pub fill_color: u32,
    pub stroke_width: f32,
    pub filled: bool,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: 0xFF000000,
            fill_color: 0,
            stroke_width: 2.0,
            filled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

pub trait AnnotationRenderer: Send + Sync {
    /// Acquire a drawing context backed by `image`'s pixel buffer. Every
    /// primitive below takes the same `image` borrow explicitly, so the
    /// renderer never has to hold onto one across calls.
    fn begin_render(&mut self, image: &mut Image) -> bool;

    /// Flush pending operations and release resources acquired by
    /// `begin_render`.
    fn end_render(&mut self);

    fn draw_rect(&mut self, image: &mut Image, x: i32, y: i32, w: i32, h: i32, style: ShapeStyle);
    fn draw_ellipse(&mut self, image: &mut Image, cx: i32, cy: i32, rx: i32, ry: i32, style: ShapeStyle);
    fn draw_line(&mut self, image: &mut Image, x1: i32, y1: i32, x2: i32, y2: i32, style: ShapeStyle);
    /// Shaft plus a filled triangular head sized by `head_size`.
    fn draw_arrow(&mut self, image: &mut Image, x1: i32, y1: i32, x2: i32, y2: i32, head_size: f32, style: ShapeStyle);
    /// Round joins and caps.
    fn draw_polyline(&mut self, image: &mut Image, points: &[Point], style: ShapeStyle);
    fn draw_text(&mut self, image: &mut Image, x: i32, y: i32, text: &str, font_name: &str, font_size: i32, color: u32);
}

/// ARGB u32 split into straight-alpha channels, `(r, g, b, a)`.
fn argb_channels(argb: u32) -> (u8, u8, u8, u8) {
    let a = (argb >> 24) as u8;
    let r = (argb >> 16) as u8;
    let g = (argb >> 8) as u8;
    let b = argb as u8;
    (r, g, b, a)
}

/// A software reference `AnnotationRenderer` drawing straight into the
/// target `Image`'s byte buffer with source-over compositing.
///
/// Carries no reference to the image between calls — every primitive
/// takes its `&mut Image` argument directly, so `begin_render`/`end_render`
/// only track whether a drawing bracket is open.
pub struct SoftwareRenderer {
    active: bool,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self { active: false }
    }

    fn blend_pixel(image: &mut Image, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if x < 0 || y < 0 || a == 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let Some(offset) = image.pixel_offset(x, y) else {
            return;
        };
        let data = image.data_mut();
        let (dst_b, dst_g, dst_r, dst_a) =
            (data[offset], data[offset + 1], data[offset + 2], data[offset + 3]);
        let sa = a as f32 / 255.0;
        let blend = |src: u8, dst: u8| -> u8 {
            (src as f32 * sa + dst as f32 * (1.0 - sa)).round().clamp(0.0, 255.0) as u8
        };
        data[offset] = blend(b, dst_b);
        data[offset + 1] = blend(g, dst_g);
        data[offset + 2] = blend(r, dst_r);
        data[offset + 3] = ((a as u32 + (dst_a as u32 * (255 - a as u32)) / 255).min(255)) as u8;
    }

    fn stroke_line(image: &mut Image, x1: i32, y1: i32, x2: i32, y2: i32, width: f32, color: u32) {
        let (r, g, b, a) = argb_channels(color);
        let half = (width.max(1.0) / 2.0).ceil() as i32;
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);
        loop {
            for oy in -half..=half {
                for ox in -half..=half {
                    Self::blend_pixel(image, x + ox, y + oy, r, g, b, a);
                }
            }
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationRenderer for SoftwareRenderer {
    fn begin_render(&mut self, _image: &mut Image) -> bool {
        self.active = true;
        true
    }

    fn end_render(&mut self) {
        self.active = false;
    }

    fn draw_rect(&mut self, image: &mut Image, x: i32, y: i32, w: i32, h: i32, style: ShapeStyle) {
        debug_assert!(self.active, "draw_rect called outside a begin_render/end_render bracket");
        if style.filled && style.fill_color != 0 {
            let (r, g, b, a) = argb_channels(style.fill_color);
            for py in y..y + h {
                for px in x..x + w {
                    Self::blend_pixel(image, px, py, r, g, b, a);
                }
            }
        }
        Self::stroke_line(image, x, y, x + w, y, style.stroke_width, style.stroke_color);
        Self::stroke_line(image, x + w, y, x + w, y + h, style.stroke_width, style.stroke_color);
        Self::stroke_line(image, x + w, y + h, x, y + h, style.stroke_width, style.stroke_color);
        Self::stroke_line(image, x, y + h, x, y, style.stroke_width, style.stroke_color);
    }

    fn draw_ellipse(&mut self, image: &mut Image, cx: i32, cy: i32, rx: i32, ry: i32, style: ShapeStyle) {
        let (rx, ry) = (rx.max(1) as f32, ry.max(1) as f32);
        let steps = ((rx.max(ry)) * 8.0).max(32.0) as i32;
        let mut prev = None;
        for i in 0..=steps {
            let theta = std::f32::consts::TAU * (i as f32 / steps as f32);
            let x = cx + (theta.cos() * rx).round() as i32;
            let y = cy + (theta.sin() * ry).round() as i32;
            if let Some((px, py)) = prev {
                Self::stroke_line(image, px, py, x, y, style.stroke_width, style.stroke_color);
            }
            prev = Some((x, y));
        }
        if style.filled && style.fill_color != 0 {
            let (r, g, b, a) = argb_channels(style.fill_color);
            let (x0, x1) = (cx - rx as i32, cx + rx as i32);
            let (y0, y1) = (cy - ry as i32, cy + ry as i32);
            for py in y0..=y1 {
                for px in x0..=x1 {
                    let nx = (px - cx) as f32 / rx;
                    let ny = (py - cy) as f32 / ry;
                    if nx * nx + ny * ny <= 1.0 {
                        Self::blend_pixel(image, px, py, r, g, b, a);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, image: &mut Image, x1: i32, y1: i32, x2: i32, y2: i32, style: ShapeStyle) {
        Self::stroke_line(image, x1, y1, x2, y2, style.stroke_width, style.stroke_color);
    }

    fn draw_arrow(&mut self, image: &mut Image, x1: i32, y1: i32, x2: i32, y2: i32, head_size: f32, style: ShapeStyle) {
        Self::stroke_line(image, x1, y1, x2, y2, style.stroke_width, style.stroke_color);

        let dx = (x2 - x1) as f32;
        let dy = (y2 - y1) as f32;
        let len = (dx * dx + dy * dy).sqrt().max(1.0);
        let (ux, uy) = (dx / len, dy / len);
        let (nx, ny) = (-uy, ux);
        let head = head_size.max(4.0);

        let base_x = x2 as f32 - ux * head;
        let base_y = y2 as f32 - uy * head;
        let left = (base_x + nx * head * 0.5, base_y + ny * head * 0.5);
        let right = (base_x - nx * head * 0.5, base_y - ny * head * 0.5);

        let (r, g, b, a) = argb_channels(style.stroke_color);
        // Fill the head triangle by scanning its bounding box.
        let min_x = x2.min(left.0 as i32).min(right.0 as i32);
        let max_x = x2.max(left.0 as i32).max(right.0 as i32);
        let min_y = y2.min(left.1 as i32).min(right.1 as i32);
        let max_y = y2.max(left.1 as i32).max(right.1 as i32);
        let tip = (x2 as f32, y2 as f32);
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                if point_in_triangle((px as f32, py as f32), tip, left, right) {
                    Self::blend_pixel(image, px, py, r, g, b, a);
                }
            }
        }
    }

    fn draw_polyline(&mut self, image: &mut Image, points: &[Point], style: ShapeStyle) {
        for pair in points.windows(2) {
            Self::stroke_line(
                image,
                pair[0].x,
                pair[0].y,
                pair[1].x,
                pair[1].y,
                style.stroke_width,
                style.stroke_color,
            );
        }
    }

    fn draw_text(&mut self, image: &mut Image, x: i32, y: i32, text: &str, _font_name: &str, font_size: i32, color: u32) {
        let (r, g, b, a) = argb_channels(color);
        let size = font_size.max(1);
        // No real font rasterizer is available; approximate each glyph
        // as a filled box so layout/positioning is still observable and
        // testable.
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let gx = x + i as i32 * (size + size / 4);
            for py in y..y + size {
                for px in gx..gx + size {
                    Self::blend_pixel(image, px, py, r, g, b, a);
                }
            }
        }
    }
}

fn point_in_triangle(p: (f32, f32), a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> bool {
    fn sign(p1: (f32, f32), p2: (f32, f32), p3: (f32, f32)) -> f32 {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    }
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelFormat;

    #[test]
    fn draw_rect_stroke_is_visible_on_blank_image() {
        let mut image = Image::create(20, 20, PixelFormat::Bgra8).unwrap();
        let mut renderer = SoftwareRenderer::new();
        assert!(renderer.begin_render(&mut image));
        renderer.draw_rect(&mut image, 2, 2, 10, 10, ShapeStyle {
            stroke_color: 0xFFFF0000,
            ..Default::default()
        });
        renderer.end_render();
        let offset = image.pixel_offset(2, 2).unwrap();
        assert_eq!(image.data()[offset + 2], 255); // R channel painted
    }

    #[test]
    fn begin_render_always_succeeds_with_a_valid_image() {
        let mut image = Image::create(4, 4, PixelFormat::Bgra8).unwrap();
        let mut renderer = SoftwareRenderer::new();
        assert!(renderer.begin_render(&mut image));
    }
}
