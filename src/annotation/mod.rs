//! Annotation session: shapes, undo/redo, incremental redraw (§4.4).
//!
//! Ported line-for-line from `original_source/src/annotation/
//! annotation_session.cpp`: `Undo`/`Redo` always invalidate the snapshot
//! and force a full redraw, while a plain `AddShape` append keeps the
//! snapshot valid and stays on the incremental path.

pub mod renderer;

pub use renderer::{AnnotationRenderer, Point, ShapeStyle};

use crate::error::{Error, Result};
use crate::image::Image;

/// The geometry/content carried by one shape; mirrors `shape.h`'s class
/// hierarchy as a closed sum type (Rust has no virtual dispatch to spare).
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rect { x: i32, y: i32, w: i32, h: i32, style: ShapeStyle },
    Ellipse { cx: i32, cy: i32, rx: i32, ry: i32, style: ShapeStyle },
    Line { x1: i32, y1: i32, x2: i32, y2: i32, style: ShapeStyle },
    Arrow { x1: i32, y1: i32, x2: i32, y2: i32, head_size: f32, style: ShapeStyle },
    Pencil { points: Vec<Point>, style: ShapeStyle },
    Text { x: i32, y: i32, text: String, font_name: String, font_size: i32, color: u32 },
    /// Block-average pixelation over a region; applied directly to pixels.
    Mosaic { x: i32, y: i32, w: i32, h: i32, block_size: i32 },
    /// Three-pass separable box blur over a region.
    Blur { x: i32, y: i32, w: i32, h: i32, radius: i32 },
}

impl ShapeKind {
    fn is_pixel_effect(&self) -> bool {
        matches!(self, ShapeKind::Mosaic { .. } | ShapeKind::Blur { .. })
    }

    fn render(&self, renderer: &mut dyn AnnotationRenderer, image: &mut Image) {
        match self {
            ShapeKind::Rect { x, y, w, h, style } => renderer.draw_rect(image, *x, *y, *w, *h, *style),
            ShapeKind::Ellipse { cx, cy, rx, ry, style } => {
                renderer.draw_ellipse(image, *cx, *cy, *rx, *ry, *style)
            }
            ShapeKind::Line { x1, y1, x2, y2, style } => {
                renderer.draw_line(image, *x1, *y1, *x2, *y2, *style)
            }
            ShapeKind::Arrow { x1, y1, x2, y2, head_size, style } => {
                renderer.draw_arrow(image, *x1, *y1, *x2, *y2, *head_size, *style)
            }
            ShapeKind::Pencil { points, style } => {
                if !points.is_empty() {
                    renderer.draw_polyline(image, points, *style);
                }
            }
            ShapeKind::Text { x, y, text, font_name, font_size, color } => {
                renderer.draw_text(image, *x, *y, text, font_name, *font_size, *color)
            }
            ShapeKind::Mosaic { .. } | ShapeKind::Blur { .. } => {
                // Handled specially in `redraw` — operates on pixels, not
                // through the renderer.
            }
        }
    }
}

/// A shape plus the id assigned to it by the owning session.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: i32,
    pub kind: ShapeKind,
}

#[derive(Debug, Clone)]
enum AnnotationCommand {
    Add { id: i32 },
    Remove { id: i32, shape: Shape },
}

/// Owns the base image, the active shape list, and the undo/redo logs;
/// renders into a composite image cached incrementally across appends.
pub struct AnnotationSession {
    base_image: Image,
    output_image: Image,
    shapes: Vec<Shape>,
    undo_stack: Vec<AnnotationCommand>,
    redo_stack: Vec<AnnotationCommand>,
    next_id: i32,
    dirty: bool,
    full_redraw: bool,
    snapshot_image: Option<Image>,
    snapshot_count: usize,
    renderer: Box<dyn AnnotationRenderer>,
}

impl AnnotationSession {
    /// Deep-copies `base_image` into the session's composite and starts
    /// with empty shape/undo/redo state.
    pub fn new(base_image: Image, renderer: Box<dyn AnnotationRenderer>) -> Self {
        let output_image = base_image.clone();
        Self {
            base_image,
            output_image,
            shapes: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            next_id: 1,
            dirty: false,
            full_redraw: false,
            snapshot_image: None,
            snapshot_count: 0,
            renderer,
        }
    }

    /// Assigns a new positive id, appends the shape, and marks the
    /// session dirty. The snapshot (if any) stays valid since appending
    /// never touches earlier shapes.
    pub fn add_shape(&mut self, kind: ShapeKind) -> i32 {
        let id = self.next_id;
        self.next_id += 1;

        self.undo_stack.push(AnnotationCommand::Add { id });
        self.redo_stack.clear();

        self.shapes.push(Shape { id, kind });
        self.dirty = true;
        id
    }

    /// Removes the shape with `id`. Invalidates the snapshot if the
    /// removed shape was within its prefix.
    pub fn remove_shape(&mut self, id: i32) -> Result<()> {
        let index = self
            .shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or(Error::InvalidParam)?;

        let shape = self.shapes[index].clone();
        self.undo_stack.push(AnnotationCommand::Remove { id, shape });
        self.redo_stack.clear();

        if index < self.snapshot_count {
            self.snapshot_image = None;
            self.snapshot_count = 0;
        }

        self.shapes.remove(index);
        self.dirty = true;
        self.full_redraw = true;
        Ok(())
    }

    /// Pops the undo log and inverts it. Always forces a full redraw and
    /// drops any cached snapshot, mirroring the original implementation.
    pub fn undo(&mut self) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        match cmd {
            AnnotationCommand::Add { id } => {
                if let Some(index) = self.shapes.iter().position(|s| s.id == id) {
                    let shape = self.shapes.remove(index);
                    self.redo_stack.push(AnnotationCommand::Remove { id, shape });
                }
            }
            AnnotationCommand::Remove { id, shape } => {
                self.redo_stack.push(AnnotationCommand::Add { id });
                self.shapes.push(shape);
            }
        }
        self.force_full_redraw();
        true
    }

    /// Mirror of `undo` against the redo log.
    pub fn redo(&mut self) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        match cmd {
            AnnotationCommand::Remove { id, shape } => {
                self.undo_stack.push(AnnotationCommand::Add { id });
                self.shapes.push(shape);
            }
            AnnotationCommand::Add { id } => {
                if let Some(index) = self.shapes.iter().position(|s| s.id == id) {
                    let shape = self.shapes.remove(index);
                    self.undo_stack.push(AnnotationCommand::Remove { id, shape });
                }
            }
        }
        self.force_full_redraw();
        true
    }

    fn force_full_redraw(&mut self) {
        self.dirty = true;
        self.full_redraw = true;
        self.snapshot_image = None;
        self.snapshot_count = 0;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// A borrow of the current composite, valid until the next mutating
    /// call on this session.
    pub fn get_result(&mut self) -> &Image {
        if self.dirty {
            self.redraw();
        }
        &self.output_image
    }

    /// A deep copy of the current composite.
    pub fn export(&mut self) -> Image {
        if self.dirty {
            self.redraw();
        }
        self.output_image.clone()
    }

    fn redraw(&mut self) {
        let total = self.shapes.len();

        let can_incremental =
            !self.full_redraw && self.snapshot_image.is_some() && self.snapshot_count <= total;
        let start_from = if can_incremental {
            self.output_image = self.snapshot_image.as_ref().unwrap().clone();
            self.snapshot_count
        } else {
            self.output_image = self.base_image.clone();
            0
        };

        let mut gfx_active = false;
        for shape in &self.shapes[start_from..total] {
            if shape.kind.is_pixel_effect() {
                if gfx_active {
                    self.renderer.end_render();
                    gfx_active = false;
                }
                match &shape.kind {
                    ShapeKind::Mosaic { x, y, w, h, block_size } => {
                        apply_mosaic(&mut self.output_image, *x, *y, *w, *h, *block_size)
                    }
                    ShapeKind::Blur { x, y, w, h, radius } => {
                        apply_blur(&mut self.output_image, *x, *y, *w, *h, *radius)
                    }
                    _ => unreachable!(),
                }
            } else {
                if !gfx_active {
                    gfx_active = self.renderer.begin_render(&mut self.output_image);
                }
                if gfx_active {
                    shape.kind.render(self.renderer.as_mut(), &mut self.output_image);
                }
            }
        }

        if gfx_active {
            self.renderer.end_render();
        }

        self.snapshot_image = Some(self.output_image.clone());
        self.snapshot_count = total;
        self.dirty = false;
        self.full_redraw = false;
    }
}

/// Partitions the clipped region into `block_size x block_size` tiles and
/// replaces each with the unweighted average of its channels (including
/// alpha). Border tiles are truncated, not padded.
pub fn apply_mosaic(image: &mut Image, x: i32, y: i32, w: i32, h: i32, block_size: i32) {
    if block_size <= 1 {
        return;
    }
    let (img_w, img_h, stride) = (image.width() as i32, image.height() as i32, image.stride() as usize);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = img_w.min(x + w);
    let y1 = img_h.min(y + h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let data = image.data_mut();
    let mut by = y0;
    while by < y1 {
        let by1 = (by + block_size).min(y1);
        let mut bx = x0;
        while bx < x1 {
            let bx1 = (bx + block_size).min(x1);

            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for py in by..by1 {
                for px in bx..bx1 {
                    let off = py as usize * stride + px as usize * 4;
                    sum[0] += data[off] as u32;
                    sum[1] += data[off + 1] as u32;
                    sum[2] += data[off + 2] as u32;
                    sum[3] += data[off + 3] as u32;
                    count += 1;
                }
            }
            if count > 0 {
                let avg = [
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                    (sum[3] / count) as u8,
                ];
                for py in by..by1 {
                    for px in bx..bx1 {
                        let off = py as usize * stride + px as usize * 4;
                        data[off..off + 4].copy_from_slice(&avg);
                    }
                }
            }
            bx = bx1;
        }
        by = by1;
    }
}

/// Three passes of separable box blur (horizontal then vertical), edges
/// clamped. Approximates a Gaussian of sigma ~= radius * sqrt(3/pi).
pub fn apply_blur(image: &mut Image, x: i32, y: i32, w: i32, h: i32, radius: i32) {
    if radius <= 0 {
        return;
    }
    let (img_w, img_h, stride) = (image.width() as i32, image.height() as i32, image.stride() as usize);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = img_w.min(x + w);
    let y1 = img_h.min(y + h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let max_dim = (x1 - x0).max(y1 - y0) as usize;
    let mut tmp = vec![0u8; max_dim * 4];
    let data = image.data_mut();
    for _ in 0..3 {
        box_blur_h(data, stride, x0, y0, x1, y1, radius, &mut tmp);
        box_blur_v(data, stride, x0, y0, x1, y1, radius, &mut tmp);
    }
}

fn box_blur_h(data: &mut [u8], stride: usize, x0: i32, y0: i32, x1: i32, y1: i32, radius: i32, tmp: &mut Vec<u8>) {
    let row_len = (x1 - x0) as usize;
    tmp.resize(row_len * 4, 0);
    let diam = (radius * 2 + 1) as i64;

    for py in y0..y1 {
        let mut sum = [0i64; 4];
        let mut count = 0i64;
        for kx in (x0 - radius)..=(x0 + radius) {
            let cx = kx.clamp(x0, x1 - 1);
            let off = py as usize * stride + cx as usize * 4;
            for c in 0..4 {
                sum[c] += data[off + c] as i64;
            }
            count += 1;
        }
        for c in 0..4 {
            tmp[c] = (sum[c] / count) as u8;
        }

        for px in (x0 + 1)..x1 {
            let add_x = (px + radius).clamp(x0, x1 - 1);
            let add_off = py as usize * stride + add_x as usize * 4;
            let rem_x = (px - radius - 1).clamp(x0, x1 - 1);
            let rem_off = py as usize * stride + rem_x as usize * 4;
            for c in 0..4 {
                sum[c] += data[add_off + c] as i64;
                sum[c] -= data[rem_off + c] as i64;
            }
            let idx = (px - x0) as usize * 4;
            for c in 0..4 {
                tmp[idx + c] = (sum[c] / diam) as u8;
            }
        }

        let row_start = py as usize * stride + x0 as usize * 4;
        data[row_start..row_start + row_len * 4].copy_from_slice(&tmp[..row_len * 4]);
    }
}

fn box_blur_v(data: &mut [u8], stride: usize, x0: i32, y0: i32, x1: i32, y1: i32, radius: i32, tmp: &mut Vec<u8>) {
    let col_len = (y1 - y0) as usize;
    tmp.resize(col_len * 4, 0);
    let diam = (radius * 2 + 1) as i64;

    for px in x0..x1 {
        let mut sum = [0i64; 4];
        let mut count = 0i64;
        for ky in (y0 - radius)..=(y0 + radius) {
            let cy = ky.clamp(y0, y1 - 1);
            let off = cy as usize * stride + px as usize * 4;
            for c in 0..4 {
                sum[c] += data[off + c] as i64;
            }
            count += 1;
        }
        for c in 0..4 {
            tmp[c] = (sum[c] / count) as u8;
        }

        for py in (y0 + 1)..y1 {
            let add_y = (py + radius).clamp(y0, y1 - 1);
            let add_off = add_y as usize * stride + px as usize * 4;
            let rem_y = (py - radius - 1).clamp(y0, y1 - 1);
            let rem_off = rem_y as usize * stride + px as usize * 4;
            for c in 0..4 {
                sum[c] += data[add_off + c] as i64;
                sum[c] -= data[rem_off + c] as i64;
            }
            let idx = (py - y0) as usize * 4;
            for c in 0..4 {
                tmp[idx + c] = (sum[c] / diam) as u8;
            }
        }

        for py in y0..y1 {
            let dst_off = py as usize * stride + px as usize * 4;
            let idx = (py - y0) as usize * 4;
            data[dst_off..dst_off + 4].copy_from_slice(&tmp[idx..idx + 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelFormat;

    fn blank(width: u32, height: u32) -> Image {
        Image::create(width, height, PixelFormat::Bgra8).unwrap()
    }

    #[test]
    fn add_shape_assigns_monotonic_ids_and_keeps_snapshot_valid() {
        let mut session = AnnotationSession::new(blank(40, 40), Box::new(renderer::SoftwareRenderer::new()));
        let id1 = session.add_shape(ShapeKind::Rect { x: 0, y: 0, w: 5, h: 5, style: ShapeStyle::default() });
        session.get_result();
        let id2 = session.add_shape(ShapeKind::Rect { x: 10, y: 10, w: 5, h: 5, style: ShapeStyle::default() });
        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
        assert_eq!(session.snapshot_count, 1);
        session.get_result();
        assert_eq!(session.snapshot_count, 2);
    }

    #[test]
    fn remove_shape_rejects_unknown_id() {
        let mut session = AnnotationSession::new(blank(10, 10), Box::new(renderer::SoftwareRenderer::new()));
        assert!(matches!(session.remove_shape(99), Err(Error::InvalidParam)));
    }

    #[test]
    fn undo_redo_round_trip_restores_shape_list() {
        let mut session = AnnotationSession::new(blank(10, 10), Box::new(renderer::SoftwareRenderer::new()));
        let id = session.add_shape(ShapeKind::Rect { x: 0, y: 0, w: 2, h: 2, style: ShapeStyle::default() });
        assert!(session.can_undo());
        assert!(session.undo());
        assert!(session.shapes.is_empty());
        assert!(session.can_redo());
        assert!(session.redo());
        assert_eq!(session.shapes.len(), 1);
        assert_eq!(session.shapes[0].id, id);
    }

    #[test]
    fn undo_always_forces_full_redraw_state() {
        let mut session = AnnotationSession::new(blank(10, 10), Box::new(renderer::SoftwareRenderer::new()));
        session.add_shape(ShapeKind::Rect { x: 0, y: 0, w: 2, h: 2, style: ShapeStyle::default() });
        session.get_result();
        assert!(session.snapshot_image.is_some());
        session.undo();
        assert!(session.snapshot_image.is_none());
        assert!(session.full_redraw);
    }

    #[test]
    fn apply_mosaic_averages_block_including_alpha() {
        let mut image = blank(4, 4);
        {
            let data = image.data_mut();
            data[0] = 0;
            data[4] = 100;
            data[8] = 50;
            data[12] = 150;
            for i in 0..16 {
                data[i * 4 + 3] = 200;
            }
        }
        apply_mosaic(&mut image, 0, 0, 4, 4, 2);
        let offset = image.pixel_offset(0, 0).unwrap();
        assert_eq!(image.data()[offset], 75); // (0+100+50+150)/4
        assert_eq!(image.data()[offset + 3], 200);
    }

    #[test]
    fn apply_blur_is_noop_for_zero_radius() {
        let mut image = blank(8, 8);
        image.data_mut()[0] = 10;
        apply_blur(&mut image, 0, 0, 8, 8, 0);
        assert_eq!(image.data()[0], 10);
    }
}
