//! Annotation-session lifecycle and shape/undo/redo operations (§4.4, §6).

use std::os::raw::{c_char, c_int};
use std::ptr;

use super::{cstr_opt, PixelGrabAnnotation, PixelGrabContext, PixelGrabImage, PixelGrabShapeStyle};
use crate::annotation::{Point, ShapeKind, ShapeStyle};
use crate::error::Error;

const MAX_PENCIL_POINTS: usize = 100_000;

/// Reads a style through the header's `const PixelGrabShapeStyle*`
/// convention, falling back to the renderer's default for a null pointer.
///
/// # Safety
/// `style` must be null or point at a valid `PixelGrabShapeStyle`.
unsafe fn style_from_raw(style: *const PixelGrabShapeStyle) -> ShapeStyle {
    match style.as_ref() {
        Some(style) => ShapeStyle {
            stroke_color: style.stroke_color,
            fill_color: style.fill_color,
            stroke_width: style.stroke_width,
            filled: style.filled != 0,
        },
        None => ShapeStyle::default(),
    }
}

/// Deep-copies `image` into a new, idle annotation session.
///
/// # Safety
/// `ctx` must be a live context handle; `image` must be a live image
/// handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_create(
    ctx: *const PixelGrabContext,
    image: *const PixelGrabImage,
) -> *mut PixelGrabAnnotation {
    let Some(ctx) = ctx.as_ref() else { return ptr::null_mut() };
    let Some(image) = image.as_ref() else { return ptr::null_mut() };
    let session = ctx.0.create_annotation_session(image.0.clone());
    Box::into_raw(Box::new(PixelGrabAnnotation { ctx: ctx.0.clone(), session }))
}

/// # Safety
/// `ann` must be null or a pointer returned by
/// [`pixelgrab_annotation_create`], not yet destroyed.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_destroy(ann: *mut PixelGrabAnnotation) {
    if !ann.is_null() {
        drop(Box::from_raw(ann));
    }
}

fn add_shape(ann: &mut PixelGrabAnnotation, kind: ShapeKind) -> c_int {
    let id = ann.session.add_shape(kind);
    ann.ctx.set_ok();
    id
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_rect(
    ann: *mut PixelGrabAnnotation,
    x: c_int,
    y: c_int,
    w: c_int,
    h: c_int,
    style: *const PixelGrabShapeStyle,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    if w <= 0 || h <= 0 {
        ann.ctx.fail(Error::InvalidParam);
        return -1;
    }
    add_shape(ann, ShapeKind::Rect { x, y, w, h, style: style_from_raw(style) })
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_ellipse(
    ann: *mut PixelGrabAnnotation,
    cx: c_int,
    cy: c_int,
    rx: c_int,
    ry: c_int,
    style: *const PixelGrabShapeStyle,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    if rx <= 0 || ry <= 0 {
        ann.ctx.fail(Error::InvalidParam);
        return -1;
    }
    add_shape(ann, ShapeKind::Ellipse { cx, cy, rx, ry, style: style_from_raw(style) })
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_line(
    ann: *mut PixelGrabAnnotation,
    x1: c_int,
    y1: c_int,
    x2: c_int,
    y2: c_int,
    style: *const PixelGrabShapeStyle,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    add_shape(ann, ShapeKind::Line { x1, y1, x2, y2, style: style_from_raw(style) })
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_arrow(
    ann: *mut PixelGrabAnnotation,
    x1: c_int,
    y1: c_int,
    x2: c_int,
    y2: c_int,
    head_size: f32,
    style: *const PixelGrabShapeStyle,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    add_shape(ann, ShapeKind::Arrow { x1, y1, x2, y2, head_size, style: style_from_raw(style) })
}

/// Adds a freehand stroke through `point_count` points packed as
/// interleaved `[x0, y0, x1, y1, ...]` ints in `points` (so `points` must
/// be readable for `2 * point_count` elements). Fails (`-1`) when
/// `point_count` is outside `2..=100_000` (§8 boundary behavior).
///
/// # Safety
/// `ann` must be a live annotation handle; `points` must point at at
/// least `2 * point_count` readable `c_int`s.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_pencil(
    ann: *mut PixelGrabAnnotation,
    points: *const c_int,
    point_count: c_int,
    style: *const PixelGrabShapeStyle,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    if points.is_null() || point_count < 2 || point_count > MAX_PENCIL_POINTS as c_int {
        ann.ctx.fail(Error::InvalidParam);
        return -1;
    }
    let raw = std::slice::from_raw_parts(points, point_count as usize * 2);
    let converted: Vec<Point> = raw.chunks_exact(2).map(|p| Point { x: p[0], y: p[1] }).collect();
    add_shape(ann, ShapeKind::Pencil { points: converted, style: style_from_raw(style) })
}

/// # Safety
/// `ann` must be a live annotation handle; `text` must be a valid C
/// string; `font_name` may be null (renderer default).
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_text(
    ann: *mut PixelGrabAnnotation,
    x: c_int,
    y: c_int,
    text: *const c_char,
    font_name: *const c_char,
    font_size: c_int,
    argb: u32,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    let Some(text) = cstr_opt(text) else {
        ann.ctx.fail(Error::InvalidParam);
        return -1;
    };
    let font_name = cstr_opt(font_name).unwrap_or_default();
    add_shape(
        ann,
        ShapeKind::Text { x, y, text, font_name, font_size, color: argb },
    )
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_mosaic(
    ann: *mut PixelGrabAnnotation,
    x: c_int,
    y: c_int,
    w: c_int,
    h: c_int,
    block_size: c_int,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    if w <= 0 || h <= 0 || block_size <= 0 {
        ann.ctx.fail(Error::InvalidParam);
        return -1;
    }
    add_shape(ann, ShapeKind::Mosaic { x, y, w, h, block_size })
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_add_blur(
    ann: *mut PixelGrabAnnotation,
    x: c_int,
    y: c_int,
    w: c_int,
    h: c_int,
    radius: c_int,
) -> c_int {
    let Some(ann) = ann.as_mut() else { return -1 };
    if w <= 0 || h <= 0 || radius <= 0 {
        ann.ctx.fail(Error::InvalidParam);
        return -1;
    }
    add_shape(ann, ShapeKind::Blur { x, y, w, h, radius })
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_remove_shape(ann: *mut PixelGrabAnnotation, id: c_int) -> Error {
    let Some(ann) = ann.as_mut() else { return Error::NotInitialized };
    match ann.session.remove_shape(id) {
        Ok(()) => {
            ann.ctx.set_ok();
            Error::Ok
        }
        Err(err) => ann.ctx.fail(err),
    }
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_undo(ann: *mut PixelGrabAnnotation) -> Error {
    let Some(ann) = ann.as_mut() else { return Error::NotInitialized };
    if ann.session.undo() {
        ann.ctx.set_ok();
        Error::Ok
    } else {
        ann.ctx.fail(Error::AnnotationFailed)
    }
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_redo(ann: *mut PixelGrabAnnotation) -> Error {
    let Some(ann) = ann.as_mut() else { return Error::NotInitialized };
    if ann.session.redo() {
        ann.ctx.set_ok();
        Error::Ok
    } else {
        ann.ctx.fail(Error::AnnotationFailed)
    }
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_can_undo(ann: *const PixelGrabAnnotation) -> c_int {
    ann.as_ref().map(|a| a.session.can_undo() as c_int).unwrap_or(0)
}

/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_can_redo(ann: *const PixelGrabAnnotation) -> c_int {
    ann.as_ref().map(|a| a.session.can_redo() as c_int).unwrap_or(0)
}

/// Returns a borrow of the current composite, valid until the next
/// mutating call on `ann` or `ann`'s destruction. Must not be freed.
///
/// # Safety
/// `ann` must be a live, exclusively-held annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_get_result(ann: *mut PixelGrabAnnotation) -> *const PixelGrabImage {
    match ann.as_mut() {
        Some(ann) => (ann.session.get_result() as *const crate::image::Image) as *const PixelGrabImage,
        None => ptr::null(),
    }
}

/// Returns an owned deep copy of the current composite; must be freed
/// with `pixelgrab_image_destroy`.
///
/// # Safety
/// `ann` must be a live annotation handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_annotation_export(ann: *mut PixelGrabAnnotation) -> *mut PixelGrabImage {
    match ann.as_mut() {
        Some(ann) => Box::into_raw(Box::new(PixelGrabImage(ann.session.export()))),
        None => ptr::null_mut(),
    }
}
