//! The C ABI surface (`include/pixelgrab.h`).
//!
//! Every opaque handle below wraps an owned Rust value behind a raw
//! pointer (`Box::into_raw`/`Box::from_raw`); every POD struct mirrors a
//! struct in the header field-for-field, including its C types (fixed
//! `c_char` arrays, plain `c_int` enums). `unsafe` is confined to this
//! module tree — the rest of the crate is ordinary safe Rust.

pub mod annotation;
pub mod color;
pub mod context;
pub mod image;
pub mod log;
pub mod pin;
pub mod recorder;

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

use crate::color::Color;
use crate::config::{AudioSource, GpuHint, Region, TextWatermarkConfig, WatermarkPosition};
use crate::context::Context;
use crate::error::Error;

pub use crate::clipboard::ClipboardFormat as PixelGrabClipboardFormat;
pub use crate::error::Error as PixelGrabError;
pub use crate::image::PixelFormat as PixelGrabPixelFormat;
pub use crate::log::LogLevel as PixelGrabLogLevel;

pub type PixelGrabWindowId = u64;

/// Opaque context handle; owns every subsystem for one session.
pub struct PixelGrabContext(pub(crate) std::sync::Arc<Context>);

/// Opaque image handle. `#[repr(transparent)]` so [`crate::annotation::
/// AnnotationSession::get_result`]'s borrowed `&Image` can be reinterpreted
/// as `&PixelGrabImage` without allocating a new handle, matching the
/// header's "`*_get_result` returns a borrow" contract (§6).
#[repr(transparent)]
pub struct PixelGrabImage(pub(crate) crate::image::Image);

/// Opaque annotation-session handle. Carries a back-pointer to the owning
/// context so annotation operations can report into its error slot (§9
/// "back-pointer, not ownership" design note), the same pattern
/// [`PixelGrabPinWindow`] uses.
pub struct PixelGrabAnnotation {
    pub(crate) ctx: std::sync::Arc<Context>,
    pub(crate) session: crate::annotation::AnnotationSession,
}

/// Opaque pin-window handle. Pin state lives in the owning context's
/// [`crate::pin::PinWindowManager`]; this handle is just `(context, id)`
/// so every per-pin function below can reach it without an extra `ctx`
/// parameter, matching the header's signatures.
pub struct PixelGrabPinWindow {
    pub(crate) ctx: std::sync::Arc<Context>,
    pub(crate) id: crate::pin::PinId,
}

/// Opaque recorder handle.
pub struct PixelGrabRecorder(pub(crate) crate::recorder::RecorderBackend);

#[repr(C)]
pub struct PixelGrabDpiInfo {
    pub screen_index: c_int,
    pub scale_x: f32,
    pub scale_y: f32,
    pub dpi_x: c_int,
    pub dpi_y: c_int,
}

#[repr(C)]
pub struct PixelGrabColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[repr(C)]
pub struct PixelGrabColorHsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// One point in a freehand (`Pencil`) stroke.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PixelGrabPoint {
    pub x: c_int,
    pub y: c_int,
}

#[repr(C)]
pub struct PixelGrabShapeStyle {
    pub stroke_color: u32,
    pub fill_color: u32,
    pub stroke_width: f32,
    pub filled: c_int,
}

#[repr(C)]
pub struct PixelGrabPinInfo {
    pub id: c_int,
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
    pub opacity: f32,
    pub is_visible: c_int,
    /// 0 = image, 1 = text.
    pub content_type: c_int,
}

#[repr(C)]
pub struct PixelGrabElementRect {
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
    pub name: [c_char; 256],
    pub role: [c_char; 64],
}

#[repr(C)]
pub struct PixelGrabHistoryEntry {
    pub id: c_int,
    pub region_x: c_int,
    pub region_y: c_int,
    pub region_width: c_int,
    pub region_height: c_int,
    pub timestamp: i64,
}

#[repr(C)]
pub struct PixelGrabScreenInfo {
    pub index: c_int,
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
    pub is_primary: c_int,
    pub name: [c_char; 128],
}

#[repr(C)]
pub struct PixelGrabWindowInfo {
    pub id: PixelGrabWindowId,
    pub x: c_int,
    pub y: c_int,
    pub width: c_int,
    pub height: c_int,
    pub is_visible: c_int,
    pub title: [c_char; 256],
    pub process_name: [c_char; 128],
}

#[repr(C)]
pub struct PixelGrabTextWatermarkConfig {
    pub text: *const c_char,
    pub font_name: *const c_char,
    pub font_size: c_int,
    pub color: u32,
    pub position: c_int,
    pub x: c_int,
    pub y: c_int,
    pub margin: c_int,
    pub rotation: f32,
}

#[repr(C)]
pub struct PixelGrabAudioDeviceInfo {
    pub id: [c_char; 256],
    pub name: [c_char; 256],
    pub is_default: c_int,
    pub is_input: c_int,
}

#[repr(C)]
pub struct PixelGrabRecordConfig {
    pub output_path: *const c_char,
    pub region_x: c_int,
    pub region_y: c_int,
    pub region_width: c_int,
    pub region_height: c_int,
    pub fps: c_int,
    pub bitrate: c_int,
    pub watermark: *const PixelGrabTextWatermarkConfig,
    pub user_watermark: *const PixelGrabTextWatermarkConfig,
    pub auto_capture: c_int,
    pub audio_source: c_int,
    pub audio_device_id: *const c_char,
    pub audio_sample_rate: c_int,
    pub gpu_hint: c_int,
}

// --- Marshaling helpers shared by every ffi/*.rs file ----------------------

/// Reads an optional C string; `None` for a null pointer or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point at a valid, NUL-terminated C string.
pub(crate) unsafe fn cstr_opt(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Like [`cstr_opt`] but fails with `InvalidParam` on a null/invalid pointer.
///
/// # Safety
/// Same as [`cstr_opt`].
pub(crate) unsafe fn cstr_required(ptr: *const c_char) -> Result<String, Error> {
    cstr_opt(ptr).ok_or(Error::InvalidParam)
}

/// Hands ownership of `s` to the caller as a NUL-terminated C string, to
/// be freed with [`log::pixelgrab_free_string`]. `s` must not contain an
/// interior NUL byte; falls back to a null pointer if it does.
pub(crate) fn string_into_raw(s: String) -> *mut c_char {
    CString::new(s).map(CString::into_raw).unwrap_or(std::ptr::null_mut())
}

/// Truncating byte-copy into a fixed-size, NUL-terminated `c_char` array.
pub(crate) fn write_fixed(dest: &mut [c_char], s: &str) {
    let bytes = s.as_bytes();
    let cap = dest.len().saturating_sub(1);
    let n = bytes.len().min(cap);
    for (slot, &b) in dest.iter_mut().zip(bytes.iter()).take(n) {
        *slot = b as c_char;
    }
    for slot in dest.iter_mut().skip(n) {
        *slot = 0;
    }
}

fn color_from_argb_u32(argb: u32) -> Color {
    Color::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8, (argb >> 24) as u8)
}

fn watermark_position_from_raw(value: c_int) -> WatermarkPosition {
    match value {
        0 => WatermarkPosition::TopLeft,
        1 => WatermarkPosition::TopRight,
        2 => WatermarkPosition::BottomLeft,
        4 => WatermarkPosition::Center,
        5 => WatermarkPosition::Custom,
        _ => WatermarkPosition::BottomRight,
    }
}

fn audio_source_from_raw(value: c_int) -> AudioSource {
    match value {
        1 => AudioSource::Microphone,
        2 => AudioSource::System,
        3 => AudioSource::Both,
        _ => AudioSource::None,
    }
}

/// # Safety
/// `raw`, if non-null, must point at a valid `PixelGrabTextWatermarkConfig`
/// whose `text`/`font_name` pointers are either null or valid C strings.
unsafe fn watermark_config_from_raw(raw: *const PixelGrabTextWatermarkConfig) -> Option<TextWatermarkConfig> {
    if raw.is_null() {
        return None;
    }
    let raw = &*raw;
    Some(TextWatermarkConfig {
        text: cstr_opt(raw.text).unwrap_or_default(),
        font_name: cstr_opt(raw.font_name),
        font_size: raw.font_size,
        color: color_from_argb_u32(raw.color),
        position: watermark_position_from_raw(raw.position),
        x: raw.x,
        y: raw.y,
        margin: raw.margin,
        rotation: raw.rotation,
    })
}

/// Eagerly copies every field of `raw` into an owned [`crate::config::RecordConfig`];
/// the header documents that the config pointer is not retained past the
/// call that reads it, so nothing here may borrow from `raw`.
///
/// # Safety
/// `raw` must point at a valid `PixelGrabRecordConfig` whose string/struct
/// pointers are either null or valid for the duration of this call.
pub(crate) unsafe fn record_config_from_raw(
    raw: *const PixelGrabRecordConfig,
) -> Result<crate::config::RecordConfig, Error> {
    if raw.is_null() {
        return Err(Error::InvalidParam);
    }
    let raw = &*raw;
    Ok(crate::config::RecordConfig {
        output_path: cstr_required(raw.output_path)?,
        region: Region {
            x: raw.region_x,
            y: raw.region_y,
            width: raw.region_width.max(0) as u32,
            height: raw.region_height.max(0) as u32,
        },
        fps: raw.fps,
        bitrate_bps: raw.bitrate,
        watermark: watermark_config_from_raw(raw.watermark),
        user_watermark: watermark_config_from_raw(raw.user_watermark),
        auto_capture: raw.auto_capture != 0,
        audio: audio_source_from_raw(raw.audio_source),
        audio_device_id: cstr_opt(raw.audio_device_id),
        audio_sample_rate: raw.audio_sample_rate,
        gpu_hint: GpuHint::from(raw.gpu_hint),
    })
}

/// # Safety
/// `ptr` must be null or a pointer previously returned by a `*_create`/
/// capture/export call of matching type, not yet freed.
pub(crate) unsafe fn ctx_ref<'a>(ptr: *const PixelGrabContext) -> Option<&'a Context> {
    ptr.as_ref().map(|handle| handle.0.as_ref())
}
