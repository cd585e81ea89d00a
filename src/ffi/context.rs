//! Context lifecycle, error reporting, capture, DPI, color picker,
//! element detection, history, clipboard, watermark, audio, OCR, and
//! translation — every function in the header that takes a
//! `PixelGrabContext*` and nothing else opaque.

use std::os::raw::{c_char, c_int};
use std::ptr;

use super::{
    cstr_opt, cstr_required, string_into_raw, write_fixed, PixelGrabAudioDeviceInfo, PixelGrabClipboardFormat,
    PixelGrabColor, PixelGrabContext, PixelGrabDpiInfo, PixelGrabElementRect, PixelGrabError, PixelGrabHistoryEntry,
    PixelGrabImage, PixelGrabScreenInfo, PixelGrabTextWatermarkConfig, PixelGrabWindowId, PixelGrabWindowInfo,
};
use crate::context::Context;
use crate::detection::ElementInfo;

#[no_mangle]
pub extern "C" fn pixelgrab_context_create() -> *mut PixelGrabContext {
    Box::into_raw(Box::new(PixelGrabContext(Context::new())))
}

/// # Safety
/// `ctx` must be null or a pointer returned by [`pixelgrab_context_create`]
/// that has not already been destroyed.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_context_destroy(ctx: *mut PixelGrabContext) {
    if !ctx.is_null() {
        drop(Box::from_raw(ctx));
    }
}

/// # Safety
/// `ctx` must be null or a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_get_last_error(ctx: *const PixelGrabContext) -> PixelGrabError {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.last_error_code(),
        None => PixelGrabError::NotInitialized,
    }
}

/// # Safety
/// `ctx` must be a live context handle; the returned pointer is valid
/// until the next call on this context.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_get_last_error_message(ctx: *const PixelGrabContext) -> *const c_char {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.last_error_message_ptr(),
        None => ptr::null(),
    }
}

fn screen_info_to_c(info: crate::capture::ScreenInfo) -> PixelGrabScreenInfo {
    let mut out = PixelGrabScreenInfo {
        index: info.index as c_int,
        x: info.virtual_x,
        y: info.virtual_y,
        width: info.width as c_int,
        height: info.height as c_int,
        is_primary: info.is_primary as c_int,
        name: [0; 128],
    };
    write_fixed(&mut out.name, &info.name);
    out
}

fn window_info_to_c(info: crate::capture::WindowInfo) -> PixelGrabWindowInfo {
    let mut out = PixelGrabWindowInfo {
        id: info.id,
        x: info.x,
        y: info.y,
        width: info.width as c_int,
        height: info.height as c_int,
        is_visible: info.is_visible as c_int,
        title: [0; 256],
        process_name: [0; 128],
    };
    write_fixed(&mut out.title, &info.title);
    write_fixed(&mut out.process_name, &info.process_name);
    out
}

fn element_info_to_c(info: ElementInfo) -> PixelGrabElementRect {
    let mut out = PixelGrabElementRect {
        x: info.rect.x,
        y: info.rect.y,
        width: info.rect.w,
        height: info.rect.h,
        name: [0; 256],
        role: [0; 64],
    };
    write_fixed(&mut out.name, &info.name);
    write_fixed(&mut out.role, &info.role);
    out
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_get_screen_count(ctx: *const PixelGrabContext) -> c_int {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.screen_count(),
        None => -1,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_info` must be null or point
/// at a writable `PixelGrabScreenInfo`.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_get_screen_info(
    ctx: *const PixelGrabContext,
    screen_index: c_int,
    out_info: *mut PixelGrabScreenInfo,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    if screen_index < 0 {
        return PixelGrabError::InvalidParam;
    }
    match ctx.screen_info(screen_index as u32) {
        Ok(info) => {
            if !out_info.is_null() {
                *out_info = screen_info_to_c(info);
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_capture_screen(
    ctx: *const PixelGrabContext,
    screen_index: c_int,
) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    if screen_index < 0 {
        return ptr::null_mut();
    }
    match ctx.capture_screen(screen_index as u32) {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_capture_region(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
    width: c_int,
    height: c_int,
) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    if width <= 0 || height <= 0 {
        return ptr::null_mut();
    }
    match ctx.capture_region(x, y, width as u32, height as u32) {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_capture_window(
    ctx: *const PixelGrabContext,
    window_id: PixelGrabWindowId,
) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    match ctx.capture_window(window_id) {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_windows` must be null or
/// point at an array of at least `max_count` writable elements.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_enumerate_windows(
    ctx: *const PixelGrabContext,
    out_windows: *mut PixelGrabWindowInfo,
    max_count: c_int,
) -> c_int {
    let Some(ctx) = super::ctx_ref(ctx) else { return -1 };
    if max_count < 0 {
        return -1;
    }
    let windows = ctx.enumerate_windows();
    let n = windows.len().min(max_count as usize);
    if !out_windows.is_null() {
        for (i, window) in windows.into_iter().take(n).enumerate() {
            *out_windows.add(i) = window_info_to_c(window);
        }
    }
    n as c_int
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_enable_dpi_awareness(ctx: *const PixelGrabContext) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    match ctx.enable_dpi_awareness() {
        Ok(()) => PixelGrabError::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_info` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_get_dpi_info(
    ctx: *const PixelGrabContext,
    screen_index: c_int,
    out_info: *mut PixelGrabDpiInfo,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    if screen_index < 0 {
        return PixelGrabError::InvalidParam;
    }
    match ctx.dpi_info(screen_index as u32) {
        Ok(info) => {
            if !out_info.is_null() {
                *out_info = PixelGrabDpiInfo {
                    screen_index,
                    scale_x: info.scale_x,
                    scale_y: info.scale_y,
                    dpi_x: info.dpi_x.round() as c_int,
                    dpi_y: info.dpi_y.round() as c_int,
                };
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle; both out-pointers must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_logical_to_physical(
    ctx: *const PixelGrabContext,
    screen_index: c_int,
    logical_x: c_int,
    logical_y: c_int,
    out_physical_x: *mut c_int,
    out_physical_y: *mut c_int,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    if screen_index < 0 {
        return PixelGrabError::InvalidParam;
    }
    match ctx.logical_to_physical(screen_index as u32, logical_x, logical_y) {
        Ok((px, py)) => {
            if !out_physical_x.is_null() {
                *out_physical_x = px;
            }
            if !out_physical_y.is_null() {
                *out_physical_y = py;
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// Same as [`pixelgrab_logical_to_physical`].
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_physical_to_logical(
    ctx: *const PixelGrabContext,
    screen_index: c_int,
    physical_x: c_int,
    physical_y: c_int,
    out_logical_x: *mut c_int,
    out_logical_y: *mut c_int,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    if screen_index < 0 {
        return PixelGrabError::InvalidParam;
    }
    match ctx.physical_to_logical(screen_index as u32, physical_x, physical_y) {
        Ok((lx, ly)) => {
            if !out_logical_x.is_null() {
                *out_logical_x = lx;
            }
            if !out_logical_y.is_null() {
                *out_logical_y = ly;
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_color` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pick_color(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
    out_color: *mut PixelGrabColor,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    match ctx.pick_color(x, y) {
        Ok(color) => {
            if !out_color.is_null() {
                *out_color = PixelGrabColor { r: color.r, g: color.g, b: color.b, a: color.a };
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_get_magnifier(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
    radius: c_int,
    magnification: c_int,
) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    match ctx.get_magnifier(x, y, radius, magnification) {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_rect` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_detect_element(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
    out_rect: *mut PixelGrabElementRect,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    match ctx.detect_element(x, y) {
        Ok(info) => {
            if !out_rect.is_null() {
                *out_rect = element_info_to_c(info);
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_rects` must be null or point
/// at an array of at least `max_count` writable elements.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_detect_elements(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
    out_rects: *mut PixelGrabElementRect,
    max_count: c_int,
) -> c_int {
    let Some(ctx) = super::ctx_ref(ctx) else { return -1 };
    if max_count < 0 {
        return -1;
    }
    let elements = ctx.detect_elements(x, y, max_count as usize);
    let n = elements.len();
    if !out_rects.is_null() {
        for (i, element) in elements.into_iter().enumerate() {
            *out_rects.add(i) = element_info_to_c(element);
        }
    }
    n as c_int
}

/// # Safety
/// `ctx` must be a live context handle; `out_rect` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_snap_to_element(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
    snap_distance: c_int,
    out_rect: *mut PixelGrabElementRect,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    match ctx.snap_to_element(x, y, snap_distance) {
        Ok(rect) => {
            if !out_rect.is_null() {
                *out_rect = PixelGrabElementRect {
                    x: rect.x,
                    y: rect.y,
                    width: rect.w,
                    height: rect.h,
                    name: [0; 256],
                    role: [0; 64],
                };
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_history_count(ctx: *const PixelGrabContext) -> c_int {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.history_count(),
        None => -1,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_entry` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_history_get_entry(
    ctx: *const PixelGrabContext,
    index: c_int,
    out_entry: *mut PixelGrabHistoryEntry,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    if index < 0 {
        return PixelGrabError::InvalidParam;
    }
    match ctx.history_get_entry(index as usize) {
        Ok(entry) => {
            if !out_entry.is_null() {
                *out_entry = PixelGrabHistoryEntry {
                    id: entry.id,
                    region_x: entry.x,
                    region_y: entry.y,
                    region_width: entry.w,
                    region_height: entry.h,
                    timestamp: entry.timestamp_seconds,
                };
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_history_recapture(
    ctx: *const PixelGrabContext,
    history_id: c_int,
) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    match ctx.history_recapture(history_id) {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recapture_last(ctx: *const PixelGrabContext) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    match ctx.recapture_last() {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_history_clear(ctx: *const PixelGrabContext) {
    if let Some(ctx) = super::ctx_ref(ctx) {
        ctx.history_clear();
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_history_set_max_count(ctx: *const PixelGrabContext, max_count: c_int) {
    if let Some(ctx) = super::ctx_ref(ctx) {
        ctx.history_set_max_count(max_count);
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_clipboard_get_format(ctx: *const PixelGrabContext) -> PixelGrabClipboardFormat {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.clipboard_format(),
        None => PixelGrabClipboardFormat::None,
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_clipboard_get_image(ctx: *const PixelGrabContext) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    match ctx.clipboard_get_image() {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle; the returned string, if non-null,
/// must be freed with `pixelgrab_free_string`.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_clipboard_get_text(ctx: *const PixelGrabContext) -> *mut c_char {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    match ctx.clipboard_get_text() {
        Some(text) => string_into_raw(text),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_watermark_is_supported(ctx: *const PixelGrabContext) -> c_int {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.watermark_is_supported() as c_int,
        None => 0,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `image` must be a live image
/// handle; `config` must be null or point at a valid
/// `PixelGrabTextWatermarkConfig`.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_watermark_apply_text(
    ctx: *const PixelGrabContext,
    image: *mut PixelGrabImage,
    config: *const PixelGrabTextWatermarkConfig,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    let Some(image) = image.as_mut() else { return PixelGrabError::InvalidParam };
    let Some(config) = super::watermark_config_from_raw(config) else { return PixelGrabError::InvalidParam };
    ctx.watermark_apply_text(&mut image.0, &config);
    PixelGrabError::Ok
}

/// # Safety
/// `ctx` must be a live context handle; `image` and `watermark` must be
/// live image handles.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_watermark_apply_image(
    ctx: *const PixelGrabContext,
    image: *mut PixelGrabImage,
    watermark: *const PixelGrabImage,
    x: c_int,
    y: c_int,
    opacity: f32,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    let Some(image) = image.as_mut() else { return PixelGrabError::InvalidParam };
    let Some(watermark) = watermark.as_ref() else { return PixelGrabError::InvalidParam };
    ctx.watermark_apply_image(&mut image.0, &watermark.0, x, y, opacity);
    PixelGrabError::Ok
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_audio_is_supported(ctx: *const PixelGrabContext) -> c_int {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.audio_is_supported() as c_int,
        None => 0,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_devices` must be null or
/// point at an array of at least `max_count` writable elements.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_audio_enumerate_devices(
    ctx: *const PixelGrabContext,
    out_devices: *mut PixelGrabAudioDeviceInfo,
    max_count: c_int,
) -> c_int {
    let Some(ctx) = super::ctx_ref(ctx) else { return -1 };
    if max_count < 0 {
        return -1;
    }
    let devices = ctx.audio_enumerate_devices();
    let n = devices.len().min(max_count as usize);
    if !out_devices.is_null() {
        for (i, device) in devices.into_iter().take(n).enumerate() {
            let mut entry = PixelGrabAudioDeviceInfo { id: [0; 256], name: [0; 256], is_default: 0, is_input: 0 };
            write_fixed(&mut entry.id, &device.id);
            write_fixed(&mut entry.name, &device.name);
            entry.is_default = device.is_default as c_int;
            entry.is_input = device.is_input as c_int;
            *out_devices.add(i) = entry;
        }
    }
    n as c_int
}

/// # Safety
/// `ctx` must be a live context handle; `out_device` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_audio_get_default_device(
    ctx: *const PixelGrabContext,
    is_input: c_int,
    out_device: *mut PixelGrabAudioDeviceInfo,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    match ctx.audio_get_default_device(is_input != 0) {
        Ok(device) => {
            if !out_device.is_null() {
                let mut entry = PixelGrabAudioDeviceInfo { id: [0; 256], name: [0; 256], is_default: 0, is_input: 0 };
                write_fixed(&mut entry.id, &device.id);
                write_fixed(&mut entry.name, &device.name);
                entry.is_default = device.is_default as c_int;
                entry.is_input = device.is_input as c_int;
                *out_device = entry;
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_ocr_is_supported(ctx: *const PixelGrabContext) -> c_int {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.ocr_is_supported() as c_int,
        None => 0,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `image` must be a live image
/// handle; `out_text`, if non-null, receives a string the caller must
/// free with `pixelgrab_free_string`.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_ocr_recognize(
    ctx: *const PixelGrabContext,
    image: *const PixelGrabImage,
    language: *const c_char,
    out_text: *mut *mut c_char,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    let Some(image) = image.as_ref() else { return PixelGrabError::InvalidParam };
    let language = cstr_opt(language);
    match ctx.ocr_recognize(&image.0, language.as_deref()) {
        Ok(text) => {
            if !out_text.is_null() {
                *out_text = string_into_raw(text);
            }
            PixelGrabError::Ok
        }
        Err(err) => {
            if !out_text.is_null() {
                *out_text = ptr::null_mut();
            }
            err
        }
    }
}

/// # Safety
/// `ctx` must be a live context handle; string pointers must be null or
/// valid C strings.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_translate_set_config(
    ctx: *const PixelGrabContext,
    provider: *const c_char,
    app_id: *const c_char,
    secret_key: *const c_char,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    ctx.translate_set_config(crate::translate::TranslateConfig {
        provider: cstr_opt(provider),
        app_id: cstr_opt(app_id),
        secret_key: cstr_opt(secret_key),
    });
    PixelGrabError::Ok
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_translate_is_supported(ctx: *const PixelGrabContext) -> c_int {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.translate_is_supported() as c_int,
        None => 0,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `text`/`target_lang` must be
/// valid C strings, `source_lang` may be null (auto-detect).
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_translate_text(
    ctx: *const PixelGrabContext,
    text: *const c_char,
    source_lang: *const c_char,
    target_lang: *const c_char,
    out_translated: *mut *mut c_char,
) -> PixelGrabError {
    let Some(ctx) = super::ctx_ref(ctx) else { return PixelGrabError::NotInitialized };
    let Ok(text) = cstr_required(text) else { return PixelGrabError::InvalidParam };
    let Ok(target_lang) = cstr_required(target_lang) else { return PixelGrabError::InvalidParam };
    let source_lang = cstr_opt(source_lang);
    match ctx.translate_text(&text, source_lang.as_deref(), &target_lang) {
        Ok(translated) => {
            if !out_translated.is_null() {
                *out_translated = string_into_raw(translated);
            }
            PixelGrabError::Ok
        }
        Err(err) => {
            if !out_translated.is_null() {
                *out_translated = ptr::null_mut();
            }
            err
        }
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_capture_screen_exclude_pins(
    ctx: *const PixelGrabContext,
    screen_index: c_int,
) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    if screen_index < 0 {
        return ptr::null_mut();
    }
    match ctx.capture_screen_exclude_pins(screen_index as u32) {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_capture_region_exclude_pins(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
    width: c_int,
    height: c_int,
) -> *mut PixelGrabImage {
    let Some(ctx) = super::ctx_ref(ctx) else { return ptr::null_mut() };
    if width <= 0 || height <= 0 {
        return ptr::null_mut();
    }
    match ctx.capture_region_exclude_pins(x, y, width as u32, height as u32) {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_is_supported(ctx: *const PixelGrabContext) -> c_int {
    match super::ctx_ref(ctx) {
        Some(ctx) => ctx.recorder_is_supported() as c_int,
        None => 0,
    }
}
