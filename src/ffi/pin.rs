//! Pin-window lifecycle and per-pin accessors (§4.7, §6).

use std::os::raw::c_int;
use std::ffi::c_void;
use std::ptr;

use super::{cstr_opt, ctx_ref, PixelGrabContext, PixelGrabImage, PixelGrabPinInfo, PixelGrabPinWindow};
use crate::error::Error;
use crate::pin::PinContent;
use std::os::raw::c_char;

fn content_type(content: &PinContent) -> c_int {
    match content {
        PinContent::Image(_) => 0,
        PinContent::Text(_) => 1,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `image` must be a live image
/// handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_image(
    ctx: *const PixelGrabContext,
    image: *const PixelGrabImage,
    x: c_int,
    y: c_int,
) -> *mut PixelGrabPinWindow {
    let Some(ctx) = ctx.as_ref() else { return ptr::null_mut() };
    let Some(image) = image.as_ref() else { return ptr::null_mut() };
    let id = ctx.0.pin_image(image.0.clone(), x, y);
    Box::into_raw(Box::new(PixelGrabPinWindow { ctx: ctx.0.clone(), id }))
}

/// # Safety
/// `ctx` must be a live context handle; `text` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_text(
    ctx: *const PixelGrabContext,
    text: *const c_char,
    x: c_int,
    y: c_int,
) -> *mut PixelGrabPinWindow {
    let Some(ctx) = ctx.as_ref() else { return ptr::null_mut() };
    let Some(text) = cstr_opt(text) else { return ptr::null_mut() };
    let id = ctx.0.pin_text(text, x, y);
    Box::into_raw(Box::new(PixelGrabPinWindow { ctx: ctx.0.clone(), id }))
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_clipboard(
    ctx: *const PixelGrabContext,
    x: c_int,
    y: c_int,
) -> *mut PixelGrabPinWindow {
    let Some(ctx) = ctx.as_ref() else { return ptr::null_mut() };
    match ctx.0.pin_clipboard(x, y) {
        Ok(id) => Box::into_raw(Box::new(PixelGrabPinWindow { ctx: ctx.0.clone(), id })),
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_destroy_all(ctx: *const PixelGrabContext) {
    if let Some(ctx) = ctx_ref(ctx) {
        ctx.pin_destroy_all();
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_count(ctx: *const PixelGrabContext) -> c_int {
    match ctx_ref(ctx) {
        Some(ctx) => ctx.pin_count(),
        None => -1,
    }
}

/// # Safety
/// `ctx` must be a live context handle; `out_ids` must be null or point at
/// an array of at least `max_count` writable `c_int`s.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_enumerate(
    ctx: *const PixelGrabContext,
    out_ids: *mut c_int,
    max_count: c_int,
) -> c_int {
    let Some(ctx) = ctx_ref(ctx) else { return -1 };
    if max_count < 0 {
        return -1;
    }
    let ids = ctx.pin_enumerate();
    let n = ids.len().min(max_count as usize);
    if !out_ids.is_null() {
        for (i, id) in ids.into_iter().take(n).enumerate() {
            *out_ids.add(i) = id;
        }
    }
    n as c_int
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_set_visible_all(ctx: *const PixelGrabContext, visible: c_int) {
    if let Some(ctx) = ctx_ref(ctx) {
        ctx.pin_set_visible_all(visible != 0);
    }
}

/// # Safety
/// `ctx` must be a live context handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_process_events(ctx: *const PixelGrabContext) -> c_int {
    match ctx_ref(ctx) {
        Some(ctx) => ctx.pin_process_events(),
        None => -1,
    }
}

/// Destroys the underlying pin window and frees the handle.
///
/// # Safety
/// `pin` must be null or a pointer returned by one of the
/// `pixelgrab_pin_*` creation functions, not yet destroyed.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_destroy(pin: *mut PixelGrabPinWindow) {
    if pin.is_null() {
        return;
    }
    let pin = Box::from_raw(pin);
    pin.ctx.pin_destroy(pin.id);
}

/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_get_opacity(pin: *const PixelGrabPinWindow) -> f32 {
    let Some(pin) = pin.as_ref() else { return -1.0 };
    pin.ctx
        .with_pins(|pins| pins.get_backend(pin.id).map(|b| b.opacity()).ok_or(Error::InvalidParam))
        .unwrap_or(-1.0)
}

/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_set_opacity(pin: *const PixelGrabPinWindow, opacity: f32) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    match pin.ctx.with_pins(|pins| {
        pins.get_backend_mut(pin.id)
            .map(|b| b.set_opacity(opacity))
            .ok_or(Error::InvalidParam)
    }) {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `pin` must be a live pin handle; out-pointers must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_get_position(
    pin: *const PixelGrabPinWindow,
    out_x: *mut c_int,
    out_y: *mut c_int,
) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    match pin
        .ctx
        .with_pins(|pins| pins.get_backend(pin.id).map(|b| b.origin()).ok_or(Error::InvalidParam))
    {
        Ok((x, y)) => {
            if !out_x.is_null() {
                *out_x = x;
            }
            if !out_y.is_null() {
                *out_y = y;
            }
            Error::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_set_position(pin: *const PixelGrabPinWindow, x: c_int, y: c_int) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    match pin.ctx.with_pins(|pins| {
        pins.get_backend_mut(pin.id)
            .map(|b| b.set_position(x, y))
            .ok_or(Error::InvalidParam)
    }) {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `pin` must be a live pin handle; out-pointers must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_get_size(
    pin: *const PixelGrabPinWindow,
    out_width: *mut c_int,
    out_height: *mut c_int,
) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    match pin
        .ctx
        .with_pins(|pins| pins.get_backend(pin.id).map(|b| b.size()).ok_or(Error::InvalidParam))
    {
        Ok((w, h)) => {
            if !out_width.is_null() {
                *out_width = w as c_int;
            }
            if !out_height.is_null() {
                *out_height = h as c_int;
            }
            Error::Ok
        }
        Err(err) => err,
    }
}

/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_set_size(pin: *const PixelGrabPinWindow, width: c_int, height: c_int) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    if width <= 0 || height <= 0 {
        return Error::InvalidParam;
    }
    match pin.ctx.with_pins(|pins| {
        pins.get_backend_mut(pin.id)
            .map(|b| b.set_size(width as u32, height as u32))
            .ok_or(Error::InvalidParam)
    }) {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_get_visible(pin: *const PixelGrabPinWindow) -> c_int {
    let Some(pin) = pin.as_ref() else { return 0 };
    pin.ctx
        .with_pins(|pins| pins.get_backend(pin.id).map(|b| b.visible() as c_int).ok_or(Error::InvalidParam))
        .unwrap_or(0)
}

/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_set_visible(pin: *const PixelGrabPinWindow, visible: c_int) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    match pin.ctx.with_pins(|pins| {
        pins.get_backend_mut(pin.id)
            .map(|b| b.set_visible(visible != 0))
            .ok_or(Error::InvalidParam)
    }) {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `pin` must be a live pin handle; `out_info` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_get_info(
    pin: *const PixelGrabPinWindow,
    out_info: *mut PixelGrabPinInfo,
) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    let id = pin.id;
    match pin.ctx.with_pins(|pins| {
        let backend = pins.get_backend(id).ok_or(Error::InvalidParam)?;
        let (x, y) = backend.origin();
        let (w, h) = backend.size();
        Ok(PixelGrabPinInfo {
            id,
            x,
            y,
            width: w as c_int,
            height: h as c_int,
            opacity: backend.opacity(),
            is_visible: backend.visible() as c_int,
            content_type: content_type(backend.content()),
        })
    }) {
        Ok(info) => {
            if !out_info.is_null() {
                *out_info = info;
            }
            Error::Ok
        }
        Err(err) => err,
    }
}

/// Returns an owned deep copy of the pin's image content; null for text
/// pins or on error. Must be freed with `pixelgrab_image_destroy`.
///
/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_get_image(pin: *const PixelGrabPinWindow) -> *mut PixelGrabImage {
    let Some(pin) = pin.as_ref() else { return ptr::null_mut() };
    let id = pin.id;
    match pin
        .ctx
        .with_pins(|pins| pins.get_backend(id).and_then(|b| b.get_image()).ok_or(Error::InvalidParam))
    {
        Ok(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        Err(_) => ptr::null_mut(),
    }
}

/// Replaces an image pin's content; fails for text pins.
///
/// # Safety
/// `pin` must be a live pin handle; `image` must be a live image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_set_image(
    pin: *const PixelGrabPinWindow,
    image: *const PixelGrabImage,
) -> Error {
    let Some(pin) = pin.as_ref() else { return Error::NotInitialized };
    let Some(image) = image.as_ref() else { return Error::InvalidParam };
    let id = pin.id;
    let image = image.0.clone();
    match pin.ctx.with_pins(|pins| {
        let backend = pins.get_backend_mut(id).ok_or(Error::InvalidParam)?;
        if backend.set_image(image) {
            Ok(())
        } else {
            Err(Error::InvalidParam)
        }
    }) {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// Returns the backend's native window handle cast to `void*` (a headless
/// backend in this crate has no real platform window, so the handle is a
/// stable but otherwise opaque per-pin token). Null for an invalid pin.
///
/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_get_native_handle(pin: *const PixelGrabPinWindow) -> *mut c_void {
    let Some(pin) = pin.as_ref() else { return ptr::null_mut() };
    let id = pin.id;
    pin.ctx
        .with_pins(|pins| pins.get_backend(id).map(|b| b.native_handle()).ok_or(Error::InvalidParam))
        .map(|handle| handle as usize as *mut c_void)
        .unwrap_or(ptr::null_mut())
}

/// Creates a new image pin seeded from `pin`'s current image, offset by
/// `(dx, dy)`. Fails (returns null) for text pins or unknown ids.
///
/// # Safety
/// `pin` must be a live pin handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_pin_duplicate(
    pin: *const PixelGrabPinWindow,
    dx: c_int,
    dy: c_int,
) -> *mut PixelGrabPinWindow {
    let Some(pin) = pin.as_ref() else { return ptr::null_mut() };
    match pin.ctx.pin_duplicate(pin.id, dx, dy) {
        Ok(new_id) => Box::into_raw(Box::new(PixelGrabPinWindow { ctx: pin.ctx.clone(), id: new_id })),
        Err(_) => ptr::null_mut(),
    }
}
