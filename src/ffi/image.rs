//! Image handle lifecycle and accessors (§4.1, §6).

use std::os::raw::c_int;
use std::ptr;

use super::{PixelGrabImage, PixelGrabPixelFormat};
use crate::image::PixelFormat;

fn format_from_raw(value: c_int) -> PixelFormat {
    match value {
        1 => PixelFormat::Rgba8,
        2 => PixelFormat::Native,
        _ => PixelFormat::Bgra8,
    }
}

/// Allocates a zeroed `width x height` image; null on non-positive
/// dimensions or overflow.
#[no_mangle]
pub extern "C" fn pixelgrab_image_create(width: c_int, height: c_int, format: c_int) -> *mut PixelGrabImage {
    if width <= 0 || height <= 0 {
        return ptr::null_mut();
    }
    match crate::image::Image::create(width as u32, height as u32, format_from_raw(format)) {
        Ok(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        Err(_) => ptr::null_mut(),
    }
}

/// Takes ownership of `data[..data_len]` as the image's pixel buffer.
///
/// # Safety
/// `data` must be null or point at `data_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_create_from_data(
    width: c_int,
    height: c_int,
    stride: c_int,
    format: c_int,
    data: *const u8,
    data_len: usize,
) -> *mut PixelGrabImage {
    if width <= 0 || height <= 0 || stride <= 0 || data.is_null() {
        return ptr::null_mut();
    }
    let bytes = std::slice::from_raw_parts(data, data_len).to_vec();
    match crate::image::Image::create_from_data(width as u32, height as u32, stride as u32, format_from_raw(format), bytes) {
        Ok(image) => Box::into_raw(Box::new(PixelGrabImage(image))),
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `image` must be a live image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_clone(image: *const PixelGrabImage) -> *mut PixelGrabImage {
    match image.as_ref() {
        Some(image) => Box::into_raw(Box::new(PixelGrabImage(image.0.clone()))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `image` must be null or a pointer returned by a `pixelgrab_image_*`/
/// `pixelgrab_capture_*`/`*_export`/`*_get_magnifier` call, not yet freed,
/// and not a borrow returned by `*_get_result` (those are owned by their
/// session and must not be freed directly).
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_destroy(image: *mut PixelGrabImage) {
    if !image.is_null() {
        drop(Box::from_raw(image));
    }
}

/// # Safety
/// `image` must be a live image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_get_width(image: *const PixelGrabImage) -> c_int {
    image.as_ref().map(|i| i.0.width() as c_int).unwrap_or(-1)
}

/// # Safety
/// `image` must be a live image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_get_height(image: *const PixelGrabImage) -> c_int {
    image.as_ref().map(|i| i.0.height() as c_int).unwrap_or(-1)
}

/// # Safety
/// `image` must be a live image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_get_stride(image: *const PixelGrabImage) -> c_int {
    image.as_ref().map(|i| i.0.stride() as c_int).unwrap_or(-1)
}

/// # Safety
/// `image` must be a live image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_get_format(image: *const PixelGrabImage) -> PixelGrabPixelFormat {
    image.as_ref().map(|i| i.0.format()).unwrap_or(PixelFormat::Bgra8)
}

/// # Safety
/// `image` must be a live image handle. The returned pointer is valid for
/// the lifetime of the image handle and must not be freed directly.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_get_data(image: *const PixelGrabImage) -> *const u8 {
    image.as_ref().map(|i| i.0.data().as_ptr()).unwrap_or(ptr::null())
}

/// # Safety
/// `image` must be a live, exclusively-held image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_get_data_mut(image: *mut PixelGrabImage) -> *mut u8 {
    match image.as_mut() {
        Some(i) => i.0.data_mut().as_mut_ptr(),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `image` must be a live image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_image_get_data_size(image: *const PixelGrabImage) -> usize {
    image.as_ref().map(|i| i.0.data_size()).unwrap_or(0)
}
