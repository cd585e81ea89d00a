//! Color utilities (§3, §8): hex parsing/formatting and RGB<->HSV
//! conversion. Pure functions; no `Context` involved since nothing here
//! touches platform state.

use std::ffi::CStr;
use std::os::raw::c_char;

use super::{PixelGrabColor, PixelGrabColorHsv, PixelGrabError};
use crate::color::{Color, HsvColor};

impl From<PixelGrabColor> for Color {
    fn from(c: PixelGrabColor) -> Self {
        Color::new(c.r, c.g, c.b, c.a)
    }
}

impl From<Color> for PixelGrabColor {
    fn from(c: Color) -> Self {
        PixelGrabColor { r: c.r, g: c.g, b: c.b, a: c.a }
    }
}

impl From<PixelGrabColorHsv> for HsvColor {
    fn from(c: PixelGrabColorHsv) -> Self {
        HsvColor { h: c.h, s: c.s, v: c.v }
    }
}

impl From<HsvColor> for PixelGrabColorHsv {
    fn from(c: HsvColor) -> Self {
        PixelGrabColorHsv { h: c.h, s: c.s, v: c.v }
    }
}

/// Converts an RGB color to HSV.
///
/// # Safety
/// `rgb` and `out_hsv` must be null or valid/writable respectively; a null
/// `rgb` leaves `*out_hsv` untouched.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_color_rgb_to_hsv(rgb: *const PixelGrabColor, out_hsv: *mut PixelGrabColorHsv) {
    let Some(rgb) = rgb.as_ref() else { return };
    let hsv = Color::from(*rgb).to_hsv();
    if !out_hsv.is_null() {
        *out_hsv = hsv.into();
    }
}

/// Converts an HSV color to RGB.
///
/// # Safety
/// `hsv` and `out_rgb` must be null or valid/writable respectively; a null
/// `hsv` leaves `*out_rgb` untouched.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_color_hsv_to_rgb(hsv: *const PixelGrabColorHsv, out_rgb: *mut PixelGrabColor) {
    let Some(hsv) = hsv.as_ref() else { return };
    let rgb = HsvColor::from(*hsv).to_rgb();
    if !out_rgb.is_null() {
        *out_rgb = rgb.into();
    }
}

/// Formats `*color` as `#RRGGBB`, or `#RRGGBBAA` when `include_alpha != 0`,
/// truncating to fit `buf_size` (including the NUL terminator).
///
/// # Safety
/// `color` must be null or valid; `buf` must be null or point at at least
/// `buf_size` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_color_to_hex(
    color: *const PixelGrabColor,
    buf: *mut c_char,
    buf_size: i32,
    include_alpha: i32,
) {
    let Some(color) = color.as_ref() else { return };
    if buf.is_null() || buf_size <= 0 {
        return;
    }
    let hex = Color::from(*color).to_hex(include_alpha != 0);
    let bytes = hex.as_bytes();
    let cap = (buf_size as usize).saturating_sub(1);
    let n = bytes.len().min(cap);
    let out = std::slice::from_raw_parts_mut(buf as *mut u8, buf_size as usize);
    out[..n].copy_from_slice(&bytes[..n]);
    out[n] = 0;
}

/// Parses `#RGB`, `#RRGGBB`, or `#RRGGBBAA` (leading `#` optional).
///
/// # Safety
/// `hex` must be null or a valid NUL-terminated C string; `out_color` must
/// be null or writable.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_color_from_hex(
    hex: *const c_char,
    out_color: *mut PixelGrabColor,
) -> PixelGrabError {
    if hex.is_null() {
        return PixelGrabError::InvalidParam;
    }
    let Ok(text) = CStr::from_ptr(hex).to_str() else {
        return PixelGrabError::InvalidParam;
    };
    match Color::from_hex(text) {
        Ok(color) => {
            if !out_color.is_null() {
                *out_color = color.into();
            }
            PixelGrabError::Ok
        }
        Err(err) => err,
    }
}
