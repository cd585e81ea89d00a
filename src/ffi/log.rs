//! Logging setup and the shared string-ownership functions (§6 Logging).
//!
//! Grounded on `original_source/src/core/callback_sink.h`: a replaceable
//! C function-pointer sink alongside the `log` facade the teacher crate
//! already depends on.

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};

use lazy_static::lazy_static;

use crate::log::{self, LogCallback, LogLevel};

pub type PixelGrabLogCallbackFn = extern "C" fn(level: c_int, message: *const c_char, userdata: *mut c_void);

/// Bridges the C function pointer + opaque `userdata` into a
/// [`LogCallback`]. Sound to mark `Send + Sync`: the callback contract
/// (like the rest of this library's, per §9) puts thread-discipline on
/// the caller, and `userdata` is never dereferenced here, only forwarded.
struct CCallback {
    func: PixelGrabLogCallbackFn,
    userdata: *mut c_void,
}

unsafe impl Send for CCallback {}
unsafe impl Sync for CCallback {}

impl LogCallback for CCallback {
    fn on_log(&self, level: LogLevel, message: &str) {
        if let Ok(c_message) = CString::new(message) {
            (self.func)(level as c_int, c_message.as_ptr(), self.userdata);
        }
    }
}

#[no_mangle]
pub extern "C" fn pixelgrab_set_log_level(level: LogLevel) {
    log::set_level(level);
}

/// Registers a log sink; pass `None` to clear the current one.
#[no_mangle]
pub extern "C" fn pixelgrab_set_log_callback(
    callback: Option<PixelGrabLogCallbackFn>,
    userdata: *mut c_void,
) {
    match callback {
        Some(func) => log::set_callback(Some(Box::new(CCallback { func, userdata }))),
        None => log::set_callback(None),
    }
}

/// Emits `message` through the shared logging pipeline at `level`.
///
/// # Safety
/// `message` must be a valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_log(level: LogLevel, message: *const c_char) {
    if let Some(text) = super::cstr_opt(message) {
        log::emit(level, &text);
    }
}

/// Frees a string previously returned by any `pixelgrab_*` function that
/// documents ownership transfer (OCR/translation/clipboard text, hex
/// color formatting). A null pointer is a no-op.
///
/// # Safety
/// `s` must be null or a pointer previously returned by `CString::into_raw`
/// from this library, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

lazy_static! {
    static ref VERSION_CSTRING: CString = CString::new(crate::version::version_string()).unwrap();
}

/// A semver-like `"major.minor.patch"` string, valid for the process
/// lifetime; must not be freed.
#[no_mangle]
pub extern "C" fn pixelgrab_version_string() -> *const c_char {
    VERSION_CSTRING.as_ptr()
}

#[no_mangle]
pub extern "C" fn pixelgrab_version_major() -> c_int {
    crate::version::MAJOR
}

#[no_mangle]
pub extern "C" fn pixelgrab_version_minor() -> c_int {
    crate::version::MINOR
}

#[no_mangle]
pub extern "C" fn pixelgrab_version_patch() -> c_int {
    crate::version::PATCH
}
