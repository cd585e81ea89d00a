//! Recorder lifecycle and frame submission (§4.10, §6).

use std::os::raw::c_int;
use std::ptr;

use super::{ctx_ref, record_config_from_raw, PixelGrabContext, PixelGrabImage, PixelGrabRecordConfig, PixelGrabRecorder};
use crate::error::Error;
use crate::recorder::RecorderState;

fn state_to_c(state: RecorderState) -> c_int {
    state as u8 as c_int
}

/// # Safety
/// `ctx` must be a live context handle; `config` must point at a valid
/// `PixelGrabRecordConfig`.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_create(
    ctx: *const PixelGrabContext,
    config: *const PixelGrabRecordConfig,
) -> *mut PixelGrabRecorder {
    let Some(ctx) = ctx_ref(ctx) else { return ptr::null_mut() };
    let Ok(config) = record_config_from_raw(config) else { return ptr::null_mut() };
    match ctx.create_recorder(config) {
        Ok(recorder) => Box::into_raw(Box::new(PixelGrabRecorder(recorder))),
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `recorder` must be null or a pointer returned by
/// [`pixelgrab_recorder_create`], not yet destroyed.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_destroy(recorder: *mut PixelGrabRecorder) {
    if !recorder.is_null() {
        drop(Box::from_raw(recorder));
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_start(recorder: *mut PixelGrabRecorder) -> Error {
    let Some(recorder) = recorder.as_mut() else { return Error::NotInitialized };
    match recorder.0.start() {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_pause(recorder: *mut PixelGrabRecorder) -> Error {
    let Some(recorder) = recorder.as_mut() else { return Error::NotInitialized };
    match recorder.0.pause() {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_resume(recorder: *mut PixelGrabRecorder) -> Error {
    let Some(recorder) = recorder.as_mut() else { return Error::NotInitialized };
    match recorder.0.resume() {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_stop(recorder: *mut PixelGrabRecorder) -> Error {
    let Some(recorder) = recorder.as_mut() else { return Error::NotInitialized };
    match recorder.0.stop() {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// Manual-mode frame submission; rejected when the recorder was
/// configured with `auto_capture = true` (§4.10).
///
/// # Safety
/// `recorder` must be a live recorder handle; `frame` must be a live
/// image handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_write_frame(
    recorder: *mut PixelGrabRecorder,
    frame: *const PixelGrabImage,
) -> Error {
    let Some(recorder) = recorder.as_mut() else { return Error::NotInitialized };
    let Some(frame) = frame.as_ref() else { return Error::InvalidParam };
    match recorder.0.write_frame(&frame.0) {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// No-op in manual mode; the auto-capture thread is already owned by
/// `start`/`stop` (§4.10).
///
/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_start_capture_loop(recorder: *mut PixelGrabRecorder) -> Error {
    let Some(recorder) = recorder.as_mut() else { return Error::NotInitialized };
    match recorder.0.start_capture_loop() {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_stop_capture_loop(recorder: *mut PixelGrabRecorder) -> Error {
    let Some(recorder) = recorder.as_mut() else { return Error::NotInitialized };
    match recorder.0.stop_capture_loop() {
        Ok(()) => Error::Ok,
        Err(err) => err,
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_get_state(recorder: *const PixelGrabRecorder) -> c_int {
    match recorder.as_ref() {
        Some(recorder) => state_to_c(recorder.0.state()),
        None => state_to_c(RecorderState::Idle),
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_get_duration_ms(recorder: *const PixelGrabRecorder) -> i64 {
    match recorder.as_ref() {
        Some(recorder) => recorder.0.duration_ms(),
        None => -1,
    }
}

/// # Safety
/// `recorder` must be a live recorder handle.
#[no_mangle]
pub unsafe extern "C" fn pixelgrab_recorder_get_frame_count(recorder: *const PixelGrabRecorder) -> i64 {
    match recorder.as_ref() {
        Some(recorder) => recorder.0.frame_count() as i64,
        None => -1,
    }
}
