//! Platform capture adapter trait (§4.2).
//!
//! Shaped after the teacher's `RenderBackend` trait
//! (`render/backend.rs`): a small set of synchronous methods a platform
//! implementation fills in, with capture operations returning `Option`
//! rather than erroring the whole context when a single shot fails.

use crate::image::Image;

/// One display in the virtual desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenInfo {
    pub index: u32,
    pub virtual_x: i32,
    pub virtual_y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
    pub name: String,
}

/// One top-level window known to the platform's window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_visible: bool,
    pub title: String,
    pub process_name: String,
}

/// Per-screen scaling/DPI descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiInfo {
    pub scale_x: f32,
    pub scale_y: f32,
    pub dpi_x: f32,
    pub dpi_y: f32,
}

impl Default for DpiInfo {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            dpi_x: 96.0,
            dpi_y: 96.0,
        }
    }
}

/// The platform screen-capture adapter.
///
/// Implementations are best-effort and synchronous: a failed capture
/// returns `None` rather than propagating an error, the caller (`Context`)
/// is responsible for surfacing `Error::CaptureFailed` to callers.
pub trait CaptureBackend: Send + Sync {
    fn initialize(&mut self) -> bool;

    /// Idempotent; safe to call multiple times or without a prior
    /// successful `initialize`.
    fn shutdown(&mut self);

    fn get_screens(&self) -> Vec<ScreenInfo>;

    fn capture_screen(&self, index: u32) -> Option<Image>;

    /// `(x, y, w, h)` in the virtual desktop frame; clipping to actual
    /// screens is this backend's responsibility.
    fn capture_region(&self, x: i32, y: i32, width: u32, height: u32) -> Option<Image>;

    fn capture_window(&self, native_window_id: u64) -> Option<Image>;

    fn enumerate_windows(&self) -> Vec<WindowInfo>;

    fn enable_dpi_awareness(&mut self) -> bool;

    fn get_dpi_info(&self, screen_index: u32) -> DpiInfo;

    /// Hint consulted by the recorder's `gpu_hint` resolution (§4.10).
    /// Supplemented from `win_recorder_backend.cpp`/`d3d11_device_manager.h`:
    /// not part of spec.md's capture contract bullet list, but required to
    /// honor the GPU/CPU fallback decision end-to-end.
    fn supports_gpu_capture(&self) -> bool {
        false
    }
}
