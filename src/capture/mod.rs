//! Capture backend trait and the default testable implementation (§4.2).

pub mod backend;

pub use backend::{CaptureBackend, DpiInfo, ScreenInfo, WindowInfo};

use crate::image::{Image, PixelFormat};

/// A deterministic, in-memory virtual desktop used as the default backend.
///
/// Grounded on the teacher's `render::backends::null::NullBackend`: it
/// performs no real OS interaction but honors the trait's full contract so
/// the rest of the crate (and its tests) can exercise capture end-to-end
/// without a display server.
pub struct NullCapture {
    screens: Vec<ScreenInfo>,
    windows: Vec<WindowInfo>,
    initialized: bool,
    dpi_aware: bool,
}

impl NullCapture {
    /// A single 1920x1080 primary screen at the origin, no windows.
    pub fn new() -> Self {
        Self {
            screens: vec![ScreenInfo {
                index: 0,
                virtual_x: 0,
                virtual_y: 0,
                width: 1920,
                height: 1080,
                is_primary: true,
                name: "Virtual-0".to_string(),
            }],
            windows: Vec::new(),
            initialized: false,
            dpi_aware: false,
        }
    }

    /// Build a desktop with an arbitrary, caller-chosen screen layout —
    /// used by tests exercising multi-monitor virtual-desktop coordinates.
    pub fn with_screens(screens: Vec<ScreenInfo>) -> Self {
        Self {
            screens,
            windows: Vec::new(),
            initialized: false,
            dpi_aware: false,
        }
    }

    pub fn push_window(&mut self, window: WindowInfo) {
        self.windows.push(window);
    }

    fn screen_bounds(&self, index: u32) -> Option<(i32, i32, u32, u32)> {
        self.screens
            .iter()
            .find(|s| s.index == index)
            .map(|s| (s.virtual_x, s.virtual_y, s.width, s.height))
    }

    /// Synthesize a deterministic pixel pattern so captures compare
    /// reproducibly in tests without needing a stored reference image.
    fn synthesize(width: u32, height: u32) -> Image {
        let mut image = Image::create(width, height, PixelFormat::Bgra8)
            .expect("NullCapture dimensions are always positive");
        for y in 0..height {
            for x in 0..width {
                let offset = image.pixel_offset(x, y).unwrap();
                let data = image.data_mut();
                data[offset] = (x % 256) as u8; // B
                data[offset + 1] = (y % 256) as u8; // G
                data[offset + 2] = 0; // R
                data[offset + 3] = 255; // A
            }
        }
        image
    }
}

impl Default for NullCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the platform capture backend at build time. This crate ships
/// no OS-specific backend, so every platform resolves to [`NullCapture`]
/// — matching spec.md §9's "platform adapters as interfaces" design note
/// (a `CreatePlatform…()` factory, stubs acceptable where a real backend
/// is unavailable).
pub fn create_platform_capture_backend() -> Box<dyn CaptureBackend> {
    Box::new(NullCapture::new())
}

impl CaptureBackend for NullCapture {
    fn initialize(&mut self) -> bool {
        self.initialized = true;
        true
    }

    fn shutdown(&mut self) {
        self.initialized = false;
    }

    fn get_screens(&self) -> Vec<ScreenInfo> {
        self.screens.clone()
    }

    fn capture_screen(&self, index: u32) -> Option<Image> {
        let (_, _, w, h) = self.screen_bounds(index)?;
        Some(Self::synthesize(w, h))
    }

    fn capture_region(&self, _x: i32, _y: i32, width: u32, height: u32) -> Option<Image> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::synthesize(width, height))
    }

    fn capture_window(&self, native_window_id: u64) -> Option<Image> {
        let window = self.windows.iter().find(|w| w.id == native_window_id)?;
        Some(Self::synthesize(window.width, window.height))
    }

    fn enumerate_windows(&self) -> Vec<WindowInfo> {
        self.windows.clone()
    }

    fn enable_dpi_awareness(&mut self) -> bool {
        self.dpi_aware = true;
        true
    }

    fn get_dpi_info(&self, _screen_index: u32) -> DpiInfo {
        DpiInfo::default()
    }

    fn supports_gpu_capture(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_screen_matches_screen_dimensions() {
        let backend = NullCapture::new();
        let image = backend.capture_screen(0).unwrap();
        assert_eq!(image.width(), 1920);
        assert_eq!(image.height(), 1080);
        assert_eq!(image.format(), PixelFormat::Bgra8);
    }

    #[test]
    fn capture_screen_out_of_range_returns_none() {
        let backend = NullCapture::new();
        assert!(backend.capture_screen(7).is_none());
    }

    #[test]
    fn capture_region_rejects_zero_sized() {
        let backend = NullCapture::new();
        assert!(backend.capture_region(0, 0, 0, 10).is_none());
    }

    #[test]
    fn capture_window_looks_up_by_native_id() {
        let mut backend = NullCapture::new();
        backend.push_window(WindowInfo {
            id: 42,
            x: 0,
            y: 0,
            width: 300,
            height: 200,
            is_visible: true,
            title: "Notes".to_string(),
            process_name: "notes.exe".to_string(),
        });
        let image = backend.capture_window(42).unwrap();
        assert_eq!(image.width(), 300);
        assert_eq!(image.height(), 200);
        assert!(backend.capture_window(99).is_none());
    }
}
