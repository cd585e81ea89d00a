//! Composition root: owns every subsystem and wires their lazy, shared, or
//! eager initialization order (§13).
//!
//! Grounded on the teacher's `Engine`/`EngineInstance` (`engine/engine.rs`,
//! `instance.rs`): a struct of subsystem handles behind `Mutex`es rather
//! than `&mut self` methods, because the C ABI hands out a single
//! `PixelGrabContext*` that many FFI functions borrow concurrently-in-spirit
//! (never truly concurrently — per-context access is still the caller's
//! job to serialize — but Rust's aliasing rules don't know that).

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::audio::{create_platform_audio_backend, AudioBackend, AudioDeviceInfo};
use crate::capture::{create_platform_capture_backend, CaptureBackend, DpiInfo, ScreenInfo, WindowInfo};
use crate::clipboard::{create_platform_clipboard, ClipboardFormat, ClipboardReader};
use crate::color::Color;
use crate::config::{AudioSource, RecordConfig, TextWatermarkConfig};
use crate::detection::{create_platform_element_detector, ElementInfo, Rect, SnapEngine};
use crate::error::{Error, Result};
use crate::history::{History, HistoryEntry};
use crate::image::{Image, PixelFormat};
use crate::ocr::{NullOcrBackend, OcrBackend};
use crate::pin::{PinId, PinWindowManager};
use crate::recorder::encoder::NullEncoder;
use crate::recorder::RecorderBackend;
use crate::translate::{NullTranslateBackend, TranslateBackend, TranslateConfig};
use crate::watermark::{create_platform_watermark_renderer, WatermarkRenderer};

/// Wraps a shared, lockable capture backend so it can be handed to a
/// [`RecorderBackend`] as `Arc<dyn CaptureBackend>` while `Context` keeps
/// its own handle for screen/region/window queries. Every method just
/// locks and delegates; there's no state here beyond the shared mutex.
struct SharedCapture(Arc<Mutex<Box<dyn CaptureBackend>>>);

impl CaptureBackend for SharedCapture {
    fn initialize(&mut self) -> bool {
        self.0.lock().unwrap().initialize()
    }

    fn shutdown(&mut self) {
        self.0.lock().unwrap().shutdown()
    }

    fn get_screens(&self) -> Vec<ScreenInfo> {
        self.0.lock().unwrap().get_screens()
    }

    fn capture_screen(&self, index: u32) -> Option<Image> {
        self.0.lock().unwrap().capture_screen(index)
    }

    fn capture_region(&self, x: i32, y: i32, width: u32, height: u32) -> Option<Image> {
        self.0.lock().unwrap().capture_region(x, y, width, height)
    }

    fn capture_window(&self, native_window_id: u64) -> Option<Image> {
        self.0.lock().unwrap().capture_window(native_window_id)
    }

    fn enumerate_windows(&self) -> Vec<WindowInfo> {
        self.0.lock().unwrap().enumerate_windows()
    }

    fn enable_dpi_awareness(&mut self) -> bool {
        self.0.lock().unwrap().enable_dpi_awareness()
    }

    fn get_dpi_info(&self, screen_index: u32) -> DpiInfo {
        self.0.lock().unwrap().get_dpi_info(screen_index)
    }

    fn supports_gpu_capture(&self) -> bool {
        self.0.lock().unwrap().supports_gpu_capture()
    }
}

struct ErrorSlot {
    code: Error,
    message: CString,
}

impl ErrorSlot {
    fn new() -> Self {
        Self { code: Error::Ok, message: CString::new(Error::Ok.message()).unwrap() }
    }

    fn set(&mut self, code: Error) {
        self.code = code;
        // `Error::message` is always valid UTF-8 with no interior NUL.
        self.message = CString::new(code.message()).unwrap();
    }
}

/// Owns every subsystem reachable through the C ABI for one context
/// handle. Capture and element detection are wired eagerly (a context is
/// useless without them); clipboard, watermark, audio, OCR, and
/// translation are resolved lazily on first use (§13).
pub struct Context {
    capture: Arc<Mutex<Box<dyn CaptureBackend>>>,
    snap: Mutex<SnapEngine>,
    clipboard: Mutex<Option<Box<dyn ClipboardReader>>>,
    watermark: Mutex<Option<Box<dyn WatermarkRenderer>>>,
    audio: Mutex<Option<Box<dyn AudioBackend>>>,
    ocr: Mutex<Option<Box<dyn OcrBackend>>>,
    translate: Mutex<Option<Box<dyn TranslateBackend>>>,
    pins: Mutex<PinWindowManager>,
    history: Mutex<History>,
    error: Mutex<ErrorSlot>,
}

impl Context {
    /// Creates a context and eagerly initializes its capture backend and
    /// element detector. Never fails: a backend that can't reach real
    /// hardware still stands up its stub (§4.2, §9).
    pub fn new() -> Arc<Self> {
        let mut capture = create_platform_capture_backend();
        capture.initialize();
        let detector = create_platform_element_detector();

        Arc::new(Self {
            capture: Arc::new(Mutex::new(capture)),
            snap: Mutex::new(SnapEngine::new(detector)),
            clipboard: Mutex::new(None),
            watermark: Mutex::new(None),
            audio: Mutex::new(None),
            ocr: Mutex::new(None),
            translate: Mutex::new(None),
            pins: Mutex::new(PinWindowManager::new()),
            history: Mutex::new(History::default()),
            error: Mutex::new(ErrorSlot::new()),
        })
    }

    // --- Error slot -----------------------------------------------------

    pub(crate) fn set_ok(&self) {
        self.error.lock().unwrap().set(Error::Ok);
    }

    pub(crate) fn set_error(&self, err: Error) {
        self.error.lock().unwrap().set(err);
    }

    /// Records `err` and returns it, for `?`-friendly call sites.
    pub(crate) fn fail(&self, err: Error) -> Error {
        self.set_error(err);
        err
    }

    pub fn last_error_code(&self) -> Error {
        self.error.lock().unwrap().code
    }

    /// A pointer valid until the next call on this context — the guard is
    /// dropped immediately after reading `.as_ptr()`, which is sound
    /// because the `CString`'s heap buffer is untouched until the next
    /// `set`, and per §1 a single context is never driven concurrently.
    pub fn last_error_message_ptr(&self) -> *const c_char {
        self.error.lock().unwrap().message.as_ptr()
    }

    // --- Screens ----------------------------------------------------------

    pub fn screen_count(&self) -> i32 {
        let count = self.capture.lock().unwrap().get_screens().len();
        self.set_ok();
        count as i32
    }

    pub fn screen_info(&self, index: u32) -> Result<ScreenInfo> {
        let screens = self.capture.lock().unwrap().get_screens();
        match screens.into_iter().find(|s| s.index == index) {
            Some(info) => {
                self.set_ok();
                Ok(info)
            }
            None => Err(self.fail(Error::InvalidParam)),
        }
    }

    // --- Capture ------------------------------------------------------------

    pub fn capture_screen(&self, index: u32) -> Option<Image> {
        let result = self.capture.lock().unwrap().capture_screen(index);
        self.record_capture_result(&result, || {
            let screens = self.capture.lock().unwrap().get_screens();
            screens.into_iter().find(|s| s.index == index).map(|s| (s.virtual_x, s.virtual_y, s.width, s.height))
        });
        result
    }

    pub fn capture_region(&self, x: i32, y: i32, width: u32, height: u32) -> Option<Image> {
        let result = self.capture.lock().unwrap().capture_region(x, y, width, height);
        self.record_capture_result(&result, || Some((x, y, width, height)));
        result
    }

    pub fn capture_window(&self, window_id: u64) -> Option<Image> {
        let result = self.capture.lock().unwrap().capture_window(window_id);
        if result.is_some() {
            self.set_ok();
        } else {
            self.set_error(Error::CaptureFailed);
        }
        result
    }

    /// Records a history entry for a successful region-shaped capture,
    /// then updates the error slot; `region` is only evaluated on success.
    fn record_capture_result(&self, result: &Option<Image>, region: impl FnOnce() -> Option<(i32, i32, u32, u32)>) {
        if result.is_some() {
            if let Some((x, y, w, h)) = region() {
                self.history.lock().unwrap().record(x, y, w as i32, h as i32);
            }
            self.set_ok();
        } else {
            self.set_error(Error::CaptureFailed);
        }
    }

    pub fn enumerate_windows(&self) -> Vec<WindowInfo> {
        let windows = self.capture.lock().unwrap().enumerate_windows();
        self.set_ok();
        windows
    }

    /// Hides every pin, sleeps briefly so platform compositors settle,
    /// captures, then restores each pin's prior visibility (not a blanket
    /// "show all", which would un-hide pins the caller had already
    /// hidden) — per §4.7's "equivalent to hide -> capture -> show".
    fn capture_excluding_pins<F: FnOnce(&Self) -> Option<Image>>(&self, capture: F) -> Option<Image> {
        let saved = self.pins.lock().unwrap().hide_all_remembering();
        thread::sleep(Duration::from_millis(1));
        let result = capture(self);
        self.pins.lock().unwrap().restore_visibility(saved);
        result
    }

    pub fn capture_screen_exclude_pins(&self, index: u32) -> Option<Image> {
        self.capture_excluding_pins(|ctx| ctx.capture_screen(index))
    }

    pub fn capture_region_exclude_pins(&self, x: i32, y: i32, width: u32, height: u32) -> Option<Image> {
        self.capture_excluding_pins(|ctx| ctx.capture_region(x, y, width, height))
    }

    // --- DPI ----------------------------------------------------------------

    pub fn enable_dpi_awareness(&self) -> Result<()> {
        if self.capture.lock().unwrap().enable_dpi_awareness() {
            self.set_ok();
            Ok(())
        } else {
            Err(self.fail(Error::NotSupported))
        }
    }

    pub fn dpi_info(&self, screen_index: u32) -> Result<DpiInfo> {
        self.screen_info(screen_index)?;
        let info = self.capture.lock().unwrap().get_dpi_info(screen_index);
        self.set_ok();
        Ok(info)
    }

    pub fn logical_to_physical(&self, screen_index: u32, logical_x: i32, logical_y: i32) -> Result<(i32, i32)> {
        let dpi = self.dpi_info(screen_index)?;
        Ok((
            (logical_x as f32 * dpi.scale_x).round() as i32,
            (logical_y as f32 * dpi.scale_y).round() as i32,
        ))
    }

    pub fn physical_to_logical(&self, screen_index: u32, physical_x: i32, physical_y: i32) -> Result<(i32, i32)> {
        let dpi = self.dpi_info(screen_index)?;
        let sx = if dpi.scale_x == 0.0 { 1.0 } else { dpi.scale_x };
        let sy = if dpi.scale_y == 0.0 { 1.0 } else { dpi.scale_y };
        Ok(((physical_x as f32 / sx).round() as i32, (physical_y as f32 / sy).round() as i32))
    }

    // --- Color picker / magnifier --------------------------------------------

    pub fn pick_color(&self, x: i32, y: i32) -> Result<Color> {
        let Some(image) = self.capture.lock().unwrap().capture_region(x, y, 1, 1) else {
            return Err(self.fail(Error::CaptureFailed));
        };
        let offset = image.pixel_offset(0, 0).ok_or_else(|| self.fail(Error::CaptureFailed))?;
        let data = image.data();
        self.set_ok();
        Ok(Color::new(data[offset + 2], data[offset + 1], data[offset], data[offset + 3]))
    }

    /// Captures a `(radius*2+1)` square centered on `(x, y)` and
    /// nearest-neighbor upscales it by `magnification`; both must fall
    /// within `radius > 0` / `magnification ∈ [2, 32]` or this returns
    /// `None` (§4.2/§6/§8 boundary behavior).
    pub fn get_magnifier(&self, x: i32, y: i32, radius: i32, magnification: i32) -> Option<Image> {
        if radius <= 0 || !(2..=32).contains(&magnification) {
            self.set_error(Error::InvalidParam);
            return None;
        }
        let magnification = magnification as u32;
        let diameter = (radius as u32) * 2 + 1;
        let source = self.capture.lock().unwrap().capture_region(x - radius, y - radius, diameter, diameter);
        let Some(source) = source else {
            self.set_error(Error::CaptureFailed);
            return None;
        };
        self.set_ok();
        Some(upscale_nearest(&source, magnification))
    }

    // --- Element detection / snapping ----------------------------------------

    pub fn detect_element(&self, x: i32, y: i32) -> Result<ElementInfo> {
        match self.snap.lock().unwrap().detect_element(x, y) {
            Some(info) => {
                self.set_ok();
                Ok(info)
            }
            None => Err(self.fail(Error::NoElement)),
        }
    }

    pub fn detect_elements(&self, x: i32, y: i32, max: usize) -> Vec<ElementInfo> {
        let elements = self.snap.lock().unwrap().detect_elements(x, y, max);
        self.set_ok();
        elements
    }

    pub fn snap_to_element(&self, x: i32, y: i32, snap_distance: i32) -> Result<Rect> {
        let distance = snap_distance.max(0) as f64;
        match self.snap.lock().unwrap().try_snap_with_distance(x, y, distance) {
            Some(rect) => {
                self.set_ok();
                Ok(rect)
            }
            None => Err(self.fail(Error::NoElement)),
        }
    }

    // --- History --------------------------------------------------------------

    pub fn history_count(&self) -> i32 {
        let count = self.history.lock().unwrap().len();
        self.set_ok();
        count as i32
    }

    pub fn history_get_entry(&self, index: usize) -> Result<HistoryEntry> {
        match self.history.lock().unwrap().get_entry(index) {
            Some(entry) => {
                self.set_ok();
                Ok(*entry)
            }
            None => Err(self.fail(Error::InvalidParam)),
        }
    }

    pub fn history_recapture(&self, history_id: i32) -> Option<Image> {
        let entry = match self.history.lock().unwrap().find_by_id(history_id) {
            Some(entry) => *entry,
            None => {
                self.set_error(Error::InvalidParam);
                return None;
            }
        };
        self.capture_region(entry.x, entry.y, entry.w as u32, entry.h as u32)
    }

    pub fn recapture_last(&self) -> Option<Image> {
        let entry = match self.history.lock().unwrap().get_entry(0) {
            Some(entry) => *entry,
            None => {
                self.set_error(Error::HistoryEmpty);
                return None;
            }
        };
        self.capture_region(entry.x, entry.y, entry.w as u32, entry.h as u32)
    }

    pub fn history_clear(&self) {
        self.history.lock().unwrap().clear();
        self.set_ok();
    }

    pub fn history_set_max_count(&self, max_count: i32) {
        if max_count > 0 {
            let _ = self.history.lock().unwrap().set_max_count(max_count as usize);
        }
        self.set_ok();
    }

    // --- Pin windows ------------------------------------------------------------

    pub fn pin_image(&self, image: Image, x: i32, y: i32) -> PinId {
        let id = self.pins.lock().unwrap().pin_image(image, x, y);
        self.set_ok();
        id
    }

    pub fn pin_text(&self, text: String, x: i32, y: i32) -> PinId {
        let size = ((text.chars().count() as u32 * 8).max(1), 20);
        let id = self.pins.lock().unwrap().pin_text(text, x, y, size);
        self.set_ok();
        id
    }

    pub fn pin_clipboard(&self, x: i32, y: i32) -> Result<PinId> {
        let result = self.with_clipboard(|reader| self.pins.lock().unwrap().pin_clipboard(reader, x, y));
        match result {
            Ok(id) => {
                self.set_ok();
                Ok(id)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn pin_destroy(&self, id: PinId) {
        let _ = self.pins.lock().unwrap().destroy_pin(id);
        self.set_ok();
    }

    pub fn pin_destroy_all(&self) {
        self.pins.lock().unwrap().destroy_all();
        self.set_ok();
    }

    pub fn pin_count(&self) -> i32 {
        let count = self.pins.lock().unwrap().count();
        self.set_ok();
        count as i32
    }

    pub fn pin_enumerate(&self) -> Vec<PinId> {
        let ids = self.pins.lock().unwrap().enumerate();
        self.set_ok();
        ids
    }

    pub fn pin_set_visible_all(&self, visible: bool) {
        self.pins.lock().unwrap().set_visible_all(visible);
        self.set_ok();
    }

    pub fn pin_duplicate(&self, id: PinId, dx: i32, dy: i32) -> Result<PinId> {
        match self.pins.lock().unwrap().duplicate(id, dx, dy) {
            Ok(new_id) => {
                self.set_ok();
                Ok(new_id)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Runs `f` against the pin manager, recording `Ok`/`Err` on the
    /// error slot; used by the FFI layer's per-pin operations so every
    /// pin accessor shares one error-bookkeeping path.
    pub fn with_pins<R>(&self, f: impl FnOnce(&mut PinWindowManager) -> Result<R>) -> Result<R> {
        let mut pins = self.pins.lock().unwrap();
        match f(&mut pins) {
            Ok(value) => {
                self.set_ok();
                Ok(value)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn pin_process_events(&self) -> i32 {
        self.pin_count()
    }

    // --- Clipboard --------------------------------------------------------------

    fn with_clipboard<R>(&self, f: impl FnOnce(&dyn ClipboardReader) -> R) -> R {
        let mut guard = self.clipboard.lock().unwrap();
        if guard.is_none() {
            *guard = Some(create_platform_clipboard());
        }
        f(guard.as_deref().unwrap())
    }

    pub fn clipboard_format(&self) -> ClipboardFormat {
        let format = self.with_clipboard(|reader| reader.get_format());
        self.set_ok();
        format
    }

    pub fn clipboard_get_image(&self) -> Option<Image> {
        let image = self.with_clipboard(|reader| reader.get_image());
        if image.is_some() {
            self.set_ok();
        } else {
            self.set_error(Error::ClipboardEmpty);
        }
        image
    }

    pub fn clipboard_get_text(&self) -> Option<String> {
        let text = self.with_clipboard(|reader| reader.get_text());
        if text.is_some() {
            self.set_ok();
        } else {
            self.set_error(Error::ClipboardEmpty);
        }
        text
    }

    // --- Watermark ----------------------------------------------------------

    fn with_watermark<R>(&self, f: impl FnOnce(&mut dyn WatermarkRenderer) -> R) -> R {
        let mut guard = self.watermark.lock().unwrap();
        if guard.is_none() {
            *guard = Some(create_platform_watermark_renderer());
        }
        f(guard.as_deref_mut().unwrap())
    }

    pub fn watermark_is_supported(&self) -> bool {
        self.set_ok();
        true
    }

    pub fn watermark_apply_text(&self, image: &mut Image, config: &TextWatermarkConfig) {
        self.with_watermark(|renderer| renderer.apply_text_watermark(image, config));
        self.set_ok();
    }

    pub fn watermark_apply_image(&self, image: &mut Image, overlay: &Image, x: i32, y: i32, opacity: f32) {
        self.with_watermark(|renderer| renderer.apply_image_watermark(image, overlay, x, y, opacity));
        self.set_ok();
    }

    pub fn watermark_apply_tiled_text(
        &self,
        image: &mut Image,
        config: &TextWatermarkConfig,
        angle_deg: f32,
        sx: u32,
        sy: u32,
    ) {
        self.with_watermark(|renderer| renderer.apply_tiled_text_watermark(image, config, angle_deg, sx, sy));
        self.set_ok();
    }

    // --- Audio ----------------------------------------------------------------

    fn with_audio<R>(&self, f: impl FnOnce(&mut dyn AudioBackend) -> R) -> R {
        let mut guard = self.audio.lock().unwrap();
        if guard.is_none() {
            *guard = Some(create_platform_audio_backend());
        }
        f(guard.as_deref_mut().unwrap())
    }

    pub fn audio_is_supported(&self) -> bool {
        let supported = self.with_audio(|backend| backend.is_supported());
        self.set_ok();
        supported
    }

    pub fn audio_enumerate_devices(&self) -> Vec<AudioDeviceInfo> {
        let devices = self.with_audio(|backend| backend.enumerate_devices());
        self.set_ok();
        devices
    }

    pub fn audio_get_default_device(&self, is_input: bool) -> Result<AudioDeviceInfo> {
        match self.with_audio(|backend| backend.get_default_device(is_input)) {
            Some(device) => {
                self.set_ok();
                Ok(device)
            }
            None => Err(self.fail(Error::NotSupported)),
        }
    }

    // --- OCR --------------------------------------------------------------------

    fn with_ocr<R>(&self, f: impl FnOnce(&dyn OcrBackend) -> R) -> R {
        let mut guard = self.ocr.lock().unwrap();
        if guard.is_none() {
            *guard = Some(Box::new(NullOcrBackend));
        }
        f(guard.as_deref().unwrap())
    }

    pub fn ocr_is_supported(&self) -> bool {
        let supported = self.with_ocr(|backend| backend.is_supported());
        self.set_ok();
        supported
    }

    pub fn ocr_recognize(&self, image: &Image, language: Option<&str>) -> Result<String> {
        match self.with_ocr(|backend| backend.recognize(image, language)) {
            Ok(text) => {
                self.set_ok();
                Ok(text)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // --- Translation --------------------------------------------------------------

    fn with_translate<R>(&self, f: impl FnOnce(&mut dyn TranslateBackend) -> R) -> R {
        let mut guard = self.translate.lock().unwrap();
        if guard.is_none() {
            *guard = Some(Box::new(NullTranslateBackend::new()));
        }
        f(guard.as_deref_mut().unwrap())
    }

    pub fn translate_set_config(&self, config: TranslateConfig) {
        self.with_translate(|backend| backend.set_config(config));
        self.set_ok();
    }

    pub fn translate_is_supported(&self) -> bool {
        let supported = self.with_translate(|backend| backend.is_supported());
        self.set_ok();
        supported
    }

    pub fn translate_text(&self, text: &str, source_lang: Option<&str>, target_lang: &str) -> Result<String> {
        match self.with_translate(|backend| backend.translate(text, source_lang, target_lang)) {
            Ok(translated) => {
                self.set_ok();
                Ok(translated)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // --- Annotation ---------------------------------------------------------------

    /// Deep-copies `base_image` (via [`crate::annotation::AnnotationSession::new`])
    /// and starts an idle session backed by the software reference renderer
    /// (§4.4 — annotation sessions are independently owned handles; no
    /// platform annotation renderer is part of this crate's dependency graph,
    /// per §9's "platform adapters" design note, so the one software
    /// implementation always serves).
    pub fn create_annotation_session(&self, base_image: Image) -> crate::annotation::AnnotationSession {
        self.set_ok();
        crate::annotation::AnnotationSession::new(base_image, Box::new(crate::annotation::renderer::SoftwareRenderer::new()))
    }

    // --- Recorder ---------------------------------------------------------------

    pub fn recorder_is_supported(&self) -> bool {
        self.set_ok();
        true
    }

    /// Builds a [`RecorderBackend`] wired to this context's shared capture
    /// backend (via [`SharedCapture`]), watermark renderer, and audio
    /// backend. The encoder is always [`NullEncoder`] — no real video
    /// codec is part of this crate's dependency graph (§9, Non-goals).
    pub fn create_recorder(&self, config: RecordConfig) -> Result<RecorderBackend> {
        let shared_capture: Arc<dyn CaptureBackend> = Arc::new(SharedCapture(self.capture.clone()));
        let watermark = Some(create_platform_watermark_renderer());
        let audio = if matches!(config.audio, AudioSource::None) {
            None
        } else {
            Some(create_platform_audio_backend())
        };

        let result =
            RecorderBackend::initialize(config, Box::new(NullEncoder::new()), Some(shared_capture), watermark, audio);
        match result {
            Ok(recorder) => {
                self.set_ok();
                Ok(recorder)
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}

/// Nearest-neighbor upscale by an integer `factor`.
fn upscale_nearest(source: &Image, factor: u32) -> Image {
    let (src_w, src_h) = (source.width(), source.height());
    let (dst_w, dst_h) = (src_w * factor, src_h * factor);
    let mut dest = Image::create(dst_w, dst_h, PixelFormat::Bgra8).expect("positive dimensions");
    for dy in 0..dst_h {
        let sy = dy / factor;
        for dx in 0..dst_w {
            let sx = dx / factor;
            let src_off = source.pixel_offset(sx, sy).unwrap();
            let dst_off = dest.pixel_offset(dx, dy).unwrap();
            let pixel = [source.data()[src_off], source.data()[src_off + 1], source.data()[src_off + 2], source.data()[src_off + 3]];
            dest.data_mut()[dst_off..dst_off + 4].copy_from_slice(&pixel);
        }
    }
    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Region;
    use crate::pin::PinBackend;

    #[test]
    fn new_context_reports_one_default_screen() {
        let ctx = Context::new();
        assert_eq!(ctx.screen_count(), 1);
        assert_eq!(ctx.last_error_code(), Error::Ok);
    }

    #[test]
    fn screen_info_out_of_range_sets_invalid_param() {
        let ctx = Context::new();
        assert!(ctx.screen_info(99).is_err());
        assert_eq!(ctx.last_error_code(), Error::InvalidParam);
    }

    #[test]
    fn capture_region_records_history_entry() {
        let ctx = Context::new();
        assert_eq!(ctx.history_count(), 0);
        let image = ctx.capture_region(0, 0, 10, 10).unwrap();
        assert_eq!((image.width(), image.height()), (10, 10));
        assert_eq!(ctx.history_count(), 1);
    }

    #[test]
    fn recapture_last_uses_most_recent_history_entry() {
        let ctx = Context::new();
        ctx.capture_region(5, 5, 8, 8);
        let recaptured = ctx.recapture_last().unwrap();
        assert_eq!((recaptured.width(), recaptured.height()), (8, 8));
    }

    #[test]
    fn recapture_last_fails_when_history_empty() {
        let ctx = Context::new();
        assert!(ctx.recapture_last().is_none());
        assert_eq!(ctx.last_error_code(), Error::HistoryEmpty);
    }

    #[test]
    fn pick_color_reads_synthesized_pixel() {
        let ctx = Context::new();
        let color = ctx.pick_color(3, 7).unwrap();
        assert_eq!(color.r, 0);
        assert_eq!(color.a, 255);
    }

    #[test]
    fn magnifier_scales_output_by_factor() {
        let ctx = Context::new();
        let image = ctx.get_magnifier(10, 10, 2, 4).unwrap();
        assert_eq!(image.width(), 5 * 4);
        assert_eq!(image.height(), 5 * 4);
    }

    #[test]
    fn magnifier_rejects_non_positive_radius() {
        let ctx = Context::new();
        assert!(ctx.get_magnifier(10, 10, 0, 4).is_none());
        assert_eq!(ctx.last_error_code(), Error::InvalidParam);
    }

    #[test]
    fn magnifier_rejects_out_of_range_magnification() {
        let ctx = Context::new();
        assert!(ctx.get_magnifier(10, 10, 2, 1).is_none());
        assert_eq!(ctx.last_error_code(), Error::InvalidParam);
        assert!(ctx.get_magnifier(10, 10, 2, 33).is_none());
        assert_eq!(ctx.last_error_code(), Error::InvalidParam);
    }

    #[test]
    fn capture_exclude_pins_restores_prior_visibility() {
        let ctx = Context::new();
        let image = ctx.pin_image(Image::create(4, 4, PixelFormat::Bgra8).unwrap(), 0, 0);
        ctx.with_pins(|pins| {
            pins.get_backend_mut(image).unwrap().set_visible(false);
            Ok(())
        })
        .unwrap();

        ctx.capture_screen_exclude_pins(0);

        let visible = ctx.with_pins(|pins| Ok(pins.get_backend(image).unwrap().visible())).unwrap();
        assert!(!visible);
    }

    #[test]
    fn detect_element_fails_without_a_platform_detector() {
        let ctx = Context::new();
        assert!(ctx.detect_element(0, 0).is_err());
        assert_eq!(ctx.last_error_code(), Error::NoElement);
    }

    #[test]
    fn dpi_conversion_round_trips_at_default_scale() {
        let ctx = Context::new();
        let (px, py) = ctx.logical_to_physical(0, 100, 200).unwrap();
        assert_eq!((px, py), (100, 200));
        let (lx, ly) = ctx.physical_to_logical(0, px, py).unwrap();
        assert_eq!((lx, ly), (100, 200));
    }

    #[test]
    fn create_recorder_wires_the_shared_capture_backend() {
        let ctx = Context::new();
        let dir = tempfile::tempdir().unwrap();
        let config = RecordConfig {
            output_path: dir.path().join("out.mp4").to_str().unwrap().to_string(),
            region: Region { x: 0, y: 0, width: 64, height: 64 },
            auto_capture: false,
            ..Default::default()
        };
        let recorder = ctx.create_recorder(config);
        assert!(recorder.is_ok());
    }

    #[test]
    fn ocr_and_translate_report_unsupported_by_default() {
        let ctx = Context::new();
        assert!(!ctx.ocr_is_supported());
        assert!(!ctx.translate_is_supported());
    }
}
