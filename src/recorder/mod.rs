//! Recorder pipeline (§4.10, §5): capture → watermark → encode, with
//! explicit pause/resume, frame pacing, and a manual "push frames"
//! alternative to the auto-capture thread.
//!
//! The state word is an `AtomicU8` read by the capture thread's hot loop;
//! the encoder and frame bookkeeping sit behind a `Mutex`, matching
//! spec.md §5's own prescription ("single atomic state word plus a mutex
//! around the encoder submission").

pub mod encoder;

pub use encoder::{Encoder, FrameTiming, NullEncoder};

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::audio::AudioBackend;
use crate::capture::CaptureBackend;
use crate::config::{GpuHint, RecordConfig};
use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat};
use crate::watermark::WatermarkRenderer;

/// Recorder lifecycle state, numerically matching `PixelGrabRecordState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecorderState {
    Idle = 0,
    Recording = 1,
    Paused = 2,
    Stopped = 3,
}

impl RecorderState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RecorderState::Recording,
            2 => RecorderState::Paused,
            3 => RecorderState::Stopped,
            _ => RecorderState::Idle,
        }
    }
}

fn round_up_even(value: u32) -> u32 {
    if value % 2 == 0 {
        value
    } else {
        value + 1
    }
}

/// Bounded wait for the encoder to drain on `Stop` (spec.md §4.10).
const STOP_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

struct Inner {
    encoder: Box<dyn Encoder>,
    config: RecordConfig,
    width: u32,
    height: u32,
    frame_count: u64,
    audio_backend: Option<Box<dyn AudioBackend>>,
    watermark_renderer: Option<Box<dyn WatermarkRenderer>>,
}

impl Inner {
    fn pts_step_us(&self) -> i64 {
        1_000_000 / self.config.effective_fps() as i64
    }

    /// Applies the system watermark then the user watermark (§9 Open
    /// Questions: two independent, sequential passes).
    fn apply_watermarks(&mut self, frame: &mut Image) {
        let Some(renderer) = self.watermark_renderer.as_mut() else {
            return;
        };
        if let Some(system) = self.config.watermark.as_ref() {
            renderer.apply_text_watermark(frame, system);
        }
        if let Some(user) = self.config.user_watermark.as_ref() {
            renderer.apply_text_watermark(frame, user);
        }
    }

    fn submit(&mut self, frame: &Image) -> Result<()> {
        let timing = FrameTiming {
            pts_us: self.frame_count as i64 * self.pts_step_us(),
            duration_us: self.pts_step_us(),
        };
        self.encoder.submit_video_frame(frame, timing)?;
        self.frame_count += 1;
        Ok(())
    }
}

/// The capture→watermark→encode pipeline described in spec.md §4.10.
pub struct RecorderBackend {
    state: Arc<AtomicU8>,
    inner: Arc<Mutex<Inner>>,
    capture_thread: Option<JoinHandle<()>>,
    capture_backend: Option<Arc<dyn CaptureBackend>>,
    auto_capture: bool,
    start_wall_clock: Option<Instant>,
}

impl RecorderBackend {
    /// Initializes the pipeline: computes effective (even) dimensions,
    /// opens the encoder, and — in auto mode — retains the capture
    /// backend and watermark renderer for the background thread.
    pub fn initialize(
        config: RecordConfig,
        mut encoder: Box<dyn Encoder>,
        capture_backend: Option<Arc<dyn CaptureBackend>>,
        watermark_renderer: Option<Box<dyn WatermarkRenderer>>,
        mut audio_backend: Option<Box<dyn AudioBackend>>,
    ) -> Result<Self> {
        let (req_w, req_h) = if config.region.width > 0 && config.region.height > 0 {
            (config.region.width, config.region.height)
        } else {
            let backend = capture_backend.as_ref().ok_or(Error::InvalidParam)?;
            let primary = backend
                .get_screens()
                .into_iter()
                .find(|s| s.is_primary)
                .ok_or(Error::InvalidParam)?;
            (primary.width, primary.height)
        };
        let width = round_up_even(req_w);
        let height = round_up_even(req_h);

        let has_audio = !matches!(config.audio, crate::config::AudioSource::None);
        if has_audio {
            let backend = audio_backend.as_mut().ok_or(Error::NotSupported)?;
            backend.initialize(
                config.audio_device_id.as_deref(),
                config.audio,
                config.effective_audio_sample_rate(),
            )?;
            backend.start()?;
        } else {
            audio_backend = None;
        }

        encoder.open(
            &config.output_path,
            width,
            height,
            config.effective_fps(),
            config.effective_bitrate_bps(),
            config.gpu_hint,
            has_audio,
        )?;

        let auto_capture = config.auto_capture;
        let watermark_renderer = if auto_capture { watermark_renderer } else { None };
        let capture_backend = if auto_capture { capture_backend } else { None };

        Ok(Self {
            state: Arc::new(AtomicU8::new(RecorderState::Idle as u8)),
            inner: Arc::new(Mutex::new(Inner {
                encoder,
                config,
                width,
                height,
                frame_count: 0,
                audio_backend,
                watermark_renderer,
            })),
            capture_thread: None,
            capture_backend,
            auto_capture,
            start_wall_clock: None,
        })
    }

    pub fn state(&self) -> RecorderState {
        RecorderState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: RecorderState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// `Idle -> Recording`. Resets counters, records wall-clock start, and
    /// in auto mode spawns the capture thread.
    pub fn start(&mut self) -> Result<()> {
        match self.state() {
            RecorderState::Idle => {}
            RecorderState::Stopped => return Err(Error::RecordFailed),
            _ => return Err(Error::RecordInProgress),
        }

        {
            let mut inner = self.inner.lock().unwrap();
            inner.frame_count = 0;
        }
        self.start_wall_clock = Some(Instant::now());
        self.set_state(RecorderState::Recording);

        if self.auto_capture {
            self.spawn_capture_thread();
        }
        Ok(())
    }

    fn spawn_capture_thread(&mut self) {
        let state = self.state.clone();
        let inner = self.inner.clone();
        let capture_backend = self.capture_backend.clone();
        let (region, fps) = {
            let guard = inner.lock().unwrap();
            (
                (guard.config.region.x, guard.config.region.y, guard.width, guard.height),
                guard.config.effective_fps(),
            )
        };
        let tick = Duration::from_micros(1_000_000 / fps as u64);

        self.capture_thread = Some(std::thread::spawn(move || {
            loop {
                let current = RecorderState::from_u8(state.load(Ordering::Acquire));
                if current == RecorderState::Stopped {
                    break;
                }
                if current == RecorderState::Recording {
                    if let Some(backend) = capture_backend.as_ref() {
                        if let Some(mut frame) = backend.capture_region(region.0, region.1, region.2, region.3) {
                            let mut guard = inner.lock().unwrap();
                            guard.apply_watermarks(&mut frame);
                            let _ = guard.submit(&frame);
                        }
                    }
                }
                std::thread::sleep(tick);
            }
        }));
    }

    /// `Recording -> Paused`.
    pub fn pause(&mut self) -> Result<()> {
        if self.state() != RecorderState::Recording {
            return Err(Error::RecordFailed);
        }
        self.set_state(RecorderState::Paused);
        Ok(())
    }

    /// `Paused -> Recording`.
    pub fn resume(&mut self) -> Result<()> {
        if self.state() != RecorderState::Paused {
            return Err(Error::RecordFailed);
        }
        self.set_state(RecorderState::Recording);
        Ok(())
    }

    /// Signals end-of-stream, joins the capture thread (if any), drains
    /// the encoder within [`STOP_DRAIN_TIMEOUT`], and stops audio capture.
    pub fn stop(&mut self) -> Result<()> {
        match self.state() {
            RecorderState::Recording | RecorderState::Paused => {}
            _ => return Err(Error::RecordFailed),
        }
        self.set_state(RecorderState::Stopped);

        if let Some(handle) = self.capture_thread.take() {
            let _ = handle.join();
        }

        let drain_started = Instant::now();
        let result = {
            let mut inner = self.inner.lock().unwrap();
            if let Some(audio) = inner.audio_backend.as_mut() {
                let _ = audio.stop();
            }
            inner.encoder.finish()
        };
        if drain_started.elapsed() > STOP_DRAIN_TIMEOUT {
            return Err(Error::RecordFailed);
        }
        result
    }

    /// Manual-mode frame submission. Validates the frame is `Bgra8` and
    /// matches the configured (rounded-even) dimensions (spec.md §9 Open
    /// Questions: the source doesn't validate channel order, this crate
    /// does, to avoid silent corruption).
    pub fn write_frame(&mut self, frame: &Image) -> Result<()> {
        if self.auto_capture {
            return Err(Error::InvalidParam);
        }
        match self.state() {
            RecorderState::Recording => {}
            RecorderState::Paused => return Err(Error::RecordFailed),
            _ => return Err(Error::RecordFailed),
        }
        if frame.format() != PixelFormat::Bgra8 {
            return Err(Error::InvalidParam);
        }
        let mut inner = self.inner.lock().unwrap();
        if frame.width() != inner.width || frame.height() != inner.height {
            return Err(Error::InvalidParam);
        }
        let mut owned = frame.clone();
        inner.apply_watermarks(&mut owned);
        inner.submit(&owned)
    }

    /// No-op in manual mode; in auto mode this is already handled by
    /// `start`/`stop`, so it is a defensive no-op here too — the spec
    /// names the capture thread as owned by `start`/`stop`, not a
    /// separately toggled loop.
    pub fn start_capture_loop(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn stop_capture_loop(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn frame_count(&self) -> u64 {
        self.inner.lock().unwrap().frame_count
    }

    pub fn duration_ms(&self) -> i64 {
        let fps = self.inner.lock().unwrap().config.effective_fps() as i64;
        (self.frame_count() as i64) * 1000 / fps
    }

    pub fn used_gpu(&self) -> bool {
        self.inner.lock().unwrap().encoder.used_gpu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Region;

    fn manual_config(path: &str, width: u32, height: u32) -> RecordConfig {
        RecordConfig {
            output_path: path.to_string(),
            region: Region { x: 0, y: 0, width, height },
            fps: 15,
            bitrate_bps: 2_000_000,
            auto_capture: false,
            ..Default::default()
        }
    }

    fn image(width: u32, height: u32) -> Image {
        Image::create(width, height, PixelFormat::Bgra8).unwrap()
    }

    #[test]
    fn manual_recording_of_thirty_frames_matches_scenario_four() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let config = manual_config(path.to_str().unwrap(), 1080, 720);
        let mut recorder = RecorderBackend::initialize(
            config,
            Box::new(NullEncoder::new()),
            None,
            None,
            None,
        )
        .unwrap();

        recorder.start().unwrap();
        assert_eq!(recorder.state(), RecorderState::Recording);

        let frame = image(1080, 720);
        for _ in 0..30 {
            recorder.write_frame(&frame).unwrap();
        }

        recorder.stop().unwrap();
        assert_eq!(recorder.state(), RecorderState::Stopped);
        assert_eq!(recorder.frame_count(), 30);
        assert_eq!(recorder.duration_ms(), 30 * 1000 / 15);
        assert!(path.exists());
    }

    #[test]
    fn odd_dimensions_round_up_to_even() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let config = manual_config(path.to_str().unwrap(), 101, 51);
        let recorder = RecorderBackend::initialize(
            config,
            Box::new(NullEncoder::new()),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(recorder.inner.lock().unwrap().width, 102);
        assert_eq!(recorder.inner.lock().unwrap().height, 52);
    }

    #[test]
    fn write_frame_rejects_wrong_format_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let config = manual_config(path.to_str().unwrap(), 64, 64);
        let mut recorder = RecorderBackend::initialize(
            config,
            Box::new(NullEncoder::new()),
            None,
            None,
            None,
        )
        .unwrap();
        recorder.start().unwrap();

        let wrong_size = image(32, 32);
        assert!(matches!(recorder.write_frame(&wrong_size), Err(Error::InvalidParam)));

        let wrong_format = Image::create(64, 64, PixelFormat::Rgba8).unwrap();
        assert!(matches!(recorder.write_frame(&wrong_format), Err(Error::InvalidParam)));
    }

    #[test]
    fn pause_discards_manual_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let config = manual_config(path.to_str().unwrap(), 64, 64);
        let mut recorder = RecorderBackend::initialize(
            config,
            Box::new(NullEncoder::new()),
            None,
            None,
            None,
        )
        .unwrap();
        recorder.start().unwrap();
        recorder.pause().unwrap();
        let frame = image(64, 64);
        assert!(matches!(recorder.write_frame(&frame), Err(Error::RecordFailed)));
        recorder.resume().unwrap();
        recorder.write_frame(&frame).unwrap();
        assert_eq!(recorder.frame_count(), 1);
    }

    #[test]
    fn state_machine_forbids_backward_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let config = manual_config(path.to_str().unwrap(), 64, 64);
        let mut recorder = RecorderBackend::initialize(
            config,
            Box::new(NullEncoder::new()),
            None,
            None,
            None,
        )
        .unwrap();
        assert!(matches!(recorder.pause(), Err(Error::RecordFailed)));
        recorder.start().unwrap();
        assert!(matches!(recorder.start(), Err(Error::RecordInProgress)));
        recorder.stop().unwrap();
        assert!(matches!(recorder.start(), Err(Error::RecordFailed)));
        assert!(matches!(recorder.stop(), Err(Error::RecordFailed)));
    }

    #[test]
    fn prefer_gpu_without_gpu_support_fails_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let mut config = manual_config(path.to_str().unwrap(), 64, 64);
        config.gpu_hint = GpuHint::PreferGpu;
        let result = RecorderBackend::initialize(config, Box::new(NullEncoder::new()), None, None, None);
        assert!(matches!(result, Err(Error::EncoderNotAvailable)));
    }
}
