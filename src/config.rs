//! Owned, Rust-native counterparts of the config structs the C header packs
//! as POD (`PixelGrabTextWatermarkConfig`, `PixelGrabRecordConfig`).
//!
//! Grounded on the teacher's `config.rs` (`GosubEngineConfig`,
//! `TabGroupConfig`): plain structs, a `Default` impl encoding the
//! zero-means-default convention the C header documents per field.

use crate::color::Color;

/// Anchor for a text watermark; `Custom` consults `x`/`y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum WatermarkPosition {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
    Center = 4,
    Custom = 5,
}

impl Default for WatermarkPosition {
    fn default() -> Self {
        WatermarkPosition::BottomRight
    }
}

/// Configuration for a single text watermark pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TextWatermarkConfig {
    pub text: String,
    /// `None` selects the renderer's system default font.
    pub font_name: Option<String>,
    /// 0 means "use the default" (16pt).
    pub font_size: i32,
    pub color: Color,
    pub position: WatermarkPosition,
    /// Only consulted when `position == Custom`.
    pub x: i32,
    pub y: i32,
    /// 0 means "use the default" (10px).
    pub margin: i32,
    /// Degrees, 0 = horizontal.
    pub rotation: f32,
}

impl Default for TextWatermarkConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_name: None,
            font_size: 0,
            color: Color::new(255, 255, 255, 255),
            position: WatermarkPosition::default(),
            x: 0,
            y: 0,
            margin: 0,
            rotation: 0.0,
        }
    }
}

impl TextWatermarkConfig {
    /// Resolve the zero-means-default fields to their effective values.
    pub fn effective_font_size(&self) -> i32 {
        if self.font_size <= 0 {
            16
        } else {
            self.font_size
        }
    }

    pub fn effective_margin(&self) -> i32 {
        if self.margin <= 0 {
            10
        } else {
            self.margin
        }
    }
}

/// Audio capture source for a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AudioSource {
    None = 0,
    Microphone = 1,
    System = 2,
    Both = 3,
}

impl Default for AudioSource {
    fn default() -> Self {
        AudioSource::None
    }
}

/// GPU-acceleration preference for the recorder's capture/encode path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuHint {
    /// Try GPU, silently fall back to CPU. Default.
    Auto,
    /// Require GPU; fail if unavailable.
    PreferGpu,
    /// Never use GPU.
    ForceCpu,
}

impl Default for GpuHint {
    fn default() -> Self {
        GpuHint::Auto
    }
}

impl From<i32> for GpuHint {
    fn from(value: i32) -> Self {
        match value {
            1 => GpuHint::PreferGpu,
            v if v < 0 => GpuHint::ForceCpu,
            _ => GpuHint::Auto,
        }
    }
}

/// A capture region in target coordinates. A zero-sized region means
/// "the primary screen", resolved by the recorder against the capture
/// backend at `initialize` time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Full configuration for a recording session (§4.10).
#[derive(Debug, Clone, Default)]
pub struct RecordConfig {
    pub output_path: String,
    pub region: Region,
    /// 0 means "use the default" (30fps); valid range after resolution is 1..=60.
    pub fps: i32,
    /// 0 means "use the default" (4_000_000 bps).
    pub bitrate_bps: i32,
    pub watermark: Option<TextWatermarkConfig>,
    pub user_watermark: Option<TextWatermarkConfig>,
    pub auto_capture: bool,
    pub audio: AudioSource,
    pub audio_device_id: Option<String>,
    /// 0 means "use the default" (44100 Hz).
    pub audio_sample_rate: i32,
    pub gpu_hint: GpuHint,
}

impl RecordConfig {
    /// Resolved frame rate, clamped into the documented 1..=60 range.
    pub fn effective_fps(&self) -> u32 {
        let fps = if self.fps <= 0 { 30 } else { self.fps };
        fps.clamp(1, 60) as u32
    }

    pub fn effective_bitrate_bps(&self) -> u32 {
        if self.bitrate_bps <= 0 {
            4_000_000
        } else {
            self.bitrate_bps as u32
        }
    }

    pub fn effective_audio_sample_rate(&self) -> u32 {
        if self.audio_sample_rate <= 0 {
            44_100
        } else {
            self.audio_sample_rate as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fields_resolve_to_documented_defaults() {
        let cfg = RecordConfig::default();
        assert_eq!(cfg.effective_fps(), 30);
        assert_eq!(cfg.effective_bitrate_bps(), 4_000_000);
        assert_eq!(cfg.effective_audio_sample_rate(), 44_100);
        assert_eq!(cfg.gpu_hint, GpuHint::Auto);
    }

    #[test]
    fn fps_is_clamped_to_documented_range() {
        let mut cfg = RecordConfig::default();
        cfg.fps = 1000;
        assert_eq!(cfg.effective_fps(), 60);
    }

    #[test]
    fn gpu_hint_from_c_abi_int() {
        assert_eq!(GpuHint::from(0), GpuHint::Auto);
        assert_eq!(GpuHint::from(1), GpuHint::PreferGpu);
        assert_eq!(GpuHint::from(-1), GpuHint::ForceCpu);
    }

    #[test]
    fn text_watermark_defaults() {
        let cfg = TextWatermarkConfig::default();
        assert_eq!(cfg.effective_font_size(), 16);
        assert_eq!(cfg.effective_margin(), 10);
    }
}
