//! Audio capture adapter (§4.8), ported from
//! `original_source/src/core/audio_backend.h`.

use crate::config::AudioSource;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDeviceInfo {
    pub id: String,
    pub name: String,
    pub is_default: bool,
    /// `true` for a microphone, `false` for a system/loopback device.
    pub is_input: bool,
}

/// Captured PCM: interleaved 16-bit little-endian samples at the
/// negotiated sample rate and channel count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioSamples {
    pub data: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

pub trait AudioBackend: Send + Sync {
    fn is_supported(&self) -> bool;

    fn enumerate_devices(&self) -> Vec<AudioDeviceInfo>;

    fn get_default_device(&self, is_input: bool) -> Option<AudioDeviceInfo>;

    /// Opens the requested device; `source == System`/`Both` requests
    /// loopback capture.
    fn initialize(&mut self, device_id: Option<&str>, source: AudioSource, sample_rate: u32) -> Result<()>;

    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;

    /// Drains the captured buffer and clears the backend's queue;
    /// callers pull cooperatively.
    fn read_samples(&mut self) -> AudioSamples;

    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
}

/// Reports unsupported for every operation — the default backend,
/// matching the design note that a stub reporting `NotSupported` is an
/// acceptable backend.
pub struct NullAudioBackend;

impl AudioBackend for NullAudioBackend {
    fn is_supported(&self) -> bool {
        false
    }

    fn enumerate_devices(&self) -> Vec<AudioDeviceInfo> {
        Vec::new()
    }

    fn get_default_device(&self, _is_input: bool) -> Option<AudioDeviceInfo> {
        None
    }

    fn initialize(&mut self, _device_id: Option<&str>, _source: AudioSource, _sample_rate: u32) -> Result<()> {
        Err(Error::NotSupported)
    }

    fn start(&mut self) -> Result<()> {
        Err(Error::NotSupported)
    }

    fn stop(&mut self) -> Result<()> {
        Err(Error::NotSupported)
    }

    fn read_samples(&mut self) -> AudioSamples {
        AudioSamples::default()
    }

    fn sample_rate(&self) -> u32 {
        0
    }

    fn channels(&self) -> u16 {
        0
    }
}

/// A supported backend that synthesizes silence, so the recorder's
/// audio-muxing path is exercisable in tests without a real OS device.
pub struct SilentAudioBackend {
    sample_rate: u32,
    channels: u16,
    running: bool,
    frames_since_read: u32,
}

impl SilentAudioBackend {
    pub fn new() -> Self {
        Self { sample_rate: 0, channels: 2, running: false, frames_since_read: 0 }
    }

    /// Advances simulated capture time by `frames`, each `channels()`
    /// samples wide; tests use this instead of a real capture thread.
    pub fn advance(&mut self, frames: u32) {
        if self.running {
            self.frames_since_read += frames;
        }
    }
}

impl Default for SilentAudioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for SilentAudioBackend {
    fn is_supported(&self) -> bool {
        true
    }

    fn enumerate_devices(&self) -> Vec<AudioDeviceInfo> {
        vec![AudioDeviceInfo {
            id: "silent-0".to_string(),
            name: "Silent Device".to_string(),
            is_default: true,
            is_input: true,
        }]
    }

    fn get_default_device(&self, is_input: bool) -> Option<AudioDeviceInfo> {
        Some(AudioDeviceInfo {
            id: "silent-0".to_string(),
            name: "Silent Device".to_string(),
            is_default: true,
            is_input,
        })
    }

    fn initialize(&mut self, _device_id: Option<&str>, _source: AudioSource, sample_rate: u32) -> Result<()> {
        self.sample_rate = if sample_rate == 0 { 44_100 } else { sample_rate };
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    fn read_samples(&mut self) -> AudioSamples {
        let count = self.frames_since_read as usize * self.channels as usize;
        self.frames_since_read = 0;
        AudioSamples {
            data: vec![0i16; count],
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }
}

/// Resolves the platform audio backend at build time; see
/// [`crate::capture::create_platform_capture_backend`] for the pattern.
/// Unlike capture, no in-tree platform backend exists, so this resolves
/// to the stub that reports `NotSupported` — a real backend would swap
/// this out, not the call sites.
pub fn create_platform_audio_backend() -> Box<dyn AudioBackend> {
    Box::new(NullAudioBackend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_backend_reports_not_supported() {
        let mut backend = NullAudioBackend;
        assert!(!backend.is_supported());
        assert!(matches!(
            backend.initialize(None, AudioSource::Microphone, 44_100),
            Err(Error::NotSupported)
        ));
    }

    #[test]
    fn silent_backend_produces_zeroed_interleaved_samples() {
        let mut backend = SilentAudioBackend::new();
        backend.initialize(None, AudioSource::System, 0).unwrap();
        assert_eq!(backend.sample_rate(), 44_100);
        backend.start().unwrap();
        backend.advance(10);
        let samples = backend.read_samples();
        assert_eq!(samples.data.len(), 10 * backend.channels() as usize);
        assert!(samples.data.iter().all(|&s| s == 0));
    }
}
