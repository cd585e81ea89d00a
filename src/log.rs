//! Process-global logging: a level filter plus an optional user callback.
//!
//! Grounded on `original_source/src/core/logger.h` and `callback_sink.h`:
//! the library always emits through the `log` facade (as the teacher crate
//! does), and additionally forwards the same events, synchronously, to a
//! user-registered callback for embedders that don't set up a `log`
//! subscriber of their own.

use lazy_static::lazy_static;
use std::sync::RwLock;

/// Severity levels, numerically matching `PixelGrabLogLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info | LogLevel::Fatal => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// A sink receiving `(level, message)` pairs. Implemented by the FFI layer
/// to bridge to a C function pointer; usable directly from Rust too.
pub trait LogCallback: Send + Sync {
    fn on_log(&self, level: LogLevel, message: &str);
}

struct State {
    level_filter: LogLevel,
    callback: Option<Box<dyn LogCallback>>,
}

lazy_static! {
    static ref STATE: RwLock<State> = RwLock::new(State {
        level_filter: LogLevel::Info,
        callback: None,
    });
}

/// Set the minimum level; messages below it are discarded. Default: `Info`.
pub fn set_level(level: LogLevel) {
    STATE.write().unwrap().level_filter = level;
}

/// Register a callback, replacing any previous one. `None` unregisters it.
pub fn set_callback(callback: Option<Box<dyn LogCallback>>) {
    STATE.write().unwrap().callback = callback;
}

/// Emit a message at the given level through the shared logging pipeline.
pub fn emit(level: LogLevel, message: &str) {
    let state = STATE.read().unwrap();
    if level < state.level_filter {
        return;
    }
    log::log!(target: "pixelgrab", log::Level::from(level), "{message}");
    if let Some(cb) = state.callback.as_ref() {
        cb.on_log(level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<(LogLevel, String)>>>);
    impl LogCallback for Recorder {
        fn on_log(&self, level: LogLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn filters_below_level_and_forwards_to_callback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        set_callback(Some(Box::new(Recorder(log.clone()))));
        set_level(LogLevel::Warn);

        emit(LogLevel::Debug, "should be dropped");
        emit(LogLevel::Error, "should arrive");

        let entries = log.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1, "should arrive");

        set_callback(None);
        set_level(LogLevel::Info);
    }
}
