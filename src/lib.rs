//! # PixelGrab
//!
//! PixelGrab is a cross-platform screen-capture and annotation engine,
//! embeddable anywhere that can load a shared library and call a handful
//! of plain C functions.
//!
//! Four subsystems sit behind one context handle:
//!
//! - capture: screens, windows, regions, DPI-aware coordinates, a color
//!   picker and magnifier;
//! - annotation: shapes (rectangles, ellipses, lines, arrows, freehand,
//!   text) plus mosaic/blur pixel effects, with undo/redo;
//! - pin windows: floating, always-on-top copies of a captured image,
//!   a snippet of text, or the current clipboard;
//! - recording: capture -> watermark -> encode, with pause/resume, an
//!   optional audio track, and a manual "push frames yourself" mode.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pixelgrab::context::Context;
//!
//! let ctx = Context::new();
//! let image = ctx.capture_region(0, 0, 800, 600).expect("capture failed");
//! assert_eq!(image.width(), 800);
//! ```
//!
//! ## Concepts
//! - [`context::Context`] — the composition root every other subsystem
//!   hangs off
//! - [`image::Image`] — an immutable owned pixel buffer
//! - [`annotation::AnnotationSession`] — shapes, undo/redo, incremental
//!   redraw over one base image
//! - [`pin::PinWindowManager`] — id-keyed floating overlay windows
//! - [`recorder::RecorderBackend`] — the capture/watermark/encode pipeline
//!
//! ## Modules
//! - [`capture`] — platform screen/window capture adapter
//! - [`annotation`] — shapes, undo/redo, mosaic/blur
//! - [`detection`] — UI element detection and cursor snapping
//! - [`pin`] — pin-window manager and backend
//! - [`watermark`] — text/image watermark passes
//! - [`audio`] — audio device adapter for the recorder's audio track
//! - [`recorder`] — the capture -> watermark -> encode pipeline
//! - [`history`] — bounded capture history
//! - [`clipboard`] — clipboard read adapter
//! - [`ocr`], [`translate`] — narrow external-collaborator interfaces
//! - [`color`] — RGB/HSV/hex color utilities
//! - [`config`] — plain configuration structs
//! - [`error`] — the shared error taxonomy
//! - [`log`] — process-global logging bridge
//! - [`version`] — library version constants
//! - [`ffi`] — the C ABI surface (`include/pixelgrab.h`); the only module
//!   permitted to use `unsafe`
//!
//! ## Building docs
//! `cargo doc --open`

pub mod annotation;
pub mod audio;
pub mod capture;
pub mod clipboard;
pub mod color;
pub mod config;
pub mod context;
pub mod detection;
pub mod error;
pub mod ffi;
pub mod history;
pub mod image;
pub mod log;
pub mod ocr;
pub mod pin;
pub mod recorder;
pub mod translate;
pub mod version;
pub mod watermark;

pub use context::Context;
pub use error::{Error, Result};
pub use image::{Image, PixelFormat};
