//! Pin-window manager (§4.7): an id-keyed map of [`PinBackend`]s.
//!
//! Grounded on the teacher's `HashMap<ZoneId, Arc<ZoneSink>>` in
//! `engine/engine.rs`: a monotonic, never-reused id counter indexing a
//! map of per-window state, plus `original_source/src/core/
//! pixelgrab_api.cpp`'s `pin_image`/`pin_text`/`pin_clipboard`/duplicate
//! semantics.

pub mod backend;

pub use backend::{InProcessPinBackend, PinBackend, PinContent};

use std::collections::HashMap;

use crate::clipboard::{ClipboardFormat, ClipboardReader};
use crate::error::{Error, Result};
use crate::image::Image;

pub type PinId = i32;

/// Maps pin ids to backends; ids are monotonic and never reused, even
/// after `destroy_pin`/`destroy_all`.
pub struct PinWindowManager {
    pins: HashMap<PinId, Box<dyn PinBackend>>,
    next_id: PinId,
}

impl Default for PinWindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PinWindowManager {
    pub fn new() -> Self {
        Self { pins: HashMap::new(), next_id: 1 }
    }

    fn insert(&mut self, backend: Box<dyn PinBackend>) -> PinId {
        let id = self.next_id;
        self.next_id += 1;
        self.pins.insert(id, backend);
        id
    }

    /// Creates an image pin at `(x, y)` using the image's own dimensions.
    /// Returns `0` only if pin creation itself could fail; in-process
    /// creation never fails, so this always succeeds.
    pub fn pin_image(&mut self, image: Image, x: i32, y: i32) -> PinId {
        self.insert(Box::new(InProcessPinBackend::new_image(image, x, y)))
    }

    /// Creates a text pin; `size` is the platform-computed rendered
    /// extent, supplied here by the caller since this crate has no real
    /// text layout engine.
    pub fn pin_text(&mut self, text: String, x: i32, y: i32, size: (u32, u32)) -> PinId {
        self.insert(Box::new(InProcessPinBackend::new_text(text, x, y, size)))
    }

    /// Reads the current clipboard content: an image clipboard pins like
    /// `pin_image`, text like `pin_text` (with a zero-sized placeholder
    /// extent), anything else fails.
    pub fn pin_clipboard(&mut self, reader: &dyn ClipboardReader, x: i32, y: i32) -> Result<PinId> {
        match reader.get_format() {
            ClipboardFormat::Image => {
                let image = reader.get_image().ok_or(Error::ClipboardEmpty)?;
                Ok(self.pin_image(image, x, y))
            }
            ClipboardFormat::Text => {
                let text = reader.get_text().ok_or(Error::ClipboardEmpty)?;
                Ok(self.pin_text(text, x, y, (0, 0)))
            }
            ClipboardFormat::None => Err(Error::ClipboardEmpty),
        }
    }

    pub fn destroy_pin(&mut self, id: PinId) -> Result<()> {
        self.pins.remove(&id).map(|_| ()).ok_or(Error::InvalidParam)
    }

    pub fn destroy_all(&mut self) {
        self.pins.clear();
    }

    pub fn count(&self) -> usize {
        self.pins.len()
    }

    /// Ids currently live, in unspecified order (mirrors `Enumerate`'s
    /// `out_buf` fill — ordering isn't part of the contract).
    pub fn enumerate(&self) -> Vec<PinId> {
        self.pins.keys().copied().collect()
    }

    pub fn get_backend(&self, id: PinId) -> Option<&dyn PinBackend> {
        self.pins.get(&id).map(|b| b.as_ref())
    }

    pub fn get_backend_mut(&mut self, id: PinId) -> Option<&mut dyn PinBackend> {
        self.pins.get_mut(&id).map(|b| b.as_mut())
    }

    /// Creates a new image pin seeded from `id`'s *current* image at
    /// `origin + (dx, dy)`. Fails for text pins or unknown ids.
    pub fn duplicate(&mut self, id: PinId, dx: i32, dy: i32) -> Result<PinId> {
        let backend = self.pins.get(&id).ok_or(Error::InvalidParam)?;
        let image = backend.get_image().ok_or(Error::InvalidParam)?;
        let (x, y) = backend.origin();
        Ok(self.pin_image(image, x + dx, y + dy))
    }

    pub fn set_visible_all(&mut self, visible: bool) {
        for backend in self.pins.values_mut() {
            backend.set_visible(visible);
        }
    }

    /// Hides every pin, returning each id's prior visibility so a caller
    /// can restore it exactly (rather than forcing everything back to
    /// visible) once the excluded capture completes.
    pub fn hide_all_remembering(&mut self) -> Vec<(PinId, bool)> {
        let saved: Vec<(PinId, bool)> =
            self.pins.iter().map(|(&id, backend)| (id, backend.visible())).collect();
        for backend in self.pins.values_mut() {
            backend.set_visible(false);
        }
        saved
    }

    pub fn restore_visibility(&mut self, saved: Vec<(PinId, bool)>) {
        for (id, visible) in saved {
            if let Some(backend) = self.pins.get_mut(&id) {
                backend.set_visible(visible);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::NullClipboard;
    use crate::image::PixelFormat;

    fn image() -> Image {
        Image::create(4, 4, PixelFormat::Bgra8).unwrap()
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut mgr = PinWindowManager::new();
        let id1 = mgr.pin_image(image(), 0, 0);
        mgr.destroy_pin(id1).unwrap();
        let id2 = mgr.pin_image(image(), 0, 0);
        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
    }

    #[test]
    fn duplicate_uses_current_image_and_offsets_origin() {
        let mut mgr = PinWindowManager::new();
        let id = mgr.pin_image(image(), 10, 20);
        let mut replacement = Image::create(2, 2, PixelFormat::Bgra8).unwrap();
        replacement.data_mut()[0] = 9;
        mgr.get_backend_mut(id).unwrap().set_image(replacement);

        let dup_id = mgr.duplicate(id, 5, 5).unwrap();
        let dup = mgr.get_backend(dup_id).unwrap();
        assert_eq!(dup.origin(), (15, 25));
        assert_eq!(dup.get_image().unwrap().data()[0], 9);
    }

    #[test]
    fn duplicate_fails_for_text_pins() {
        let mut mgr = PinWindowManager::new();
        let id = mgr.pin_text("hi".into(), 0, 0, (10, 10));
        assert!(matches!(mgr.duplicate(id, 0, 0), Err(Error::InvalidParam)));
    }

    #[test]
    fn pin_clipboard_fails_when_empty() {
        let mut mgr = PinWindowManager::new();
        let clipboard = NullClipboard;
        assert!(matches!(
            mgr.pin_clipboard(&clipboard, 0, 0),
            Err(Error::ClipboardEmpty)
        ));
    }

    #[test]
    fn destroy_all_empties_the_map() {
        let mut mgr = PinWindowManager::new();
        mgr.pin_image(image(), 0, 0);
        mgr.pin_image(image(), 0, 0);
        mgr.destroy_all();
        assert_eq!(mgr.count(), 0);
    }
}
