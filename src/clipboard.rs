//! Clipboard read adapter (§1, §4.7, §6).
//!
//! Was only implicit in the component table: a "platform adapter" entry,
//! not a named module. The adapter trait and `Context`'s lazy wiring of
//! it are in scope even though a real OS clipboard integration is not
//! (Non-goals exclude building the backend, not the interface).

use crate::image::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ClipboardFormat {
    None = 0,
    Image = 1,
    Text = 2,
    Html = 3,
}

pub trait ClipboardReader: Send + Sync {
    fn get_format(&self) -> ClipboardFormat;
    fn get_image(&self) -> Option<Image>;
    fn get_text(&self) -> Option<String>;
}

/// Always reports an empty clipboard; the default/testable backend.
pub struct NullClipboard;

impl ClipboardReader for NullClipboard {
    fn get_format(&self) -> ClipboardFormat {
        ClipboardFormat::None
    }

    fn get_image(&self) -> Option<Image> {
        None
    }

    fn get_text(&self) -> Option<String> {
        None
    }
}

/// Resolves the platform clipboard reader at build time; see
/// [`crate::capture::create_platform_capture_backend`] for the pattern.
pub fn create_platform_clipboard() -> Box<dyn ClipboardReader> {
    Box::new(NullClipboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_clipboard_reports_empty() {
        let clipboard = NullClipboard;
        assert_eq!(clipboard.get_format(), ClipboardFormat::None);
        assert!(clipboard.get_image().is_none());
        assert!(clipboard.get_text().is_none());
    }
}
