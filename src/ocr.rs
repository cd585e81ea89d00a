//! OCR adapter (§1, §6). Deliberately out of scope as a *feature*
//! (spec.md's Non-goals exclude a real OCR engine), but the narrow
//! interface and `Context`'s lazy wiring of it are in scope — spec.md
//! treats OCR as "an external collaborator through a narrow interface",
//! not an absent one.

use crate::error::{Error, Result};
use crate::image::Image;

pub trait OcrBackend: Send + Sync {
    fn is_supported(&self) -> bool;

    /// `language` is a BCP-47 tag; `None` requests auto-detection.
    fn recognize(&self, image: &Image, language: Option<&str>) -> Result<String>;
}

/// Grounded on `original_source/src/ocr/ocr_stub.cpp`: reports
/// unsupported, matching the design note that a `NotSupported` stub is
/// an acceptable backend when a platform lacks a feature.
pub struct NullOcrBackend;

impl OcrBackend for NullOcrBackend {
    fn is_supported(&self) -> bool {
        false
    }

    fn recognize(&self, _image: &Image, _language: Option<&str>) -> Result<String> {
        Err(Error::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelFormat;

    #[test]
    fn null_backend_reports_unsupported() {
        let backend = NullOcrBackend;
        assert!(!backend.is_supported());
        let image = Image::create(4, 4, PixelFormat::Bgra8).unwrap();
        assert!(matches!(backend.recognize(&image, None), Err(Error::NotSupported)));
    }
}
