//! Error taxonomy shared by every subsystem and surfaced through the C ABI.

/// Error codes returned by a failing operation.
///
/// Numeric discriminants match `PixelGrabError` in `include/pixelgrab.h`
/// for drop-in C ABI compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[repr(i32)]
pub enum Error {
    #[error("ok")]
    Ok = 0,
    #[error("context not initialized")]
    NotInitialized = -1,
    #[error("invalid parameter")]
    InvalidParam = -2,
    #[error("capture failed")]
    CaptureFailed = -3,
    #[error("permission denied")]
    PermissionDenied = -4,
    #[error("out of memory")]
    OutOfMemory = -5,
    #[error("operation not supported on this platform")]
    NotSupported = -6,
    #[error("annotation operation failed")]
    AnnotationFailed = -10,
    #[error("clipboard is empty")]
    ClipboardEmpty = -11,
    #[error("clipboard format unsupported")]
    ClipboardFormatUnsupported = -12,
    #[error("window creation failed")]
    WindowCreateFailed = -13,
    #[error("no element found")]
    NoElement = -14,
    #[error("history is empty")]
    HistoryEmpty = -15,
    #[error("recording operation failed")]
    RecordFailed = -16,
    #[error("video encoder not available")]
    EncoderNotAvailable = -17,
    #[error("a recording is already in progress")]
    RecordInProgress = -18,
    #[error("watermark operation failed")]
    WatermarkFailed = -19,
    #[error("ocr recognition failed")]
    OcrFailed = -20,
    #[error("translation failed")]
    TranslateFailed = -21,
    #[error("unknown error")]
    Unknown = -99,
}

/// Convenience alias for internal subsystem results.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Human-readable message, copied into the context's error slot.
    pub fn message(self) -> &'static str {
        match self {
            Error::Ok => "ok",
            Error::NotInitialized => "context not initialized",
            Error::InvalidParam => "invalid parameter",
            Error::CaptureFailed => "capture failed",
            Error::PermissionDenied => "permission denied",
            Error::OutOfMemory => "out of memory",
            Error::NotSupported => "operation not supported on this platform",
            Error::AnnotationFailed => "annotation operation failed",
            Error::ClipboardEmpty => "clipboard is empty",
            Error::ClipboardFormatUnsupported => "clipboard format unsupported",
            Error::WindowCreateFailed => "window creation failed",
            Error::NoElement => "no element found",
            Error::HistoryEmpty => "history is empty",
            Error::RecordFailed => "recording operation failed",
            Error::EncoderNotAvailable => "video encoder not available",
            Error::RecordInProgress => "a recording is already in progress",
            Error::WatermarkFailed => "watermark operation failed",
            Error::OcrFailed => "ocr recognition failed",
            Error::TranslateFailed => "translation failed",
            Error::Unknown => "unknown error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_match_c_header() {
        assert_eq!(Error::Ok as i32, 0);
        assert_eq!(Error::NotInitialized as i32, -1);
        assert_eq!(Error::InvalidParam as i32, -2);
        assert_eq!(Error::Unknown as i32, -99);
    }
}
