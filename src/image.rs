//! Immutable owned pixel buffer (§4.1).

use crate::error::{Error, Result};

/// Pixel packing of an [`Image`]'s byte run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PixelFormat {
    /// B, G, R, A in ascending address order. Default.
    Bgra8 = 0,
    /// R, G, B, A in ascending address order.
    Rgba8 = 1,
    /// Platform capture format; treated as `Bgra8` on little-endian hosts.
    Native = 2,
}

/// An immutable owned pixel buffer plus its descriptor.
///
/// Dimensions and stride are fixed at construction, the buffer is never
/// reallocated, and concurrent readers are safe without synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

fn round_up_to_4(value: u32) -> u32 {
    (value + 3) & !3
}

impl Image {
    /// Allocate a zeroed buffer with `stride = round_up(width*4, 4)`.
    pub fn create(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidParam);
        }
        let row_bytes = width
            .checked_mul(4)
            .ok_or(Error::InvalidParam)?;
        let stride = round_up_to_4(row_bytes);
        let total = (stride as usize)
            .checked_mul(height as usize)
            .ok_or(Error::InvalidParam)?;
        Ok(Self {
            width,
            height,
            stride,
            format,
            data: vec![0u8; total],
        })
    }

    /// Take ownership of a caller-provided buffer.
    ///
    /// Requires `bytes.len() >= stride * height` and `stride >= width * 4`.
    pub fn create_from_data(
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidParam);
        }
        if stride < width * 4 {
            return Err(Error::InvalidParam);
        }
        let required = (stride as usize)
            .checked_mul(height as usize)
            .ok_or(Error::InvalidParam)?;
        if bytes.len() < required {
            return Err(Error::InvalidParam);
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data: bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    /// Byte offset of pixel `(x, y)`, or `None` if out of bounds.
    pub fn pixel_offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.stride as usize + x as usize * 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_computes_stride_and_zeroes_buffer() {
        let img = Image::create(100, 50, PixelFormat::Bgra8).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.stride(), 400);
        assert_eq!(img.data().len(), 400 * 50);
        assert!(img.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn create_rejects_non_positive_dimensions() {
        assert!(matches!(
            Image::create(0, 10, PixelFormat::Bgra8),
            Err(Error::InvalidParam)
        ));
        assert!(matches!(
            Image::create(10, 0, PixelFormat::Bgra8),
            Err(Error::InvalidParam)
        ));
    }

    #[test]
    fn create_from_data_validates_buffer_length() {
        let bytes = vec![0u8; 10 * 10 * 4];
        assert!(Image::create_from_data(10, 10, 40, PixelFormat::Bgra8, bytes.clone()).is_ok());
        assert!(matches!(
            Image::create_from_data(10, 10, 30, PixelFormat::Bgra8, bytes.clone()),
            Err(Error::InvalidParam)
        ));
        let short = vec![0u8; 10];
        assert!(matches!(
            Image::create_from_data(10, 10, 40, PixelFormat::Bgra8, short),
            Err(Error::InvalidParam)
        ));
    }

    #[test]
    fn clone_deep_copies_buffer() {
        let mut img = Image::create(4, 4, PixelFormat::Bgra8).unwrap();
        img.data_mut()[0] = 42;
        let copy = img.clone();
        assert_eq!(copy.data()[0], 42);
        assert_ne!(copy.data().as_ptr(), img.data().as_ptr());
    }
}
