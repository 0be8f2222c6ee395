//! Host-side frame buffers.
//!
//! A frame is tightly packed RGBA8: row-major, no row padding, 4 bytes per
//! pixel, so its byte length is always `width * height * 4`.

use crate::error::FrameError;

pub const BYTES_PER_PIXEL: usize = 4;

/// Returns `width * height * 4`, or `None` on overflow.
pub fn expected_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Checks that `len` bytes describe exactly one `width x height` RGBA8 frame.
pub fn validate_len(len: usize, width: u32, height: u32) -> Result<(), FrameError> {
    let expected = expected_len(width, height).ok_or(FrameError::TooLarge { width, height })?;
    if len != expected {
        return Err(FrameError::SizeMismatch {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// An owned RGBA8 frame produced on the CPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Creates a transparent black frame.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameError> {
        let len = expected_len(width, height).ok_or(FrameError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Wraps existing RGBA8 bytes, rejecting buffers of the wrong length.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FrameError> {
        validate_len(pixels.len(), width, height)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Per-pixel view for writers that think in `[r, g, b, a]`.
    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.pixels)
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[i..i + BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Writes one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        self.pixels_mut().fill(rgba);
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── length ────────────────────────────────────────────────────────────

    #[test]
    fn expected_len_is_four_bytes_per_pixel() {
        assert_eq!(expected_len(2, 1), Some(8));
        assert_eq!(expected_len(1024, 768), Some(1024 * 768 * 4));
        assert_eq!(expected_len(0, 10), Some(0));
    }

    #[test]
    fn validate_accepts_exact_length() {
        assert!(validate_len(8, 2, 1).is_ok());
    }

    #[test]
    fn validate_rejects_short_buffer() {
        let err = validate_len(7, 2, 1).unwrap_err();
        assert!(matches!(
            err,
            FrameError::SizeMismatch { expected: 8, actual: 7, width: 2, height: 1 }
        ));
    }

    #[test]
    fn validate_rejects_long_buffer() {
        assert!(matches!(
            validate_len(12, 2, 1),
            Err(FrameError::SizeMismatch { expected: 8, actual: 12, .. })
        ));
    }

    // ── frame buffer ──────────────────────────────────────────────────────

    #[test]
    fn from_rgba_rejects_wrong_length() {
        assert!(FrameBuffer::from_rgba(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn pixel_reads_row_major_offsets() {
        let bytes = vec![
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            9, 9, 9, 9,
        ];
        let fb = FrameBuffer::from_rgba(2, 2, bytes).unwrap();
        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(1, 0), Some([0, 255, 0, 255]));
        assert_eq!(fb.pixel(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(fb.pixel(1, 1), Some([9, 9, 9, 9]));
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let fb = FrameBuffer::new(2, 2).unwrap();
        assert_eq!(fb.pixel(2, 0), None);
        assert_eq!(fb.pixel(0, 2), None);
    }

    #[test]
    fn set_pixel_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new(1, 1).unwrap();
        fb.set_pixel(5, 5, [1, 2, 3, 4]);
        assert_eq!(fb.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn set_pixel_then_pixel() {
        let mut fb = FrameBuffer::new(3, 2).unwrap();
        fb.set_pixel(2, 1, [10, 20, 30, 40]);
        assert_eq!(fb.pixel(2, 1), Some([10, 20, 30, 40]));
        assert_eq!(&fb.as_bytes()[20..24], &[10, 20, 30, 40]);
    }

    #[test]
    fn fill_covers_every_pixel() {
        let mut fb = FrameBuffer::new(3, 3).unwrap();
        fb.fill([1, 2, 3, 255]);
        assert!(fb.as_bytes().chunks(4).all(|px| px == [1, 2, 3, 255]));
    }
}
