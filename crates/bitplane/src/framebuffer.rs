//! Per-frame mutable view over the destination framebuffer.

use crate::{BitmapRef, COLUMNS, FRAME_SIZE, ROW_SIZE, ROW_WORDS, ROWS};

/// 1bpp destination view, borrowed from the host for one frame.
///
/// Rows are `ROW_SIZE` bytes: 50 visible bytes plus 2 pad bytes so
/// every row is a whole number of 32-bit units.
pub struct FrameView<'a> {
    bytes: &'a mut [u8],
}

impl<'a> FrameView<'a> {
    /// Wraps a host buffer of exactly [`FRAME_SIZE`] bytes.
    pub fn new(bytes: &'a mut [u8]) -> Option<Self> {
        if bytes.len() != FRAME_SIZE {
            return None;
        }

        Some(Self { bytes })
    }

    /// Returns the underlying frame bytes.
    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }

    /// Clears the frame to all-clear (`on = false`) or all-set (`on = true`).
    pub fn clear(&mut self, on: bool) {
        self.bytes.fill(if on { 0xFF } else { 0x00 });
    }

    /// Returns the packed bytes of row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= ROWS {
            return None;
        }

        let start = y * ROW_SIZE;
        Some(&self.bytes[start..start + ROW_SIZE])
    }

    /// Sets a pixel state.
    ///
    /// Returns `true` when the pixel is in bounds, `false` otherwise.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        if x >= COLUMNS || y >= ROWS {
            return false;
        }

        let byte_index = y * ROW_SIZE + (x / 8);
        let bit_mask = 1u8 << (7 - (x % 8));

        if on {
            self.bytes[byte_index] |= bit_mask;
        } else {
            self.bytes[byte_index] &= !bit_mask;
        }

        true
    }

    /// Reads a pixel state.
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x >= COLUMNS || y >= ROWS {
            return None;
        }

        let byte_index = y * ROW_SIZE + (x / 8);
        let bit_mask = 1u8 << (7 - (x % 8));
        Some((self.bytes[byte_index] & bit_mask) != 0)
    }

    /// Stores one packed output unit into row `y`.
    ///
    /// Bit 31 of `value` is the leftmost pixel of the unit; the store
    /// goes out big-endian so the in-memory byte sequence matches the
    /// left-to-right packing order on any host.
    ///
    /// Returns `true` when the unit is in bounds, `false` otherwise.
    pub fn write_word(&mut self, y: usize, word_index: usize, value: u32) -> bool {
        if y >= ROWS || word_index >= ROW_WORDS {
            return false;
        }

        let start = y * ROW_SIZE + word_index * 4;
        self.bytes[start..start + 4].copy_from_slice(&value.to_be_bytes());
        true
    }

    /// Copies a bitmap into the frame with its top-left corner at
    /// `(x, y)`, overwriting both set and clear pixels. Pixels falling
    /// outside the frame are dropped.
    pub fn blit(&mut self, source: &BitmapRef<'_>, x: usize, y: usize) {
        for sy in 0..source.height() {
            for sx in 0..source.width() {
                let Some(on) = source.read_bit(sy, sx) else {
                    continue;
                };
                let _ = self.set_pixel(x + sx, y + sy, on);
            }
        }
    }
}
