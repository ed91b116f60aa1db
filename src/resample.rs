//! Scanline resampler: incremental fixed-point stepping over one
//! packed source row, whole-word MSB-first packing into the
//! destination.

use bitplane::{BitmapRef, FrameView, ROW_WORDS};

use crate::fixed::{self, FRAC_MASK, ONE};

/// Samples emitted per destination row. Covers the pad bytes, so every
/// row is exactly [`ROW_WORDS`] full stores.
pub const SAMPLES_PER_ROW: usize = ROW_WORDS * 32;

const WORD_BITS: u32 = 32;

/// Row-scoped sampling cursor over one packed source row.
///
/// The row is a circular bit buffer: when the fractional accumulator
/// carries whole bits, the byte offset wraps modulo the row stride.
/// The current source byte is cached and only reloaded when the byte
/// offset moves.
pub struct ResampleCursor<'a> {
    row: &'a [u8],
    byte_offset: usize,
    bit_offset: u32,
    frac: u32,
    current: u8,
}

impl<'a> ResampleCursor<'a> {
    /// Starts a cursor at `origin` source pixels into the row.
    ///
    /// `origin` must be non-negative and already wrapped below the row
    /// width; `row` must be non-empty.
    pub fn new(row: &'a [u8], origin: f32) -> Self {
        let whole = libm::truncf(origin);
        let frac = fixed::to_fixed(origin - whole);
        let int = whole as usize;
        let byte_offset = (int / 8) % row.len();

        Self {
            row,
            byte_offset,
            bit_offset: (int % 8) as u32,
            frac,
            current: row[byte_offset],
        }
    }

    /// Source bit index currently under the cursor.
    pub fn bit_index(&self) -> usize {
        self.byte_offset * 8 + self.bit_offset as usize
    }

    /// Reads the bit under the cursor (bit 7 = leftmost pixel).
    #[inline]
    pub fn read(&self) -> bool {
        self.current & (1 << (7 - self.bit_offset)) != 0
    }

    /// Advances by one destination sample worth of source distance.
    #[inline]
    pub fn step(&mut self, scale_fx: u32) {
        self.frac += scale_fx;
        if self.frac >= ONE {
            self.bit_offset += fixed::whole(self.frac);
            self.frac &= FRAC_MASK;
            if self.bit_offset >= 8 {
                self.byte_offset =
                    (self.byte_offset + self.bit_offset as usize / 8) % self.row.len();
                self.bit_offset %= 8;
                self.current = self.row[self.byte_offset];
            }
        }
    }
}

/// MSB-first 32-bit output accumulator.
///
/// Exactly one aligned store per 32 samples; no partial writes, no
/// read-modify-write of destination memory.
pub struct WordPacker {
    acc: u32,
    written: u32,
}

impl WordPacker {
    pub const fn new() -> Self {
        Self { acc: 0, written: 0 }
    }

    /// Appends one bit; returns the completed unit every 32nd call.
    #[inline]
    pub fn push(&mut self, bit: bool) -> Option<u32> {
        self.acc |= (bit as u32) << (WORD_BITS - 1 - self.written);
        self.written += 1;

        if self.written == WORD_BITS {
            let word = self.acc;
            self.acc = 0;
            self.written = 0;
            Some(word)
        } else {
            None
        }
    }
}

impl Default for WordPacker {
    fn default() -> Self {
        Self::new()
    }
}

/// Resamples source row `source_row` into destination row `y`.
///
/// `origin` is the wrapped row base offset in source pixels; `scale`
/// must be strictly positive (profile construction and bitmap
/// validation guarantee the preconditions upstream).
pub fn resample_row(
    source: &BitmapRef<'_>,
    source_row: usize,
    origin: f32,
    scale: f32,
    frame: &mut FrameView<'_>,
    y: usize,
) {
    let Some(row) = source.row(source_row) else {
        return;
    };
    if let Some(dest) = frame.row(y) {
        hint::prefetch_write(dest.as_ptr());
    }

    let scale_fx = fixed::scale_to_fixed(scale);
    let mut cursor = ResampleCursor::new(row, origin);
    let mut packer = WordPacker::new();
    let mut word_index = 0;

    for _ in 0..SAMPLES_PER_ROW {
        if let Some(word) = packer.push(cursor.read()) {
            let _ = frame.write_word(y, word_index, word);
            word_index += 1;
        }
        cursor.step(scale_fx);
    }
}

mod hint {
    //! Output-cursor prefetch, a performance hint only.

    #[cfg(all(feature = "prefetch", target_arch = "x86_64"))]
    #[inline(always)]
    pub fn prefetch_write(ptr: *const u8) {
        use core::arch::x86_64::{_MM_HINT_T0, _mm_prefetch};
        // SAFETY: prefetch never dereferences its argument.
        unsafe { _mm_prefetch::<_MM_HINT_T0>(ptr.cast()) }
    }

    #[cfg(not(all(feature = "prefetch", target_arch = "x86_64")))]
    #[inline(always)]
    pub fn prefetch_write(_ptr: *const u8) {}
}
