#![cfg_attr(not(test), no_std)]

//! Packed 1bpp surface primitives for a 400x240 monochrome panel.
//!
//! Bit mapping within one byte: bit 7 is the leftmost pixel.

mod bitmap;
mod framebuffer;
pub mod text;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use bitmap::{BitmapError, BitmapRef};
pub use framebuffer::FrameView;

/// Panel width in pixels.
pub const COLUMNS: usize = 400;
/// Panel height in pixels.
pub const ROWS: usize = 240;
/// 32-bit output units per destination row (400 bits padded up).
pub const ROW_WORDS: usize = COLUMNS.div_ceil(32);
/// Bytes per destination row, padded to a whole number of output units.
pub const ROW_SIZE: usize = ROW_WORDS * 4;
/// Total framebuffer size in bytes.
pub const FRAME_SIZE: usize = ROW_SIZE * ROWS;
