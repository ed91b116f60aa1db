#![cfg_attr(not(test), no_std)]

//! Barrel/tunnel distortion renderer for a 400x240 1bpp panel.
//!
//! Resamples a packed monochrome source image into the destination
//! framebuffer one scanline at a time, under a per-row fractional
//! scale and a per-frame scroll phase. The inner loop is incremental
//! 16.16 fixed-point stepping with whole-word MSB-first stores; there
//! is no allocation and no divide on the per-sample path.
//!
//! The host owns image loading, the frame clock, and the display
//! flush. It hands a [`bitplane::FrameView`] into
//! [`TunnelRenderer::render`] once per frame and forwards the returned
//! [`DirtySpan`] to its damage notification.

pub mod fixed;
pub mod input;
pub mod offsets;
pub mod profile;
pub mod renderer;
pub mod resample;

pub use input::{MockCrank, RotaryInput};
pub use offsets::FrameOffsets;
pub use profile::ScanlineProfile;
pub use renderer::{AssetLoadError, DirtySpan, TunnelAssets, TunnelRenderer};
