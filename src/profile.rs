//! Per-row scale table shaping the tunnel illusion.

use core::f32::consts::PI;

use heapless::Vec;

use bitplane::ROWS;

const AMPLITUDE: f32 = 0.55;
const BASE: f32 = 0.75;

/// Per-row resampling scales, built once and immutable after.
///
/// `scale[y] = sin(y / rows * pi) * 0.55 + 0.75`, a half sine bulge
/// over the destination height. Every value is strictly positive, the
/// resampler's hard precondition.
pub struct ScanlineProfile {
    scales: Vec<f32, ROWS>,
}

impl ScanlineProfile {
    /// Builds a table for `rows` destination rows (capped at [`ROWS`]).
    pub fn build(rows: usize) -> Self {
        let mut scales = Vec::new();
        for y in 0..rows {
            let phase = y as f32 / rows as f32 * PI;
            let scale = libm::sinf(phase) * AMPLITUDE + BASE;
            if scales.push(scale).is_err() {
                break;
            }
        }

        Self { scales }
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Scale for destination row `y`; rows past the table end get the
    /// flat base scale.
    pub fn scale(&self, y: usize) -> f32 {
        self.scales.get(y).copied().unwrap_or(BASE)
    }
}
