//! Per-frame scroll phase, from the frame clock or the rotary input.

use libm::{fmodf, sinf};

/// Peak vertical drift, in source pixels.
const VERTICAL_DRIFT_PX: f32 = 120.0;
/// Vertical drift period divisor, in seconds.
const VERTICAL_PERIOD_S: f32 = 3.0;
/// Autonomous horizontal scroll speed, in source pixels per second.
const AUTO_SCROLL_PX_PER_S: f32 = 60.0;
const FULL_TURN_DEGREES: f32 = 360.0;

/// Per-frame scroll phase. Recomputed every frame, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOffsets {
    /// Source row shift, in `[0, source height)`.
    pub vertical: f32,
    /// Source column phase; wrapped at point of use, once per row.
    pub horizontal_base: f32,
}

impl FrameOffsets {
    /// Computes the frame's scroll phase.
    ///
    /// `crank_angle` is the rotary input in degrees while undocked;
    /// `None` selects autonomous time-driven scrolling. The two modes
    /// are mutually exclusive within a frame.
    pub fn compute(
        elapsed_seconds: f32,
        crank_angle: Option<f32>,
        source_width: usize,
        source_height: usize,
    ) -> Self {
        let drift = sinf(elapsed_seconds / VERTICAL_PERIOD_S) * VERTICAL_DRIFT_PX;
        let vertical = wrap_positive(drift, source_height as f32);

        let horizontal_base = match crank_angle {
            Some(angle) => angle / FULL_TURN_DEGREES * source_width as f32,
            None => elapsed_seconds * AUTO_SCROLL_PX_PER_S,
        };

        Self {
            vertical,
            horizontal_base,
        }
    }
}

/// Wraps `value` into `[0, modulus)`.
///
/// `fmod` keeps the dividend's sign, so negative remainders are
/// corrected by adding the modulus; the `r == modulus` float edge that
/// correction can produce is folded back to zero.
pub fn wrap_positive(value: f32, modulus: f32) -> f32 {
    let mut r = fmodf(value, modulus);
    if r < 0.0 {
        r += modulus;
    }
    if r >= modulus { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_positive_stays_in_range() {
        let samples = [
            -1000.0f32, -480.0, -479.5, -0.25, -1e-7, 0.0, 0.25, 479.5, 480.0, 1000.0,
        ];
        for value in samples {
            let wrapped = wrap_positive(value, 480.0);
            assert!(
                (0.0..480.0).contains(&wrapped),
                "{value} wrapped to {wrapped}"
            );
        }
    }

    #[test]
    fn wrap_positive_corrects_negative_remainders() {
        assert_eq!(wrap_positive(-0.25, 480.0), 479.75);
        assert_eq!(wrap_positive(-480.25, 480.0), 479.75);
        assert_eq!(wrap_positive(480.25, 480.0), 0.25);
    }

    #[test]
    fn vertical_drift_is_wrapped_for_any_time() {
        for i in 0..200 {
            let t = i as f32 * 0.37;
            let offsets = FrameOffsets::compute(t, None, 800, 480);
            assert!((0.0..480.0).contains(&offsets.vertical), "t = {t}");
        }
    }

    #[test]
    fn crank_overrides_time_scrolling() {
        let auto = FrameOffsets::compute(2.0, None, 800, 480);
        assert_eq!(auto.horizontal_base, 120.0);

        let cranked = FrameOffsets::compute(2.0, Some(90.0), 800, 480);
        assert_eq!(cranked.horizontal_base, 200.0);
    }

    #[test]
    fn vertical_drift_matches_the_slow_sine() {
        let offsets = FrameOffsets::compute(0.0, None, 800, 480);
        assert_eq!(offsets.vertical, 0.0);

        // sin(3.0/3.0) * 120 = 100.97...
        let offsets = FrameOffsets::compute(3.0, None, 800, 480);
        assert!((offsets.vertical - 100.976).abs() < 0.01);
    }
}
