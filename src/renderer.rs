//! Frame orchestration: the running resample loop, overlay
//! compositing, and the fault fallback screen.

use heapless::String;
use log::{error, info};

use bitplane::{BitmapRef, COLUMNS, FrameView, ROWS, text};

use crate::{
    input::RotaryInput,
    offsets::{FrameOffsets, wrap_positive},
    profile::ScanlineProfile,
    resample::resample_row,
};

/// Horizontal centering pull, in source pixels per unit scale. Keeps
/// the widest part of the tunnel centered instead of anchored to
/// column zero.
const CENTER_PULL_PX: f32 = 200.0;

const FAULT_HEADER: &str = "ASSET LOAD FAILED";
const FAULT_HEADER_Y: usize = 24;
const FAULT_MESSAGE_Y: usize = 64;
const FAULT_MARGIN_X: usize = 16;
/// Glyphs per fault-message line inside the side margins.
const FAULT_LINE_CHARS: usize = (COLUMNS - 2 * FAULT_MARGIN_X) / text::GLYPH_ADVANCE;
const FAULT_LINE_SPACING: usize = 12;

const ASSET_NAME_BYTES: usize = 32;
const FAULT_MSG_BYTES: usize = 96;

/// Source images borrowed from the host for the renderer's lifetime.
pub struct TunnelAssets<'a> {
    /// The image wrapped around the tunnel.
    pub barrel: BitmapRef<'a>,
    /// Depth-cue gradient tiled over the finished frame.
    pub gradient: BitmapRef<'a>,
}

/// Asset acquisition failure captured at initialization.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AssetLoadError {
    pub asset: String<ASSET_NAME_BYTES>,
    pub message: String<FAULT_MSG_BYTES>,
}

impl AssetLoadError {
    /// Captures a host load failure, truncating oversized text.
    pub fn new(asset: &str, message: &str) -> Self {
        Self {
            asset: bounded(asset),
            message: bounded(message),
        }
    }
}

fn bounded<const N: usize>(source: &str) -> String<N> {
    let mut out = String::new();
    for c in source.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Inclusive destination row range rewritten this frame. The host
/// forwards it to its damage notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DirtySpan {
    pub first_row: u16,
    pub last_row: u16,
}

impl DirtySpan {
    /// Every destination row; both render paths rewrite the whole
    /// frame.
    pub const FULL: Self = Self {
        first_row: 0,
        last_row: (ROWS - 1) as u16,
    };
}

enum Mode<'a> {
    Running(TunnelAssets<'a>),
    Faulted(FaultScreen),
}

struct FaultScreen {
    message: String<FAULT_MSG_BYTES>,
}

/// The whole renderer state: assets or captured fault, profile table,
/// and the rotary input. One owner, no statics.
pub struct TunnelRenderer<'a, IN: RotaryInput> {
    mode: Mode<'a>,
    profile: ScanlineProfile,
    input: IN,
}

impl<'a, IN: RotaryInput> TunnelRenderer<'a, IN> {
    /// Builds the renderer from the host's asset load result.
    ///
    /// A load failure switches permanently to the fault screen; there
    /// is no retry path.
    pub fn new(assets: Result<TunnelAssets<'a>, AssetLoadError>, input: IN) -> Self {
        let mode = match assets {
            Ok(assets) => {
                info!(
                    "barrel {}x{}, stride {}",
                    assets.barrel.width(),
                    assets.barrel.height(),
                    assets.barrel.row_stride()
                );
                Mode::Running(assets)
            }
            Err(fault) => {
                error!("asset '{}' failed to load: {}", fault.asset, fault.message);
                Mode::Faulted(FaultScreen {
                    message: fault.message,
                })
            }
        };

        Self {
            mode,
            profile: ScanlineProfile::build(ROWS),
            input,
        }
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self.mode, Mode::Faulted(_))
    }

    /// Renders one frame into the host's framebuffer.
    ///
    /// The frame view is borrowed for this call only. Always returns a
    /// full-height dirty span and never panics across the frame
    /// boundary.
    pub fn render(&mut self, frame: &mut FrameView<'_>, elapsed_seconds: f32) -> DirtySpan {
        match &self.mode {
            Mode::Running(assets) => {
                let crank = self.input.sample().unwrap_or(None);
                let offsets = FrameOffsets::compute(
                    elapsed_seconds,
                    crank,
                    assets.barrel.width(),
                    assets.barrel.height(),
                );
                render_tunnel(assets, &self.profile, offsets, frame);
            }
            Mode::Faulted(fault) => render_fault(fault, frame),
        }

        DirtySpan::FULL
    }
}

fn render_tunnel(
    assets: &TunnelAssets<'_>,
    profile: &ScanlineProfile,
    offsets: FrameOffsets,
    frame: &mut FrameView<'_>,
) {
    let width = assets.barrel.width() as f32;
    let height = assets.barrel.height();

    for y in 0..ROWS {
        let scale = profile.scale(y);
        let source_row = (offsets.vertical + y as f32) as usize % height;
        let origin = wrap_positive(offsets.horizontal_base - scale * CENTER_PULL_PX, width);
        resample_row(&assets.barrel, source_row, origin, scale, frame, y);
    }

    composite_overlay(&assets.gradient, frame);
}

/// Tiles the gradient across the frame width, vertically centered.
fn composite_overlay(gradient: &BitmapRef<'_>, frame: &mut FrameView<'_>) {
    let step = gradient.width();
    let y = ROWS.saturating_sub(gradient.height()) / 2;

    let mut x = 0;
    while x < COLUMNS {
        frame.blit(gradient, x, y);
        x += step;
    }
}

fn render_fault(fault: &FaultScreen, frame: &mut FrameView<'_>) {
    frame.clear(true);
    text::draw_text_centered(frame, FAULT_HEADER_Y, FAULT_HEADER, 2, false);

    let mut y = FAULT_MESSAGE_Y;
    let mut rest = fault.message.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(split_index(rest, FAULT_LINE_CHARS));
        text::draw_text(frame, FAULT_MARGIN_X, y, line, 1, false);
        rest = tail;
        y += FAULT_LINE_SPACING;
    }
}

/// Byte index of the `max_chars`-th character, for wrapping on a
/// character boundary.
fn split_index(s: &str, max_chars: usize) -> usize {
    s.char_indices()
        .nth(max_chars)
        .map_or(s.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MockCrank;
    use bitplane::{FRAME_SIZE, ROW_SIZE};

    struct FixedCrank(f32);

    impl RotaryInput for FixedCrank {
        type Error = ();

        fn sample(&mut self) -> Result<Option<f32>, Self::Error> {
            Ok(Some(self.0))
        }
    }

    fn assets<'a>(barrel: &'a [u8], gradient: &'a [u8]) -> TunnelAssets<'a> {
        TunnelAssets {
            barrel: BitmapRef::new(800, 480, 100, barrel).unwrap(),
            gradient: BitmapRef::new(16, 2, 2, gradient).unwrap(),
        }
    }

    #[test]
    fn all_set_source_fills_every_visible_row() {
        let barrel = vec![0xFFu8; 100 * 480];
        let gradient = vec![0xFFu8; 2 * 2];
        let mut renderer = TunnelRenderer::new(Ok(assets(&barrel, &gradient)), MockCrank::new());
        assert!(!renderer.is_faulted());

        let mut bytes = [0u8; FRAME_SIZE];
        let mut frame = FrameView::new(&mut bytes).unwrap();
        let span = renderer.render(&mut frame, 1.75);

        assert_eq!(span, DirtySpan::FULL);
        for y in 0..ROWS {
            let row = frame.row(y).unwrap();
            assert!(
                row[..COLUMNS / 8].iter().all(|&b| b == 0xFF),
                "row {y} not fully set"
            );
        }
    }

    #[test]
    fn all_clear_source_leaves_only_the_overlay() {
        let barrel = vec![0u8; 100 * 480];
        let gradient = vec![0xFFu8; 2 * 2];
        let mut renderer = TunnelRenderer::new(Ok(assets(&barrel, &gradient)), MockCrank::new());

        let mut bytes = [0u8; FRAME_SIZE];
        let mut frame = FrameView::new(&mut bytes).unwrap();
        renderer.render(&mut frame, 0.0);

        // The 2-row gradient band is centered and tiled edge to edge.
        let band_y = ROWS / 2 - 1;
        for x in [0, COLUMNS / 2, COLUMNS - 1] {
            assert_eq!(frame.pixel(x, band_y), Some(true));
            assert_eq!(frame.pixel(x, band_y + 1), Some(true));
        }
        // Rows outside the band stay clear.
        assert_eq!(frame.pixel(0, 0), Some(false));
        assert_eq!(frame.pixel(COLUMNS - 1, ROWS - 1), Some(false));
    }

    #[test]
    fn crank_input_shifts_the_horizontal_phase() {
        let mut barrel = vec![0u8; 100 * 480];
        // Single set column near the left edge of every source row.
        for row in 0..480 {
            barrel[row * 100] = 0b1000_0000;
        }
        let gradient = vec![0u8; 2 * 2];

        let mut docked = TunnelRenderer::new(Ok(assets(&barrel, &gradient)), MockCrank::new());
        let mut cranked = TunnelRenderer::new(Ok(assets(&barrel, &gradient)), FixedCrank(180.0));

        let mut a = [0u8; FRAME_SIZE];
        let mut frame_a = FrameView::new(&mut a).unwrap();
        docked.render(&mut frame_a, 0.0);

        let mut b = [0u8; FRAME_SIZE];
        let mut frame_b = FrameView::new(&mut b).unwrap();
        cranked.render(&mut frame_b, 0.0);

        assert_ne!(frame_a.bytes(), frame_b.bytes());
    }

    #[test]
    fn fault_path_draws_header_and_message_without_sources() {
        let fault = AssetLoadError::new("barrel", "no such image");
        let mut renderer: TunnelRenderer<'_, MockCrank> =
            TunnelRenderer::new(Err(fault), MockCrank::new());
        assert!(renderer.is_faulted());

        let mut bytes = [0u8; FRAME_SIZE];
        let mut frame = FrameView::new(&mut bytes).unwrap();
        let span = renderer.render(&mut frame, 0.5);

        assert_eq!(span, DirtySpan::FULL);
        // Inverted video: mostly set, with cleared glyph pixels in the
        // header and message bands.
        let header_band = &frame.bytes()[FAULT_HEADER_Y * ROW_SIZE..(FAULT_HEADER_Y + 14) * ROW_SIZE];
        assert!(header_band.iter().any(|&b| b != 0xFF));
        let message_band =
            &frame.bytes()[FAULT_MESSAGE_Y * ROW_SIZE..(FAULT_MESSAGE_Y + 7) * ROW_SIZE];
        assert!(message_band.iter().any(|&b| b != 0xFF));
        // Top edge stays untouched inverted background.
        assert!(frame.row(0).unwrap().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn long_fault_message_wraps_instead_of_clipping() {
        let long = "e".repeat(80);
        let fault = AssetLoadError::new("barrel", &long);
        let mut renderer: TunnelRenderer<'_, MockCrank> =
            TunnelRenderer::new(Err(fault), MockCrank::new());

        let mut bytes = [0u8; FRAME_SIZE];
        let mut frame = FrameView::new(&mut bytes).unwrap();
        renderer.render(&mut frame, 0.0);

        // 80 glyphs exceed one line; the tail lands a line lower.
        let second_line_y = FAULT_MESSAGE_Y + FAULT_LINE_SPACING;
        let second_line =
            &frame.bytes()[second_line_y * ROW_SIZE..(second_line_y + 7) * ROW_SIZE];
        assert!(second_line.iter().any(|&b| b != 0xFF));

        // No glyph spills past the right margin into the last visible
        // bytes or the pad bytes.
        for y in FAULT_MESSAGE_Y..second_line_y + 7 {
            let row = frame.row(y).unwrap();
            assert!(row[COLUMNS / 8 - 1..].iter().all(|&b| b == 0xFF), "row {y}");
        }
    }

    #[test]
    fn fault_message_is_truncated_not_dropped() {
        let long = "x".repeat(300);
        let fault = AssetLoadError::new("barrel", &long);
        assert_eq!(fault.message.len(), FAULT_MSG_BYTES);
        assert_eq!(fault.asset.as_str(), "barrel");
    }

    #[test]
    fn rendering_is_deterministic_for_a_fixed_input() {
        let barrel: Vec<u8> = (0..100 * 480).map(|i| (i % 251) as u8).collect();
        let gradient = vec![0u8; 2 * 2];

        let mut renderer = TunnelRenderer::new(Ok(assets(&barrel, &gradient)), MockCrank::new());

        let mut a = [0u8; FRAME_SIZE];
        let mut frame_a = FrameView::new(&mut a).unwrap();
        renderer.render(&mut frame_a, 4.25);

        let mut b = [0u8; FRAME_SIZE];
        let mut frame_b = FrameView::new(&mut b).unwrap();
        renderer.render(&mut frame_b, 4.25);

        assert_eq!(a, b);
    }
}
