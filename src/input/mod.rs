//! Rotary input abstraction.

mod mock;

pub use mock::MockCrank;

/// Polled rotary input driving user-controlled scrolling.
pub trait RotaryInput {
    type Error;

    /// Returns the current angle in degrees `[0, 360)`, or `Ok(None)`
    /// while the crank is docked.
    fn sample(&mut self) -> Result<Option<f32>, Self::Error>;
}
