use super::RotaryInput;

/// No-hardware rotary source used during bring-up.
#[derive(Default, Debug, Clone, Copy)]
pub struct MockCrank;

impl MockCrank {
    pub const fn new() -> Self {
        Self
    }
}

impl RotaryInput for MockCrank {
    type Error = core::convert::Infallible;

    fn sample(&mut self) -> Result<Option<f32>, Self::Error> {
        Ok(None)
    }
}
