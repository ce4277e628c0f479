//! Drive stage: tanh saturation.

use cinder_core::{Effect, fast_tanh};

/// Stateless tanh drive.
///
/// `y = tanh(x * (1 + drive * 5))` with drive in [0, 1]. At drive 0 the
/// curve is plain `tanh(x)`, nearly transparent for small signals; at 1 the
/// input is pushed 6x into the curve. Output is bounded in (-1, 1) by
/// construction, so the stage has no failure modes and no state to reset.
#[derive(Debug, Clone, Default)]
pub struct Saturator {
    drive: f32,
}

impl Saturator {
    /// Create a saturator with drive 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drive amount (clamped to [0, 1]).
    #[inline]
    pub fn set_drive(&mut self, amount: f32) {
        self.drive = amount.clamp(0.0, 1.0);
    }

    /// Current drive amount.
    pub fn drive(&self) -> f32 {
        self.drive
    }
}

impl Effect for Saturator {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        fast_tanh(input * (1.0 + self.drive * 5.0))
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}
