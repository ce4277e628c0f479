//! One-pole lowpass damping filter.
//!
//! The FDN applies frequency-dependent decay by running every feedback
//! channel through a one-pole lowpass:
//!
//! ```text
//! y[n] = y[n-1] + coeff * (x[n] - y[n-1])
//! ```
//!
//! Unlike a cutoff-frequency filter, the coefficient here is driven directly
//! by the room-size parameter (`0.2 + size * 0.4`): a larger coefficient
//! tracks the input faster and damps less, giving a brighter tail. State is
//! flushed to zero below the denormal guard so long decay tails cannot stall
//! the CPU.

use crate::flush_denormal;

/// One-pole lowpass with a directly-set smoothing coefficient.
///
/// # Invariants
///
/// - `coeff` is clamped to [0, 1]; at 0 the output freezes, at 1 the filter
///   is a pass-through
/// - `state` is flushed to zero when below 1e-20
#[derive(Debug, Clone, Default)]
pub struct DampingFilter {
    state: f32,
    coeff: f32,
}

impl DampingFilter {
    /// Create a damping filter with the given coefficient.
    pub fn new(coeff: f32) -> Self {
        Self {
            state: 0.0,
            coeff: coeff.clamp(0.0, 1.0),
        }
    }

    /// Set the smoothing coefficient (clamped to [0, 1]).
    #[inline]
    pub fn set_coeff(&mut self, coeff: f32) {
        self.coeff = coeff.clamp(0.0, 1.0);
    }

    /// Current smoothing coefficient.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Process one sample through the lowpass.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(self.state + self.coeff * (input - self.state));
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_dc() {
        let mut lp = DampingFilter::new(0.3);
        let mut out = 0.0;
        for _ in 0..1000 {
            out = lp.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-4, "DC should pass, got {out}");
    }

    #[test]
    fn attenuates_nyquist() {
        let mut lp = DampingFilter::new(0.2);
        let mut sum = 0.0f32;
        for i in 0..4800 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            sum += lp.process(input).abs();
        }
        let avg = sum / 4800.0;
        assert!(avg < 0.2, "Nyquist should be attenuated, avg = {avg}");
    }

    #[test]
    fn unity_coeff_is_passthrough() {
        let mut lp = DampingFilter::new(1.0);
        assert_eq!(lp.process(0.5), 0.5);
        assert_eq!(lp.process(-0.25), -0.25);
    }

    #[test]
    fn coeff_is_clamped() {
        let lp = DampingFilter::new(3.0);
        assert_eq!(lp.coeff(), 1.0);
        let lp = DampingFilter::new(-1.0);
        assert_eq!(lp.coeff(), 0.0);
    }

    #[test]
    fn reset_clears_state() {
        let mut lp = DampingFilter::new(0.5);
        lp.process(1.0);
        lp.reset();
        assert_eq!(lp.process(0.0), 0.0);
    }
}
