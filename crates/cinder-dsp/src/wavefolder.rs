//! Wavefolder: triangle wave folding for harmonic generation.
//!
//! Folds the waveform back on itself when it exceeds the unit range, the way
//! a modular synth wavefolder does, creating dense odd-harmonic content.
//! The fold output runs through a cubic soft clip to tame extreme peaks and
//! a 20 Hz DC blocker, because asymmetric folding builds up DC.

use cinder_core::{DcBlocker, Effect, cubic_clip};
use libm::fmodf;

/// Amounts below this bypass the stage entirely.
const BYPASS_EPSILON: f32 = 0.001;

/// Post-fold level compensation.
const OUTPUT_TRIM: f32 = 0.7;

/// Triangle wavefolder with DC blocking.
///
/// `set_fold` maps amount in [0, 1] to a pre-fold gain of 1x..8x. At
/// amount ≈ 0 the stage is a bit-exact bypass.
#[derive(Debug, Clone)]
pub struct Wavefolder {
    fold_amount: f32,
    fold_gain: f32,
    dc_blocker: DcBlocker,
}

impl Wavefolder {
    /// Create a wavefolder for the given sample rate. Fold defaults to 0.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            fold_amount: 0.0,
            fold_gain: 1.0,
            dc_blocker: DcBlocker::new(sample_rate),
        }
    }

    /// Set the fold amount (clamped to [0, 1]).
    ///
    /// Maps to a pre-fold gain of `1 + amount * 7`: 0% is no folding, 100%
    /// drives the signal 8x into the fold boundaries.
    pub fn set_fold(&mut self, amount: f32) {
        self.fold_amount = amount.clamp(0.0, 1.0);
        self.fold_gain = 1.0 + self.fold_amount * 7.0;
    }

    /// Current fold amount.
    pub fn fold(&self) -> f32 {
        self.fold_amount
    }

    /// Triangle fold: wrap into [-2, 2], then `|2 - |x + 2|| - 1`. The wrap
    /// must happen before the fold so large negative inputs land in the same
    /// 4-periodic cycle as their positive counterparts.
    fn fold_shape(mut x: f32) -> f32 {
        if !(-2.0..=2.0).contains(&x) {
            x = fmodf(x + 2.0, 4.0);
            if x < 0.0 {
                x += 4.0;
            }
            x -= 2.0;
        }
        (2.0 - (x + 2.0).abs()).abs() - 1.0
    }
}

impl Effect for Wavefolder {
    fn process(&mut self, input: f32) -> f32 {
        if self.fold_amount < BYPASS_EPSILON {
            return input;
        }

        let folded = Self::fold_shape(input * self.fold_gain);
        let clipped = cubic_clip(folded);
        self.dc_blocker.process(clipped) * OUTPUT_TRIM
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.dc_blocker.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.dc_blocker.reset();
    }
}
