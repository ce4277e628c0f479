//! Envelope follower for sidechain ducking.
//!
//! Tracks the rectified amplitude of the dry signal with asymmetric attack
//! and release so the wet signal can duck under the dry performance and
//! bloom back in the gaps.

use libm::expf;

/// Peak-style envelope follower with separate attack and release times.
///
/// State update per sample (x is the rectified input):
///
/// ```text
/// coeff = attack if x > env else release
/// env   = coeff * env + (1 - coeff) * x
/// ```
///
/// The envelope is always >= 0, bounded by the peak input magnitude, and
/// converges toward zero exponentially once the input stops.
///
/// # Example
///
/// ```rust
/// use cinder_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::with_times(48000.0, 0.5, 150.0);
/// let level = env.process(0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Create with specified attack and release times in milliseconds.
    ///
    /// The ducking sidechain uses 0.5 ms attack / 150 ms release: fast enough
    /// to catch transients, slow enough to avoid pumping on release.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: attack_ms.max(0.1),
            release_ms: release_ms.max(1.0),
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Update sample rate and recalculate both coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Process a rectified-or-signed sample and return the envelope level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input_abs = input.abs();
        let coeff = if input_abs > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * input_abs;
        self.envelope
    }

    /// Current envelope level without processing new input.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    // coeff = exp(-1 / (time_ms * sample_rate / 1000))
    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = expf(-1.0 / (self.attack_ms * self.sample_rate / 1000.0));
        self.release_coeff = expf(-1.0 / (self.release_ms * self.sample_rate / 1000.0));
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::with_times(48000.0, 0.5, 150.0)
    }
}
