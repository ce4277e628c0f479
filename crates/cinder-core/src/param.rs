//! Parameter smoothing for zipper-free control changes.
//!
//! Control values arriving from a UI or host change in coarse steps; applying
//! them directly produces audible "zipper noise". [`SmoothedParam`] turns a
//! stepped target into a click-free per-sample trajectory using a one-pole
//! exponential ramp.
//!
//! The engine owns one smoother per parameter, refreshes the targets once per
//! block, and calls [`advance`](SmoothedParam::advance) once per sample.

use libm::expf;

/// Remaining fraction of a step at the configured smoothing time.
const SETTLE_EPSILON: f32 = 1e-3;

/// `ln(1 / SETTLE_EPSILON)`, the decay exponent spread over the ramp.
const SETTLE_RATE: f32 = 6.907_755;

/// A control value with built-in exponential smoothing.
///
/// The trajectory is a one-pole lowpass toward the target:
///
/// ```text
/// y[n] = y[n-1] + coeff * (target - y[n-1])
/// coeff = 1 - exp(-ln(1/eps) / (time * sample_rate))
/// ```
///
/// The exponent is scaled so the ramp lands within `eps` (0.1%) of the step
/// size at the configured smoothing time, not merely one time constant into
/// it. The ramp is monotonic toward the target.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter with full configuration.
    ///
    /// # Arguments
    /// * `initial` - Starting value (current and target)
    /// * `sample_rate` - Sample rate in Hz
    /// * `smoothing_time_ms` - Total ramp time in milliseconds
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate,
            smoothing_time_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Set a new destination; the value ramps there without discontinuity.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Snap both current and target to `value` (no ramp).
    ///
    /// Used at prepare time so playback does not start with a ramp-in from
    /// zero.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Update the sample rate and recalculate the smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Return the next smoothed value, advancing state by one sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The value being ramped toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let ramp_samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-SETTLE_RATE / ramp_samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::with_config(0.0, 48000.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_when_no_smoothing() {
        let mut param = SmoothedParam::with_config(1.0, 48000.0, 0.0);
        param.set_target(0.5);
        assert!((param.advance() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn converges_within_configured_time() {
        // 50 ms at 48 kHz is 2400 samples; the ramp must have landed by then
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 50.0);
        param.set_target(1.0);
        for _ in 0..2400 {
            param.advance();
        }
        assert!(
            (param.get() - 1.0).abs() < 0.01,
            "50 ms elapsed, error still {}",
            (param.get() - 1.0).abs()
        );
    }

    #[test]
    fn residual_matches_epsilon_at_ramp_end() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        param.set_target(1.0);
        for _ in 0..480 {
            param.advance();
        }
        let residual = 1.0 - param.get();
        assert!(
            (residual - SETTLE_EPSILON).abs() < SETTLE_EPSILON * 0.5,
            "expected ~{SETTLE_EPSILON} left, got {residual}"
        );
    }

    #[test]
    fn ramp_is_monotonic() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 50.0);
        param.set_target(1.0);
        let mut prev = param.get();
        for _ in 0..10_000 {
            let v = param.advance();
            assert!(v >= prev, "ramp must be monotonic toward target");
            prev = v;
        }
    }

    #[test]
    fn set_immediate_snaps_both() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 50.0);
        param.set_immediate(0.7);
        assert_eq!(param.get(), 0.7);
        assert_eq!(param.target(), 0.7);
        // advancing holds steady
        assert!((param.advance() - 0.7).abs() < 1e-7);
    }
}
