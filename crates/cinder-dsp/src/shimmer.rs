//! Shimmer reverb: 8-channel feedback delay network with pitch-shifted
//! feedback.
//!
//! Signal path per sample:
//!
//! 1. Input diffusion through 4 series allpasses to smear transients.
//! 2. Read the 8 delay lines (tap position scaled by room size).
//! 3. Hadamard mix the taps for dense, energy-preserving feedback.
//! 4. Per channel: one-pole damping, optional burn saturation, soft limit,
//!    then feedback gain with shimmer compensation.
//! 5. Channel 0 feeds the octave-up pitch shifter; its output is injected
//!    into the first four feedback channels.
//! 6. Write each line with feedback + diffused input + shimmer, through the
//!    soft limiter a second time.
//! 7. Output is the sum of the pre-mix taps, scaled down by 4.
//!
//! Stability rests on two independent layers: the feedback gain is clamped
//! below unity for every parameter combination, and the in-loop tanh limiter
//! catches whatever energy the shimmer injection adds on top.

use cinder_core::{
    DampingFilter, Effect, InterpolatedDelay, fast_tanh, flush_denormal, lerp, soft_limit,
};
use libm::{floorf, powf};

use crate::GrainPitchShifter;

/// Decay beyond this is treated as "infinite": feedback jumps to
/// [`FREEZE_FEEDBACK_GAIN`]. UI freeze detection uses the same constant.
pub const FREEZE_THRESHOLD_SECS: f32 = 29.5;

/// Feedback gain in freeze mode. Slightly below unity so the tail still
/// decays over minutes instead of running away.
const FREEZE_FEEDBACK_GAIN: f32 = 0.9985;

/// Hard cap on feedback gain outside freeze mode.
const MAX_FEEDBACK_GAIN: f32 = 0.985;

/// Average delay-line time used by the RT60 feedback law.
const AVG_DELAY_SECONDS: f32 = 0.030;

/// Base delay times in ms, prime-ish for inharmonic density.
const BASE_DELAY_MS: [f32; 8] = [35.3, 36.7, 33.8, 32.3, 29.0, 30.8, 27.0, 25.3];

/// Input diffuser delay times in seconds.
const DIFFUSER_DELAY_SECONDS: [f32; 4] = [0.0042, 0.0036, 0.0029, 0.0023];

/// Allpass coefficient for the input diffusers.
const DIFFUSER_GAIN: f32 = 0.6;

/// Soft limiter knee inside the feedback loop.
const LIMIT_THRESHOLD: f32 = 0.8;

/// Output level normalization for the 8-tap sum.
const OUTPUT_SCALE: f32 = 0.25;

/// 8-channel FDN shimmer reverb.
#[derive(Debug, Clone)]
pub struct ShimmerReverb {
    sample_rate: f32,
    delay_lines: [InterpolatedDelay; 8],
    base_delay_samples: [f32; 8],
    diffusers: [InterpolatedDelay; 4],
    diffuser_delay_samples: [f32; 4],
    damping: [DampingFilter; 8],
    pitch_shifter: GrainPitchShifter,
    feedback_gain: f32,
    shimmer_mix: f32,
    shimmer_compensation: f32,
    room_size: f32,
    burn: f32,
}

impl ShimmerReverb {
    /// Create a reverb for the given sample rate with default parameters
    /// (2 s decay, no shimmer, medium room, no burn).
    pub fn new(sample_rate: f32) -> Self {
        let base_delay_samples = BASE_DELAY_MS.map(|ms| floorf(ms * sample_rate / 1000.0));
        // 4x headroom: the room-size modulation reads up to 1.5x base
        let delay_lines = base_delay_samples
            .map(|samples| InterpolatedDelay::new((samples as usize * 4).max(8)));

        let diffuser_delay_samples = DIFFUSER_DELAY_SECONDS.map(|secs| secs * sample_rate);
        let diffusers = core::array::from_fn(|_| {
            InterpolatedDelay::new(((sample_rate * 0.05) as usize).max(8))
        });

        let mut reverb = Self {
            sample_rate,
            delay_lines,
            base_delay_samples,
            diffusers,
            diffuser_delay_samples,
            damping: core::array::from_fn(|_| DampingFilter::new(0.4)),
            pitch_shifter: GrainPitchShifter::new(sample_rate),
            feedback_gain: 0.85,
            shimmer_mix: 0.0,
            shimmer_compensation: 1.0,
            room_size: 0.5,
            burn: 0.0,
        };
        reverb.set_parameters(2.0, 0.0, 0.5, 0.0);
        reverb
    }

    /// Update decay, shimmer, room size, and burn together.
    ///
    /// Decay maps to feedback gain through the RT60 law
    /// `10^(-3 * avgDelay / decay)`, capped at 0.985; past
    /// [`FREEZE_THRESHOLD_SECS`] the gain jumps to the freeze value.
    /// `shimmerCompensation = 1 - shimmer * 0.15` offsets the energy the
    /// pitch-shift injection adds, keeping the loop gain below unity.
    pub fn set_parameters(
        &mut self,
        decay_seconds: f32,
        shimmer_amount: f32,
        room_size: f32,
        burn_amount: f32,
    ) {
        self.feedback_gain = if decay_seconds > FREEZE_THRESHOLD_SECS {
            FREEZE_FEEDBACK_GAIN
        } else {
            let decay = decay_seconds.max(0.1);
            powf(10.0, -3.0 * AVG_DELAY_SECONDS / decay).clamp(0.0, MAX_FEEDBACK_GAIN)
        };

        self.shimmer_mix = shimmer_amount.clamp(0.0, 1.0);
        self.shimmer_compensation = 1.0 - self.shimmer_mix * 0.15;
        self.room_size = room_size.clamp(0.0, 1.0);
        self.burn = burn_amount.clamp(0.0, 1.0);

        // Larger rooms damp less (brighter tail)
        let damping_coeff = 0.2 + self.room_size * 0.4;
        for filter in &mut self.damping {
            filter.set_coeff(damping_coeff);
        }
    }

    /// True when the current decay setting has engaged freeze mode.
    pub fn is_frozen(&self) -> bool {
        self.feedback_gain >= FREEZE_FEEDBACK_GAIN
    }
}

impl Effect for ShimmerReverb {
    fn process(&mut self, input: f32) -> f32 {
        // 1. Input diffusion: 4 series allpasses
        let mut diffused = input;
        for i in 0..4 {
            let delayed = self.diffusers[i].read(self.diffuser_delay_samples[i]);
            self.diffusers[i].write(diffused + delayed * DIFFUSER_GAIN);
            diffused = delayed - diffused * DIFFUSER_GAIN;
        }

        // 2. Tap the delay lines; room size stretches the read position
        let delay_scale = 0.5 + self.room_size;
        let mut taps = [0.0f32; 8];
        for i in 0..8 {
            taps[i] = self.delay_lines[i].read(self.base_delay_samples[i] * delay_scale);
        }

        // 3. Energy-preserving feedback mixing
        let mut mixed = hadamard_mix(&taps);

        // 4. Damping, burn, soft limit, feedback gain per channel
        for i in 0..8 {
            let damped = self.damping[i].process(mixed[i]);
            let shaped = if self.burn > 0.0 {
                // Progressive saturation per round-trip
                lerp(damped, fast_tanh(damped * (1.0 + 3.0 * self.burn)), self.burn)
            } else {
                damped
            };
            let limited = soft_limit(shaped, LIMIT_THRESHOLD);
            mixed[i] = limited * self.feedback_gain * self.shimmer_compensation;
        }

        // 5. Shimmer: channel 0 through the octave-up shifter
        let shifted = self.pitch_shifter.process(mixed[0]);

        // 6. Write back: feedback + input + shimmer, limited once more
        let input_contribution = diffused / 8.0;
        for i in 0..8 {
            let shimmer_contribution = if i < 4 {
                shifted * self.shimmer_mix * 0.25
            } else {
                0.0
            };
            let to_write = mixed[i] + input_contribution + shimmer_contribution;
            self.delay_lines[i].write(flush_denormal(soft_limit(to_write, LIMIT_THRESHOLD)));
        }

        // 7. Output: sum of the pre-mix taps
        taps.iter().sum::<f32>() * OUTPUT_SCALE
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.base_delay_samples = BASE_DELAY_MS.map(|ms| floorf(ms * sample_rate / 1000.0));
        self.delay_lines = self
            .base_delay_samples
            .map(|samples| InterpolatedDelay::new((samples as usize * 4).max(8)));
        self.diffuser_delay_samples = DIFFUSER_DELAY_SECONDS.map(|secs| secs * sample_rate);
        self.diffusers = core::array::from_fn(|_| {
            InterpolatedDelay::new(((sample_rate * 0.05) as usize).max(8))
        });
        self.pitch_shifter.set_sample_rate(sample_rate);
        for filter in &mut self.damping {
            filter.reset();
        }
    }

    fn reset(&mut self) {
        for line in &mut self.delay_lines {
            line.clear();
        }
        for diffuser in &mut self.diffusers {
            diffuser.clear();
        }
        for filter in &mut self.damping {
            filter.reset();
        }
        self.pitch_shifter.reset();
    }
}

/// Multiply an 8-vector by the normalized 8x8 Hadamard matrix.
///
/// Entry `(i, j)` is `(-1)^popcount(i & j) / sqrt(8)`. The matrix is
/// orthogonal, so the mix preserves total energy exactly.
#[must_use]
pub fn hadamard_mix(input: &[f32; 8]) -> [f32; 8] {
    const NORM: f32 = 0.353_553_39; // 1 / sqrt(8)

    let mut output = [0.0f32; 8];
    for (i, out) in output.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (j, &x) in input.iter().enumerate() {
            let sign = if (i & j).count_ones() % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            sum += sign * x;
        }
        *out = sum * NORM;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn hadamard_matrix_is_orthogonal() {
        // M * M^T = I: feed each basis vector through and check dot products
        let mut rows = [[0.0f32; 8]; 8];
        for j in 0..8 {
            let mut basis = [0.0f32; 8];
            basis[j] = 1.0;
            let col = hadamard_mix(&basis);
            for i in 0..8 {
                rows[i][j] = col[i];
            }
        }
        for a in 0..8 {
            for b in 0..8 {
                let dot: f32 = (0..8).map(|k| rows[a][k] * rows[b][k]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!(
                    (dot - expected).abs() < 1e-5,
                    "row {a} . row {b} = {dot}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn hadamard_preserves_energy() {
        let input = [0.5, -0.3, 0.8, 0.1, -0.9, 0.2, 0.4, -0.6];
        let output = hadamard_mix(&input);
        let energy_in: f32 = input.iter().map(|x| x * x).sum();
        let energy_out: f32 = output.iter().map(|x| x * x).sum();
        assert!((energy_in - energy_out).abs() < 1e-4);
    }

    #[test]
    fn impulse_decays_monotonically() {
        let fs = 48000.0;
        let mut reverb = ShimmerReverb::new(fs);
        reverb.set_parameters(2.0, 0.0, 0.5, 0.0);

        let mut output = vec![reverb.process(1.0)];
        for _ in 0..(fs as usize * 2) {
            output.push(reverb.process(0.0));
        }

        // RMS over successive 100 ms windows must decay after the initial
        // transient has built up
        let window = (fs * 0.1) as usize;
        let windows: Vec<f32> = output.chunks(window).map(rms).collect();
        for pair in windows[2..].windows(2) {
            assert!(
                pair[1] <= pair[0] * 1.01,
                "tail grew: {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn silence_in_silence_out() {
        let fs = 48000.0;
        let mut reverb = ShimmerReverb::new(fs);
        reverb.set_parameters(10.0, 1.0, 1.0, 0.0);

        // Excite, then feed silence for 10 s and require convergence
        reverb.process(1.0);
        let mut out = 0.0;
        let tail = (fs as usize) * 10;
        let mut tail_rms = 0.0f64;
        for i in 0..tail {
            out = reverb.process(0.0);
            if i >= tail - 4800 {
                tail_rms += f64::from(out * out);
            }
        }
        let tail_rms = (tail_rms / 4800.0).sqrt();
        assert!(out.is_finite());
        assert!(tail_rms < 1e-3, "tail failed to converge: rms {tail_rms}");
    }

    #[test]
    fn feedback_gain_never_reaches_unity() {
        let mut reverb = ShimmerReverb::new(48000.0);
        for decay in [0.1, 1.0, 5.0, 29.4, 29.6, 100.0, f32::MAX] {
            for shimmer in [0.0, 0.5, 1.0] {
                reverb.set_parameters(decay, shimmer, 1.0, 1.0);
                let effective = reverb.feedback_gain * reverb.shimmer_compensation;
                assert!(
                    effective < 1.0,
                    "effective gain {effective} at decay {decay}, shimmer {shimmer}"
                );
            }
        }
    }

    #[test]
    fn freeze_engages_past_threshold() {
        let mut reverb = ShimmerReverb::new(48000.0);
        reverb.set_parameters(29.4, 0.0, 0.5, 0.0);
        assert!(!reverb.is_frozen());
        reverb.set_parameters(29.6, 0.0, 0.5, 0.0);
        assert!(reverb.is_frozen());
        assert_eq!(reverb.feedback_gain, FREEZE_FEEDBACK_GAIN);
    }

    #[test]
    fn no_nan_with_extreme_parameters_and_hot_input() {
        let mut reverb = ShimmerReverb::new(44100.0);
        reverb.set_parameters(30.0, 1.0, 1.0, 1.0);

        let mut state = 7u32;
        for _ in 0..44100 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let x = (((state >> 16) & 0x7fff) as f32 / 16384.0 - 1.0) * 2.0;
            let y = reverb.process(x);
            assert!(y.is_finite(), "reverb produced non-finite output");
        }
    }

    #[test]
    fn reset_kills_the_tail() {
        let mut reverb = ShimmerReverb::new(48000.0);
        reverb.set_parameters(10.0, 0.5, 0.8, 0.0);
        for _ in 0..4800 {
            reverb.process(0.5);
        }
        reverb.reset();
        let y = reverb.process(0.0);
        assert_eq!(y, 0.0, "tap after reset must read cleared buffers");
    }
}
