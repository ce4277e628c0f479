//! Lo-fi degrader: sample-rate reduction plus dithered bit crushing.
//!
//! A single amount control sweeps both axes at once: 0 is clean, 1 is a
//! 4 kHz / 4-bit wreck. Rate reduction is a plain sample-and-hold driven by
//! a phase accumulator; quantization happens only at latch points, so the
//! held value is already crushed.

use cinder_core::Effect;
use libm::{powf, roundf};

/// Amounts below this bypass the stage entirely.
const BYPASS_EPSILON: f32 = 0.001;

/// Lowest target sample rate in Hz at full degrade.
const MIN_TARGET_RATE: f32 = 4000.0;

/// Lowest bit depth at full degrade.
const MIN_BITS: f32 = 4.0;

/// Dither only applies above this bit depth; at heavy crush the grit is
/// the point and dither would just soften it.
const DITHER_BITS_THRESHOLD: f32 = 6.0;

/// Combined sample-rate reducer and bit crusher.
///
/// `set_degrade` maps amount in [0, 1] onto both target rate
/// (`fs * 0.1^amount`, floored at 4 kHz) and bit depth (`16 - amount * 12`,
/// floored at 4 bits). Above 6 bits a triangular-PDF dither decorrelates the
/// quantization error.
#[derive(Debug, Clone)]
pub struct LofiDegrader {
    sample_rate: f32,
    target_rate: f32,
    target_bits: f32,
    degrade_amount: f32,
    phase: f32,
    held: f32,
    rng_state: u32,
}

impl LofiDegrader {
    /// Create a degrader for the given sample rate. Degrade defaults to 0.
    pub fn new(sample_rate: f32) -> Self {
        let mut degrader = Self {
            sample_rate,
            target_rate: sample_rate,
            target_bits: 16.0,
            degrade_amount: 0.0,
            phase: 0.0,
            held: 0.0,
            rng_state: 0x1234_5678,
        };
        degrader.set_degrade(0.0);
        degrader
    }

    /// Set the degrade amount (clamped to [0, 1]).
    pub fn set_degrade(&mut self, amount: f32) {
        self.degrade_amount = amount.clamp(0.0, 1.0);
        self.target_rate = (self.sample_rate * powf(0.1, self.degrade_amount)).max(MIN_TARGET_RATE);
        self.target_bits = (16.0 - self.degrade_amount * 12.0).max(MIN_BITS);
    }

    /// Current degrade amount.
    pub fn degrade(&self) -> f32 {
        self.degrade_amount
    }

    /// Park-Miller-family LCG, uniform in [0, 1).
    fn next_unit(&mut self) -> f32 {
        self.rng_state = self.rng_state.wrapping_mul(1_103_515_245).wrapping_add(12345);
        ((self.rng_state >> 16) & 0x7fff) as f32 / 32768.0
    }

    /// Quantize to the current bit depth, with TPDF dither above 6 bits.
    fn bit_crush(&mut self, input: f32) -> f32 {
        let scale = powf(2.0, self.target_bits - 1.0);
        let step = 1.0 / scale;

        let dithered = if self.target_bits > DITHER_BITS_THRESHOLD {
            // Triangular dither at half an LSB: sum of two uniforms, centered
            let tri = self.next_unit() + self.next_unit() - 1.0;
            input + tri * step * 0.5
        } else {
            input
        };

        roundf(dithered * scale) / scale
    }
}

impl Effect for LofiDegrader {
    fn process(&mut self, input: f32) -> f32 {
        if self.degrade_amount < BYPASS_EPSILON {
            return input;
        }

        self.phase += self.target_rate / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
            self.held = self.bit_crush(input);
        }
        self.held
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        // Re-derive the target rate against the new base rate
        self.set_degrade(self.degrade_amount);
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.held = 0.0;
        self.rng_state = 0x1234_5678;
    }
}
