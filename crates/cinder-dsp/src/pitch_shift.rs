//! Granular octave-up pitch shifter for the shimmer feedback path.
//!
//! The simplest shifter that works inside a reverb tail: write into a
//! circular buffer at 1x, read at 2x with linear interpolation, and shape
//! each grain with a raised-cosine window to mask the splice points. The
//! artifacts this leaves (grain flutter, comb coloration) disappear into
//! the dense FDN feedback, which is the only place this runs.

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use cinder_core::Effect;
use libm::cosf;

/// Circular buffer length in seconds.
const BUFFER_SECONDS: f32 = 0.5;

/// Read-rate multiplier: 2x is one octave up.
const PITCH_RATIO: f32 = 2.0;

/// Grain length in samples for the raised-cosine window.
const GRAIN_SIZE: usize = 512;

/// Octave-up granular shifter with a fixed 512-sample grain window.
#[derive(Debug, Clone)]
pub struct GrainPitchShifter {
    buffer: Vec<f32>,
    write_pos: usize,
    read_pos: f32,
}

impl GrainPitchShifter {
    /// Create a shifter with a 500 ms buffer at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let len = ((sample_rate * BUFFER_SECONDS) as usize).max(GRAIN_SIZE * 2);
        Self {
            buffer: vec![0.0; len],
            write_pos: 0,
            read_pos: 0.0,
        }
    }
}

impl Effect for GrainPitchShifter {
    fn process(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();

        self.buffer[self.write_pos] = input;
        self.write_pos = (self.write_pos + 1) % len;

        // Read cursor outruns the write cursor 2:1; wrap keeps it in range
        self.read_pos += PITCH_RATIO;
        if self.read_pos >= len as f32 {
            self.read_pos -= len as f32;
        }

        let read_idx = self.read_pos as usize;
        let frac = self.read_pos - read_idx as f32;
        let next_idx = (read_idx + 1) % len;
        let sample = self.buffer[read_idx] * (1.0 - frac) + self.buffer[next_idx] * frac;

        // Raised-cosine grain window, zero at the grain seams
        let grain_pos = read_idx % GRAIN_SIZE;
        let window = 0.5
            - 0.5 * cosf(2.0 * core::f32::consts::PI * grain_pos as f32 / GRAIN_SIZE as f32);

        sample * window
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let len = ((sample_rate * BUFFER_SECONDS) as usize).max(GRAIN_SIZE * 2);
        self.buffer = vec![0.0; len];
        self.write_pos = 0;
        self.read_pos = 0.0;
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.read_pos = 0.0;
    }
}
