//! Circular-buffer delay line with fractional reads.
//!
//! The building block for the FDN delay lines, the input diffusers, and the
//! shimmer pitch buffer. The read position may be fractional; values between
//! samples are linearly interpolated, which keeps size modulation free of
//! stepping artifacts.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolated delay line over a heap-allocated circular buffer.
///
/// The buffer is allocated once at construction and never reallocates; no
/// allocation happens during audio processing. Each delay line is owned
/// exclusively by one consumer (one FDN channel, one diffuser stage).
///
/// # Example
///
/// ```rust
/// use cinder_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(64);
/// delay.write(1.0);
/// for _ in 0..9 {
///     delay.write(0.0);
/// }
/// assert_eq!(delay.read(9.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Create a delay line holding up to `max_delay_samples` samples.
    ///
    /// # Panics
    /// Panics if `max_delay_samples` is 0.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "Delay size must be > 0");
        Self {
            buffer: vec![0.0; max_delay_samples],
            write_pos: 0,
        }
    }

    /// Create a delay line from a sample rate and a maximum delay in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        let max_samples = (sample_rate * max_seconds) as usize + 1;
        Self::new(max_samples)
    }

    /// Read a delayed sample with linear interpolation.
    ///
    /// `delay_samples` may be fractional and is clamped to the buffer
    /// capacity. A delay of 0.0 returns the most recently written sample.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let delay_clamped = delay_samples.min((len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        // Points at the sample `delay_int` samples before the last written.
        let read_pos = (self.write_pos + len - delay_int - 1) % len;
        let older_pos = (read_pos + len - 1) % len;

        let a = self.buffer[read_pos];
        let b = self.buffer[older_pos];
        a + (b - a) * frac
    }

    /// Write a sample and advance the write cursor.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Zero the buffer and rewind the write cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_delay() {
        let mut delay = InterpolatedDelay::new(10);
        for i in 1..=6 {
            delay.write(i as f32);
        }
        assert_eq!(delay.read(3.0), 3.0);
    }

    #[test]
    fn test_fractional_delay_interpolates() {
        let mut delay = InterpolatedDelay::new(10);
        delay.write(0.0);
        delay.write(1.0);
        delay.write(2.0);
        delay.write(3.0);

        let output = delay.read(1.5);
        assert!((output - 1.5).abs() < 0.01, "Expected ~1.5, got {output}");
    }

    #[test]
    fn test_wraparound() {
        let mut delay = InterpolatedDelay::new(4);
        for i in 1..=5 {
            delay.write(i as f32);
        }
        assert_eq!(delay.read(3.0), 2.0);
    }

    #[test]
    fn test_clear() {
        let mut delay = InterpolatedDelay::new(8);
        delay.write(1.0);
        delay.clear();
        assert_eq!(delay.read(0.0), 0.0);
        assert_eq!(delay.read(7.0), 0.0);
    }

    #[test]
    fn test_from_time() {
        let delay = InterpolatedDelay::from_time(48000.0, 0.5);
        assert!(delay.capacity() >= 24000);
    }

    #[test]
    #[should_panic]
    fn test_zero_size_panics() {
        let _ = InterpolatedDelay::new(0);
    }

    #[test]
    fn test_read_clamps_to_capacity() {
        let mut delay = InterpolatedDelay::new(4);
        delay.write(1.0);
        // Way past capacity: clamped, no panic
        let out = delay.read(100.0);
        assert!(out.is_finite());
    }
}
