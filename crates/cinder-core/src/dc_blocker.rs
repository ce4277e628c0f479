//! DC blocking filter.
//!
//! First-order highpass (Julius O. Smith's DC blocker):
//!
//! ```text
//! H(z) = (1 - z^-1) / (1 - R * z^-1)
//! ```
//!
//! Wavefolding generates DC offset whenever the folded waveform is
//! asymmetric; the folder runs its output through one of these with a 20 Hz
//! corner. The -3 dB cutoff is `f_c = (1 - R) / (2*pi) * f_s`.
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters with Audio
//! Applications", DC Blocker chapter.

use core::f32::consts::PI;

/// First-order highpass DC blocker.
#[derive(Debug, Clone)]
pub struct DcBlocker {
    /// R coefficient (pole position, controls cutoff frequency)
    coeff: f32,
    /// Previous input sample x[n-1]
    x_prev: f32,
    /// Previous output sample y[n-1]
    y_prev: f32,
    /// Corner frequency, kept to recompute R on sample-rate changes
    cutoff_hz: f32,
}

impl DcBlocker {
    /// Default corner frequency in Hz.
    const DEFAULT_CUTOFF_HZ: f32 = 20.0;

    /// Create a DC blocker with the default 20 Hz corner.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_cutoff(sample_rate, Self::DEFAULT_CUTOFF_HZ)
    }

    /// Create a DC blocker with a specific corner frequency.
    pub fn with_cutoff(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self {
            coeff: Self::calculate_coeff(cutoff_hz, sample_rate),
            x_prev: 0.0,
            y_prev: 0.0,
            cutoff_hz,
        }
    }

    /// Process one sample: `y[n] = x[n] - x[n-1] + R * y[n-1]`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = input - self.x_prev + self.coeff * self.y_prev;
        self.x_prev = input;
        self.y_prev = output;
        output
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }

    /// Recompute R for a new sample rate, keeping the same corner.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.coeff = Self::calculate_coeff(self.cutoff_hz, sample_rate);
    }

    /// Current R coefficient.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    // R = 1 - 2*pi*fc/fs, clamped into a stable range.
    fn calculate_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
        let r = 1.0 - (2.0 * PI * cutoff_hz / sample_rate);
        r.clamp(0.9, 0.9999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_dc() {
        let mut blocker = DcBlocker::new(48000.0);
        let mut output = 0.0;
        for _ in 0..48000 {
            output = blocker.process(1.0);
        }
        assert!(output.abs() < 0.01, "DC should be removed, got {output}");
    }

    #[test]
    fn passes_audio_band() {
        let mut blocker = DcBlocker::new(48000.0);
        let freq = 1000.0;
        let sample_rate = 48000.0;

        for i in 0..48000 {
            let t = i as f32 / sample_rate;
            blocker.process(libm::sinf(2.0 * PI * freq * t));
        }

        let mut max_output = 0.0f32;
        for i in 0..48 {
            let t = (48000 + i) as f32 / sample_rate;
            let output = blocker.process(libm::sinf(2.0 * PI * freq * t));
            max_output = max_output.max(output.abs());
        }

        assert!(
            max_output > 0.95,
            "1 kHz should pass through, max output was {max_output}"
        );
    }

    #[test]
    fn reset_clears_state() {
        let mut blocker = DcBlocker::new(48000.0);
        for _ in 0..100 {
            blocker.process(1.0);
        }
        blocker.reset();
        assert_eq!(blocker.process(0.0), 0.0);
    }

    #[test]
    fn sample_rate_change_keeps_corner() {
        let mut blocker = DcBlocker::new(48000.0);
        let r48 = blocker.coeff();
        blocker.set_sample_rate(96000.0);
        // Higher rate -> pole closer to 1 for the same 20 Hz corner
        assert!(blocker.coeff() > r48);
    }
}
