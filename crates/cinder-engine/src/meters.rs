//! Block metering published for a UI polling thread.
//!
//! The audio thread stores three scalars once per block; a display thread
//! polls them at its own rate (30 Hz is typical). Races are benign: each
//! meter is a single f32 bit pattern, so a reader sees either the previous
//! or the current block's value, never a torn one.

use std::sync::atomic::{AtomicU32, Ordering};

/// Published levels, all linear amplitude (dB conversion is display-side).
#[derive(Debug)]
pub struct Meters {
    wet_peak: AtomicU32,
    output_rms: AtomicU32,
    output_peak: AtomicU32,
}

impl Meters {
    /// Create zeroed meters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wet_peak: AtomicU32::new(0.0f32.to_bits()),
            output_rms: AtomicU32::new(0.0f32.to_bits()),
            output_peak: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    /// Publish one block's levels. Called from the audio thread only.
    pub fn publish(&self, wet_peak: f32, output_rms: f32, output_peak: f32) {
        self.wet_peak.store(wet_peak.to_bits(), Ordering::Relaxed);
        self.output_rms.store(output_rms.to_bits(), Ordering::Relaxed);
        self.output_peak.store(output_peak.to_bits(), Ordering::Relaxed);
    }

    /// Peak of the wet (post-reverb, pre-mix) signal over the last block.
    #[must_use]
    pub fn wet_peak(&self) -> f32 {
        f32::from_bits(self.wet_peak.load(Ordering::Relaxed))
    }

    /// RMS of the mono-summed output over the last block.
    #[must_use]
    pub fn output_rms(&self) -> f32 {
        f32::from_bits(self.output_rms.load(Ordering::Relaxed))
    }

    /// Peak of the mono-summed output over the last block.
    #[must_use]
    pub fn output_peak(&self) -> f32 {
        f32::from_bits(self.output_peak.load(Ordering::Relaxed))
    }

    /// Zero all meters (processing stopped).
    pub fn reset(&self) {
        self.publish(0.0, 0.0, 0.0);
    }
}

impl Default for Meters {
    fn default() -> Self {
        Self::new()
    }
}
