//! Core Effect trait.
//!
//! Every stage in the signal chain (saturator, wavefolder, degrader, reverb)
//! implements [`Effect`]. The trait is mono by design: the stereo engine owns
//! two independent instances of each stage, one per channel, mirroring the
//! dual-mono topology of the effect.
//!
//! ## Design Decisions
//!
//! - **Sample-at-a-time**: the router recomputes stage parameters every
//!   sample from smoothed values, so block-level shortcuts would not help.
//! - **Object-safe**: `dyn Effect` works, though the engine uses static
//!   dispatch throughout.
//! - **No allocations**: all methods must be callable from a real-time audio
//!   callback.

/// Core trait for all mono audio stages.
pub trait Effect {
    /// Process a single sample, advancing internal state by one sample.
    ///
    /// # Arguments
    /// * `input` - Input sample, typically in range [-1.0, 1.0]
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    ///
    /// # Panics
    /// Default implementation debug-asserts `input.len() == output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Update the sample rate.
    ///
    /// Stages recalculate sample-rate-dependent coefficients (damping,
    /// envelope times, DC-blocker corner) and resize delay buffers here.
    /// Only called while processing is stopped.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear all internal state (delay lines, filter history, held samples)
    /// without changing parameters.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32);

    impl Effect for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn test_process_block_default() {
        let mut gain = Gain(2.0);
        let input = [1.0, 2.0, 3.0];
        let mut output = [0.0; 3];
        gain.process_block(&input, &mut output);
        assert_eq!(output, [2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_object_safety() {
        let mut boxed: Box<dyn Effect> = Box::new(Gain(0.5));
        assert_eq!(boxed.process(2.0), 1.0);
    }
}
