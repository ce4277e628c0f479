//! Cinder DSP - the effect stages of the shimmer/destruction chain.
//!
//! Each stage is a mono [`Effect`](cinder_core::Effect); the stereo engine
//! owns two instances per stage. Stage parameters are plain setters taking
//! already-smoothed values — smoothing lives in the engine, stages stay
//! stateless with respect to parameter trajectories.
//!
//! - [`Saturator`] - tanh drive stage
//! - [`Wavefolder`] - triangle-fold harmonic generator with DC blocking
//! - [`LofiDegrader`] - sample-and-hold rate reducer + dithered bit crusher
//! - [`GrainPitchShifter`] - octave-up granular shifter for the shimmer path
//! - [`ShimmerReverb`] - 8-channel FDN with pitch-shifted feedback
//!
//! ## Example
//!
//! ```rust
//! use cinder_core::Effect;
//! use cinder_dsp::ShimmerReverb;
//!
//! let mut reverb = ShimmerReverb::new(48000.0);
//! reverb.set_parameters(2.0, 0.3, 0.5, 0.0);
//! let out = reverb.process(1.0);
//! assert!(out.is_finite());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod degrader;
pub mod pitch_shift;
pub mod saturator;
pub mod shimmer;
pub mod wavefolder;

pub use degrader::LofiDegrader;
pub use pitch_shift::GrainPitchShifter;
pub use saturator::Saturator;
pub use shimmer::{ShimmerReverb, hadamard_mix};
pub use wavefolder::Wavefolder;
