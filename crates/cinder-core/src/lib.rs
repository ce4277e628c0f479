//! Cinder Core - DSP primitives for the cinder shimmer/destruction effect
//!
//! This crate provides the foundational building blocks used by the effect
//! stages and the stereo engine, designed for real-time processing with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! - [`Effect`] - Object-safe trait for all mono audio stages
//! - [`SmoothedParam`] - Exponential parameter smoothing (zipper-free automation)
//! - [`InterpolatedDelay`] - Circular-buffer delay line with fractional reads
//! - [`DampingFilter`] - One-pole lowpass driven by a direct smoothing coefficient
//! - [`DcBlocker`] - First-order highpass for DC offset removal
//! - [`EnvelopeFollower`] - Rectified amplitude tracking with asymmetric attack/release
//! - [`ParamDescriptor`] - Parameter metadata (name, range, default)
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocations in `process` paths; buffers are sized
//!   at construction or `set_sample_rate` time only
//! - **no_std compatible**: math through `libm`, heap only via `alloc`
//! - **Stability by construction**: helpers like [`soft_limit`] and
//!   [`flush_denormal`] exist so feedback networks stay bounded and fast

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod dc_blocker;
pub mod delay;
pub mod effect;
pub mod envelope;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod param_info;

pub use dc_blocker::DcBlocker;
pub use delay::InterpolatedDelay;
pub use effect::Effect;
pub use envelope::EnvelopeFollower;
pub use math::{
    cubic_clip, db_to_linear, fast_tanh, flush_denormal, lerp, linear_to_db, mono_sum, soft_limit,
    wet_dry_mix,
};
pub use one_pole::DampingFilter;
pub use param::SmoothedParam;
pub use param_info::ParamDescriptor;
