//! Cinder engine - the stereo shimmer/destruction processor.
//!
//! Ties the DSP stages from `cinder-dsp` into a host-facing engine:
//!
//! - [`CinderEngine`] - in-place stereo block processing with three routing
//!   topologies ([`RoutingMode`])
//! - [`ParamStore`] - lock-free parameter sharing between a control thread
//!   and the audio thread, keyed by [`ParamId`]
//! - [`Meters`] - per-block levels published for a UI polling thread
//! - [`ParamSnapshot`] - JSON state save/restore (parameters only)
//!
//! The audio path allocates nothing, takes no locks, and never branches
//! into error paths; all fallible surface lives on the control side.
//!
//! ## Example
//!
//! ```rust
//! use cinder_engine::{CinderEngine, ParamId, RoutingMode};
//!
//! let mut engine = CinderEngine::new(48000.0);
//! engine.set_routing(RoutingMode::PrePost);
//!
//! let params = engine.params();
//! params.set(ParamId::Decay, 4.0);
//! params.set(ParamId::Shimmer, 0.6);
//! params.set(ParamId::Mix, 0.5);
//!
//! let mut left = vec![0.0f32; 256];
//! let mut right = vec![0.0f32; 256];
//! engine.process(&mut left, &mut right);
//! ```

pub mod engine;
pub mod meters;
pub mod params;
pub mod state;

pub use engine::{CinderEngine, FREEZE_THRESHOLD_SECS, RoutingMode};
pub use meters::Meters;
pub use params::{ParamId, ParamStore};
pub use state::{ParamSnapshot, StateError};
