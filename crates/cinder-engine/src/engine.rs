//! Stereo engine: parameter smoothing, routing, ducking, and metering.
//!
//! The engine owns two independent mono stage chains (left/right), one
//! shared envelope follower fed by the rectified mono sum of the dry input,
//! and one smoother per parameter. Targets are pulled from the shared
//! [`ParamStore`] once per block; every smoother advances once per sample
//! so parameter changes never zipper.

use std::sync::Arc;

use cinder_core::{Effect, EnvelopeFollower, SmoothedParam, mono_sum, wet_dry_mix};
use cinder_dsp::{LofiDegrader, Saturator, ShimmerReverb, Wavefolder, shimmer};

use crate::meters::Meters;
use crate::params::{ParamId, ParamStore};
use crate::state::{ParamSnapshot, StateError};

/// Decay beyond this reads as "infinite"/freeze, for both the reverb's
/// feedback law and UI display.
pub const FREEZE_THRESHOLD_SECS: f32 = shimmer::FREEZE_THRESHOLD_SECS;

/// Parameter smoothing ramp time in milliseconds.
const SMOOTHING_TIME_MS: f32 = 50.0;

/// Decay substituted once the freeze threshold is crossed; far past the
/// threshold so the reverb unambiguously selects its freeze gain.
const FREEZE_DECAY_SECS: f32 = 100.0;

/// Routing amounts below this skip the optional path entirely.
const ROUTE_EPSILON: f32 = 0.001;

/// How the stages compose into the output sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingMode {
    /// dry -> reverb -> degrade -> clean/folded blend by dirt -> mix.
    Simple,
    /// Destruction placed before and/or after the reverb, blended by `pre`,
    /// with sidechain ducking. The full-featured topology.
    #[default]
    PrePost,
    /// dry -> tanh drive -> reverb with burn in the feedback -> hard duck
    /// (envelope x5, clamped) -> mix.
    DriveBurn,
}

/// Per-sample smoothed parameter values handed to the channel chains.
#[derive(Debug, Clone, Copy)]
struct SampleParams {
    decay: f32,
    shimmer: f32,
    size: f32,
    degrade: f32,
    fold: f32,
    dirt: f32,
    drive: f32,
    burn: f32,
    duck: f32,
    mix: f32,
    pre: f32,
}

/// One channel's worth of DSP stages.
#[derive(Debug, Clone)]
struct ChannelStages {
    reverb: ShimmerReverb,
    saturator: Saturator,
    pre_degrader: LofiDegrader,
    pre_folder: Wavefolder,
    post_degrader: LofiDegrader,
    post_folder: Wavefolder,
}

impl ChannelStages {
    fn new(sample_rate: f32) -> Self {
        Self {
            reverb: ShimmerReverb::new(sample_rate),
            saturator: Saturator::new(),
            pre_degrader: LofiDegrader::new(sample_rate),
            pre_folder: Wavefolder::new(sample_rate),
            post_degrader: LofiDegrader::new(sample_rate),
            post_folder: Wavefolder::new(sample_rate),
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.reverb.set_sample_rate(sample_rate);
        self.saturator.set_sample_rate(sample_rate);
        self.pre_degrader.set_sample_rate(sample_rate);
        self.pre_folder.set_sample_rate(sample_rate);
        self.post_degrader.set_sample_rate(sample_rate);
        self.post_folder.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.reverb.reset();
        self.saturator.reset();
        self.pre_degrader.reset();
        self.pre_folder.reset();
        self.post_degrader.reset();
        self.post_folder.reset();
    }

    /// Push smoothed values into the stages for this sample.
    fn apply_params(&mut self, p: &SampleParams, mode: RoutingMode) {
        let actual_decay = if p.decay > FREEZE_THRESHOLD_SECS {
            FREEZE_DECAY_SECS
        } else {
            p.decay
        };
        let burn = if mode == RoutingMode::DriveBurn {
            p.burn
        } else {
            0.0
        };
        self.reverb.set_parameters(actual_decay, p.shimmer, p.size, burn);

        self.saturator.set_drive(p.drive);
        self.pre_degrader.set_degrade(p.degrade);
        self.pre_folder.set_fold(p.fold);
        self.post_degrader.set_degrade(p.degrade);
        self.post_folder.set_fold(p.fold);
    }

    /// Degrade + fold in parallel-ish: the folder runs on the degraded
    /// signal, and `dirt` blends between the two outputs.
    fn destroy(degrader: &mut LofiDegrader, folder: &mut Wavefolder, x: f32, dirt: f32) -> f32 {
        let degraded = degrader.process(x);
        let folded = folder.process(degraded);
        degraded * (1.0 - dirt) + folded * dirt
    }

    /// Produce the pre-duck wet sample for one channel.
    fn process_wet(&mut self, dry: f32, p: &SampleParams, mode: RoutingMode) -> f32 {
        match mode {
            RoutingMode::Simple => {
                let reverbed = self.reverb.process(dry);
                Self::destroy(&mut self.post_degrader, &mut self.post_folder, reverbed, p.dirt)
            }
            RoutingMode::PrePost => {
                // Destroy before the reverb, blended in by `pre`
                let pre_destroyed = if p.pre > ROUTE_EPSILON {
                    Self::destroy(&mut self.pre_degrader, &mut self.pre_folder, dry, p.dirt)
                } else {
                    dry
                };
                let reverb_in = dry * (1.0 - p.pre) + pre_destroyed * p.pre;
                let reverbed = self.reverb.process(reverb_in);

                // Destroy after the reverb, weighted by the inverse
                let post_destroyed = if p.pre < 1.0 - ROUTE_EPSILON {
                    Self::destroy(&mut self.post_degrader, &mut self.post_folder, reverbed, p.dirt)
                } else {
                    reverbed
                };
                post_destroyed * (1.0 - p.pre) + reverbed * p.pre
            }
            RoutingMode::DriveBurn => {
                let driven = self.saturator.process(dry);
                self.reverb.process(driven)
            }
        }
    }
}

/// The stereo Cinder engine.
///
/// # Example
///
/// ```rust
/// use cinder_engine::{CinderEngine, ParamId};
///
/// let mut engine = CinderEngine::new(48000.0);
/// engine.params().set(ParamId::Mix, 1.0);
///
/// let mut left = vec![0.0f32; 512];
/// let mut right = vec![0.0f32; 512];
/// left[0] = 1.0;
/// right[0] = 1.0;
/// engine.process(&mut left, &mut right);
/// assert!(left.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug)]
pub struct CinderEngine {
    sample_rate: f32,
    routing: RoutingMode,
    params: Arc<ParamStore>,
    meters: Arc<Meters>,
    smoothers: [SmoothedParam; ParamId::COUNT],
    envelope: EnvelopeFollower,
    left: ChannelStages,
    right: ChannelStages,
}

impl CinderEngine {
    /// Create an engine at the given sample rate with default parameters
    /// and the pre/post routing topology.
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        let smoothers = std::array::from_fn(|i| {
            SmoothedParam::with_config(
                ParamId::ALL[i].descriptor().default,
                sample_rate,
                SMOOTHING_TIME_MS,
            )
        });
        Self {
            sample_rate,
            routing: RoutingMode::default(),
            params: Arc::new(ParamStore::new()),
            meters: Arc::new(Meters::new()),
            smoothers,
            envelope: EnvelopeFollower::with_times(sample_rate, 0.5, 150.0),
            left: ChannelStages::new(sample_rate),
            right: ChannelStages::new(sample_rate),
        }
    }

    /// Shared handle to the parameter store for control threads.
    #[must_use]
    pub fn params(&self) -> Arc<ParamStore> {
        Arc::clone(&self.params)
    }

    /// Shared handle to the published meters for display threads.
    #[must_use]
    pub fn meters(&self) -> Arc<Meters> {
        Arc::clone(&self.meters)
    }

    /// Select the routing topology. Takes effect on the next block.
    pub fn set_routing(&mut self, mode: RoutingMode) {
        tracing::debug!(?mode, "routing changed");
        self.routing = mode;
    }

    /// Current routing topology.
    #[must_use]
    pub fn routing(&self) -> RoutingMode {
        self.routing
    }

    /// Current sample rate.
    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// True when the smoothed decay has crossed the freeze threshold.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.smoothers[ParamId::Decay as usize].get() > FREEZE_THRESHOLD_SECS
    }

    /// Reinitialize for a (possibly new) sample rate. Must be called while
    /// processing is stopped; clears all DSP state and snaps smoothers to
    /// the current store values.
    pub fn prepare(&mut self, sample_rate: f32) {
        tracing::debug!(sample_rate, "prepare");
        self.sample_rate = sample_rate;
        self.left.set_sample_rate(sample_rate);
        self.right.set_sample_rate(sample_rate);
        self.envelope.set_sample_rate(sample_rate);
        for (i, smoother) in self.smoothers.iter_mut().enumerate() {
            smoother.set_sample_rate(sample_rate);
            smoother.set_immediate(self.params.get(ParamId::ALL[i]));
        }
        self.reset();
    }

    /// Serialize the current parameter values to JSON.
    ///
    /// Only parameters are saved; the reverb tail is not part of the state.
    pub fn state_json(&self) -> Result<String, StateError> {
        ParamSnapshot::capture(&self.params).to_json()
    }

    /// Restore parameter values from JSON produced by
    /// [`state_json`](Self::state_json). Takes effect on the next block.
    pub fn load_state_json(&mut self, json: &str) -> Result<(), StateError> {
        ParamSnapshot::from_json(json)?.apply(&self.params);
        Ok(())
    }

    /// Clear all DSP state without touching parameters.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.envelope.reset();
        self.meters.reset();
    }

    /// Process one stereo block in place.
    ///
    /// Both slices must be the same length; extra samples in the longer
    /// slice are left untouched.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        let num_samples = left.len().min(right.len());
        if num_samples == 0 {
            return;
        }

        // New smoothing targets once per block
        for (i, smoother) in self.smoothers.iter_mut().enumerate() {
            smoother.set_target(self.params.get(ParamId::ALL[i]));
        }

        let mut wet_peak = 0.0f32;
        let mut sum_squares = 0.0f32;
        let mut block_peak = 0.0f32;

        for i in 0..num_samples {
            for smoother in &mut self.smoothers {
                smoother.advance();
            }
            let p = self.sample_params();

            let dry_l = left[i];
            let dry_r = right[i];

            // Sidechain detector runs on the dry input
            let env = self.envelope.process(mono_sum(dry_l, dry_r));

            self.left.apply_params(&p, self.routing);
            self.right.apply_params(&p, self.routing);

            let mut wet_l = self.left.process_wet(dry_l, &p, self.routing);
            let mut wet_r = self.right.process_wet(dry_r, &p, self.routing);

            let duck_gain = self.duck_gain(&p, env);
            wet_l *= duck_gain;
            wet_r *= duck_gain;

            let out_l = wet_dry_mix(dry_l, wet_l, p.mix);
            let out_r = wet_dry_mix(dry_r, wet_r, p.mix);
            left[i] = out_l;
            right[i] = out_r;

            wet_peak = wet_peak.max(wet_l.abs()).max(wet_r.abs());
            let out_mono = (out_l + out_r) * 0.5;
            sum_squares += out_mono * out_mono;
            block_peak = block_peak.max(out_mono.abs());
        }

        let rms = (sum_squares / num_samples as f32).sqrt();
        self.meters.publish(wet_peak, rms, block_peak);
    }

    fn duck_gain(&self, p: &SampleParams, env: f32) -> f32 {
        match self.routing {
            RoutingMode::Simple => 1.0,
            RoutingMode::PrePost => {
                if p.duck > ROUTE_EPSILON {
                    (1.0 - p.duck * env).max(0.0)
                } else {
                    1.0
                }
            }
            RoutingMode::DriveBurn => {
                if p.duck > ROUTE_EPSILON {
                    let hot_env = (env * 5.0).min(1.0);
                    (1.0 - p.duck * hot_env).max(0.0)
                } else {
                    1.0
                }
            }
        }
    }

    fn sample_params(&self) -> SampleParams {
        let get = |id: ParamId| self.smoothers[id as usize].get();
        SampleParams {
            decay: get(ParamId::Decay),
            shimmer: get(ParamId::Shimmer),
            size: get(ParamId::Size),
            degrade: get(ParamId::Degrade),
            fold: get(ParamId::Fold),
            dirt: get(ParamId::Dirt),
            drive: get(ParamId::Drive),
            burn: get(ParamId::Burn),
            duck: get(ParamId::Duck),
            mix: get(ParamId::Mix),
            pre: get(ParamId::Pre),
        }
    }
}
