//! Parameter state serialization.
//!
//! Only parameter values are persisted, never DSP internals: reverb tails
//! are expected to reset on reload. Unknown keys in stored state are
//! ignored and missing keys fall back to defaults, so presets survive
//! parameter additions across versions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::{ParamId, ParamStore};

/// State (de)serialization failure.
#[derive(Debug, Error)]
pub enum StateError {
    /// The state blob was not valid JSON or had wrong value types.
    #[error("malformed state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A complete snapshot of the parameter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamSnapshot {
    /// Reverb decay in seconds.
    pub decay: f32,
    /// Shimmer amount.
    pub shimmer: f32,
    /// Room size.
    pub size: f32,
    /// Degrade amount.
    pub degrade: f32,
    /// Fold amount.
    pub fold: f32,
    /// Degrade/fold blend.
    pub dirt: f32,
    /// Input drive.
    pub drive: f32,
    /// Feedback burn.
    pub burn: f32,
    /// Sidechain duck depth.
    pub duck: f32,
    /// Dry/wet mix.
    pub mix: f32,
    /// Pre/post routing blend.
    pub pre: f32,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        let default = |id: ParamId| id.descriptor().default;
        Self {
            decay: default(ParamId::Decay),
            shimmer: default(ParamId::Shimmer),
            size: default(ParamId::Size),
            degrade: default(ParamId::Degrade),
            fold: default(ParamId::Fold),
            dirt: default(ParamId::Dirt),
            drive: default(ParamId::Drive),
            burn: default(ParamId::Burn),
            duck: default(ParamId::Duck),
            mix: default(ParamId::Mix),
            pre: default(ParamId::Pre),
        }
    }
}

impl ParamSnapshot {
    /// Capture the current values from a store.
    #[must_use]
    pub fn capture(store: &ParamStore) -> Self {
        Self {
            decay: store.get(ParamId::Decay),
            shimmer: store.get(ParamId::Shimmer),
            size: store.get(ParamId::Size),
            degrade: store.get(ParamId::Degrade),
            fold: store.get(ParamId::Fold),
            dirt: store.get(ParamId::Dirt),
            drive: store.get(ParamId::Drive),
            burn: store.get(ParamId::Burn),
            duck: store.get(ParamId::Duck),
            mix: store.get(ParamId::Mix),
            pre: store.get(ParamId::Pre),
        }
    }

    /// Write this snapshot into a store. Values are clamped by the store.
    pub fn apply(&self, store: &ParamStore) {
        store.set(ParamId::Decay, self.decay);
        store.set(ParamId::Shimmer, self.shimmer);
        store.set(ParamId::Size, self.size);
        store.set(ParamId::Degrade, self.degrade);
        store.set(ParamId::Fold, self.fold);
        store.set(ParamId::Dirt, self.dirt);
        store.set(ParamId::Drive, self.drive);
        store.set(ParamId::Burn, self.burn);
        store.set(ParamId::Duck, self.duck);
        store.set(ParamId::Mix, self.mix);
        store.set(ParamId::Pre, self.pre);
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }
}
