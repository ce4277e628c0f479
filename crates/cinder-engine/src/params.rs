//! Parameter identifiers and the lock-free parameter store.
//!
//! A control thread writes plain f32 values into the [`ParamStore`]; the
//! audio thread reads them at block boundaries as smoothing targets. Values
//! travel as `f32` bit patterns in `AtomicU32` with relaxed ordering: each
//! parameter is an independent scalar, so no cross-parameter ordering is
//! needed and no value can tear.

use std::sync::atomic::{AtomicU32, Ordering};

use cinder_core::ParamDescriptor;

/// Identifies one of the engine's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ParamId {
    /// Reverb decay time in seconds.
    Decay,
    /// Octave-up feedback injection amount.
    Shimmer,
    /// Room size (scales delay taps and damping).
    Size,
    /// Lo-fi degrader amount.
    Degrade,
    /// Wavefolder amount.
    Fold,
    /// Blend between degraded (0) and folded (1) destruction.
    Dirt,
    /// Input drive into the tanh saturator.
    Drive,
    /// In-feedback saturation amount.
    Burn,
    /// Sidechain ducking depth.
    Duck,
    /// Dry/wet mix.
    Mix,
    /// Pre/post destruction routing blend.
    Pre,
}

impl ParamId {
    /// Number of parameters.
    pub const COUNT: usize = 11;

    /// All parameters in storage order.
    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::Decay,
        ParamId::Shimmer,
        ParamId::Size,
        ParamId::Degrade,
        ParamId::Fold,
        ParamId::Dirt,
        ParamId::Drive,
        ParamId::Burn,
        ParamId::Duck,
        ParamId::Mix,
        ParamId::Pre,
    ];

    /// Range, default, and display metadata for this parameter.
    #[must_use]
    pub const fn descriptor(self) -> ParamDescriptor {
        match self {
            ParamId::Decay => ParamDescriptor::new("Decay", "decay", 0.1, 30.0, 2.0),
            ParamId::Shimmer => ParamDescriptor::unit("Shimmer", "shimmer", 0.0),
            ParamId::Size => ParamDescriptor::unit("Size", "size", 0.5),
            ParamId::Degrade => ParamDescriptor::unit("Degrade", "degrade", 0.0),
            ParamId::Fold => ParamDescriptor::unit("Fold", "fold", 0.0),
            ParamId::Dirt => ParamDescriptor::unit("Dirt", "dirt", 0.5),
            ParamId::Drive => ParamDescriptor::unit("Drive", "drive", 0.0),
            ParamId::Burn => ParamDescriptor::unit("Burn", "burn", 0.0),
            ParamId::Duck => ParamDescriptor::unit("Duck", "duck", 0.0),
            ParamId::Mix => ParamDescriptor::unit("Mix", "mix", 0.3),
            ParamId::Pre => ParamDescriptor::unit("Pre", "pre", 0.0),
        }
    }

    /// Stable identifier used in presets and state files.
    #[must_use]
    pub const fn string_id(self) -> &'static str {
        self.descriptor().string_id
    }

    /// Look a parameter up by its string identifier.
    #[must_use]
    pub fn from_string_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.string_id() == id)
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Lock-free parameter store shared between the control and audio threads.
///
/// # Example
///
/// ```rust
/// use cinder_engine::{ParamId, ParamStore};
///
/// let store = ParamStore::new();
/// store.set(ParamId::Mix, 0.8);
/// assert_eq!(store.get(ParamId::Mix), 0.8);
/// // Out-of-range values are clamped, never rejected
/// store.set(ParamId::Decay, 500.0);
/// assert_eq!(store.get(ParamId::Decay), 30.0);
/// ```
#[derive(Debug)]
pub struct ParamStore {
    values: [AtomicU32; ParamId::COUNT],
}

impl ParamStore {
    /// Create a store with every parameter at its default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|i| {
                AtomicU32::new(ParamId::ALL[i].descriptor().default.to_bits())
            }),
        }
    }

    /// Write a parameter value, clamped to its valid range.
    pub fn set(&self, id: ParamId, value: f32) {
        let clamped = id.descriptor().clamp(value);
        self.values[id.index()].store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Read a parameter value.
    #[must_use]
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Relaxed))
    }

}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let store = ParamStore::new();
        for id in ParamId::ALL {
            assert_eq!(store.get(id), id.descriptor().default, "{id:?}");
        }
    }

    #[test]
    fn set_clamps_to_range() {
        let store = ParamStore::new();
        store.set(ParamId::Decay, -5.0);
        assert_eq!(store.get(ParamId::Decay), 0.1);
        store.set(ParamId::Shimmer, 2.0);
        assert_eq!(store.get(ParamId::Shimmer), 1.0);
    }

    #[test]
    fn string_id_roundtrip() {
        for id in ParamId::ALL {
            assert_eq!(ParamId::from_string_id(id.string_id()), Some(id));
        }
        assert_eq!(ParamId::from_string_id("nope"), None);
    }

    #[test]
    fn store_is_shareable_across_threads() {
        use std::sync::Arc;

        let store = Arc::new(ParamStore::new());
        let writer = Arc::clone(&store);
        let handle = std::thread::spawn(move || {
            for i in 0..1000 {
                writer.set(ParamId::Mix, i as f32 / 1000.0);
            }
        });
        for _ in 0..1000 {
            let v = store.get(ParamId::Mix);
            assert!((0.0..=1.0).contains(&v));
        }
        handle.join().unwrap();
    }
}
