//! Parameter metadata for display, validation, and persistence.
//!
//! The engine exposes a fixed set of parameters; each one is described by a
//! [`ParamDescriptor`] so front-ends (CLI, preset files, meters) can list
//! ranges and defaults without hard-coding them.

/// Describes a single parameter: name, range, and default.
///
/// # Example
///
/// ```rust
/// use cinder_core::ParamDescriptor;
///
/// let decay = ParamDescriptor::new("Decay", "decay", 0.1, 30.0, 2.0);
/// assert_eq!(decay.clamp(100.0), 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name (e.g. "Decay", "Shimmer").
    pub name: &'static str,
    /// Stable lowercase identifier used in presets and state files.
    pub string_id: &'static str,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Default value at construction/reset.
    pub default: f32,
}

impl ParamDescriptor {
    /// Construct a descriptor.
    pub const fn new(
        name: &'static str,
        string_id: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            string_id,
            min,
            max,
            default,
        }
    }

    /// Unit-range descriptor (0.0 to 1.0), the common case here.
    pub const fn unit(name: &'static str, string_id: &'static str, default: f32) -> Self {
        Self::new(name, string_id, 0.0, 1.0, default)
    }

    /// Clamp a value into this parameter's valid range.
    ///
    /// Out-of-range inputs are silently clamped, never rejected: the audio
    /// thread must not branch into error paths.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        let desc = ParamDescriptor::new("Decay", "decay", 0.1, 30.0, 2.0);
        assert_eq!(desc.clamp(0.0), 0.1);
        assert_eq!(desc.clamp(50.0), 30.0);
        assert_eq!(desc.clamp(5.0), 5.0);
    }

    #[test]
    fn unit_descriptor() {
        let desc = ParamDescriptor::unit("Mix", "mix", 0.3);
        assert_eq!(desc.min, 0.0);
        assert_eq!(desc.max, 1.0);
        assert_eq!(desc.default, 0.3);
    }

}
