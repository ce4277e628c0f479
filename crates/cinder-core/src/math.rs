//! Math utilities shared by the effect stages.
//!
//! Allocation-free, `no_std`-friendly helpers. The two clippers here have
//! distinct jobs:
//!
//! | Function | Character | Used by |
//! |----------|-----------|---------|
//! | [`soft_limit`] | Transparent below threshold, tanh above | FDN feedback loop |
//! | [`cubic_clip`] | Gentle cubic curve across the whole range | Wavefolder output |

use libm::{expf, logf, tanhf};

/// Convert decibels to linear gain (0 dB → 1.0, -6 dB → ~0.5).
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels. Inputs <= 0 are floored at -200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Hyperbolic tangent used for drive/saturation stages.
///
/// Output is bounded in (-1, 1) by construction.
#[inline]
pub fn fast_tanh(x: f32) -> f32 {
    tanhf(x)
}

/// Soft limiter that is exactly linear below `threshold`.
///
/// Above the threshold the excess is squashed through `tanh`, approaching
/// ±1.0 asymptotically:
///
/// ```text
/// |x| <  t  ->  x
/// |x| >= t  ->  sign(x) * (t + (1 - t) * tanh(2 * (|x| - t)))
/// ```
///
/// This is one of the two independent safety layers in the reverb feedback
/// loop (the other is the feedback gain clamp): below threshold the network
/// stays perfectly linear, above it runaway energy is absorbed smoothly.
#[inline]
pub fn soft_limit(x: f32, threshold: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude < threshold {
        return x;
    }
    let excess = magnitude - threshold;
    let limited = threshold + (1.0 - threshold) * tanhf(excess * 2.0);
    if x > 0.0 { limited } else { -limited }
}

/// Cubic soft clipper.
///
/// `x - x^3/3` inside [-1, 1]; outside, a saturating curve that tends to ±1.
/// The two pieces do not meet exactly at |x| = 1 (2/3 inside, 1/2 outside);
/// the folder keeps its drive inside the cubic region for normal levels, so
/// the step only shows up under extreme overdrive.
#[inline]
pub fn cubic_clip(x: f32) -> f32 {
    if x > 1.0 {
        1.0 - 1.0 / (x * x + 1.0)
    } else if x < -1.0 {
        -1.0 + 1.0 / (x * x + 1.0)
    } else {
        x - (x * x * x) / 3.0
    }
}

/// Linear interpolation between `a` (t=0) and `b` (t=1).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Crossfade between dry and wet signals: `dry + (wet - dry) * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Sum stereo to mono as the average of rectified channels.
///
/// This is the sidechain detector input: `(|L| + |R|) / 2`.
#[inline]
pub fn mono_sum(left: f32, right: f32) -> f32 {
    (left.abs() + right.abs()) * 0.5
}

/// Flush subnormal floats to zero.
///
/// Subnormals (~1e-38 and below) cause severe CPU slowdowns on common
/// hardware. Feedback paths with long decay tails spend a long time near
/// zero, so every persistent filter state in the network runs through this.
/// The 1e-20 guard leaves margin before the true subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_linear_roundtrip() {
        let original = 0.5;
        let back = db_to_linear(linear_to_db(original));
        assert!((original - back).abs() < 1e-5);
    }

    #[test]
    fn db_known_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
    }

    #[test]
    fn soft_limit_linear_below_threshold() {
        for &x in &[0.0, 0.3, -0.5, 0.79, -0.79] {
            assert_eq!(soft_limit(x, 0.8), x, "below threshold must be identity");
        }
    }

    #[test]
    fn soft_limit_bounded_above_threshold() {
        for &x in &[0.9, 2.0, 10.0, 1000.0] {
            let y = soft_limit(x, 0.8);
            assert!(y >= 0.8 && y < 1.0, "limit({x}) = {y} out of (0.8, 1.0)");
            let yn = soft_limit(-x, 0.8);
            assert!((-yn - y).abs() < 1e-6, "limiter must be odd-symmetric");
        }
    }

    #[test]
    fn soft_limit_continuous_at_threshold() {
        let below = soft_limit(0.8 - 1e-4, 0.8);
        let above = soft_limit(0.8 + 1e-4, 0.8);
        assert!((above - below).abs() < 1e-3);
    }

    #[test]
    fn cubic_clip_inside_range() {
        assert_eq!(cubic_clip(0.0), 0.0);
        let y = cubic_clip(0.5);
        assert!((y - (0.5 - 0.125 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn cubic_clip_piecewise_values_at_boundary() {
        // The curve steps from 2/3 to ~1/2 across |x| = 1
        assert!((cubic_clip(1.0) - 2.0 / 3.0).abs() < 1e-6);
        assert!((cubic_clip(1.001) - 0.5).abs() < 0.01);
    }

    #[test]
    fn cubic_clip_saturates_outside() {
        assert!(cubic_clip(10.0) < 1.0);
        assert!(cubic_clip(10.0) > 0.9);
        assert!(cubic_clip(-10.0) > -1.0);
        assert!(cubic_clip(-10.0) < -0.9);
    }

    #[test]
    fn wet_dry_mix_endpoints() {
        assert_eq!(wet_dry_mix(1.0, 0.5, 0.0), 1.0);
        assert_eq!(wet_dry_mix(1.0, 0.5, 1.0), 0.5);
        assert!((wet_dry_mix(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mono_sum_rectifies() {
        assert_eq!(mono_sum(1.0, -1.0), 1.0);
        assert_eq!(mono_sum(-0.5, -0.5), 0.5);
    }

    #[test]
    fn flush_denormal_guards() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-38), 0.0);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    proptest::proptest! {
        #[test]
        fn soft_limit_never_exceeds_unity(x in -1e6f32..1e6, t in 0.1f32..0.99) {
            let y = soft_limit(x, t);
            proptest::prop_assert!(y.abs() < 1.0 + 1e-6);
            // sign is preserved
            proptest::prop_assert!(x == 0.0 || (y >= 0.0) == (x >= 0.0));
        }

        #[test]
        fn cubic_clip_bounded(x in -1e6f32..1e6) {
            let y = cubic_clip(x);
            proptest::prop_assert!(y.abs() <= 1.0);
        }
    }
}
