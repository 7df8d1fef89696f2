//! Easing curves for camera transitions.
//!
//! Each curve maps normalized time `t ∈ [0, 1]` to progress in `[0, 1]`
//! with fixed endpoints; inputs outside the range are clamped.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Constant speed.
    Linear,
    /// Hermite smoothstep: slow start and slow end.
    SmoothStep,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic Bézier-style curve with configurable inner control values.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First inner control value.
        c1: f32,
        /// Second inner control value.
        c2: f32,
    },
}

impl EasingFunction {
    /// Ease-out curve used for camera flights.
    pub const DEFAULT: EasingFunction =
        EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 };

    /// Progress at normalized time `t`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            EasingFunction::Linear => t,
            EasingFunction::SmoothStep => t * t * (3.0 - 2.0 * t),
            EasingFunction::QuadraticOut => {
                let rest = 1.0 - t;
                1.0 - rest * rest
            }
            EasingFunction::CubicHermite { c1, c2 } => {
                let rest = 1.0 - t;
                c1 * 3.0 * t * rest * rest + c2 * 3.0 * rest * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::SmoothStep,
            EasingFunction::QuadraticOut,
            EasingFunction::DEFAULT,
        ] {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing:?}");
            assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        let easing = EasingFunction::SmoothStep;
        assert_eq!(easing.evaluate(-2.0), 0.0);
        assert_eq!(easing.evaluate(3.0), 1.0);
    }

    #[test]
    fn smoothstep_is_symmetric() {
        let easing = EasingFunction::SmoothStep;
        assert_eq!(easing.evaluate(0.5), 0.5);
        let a = easing.evaluate(0.2);
        let b = easing.evaluate(0.8);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn default_eases_out() {
        assert!(EasingFunction::default().evaluate(0.25) > 0.25);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
    }
}
