//! Scalar interpolation helpers shared by the gradient, harmony and scale code.

use serde::{Deserialize, Serialize};

use crate::convert::normalize_hue;

/// Remapping applied to an interpolation parameter in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Curve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Curve {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t,
            Curve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Curve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Which way around the color wheel a hue interpolation travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HuePath {
    #[default]
    Shorter,
    Longer,
}

/// `t²(3 − 2t)`, flat at both ends.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate between two hues along the requested arc. Result is in [0, 360).
pub fn lerp_hue(from: f64, to: f64, t: f64, path: HuePath) -> f64 {
    let diff = to - from;
    let short = diff.abs() <= 180.0;
    let delta = match (path, short) {
        (HuePath::Shorter, true) | (HuePath::Longer, false) => diff,
        _ if diff > 0.0 => diff - 360.0,
        _ => diff + 360.0,
    };
    normalize_hue(from + delta * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
        assert!(smoothstep(0.25) < 0.25);
    }

    #[test]
    fn curves_fix_endpoints() {
        for curve in [Curve::Linear, Curve::EaseIn, Curve::EaseOut, Curve::EaseInOut] {
            assert!(curve.apply(0.0).abs() < 1e-12, "{:?}", curve);
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-12, "{:?}", curve);
        }
        assert!((Curve::EaseIn.apply(0.5) - 0.25).abs() < 1e-12);
        assert!((Curve::EaseOut.apply(0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn hue_takes_shorter_arc_across_zero() {
        assert!((lerp_hue(350.0, 10.0, 0.5, HuePath::Shorter) - 0.0).abs() < 1e-9);
        assert!((lerp_hue(350.0, 10.0, 0.5, HuePath::Longer) - 180.0).abs() < 1e-9);
        assert!((lerp_hue(10.0, 50.0, 0.5, HuePath::Shorter) - 30.0).abs() < 1e-9);
        assert!((lerp_hue(10.0, 50.0, 0.5, HuePath::Longer) - 210.0).abs() < 1e-9);
    }
}
