//! Easing curves for keyboard transitions.
//!
//! Every curve is a cubic Bézier with control points inside the unit square,
//! so outputs stay within `[0, 1]` and never overshoot the target.

use serde::{Deserialize, Serialize};

/// Newton iterations before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;

/// Bisection iterations (enough for f32 precision).
const BISECTION_ITERATIONS: usize = 32;

/// Solver tolerance on the x axis.
const EPSILON: f32 = 1e-6;

/// Transition curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end. Fallback for unrecognized platform curves.
    #[default]
    EaseInOut,
    /// The platform's native keyboard curve.
    Keyboard,
}

impl Easing {
    /// The Bézier control points for this curve.
    #[must_use]
    pub const fn curve(self) -> CubicBezier {
        match self {
            Self::Linear => CubicBezier::new(0.0, 0.0, 1.0, 1.0),
            Self::EaseIn => CubicBezier::new(0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => CubicBezier::new(0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => CubicBezier::new(0.42, 0.0, 0.58, 1.0),
            Self::Keyboard => CubicBezier::new(0.17, 0.59, 0.4, 0.77),
        }
    }

    /// Map linear progress `t` to eased progress. `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t.clamp(0.0, 1.0),
            _ => self.curve().apply(t),
        }
    }
}

/// A CSS-style cubic Bézier timing function anchored at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// Create a curve from its two inner control points.
    #[must_use]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluate the curve at progress `t`.
    #[must_use]
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_parameter(t);
        bernstein(self.y1, self.y2, s).clamp(0.0, 1.0)
    }

    /// Find the curve parameter whose x coordinate is `x`.
    fn solve_parameter(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = bernstein(self.x1, self.x2, s) - x;
            if error.abs() < EPSILON {
                return s;
            }
            let slope = bernstein_derivative(self.x1, self.x2, s);
            if slope.abs() < EPSILON {
                break;
            }
            s -= error / slope;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = bernstein(self.x1, self.x2, s);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }
}

/// One coordinate of a cubic Bézier with end points 0 and 1.
fn bernstein(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bernstein_derivative(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Keyboard,
    ];

    #[test]
    fn test_end_points() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_out_of_range_input_clamped() {
        for easing in ALL {
            assert!(easing.apply(-0.5).abs() < f32::EPSILON);
            assert!((easing.apply(1.5) - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_monotonic_without_overshoot() {
        for easing in ALL {
            let mut previous = 0.0;
            for step in 0..=100 {
                #[allow(clippy::cast_precision_loss)]
                let t = step as f32 / 100.0;
                let value = easing.apply(t);
                assert!((0.0..=1.0).contains(&value), "{easing:?} overshoots at {t}");
                assert!(value + 1e-4 >= previous, "{easing:?} goes backwards at {t}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_curve_shapes() {
        // Ease-out is ahead of linear early on, ease-in is behind.
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        // Ease-in-out is symmetric around the midpoint.
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-3);
        // The keyboard curve front-loads its motion.
        assert!(Easing::Keyboard.apply(0.2) > 0.2);
    }

    #[test]
    fn test_default_is_ease_in_out() {
        assert_eq!(Easing::default(), Easing::EaseInOut);
    }
}
