//! Easing curves used by entity transitions, button animations and camera follow.

use crate::constants::SMOOTH_EASE_BEZIER;

/// CSS-style cubic bezier with fixed endpoints (0,0) and (1,1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    fn component(t: f32, p1: f32, p2: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    #[inline]
    fn component_slope(t: f32, p1: f32, p2: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Solve for the curve parameter whose x equals `x`.
    fn solve_t(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..8 {
            let err = Self::component(t, self.x1, self.x2) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let slope = Self::component_slope(t, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }
        // Newton stalled on a flat section; fall back to bisection
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let cx = Self::component(t, self.x1, self.x2);
            if (cx - x).abs() < 1e-6 {
                break;
            }
            if cx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }

    pub fn apply(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        Self::component(t, self.y1, self.y2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out, the usual default for short property tweens.
    Power1Out,
    Bezier(CubicBezier),
}

impl Ease {
    /// The showcase's signature curve: cubic-bezier(0.33, 0, 0, 1).
    pub const fn smooth() -> Self {
        let [x1, y1, x2, y2] = SMOOTH_EASE_BEZIER;
        Ease::Bezier(CubicBezier::new(x1, y1, x2, y2))
    }

    /// Map normalized progress in [0, 1] to eased progress.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Bezier(b) => b.apply(t),
        }
    }
}

impl Default for Ease {
    fn default() -> Self {
        Ease::smooth()
    }
}
