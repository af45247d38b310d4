/// CSS `cubic-bezier(x1, y1, x2, y2)` timing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f64 = 1e-6;
const SOLVE_EPSILON: f64 = 1e-7;
const BISECTION_ITERATIONS: usize = 40;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = self.solve_x(t);
        bezier_axis(s, self.y1, self.y2)
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_x(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = bezier_axis(s, self.x1, self.x2) - x;
            if err.abs() < SOLVE_EPSILON {
                return s;
            }
            let slope = bezier_slope(s, self.x1, self.x2);
            if slope.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            s -= err / slope;
            if !(0.0..=1.0).contains(&s) {
                break;
            }
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = bezier_axis(s, self.x1, self.x2);
            if (value - x).abs() < SOLVE_EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

fn bezier_axis(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// CSS `ease-in-out`: slow start, slow end, symmetric.
pub const ZOOM_OUT_CURVE: CubicBezier = CubicBezier::new(0.42, 0.0, 0.58, 1.0);
/// Fast start with a long decelerating tail.
pub const ZOOM_IN_CURVE: CubicBezier = CubicBezier::new(0.16, 1.0, 0.3, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseInOutCubic,
    EaseInOutQuart,
    CubicOut,
    Bezier(CubicBezier),
}

impl Easing {
    /// Map linear progress `t` (clamped to 0..=1) onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Self::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Self::Bezier(curve) => curve.apply(t),
        }
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// A single scalar animated over wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(0.0),
            easing,
        }
    }

    /// Linear progress in 0..=1.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now_ms: f64) -> f64 {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.to;
        }
        lerp(self.from, self.to, self.easing.apply(p))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
