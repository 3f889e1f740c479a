//! Easing curves for fixed-duration transitions.

/// Maps normalized time in `[0, 1]` to animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    /// CSS-style cubic bezier (x1, y1, x2, y2), x values in [0, 1]
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

fn cubic_bezier(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Newton-Raphson for the curve parameter whose x matches
    let mut t = x;
    for _ in 0..8 {
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= (bezier_axis(t, x1, x2) - x) / slope;
    }
    bezier_axis(t.clamp(0.0, 1.0), y1, y2)
}

fn bezier_axis(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
        ] {
            assert!(easing.evaluate(0.0).abs() < 1e-4, "{:?}", easing);
            assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-4, "{:?}", easing);
        }
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Easing::EaseOut.evaluate(0.5) > 0.5);
        assert!(Easing::EaseIn.evaluate(0.5) < 0.5);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Linear.evaluate(2.0), 1.0);
        assert_eq!(Easing::Linear.evaluate(-1.0), 0.0);
    }
}
