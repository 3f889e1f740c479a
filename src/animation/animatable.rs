/// Types whose values can be blended for animation.
///
/// Derive it for structs whose fields are all `Animatable`:
///
/// ```ignore
/// #[derive(Clone, PartialEq, Animatable)]
/// struct Pose {
///     scale: f32,
///     translate: Vector2,
/// }
/// ```
pub trait Animatable: Clone + PartialEq + Send + Sync + 'static {
    /// `t = 0.0` gives `from`, `t = 1.0` gives `to`. Values outside `[0, 1]`
    /// extrapolate, which springs use for overshoot.
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(f32::lerp(&0.0, &10.0, 0.0), 0.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 1.0), 10.0);
        assert_eq!(f32::lerp(&2.0, &4.0, 1.5), 5.0);
    }
}
