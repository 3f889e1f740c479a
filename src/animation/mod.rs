//! Frame-stepped animations.
//!
//! Nothing here reads a clock: the host advances animations with the frame
//! delta it measured, which keeps every animation deterministic and lets an
//! interrupted animation hand its current value to whoever takes over.

mod animatable;
mod animated;
mod spring;
mod timing;

pub use animatable::Animatable;
pub use animated::{AdvanceResult, AnimationState};
pub use spring::{SpringConfig, SpringState};
pub use timing::Easing;
pub use zoom_gallery_macros::Animatable;

use std::time::Duration;

/// A fixed-duration transition along an easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), Easing::EaseOut)
    }
}

/// How an [`AnimationState`] travels from its start to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    Timed(Transition),
    Spring(SpringConfig),
}

impl From<Transition> for Curve {
    fn from(transition: Transition) -> Self {
        Curve::Timed(transition)
    }
}

impl From<SpringConfig> for Curve {
    fn from(config: SpringConfig) -> Self {
        Curve::Spring(config)
    }
}
