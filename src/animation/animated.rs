use std::time::Duration;

use super::{Animatable, Curve, SpringState};

/// Spring is done when within this distance of the target (normalized)...
const SETTLE_POSITION: f32 = 1e-3;
/// ...and moving slower than this (normalized units per second)
const SETTLE_VELOCITY: f32 = 1e-2;

/// Result of advancing an animation, indicating whether the value changed
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult<T> {
    /// Value did not change (animation not running or same value)
    NoChange,
    /// Value changed and the animation keeps running
    Changed(T),
    /// Value reached the target on this step; the animation is over
    Finished(T),
}

/// A value animating between two endpoints, stepped by the caller.
pub struct AnimationState<T: Animatable> {
    current: T,
    target: T,
    start: T,
    curve: Curve,
    elapsed: Duration,
    spring: Option<SpringState>,
    running: bool,
}

impl<T: Animatable> AnimationState<T> {
    /// A settled animation resting at `value`.
    pub fn new(value: T, curve: impl Into<Curve>) -> Self {
        Self {
            current: value.clone(),
            target: value.clone(),
            start: value,
            curve: curve.into(),
            elapsed: Duration::ZERO,
            spring: None,
            running: false,
        }
    }

    /// Restart from `from` toward `to`.
    pub fn animate(&mut self, from: T, to: T) {
        self.start = from.clone();
        self.current = from;
        self.target = to;
        self.elapsed = Duration::ZERO;
        self.spring = match self.curve {
            Curve::Spring(_) => Some(SpringState::new()),
            Curve::Timed(_) => None,
        };
        self.running = self.start != self.target;
    }

    /// Seed the spring with a normalized initial velocity (fraction of the
    /// start-to-target distance per second). Ignored by timed curves.
    pub fn set_velocity(&mut self, velocity: f32) {
        if let Some(spring) = self.spring.as_mut() {
            *spring = SpringState::with_velocity(velocity);
        }
    }

    pub fn advance(&mut self, dt: Duration) -> AdvanceResult<T> {
        if !self.running {
            return AdvanceResult::NoChange;
        }
        self.elapsed += dt;

        let (t, done) = match (&self.curve, self.spring.as_mut()) {
            (Curve::Spring(config), Some(spring)) => {
                let position = spring.step(dt.as_secs_f32(), config);
                (position, spring.is_settled(SETTLE_POSITION, SETTLE_VELOCITY))
            }
            (Curve::Timed(transition), _) => {
                let total = transition.duration.as_secs_f32();
                let linear = if total <= 0.0 {
                    1.0
                } else {
                    (self.elapsed.as_secs_f32() / total).min(1.0)
                };
                (transition.easing.evaluate(linear), linear >= 1.0)
            }
            (Curve::Spring(_), None) => (1.0, true),
        };

        if done {
            self.finish();
            return AdvanceResult::Finished(self.current.clone());
        }

        let value = T::lerp(&self.start, &self.target, t);
        if value == self.current {
            return AdvanceResult::NoChange;
        }
        self.current = value.clone();
        AdvanceResult::Changed(value)
    }

    /// Jump to the target and stop.
    pub fn finish(&mut self) {
        self.current = self.target.clone();
        self.start = self.target.clone();
        self.running = false;
        self.spring = None;
    }

    pub fn is_animating(&self) -> bool {
        self.running
    }

    pub fn current(&self) -> &T {
        &self.current
    }
}
