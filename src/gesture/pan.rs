use crate::GalleryConfig;
use crate::geometry::{Vector2, clamp_translate, pan_bounds};
use crate::resolver::content_size;
use crate::viewport::{ViewportState, ViewportStore};

use super::ZoomPose;
use super::pinch::release_pose;

/// What the gallery should do after a pan is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanRelease {
    /// Nothing left to animate
    Rest,
    /// Pulled past the edges: animate back inside
    Settle(ZoomPose),
    /// Flung: keep gliding with this velocity (px/s)
    Glide(Vector2),
}

/// Strict pan bounds of the active item at its current scale.
pub(crate) fn strict_bounds(state: &ViewportState, config: &GalleryConfig) -> Vector2 {
    pan_bounds(content_size(state, &config.resolve_params()), state.root_size, 0.0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum PanState {
    #[default]
    Idle,
    Active { origin_translate: Vector2 },
}

/// One-finger drag of a zoomed item.
#[derive(Debug, Default)]
pub struct PanInterpreter {
    state: PanState,
}

impl PanInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PanState::Active { .. })
    }

    pub fn begin(&mut self, store: &ViewportStore) {
        self.state = PanState::Active {
            origin_translate: store.read(|s| s.translate),
        };
    }

    /// `translation` is cumulative since `begin`.
    pub fn update(&mut self, store: &ViewportStore, config: &GalleryConfig, translation: Vector2) -> bool {
        let PanState::Active { origin_translate } = self.state else {
            return false;
        };
        if !translation.is_finite() {
            return false;
        }

        let params = config.resolve_params();
        store.update(|s| {
            let bounds = pan_bounds(content_size(s, &params), s.root_size, config.overscroll_limit);
            s.translate = clamp_translate(origin_translate + translation, bounds);
        })
    }

    pub fn end(&mut self, store: &ViewportStore, config: &GalleryConfig, velocity: Vector2) -> PanRelease {
        if !self.is_active() {
            return PanRelease::Rest;
        }
        self.state = PanState::Idle;

        // Near rest or past the edges: animate into place
        if let Some(target) = release_pose(store, config) {
            return PanRelease::Settle(target);
        }
        let zoomed = store.read(|s| s.has_zoomed);
        if zoomed && velocity.is_finite() && velocity.length() > config.fling_velocity {
            PanRelease::Glide(velocity)
        } else {
            PanRelease::Rest
        }
    }

    pub fn cancel(&mut self, store: &ViewportStore, config: &GalleryConfig) -> PanRelease {
        self.end(store, config, Vector2::ZERO)
    }
}

/// Momentum after a pan fling, decaying until it stops or hits an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Glide {
    velocity: Vector2,
}

impl Glide {
    /// Velocity kept per 60 Hz frame
    const FRICTION: f32 = 0.92;
    /// Half a pixel per 60 Hz frame, in px/s
    const VELOCITY_THRESHOLD: f32 = 30.0;

    pub fn new(velocity: Vector2) -> Self {
        Self { velocity }
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Move `translate` by one step. Returns the new translation and
    /// whether the glide is still moving.
    pub fn advance(&mut self, translate: Vector2, bounds: Vector2, dt_secs: f32) -> (Vector2, bool) {
        let decay = Self::FRICTION.powf(dt_secs * 60.0);
        let (x, vx) = glide_axis(translate.x, self.velocity.x, bounds.x, dt_secs, decay);
        let (y, vy) = glide_axis(translate.y, self.velocity.y, bounds.y, dt_secs, decay);
        self.velocity = Vector2::new(vx, vy);
        (Vector2::new(x, y), vx != 0.0 || vy != 0.0)
    }
}

fn glide_axis(position: f32, velocity: f32, bound: f32, dt_secs: f32, decay: f32) -> (f32, f32) {
    if velocity.abs() <= Glide::VELOCITY_THRESHOLD {
        return (position, 0.0);
    }
    let moved = position + velocity * dt_secs;
    let clamped = moved.clamp(-bound, bound);
    if clamped != moved {
        // Hit the edge
        return (clamped, 0.0);
    }
    (moved, velocity * decay)
}
