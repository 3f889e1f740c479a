use crate::GalleryConfig;
use crate::animation::Animatable;
use crate::geometry::{Vector2, clamp_translate, focal_zoom_translate, is_within_bounds, pan_bounds};
use crate::resolver::content_size_at;
use crate::viewport::{ViewportState, ViewportStore};

use super::ZOOM_EPSILON;

/// Scale and translation of the active item, animated as one value.
#[derive(Clone, Copy, Debug, PartialEq, Animatable)]
pub struct ZoomPose {
    pub scale: f32,
    pub translate: Vector2,
}

impl ZoomPose {
    pub const REST: Self = Self {
        scale: 1.0,
        translate: Vector2::ZERO,
    };

    pub fn new(scale: f32, translate: Vector2) -> Self {
        Self { scale, translate }
    }

    pub fn of(state: &ViewportState) -> Self {
        Self::new(state.scale, state.translate)
    }

    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }

    pub fn is_zoomed(&self) -> bool {
        (self.scale - 1.0).abs() > ZOOM_EPSILON
    }

    /// Write this pose into `state`, keeping the zoom flags in step.
    pub(crate) fn apply(&self, state: &mut ViewportState) {
        if self.is_rest() {
            state.reset_zoom();
        } else {
            state.set_pose(self.scale, self.translate);
            state.set_zoomed(self.is_zoomed());
        }
    }
}

/// Where a zoomed item must come to rest, or `None` if it already has.
///
/// Below the rest window the item returns to scale 1; otherwise only a
/// translation past the item edges is pulled back.
pub(crate) fn settle_target(state: &ViewportState, config: &GalleryConfig) -> Option<ZoomPose> {
    let current = ZoomPose::of(state);
    let rest_threshold = config.min_scale.max(1.0) + config.rest_snap_epsilon;

    let target = if state.scale < rest_threshold {
        ZoomPose::REST
    } else {
        let content = content_size_at(state, &config.resolve_params(), state.scale);
        let bounds = pan_bounds(content, state.root_size, 0.0);
        if is_within_bounds(state.translate, bounds) {
            return None;
        }
        ZoomPose::new(state.scale, clamp_translate(state.translate, bounds))
    };

    (target != current).then_some(target)
}

/// Settle target once a gesture lets go of the item. A pose already at
/// rest has its flags cleared right away.
pub(crate) fn release_pose(store: &ViewportStore, config: &GalleryConfig) -> Option<ZoomPose> {
    let state = store.read(ViewportState::clone);
    let target = settle_target(&state, config);
    if target.is_none() && ZoomPose::of(&state).is_rest() {
        store.update(ViewportState::reset_zoom);
    }
    target
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum PinchState {
    #[default]
    Idle,
    Active {
        origin_focal: Vector2,
        origin_scale: f32,
        origin_translate: Vector2,
    },
}

/// Two-finger zoom about the focal point.
#[derive(Debug, Default)]
pub struct PinchInterpreter {
    state: PinchState,
}

impl PinchInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PinchState::Active { .. })
    }

    pub fn begin(&mut self, store: &ViewportStore, focal: Vector2) {
        let (origin_scale, origin_translate) = store.read(|s| (s.scale, s.translate));
        self.state = PinchState::Active {
            origin_focal: focal,
            origin_scale,
            origin_translate,
        };
    }

    /// `scale` is cumulative since `begin`.
    pub fn update(
        &mut self,
        store: &ViewportStore,
        config: &GalleryConfig,
        scale: f32,
        focal: Vector2,
    ) -> bool {
        let PinchState::Active {
            origin_focal,
            origin_scale,
            origin_translate,
        } = self.state
        else {
            return false;
        };
        if !scale.is_finite() || !focal.is_finite() {
            return false;
        }

        let new_scale = (origin_scale * scale).clamp(config.min_scale, config.max_scale);
        store.update(|s| {
            let translate = focal_zoom_translate(
                origin_translate,
                origin_scale,
                new_scale,
                origin_focal,
                focal,
                s.root_size.center(),
            );
            s.set_pose(new_scale, translate);
            s.set_zoomed((new_scale - 1.0).abs() > ZOOM_EPSILON);
        })
    }

    /// Finish the pinch. Returns the pose to animate to, if any; a pose
    /// already at rest has its flags cleared right away.
    pub fn end(&mut self, store: &ViewportStore, config: &GalleryConfig) -> Option<ZoomPose> {
        if !self.is_active() {
            return None;
        }
        self.state = PinchState::Idle;
        release_pose(store, config)
    }

    pub fn cancel(&mut self, store: &ViewportStore, config: &GalleryConfig) -> Option<ZoomPose> {
        self.end(store, config)
    }
}
