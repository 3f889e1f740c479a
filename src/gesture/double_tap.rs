use crate::GalleryConfig;
use crate::geometry::{Vector2, clamp_translate, pan_bounds};
use crate::resolver::content_size_at;
use crate::viewport::ViewportState;

use super::ZoomPose;

/// Pose a double tap at `point` toggles to: back to rest when zoomed,
/// otherwise `double_tap_scale` with the tapped point held in place.
pub fn double_tap_target(state: &ViewportState, config: &GalleryConfig, point: Vector2) -> ZoomPose {
    if state.has_zoomed {
        return ZoomPose::REST;
    }

    let scale = config.double_tap_scale;
    let point = if point.is_finite() {
        point
    } else {
        state.root_size.center()
    };
    let translate = (point - state.root_size.center()) * (1.0 - scale);
    let content = content_size_at(state, &config.resolve_params(), scale);
    let bounds = pan_bounds(content, state.root_size, 0.0);

    ZoomPose::new(scale, clamp_translate(translate, bounds))
}
