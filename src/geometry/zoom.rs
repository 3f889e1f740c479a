//! Focal-point zoom and pan-bound math.
//!
//! Translations are measured from the viewport center: a translate of zero
//! keeps the item's center on the viewport's center.

use super::vector::{SizeVector, Vector2};

/// Translation that keeps the content point which sat under `origin_focal`
/// (at `origin_scale`/`origin_translate`) under `focal` at `new_scale`.
///
/// A moving focal point therefore also pans the item, the same way a
/// two-finger pinch drags the content along with the fingers.
pub fn focal_zoom_translate(
    origin_translate: Vector2,
    origin_scale: f32,
    new_scale: f32,
    origin_focal: Vector2,
    focal: Vector2,
    center: Vector2,
) -> Vector2 {
    if origin_scale <= 0.0 || !origin_scale.is_finite() || !new_scale.is_finite() {
        return origin_translate;
    }

    // Content-space point under the starting focal point
    let anchor = (origin_focal - center - origin_translate) * (1.0 / origin_scale);

    (focal - center) - anchor * new_scale
}

/// Maximum absolute translation on each axis for content of `content_size`
/// shown inside `root_size`, plus `overscroll` on both axes.
pub fn pan_bounds(content_size: SizeVector, root_size: SizeVector, overscroll: f32) -> Vector2 {
    let overscroll = overscroll.max(0.0);
    Vector2::new(
        ((content_size.width - root_size.width) / 2.0).max(0.0) + overscroll,
        ((content_size.height - root_size.height) / 2.0).max(0.0) + overscroll,
    )
}

pub fn clamp_translate(translate: Vector2, bounds: Vector2) -> Vector2 {
    Vector2::new(
        translate.x.clamp(-bounds.x, bounds.x),
        translate.y.clamp(-bounds.y, bounds.y),
    )
}

pub fn is_within_bounds(translate: Vector2, bounds: Vector2) -> bool {
    translate.x.abs() <= bounds.x + f32::EPSILON && translate.y.abs() <= bounds.y + f32::EPSILON
}
