//! Pure geometry used by the gesture interpreters and the transform resolver.
//!
//! Nothing in this module touches shared state; every function can be called
//! from whichever thread or callback drives per-frame evaluation.

mod resize;
mod vector;
mod zoom;

pub use resize::{AspectRatioSize, ResizeConfig, interpolate_clamped, resize_to_aspect_ratio};
pub use vector::{SizeVector, Vector2};
pub use zoom::{clamp_translate, focal_zoom_translate, is_within_bounds, pan_bounds};
