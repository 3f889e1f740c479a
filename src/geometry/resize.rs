//! Aspect-ratio driven resizing of the active item.
//!
//! An item starts out displayed in a box of `ResizeConfig::size`. As the zoom
//! scale travels from `1.0` to `ResizeConfig::scale`, the box morphs toward
//! the item's natural aspect ratio: wide items grow horizontally while their
//! height stays fixed, tall items grow vertically while their width stays
//! fixed. Everything here runs once per frame, so it stays allocation-free.

use super::vector::SizeVector;

/// Target dimensions an item resizes toward while being zoomed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeConfig {
    /// Size of the item's box before any zoom.
    pub size: SizeVector,
    /// Natural width / height of the item. `> 1` means wide.
    pub aspect_ratio: f32,
    /// Scale at which the box reaches the natural aspect ratio.
    pub scale: f32,
}

impl ResizeConfig {
    pub fn new(size: SizeVector, aspect_ratio: f32, scale: f32) -> Self {
        Self {
            size,
            aspect_ratio,
            scale,
        }
    }

    /// Wide items stretch their width, everything else (square included)
    /// stretches its height.
    pub fn is_wide(&self) -> bool {
        self.aspect_ratio > 1.0
    }

    /// A config that cannot describe a stretch direction.
    pub fn is_degenerate(&self) -> bool {
        !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0)
            || !self.size.is_measured()
            || !(self.scale.is_finite() && self.scale > 1.0)
    }
}

/// Output of [`resize_to_aspect_ratio`].
///
/// `delta_x`/`delta_y` are half the size change, so callers can shift the
/// item back by them and keep it growing from its center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AspectRatioSize {
    pub width: f32,
    pub height: f32,
    pub delta_x: f32,
    pub delta_y: f32,
}

/// Linear interpolation of `value` from `input` into `output`, clamped at
/// both ends of the input range.
pub fn interpolate_clamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let (in_start, in_end) = input;
    let (out_start, out_end) = output;

    let span = in_end - in_start;
    if span.abs() <= f32::EPSILON || !value.is_finite() {
        return out_start;
    }

    let t = ((value - in_start) / span).clamp(0.0, 1.0);
    out_start + (out_end - out_start) * t
}

/// Resize an item of `width` x `height` for the current zoom `scale`.
///
/// Without a config (or with a degenerate one) the input size is returned
/// unchanged with zero deltas.
pub fn resize_to_aspect_ratio(
    resize_config: Option<&ResizeConfig>,
    width: f32,
    height: f32,
    scale: f32,
) -> AspectRatioSize {
    let mut final_width = width;
    let mut final_height = height;

    if let Some(config) = resize_config.filter(|config| !config.is_degenerate()) {
        let ResizeConfig {
            size,
            aspect_ratio,
            scale: resize_scale,
        } = *config;
        let range = (1.0, resize_scale);

        if config.is_wide() {
            final_width =
                interpolate_clamped(scale, range, (size.width, size.height * aspect_ratio));
            final_height = size.height;
        } else {
            final_width = size.width;
            final_height =
                interpolate_clamped(scale, range, (size.height, size.width / aspect_ratio));
        }
    }

    AspectRatioSize {
        width: final_width,
        height: final_height,
        delta_x: (final_width - width) / 2.0,
        delta_y: (final_height - height) / 2.0,
    }
}
