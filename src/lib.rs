extern crate self as zoom_gallery;

pub mod animation;
pub mod geometry;
pub mod gesture;
pub mod reactive;
pub mod resolver;
pub mod viewport;

mod gallery;

use std::time::Duration;

use animation::{Easing, SpringConfig, Transition};

pub use gallery::{Gallery, GalleryControl};

pub mod prelude {
    pub use crate::animation::{Animatable, Easing, SpringConfig, Transition};
    pub use crate::geometry::{SizeVector, Vector2};
    pub use crate::gesture::{GestureKind, GestureResponse, PanEvent, PinchEvent, Rejection};
    pub use crate::reactive::{batch, take_frame_request, Subscription};
    pub use crate::resolver::{ItemTransform, ResolvedFrame, TransformInstance};
    pub use crate::viewport::{Overflow, ViewportReader, ViewportState};
    pub use crate::{ConfigError, Gallery, GalleryConfig, GalleryControl, Orientation};
}

/// Axis along which items are laid out and swiped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Component of `v` along this axis.
    pub fn along(&self, v: geometry::Vector2) -> f32 {
        match self {
            Orientation::Horizontal => v.x,
            Orientation::Vertical => v.y,
        }
    }

    /// Length of `size` along this axis.
    pub fn extent(&self, size: geometry::SizeVector) -> f32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("min_scale must be in (0, 1], got {0}")]
    MinScale(f32),
    #[error("max_scale must be at least 1, got {0}")]
    MaxScale(f32),
    #[error("double_tap_scale must be in [1, {max}], got {value}")]
    DoubleTapScale { value: f32, max: f32 },
    #[error("aspect_fit_scale must be at least 1, got {0}")]
    AspectFitScale(f32),
    #[error("{field} must be a finite, non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be in [0, {max}), got {value}")]
    Epsilon {
        field: &'static str,
        value: f32,
        max: f32,
    },
    #[error("snap spring needs positive mass and stiffness and non-negative damping")]
    Spring(SpringConfig),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryConfig {
    pub initial_index: usize,
    pub min_scale: f32,
    pub max_scale: f32,
    pub double_tap_scale: f32,
    /// Scale at which the active item has grown to its natural aspect ratio
    pub aspect_fit_scale: f32,
    /// Extra pan, in pixels, allowed past the item edges while dragging
    pub overscroll_limit: f32,
    /// A pinch ending within this of rest returns to rest
    pub rest_snap_epsilon: f32,
    /// Half-way window in which the release velocity breaks the snap tie
    pub snap_tie_epsilon: f32,
    /// Release speed in px/s that promotes a swipe or starts a pan glide
    pub fling_velocity: f32,
    pub item_spacing: f32,
    pub orientation: Orientation,
    pub snap_spring: SpringConfig,
    pub zoom_transition: Transition,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            initial_index: 0,
            min_scale: 1.0,
            max_scale: 6.0,
            double_tap_scale: 3.0,
            aspect_fit_scale: 2.0,
            overscroll_limit: 48.0,
            rest_snap_epsilon: 0.05,
            snap_tie_epsilon: 0.05,
            fling_velocity: 600.0,
            item_spacing: 0.0,
            orientation: Orientation::Horizontal,
            snap_spring: SpringConfig::CRITICAL,
            zoom_transition: Transition::new(Duration::from_millis(250), Easing::EaseOut),
        }
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn epsilon(field: &'static str, value: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Epsilon { field, value, max })
    }
}

fn or_default(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

impl GalleryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(ConfigError::MinScale(self.min_scale));
        }
        if !(self.max_scale.is_finite() && self.max_scale >= 1.0) {
            return Err(ConfigError::MaxScale(self.max_scale));
        }
        if !(self.double_tap_scale >= 1.0 && self.double_tap_scale <= self.max_scale) {
            return Err(ConfigError::DoubleTapScale {
                value: self.double_tap_scale,
                max: self.max_scale,
            });
        }
        if !(self.aspect_fit_scale.is_finite() && self.aspect_fit_scale >= 1.0) {
            return Err(ConfigError::AspectFitScale(self.aspect_fit_scale));
        }
        non_negative("overscroll_limit", self.overscroll_limit)?;
        non_negative("fling_velocity", self.fling_velocity)?;
        non_negative("item_spacing", self.item_spacing)?;
        epsilon("rest_snap_epsilon", self.rest_snap_epsilon, 1.0)?;
        epsilon("snap_tie_epsilon", self.snap_tie_epsilon, 0.5)?;
        if !self.validate_spring() {
            return Err(ConfigError::Spring(self.snap_spring));
        }
        Ok(())
    }

    /// Clamp every field into its valid domain.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let min_scale = if self.min_scale > 0.0 && self.min_scale.is_finite() {
            self.min_scale.min(1.0)
        } else {
            defaults.min_scale
        };
        let max_scale = or_default(self.max_scale, defaults.max_scale).max(1.0);
        let double_tap_scale = {
            let value = or_default(self.double_tap_scale, defaults.double_tap_scale);
            if value > 1.0 { value.min(max_scale) } else { max_scale }
        };
        let spring = if self.validate_spring() {
            self.snap_spring
        } else {
            defaults.snap_spring
        };

        Self {
            initial_index: self.initial_index,
            min_scale,
            max_scale,
            double_tap_scale,
            aspect_fit_scale: or_default(self.aspect_fit_scale, defaults.aspect_fit_scale).max(1.0),
            overscroll_limit: or_default(self.overscroll_limit, defaults.overscroll_limit).max(0.0),
            rest_snap_epsilon: or_default(self.rest_snap_epsilon, defaults.rest_snap_epsilon)
                .clamp(0.0, 0.99),
            snap_tie_epsilon: or_default(self.snap_tie_epsilon, defaults.snap_tie_epsilon)
                .clamp(0.0, 0.49),
            fling_velocity: or_default(self.fling_velocity, defaults.fling_velocity).max(0.0),
            item_spacing: or_default(self.item_spacing, defaults.item_spacing).max(0.0),
            orientation: self.orientation,
            snap_spring: spring,
            zoom_transition: self.zoom_transition,
        }
    }

    fn validate_spring(&self) -> bool {
        let s = &self.snap_spring;
        s.mass.is_finite()
            && s.stiffness.is_finite()
            && s.damping.is_finite()
            && s.mass > 0.0
            && s.stiffness > 0.0
            && s.damping >= 0.0
    }

    pub fn initial_index(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }

    pub fn min_scale(mut self, scale: f32) -> Self {
        self.min_scale = scale;
        self
    }

    pub fn max_scale(mut self, scale: f32) -> Self {
        self.max_scale = scale;
        self
    }

    pub fn double_tap_scale(mut self, scale: f32) -> Self {
        self.double_tap_scale = scale;
        self
    }

    pub fn aspect_fit_scale(mut self, scale: f32) -> Self {
        self.aspect_fit_scale = scale;
        self
    }

    pub fn overscroll_limit(mut self, limit: f32) -> Self {
        self.overscroll_limit = limit;
        self
    }

    pub fn rest_snap_epsilon(mut self, epsilon: f32) -> Self {
        self.rest_snap_epsilon = epsilon;
        self
    }

    pub fn snap_tie_epsilon(mut self, epsilon: f32) -> Self {
        self.snap_tie_epsilon = epsilon;
        self
    }

    pub fn fling_velocity(mut self, velocity: f32) -> Self {
        self.fling_velocity = velocity;
        self
    }

    pub fn item_spacing(mut self, spacing: f32) -> Self {
        self.item_spacing = spacing;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn snap_spring(mut self, spring: SpringConfig) -> Self {
        self.snap_spring = spring;
        self
    }

    pub fn zoom_transition(mut self, transition: Transition) -> Self {
        self.zoom_transition = transition;
        self
    }

    /// The subset of the config the resolver needs.
    pub fn resolve_params(&self) -> resolver::ResolveParams {
        resolver::ResolveParams {
            orientation: self.orientation,
            item_spacing: self.item_spacing,
            aspect_fit_scale: self.aspect_fit_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GalleryConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_first_problem() {
        let config = GalleryConfig::new().min_scale(0.0);
        assert_eq!(config.validate(), Err(ConfigError::MinScale(0.0)));

        let config = GalleryConfig::new().max_scale(4.0).double_tap_scale(5.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DoubleTapScale {
                value: 5.0,
                max: 4.0
            })
        );

        let config = GalleryConfig::new().item_spacing(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "item_spacing",
                ..
            })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::Epsilon {
            field: "snap_tie_epsilon",
            value: 0.7,
            max: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "snap_tie_epsilon must be in [0, 0.5), got 0.7"
        );
    }

    #[test]
    fn test_sanitized_is_valid() {
        let config = GalleryConfig::new()
            .min_scale(f32::NAN)
            .max_scale(0.5)
            .double_tap_scale(8.0)
            .aspect_fit_scale(0.0)
            .overscroll_limit(-5.0)
            .snap_tie_epsilon(2.0)
            .snap_spring(SpringConfig {
                mass: 0.0,
                stiffness: 100.0,
                damping: 10.0,
            });
        assert!(config.validate().is_err());

        let sane = config.sanitized();
        assert_eq!(sane.validate(), Ok(()));
        assert_eq!(sane.min_scale, 1.0);
        assert_eq!(sane.max_scale, 1.0);
        assert_eq!(sane.aspect_fit_scale, 1.0);
        assert_eq!(sane.overscroll_limit, 0.0);
        assert_eq!(sane.snap_spring, SpringConfig::CRITICAL);
    }

    #[test]
    fn test_orientation_axis() {
        let v = geometry::Vector2::new(3.0, 4.0);
        assert_eq!(Orientation::Horizontal.along(v), 3.0);
        assert_eq!(Orientation::Vertical.along(v), 4.0);
    }
}
