//! Gesture interpreters.
//!
//! Each gesture class is a small state machine that turns recognizer events
//! into writes on the [`ViewportStore`](crate::viewport::ViewportStore). The
//! [`GestureArbiter`] decides which of them may start, based on what is
//! already in flight and whether the gallery is zoomed or scrolling.

mod double_tap;
mod pan;
mod pinch;
mod swipe;

pub use double_tap::double_tap_target;
pub use pan::{PanInterpreter, PanRelease};
pub use pinch::{PinchInterpreter, ZoomPose};
pub use swipe::{SwipeInterpreter, SwipeRelease};

pub(crate) use pan::{Glide, strict_bounds};
pub(crate) use swipe::{SNAP_ARRIVED, land};

use bitflags::bitflags;

use crate::geometry::Vector2;
use crate::viewport::ViewportState;

/// Scale further than this from 1.0 counts as zoomed
pub const ZOOM_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Pinch,
    Pan,
    Swipe,
    DoubleTap,
}

bitflags! {
    /// Set of gestures allowed to begin
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GestureMask: u8 {
        const PINCH      = 0b0001;
        const PAN        = 0b0010;
        const SWIPE      = 0b0100;
        const DOUBLE_TAP = 0b1000;
    }
}

impl From<GestureKind> for GestureMask {
    fn from(kind: GestureKind) -> Self {
        match kind {
            GestureKind::Pinch => GestureMask::PINCH,
            GestureKind::Pan => GestureMask::PAN,
            GestureKind::Swipe => GestureMask::SWIPE,
            GestureKind::DoubleTap => GestureMask::DOUBLE_TAP,
        }
    }
}

impl GestureMask {
    /// The exclusion table.
    pub fn permitted(in_flight: Option<GestureKind>, has_zoomed: bool, is_scrolling: bool) -> Self {
        if in_flight.is_some() {
            GestureMask::empty()
        } else if has_zoomed {
            GestureMask::PINCH | GestureMask::PAN | GestureMask::DOUBLE_TAP
        } else if is_scrolling {
            GestureMask::SWIPE
        } else {
            GestureMask::PINCH | GestureMask::SWIPE | GestureMask::DOUBLE_TAP
        }
    }
}

/// Why a gesture was not allowed to begin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Another gesture owns the viewport until it ends
    InFlight(GestureKind),
    /// Swiping between items is disabled while zoomed
    Zoomed,
    /// Zooming is disabled while the items are scrolling
    Scrolling,
    /// Panning needs a zoomed item
    NotZoomed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureResponse {
    Accepted,
    /// Event for a gesture that is not in flight
    Ignored,
    Rejected(Rejection),
}

impl GestureResponse {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GestureResponse::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, GestureResponse::Rejected(_))
    }
}

/// Pinch recognizer output. `scale` is cumulative since `Began`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinchEvent {
    Began { focal: Vector2 },
    Changed { scale: f32, focal: Vector2 },
    Ended,
    Cancelled,
}

/// Single-pointer drag recognizer output. `translation` is cumulative since
/// `Began`; velocities are in pixels per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanEvent {
    Began { position: Vector2 },
    Changed { translation: Vector2, velocity: Vector2 },
    Ended { velocity: Vector2 },
    Cancelled,
}

/// Tracks the gesture currently owning the viewport.
#[derive(Debug, Default)]
pub struct GestureArbiter {
    in_flight: Option<GestureKind>,
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> Option<GestureKind> {
        self.in_flight
    }

    /// Check `kind` against the table without claiming anything.
    pub fn check(&self, kind: GestureKind, state: &ViewportState) -> Result<(), Rejection> {
        let permitted = GestureMask::permitted(self.in_flight, state.has_zoomed, state.is_scrolling);
        if permitted.contains(kind.into()) {
            return Ok(());
        }
        Err(match self.in_flight {
            Some(other) => Rejection::InFlight(other),
            None => match kind {
                GestureKind::Swipe => Rejection::Zoomed,
                GestureKind::Pan => Rejection::NotZoomed,
                GestureKind::Pinch | GestureKind::DoubleTap => Rejection::Scrolling,
            },
        })
    }

    /// Claim the viewport for a continuous gesture.
    pub fn try_begin(&mut self, kind: GestureKind, state: &ViewportState) -> GestureResponse {
        match self.check(kind, state) {
            Ok(()) => {
                log::debug!("{:?} gesture accepted", kind);
                if kind != GestureKind::DoubleTap {
                    self.in_flight = Some(kind);
                }
                GestureResponse::Accepted
            }
            Err(rejection) => {
                log::debug!("{:?} gesture rejected: {:?}", kind, rejection);
                GestureResponse::Rejected(rejection)
            }
        }
    }

    pub fn is_active(&self, kind: GestureKind) -> bool {
        self.in_flight == Some(kind)
    }

    pub fn release(&mut self, kind: GestureKind) {
        if self.in_flight == Some(kind) {
            self.in_flight = None;
        }
    }
}
