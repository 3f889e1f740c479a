use crate::GalleryConfig;
use crate::geometry::Vector2;
use crate::resolver::{page_distance, resolve_snap_target};
use crate::viewport::{ViewportState, ViewportStore};

/// Closer than this (in items) to the target counts as arrived
pub(crate) const SNAP_ARRIVED: f32 = 1e-4;

/// A released swipe that still has to travel to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeRelease {
    pub from: f32,
    pub target: usize,
    /// Release velocity in items per second, positive toward higher indices
    pub velocity: f32,
}

/// Land on `target`: scroll exact, no pixel correction, not scrolling.
pub(crate) fn land(state: &mut ViewportState, target: usize) {
    state.active_index = target;
    state.scroll = target as f32;
    state.scroll_offset = 0.0;
    state.is_scrolling = false;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum SwipeState {
    #[default]
    Idle,
    Active { start_scroll: f32, start_index: usize },
}

/// Dragging between items while not zoomed.
#[derive(Debug, Default)]
pub struct SwipeInterpreter {
    state: SwipeState,
}

impl SwipeInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SwipeState::Active { .. })
    }

    /// Start from wherever the items are, including mid-snap.
    ///
    /// The item nearest to the current scroll becomes the active one, so a
    /// swipe taking over a long snap drags the items actually on screen.
    pub fn begin(&mut self, store: &ViewportStore, config: &GalleryConfig) {
        let params = config.resolve_params();
        let mut start = (0.0, 0);
        store.update(|s| {
            let page = page_distance(s, &params);
            if page > 0.0 {
                s.scroll -= s.scroll_offset / page;
            }
            s.scroll_offset = 0.0;
            s.is_scrolling = true;
            if s.scroll.is_finite() {
                s.active_index = s.scroll.round().max(0.0) as usize;
            }
            start = (s.scroll, s.active_index);
        });
        self.state = SwipeState::Active {
            start_scroll: start.0,
            start_index: start.1,
        };
    }

    /// `translation` is cumulative since `begin`; only the scroll axis counts.
    /// A single swipe moves at most one item either way.
    pub fn update(
        &mut self,
        store: &ViewportStore,
        config: &GalleryConfig,
        item_count: usize,
        translation: Vector2,
    ) -> bool {
        let SwipeState::Active {
            start_scroll,
            start_index,
        } = self.state
        else {
            return false;
        };
        let params = config.resolve_params();
        let along = config.orientation.along(translation);
        if !along.is_finite() || item_count == 0 {
            return false;
        }

        let last = (item_count - 1) as f32;
        let anchor = (start_index as f32).min(last);
        let low = (anchor - 1.0).max(0.0);
        let high = (anchor + 1.0).min(last);
        store.update(|s| {
            let page = page_distance(s, &params);
            if page > 0.0 {
                s.scroll = (start_scroll - along / page).clamp(low, high);
            }
        })
    }

    /// Release with `velocity` in px/s. Returns the remaining travel, or
    /// `None` if the items already sit on the target.
    pub fn end(
        &mut self,
        store: &ViewportStore,
        config: &GalleryConfig,
        item_count: usize,
        velocity: Vector2,
    ) -> Option<SwipeRelease> {
        self.release(store, config, item_count, velocity, true)
    }

    /// Abandon the swipe and snap to the nearest item.
    pub fn cancel(
        &mut self,
        store: &ViewportStore,
        config: &GalleryConfig,
        item_count: usize,
    ) -> Option<SwipeRelease> {
        self.release(store, config, item_count, Vector2::ZERO, false)
    }

    fn release(
        &mut self,
        store: &ViewportStore,
        config: &GalleryConfig,
        item_count: usize,
        velocity: Vector2,
        allow_fling: bool,
    ) -> Option<SwipeRelease> {
        let SwipeState::Active { start_index, .. } = self.state else {
            return None;
        };
        self.state = SwipeState::Idle;

        let params = config.resolve_params();
        let (scroll, page) = store.read(|s| (s.scroll, page_distance(s, &params)));
        let speed_px = config.orientation.along(velocity);
        let speed_px = if speed_px.is_finite() { speed_px } else { 0.0 };
        // Dragging toward negative coordinates reveals higher indices
        let velocity = if page > 0.0 { -speed_px / page } else { 0.0 };

        let mut target = resolve_snap_target(scroll, velocity, item_count, config.snap_tie_epsilon);
        if allow_fling
            && target == start_index
            && speed_px.abs() > config.fling_velocity
            && velocity != 0.0
            && item_count > 0
        {
            target = if velocity > 0.0 {
                (start_index + 1).min(item_count - 1)
            } else {
                start_index.saturating_sub(1)
            };
        }
        log::debug!(
            "swipe released at {:.3} ({:.2} items/s), snapping to {}",
            scroll,
            velocity,
            target
        );

        let arrived = (scroll - target as f32).abs() < SNAP_ARRIVED || item_count == 0;
        store.update(|s| {
            if arrived {
                land(s, target);
            } else {
                s.active_index = target;
            }
        });

        (!arrived).then_some(SwipeRelease {
            from: scroll,
            target,
            velocity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SizeVector;

    fn store(count: usize) -> ViewportStore {
        let store = ViewportStore::new(0, count);
        store.update(|s| {
            s.root_size = SizeVector::new(400.0, 800.0);
            s.root_child_size = SizeVector::new(400.0, 800.0);
        });
        store
    }

    #[test]
    fn test_drag_moves_scroll() {
        let store = store(3);
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        assert!(store.is_scrolling());
        swipe.update(&store, &config, 3, Vector2::new(-100.0, 40.0));
        assert_eq!(store.scroll(), 0.25);
    }

    #[test]
    fn test_scroll_is_clamped_to_items() {
        let store = store(3);
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        swipe.update(&store, &config, 3, Vector2::new(300.0, 0.0));
        assert_eq!(store.scroll(), 0.0);
    }

    #[test]
    fn test_drag_moves_at_most_one_item() {
        let store = store(4);
        store.update(|s| {
            s.scroll = 1.0;
            s.active_index = 1;
        });
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        swipe.update(&store, &config, 4, Vector2::new(-720.0, 0.0));
        assert_eq!(store.scroll(), 2.0);
        swipe.update(&store, &config, 4, Vector2::new(4000.0, 0.0));
        assert_eq!(store.scroll(), 0.0);
    }

    #[test]
    fn test_begin_mid_snap_takes_item_on_screen() {
        let store = store(6);
        // Snapping from 0 toward 5, caught at 1.4
        store.update(|s| {
            s.scroll = 1.4;
            s.active_index = 5;
            s.is_scrolling = true;
        });
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        assert_eq!(store.active_index(), 1);
        assert_eq!(store.scroll(), 1.4);
        swipe.update(&store, &config, 6, Vector2::new(-2000.0, 0.0));
        assert_eq!(store.scroll(), 2.0);
    }

    #[test]
    fn test_release_past_half_advances() {
        let store = store(3);
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        swipe.update(&store, &config, 3, Vector2::new(-360.0, 0.0));
        let release = swipe
            .end(&store, &config, 3, Vector2::new(-200.0, 0.0))
            .unwrap();
        assert_eq!(release.target, 1);
        assert!((release.from - 0.9).abs() < 1e-5);
        assert!(release.velocity > 0.0);
        assert_eq!(store.active_index(), 1);
        assert!(store.is_scrolling());
    }

    #[test]
    fn test_short_slow_drag_returns() {
        let store = store(3);
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        swipe.update(&store, &config, 3, Vector2::new(-80.0, 0.0));
        let release = swipe.end(&store, &config, 3, Vector2::new(-50.0, 0.0)).unwrap();
        assert_eq!(release.target, 0);
    }

    #[test]
    fn test_fling_promotes_short_drag() {
        let store = store(3);
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        swipe.update(&store, &config, 3, Vector2::new(-80.0, 0.0));
        let release = swipe
            .end(&store, &config, 3, Vector2::new(-1500.0, 0.0))
            .unwrap();
        assert_eq!(release.target, 1);
    }

    #[test]
    fn test_fling_does_not_leave_range() {
        let store = store(2);
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        swipe.update(&store, &config, 2, Vector2::new(40.0, 0.0));
        let release = swipe.end(&store, &config, 2, Vector2::new(2000.0, 0.0));
        // Already at 0: nothing to travel
        assert_eq!(release, None);
        assert!(!store.is_scrolling());
        assert_eq!(store.active_index(), 0);
    }

    #[test]
    fn test_cancel_ignores_velocity() {
        let store = store(3);
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        swipe.update(&store, &config, 3, Vector2::new(-120.0, 0.0));
        let release = swipe.cancel(&store, &config, 3).unwrap();
        assert_eq!(release.target, 0);
        assert_eq!(release.velocity, 0.0);
    }

    #[test]
    fn test_begin_folds_scroll_offset() {
        let store = store(3);
        store.update(|s| {
            s.scroll = 1.0;
            s.scroll_offset = -100.0;
        });
        let config = GalleryConfig::default();
        let mut swipe = SwipeInterpreter::new();
        swipe.begin(&store, &config);
        assert_eq!(store.scroll(), 1.25);
        assert_eq!(store.scroll_offset(), 0.0);
    }
}
