use std::time::Duration;

use crate::GalleryConfig;
use crate::animation::{AdvanceResult, AnimationState};
use crate::geometry::{SizeVector, Vector2};
use crate::gesture::{
    GestureArbiter, GestureKind, GestureResponse, PanEvent, PanInterpreter, PanRelease, PinchEvent,
    PinchInterpreter, SwipeInterpreter, SwipeRelease, ZoomPose, double_tap_target,
};
use crate::gesture::{Glide, land, strict_bounds};
use crate::reactive::{Derived, SharedValue, Subscription, batch, create_derived, subscribe};
use crate::resolver::{ItemTransform, ResolvedFrame, page_distance, resolve};
use crate::viewport::{ViewportReader, ViewportState, ViewportStore, clamp_index};

/// Largest normalized launch velocity handed to the snap spring
const MAX_SNAP_VELOCITY: f32 = 12.0;

/// Imperative control over a gallery, for hosts that drive it from outside
/// the gesture stream (buttons, keyboard, thumbnails).
pub trait GalleryControl {
    /// Animate to `index`, clamped into range. Any zoom is dropped first.
    fn scroll_to_index(&mut self, index: usize);
    /// Abandon gestures and animations, return to rest on the active item.
    fn reset(&mut self);
    fn active_index(&self) -> usize;
}

/// Animation the gallery is running between gestures.
enum Motion {
    /// Swipe snapping `scroll` onto an index
    Snap {
        target: usize,
        animation: AnimationState<f32>,
    },
    /// Double-tap toggle or settle after a pinch or pan
    Zoom(AnimationState<ZoomPose>),
    /// Pan momentum after a fling
    Glide(Glide),
}

/// A swipeable, zoomable sequence of items.
///
/// Feed recognizer events to [`handle_pinch`](Self::handle_pinch),
/// [`handle_pan`](Self::handle_pan) and
/// [`handle_double_tap`](Self::handle_double_tap), call [`tick`](Self::tick)
/// once per frame, and draw with [`render`](Self::render) or a
/// [`subscribe`](Self::subscribe) callback.
pub struct Gallery<T> {
    items: Vec<T>,
    config: GalleryConfig,
    store: ViewportStore,
    item_count: SharedValue<usize>,
    frame: Derived<ResolvedFrame>,
    active_index: Derived<usize>,
    arbiter: GestureArbiter,
    pinch: PinchInterpreter,
    pan: PanInterpreter,
    swipe: SwipeInterpreter,
    motion: Option<Motion>,
}

impl<T> Gallery<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::with_config(items, GalleryConfig::default())
    }

    /// An invalid config is clamped into range with a warning.
    pub fn with_config(items: Vec<T>, config: GalleryConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("Invalid gallery config ({}), clamping into range", err);
                config.sanitized()
            }
        };

        let store = ViewportStore::new(config.initial_index, items.len());
        let item_count = SharedValue::new(items.len());
        let params = config.resolve_params();

        let frame = {
            let store = store.clone();
            let item_count = item_count.clone();
            create_derived(move || resolve(&store.snapshot(), item_count.get(), &params))
        };
        let active_index = {
            let store = store.clone();
            create_derived(move || store.active_index())
        };

        Self {
            items,
            config,
            store,
            item_count,
            frame,
            active_index,
            arbiter: GestureArbiter::new(),
            pinch: PinchInterpreter::new(),
            pan: PanInterpreter::new(),
            swipe: SwipeInterpreter::new(),
            motion: None,
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Replace the items. The active index is clamped into the new range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        let count = self.items.len();
        batch(|| {
            let active = self.store.read(|s| s.active_index);
            if count > 0 && active >= count {
                log::warn!("active index {} gone after item update, clamping", active);
                self.motion = None;
                self.store.update(|s| land(s, clamp_index(active, count)));
            } else if count == 0 {
                self.motion = None;
                self.store.update(|s| land(s, 0));
            }
            self.item_count.set(count);
        });
    }

    pub fn viewport(&self) -> &ViewportStore {
        &self.store
    }

    /// Read-only state handle for a render thread.
    pub fn reader(&self) -> ViewportReader {
        self.store.reader()
    }

    /// The resolved transforms for the current state.
    pub fn frame(&self) -> ResolvedFrame {
        self.frame.get()
    }

    /// Call `f` for every visible item, neighbours first, active last.
    pub fn render<R, F>(&self, mut f: F) -> Vec<R>
    where
        F: FnMut(&T, &ItemTransform) -> R,
    {
        self.frame.with(|frame| {
            frame
                .visible()
                .filter_map(|transform| {
                    self.items
                        .get(transform.index)
                        .map(|item| f(item, transform))
                })
                .collect()
        })
    }

    /// Run `f` now and after every change to the resolved frame.
    pub fn subscribe<F>(&self, mut f: F) -> Subscription
    where
        F: FnMut(&ResolvedFrame) + 'static,
    {
        let frame = self.frame.clone();
        subscribe(move || frame.with(|resolved| f(resolved)))
    }

    /// Call `f` with the new active index whenever it changes.
    pub fn on_index_change<F>(&self, mut f: F) -> Subscription
    where
        F: FnMut(usize) + 'static,
    {
        let active_index = self.active_index.clone();
        let mut initial = true;
        subscribe(move || {
            let index = active_index.get();
            if std::mem::take(&mut initial) {
                return;
            }
            f(index);
        })
    }

    /// Measured size of the viewport.
    ///
    /// A resize while the items are between slots keeps the active item's
    /// pixel position through `scroll_offset`.
    pub fn set_root_size(&mut self, size: SizeVector) {
        let params = self.config.resolve_params();
        batch(|| {
            self.store.update(|s| {
                let old_page = page_distance(s, &params);
                s.root_size = size;
                let new_page = page_distance(s, &params);
                if old_page > 0.0 {
                    let from_slot = s.active_index as f32 - s.scroll;
                    s.scroll_offset += from_slot * (old_page - new_page);
                }
            });
        });
    }

    /// Measured natural size of the active item.
    pub fn set_root_child_size(&mut self, size: SizeVector) {
        batch(|| {
            self.store.update(|s| s.root_child_size = size);
        });
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// Which gesture currently owns the viewport.
    pub fn gesture_in_flight(&self) -> Option<GestureKind> {
        self.arbiter.in_flight()
    }

    pub fn handle_pinch(&mut self, event: PinchEvent) -> GestureResponse {
        batch(|| self.pinch_event(event))
    }

    /// Single-pointer drags pan a zoomed item and swipe otherwise.
    pub fn handle_pan(&mut self, event: PanEvent) -> GestureResponse {
        batch(|| self.pan_event(event))
    }

    pub fn handle_double_tap(&mut self, point: Vector2) -> GestureResponse {
        batch(|| {
            let state = self.store.read(ViewportState::clone);
            let response = self.arbiter.try_begin(GestureKind::DoubleTap, &state);
            if response.is_accepted() {
                self.halt_motion();
                let target = double_tap_target(&state, &self.config, point);
                self.start_zoom(target);
            }
            response
        })
    }

    /// Advance the running animation by `dt`. Returns whether it is still
    /// running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        batch(|| self.advance_motion(dt));
        self.is_animating()
    }

    fn pinch_event(&mut self, event: PinchEvent) -> GestureResponse {
        match event {
            PinchEvent::Began { focal } => {
                let state = self.store.read(ViewportState::clone);
                let response = self.arbiter.try_begin(GestureKind::Pinch, &state);
                if response.is_accepted() {
                    self.halt_motion();
                    self.pinch.begin(&self.store, focal);
                }
                response
            }
            PinchEvent::Changed { scale, focal } => {
                if !self.arbiter.is_active(GestureKind::Pinch) {
                    return GestureResponse::Ignored;
                }
                self.pinch.update(&self.store, &self.config, scale, focal);
                GestureResponse::Accepted
            }
            PinchEvent::Ended | PinchEvent::Cancelled => {
                if !self.arbiter.is_active(GestureKind::Pinch) {
                    return GestureResponse::Ignored;
                }
                self.arbiter.release(GestureKind::Pinch);
                let target = if event == PinchEvent::Ended {
                    self.pinch.end(&self.store, &self.config)
                } else {
                    self.pinch.cancel(&self.store, &self.config)
                };
                if let Some(target) = target {
                    self.start_zoom(target);
                }
                GestureResponse::Accepted
            }
        }
    }

    fn pan_event(&mut self, event: PanEvent) -> GestureResponse {
        let count = self.items.len();
        match event {
            PanEvent::Began { .. } => {
                let state = self.store.read(ViewportState::clone);
                let kind = if state.has_zoomed {
                    GestureKind::Pan
                } else {
                    GestureKind::Swipe
                };
                let response = self.arbiter.try_begin(kind, &state);
                if response.is_accepted() {
                    self.halt_motion();
                    match kind {
                        GestureKind::Pan => self.pan.begin(&self.store),
                        _ => self.swipe.begin(&self.store, &self.config),
                    }
                }
                response
            }
            PanEvent::Changed { translation, .. } => match self.arbiter.in_flight() {
                Some(GestureKind::Pan) => {
                    self.pan.update(&self.store, &self.config, translation);
                    GestureResponse::Accepted
                }
                Some(GestureKind::Swipe) => {
                    self.swipe.update(&self.store, &self.config, count, translation);
                    GestureResponse::Accepted
                }
                _ => GestureResponse::Ignored,
            },
            PanEvent::Ended { .. } | PanEvent::Cancelled => {
                let velocity = match event {
                    PanEvent::Ended { velocity } => Some(velocity),
                    _ => None,
                };
                match self.arbiter.in_flight() {
                    Some(GestureKind::Pan) => {
                        self.arbiter.release(GestureKind::Pan);
                        let release = match velocity {
                            Some(velocity) => self.pan.end(&self.store, &self.config, velocity),
                            None => self.pan.cancel(&self.store, &self.config),
                        };
                        match release {
                            PanRelease::Rest => {}
                            PanRelease::Settle(target) => self.start_zoom(target),
                            PanRelease::Glide(velocity) => {
                                self.motion = Some(Motion::Glide(Glide::new(velocity)));
                            }
                        }
                        GestureResponse::Accepted
                    }
                    Some(GestureKind::Swipe) => {
                        self.arbiter.release(GestureKind::Swipe);
                        let release = match velocity {
                            Some(velocity) => self.swipe.end(&self.store, &self.config, count, velocity),
                            None => self.swipe.cancel(&self.store, &self.config, count),
                        };
                        if let Some(release) = release {
                            self.start_snap(release);
                        }
                        GestureResponse::Accepted
                    }
                    _ => GestureResponse::Ignored,
                }
            }
        }
    }

    /// Stop the running animation where it is. The state already holds the
    /// last value it wrote.
    fn halt_motion(&mut self) {
        if self.motion.take().is_some() {
            log::trace!("animation interrupted");
        }
    }

    fn start_zoom(&mut self, target: ZoomPose) {
        let from = self.store.read(ZoomPose::of);
        if from == target {
            self.store.update(|s| target.apply(s));
            return;
        }
        if target.is_zoomed() {
            self.store.update(|s| s.set_zoomed(true));
        }
        let mut animation = AnimationState::new(from, self.config.zoom_transition);
        animation.animate(from, target);
        self.motion = Some(Motion::Zoom(animation));
    }

    fn start_snap(&mut self, release: SwipeRelease) {
        let SwipeRelease {
            from,
            target,
            velocity,
        } = release;
        let distance = target as f32 - from;
        let launch = (velocity / distance).clamp(-MAX_SNAP_VELOCITY, MAX_SNAP_VELOCITY);

        let mut animation = AnimationState::new(from, self.config.snap_spring);
        animation.animate(from, target as f32);
        animation.set_velocity(if launch.is_finite() { launch } else { 0.0 });
        self.motion = Some(Motion::Snap { target, animation });
    }

    fn advance_motion(&mut self, dt: Duration) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        let last = self.items.len().saturating_sub(1) as f32;

        let finished = match motion {
            Motion::Snap { target, animation } => {
                let target = *target;
                match animation.advance(dt) {
                    AdvanceResult::NoChange => false,
                    AdvanceResult::Changed(scroll) => {
                        self.store.update(|s| s.scroll = scroll.clamp(0.0, last));
                        false
                    }
                    AdvanceResult::Finished(_) => {
                        self.store.update(|s| land(s, target));
                        log::trace!("snapped to index {}", target);
                        true
                    }
                }
            }
            Motion::Zoom(animation) => match animation.advance(dt) {
                AdvanceResult::NoChange => false,
                AdvanceResult::Changed(pose) => {
                    self.store.update(|s| s.set_pose(pose.scale, pose.translate));
                    false
                }
                AdvanceResult::Finished(pose) => {
                    self.store.update(|s| pose.apply(s));
                    log::trace!("zoom settled at {:.3}", pose.scale);
                    true
                }
            },
            Motion::Glide(glide) => {
                let config = &self.config;
                let mut moving = false;
                self.store.update(|s| {
                    let bounds = strict_bounds(s, config);
                    let (translate, still_moving) =
                        glide.advance(s.translate, bounds, dt.as_secs_f32());
                    s.translate = translate;
                    moving = still_moving;
                });
                if !moving {
                    log::trace!("glide stopped");
                }
                !moving
            }
        };

        if finished {
            self.motion = None;
        }
    }
}

impl<T> GalleryControl for Gallery<T> {
    fn scroll_to_index(&mut self, index: usize) {
        if let Some(kind) = self.arbiter.in_flight() {
            log::debug!("scroll_to_index({}) ignored during {:?}", index, kind);
            return;
        }
        let count = self.items.len();
        if count > 0 && index >= count {
            log::warn!("scroll_to_index({}) out of range for {} items, clamping", index, count);
        }
        let target = clamp_index(index, count);
        let params = self.config.resolve_params();

        batch(|| {
            self.halt_motion();
            let mut from = 0.0;
            self.store.update(|s| {
                s.reset_zoom();
                let page = page_distance(s, &params);
                if page > 0.0 {
                    s.scroll -= s.scroll_offset / page;
                }
                s.scroll_offset = 0.0;
                s.active_index = target;
                s.is_scrolling = true;
                from = s.scroll;
            });

            if (from - target as f32).abs() < crate::gesture::SNAP_ARRIVED {
                self.store.update(|s| land(s, target));
            } else {
                self.start_snap(SwipeRelease {
                    from,
                    target,
                    velocity: 0.0,
                });
            }
        });
    }

    fn reset(&mut self) {
        self.arbiter = GestureArbiter::new();
        self.pinch = PinchInterpreter::new();
        self.pan = PanInterpreter::new();
        self.swipe = SwipeInterpreter::new();
        self.motion = None;
        batch(|| {
            self.store.update(|s| {
                let index = s.active_index;
                s.reset_zoom();
                land(s, index);
            });
        });
    }

    fn active_index(&self) -> usize {
        self.store.active_index()
    }
}
