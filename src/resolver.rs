//! Per-frame transforms for the active item and its neighbours.
//!
//! Everything here is a pure function of a [`ViewportState`] snapshot, so it
//! can run on any thread holding a [`ViewportReader`](crate::viewport::ViewportReader).

use crate::Orientation;
use crate::geometry::{ResizeConfig, SizeVector, resize_to_aspect_ratio};
use crate::viewport::{Overflow, ViewportState};

/// The part of the gallery config that shapes the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolveParams {
    pub orientation: Orientation,
    pub item_spacing: f32,
    pub aspect_fit_scale: f32,
}

impl Default for ResolveParams {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            item_spacing: 0.0,
            aspect_fit_scale: 2.0,
        }
    }
}

/// Where and how big one item is drawn, in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemTransform {
    pub index: usize,
    /// Rendered width, after scale
    pub width: f32,
    /// Rendered height, after scale
    pub height: f32,
    /// Left edge
    pub offset_x: f32,
    /// Top edge
    pub offset_y: f32,
    pub scale: f32,
    /// Content outside the box must be clipped
    pub clip: bool,
}

impl ItemTransform {
    /// The whole viewport, unscaled.
    pub fn identity(index: usize, root_size: SizeVector) -> Self {
        Self {
            index,
            width: root_size.width,
            height: root_size.height,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            clip: true,
        }
    }

    pub fn instance(&self) -> TransformInstance {
        TransformInstance {
            rect: [self.offset_x, self.offset_y, self.width, self.height],
            scale: self.scale,
            clip: self.clip as u32,
            index: self.index as u32,
            _pad: 0,
        }
    }
}

/// GPU-ready copy of an [`ItemTransform`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformInstance {
    /// [x, y, width, height] in logical pixels
    pub rect: [f32; 4],
    pub scale: f32,
    /// 1 when the item is clipped to its box
    pub clip: u32,
    pub index: u32,
    /// Padding for 16-byte alignment
    pub _pad: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedFrame {
    pub active: Option<ItemTransform>,
    pub previous: Option<ItemTransform>,
    pub next: Option<ItemTransform>,
    /// Items under the viewport while it travels toward a distant active
    /// item, as during `scroll_to_index` across several items
    pub passing: Vec<ItemTransform>,
}

impl ResolvedFrame {
    /// Visible items in paint order: neighbours first, active on top.
    pub fn visible(&self) -> impl Iterator<Item = &ItemTransform> {
        self.passing
            .iter()
            .chain(self.previous.iter())
            .chain(self.next.iter())
            .chain(self.active.iter())
    }

    pub fn instances(&self) -> Vec<TransformInstance> {
        self.visible().map(ItemTransform::instance).collect()
    }
}

/// Distance in pixels between two consecutive item slots.
pub fn page_distance(state: &ViewportState, params: &ResolveParams) -> f32 {
    params.orientation.extent(state.root_size) + params.item_spacing
}

/// Aspect-fit target for the active item, if its natural size is known.
pub fn resize_config(state: &ViewportState, params: &ResolveParams) -> Option<ResizeConfig> {
    let aspect_ratio = state.root_child_size.aspect_ratio()?;
    Some(ResizeConfig::new(
        state.root_size,
        aspect_ratio,
        params.aspect_fit_scale,
    ))
}

/// Rendered size of the active item at the current scale.
pub fn content_size(state: &ViewportState, params: &ResolveParams) -> SizeVector {
    content_size_at(state, params, state.scale)
}

/// Rendered size of the active item if it were at `scale`.
pub fn content_size_at(state: &ViewportState, params: &ResolveParams, scale: f32) -> SizeVector {
    let root = state.root_size;
    let resized = resize_to_aspect_ratio(
        resize_config(state, params).as_ref(),
        root.width,
        root.height,
        scale,
    );
    SizeVector::new(resized.width * scale, resized.height * scale)
}

fn slot_shift(index: usize, state: &ViewportState, params: &ResolveParams) -> (f32, f32) {
    let shift = (index as f32 - state.scroll) * page_distance(state, params) + state.scroll_offset;
    match params.orientation {
        Orientation::Horizontal => (shift, 0.0),
        Orientation::Vertical => (0.0, shift),
    }
}

fn resolve_active(state: &ViewportState, params: &ResolveParams) -> ItemTransform {
    let index = state.active_index;
    if !state.is_measured() {
        return ItemTransform::identity(index, state.root_size);
    }

    let root = state.root_size;
    let scale = state.scale;
    let resized = resize_to_aspect_ratio(
        resize_config(state, params).as_ref(),
        root.width,
        root.height,
        scale,
    );
    let (shift_x, shift_y) = slot_shift(index, state, params);

    // Box grows by the resize deltas, then scales about its center
    let grow_x = resized.width * (scale - 1.0) / 2.0;
    let grow_y = resized.height * (scale - 1.0) / 2.0;

    ItemTransform {
        index,
        width: resized.width * scale,
        height: resized.height * scale,
        offset_x: -resized.delta_x - grow_x + state.translate.x + shift_x,
        offset_y: -resized.delta_y - grow_y + state.translate.y + shift_y,
        scale,
        clip: state.overflow == Overflow::Hidden,
    }
}

fn resolve_neighbour(
    index: usize,
    state: &ViewportState,
    params: &ResolveParams,
) -> ItemTransform {
    let (offset_x, offset_y) = slot_shift(index, state, params);
    ItemTransform {
        offset_x,
        offset_y,
        ..ItemTransform::identity(index, state.root_size)
    }
}

/// Transforms for the active item and, unless hidden, its two neighbours.
pub fn resolve(state: &ViewportState, item_count: usize, params: &ResolveParams) -> ResolvedFrame {
    if item_count == 0 {
        return ResolvedFrame::default();
    }

    let active = resolve_active(state, params);
    let index = active.index;
    let show_neighbours = !state.hide_adjacent_items && state.root_size.is_measured();

    let previous = index
        .checked_sub(1)
        .filter(|_| show_neighbours)
        .map(|i| resolve_neighbour(i, state, params));
    let next = Some(index + 1)
        .filter(|&i| show_neighbours && i < item_count)
        .map(|i| resolve_neighbour(i, state, params));
    let passing = if show_neighbours {
        passing_slots(state, item_count, params)
            .filter(|&i| i.abs_diff(index) > 1)
            .map(|i| resolve_neighbour(i, state, params))
            .collect()
    } else {
        Vec::new()
    };

    ResolvedFrame {
        active: Some(active),
        previous,
        next,
        passing,
    }
}

/// The (at most two) slots overlapping the viewport at the current scroll.
fn passing_slots(
    state: &ViewportState,
    item_count: usize,
    params: &ResolveParams,
) -> impl Iterator<Item = usize> {
    let page = page_distance(state, params);
    let position = if page > 0.0 {
        state.scroll - state.scroll_offset / page
    } else {
        state.scroll
    };
    let last = item_count.saturating_sub(1) as f32;
    let first = if position.is_finite() {
        position.floor().clamp(0.0, last) as usize
    } else {
        0
    };
    (first..=first + 1).filter(move |&i| i < item_count)
}

/// Index a released swipe settles on.
///
/// Plain rounding, except that near the half-way point the velocity (in
/// index units, positive toward higher indices) picks the side.
pub fn resolve_snap_target(scroll: f32, velocity: f32, item_count: usize, tie_epsilon: f32) -> usize {
    if item_count == 0 {
        return 0;
    }
    let last = (item_count - 1) as f32;
    let scroll = if scroll.is_finite() {
        scroll.clamp(0.0, last)
    } else {
        0.0
    };

    let base = scroll.floor();
    let fraction = scroll - base;
    let target = if (fraction - 0.5).abs() <= tie_epsilon && velocity != 0.0 && velocity.is_finite()
    {
        if velocity > 0.0 { base + 1.0 } else { base }
    } else {
        scroll.round()
    };

    target.clamp(0.0, last) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector2;

    const EPSILON: f32 = 1e-3;

    fn measured(index: usize, count: usize) -> ViewportState {
        let mut state = ViewportState::at_rest(index, count);
        state.root_size = SizeVector::new(400.0, 300.0);
        state.root_child_size = SizeVector::new(800.0, 400.0);
        state
    }

    #[test]
    fn test_rest_fills_viewport() {
        let state = measured(0, 3);
        let frame = resolve(&state, 3, &ResolveParams::default());
        let active = frame.active.unwrap();
        assert_eq!(active.width, 400.0);
        assert_eq!(active.height, 300.0);
        assert_eq!(active.offset_x, 0.0);
        assert_eq!(active.offset_y, 0.0);
        assert!(active.clip);
        assert!(frame.previous.is_none());
        assert_eq!(frame.next.unwrap().offset_x, 400.0);
    }

    #[test]
    fn test_zoomed_item_stays_centered() {
        let mut state = measured(1, 3);
        state.scale = 2.0;
        state.set_zoomed(true);
        let frame = resolve(&state, 3, &ResolveParams::default());
        let active = frame.active.unwrap();

        // Fully aspect-fit at scale 2: box 600x300, rendered 1200x600
        assert!((active.width - 1200.0).abs() < EPSILON);
        assert!((active.height - 600.0).abs() < EPSILON);
        assert!((active.offset_x + active.width / 2.0 - 200.0).abs() < EPSILON);
        assert!((active.offset_y + active.height / 2.0 - 150.0).abs() < EPSILON);
        assert!(!active.clip);
        assert!(frame.previous.is_none());
        assert!(frame.next.is_none());
    }

    #[test]
    fn test_translate_moves_active() {
        let mut state = measured(0, 1);
        state.translate = Vector2::new(10.0, -5.0);
        let active = resolve(&state, 1, &ResolveParams::default()).active.unwrap();
        assert_eq!(active.offset_x, 10.0);
        assert_eq!(active.offset_y, -5.0);
    }

    #[test]
    fn test_scroll_shifts_slots() {
        let mut state = measured(0, 3);
        state.scroll = 0.25;
        let frame = resolve(&state, 3, &ResolveParams::default());
        assert!((frame.active.unwrap().offset_x + 100.0).abs() < EPSILON);
        assert!((frame.next.unwrap().offset_x - 300.0).abs() < EPSILON);
    }

    #[test]
    fn test_spacing_and_vertical() {
        let mut state = measured(1, 3);
        state.scroll = 1.0;
        let params = ResolveParams {
            orientation: Orientation::Vertical,
            item_spacing: 20.0,
            ..ResolveParams::default()
        };
        let frame = resolve(&state, 3, &params);
        let previous = frame.previous.unwrap();
        assert_eq!(previous.offset_x, 0.0);
        assert_eq!(previous.offset_y, -320.0);
        assert_eq!(frame.next.unwrap().offset_y, 320.0);
    }

    #[test]
    fn test_long_snap_draws_passing_items() {
        // Snapping from 0 toward 4, halfway between items 1 and 2
        let mut state = measured(4, 6);
        state.scroll = 1.5;
        let frame = resolve(&state, 6, &ResolveParams::default());
        let passing: Vec<_> = frame.passing.iter().map(|t| (t.index, t.offset_x)).collect();
        assert_eq!(passing, vec![(1, -200.0), (2, 200.0)]);
        assert_eq!(frame.visible().count(), 5);

        // Near the target the neighbours already cover the viewport
        state.scroll = 3.2;
        assert!(resolve(&state, 6, &ResolveParams::default()).passing.is_empty());
    }

    #[test]
    fn test_unmeasured_is_identity() {
        let mut state = ViewportState::at_rest(0, 2);
        state.root_size = SizeVector::new(400.0, 300.0);
        state.scale = 3.0;
        let frame = resolve(&state, 2, &ResolveParams::default());
        assert_eq!(
            frame.active,
            Some(ItemTransform::identity(0, state.root_size))
        );
    }

    #[test]
    fn test_empty_gallery() {
        let state = ViewportState::at_rest(0, 0);
        assert_eq!(resolve(&state, 0, &ResolveParams::default()), ResolvedFrame::default());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut state = measured(1, 3);
        state.scale = 1.7;
        state.translate = Vector2::new(-12.0, 4.0);
        state.scroll = 0.9;
        let params = ResolveParams::default();
        assert_eq!(resolve(&state, 3, &params), resolve(&state, 3, &params));
    }

    #[test]
    fn test_snap_rounds() {
        assert_eq!(resolve_snap_target(2.3, 0.0, 5, 0.05), 2);
        assert_eq!(resolve_snap_target(2.7, 0.0, 5, 0.05), 3);
    }

    #[test]
    fn test_snap_tie_follows_velocity() {
        assert_eq!(resolve_snap_target(2.5, 1.0, 5, 0.05), 3);
        assert_eq!(resolve_snap_target(2.5, -1.0, 5, 0.05), 2);
        assert_eq!(resolve_snap_target(2.53, -1.0, 5, 0.05), 2);
        // Outside the tie window velocity does not matter
        assert_eq!(resolve_snap_target(2.3, 5.0, 5, 0.05), 2);
    }

    #[test]
    fn test_snap_is_clamped() {
        assert_eq!(resolve_snap_target(7.0, 0.0, 3, 0.05), 2);
        assert_eq!(resolve_snap_target(-1.0, -3.0, 3, 0.05), 0);
        assert_eq!(resolve_snap_target(f32::NAN, 0.0, 3, 0.05), 0);
        assert_eq!(resolve_snap_target(1.0, 0.0, 0, 0.05), 0);
    }

    #[test]
    fn test_instances_are_pod() {
        let state = measured(1, 3);
        let frame = resolve(&state, 3, &ResolveParams::default());
        let instances = frame.instances();
        assert_eq!(instances.len(), 3);
        assert_eq!(instances.last().unwrap().index, 1);
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 3 * std::mem::size_of::<TransformInstance>());
    }
}
