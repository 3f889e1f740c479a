//! The canonical viewport state shared by every interpreter of one gallery.

use crate::geometry::{SizeVector, Vector2};
use crate::gesture::ZOOM_EPSILON;
use crate::reactive::{ReadValue, SharedValue};

/// Whether the active item may paint outside its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Hidden,
    Visible,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
    pub root_size: SizeVector,
    pub root_child_size: SizeVector,
    pub translate: Vector2,
    pub scale: f32,
    /// Continuous position in item-index units
    pub scroll: f32,
    /// Pixel correction on top of `scroll`
    pub scroll_offset: f32,
    pub active_index: usize,
    pub is_scrolling: bool,
    pub has_zoomed: bool,
    pub overflow: Overflow,
    pub hide_adjacent_items: bool,
}

impl ViewportState {
    /// Everything at rest on `initial_index`, clamped into the item range.
    pub fn at_rest(initial_index: usize, item_count: usize) -> Self {
        let index = clamp_index(initial_index, item_count);
        Self {
            root_size: SizeVector::ZERO,
            root_child_size: SizeVector::ZERO,
            translate: Vector2::ZERO,
            scale: 1.0,
            scroll: index as f32,
            scroll_offset: 0.0,
            active_index: index,
            is_scrolling: false,
            has_zoomed: false,
            overflow: Overflow::Hidden,
            hide_adjacent_items: false,
        }
    }

    /// Set `has_zoomed` and the two flags that follow it.
    pub(crate) fn set_zoomed(&mut self, zoomed: bool) {
        self.has_zoomed = zoomed;
        self.hide_adjacent_items = zoomed;
        self.sync_overflow();
    }

    /// Write scale and translation as one pose.
    pub(crate) fn set_pose(&mut self, scale: f32, translate: Vector2) {
        self.scale = scale;
        self.translate = translate;
        self.sync_overflow();
    }

    // Content only spills past its box when zoomed in past the viewport
    fn sync_overflow(&mut self) {
        self.overflow = if self.has_zoomed && self.scale > 1.0 + ZOOM_EPSILON {
            Overflow::Visible
        } else {
            Overflow::Hidden
        };
    }

    /// Drop any zoom: scale 1, no translation, flags cleared.
    pub(crate) fn reset_zoom(&mut self) {
        self.scale = 1.0;
        self.translate = Vector2::ZERO;
        self.set_zoomed(false);
    }

    pub fn is_measured(&self) -> bool {
        self.root_size.is_measured() && self.root_child_size.is_measured()
    }
}

pub(crate) fn clamp_index(index: usize, item_count: usize) -> usize {
    index.min(item_count.saturating_sub(1))
}

/// Owner handle of a gallery's [`ViewportState`].
///
/// The whole state lives in one cell: a write replaces it as a unit, so a
/// reader never sees half of an update.
#[derive(Clone)]
pub struct ViewportStore {
    cell: SharedValue<ViewportState>,
}

impl ViewportStore {
    pub fn new(initial_index: usize, item_count: usize) -> Self {
        if item_count > 0 && initial_index >= item_count {
            log::warn!(
                "initial index {} out of range for {} items, clamping",
                initial_index,
                item_count
            );
        }
        Self {
            cell: SharedValue::new(ViewportState::at_rest(initial_index, item_count)),
        }
    }

    /// Tracked snapshot: reading inside a subscription subscribes to it.
    pub fn snapshot(&self) -> ViewportState {
        self.cell.get()
    }

    pub fn snapshot_untracked(&self) -> ViewportState {
        self.cell.get_untracked()
    }

    pub fn reader(&self) -> ViewportReader {
        ViewportReader {
            cell: self.cell.reader(),
        }
    }

    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    pub fn scale(&self) -> f32 {
        self.cell.with(|s| s.scale)
    }

    pub fn translate(&self) -> Vector2 {
        self.cell.with(|s| s.translate)
    }

    pub fn scroll(&self) -> f32 {
        self.cell.with(|s| s.scroll)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.cell.with(|s| s.scroll_offset)
    }

    pub fn active_index(&self) -> usize {
        self.cell.with(|s| s.active_index)
    }

    pub fn is_scrolling(&self) -> bool {
        self.cell.with(|s| s.is_scrolling)
    }

    pub fn has_zoomed(&self) -> bool {
        self.cell.with(|s| s.has_zoomed)
    }

    pub fn overflow(&self) -> Overflow {
        self.cell.with(|s| s.overflow)
    }

    pub fn hide_adjacent_items(&self) -> bool {
        self.cell.with(|s| s.hide_adjacent_items)
    }

    pub fn root_size(&self) -> SizeVector {
        self.cell.with(|s| s.root_size)
    }

    pub fn root_child_size(&self) -> SizeVector {
        self.cell.with(|s| s.root_child_size)
    }

    /// Apply one interpreter update as a single write.
    pub(crate) fn update(&self, f: impl FnOnce(&mut ViewportState)) -> bool {
        self.cell.update(f)
    }

    /// Read without subscribing; interpreters use this for their own
    /// bookkeeping.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&ViewportState) -> R) -> R {
        self.cell.with_untracked(f)
    }
}

/// Read-only, `Send` view of a [`ViewportStore`] for a render thread.
#[derive(Clone)]
pub struct ViewportReader {
    cell: ReadValue<ViewportState>,
}

impl ViewportReader {
    pub fn snapshot(&self) -> ViewportState {
        self.cell.get()
    }

    pub fn version(&self) -> u64 {
        self.cell.version()
    }
}
