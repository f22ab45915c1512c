// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout manager lifecycle shared by every layout.
//!
//! A host drives a [`LayoutManager`] through four calls:
//!
//! 1. [`LayoutManager::attach`] binds the manager to a host of a given size and
//!    creates its [`Scroller`].
//! 2. [`LayoutManager::measure`] asks the [`Adapter`] for every item's size and
//!    freezes per-item geometry until the next measure.
//! 3. [`LayoutManager::layout`] decides which items are shown, hidden or
//!    recycled for the current scroll position and places the shown ones.
//! 4. [`LayoutManager::detach`] drops the scroller and every cache.
//!
//! Scrolling (programmatic, drag, wheel, smooth scroll via
//! [`LayoutManager::update`]) moves the scroller and raises a layout request
//! that the host observes through [`LayoutManager::needs_layout`].

use alloc::boxed::Box;
use core::fmt;

use kurbo::Size;

use crate::adapter::Adapter;
use crate::geometry::{Extent, ScrollWindow};
use crate::recycler::Recycler;
use crate::scroller::Scroller;

/// How [`LayoutManager::focus_item`] picks its scroll target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FocusStrategy {
    /// Scroll the least amount that brings the item fully into view.
    #[default]
    MinScrollDistance,
    /// Scroll so the item starts at the viewport's leading edge.
    ShowAsFirstItem,
}

type MeasureListener = Box<dyn FnMut(Size)>;
type LayoutListener = Box<dyn FnMut()>;

/// Callbacks fired at the end of measure and layout passes.
#[derive(Default)]
pub struct LayoutListeners {
    on_measure_completed: Option<MeasureListener>,
    on_layout_completed: Option<LayoutListener>,
}

impl fmt::Debug for LayoutListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutListeners")
            .field("on_measure_completed", &self.on_measure_completed.is_some())
            .field("on_layout_completed", &self.on_layout_completed.is_some())
            .finish()
    }
}

/// Bookkeeping common to every layout manager.
#[derive(Debug, Default)]
pub struct LayoutState {
    attached: bool,
    host_size: Size,
    viewport_size: Size,
    content_size: Size,
    in_measuring: bool,
    in_layouting: bool,
    scroll_position: f64,
    scroll_delta: f64,
    layout_requested: bool,
    listeners: LayoutListeners,
}

impl LayoutState {
    /// Creates detached state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a host is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Size of the host's content rectangle.
    #[must_use]
    pub fn host_size(&self) -> Size {
        self.host_size
    }

    /// Size of the visible region.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Size of the laid-out content.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Sets the size of the laid-out content.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    /// Sets the size of the visible region.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Whether a measure pass is running.
    #[must_use]
    pub fn in_measuring(&self) -> bool {
        self.in_measuring
    }

    /// Whether a layout pass is running.
    #[must_use]
    pub fn in_layouting(&self) -> bool {
        self.in_layouting
    }

    /// Current scroll offset (a rotation in degrees for circular layouts).
    #[must_use]
    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    /// Signed change applied by the most recent scroll update.
    #[must_use]
    pub fn scroll_delta(&self) -> f64 {
        self.scroll_delta
    }

    /// Whether a layout pass has been requested since the last one ran.
    #[must_use]
    pub fn layout_requested(&self) -> bool {
        self.layout_requested
    }

    /// Records a new scroll position and requests a layout pass.
    pub fn set_scroll_position(&mut self, position: f64) {
        self.scroll_delta = position - self.scroll_position;
        self.scroll_position = position;
        self.layout_requested = true;
    }

    /// Requests a layout pass.
    pub fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    /// Installs the callback fired after each measure pass with the content size.
    pub fn set_on_measure_completed(&mut self, listener: impl FnMut(Size) + 'static) {
        self.listeners.on_measure_completed = Some(Box::new(listener));
    }

    /// Installs the callback fired after each layout pass.
    pub fn set_on_layout_completed(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.on_layout_completed = Some(Box::new(listener));
    }

    fn reset_to_host(&mut self) {
        self.viewport_size = self.host_size;
        self.content_size = self.host_size;
    }
}

/// Geometry and recycling policy for a virtualized list.
///
/// Implementors provide the `on_*` hooks, item visibility and focus; the
/// lifecycle and scrolling entry points are provided on top of them.
///
/// `on_measure` is the only place per-item geometry is computed and it must be
/// idempotent for unchanged adapter output. `on_layout_children` only shows,
/// hides, recycles and places view holders.
pub trait LayoutManager {
    /// Shared bookkeeping.
    fn state(&self) -> &LayoutState;

    /// Shared bookkeeping, mutably.
    fn state_mut(&mut self) -> &mut LayoutState;

    /// The scroller created by `on_attach`, if attached.
    fn scroller(&self) -> Option<&Scroller>;

    /// The scroller created by `on_attach`, mutably.
    fn scroller_mut(&mut self) -> Option<&mut Scroller>;

    /// Creates the scroller and resets internal caches.
    fn on_attach(&mut self);

    /// Computes per-item geometry and the content size.
    fn on_measure<A: Adapter>(&mut self, adapter: &A);

    /// Shows, hides, recycles and places view holders for the current scroll
    /// position.
    fn on_layout_children<A: Adapter, R: Recycler>(&mut self, adapter: &A, recycler: &mut R);

    /// Drops the scroller and clears caches.
    fn on_detach(&mut self);

    /// Scrolls so the item at `index` comes into view.
    fn focus_item(&mut self, index: usize, smooth: bool);

    /// Returns `true` if the item at `index` was visible after the last layout pass.
    fn is_view_holder_visible(&self, index: usize) -> bool;

    /// Position a finished drag should settle at, if snapping applies.
    fn snap_position(&self, position: f64) -> Option<f64> {
        let _ = position;
        None
    }

    /// Binds to a host whose content rectangle has `host_size`.
    fn attach(&mut self, host_size: Size) {
        let state = self.state_mut();
        state.attached = true;
        state.host_size = host_size;
        state.scroll_position = 0.0;
        state.scroll_delta = 0.0;
        state.reset_to_host();
        state.request_layout();
        self.on_attach();
        log::debug!("layout manager attached to host {host_size:?}");
    }

    /// Updates the host size after a resize. Call [`LayoutManager::measure`]
    /// afterwards.
    fn set_host_size(&mut self, host_size: Size) {
        let state = self.state_mut();
        state.host_size = host_size;
        state.request_layout();
    }

    /// Measures every item. Does nothing without a host or an adapter.
    fn measure<A: Adapter>(&mut self, adapter: Option<&A>) {
        let Some(adapter) = adapter else {
            return;
        };
        if !self.state().attached {
            return;
        }
        let state = self.state_mut();
        state.in_measuring = true;
        state.reset_to_host();
        self.on_measure(adapter);
        let state = self.state_mut();
        state.in_measuring = false;
        state.request_layout();
        let content_size = state.content_size;
        log::debug!(
            "measured {} items, content {content_size:?}",
            adapter.item_count()
        );
        if let Some(listener) = &mut state.listeners.on_measure_completed {
            listener(content_size);
        }
    }

    /// Lays out children. Does nothing without a host or an adapter.
    fn layout<A: Adapter, R: Recycler>(&mut self, adapter: Option<&A>, recycler: &mut R) {
        let Some(adapter) = adapter else {
            return;
        };
        if !self.state().attached {
            return;
        }
        self.state_mut().in_layouting = true;

        let count = adapter.item_count();
        for (index, handle) in recycler.visible_view_holders() {
            if index >= count {
                recycler.hide_view_holder(handle);
                recycler.recycle_view_holder(handle);
            }
        }

        self.on_layout_children(adapter, recycler);

        let state = self.state_mut();
        state.in_layouting = false;
        state.layout_requested = false;
        if let Some(listener) = &mut state.listeners.on_layout_completed {
            listener();
        }
    }

    /// Unbinds from the host.
    fn detach(&mut self) {
        let state = self.state_mut();
        state.attached = false;
        state.layout_requested = false;
        self.on_detach();
        log::debug!("layout manager detached");
    }

    /// Whether scrolling or a lifecycle change asked for a new layout pass.
    fn needs_layout(&self) -> bool {
        self.state().attached && self.state().layout_requested
    }

    /// Jumps to the scroll `position`.
    fn scroll_to_position(&mut self, position: f64) {
        let moved = self
            .scroller_mut()
            .and_then(|scroller| scroller.scroll_to_position(position));
        apply_scroll(self, moved);
    }

    /// Animates toward the scroll `position` at the scroller's default speed.
    fn smooth_scroll_to_position(&mut self, position: f64) {
        let moved = self
            .scroller_mut()
            .and_then(|scroller| scroller.smooth_scroll_to(position));
        apply_scroll(self, moved);
    }

    /// Cancels a smooth scroll in flight.
    fn stop_smooth_scroll(&mut self) {
        if let Some(scroller) = self.scroller_mut() {
            scroller.stop_smooth_scroll();
        }
    }

    /// Scrolls by `delta` units.
    fn scroll_delta(&mut self, delta: f64) {
        let moved = self
            .scroller_mut()
            .and_then(|scroller| scroller.scroll_by(delta));
        apply_scroll(self, moved);
    }

    /// Applies a pointer drag of `delta` units along the scroll axis.
    fn drag(&mut self, delta: f64) {
        let moved = self.scroller_mut().and_then(|scroller| {
            scroller.stop_smooth_scroll();
            scroller.drag(delta)
        });
        apply_scroll(self, moved);
    }

    /// Applies a wheel movement of `delta` notches.
    fn wheel(&mut self, delta: f64) {
        let moved = self
            .scroller_mut()
            .and_then(|scroller| scroller.wheel(delta));
        apply_scroll(self, moved);
    }

    /// Ends a drag, snapping to the nearest item when the scroller snaps.
    fn end_drag(&mut self) {
        let Some(scroller) = self.scroller() else {
            return;
        };
        if !scroller.config().snap {
            return;
        }
        if let Some(target) = self.snap_position(scroller.position()) {
            self.smooth_scroll_to_position(target);
        }
    }

    /// Advances smooth scrolling by `dt` seconds. Returns [`Self::needs_layout`].
    fn update(&mut self, dt: f64) -> bool {
        let moved = self.scroller_mut().and_then(|scroller| scroller.update(dt));
        apply_scroll(self, moved);
        self.needs_layout()
    }
}

pub(crate) fn apply_scroll<M: LayoutManager + ?Sized>(manager: &mut M, moved: Option<f64>) {
    if let Some(position) = moved {
        manager.state_mut().set_scroll_position(position);
        log::trace!("scrolled to {position}");
    }
}

/// Scroll target that brings `[start, end]` into `window` under `strategy`.
///
/// Returns `None` when [`FocusStrategy::MinScrollDistance`] finds the extent
/// already fully visible.
pub(crate) fn focus_target(
    strategy: FocusStrategy,
    window: ScrollWindow,
    start: f64,
    end: f64,
) -> Option<f64> {
    match strategy {
        FocusStrategy::ShowAsFirstItem => Some(start),
        FocusStrategy::MinScrollDistance => {
            if window.contains(start, end) {
                None
            } else if start < window.position || end - start > window.extent {
                Some(start)
            } else {
                Some(end - window.extent)
            }
        }
    }
}

/// The extent start closest to `position`.
pub(crate) fn nearest_start<E: Extent>(extents: &[E], position: f64) -> Option<f64> {
    let after = extents.partition_point(|extent| extent.start() < position);
    let candidates = [after.checked_sub(1), Some(after)];
    candidates
        .into_iter()
        .flatten()
        .filter_map(|index| extents.get(index))
        .map(Extent::start)
        .min_by(|a, b| (a - position).abs().total_cmp(&(b - position).abs()))
}
