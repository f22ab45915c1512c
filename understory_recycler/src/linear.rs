// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-axis sequential layout.
//!
//! ```rust
//! use kurbo::Size;
//! use understory_recycler::{
//!     Adapter, LayoutManager, LinearLayoutConfig, LinearLayoutManager, ViewHolderPool,
//! };
//!
//! struct Rows;
//!
//! impl Adapter for Rows {
//!     type Template = ();
//!     fn item_count(&self) -> usize {
//!         10
//!     }
//!     fn view_holder_template(&self, _view_type: usize) -> Option<&()> {
//!         Some(&())
//!     }
//!     fn measure_view_holder(&self, _: &(), _index: usize, available: Size) -> Size {
//!         Size::new(available.width, 100.0)
//!     }
//! }
//!
//! let mut pool = ViewHolderPool::new();
//! let mut list = LinearLayoutManager::new(LinearLayoutConfig::default());
//! list.attach(Size::new(200.0, 350.0));
//! list.measure(Some(&Rows));
//! list.layout(Some(&Rows), &mut pool);
//! assert_eq!(list.visible_range(), Some(0..=3));
//!
//! list.scroll_to_position(420.0);
//! list.layout(Some(&Rows), &mut pool);
//! assert_eq!(pool.visible_indices(), [4, 5, 6, 7]);
//! ```

use alloc::vec::Vec;
use core::ops::RangeInclusive;

use kurbo::{Insets, Rect, Size};

use crate::adapter::{Adapter, measure_item};
use crate::cache::{LayoutCache, evicted, next_layout_cache};
use crate::geometry::{Extent, Orientation, ScrollWindow};
use crate::manager::{
    FocusStrategy, LayoutManager, LayoutState, apply_scroll, focus_target, nearest_start,
};
use crate::recycler::{Recycler, hide_and_recycle, show_and_place};
use crate::scroller::{Scroller, ScrollerConfig};

/// Settings for a [`LinearLayoutManager`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearLayoutConfig {
    /// Scroll axis.
    pub orientation: Orientation,
    /// Gap between consecutive items. Negative values are treated as `0`.
    pub spacing: f64,
    /// Space around the content; the scroll-axis sides pad the first and last item.
    pub padding: Insets,
    /// Target selection for [`LayoutManager::focus_item`].
    pub focus_strategy: FocusStrategy,
    /// Scroller tuning. The bounds are derived from the measured content.
    pub scroller: ScrollerConfig,
}

impl Default for LinearLayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            spacing: 0.0,
            padding: Insets::ZERO,
            focus_strategy: FocusStrategy::MinScrollDistance,
            scroller: ScrollerConfig::default(),
        }
    }
}

impl LinearLayoutConfig {
    fn sanitized(mut self) -> Self {
        if self.spacing < 0.0 {
            log::warn!("negative spacing {} clamped to 0", self.spacing);
            self.spacing = 0.0;
        }
        self.scroller.bounded = true;
        self
    }
}

/// Measured geometry of one item along the scroll axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeasuredPosition {
    /// Content-space coordinate where the item begins.
    pub start: f64,
    /// Content-space coordinate where the item ends.
    pub end: f64,
    /// Measured size of the item.
    pub size: Size,
}

impl Extent for MeasuredPosition {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Lays items out one after another along a single axis.
#[derive(Debug)]
pub struct LinearLayoutManager {
    state: LayoutState,
    config: LinearLayoutConfig,
    scroller: Option<Scroller>,
    positions: Vec<MeasuredPosition>,
    cache: Option<LayoutCache>,
}

impl LinearLayoutManager {
    /// Creates a detached manager.
    #[must_use]
    pub fn new(config: LinearLayoutConfig) -> Self {
        Self {
            state: LayoutState::new(),
            config: config.sanitized(),
            scroller: None,
            positions: Vec::new(),
            cache: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LinearLayoutConfig {
        &self.config
    }

    /// Replaces the configuration. Measure again before the next layout.
    pub fn set_config(&mut self, config: LinearLayoutConfig) {
        self.config = config.sanitized();
        self.cache = None;
        if let Some(scroller) = &self.scroller {
            let position = scroller.position();
            let mut fresh = Scroller::new(ScrollerConfig {
                min_position: scroller.min_position(),
                max_position: scroller.max_position(),
                ..self.config.scroller
            });
            let moved = fresh.scroll_to_position(position);
            self.scroller = Some(fresh);
            apply_scroll(self, moved);
        }
        self.state.request_layout();
    }

    /// Per-item geometry from the last measure pass.
    #[must_use]
    pub fn measured_positions(&self) -> &[MeasuredPosition] {
        &self.positions
    }

    /// Cache recorded by the last layout pass; `None` until the first layout
    /// after attach or measure.
    #[must_use]
    pub fn layout_cache(&self) -> Option<&LayoutCache> {
        self.cache.as_ref()
    }

    /// Inclusive range of visible item indices after the last layout pass.
    #[must_use]
    pub fn visible_range(&self) -> Option<RangeInclusive<usize>> {
        self.cache.as_ref().and_then(LayoutCache::visible_range)
    }

    /// Visible window along the scroll axis.
    #[must_use]
    pub fn window(&self) -> ScrollWindow {
        ScrollWindow::new(
            self.state.scroll_position(),
            self.config.orientation.main(self.state.viewport_size()),
        )
    }

    /// Viewport-local rectangle for the item at `index`.
    #[must_use]
    pub fn item_rect(&self, index: usize) -> Option<Rect> {
        let position = self.positions.get(index)?;
        let orientation = self.config.orientation;
        let viewport = self.state.viewport_size();
        let main_center = (position.start + position.end) * 0.5 - self.state.scroll_position();
        let cross_center = (orientation.cross(viewport)
            + orientation.cross_leading(self.config.padding)
            - orientation.cross_trailing(self.config.padding))
            * 0.5;
        Some(orientation.centered_rect(main_center, cross_center, position.size))
    }

    /// Scroll position [`LayoutManager::focus_item`] would move to, clamped to
    /// the scroll range; `None` if no scrolling is needed.
    #[must_use]
    pub fn focus_target(&self, index: usize) -> Option<f64> {
        let position = self.positions.get(index)?;
        let target = focus_target(
            self.config.focus_strategy,
            self.window(),
            position.start,
            position.end,
        )?;
        Some(self.scroller.as_ref().map_or(target, |s| s.clamp(target)))
    }
}

impl LayoutManager for LinearLayoutManager {
    fn state(&self) -> &LayoutState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut LayoutState {
        &mut self.state
    }

    fn scroller(&self) -> Option<&Scroller> {
        self.scroller.as_ref()
    }

    fn scroller_mut(&mut self) -> Option<&mut Scroller> {
        self.scroller.as_mut()
    }

    fn on_attach(&mut self) {
        self.scroller = Some(Scroller::new(ScrollerConfig {
            min_position: 0.0,
            max_position: 0.0,
            ..self.config.scroller
        }));
        self.positions.clear();
        self.cache = None;
    }

    fn on_measure<A: Adapter>(&mut self, adapter: &A) {
        let orientation = self.config.orientation;
        let padding = self.config.padding;
        let viewport = self.state.viewport_size();
        let cross_available = (orientation.cross(viewport)
            - orientation.cross_leading(padding)
            - orientation.cross_trailing(padding))
        .max(0.0);
        let available = orientation.size(f64::INFINITY, cross_available);

        let count = adapter.item_count();
        self.positions.clear();
        self.positions.reserve(count);
        let mut cursor = orientation.leading(padding);
        for index in 0..count {
            let size = measure_item(adapter, index, available);
            let start = cursor;
            let end = start + orientation.main(size).max(0.0);
            self.positions.push(MeasuredPosition { start, end, size });
            cursor = if index + 1 < count {
                end + self.config.spacing
            } else {
                end
            };
        }
        let content_extent = cursor + orientation.trailing(padding);

        self.state
            .set_content_size(orientation.size(content_extent, orientation.cross(viewport)));
        self.cache = None;

        let max_position = (content_extent - orientation.main(viewport)).max(0.0);
        let moved = self
            .scroller
            .as_mut()
            .and_then(|scroller| scroller.set_bounds(0.0, max_position));
        apply_scroll(self, moved);
    }

    fn on_layout_children<A: Adapter, R: Recycler>(&mut self, adapter: &A, recycler: &mut R) {
        let window = self.window();
        let count = self.positions.len().min(adapter.item_count());
        let previous = self.cache.take();
        let next = next_layout_cache(
            &self.positions[..count],
            window,
            previous.as_ref(),
            self.state.scroll_delta(),
        );

        match &previous {
            Some(previous) => {
                for range in evicted(previous.range(), next.range()) {
                    for index in range {
                        hide_and_recycle(recycler, index);
                    }
                }
            }
            None => {
                for (index, handle) in recycler.visible_view_holders() {
                    if !next.contains(index) {
                        recycler.hide_view_holder(handle);
                        recycler.recycle_view_holder(handle);
                    }
                }
            }
        }

        for index in next.range() {
            if let Some(rect) = self.item_rect(index) {
                show_and_place(recycler, index, adapter.item_view_type(index), rect);
            }
        }

        log::trace!("linear layout at {}: {next:?}", window.position);
        self.cache = Some(next);
    }

    fn on_detach(&mut self) {
        self.scroller = None;
        self.positions.clear();
        self.cache = None;
    }

    fn focus_item(&mut self, index: usize, smooth: bool) {
        let Some(target) = self.focus_target(index) else {
            return;
        };
        if smooth {
            self.smooth_scroll_to_position(target);
        } else {
            self.scroll_to_position(target);
        }
    }

    fn is_view_holder_visible(&self, index: usize) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cache| cache.contains(index))
    }

    fn snap_position(&self, position: f64) -> Option<f64> {
        let target = nearest_start(&self.positions, position)?;
        Some(self.scroller.as_ref().map_or(target, |s| s.clamp(target)))
    }
}
