// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Span-based grid layout.
//!
//! Items are packed into spans of `span_count` cells: rows when the grid scrolls
//! vertically, columns when it scrolls horizontally. Each item takes as many
//! cells as its [`SpanSizeLookup`] reports. An item that does not fit in what is
//! left of the current span starts a new one; a span size of `0` hides the item.
//!
//! Visibility, recycling and focus work on whole spans: a span is shown or
//! evicted together with every item it holds.
//!
//! ```rust
//! use kurbo::Size;
//! use understory_recycler::{
//!     Adapter, GridLayoutConfig, GridLayoutManager, LayoutManager, ViewHolderPool,
//! };
//!
//! struct Tiles;
//!
//! impl Adapter for Tiles {
//!     type Template = ();
//!     fn item_count(&self) -> usize {
//!         7
//!     }
//!     fn view_holder_template(&self, _view_type: usize) -> Option<&()> {
//!         Some(&())
//!     }
//!     fn measure_view_holder(&self, _: &(), _index: usize, available: Size) -> Size {
//!         Size::new(available.width, 40.0)
//!     }
//! }
//!
//! let mut grid = GridLayoutManager::new(GridLayoutConfig {
//!     span_count: 3,
//!     ..GridLayoutConfig::default()
//! });
//! grid.attach(Size::new(300.0, 100.0));
//! grid.measure(Some(&Tiles));
//!
//! let rows: Vec<Vec<usize>> = grid.spans().iter().map(|s| s.items.to_vec()).collect();
//! assert_eq!(rows, [vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
//!
//! let mut pool = ViewHolderPool::new();
//! grid.layout(Some(&Tiles), &mut pool);
//! assert_eq!(pool.visible_indices(), [0, 1, 2, 3, 4, 5, 6]);
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::ops::RangeInclusive;

use kurbo::{Insets, Point, Rect, Size};
use smallvec::SmallVec;

use crate::adapter::{Adapter, DefaultSpanSizeLookup, SpanSizeLookup, measure_item};
use crate::cache::{LayoutCache, evicted, next_layout_cache};
use crate::geometry::{Extent, Orientation, ScrollWindow};
use crate::manager::{
    FocusStrategy, LayoutManager, LayoutState, apply_scroll, focus_target, nearest_start,
};
use crate::recycler::{Recycler, hide_and_recycle, show_and_place};
use crate::scroller::{Scroller, ScrollerConfig};

/// Settings for a [`GridLayoutManager`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayoutConfig {
    /// Scroll axis. Spans are rows for [`Orientation::Vertical`].
    pub orientation: Orientation,
    /// Cells per span. Values below `1` are treated as `1`.
    pub span_count: usize,
    /// Gap between consecutive spans. Negative values are treated as `0`.
    pub spacing: f64,
    /// Gap between cells of one span. Negative values are treated as `0`.
    pub cross_spacing: f64,
    /// Space around the content.
    pub padding: Insets,
    /// Target selection for [`LayoutManager::focus_item`].
    pub focus_strategy: FocusStrategy,
    /// Scroller tuning. The bounds are derived from the measured content.
    pub scroller: ScrollerConfig,
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            span_count: 1,
            spacing: 0.0,
            cross_spacing: 0.0,
            padding: Insets::ZERO,
            focus_strategy: FocusStrategy::MinScrollDistance,
            scroller: ScrollerConfig::default(),
        }
    }
}

impl GridLayoutConfig {
    fn sanitized(mut self) -> Self {
        if self.span_count < 1 {
            log::warn!("span count {} clamped to 1", self.span_count);
            self.span_count = 1;
        }
        if self.spacing < 0.0 {
            log::warn!("negative spacing {} clamped to 0", self.spacing);
            self.spacing = 0.0;
        }
        if self.cross_spacing < 0.0 {
            log::warn!("negative cross spacing {} clamped to 0", self.cross_spacing);
            self.cross_spacing = 0.0;
        }
        self.scroller.bounded = true;
        self
    }
}

/// One row (vertical grid) or column (horizontal grid).
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpan {
    /// Position of the span in [`GridLayoutManager::spans`].
    pub index: usize,
    /// Content-space coordinate where the span begins.
    pub start: f64,
    /// Content-space coordinate where the span ends.
    pub end: f64,
    /// Item indices placed in this span, in order.
    pub items: SmallVec<[usize; 8]>,
}

impl Extent for GridSpan {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Measured geometry of one grid item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridItem {
    /// Owning span, or `None` for items with a span size of `0`.
    pub span: Option<usize>,
    /// First cell the item occupies in its span.
    pub cell: usize,
    /// Number of cells the item occupies.
    pub span_size: usize,
    /// Content-space top-left corner.
    pub position: Point,
    /// Measured size.
    pub size: Size,
}

impl GridItem {
    const HIDDEN: Self = Self {
        span: None,
        cell: 0,
        span_size: 0,
        position: Point::ZERO,
        size: Size::ZERO,
    };
}

/// Lays items out in spans of cells and recycles them span by span.
pub struct GridLayoutManager<L = DefaultSpanSizeLookup> {
    state: LayoutState,
    config: GridLayoutConfig,
    span_lookup: L,
    scroller: Option<Scroller>,
    items: Vec<GridItem>,
    spans: Vec<GridSpan>,
    cache: Option<LayoutCache>,
}

impl<L> fmt::Debug for GridLayoutManager<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridLayoutManager")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("scroller", &self.scroller)
            .field("items", &self.items.len())
            .field("spans", &self.spans.len())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl GridLayoutManager {
    /// Creates a detached manager where every item occupies one cell.
    #[must_use]
    pub fn new(config: GridLayoutConfig) -> Self {
        Self::with_span_lookup(config, DefaultSpanSizeLookup)
    }
}

/// Cell geometry shared by every span of one measure pass.
struct Cells {
    orientation: Orientation,
    cross_origin: f64,
    cell_extent: f64,
    cross_spacing: f64,
}

impl Cells {
    fn region(&self, span_size: usize) -> f64 {
        let gaps = span_size.saturating_sub(1) as f64;
        self.cell_extent * span_size as f64 + self.cross_spacing * gaps
    }

    fn offset(&self, cell: usize) -> f64 {
        self.cross_origin + (self.cell_extent + self.cross_spacing) * cell as f64
    }
}

impl<L: SpanSizeLookup> GridLayoutManager<L> {
    /// Creates a detached manager with a custom span-size lookup.
    #[must_use]
    pub fn with_span_lookup(config: GridLayoutConfig, span_lookup: L) -> Self {
        Self {
            state: LayoutState::new(),
            config: config.sanitized(),
            span_lookup,
            scroller: None,
            items: Vec::new(),
            spans: Vec::new(),
            cache: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GridLayoutConfig {
        &self.config
    }

    /// Replaces the configuration. Measure again before the next layout.
    pub fn set_config(&mut self, config: GridLayoutConfig) {
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

    /// Returns the span-size lookup.
    #[must_use]
    pub fn span_lookup(&self) -> &L {
        &self.span_lookup
    }

    /// Per-item geometry from the last measure pass.
    #[must_use]
    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    /// Spans from the last measure pass, in scroll order.
    #[must_use]
    pub fn spans(&self) -> &[GridSpan] {
        &self.spans
    }

    /// Span holding the item at `index`.
    #[must_use]
    pub fn span_of(&self, index: usize) -> Option<usize> {
        self.items.get(index).and_then(|item| item.span)
    }

    /// Cache recorded by the last layout pass, over span indices.
    #[must_use]
    pub fn layout_cache(&self) -> Option<&LayoutCache> {
        self.cache.as_ref()
    }

    /// Inclusive range of visible span indices after the last layout pass.
    #[must_use]
    pub fn visible_span_range(&self) -> Option<RangeInclusive<usize>> {
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

    /// Returns `true` if the whole span lies inside the viewport.
    #[must_use]
    pub fn is_span_fully_visible(&self, span: usize) -> bool {
        self.spans
            .get(span)
            .is_some_and(|span| self.window().contains(span.start, span.end))
    }

    /// Viewport-local rectangle for the item at `index`.
    #[must_use]
    pub fn item_rect(&self, index: usize) -> Option<Rect> {
        let item = self.items.get(index)?;
        item.span?;
        let orientation = self.config.orientation;
        let main = orientation.main_coord(item.position) - self.state.scroll_position();
        let cross = orientation.cross_coord(item.position);
        Some(Rect::from_origin_size(orientation.point(main, cross), item.size))
    }

    /// Scroll position [`LayoutManager::focus_item`] would move to, clamped to
    /// the scroll range; `None` if no scrolling is needed.
    #[must_use]
    pub fn focus_target(&self, index: usize) -> Option<f64> {
        let span = self.spans.get(self.span_of(index)?)?;
        let target = focus_target(self.config.focus_strategy, self.window(), span.start, span.end)?;
        Some(self.scroller.as_ref().map_or(target, |s| s.clamp(target)))
    }

    fn item_in(&self, index: usize, cache: &LayoutCache) -> bool {
        self.span_of(index).is_some_and(|span| cache.contains(span))
    }

    fn close_span(
        &mut self,
        members: &mut SmallVec<[usize; 8]>,
        extent: f64,
        cursor: &mut f64,
        cells: &Cells,
    ) {
        let orientation = cells.orientation;
        let start = if self.spans.is_empty() {
            *cursor
        } else {
            *cursor + self.config.spacing
        };
        for &index in members.iter() {
            let item = &mut self.items[index];
            let main = start + (extent - orientation.main(item.size)) * 0.5;
            let cross = cells.offset(item.cell)
                + (cells.region(item.span_size) - orientation.cross(item.size)) * 0.5;
            item.position = orientation.point(main, cross);
        }
        let end = start + extent;
        self.spans.push(GridSpan {
            index: self.spans.len(),
            start,
            end,
            items: core::mem::take(members),
        });
        *cursor = end;
    }
}

impl<L: SpanSizeLookup> LayoutManager for GridLayoutManager<L> {
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
        self.items.clear();
        self.spans.clear();
        self.cache = None;
    }

    fn on_measure<A: Adapter>(&mut self, adapter: &A) {
        let orientation = self.config.orientation;
        let padding = self.config.padding;
        let span_count = self.config.span_count;
        let viewport = self.state.viewport_size();
        let cross_available = (orientation.cross(viewport)
            - orientation.cross_leading(padding)
            - orientation.cross_trailing(padding))
        .max(0.0);
        let gaps = self.config.cross_spacing * (span_count - 1) as f64;
        let cells = Cells {
            orientation,
            cross_origin: orientation.cross_leading(padding),
            cell_extent: ((cross_available - gaps) / span_count as f64).max(0.0),
            cross_spacing: self.config.cross_spacing,
        };

        let count = adapter.item_count();
        self.items.clear();
        self.items.reserve(count);
        self.spans.clear();

        let mut cursor = orientation.leading(padding);
        let mut members = SmallVec::<[usize; 8]>::new();
        let mut used = 0;
        let mut extent: f64 = 0.0;
        for index in 0..count {
            let span_size = self.span_lookup.span_size(index).min(span_count);
            if span_size == 0 {
                self.items.push(GridItem::HIDDEN);
                continue;
            }
            if used + span_size > span_count {
                self.close_span(&mut members, extent, &mut cursor, &cells);
                used = 0;
                extent = 0.0;
            }
            let available = orientation.size(f64::INFINITY, cells.region(span_size));
            let size = measure_item(adapter, index, available);
            self.items.push(GridItem {
                span: Some(self.spans.len()),
                cell: used,
                span_size,
                position: Point::ZERO,
                size,
            });
            members.push(index);
            used += span_size;
            extent = extent.max(orientation.main(size).max(0.0));
            if used >= span_count {
                self.close_span(&mut members, extent, &mut cursor, &cells);
                used = 0;
                extent = 0.0;
            }
        }
        if !members.is_empty() {
            self.close_span(&mut members, extent, &mut cursor, &cells);
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
        let item_count = adapter.item_count();
        let previous = self.cache.take();
        let next = next_layout_cache(
            &self.spans,
            window,
            previous.as_ref(),
            self.state.scroll_delta(),
        );

        match &previous {
            Some(previous) => {
                for range in evicted(previous.range(), next.range()) {
                    for span in self.spans.get(range).into_iter().flatten() {
                        for &index in &span.items {
                            hide_and_recycle(recycler, index);
                        }
                    }
                }
            }
            None => {
                for (index, handle) in recycler.visible_view_holders() {
                    if !self.item_in(index, &next) {
                        recycler.hide_view_holder(handle);
                        recycler.recycle_view_holder(handle);
                    }
                }
            }
        }

        for span in self.spans.get(next.range()).into_iter().flatten() {
            for &index in &span.items {
                if index >= item_count {
                    continue;
                }
                if let Some(rect) = self.item_rect(index) {
                    show_and_place(recycler, index, adapter.item_view_type(index), rect);
                }
            }
        }

        log::trace!("grid layout at {}: {next:?}", window.position);
        self.cache = Some(next);
    }

    fn on_detach(&mut self) {
        self.scroller = None;
        self.items.clear();
        self.spans.clear();
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
            .is_some_and(|cache| self.item_in(index, cache))
    }

    fn snap_position(&self, position: f64) -> Option<f64> {
        let target = nearest_start(&self.spans, position)?;
        Some(self.scroller.as_ref().map_or(target, |s| s.clamp(target)))
    }
}
