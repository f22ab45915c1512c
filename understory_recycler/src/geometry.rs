// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis helpers and the scroll-window visibility predicate.

use kurbo::{Insets, Point, Rect, Size};

/// Tolerance used when comparing extents and positions.
pub(crate) const EPSILON: f64 = 1e-6;

/// Returns `true` if `a` and `b` are within [`EPSILON`] of each other.
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// The axis a list scrolls along.
///
/// The scroll axis is the one that grows with content; the cross axis is
/// fixed to the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items flow left to right and the list scrolls horizontally.
    Horizontal,
    /// Items flow top to bottom and the list scrolls vertically.
    #[default]
    Vertical,
}

impl Orientation {
    /// Extent of `size` along the scroll axis.
    #[must_use]
    pub fn main(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` along the cross axis.
    #[must_use]
    pub fn cross(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Builds a size from scroll-axis and cross-axis extents.
    #[must_use]
    pub fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Builds a point from scroll-axis and cross-axis coordinates.
    #[must_use]
    pub fn point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    /// Scroll-axis coordinate of `point`.
    #[must_use]
    pub fn main_coord(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// Cross-axis coordinate of `point`.
    #[must_use]
    pub fn cross_coord(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.y,
            Self::Vertical => point.x,
        }
    }

    /// Padding before the first item along the scroll axis.
    #[must_use]
    pub fn leading(self, padding: Insets) -> f64 {
        match self {
            Self::Horizontal => padding.x0,
            Self::Vertical => padding.y0,
        }
    }

    /// Padding after the last item along the scroll axis.
    #[must_use]
    pub fn trailing(self, padding: Insets) -> f64 {
        match self {
            Self::Horizontal => padding.x1,
            Self::Vertical => padding.y1,
        }
    }

    /// Padding at the start of the cross axis.
    #[must_use]
    pub fn cross_leading(self, padding: Insets) -> f64 {
        match self {
            Self::Horizontal => padding.y0,
            Self::Vertical => padding.x0,
        }
    }

    /// Padding at the end of the cross axis.
    #[must_use]
    pub fn cross_trailing(self, padding: Insets) -> f64 {
        match self {
            Self::Horizontal => padding.y1,
            Self::Vertical => padding.x1,
        }
    }

    /// Builds a viewport-local rectangle from a scroll-axis center, a cross-axis
    /// center and a size.
    #[must_use]
    pub fn centered_rect(self, main_center: f64, cross_center: f64, size: Size) -> Rect {
        Rect::from_center_size(self.point(main_center, cross_center), size)
    }
}

/// Anything with a `[start, end]` extent along the scroll axis.
pub trait Extent {
    /// Scroll-axis coordinate where the extent begins.
    fn start(&self) -> f64;
    /// Scroll-axis coordinate where the extent ends.
    fn end(&self) -> f64;
}

/// Where an extent sits relative to a [`ScrollWindow`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    Before,
    Visible,
    After,
}

/// The visible window along the scroll axis: `[position, position + extent)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollWindow {
    /// Current scroll offset.
    pub position: f64,
    /// Viewport extent along the scroll axis.
    pub extent: f64,
}

impl ScrollWindow {
    /// Creates a window at `position` spanning `extent` units.
    #[must_use]
    pub fn new(position: f64, extent: f64) -> Self {
        Self {
            position,
            extent: extent.max(0.0),
        }
    }

    /// Scroll-axis coordinate of the window's trailing edge.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.position + self.extent
    }

    /// Returns `true` if `[start, end]` is visible in the window.
    ///
    /// An extent is visible when its start falls in `[position, end)`, its end
    /// falls in `(position, end]`, or it covers the whole window. Extents that
    /// only touch a window edge from outside are not visible, so two adjacent
    /// items sharing a boundary are never both counted for that boundary.
    #[must_use]
    pub fn is_visible(&self, start: f64, end: f64) -> bool {
        let window_end = self.end();
        (start >= self.position && start < window_end)
            || (end > self.position && end <= window_end)
            || (start < self.position && end > window_end)
    }

    /// Returns `true` if `[start, end]` lies completely inside the window.
    #[must_use]
    pub fn contains(&self, start: f64, end: f64) -> bool {
        start >= self.position && end <= self.end()
    }

    pub(crate) fn classify<E: Extent + ?Sized>(&self, extent: &E) -> Placement {
        let (start, end) = (extent.start(), extent.end());
        if self.is_visible(start, end) {
            Placement::Visible
        } else if start < self.position {
            Placement::Before
        } else {
            Placement::After
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_items_share_boundary_once() {
        let window = ScrollWindow::new(100.0, 100.0);
        // Ends exactly at the window start: not visible.
        assert!(!window.is_visible(0.0, 100.0));
        // Starts exactly at the window start: visible.
        assert!(window.is_visible(100.0, 200.0));
        // Starts exactly at the window end: not visible.
        assert!(!window.is_visible(200.0, 300.0));
    }

    #[test]
    fn oversized_item_covering_window_is_visible() {
        let window = ScrollWindow::new(100.0, 50.0);
        assert!(window.is_visible(0.0, 500.0));
        assert!(!window.contains(0.0, 500.0));
    }

    #[test]
    fn classify_splits_before_visible_after() {
        struct E(f64, f64);
        impl Extent for E {
            fn start(&self) -> f64 {
                self.0
            }
            fn end(&self) -> f64 {
                self.1
            }
        }
        let window = ScrollWindow::new(10.0, 10.0);
        assert_eq!(window.classify(&E(0.0, 10.0)), Placement::Before);
        assert_eq!(window.classify(&E(5.0, 15.0)), Placement::Visible);
        assert_eq!(window.classify(&E(20.0, 30.0)), Placement::After);
    }

    #[test]
    fn orientation_swaps_axes() {
        let size = Size::new(30.0, 40.0);
        assert_eq!(Orientation::Vertical.main(size), 40.0);
        assert_eq!(Orientation::Horizontal.main(size), 30.0);
        assert_eq!(Orientation::Vertical.size(1.0, 2.0), Size::new(2.0, 1.0));
        let padding = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Orientation::Vertical.leading(padding), 2.0);
        assert_eq!(Orientation::Horizontal.trailing(padding), 3.0);
        assert_eq!(Orientation::Vertical.cross_trailing(padding), 3.0);
    }
}
