// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Items arranged around a circle.
//!
//! Every item stays shown; scrolling rotates the ring. The scroll position is
//! a rotation in degrees and is never clamped. Angles follow the usual
//! mathematical convention (counter-clockwise is positive, `0°` points right);
//! placements are converted to the viewport's y-down coordinates.
//!
//! ```rust
//! use kurbo::Size;
//! use understory_recycler::{Adapter, CircleLayoutConfig, CircleLayoutManager, LayoutManager};
//!
//! struct Dots;
//!
//! impl Adapter for Dots {
//!     type Template = ();
//!     fn item_count(&self) -> usize {
//!         4
//!     }
//!     fn view_holder_template(&self, _view_type: usize) -> Option<&()> {
//!         Some(&())
//!     }
//!     fn measure_view_holder(&self, _: &(), _index: usize, _available: Size) -> Size {
//!         Size::new(20.0, 20.0)
//!     }
//! }
//!
//! let mut ring = CircleLayoutManager::new(CircleLayoutConfig::default());
//! ring.attach(Size::new(200.0, 200.0));
//! ring.measure(Some(&Dots));
//! assert_eq!(ring.angles(), [0.0, -90.0, -180.0, -270.0]);
//! assert_eq!(ring.radius(), 90.0);
//! ```

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

use crate::adapter::{Adapter, measure_item};
use crate::geometry::approx_eq;
use crate::manager::{LayoutManager, LayoutState, apply_scroll};
use crate::recycler::{Recycler, show_and_place};
use crate::scroller::{Scroller, ScrollerConfig};

/// Direction in which successive items are laid out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    /// Each item sits one interval clockwise from the previous one.
    #[default]
    Clockwise,
    /// Each item sits one interval counter-clockwise from the previous one.
    CounterClockwise,
}

impl RotationDirection {
    fn sign(self) -> f64 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }
}

/// Settings for a [`CircleLayoutManager`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleLayoutConfig {
    /// Direction successive items follow.
    pub direction: RotationDirection,
    /// Angle of the first item at rest, in degrees. Also the focus pivot.
    pub initial_angle: f64,
    /// Angle between neighbours; `360 / item_count` when `None`.
    pub interval_angle: Option<f64>,
    /// Ring radius; the largest radius keeping every item inside the viewport
    /// when `None`.
    pub radius: Option<f64>,
    /// Scroller tuning. The scroller is always unbounded.
    pub scroller: ScrollerConfig,
}

impl Default for CircleLayoutConfig {
    fn default() -> Self {
        Self {
            direction: RotationDirection::Clockwise,
            initial_angle: 0.0,
            interval_angle: None,
            radius: None,
            scroller: ScrollerConfig::default(),
        }
    }
}

/// Places every item on a ring at fixed angular intervals.
#[derive(Debug)]
pub struct CircleLayoutManager {
    state: LayoutState,
    config: CircleLayoutConfig,
    scroller: Option<Scroller>,
    sizes: Vec<Size>,
    angles: Vec<f64>,
    interval: f64,
    radius: f64,
}

impl CircleLayoutManager {
    /// Creates a detached manager.
    #[must_use]
    pub fn new(config: CircleLayoutConfig) -> Self {
        Self {
            state: LayoutState::new(),
            config,
            scroller: None,
            sizes: Vec::new(),
            angles: Vec::new(),
            interval: 0.0,
            radius: 0.0,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CircleLayoutConfig {
        &self.config
    }

    /// Replaces the configuration. Measure again before the next layout.
    pub fn set_config(&mut self, config: CircleLayoutConfig) {
        self.config = config;
        if let Some(scroller) = &self.scroller {
            let position = scroller.position();
            let mut fresh = Scroller::new(self.scroller_config());
            let moved = fresh.scroll_to_position(position);
            self.scroller = Some(fresh);
            apply_scroll(self, moved);
        }
        self.state.request_layout();
    }

    /// Current angle of every item, in degrees.
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Angle between neighbouring items from the last measure pass.
    #[must_use]
    pub fn interval_angle(&self) -> f64 {
        self.interval
    }

    /// Ring radius from the last measure pass.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Center of the ring in viewport-local coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        let viewport = self.state.viewport_size();
        Point::new(viewport.width * 0.5, viewport.height * 0.5)
    }

    /// Viewport-local rectangle for the item at `index`.
    #[must_use]
    pub fn item_rect(&self, index: usize) -> Option<Rect> {
        let angle = *self.angles.get(index)?;
        let size = *self.sizes.get(index)?;
        let direction = Vec2::from_angle(angle.to_radians());
        let offset = Vec2::new(direction.x, -direction.y) * self.radius;
        Some(Rect::from_center_size(self.center() + offset, size))
    }

    /// Scroll position [`LayoutManager::focus_item`] would rotate to; `None`
    /// when the item already sits on the pivot.
    #[must_use]
    pub fn focus_target(&self, index: usize) -> Option<f64> {
        if index >= self.sizes.len() {
            return None;
        }
        let angle = self.angle_at(index, self.state.scroll_position());
        let delta = wrap_degrees(self.config.initial_angle - angle);
        if approx_eq(delta, 0.0) {
            return None;
        }
        Some(self.state.scroll_position() + delta)
    }

    /// Rotates the ring by the angle swept from `from` to `to` around its
    /// center, scaled by the scroller's drag speed.
    pub fn drag_around_center(&mut self, from: Point, to: Point) {
        let center = self.center();
        let (a, b) = (from - center, to - center);
        if approx_eq(a.hypot2(), 0.0) || approx_eq(b.hypot2(), 0.0) {
            return;
        }
        // Flip y so the swept angle uses the counter-clockwise-positive convention.
        let swept = (-b.y).atan2(b.x) - (-a.y).atan2(a.x);
        self.drag(wrap_degrees(swept.to_degrees()));
    }

    fn scroller_config(&self) -> ScrollerConfig {
        ScrollerConfig {
            bounded: false,
            ..self.config.scroller
        }
    }

    fn angle_at(&self, index: usize, scroll: f64) -> f64 {
        self.config.initial_angle
            + scroll
            + self.config.direction.sign() * self.interval * index as f64
    }

    fn refresh_angles(&mut self) {
        let scroll = self.state.scroll_position();
        let angles: Vec<f64> = (0..self.sizes.len())
            .map(|index| self.angle_at(index, scroll))
            .collect();
        self.angles = angles;
    }
}

/// Maps an angle in degrees to `[-180, 180)`.
fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = (angle + 180.0) % 360.0;
    if wrapped < 0.0 {
        wrapped + 180.0
    } else {
        wrapped - 180.0
    }
}

impl LayoutManager for CircleLayoutManager {
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
        self.scroller = Some(Scroller::new(self.scroller_config()));
        self.sizes.clear();
        self.angles.clear();
    }

    fn on_measure<A: Adapter>(&mut self, adapter: &A) {
        let viewport = self.state.viewport_size();
        let count = adapter.item_count();

        self.sizes.clear();
        self.sizes
            .extend((0..count).map(|index| measure_item(adapter, index, viewport)));

        self.interval = match self.config.interval_angle {
            Some(interval) => interval,
            None if count > 0 => 360.0 / count as f64,
            None => 0.0,
        };

        let content_radius = viewport.width.min(viewport.height) * 0.5;
        self.radius = match self.config.radius {
            Some(radius) => radius,
            None => self
                .sizes
                .iter()
                .map(|size| {
                    (content_radius - size.width * 0.5).min(content_radius - size.height * 0.5)
                })
                .fold(content_radius, f64::min)
                .max(0.0),
        };

        self.refresh_angles();
    }

    fn on_layout_children<A: Adapter, R: Recycler>(&mut self, adapter: &A, recycler: &mut R) {
        self.refresh_angles();
        let count = self.sizes.len().min(adapter.item_count());
        for index in 0..count {
            if let Some(rect) = self.item_rect(index) {
                show_and_place(recycler, index, adapter.item_view_type(index), rect);
            }
        }
        log::trace!(
            "circle layout at {}°: {count} items",
            self.state.scroll_position()
        );
    }

    fn on_detach(&mut self) {
        self.scroller = None;
        self.sizes.clear();
        self.angles.clear();
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
        index < self.sizes.len()
    }

    fn snap_position(&self, position: f64) -> Option<f64> {
        if approx_eq(self.interval, 0.0) {
            return None;
        }
        Some((position / self.interval).round() * self.interval)
    }
}
