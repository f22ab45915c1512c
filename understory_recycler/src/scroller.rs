// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar scroll position driven by drag, wheel and programmatic scrolling.
//!
//! A [`Scroller`] owns nothing but a position, its bounds and an optional
//! smooth-scroll animation advanced by [`Scroller::update`]. Every operation
//! that moves the position returns the new position as `Some(position)`;
//! `None` means nothing changed. Layout managers apply the returned position
//! to their scroll state and request a new layout pass.
//!
//! ```rust
//! use understory_recycler::{Scroller, ScrollerConfig};
//!
//! let mut scroller = Scroller::new(ScrollerConfig {
//!     max_position: 500.0,
//!     ..ScrollerConfig::default()
//! });
//! assert_eq!(scroller.scroll_to_position(900.0), Some(500.0));
//!
//! scroller.smooth_scroll_to_position(0.0, 1000.0);
//! assert_eq!(scroller.update(0.25), Some(250.0));
//! assert_eq!(scroller.update(1.0), Some(0.0));
//! assert!(!scroller.is_smooth_scrolling());
//! ```

use crate::geometry::approx_eq;

/// Construction-time scroller settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollerConfig {
    /// Smallest reachable position when `bounded`.
    pub min_position: f64,
    /// Largest reachable position when `bounded`.
    pub max_position: f64,
    /// Whether a finished drag snaps to the nearest item.
    pub snap: bool,
    /// Multiplier applied to drag deltas.
    pub drag_speed: f64,
    /// Multiplier applied to wheel deltas.
    pub wheel_speed: f64,
    /// Default smooth-scroll speed in units per second.
    pub smooth_scroll_speed: f64,
    /// Whether positions are clamped to `[min_position, max_position]`.
    pub bounded: bool,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            min_position: 0.0,
            max_position: 0.0,
            snap: false,
            drag_speed: 1.0,
            wheel_speed: 1.0,
            smooth_scroll_speed: 2000.0,
            bounded: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct SmoothScroll {
    from: f64,
    to: f64,
    duration: f64,
    elapsed: f64,
}

/// Converts input and programmatic requests into a scroll position.
#[derive(Clone, Debug)]
pub struct Scroller {
    config: ScrollerConfig,
    position: f64,
    smooth: Option<SmoothScroll>,
}

impl Scroller {
    /// Creates a scroller resting at the clamped origin.
    #[must_use]
    pub fn new(config: ScrollerConfig) -> Self {
        let mut scroller = Self {
            config: normalize(config),
            position: 0.0,
            smooth: None,
        };
        scroller.position = scroller.clamp(0.0);
        scroller
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Smallest reachable position.
    #[must_use]
    pub fn min_position(&self) -> f64 {
        self.config.min_position
    }

    /// Largest reachable position.
    #[must_use]
    pub fn max_position(&self) -> f64 {
        self.config.max_position
    }

    /// Returns `true` while a smooth scroll is in flight.
    #[must_use]
    pub fn is_smooth_scrolling(&self) -> bool {
        self.smooth.is_some()
    }

    /// Updates the reachable range, re-clamping the current position.
    pub fn set_bounds(&mut self, min_position: f64, max_position: f64) -> Option<f64> {
        self.config.min_position = min_position;
        self.config.max_position = max_position;
        self.config = normalize(self.config);
        if let Some(smooth) = &mut self.smooth {
            let to = clamp_to(&self.config, smooth.to);
            smooth.to = to;
        }
        self.move_to(self.position)
    }

    /// Clamps `position` into the reachable range.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        clamp_to(&self.config, position)
    }

    /// Jumps to `position`, cancelling any smooth scroll.
    pub fn scroll_to_position(&mut self, position: f64) -> Option<f64> {
        self.smooth = None;
        self.move_to(position)
    }

    /// Moves by `delta` units, cancelling any smooth scroll.
    pub fn scroll_by(&mut self, delta: f64) -> Option<f64> {
        self.scroll_to_position(self.position + delta)
    }

    /// Applies a drag delta scaled by `drag_speed`.
    pub fn drag(&mut self, delta: f64) -> Option<f64> {
        self.scroll_by(delta * self.config.drag_speed)
    }

    /// Applies a wheel delta scaled by `wheel_speed`.
    pub fn wheel(&mut self, delta: f64) -> Option<f64> {
        self.scroll_by(delta * self.config.wheel_speed)
    }

    /// Starts animating toward `position` at `speed` units per second.
    ///
    /// A zero distance or a non-positive speed completes immediately, and the
    /// position change is returned right away.
    pub fn smooth_scroll_to_position(&mut self, position: f64, speed: f64) -> Option<f64> {
        let to = self.clamp(position);
        let distance = (to - self.position).abs();
        if approx_eq(distance, 0.0) || speed <= 0.0 || approx_eq(speed, 0.0) {
            return self.scroll_to_position(to);
        }
        self.smooth = Some(SmoothScroll {
            from: self.position,
            to,
            duration: distance / speed,
            elapsed: 0.0,
        });
        None
    }

    /// Starts a smooth scroll at the configured default speed.
    pub fn smooth_scroll_to(&mut self, position: f64) -> Option<f64> {
        self.smooth_scroll_to_position(position, self.config.smooth_scroll_speed)
    }

    /// Cancels a smooth scroll in flight; the position stays where it is.
    pub fn stop_smooth_scroll(&mut self) {
        self.smooth = None;
    }

    /// Advances a smooth scroll by `dt` seconds.
    pub fn update(&mut self, dt: f64) -> Option<f64> {
        let mut smooth = self.smooth?;
        smooth.elapsed += dt.max(0.0);
        if smooth.elapsed >= smooth.duration {
            self.smooth = None;
            return self.move_to(smooth.to);
        }
        let t = smooth.elapsed / smooth.duration;
        self.smooth = Some(smooth);
        self.move_to(smooth.from + (smooth.to - smooth.from) * t)
    }

    /// Position mapped to `[0, 1]` across the reachable range.
    ///
    /// Returns `0` when the range is empty.
    #[must_use]
    pub fn normalized_position(&self) -> f64 {
        let span = self.config.max_position - self.config.min_position;
        if approx_eq(span, 0.0) {
            return 0.0;
        }
        ((self.position - self.config.min_position) / span).clamp(0.0, 1.0)
    }

    fn move_to(&mut self, position: f64) -> Option<f64> {
        let position = self.clamp(position);
        if approx_eq(position, self.position) {
            return None;
        }
        self.position = position;
        Some(position)
    }
}

/// Fraction of the content a viewport shows, for sizing scrollbar thumbs.
///
/// Returns `1` when the content is empty.
#[must_use]
pub fn viewport_ratio(viewport_extent: f64, content_extent: f64) -> f64 {
    if approx_eq(content_extent, 0.0) || content_extent < 0.0 {
        return 1.0;
    }
    (viewport_extent / content_extent).clamp(0.0, 1.0)
}

fn normalize(mut config: ScrollerConfig) -> ScrollerConfig {
    if config.max_position < config.min_position {
        config.max_position = config.min_position;
    }
    config
}

fn clamp_to(config: &ScrollerConfig, position: f64) -> f64 {
    if config.bounded {
        position.clamp(config.min_position, config.max_position)
    } else {
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(max: f64) -> Scroller {
        Scroller::new(ScrollerConfig {
            max_position: max,
            ..ScrollerConfig::default()
        })
    }

    #[test]
    fn positions_are_clamped_when_bounded() {
        let mut scroller = bounded(100.0);
        assert_eq!(scroller.scroll_to_position(-5.0), None);
        assert_eq!(scroller.scroll_to_position(150.0), Some(100.0));
        assert_eq!(scroller.scroll_by(-30.0), Some(70.0));
    }

    #[test]
    fn unbounded_scroller_never_clamps() {
        let mut scroller = Scroller::new(ScrollerConfig {
            bounded: false,
            ..ScrollerConfig::default()
        });
        assert_eq!(scroller.scroll_to_position(-720.0), Some(-720.0));
    }

    #[test]
    fn drag_and_wheel_apply_speed() {
        let mut scroller = Scroller::new(ScrollerConfig {
            max_position: 1000.0,
            drag_speed: 2.0,
            wheel_speed: 10.0,
            ..ScrollerConfig::default()
        });
        assert_eq!(scroller.drag(5.0), Some(10.0));
        assert_eq!(scroller.wheel(3.0), Some(40.0));
    }

    #[test]
    fn smooth_scroll_interpolates_and_stops() {
        let mut scroller = bounded(1000.0);
        assert_eq!(scroller.smooth_scroll_to_position(400.0, 200.0), None);
        assert!(scroller.is_smooth_scrolling());
        assert_eq!(scroller.update(1.0), Some(200.0));
        scroller.stop_smooth_scroll();
        assert_eq!(scroller.update(1.0), None);
        assert_eq!(scroller.position(), 200.0);
    }

    #[test]
    fn zero_speed_or_distance_jumps_immediately() {
        let mut scroller = bounded(1000.0);
        assert_eq!(scroller.smooth_scroll_to_position(300.0, 0.0), Some(300.0));
        assert!(!scroller.is_smooth_scrolling());
        assert_eq!(scroller.smooth_scroll_to_position(300.0, 100.0), None);
        assert!(!scroller.is_smooth_scrolling());
    }

    #[test]
    fn shrinking_bounds_pulls_position_back() {
        let mut scroller = bounded(500.0);
        scroller.scroll_to_position(400.0);
        assert_eq!(scroller.set_bounds(0.0, 100.0), Some(100.0));
        // Inverted bounds collapse to the minimum.
        assert_eq!(scroller.set_bounds(50.0, 10.0), Some(50.0));
        assert_eq!(scroller.max_position(), 50.0);
    }

    #[test]
    fn ratios_fall_back_on_empty_ranges() {
        let scroller = bounded(0.0);
        assert_eq!(scroller.normalized_position(), 0.0);
        assert_eq!(viewport_ratio(100.0, 0.0), 1.0);
        assert_eq!(viewport_ratio(100.0, 400.0), 0.25);
    }
}
