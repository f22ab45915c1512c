// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `CircleLayoutManager`: ring geometry, rotation and lifecycle.

use kurbo::{Point, Size};
use understory_recycler::{
    Adapter, CircleLayoutConfig, CircleLayoutManager, LayoutManager, RotationDirection,
    ScrollerConfig, ViewHolderPool,
};

struct Dots(usize);

impl Adapter for Dots {
    type Template = ();

    fn item_count(&self) -> usize {
        self.0
    }

    fn view_holder_template(&self, _view_type: usize) -> Option<&()> {
        Some(&())
    }

    fn measure_view_holder(&self, _: &(), _index: usize, _available: Size) -> Size {
        Size::new(16.0, 16.0)
    }
}

fn ring(config: CircleLayoutConfig, dots: &Dots) -> CircleLayoutManager {
    let mut ring = CircleLayoutManager::new(config);
    ring.attach(Size::new(300.0, 200.0));
    ring.measure(Some(dots));
    ring
}

fn distance(a: Point, b: Point) -> f64 {
    (a - b).hypot()
}

#[test]
fn neighbours_are_one_interval_apart() {
    let dots = Dots(7);
    for direction in [RotationDirection::Clockwise, RotationDirection::CounterClockwise] {
        let ring = ring(
            CircleLayoutConfig {
                direction,
                initial_angle: 30.0,
                ..CircleLayoutConfig::default()
            },
            &dots,
        );
        let interval = ring.interval_angle();
        assert!((interval - 360.0 / 7.0).abs() < 1e-9);
        let sign = match direction {
            RotationDirection::Clockwise => -1.0,
            RotationDirection::CounterClockwise => 1.0,
        };
        assert_eq!(ring.angles()[0], 30.0);
        for pair in ring.angles().windows(2) {
            assert!((pair[1] - pair[0] - sign * interval).abs() < 1e-9);
        }
    }
}

#[test]
fn every_item_stays_on_the_ring_while_rotating() {
    let dots = Dots(5);
    let mut ring = ring(CircleLayoutConfig::default(), &dots);
    let mut pool = ViewHolderPool::new();
    // Half the shorter side is 100, minus half an item.
    assert_eq!(ring.radius(), 92.0);

    for step in 0_u32..24 {
        ring.scroll_to_position(f64::from(step) * 37.5);
        ring.layout(Some(&dots), &mut pool);
        assert_eq!(pool.visible_indices(), [0, 1, 2, 3, 4]);
        for index in 0..5 {
            let center = pool.placement(index).unwrap().center();
            assert!((distance(center, ring.center()) - 92.0).abs() < 1e-9);
        }
    }
    // Every item stayed bound to the holder it started with.
    assert_eq!(pool.created_count(), 5);
    assert_eq!(pool.reuse_count(), 0);
}

#[test]
fn scroll_is_unbounded() {
    let dots = Dots(4);
    let mut ring = ring(
        CircleLayoutConfig {
            scroller: ScrollerConfig {
                bounded: true,
                ..ScrollerConfig::default()
            },
            ..CircleLayoutConfig::default()
        },
        &dots,
    );
    ring.scroll_to_position(-1_000.0);
    assert_eq!(ring.state().scroll_position(), -1_000.0);
    ring.wheel(5_000.0);
    assert_eq!(ring.state().scroll_position(), 4_000.0);
}

#[test]
fn smooth_focus_brings_item_to_the_pivot() {
    let dots = Dots(6);
    let mut ring = ring(
        CircleLayoutConfig {
            initial_angle: 90.0,
            ..CircleLayoutConfig::default()
        },
        &dots,
    );
    let mut pool = ViewHolderPool::new();
    ring.layout(Some(&dots), &mut pool);

    // Item 2 sits at 90 - 120 = -30°; the pivot is 90°.
    assert_eq!(ring.focus_target(2), Some(120.0));
    ring.focus_item(2, true);
    while ring.update(1.0 / 60.0) {
        ring.layout(Some(&dots), &mut pool);
    }
    assert_eq!(ring.state().scroll_position(), 120.0);

    // The pivot is straight up from the center.
    let center = pool.placement(2).unwrap().center();
    assert!((center.x - ring.center().x).abs() < 1e-9);
    assert!(center.y < ring.center().y);
}

#[test]
fn snap_after_drag_lands_on_an_interval() {
    let dots = Dots(8);
    let mut ring = ring(
        CircleLayoutConfig {
            scroller: ScrollerConfig {
                snap: true,
                ..ScrollerConfig::default()
            },
            ..CircleLayoutConfig::default()
        },
        &dots,
    );
    let mut pool = ViewHolderPool::new();
    ring.drag(100.0);
    ring.end_drag();
    while ring.update(1.0 / 60.0) {
        ring.layout(Some(&dots), &mut pool);
    }
    assert_eq!(ring.state().scroll_position(), 90.0);
}

#[test]
fn layout_with_fewer_items_recycles_the_rest() {
    let six = Dots(6);
    let three = Dots(3);
    let mut ring = ring(CircleLayoutConfig::default(), &six);
    let mut pool = ViewHolderPool::new();
    ring.layout(Some(&six), &mut pool);
    assert_eq!(pool.visible_indices(), [0, 1, 2, 3, 4, 5]);

    // No re-measure: the ring still has six angles.
    ring.layout(Some(&three), &mut pool);
    assert_eq!(ring.angles().len(), 6);
    assert_eq!(pool.visible_indices(), [0, 1, 2]);
    for stale in 3..6 {
        assert!(pool.bound_holder(stale).is_none());
    }
    assert_eq!(pool.free_count(0), 3);
}

#[test]
fn detach_drops_geometry() {
    let dots = Dots(3);
    let mut ring = ring(CircleLayoutConfig::default(), &dots);
    assert!(ring.is_view_holder_visible(2));
    ring.detach();
    assert!(!ring.is_view_holder_visible(0));
    assert!(ring.angles().is_empty());
    assert!(!ring.needs_layout());
}
