// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout cache: what the previous layout pass found visible.
//!
//! Each layout pass replaces the cache with a fresh [`LayoutCache`]. The next
//! pass starts from it, so the visible range is maintained incrementally: cost
//! is proportional to the number of extents entering or leaving the viewport
//! rather than to the number of items.
//!
//! Visible extents always form one contiguous run. Every extent is either
//! before the window, visible, or after it, and because extents are ordered
//! those three groups appear in that order. The visible run is therefore
//! `first_not_before..first_after`, and both bounds can be slid from their
//! previous values.

use core::ops::{Range, RangeInclusive};

use crate::geometry::{Extent, Placement, ScrollWindow};

/// Which side of the viewport the whole list collapsed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutOfScreen {
    /// The viewport sits before the first item; every item lies after it.
    Top,
    /// The viewport sits past the last item; every item lies before it.
    Bottom,
}

/// Visibility state recorded by a layout pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutCache {
    /// There are no items.
    Empty,
    /// No item is visible and all of them lie on one side of the viewport.
    OutOfScreen(OutOfScreen),
    /// The half-open range of visible indices (items or spans).
    ///
    /// The range is empty when the viewport falls entirely inside the spacing
    /// between two neighbours; its start then names the first item after the
    /// viewport.
    InScreen(Range<usize>),
}

impl LayoutCache {
    /// The visible half-open range; empty for [`LayoutCache::Empty`] and
    /// [`LayoutCache::OutOfScreen`].
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        match self {
            Self::InScreen(range) => range.clone(),
            Self::Empty | Self::OutOfScreen(_) => 0..0,
        }
    }

    /// The visible range with inclusive bounds, if anything is visible.
    #[must_use]
    pub fn visible_range(&self) -> Option<RangeInclusive<usize>> {
        match self {
            Self::InScreen(range) if !range.is_empty() => Some(range.start..=range.end - 1),
            _ => None,
        }
    }

    /// Returns `true` if `index` is in the visible range.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}

/// Computes the cache for `window` given the previous pass' cache.
///
/// `extents` must be ordered and non-overlapping. `scroll_delta` picks which
/// edge of a previous in-screen range is advanced first; the result does not
/// depend on it.
pub(crate) fn next_layout_cache<E: Extent>(
    extents: &[E],
    window: ScrollWindow,
    previous: Option<&LayoutCache>,
    scroll_delta: f64,
) -> LayoutCache {
    let count = extents.len();
    if count == 0 {
        return LayoutCache::Empty;
    }

    // Only the two ends are inspected; during a fling the list can leave the
    // screen entirely without any per-item work.
    if window.classify(&extents[0]) == Placement::After {
        return LayoutCache::OutOfScreen(OutOfScreen::Top);
    }
    if window.classify(&extents[count - 1]) == Placement::Before {
        return LayoutCache::OutOfScreen(OutOfScreen::Bottom);
    }

    let range = match previous {
        None | Some(LayoutCache::Empty | LayoutCache::OutOfScreen(OutOfScreen::Top)) => {
            scan_forward(extents, window)
        }
        Some(LayoutCache::OutOfScreen(OutOfScreen::Bottom)) => scan_backward(extents, window),
        Some(LayoutCache::InScreen(range)) => {
            let start = range.start.min(count);
            let end = range.end.clamp(start, count);
            if scroll_delta >= 0.0 {
                let end = slide_end(extents, window, end);
                let start = slide_start(extents, window, start);
                start..end.max(start)
            } else {
                let start = slide_start(extents, window, start);
                let end = slide_end(extents, window, end);
                start..end.max(start)
            }
        }
    };
    LayoutCache::InScreen(range)
}

/// Finds the visible run by walking from the first extent.
fn scan_forward<E: Extent>(extents: &[E], window: ScrollWindow) -> Range<usize> {
    let mut start = 0;
    while start < extents.len() && window.classify(&extents[start]) == Placement::Before {
        start += 1;
    }
    let mut end = start;
    while end < extents.len() && window.classify(&extents[end]) == Placement::Visible {
        end += 1;
    }
    start..end
}

/// Finds the visible run by walking back from the last extent.
fn scan_backward<E: Extent>(extents: &[E], window: ScrollWindow) -> Range<usize> {
    let mut end = extents.len();
    while end > 0 && window.classify(&extents[end - 1]) == Placement::After {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && window.classify(&extents[start - 1]) == Placement::Visible {
        start -= 1;
    }
    start..end
}

/// Moves `start` to the first extent that is not before the window.
fn slide_start<E: Extent>(extents: &[E], window: ScrollWindow, mut start: usize) -> usize {
    while start < extents.len() && window.classify(&extents[start]) == Placement::Before {
        start += 1;
    }
    while start > 0 && window.classify(&extents[start - 1]) != Placement::Before {
        start -= 1;
    }
    start
}

/// Moves `end` to the first extent that is after the window.
fn slide_end<E: Extent>(extents: &[E], window: ScrollWindow, mut end: usize) -> usize {
    while end < extents.len() && window.classify(&extents[end]) != Placement::After {
        end += 1;
    }
    while end > 0 && window.classify(&extents[end - 1]) == Placement::After {
        end -= 1;
    }
    end
}

/// The parts of `old` that are not covered by `new`, as at most two ranges.
pub(crate) fn evicted(old: Range<usize>, new: Range<usize>) -> [Range<usize>; 2] {
    if new.is_empty() {
        return [old, 0..0];
    }
    let before = old.start..old.end.min(new.start);
    let after = old.start.max(new.end)..old.end;
    [before, after]
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[derive(Clone, Copy, Debug)]
    struct Span(f64, f64);

    impl Extent for Span {
        fn start(&self) -> f64 {
            self.0
        }
        fn end(&self) -> f64 {
            self.1
        }
    }

    fn uniform(count: usize, size: f64, spacing: f64) -> Vec<Span> {
        (0..count)
            .map(|i| {
                let start = i as f64 * (size + spacing);
                Span(start, start + size)
            })
            .collect()
    }

    fn brute_force(extents: &[Span], window: ScrollWindow) -> Vec<usize> {
        (0..extents.len())
            .filter(|&i| window.is_visible(extents[i].0, extents[i].1))
            .collect()
    }

    #[test]
    fn initial_scan_includes_partially_visible_item() {
        let extents = uniform(10, 100.0, 0.0);
        let cache = next_layout_cache(&extents, ScrollWindow::new(0.0, 350.0), None, 0.0);
        assert_eq!(cache, LayoutCache::InScreen(0..4));
        assert_eq!(cache.visible_range(), Some(0..=3));
    }

    #[test]
    fn empty_extents_give_empty_cache() {
        let cache = next_layout_cache::<Span>(&[], ScrollWindow::new(0.0, 100.0), None, 0.0);
        assert_eq!(cache, LayoutCache::Empty);
        assert_eq!(cache.visible_range(), None);
    }

    #[test]
    fn large_jump_collapses_to_bottom_and_recovers() {
        let extents = uniform(3, 100.0, 0.0);
        let first = next_layout_cache(&extents, ScrollWindow::new(0.0, 350.0), None, 0.0);
        assert_eq!(first, LayoutCache::InScreen(0..3));

        let far = ScrollWindow::new(1000.0, 350.0);
        let gone = next_layout_cache(&extents, far, Some(&first), 1000.0);
        assert_eq!(gone, LayoutCache::OutOfScreen(OutOfScreen::Bottom));

        let near = ScrollWindow::new(50.0, 350.0);
        let back = next_layout_cache(&extents, near, Some(&gone), -950.0);
        assert_eq!(back, LayoutCache::InScreen(0..3));
    }

    #[test]
    fn viewport_before_content_is_top() {
        let extents = uniform(3, 100.0, 0.0);
        let cache = next_layout_cache(&extents, ScrollWindow::new(-500.0, 100.0), None, 0.0);
        assert_eq!(cache, LayoutCache::OutOfScreen(OutOfScreen::Top));
        let inside = ScrollWindow::new(150.0, 100.0);
        let back = next_layout_cache(&extents, inside, Some(&cache), 650.0);
        assert_eq!(back, LayoutCache::InScreen(1..3));
    }

    #[test]
    fn viewport_inside_gap_is_empty_in_screen() {
        let extents = uniform(3, 10.0, 100.0);
        let cache = next_layout_cache(&extents, ScrollWindow::new(20.0, 50.0), None, 0.0);
        assert_eq!(cache, LayoutCache::InScreen(1..1));
        assert_eq!(cache.visible_range(), None);

        let later = ScrollWindow::new(80.0, 50.0);
        let next = next_layout_cache(&extents, later, Some(&cache), 60.0);
        assert_eq!(next, LayoutCache::InScreen(1..2));
    }

    #[test]
    fn incremental_matches_brute_force_in_both_directions() {
        let extents = uniform(200, 37.0, 3.0);
        let mut cache: Option<LayoutCache> = None;
        let mut position = 0.0;
        let steps = [13.0, 250.0, 0.5, 900.0, -40.0, -1200.0, 3000.0, -7.0, 5000.0, -9000.0];
        for step in steps {
            position += step;
            let window = ScrollWindow::new(position, 333.0);
            let next = next_layout_cache(&extents, window, cache.as_ref(), step);
            let visible: Vec<usize> = next.range().collect();
            assert_eq!(visible, brute_force(&extents, window), "position {position}");
            cache = Some(next);
        }
    }

    #[test]
    fn evicted_is_old_minus_new() {
        let [head, tail] = evicted(0..5, 3..8);
        assert_eq!(head, 0..3);
        assert!(tail.is_empty());
        let [head, tail] = evicted(2..6, 0..10);
        assert!(head.is_empty());
        assert!(tail.is_empty());
        assert_eq!(evicted(2..6, 3..4), [2..3, 4..6]);
        assert_eq!(evicted(2..6, 4..4), [2..6, 0..0]);
    }
}
