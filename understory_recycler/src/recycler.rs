// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view-side collaborator: a pool of view holders bound to item indices.

use alloc::vec::Vec;

use kurbo::Rect;

/// A pool of view holders that layout managers drive by item index.
///
/// Layout managers never own views. They ask the recycler for the holder bound
/// to an index and issue show / hide / recycle / place intents against the
/// returned handle. Handles for positions that no longer exist are reported as
/// `None` and skipped by the caller.
pub trait Recycler {
    /// Opaque reference to one view holder.
    type Handle: Copy + Eq;

    /// Returns every visible view holder together with the index it is bound to.
    fn visible_view_holders(&self) -> Vec<(usize, Self::Handle)>;

    /// Returns the holder bound to `index`, binding a recycled or new holder of
    /// `view_type` when none is bound yet.
    ///
    /// A holder bound to `index` with a different view type must not be
    /// returned; the recycler releases it and binds a matching one instead.
    /// Layout managers then hide and recycle the previous handle, so both calls
    /// must be no-ops for a holder that is already released.
    fn view_holder_for_position(&mut self, index: usize, view_type: usize)
    -> Option<Self::Handle>;

    /// Returns the holder bound to `index` only if it is currently visible.
    fn visible_view_holder_for_position(&self, index: usize) -> Option<Self::Handle>;

    /// Makes the holder visible.
    fn show_view_holder(&mut self, handle: Self::Handle);

    /// Hides the holder without releasing its binding.
    fn hide_view_holder(&mut self, handle: Self::Handle);

    /// Unbinds the holder and returns it to the pool for reuse.
    fn recycle_view_holder(&mut self, handle: Self::Handle);

    /// Positions the holder; `rect` is expressed in viewport-local coordinates
    /// with the origin at the viewport's top-left corner.
    fn place_view_holder(&mut self, handle: Self::Handle, rect: Rect);
}

/// Hides and recycles the visible holder bound to `index`, if any.
pub(crate) fn hide_and_recycle<R: Recycler + ?Sized>(recycler: &mut R, index: usize) {
    if let Some(handle) = recycler.visible_view_holder_for_position(index) {
        recycler.hide_view_holder(handle);
        recycler.recycle_view_holder(handle);
    }
}

/// Shows (if needed) and places the holder for `index`.
///
/// A visible holder whose view type no longer matches is swapped for one that
/// does.
pub(crate) fn show_and_place<R: Recycler + ?Sized>(
    recycler: &mut R,
    index: usize,
    view_type: usize,
    rect: Rect,
) {
    let visible = recycler.visible_view_holder_for_position(index);
    let Some(handle) = recycler.view_holder_for_position(index, view_type) else {
        if let Some(stale) = visible {
            recycler.hide_view_holder(stale);
            recycler.recycle_view_holder(stale);
        }
        return;
    };
    match visible {
        Some(current) if current == handle => {}
        Some(stale) => {
            recycler.hide_view_holder(stale);
            recycler.recycle_view_holder(stale);
            recycler.show_view_holder(handle);
        }
        None => recycler.show_view_holder(handle),
    }
    recycler.place_view_holder(handle, rect);
}
