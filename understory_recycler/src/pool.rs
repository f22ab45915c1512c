// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless [`Recycler`] that tracks view holders by id.
//!
//! [`ViewHolderPool`] keeps per-view-type free lists and remembers, for every
//! holder, the index it is bound to, whether it is visible and where it was
//! last placed. Hosts map [`ViewHolderId`]s to their own view objects; tests use
//! the pool directly to check what a layout pass produced.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::Recycler;

/// Identifier of a holder inside a [`ViewHolderPool`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewHolderId(u32);

impl ViewHolderId {
    /// Returns the raw slot number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// State of one pooled view holder.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewHolder {
    view_type: usize,
    index: Option<usize>,
    visible: bool,
    rect: Rect,
}

impl ViewHolder {
    /// View type the holder was created for.
    #[must_use]
    pub fn view_type(&self) -> usize {
        self.view_type
    }

    /// Item index the holder is bound to, or `None` while it sits in the pool.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether the holder is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Last viewport-local placement.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// Pool of reusable view holders keyed by view type.
#[derive(Clone, Debug, Default)]
pub struct ViewHolderPool {
    holders: Vec<ViewHolder>,
    bound: HashMap<usize, ViewHolderId>,
    free: HashMap<usize, Vec<ViewHolderId>>,
    reused: usize,
}

impl ViewHolderPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of holders ever created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.holders.len()
    }

    /// Number of times a recycled holder was handed out again.
    #[must_use]
    pub fn reuse_count(&self) -> usize {
        self.reused
    }

    /// Number of pooled (unbound) holders for `view_type`.
    #[must_use]
    pub fn free_count(&self, view_type: usize) -> usize {
        self.free.get(&view_type).map_or(0, Vec::len)
    }

    /// Returns the holder behind `id`.
    #[must_use]
    pub fn holder(&self, id: ViewHolderId) -> Option<&ViewHolder> {
        self.holders.get(id.0 as usize)
    }

    /// Returns the holder bound to `index`, visible or not.
    #[must_use]
    pub fn bound_holder(&self, index: usize) -> Option<&ViewHolder> {
        self.bound.get(&index).and_then(|id| self.holder(*id))
    }

    /// Sorted indices of every visible holder.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .bound
            .iter()
            .filter(|(_, id)| self.holders[id.0 as usize].visible)
            .map(|(index, _)| *index)
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Last placement of the visible holder for `index`.
    #[must_use]
    pub fn placement(&self, index: usize) -> Option<Rect> {
        self.bound_holder(index)
            .filter(|holder| holder.visible)
            .map(ViewHolder::rect)
    }

    /// Drops every holder.
    pub fn clear(&mut self) {
        self.holders.clear();
        self.bound.clear();
        self.free.clear();
        self.reused = 0;
    }

    fn slot_mut(&mut self, id: ViewHolderId) -> Option<&mut ViewHolder> {
        self.holders.get_mut(id.0 as usize)
    }
}

impl Recycler for ViewHolderPool {
    type Handle = ViewHolderId;

    fn visible_view_holders(&self) -> Vec<(usize, ViewHolderId)> {
        let mut visible: Vec<(usize, ViewHolderId)> = self
            .bound
            .iter()
            .filter(|(_, id)| self.holders[id.0 as usize].visible)
            .map(|(index, id)| (*index, *id))
            .collect();
        visible.sort_unstable();
        visible
    }

    fn view_holder_for_position(&mut self, index: usize, view_type: usize) -> Option<ViewHolderId> {
        if let Some(&id) = self.bound.get(&index) {
            if self.holders[id.0 as usize].view_type == view_type {
                return Some(id);
            }
            // The item changed type; its holder goes back to its own free list.
            self.recycle_view_holder(id);
        }
        let id = match self.free.get_mut(&view_type).and_then(Vec::pop) {
            Some(id) => {
                self.reused += 1;
                id
            }
            None => {
                let id = ViewHolderId(u32::try_from(self.holders.len()).ok()?);
                self.holders.push(ViewHolder {
                    view_type,
                    index: None,
                    visible: false,
                    rect: Rect::ZERO,
                });
                id
            }
        };
        self.holders[id.0 as usize].index = Some(index);
        self.bound.insert(index, id);
        Some(id)
    }

    fn visible_view_holder_for_position(&self, index: usize) -> Option<ViewHolderId> {
        self.bound
            .get(&index)
            .copied()
            .filter(|id| self.holders[id.0 as usize].visible)
    }

    fn show_view_holder(&mut self, handle: ViewHolderId) {
        if let Some(holder) = self.slot_mut(handle) {
            holder.visible = true;
        }
    }

    fn hide_view_holder(&mut self, handle: ViewHolderId) {
        if let Some(holder) = self.slot_mut(handle) {
            holder.visible = false;
        }
    }

    fn recycle_view_holder(&mut self, handle: ViewHolderId) {
        let Some(holder) = self.slot_mut(handle) else {
            return;
        };
        let Some(index) = holder.index.take() else {
            return;
        };
        holder.visible = false;
        holder.rect = Rect::ZERO;
        let view_type = holder.view_type;
        self.bound.remove(&index);
        self.free.entry(view_type).or_default().push(handle);
    }

    fn place_view_holder(&mut self, handle: ViewHolderId, rect: Rect) {
        if let Some(holder) = self.slot_mut(handle) {
            holder.rect = rect;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycled_holders_are_reused_per_view_type() {
        let mut pool = ViewHolderPool::new();
        let a = pool.view_holder_for_position(0, 0).unwrap();
        pool.show_view_holder(a);
        assert_eq!(pool.visible_indices(), [0]);

        pool.hide_view_holder(a);
        pool.recycle_view_holder(a);
        assert_eq!(pool.free_count(0), 1);
        assert!(pool.visible_indices().is_empty());

        // A different view type does not take the pooled holder.
        let b = pool.view_holder_for_position(1, 1).unwrap();
        assert_ne!(a, b);
        // The same view type does.
        let c = pool.view_holder_for_position(2, 0).unwrap();
        assert_eq!(a, c);
        assert_eq!(pool.reuse_count(), 1);
        assert_eq!(pool.created_count(), 2);
        assert_eq!(pool.holder(c).unwrap().index(), Some(2));
    }

    #[test]
    fn bound_holder_is_returned_again() {
        let mut pool = ViewHolderPool::new();
        let a = pool.view_holder_for_position(5, 0).unwrap();
        let b = pool.view_holder_for_position(5, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.visible_view_holder_for_position(5), None);
        pool.show_view_holder(a);
        assert_eq!(pool.visible_view_holder_for_position(5), Some(a));
    }

    #[test]
    fn changed_view_type_binds_a_matching_holder() {
        let mut pool = ViewHolderPool::new();
        let a = pool.view_holder_for_position(3, 0).unwrap();
        pool.show_view_holder(a);

        let b = pool.view_holder_for_position(3, 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.holder(a).unwrap().index(), None);
        assert!(!pool.holder(a).unwrap().is_visible());
        assert_eq!(pool.free_count(0), 1);
        assert_eq!(pool.bound_holder(3).unwrap().view_type(), 1);

        // Releasing the old handle again leaves the new binding alone.
        pool.hide_view_holder(a);
        pool.recycle_view_holder(a);
        assert_eq!(pool.free_count(0), 1);
        assert_eq!(pool.view_holder_for_position(3, 1), Some(b));
    }

    #[test]
    fn placement_is_reported_for_visible_holders_only() {
        let mut pool = ViewHolderPool::new();
        let a = pool.view_holder_for_position(0, 0).unwrap();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        pool.place_view_holder(a, rect);
        assert_eq!(pool.placement(0), None);
        pool.show_view_holder(a);
        assert_eq!(pool.placement(0), Some(rect));
    }
}
