// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_recycler --heading-base-level=0

//! Understory Recycler: headless layout and view-holder recycling for virtualized lists.
//!
//! This crate decides *where* list items go and *which* of them need a live view
//! for the current scroll position. It never renders anything and never owns
//! views; a host framework supplies both through two small traits:
//!
//! - [`Adapter`]: item count, per-item view type, the template for each view
//!   type, and a measure callback returning an item's size for an available size.
//! - [`Recycler`]: hands out view-holder handles for item indices and receives
//!   show, hide, recycle and place commands. [`ViewHolderPool`] is a ready-made
//!   implementation keyed by view type.
//!
//! Geometry comes from a [`LayoutManager`]. Three are provided:
//!
//! - [`LinearLayoutManager`]: one item after another along a scroll axis, with
//!   spacing and padding.
//! - [`GridLayoutManager`]: items packed into spans of `span_count` cells, with
//!   per-item span sizes from a [`SpanSizeLookup`].
//! - [`CircleLayoutManager`]: items on a ring that scrolling rotates.
//!
//! The linear and grid managers keep a [`LayoutCache`] of the visible range and
//! update it incrementally as the scroll position moves, so a layout pass only
//! touches the items entering and leaving the viewport.
//!
//! ## Lifecycle
//!
//! ```rust
//! use kurbo::Size;
//! use understory_recycler::{
//!     Adapter, LayoutManager, LinearLayoutConfig, LinearLayoutManager, ViewHolderPool,
//! };
//!
//! struct Rows(usize);
//!
//! impl Adapter for Rows {
//!     type Template = ();
//!     fn item_count(&self) -> usize {
//!         self.0
//!     }
//!     fn view_holder_template(&self, _view_type: usize) -> Option<&()> {
//!         Some(&())
//!     }
//!     fn measure_view_holder(&self, _: &(), _index: usize, available: Size) -> Size {
//!         Size::new(available.width, 40.0)
//!     }
//! }
//!
//! let rows = Rows(1_000);
//! let mut pool = ViewHolderPool::new();
//! let mut list = LinearLayoutManager::new(LinearLayoutConfig::default());
//!
//! list.attach(Size::new(320.0, 200.0));
//! list.measure(Some(&rows));
//! list.layout(Some(&rows), &mut pool);
//! assert_eq!(pool.visible_indices(), [0, 1, 2, 3, 4]);
//!
//! // Input moves the scroller; the host lays out again when asked to.
//! list.wheel(100.0);
//! assert!(list.needs_layout());
//! list.layout(Some(&rows), &mut pool);
//! assert_eq!(pool.visible_indices(), [2, 3, 4, 5, 6, 7]);
//!
//! // Holders for rows 0 and 1 were recycled and handed to rows 5 and 6.
//! assert_eq!(pool.reuse_count(), 2);
//! assert_eq!(pool.created_count(), 6);
//! ```
//!
//! All coordinates are logical pixels. Placements handed to the [`Recycler`]
//! are relative to the viewport's top-left corner. This crate is `no_std` and
//! uses `alloc`; diagnostics go through the [`log`] facade.

#![no_std]

extern crate alloc;

mod adapter;
mod cache;
mod circle;
mod geometry;
mod grid;
mod linear;
mod manager;
mod pool;
mod recycler;
mod scroller;

pub use adapter::{Adapter, DefaultSpanSizeLookup, SpanSizeLookup};
pub use cache::{LayoutCache, OutOfScreen};
pub use circle::{CircleLayoutConfig, CircleLayoutManager, RotationDirection};
pub use geometry::{Extent, Orientation, ScrollWindow};
pub use grid::{GridItem, GridLayoutConfig, GridLayoutManager, GridSpan};
pub use linear::{LinearLayoutConfig, LinearLayoutManager, MeasuredPosition};
pub use manager::{FocusStrategy, LayoutListeners, LayoutManager, LayoutState};
pub use pool::{ViewHolder, ViewHolderId, ViewHolderPool};
pub use recycler::Recycler;
pub use scroller::{Scroller, ScrollerConfig, viewport_ratio};
