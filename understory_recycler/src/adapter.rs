// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-side collaborators: the [`Adapter`] and the grid [`SpanSizeLookup`].

use kurbo::Size;

/// Supplies item count, view types and measured item sizes.
///
/// Layout managers only read from the adapter. Measurement must be a pure
/// function of `(index, available)` for the duration of a measure pass: two
/// calls with the same arguments are expected to return the same size.
pub trait Adapter {
    /// Template a view type is instantiated from (a prefab, a widget builder, ...).
    type Template;

    /// Number of items in the data set.
    fn item_count(&self) -> usize;

    /// View type of the item at `index`. Items of the same type share templates
    /// and recycled view holders.
    fn item_view_type(&self, index: usize) -> usize {
        let _ = index;
        0
    }

    /// Returns the template used for `view_type`, if the adapter knows it.
    fn view_holder_template(&self, view_type: usize) -> Option<&Self::Template>;

    /// Measures the item at `index` using `template`.
    ///
    /// `available` carries the space the layout offers; an infinite component
    /// means the axis is unconstrained.
    fn measure_view_holder(&self, template: &Self::Template, index: usize, available: Size)
    -> Size;
}

/// Measures item `index`, returning [`Size::ZERO`] when the adapter has no
/// template for its view type.
pub(crate) fn measure_item<A: Adapter + ?Sized>(
    adapter: &A,
    index: usize,
    available: Size,
) -> Size {
    let view_type = adapter.item_view_type(index);
    match adapter.view_holder_template(view_type) {
        Some(template) => adapter.measure_view_holder(template, index, available),
        None => {
            log::warn!("no template for view type {view_type} (item {index}); measuring as empty");
            Size::ZERO
        }
    }
}

/// Number of grid cells an item occupies within its span.
pub trait SpanSizeLookup {
    /// Returns the span size of the item at `index`.
    ///
    /// `0` marks the item as hidden: it consumes no cells and belongs to no span.
    /// Values larger than the grid's span count are clamped to it.
    fn span_size(&self, index: usize) -> usize;
}

/// Every item occupies exactly one cell.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultSpanSizeLookup;

impl SpanSizeLookup for DefaultSpanSizeLookup {
    fn span_size(&self, _index: usize) -> usize {
        1
    }
}

impl<F> SpanSizeLookup for F
where
    F: Fn(usize) -> usize,
{
    fn span_size(&self, index: usize) -> usize {
        self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneType;

    impl Adapter for OneType {
        type Template = f64;

        fn item_count(&self) -> usize {
            3
        }

        fn item_view_type(&self, index: usize) -> usize {
            index % 2
        }

        fn view_holder_template(&self, view_type: usize) -> Option<&f64> {
            (view_type == 0).then_some(&10.0)
        }

        fn measure_view_holder(&self, template: &f64, _index: usize, available: Size) -> Size {
            Size::new(available.width, *template)
        }
    }

    #[test]
    fn missing_template_measures_empty() {
        let available = Size::new(50.0, f64::INFINITY);
        assert_eq!(measure_item(&OneType, 0, available), Size::new(50.0, 10.0));
        assert_eq!(measure_item(&OneType, 1, available), Size::ZERO);
    }

    #[test]
    fn closures_are_span_lookups() {
        let lookup = |index: usize| if index == 0 { 3 } else { 1 };
        assert_eq!(lookup.span_size(0), 3);
        assert_eq!(lookup.span_size(4), 1);
        assert_eq!(DefaultSpanSizeLookup.span_size(9), 1);
    }
}
