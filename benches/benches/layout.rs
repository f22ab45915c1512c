// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_recycler::{
    Adapter, GridLayoutConfig, GridLayoutManager, LayoutManager, LinearLayoutConfig,
    LinearLayoutManager, ViewHolderPool,
};

struct Rows(usize);

impl Adapter for Rows {
    type Template = ();

    fn item_count(&self) -> usize {
        self.0
    }

    fn view_holder_template(&self, _view_type: usize) -> Option<&()> {
        Some(&())
    }

    fn measure_view_holder(&self, _: &(), index: usize, available: Size) -> Size {
        Size::new(available.width.min(120.0), 20.0 + (index % 5) as f64 * 4.0)
    }
}

const HOST: Size = Size::new(360.0, 640.0);

fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("recycler/measure");

    for len in [1_000usize, 10_000, 100_000] {
        let rows = Rows(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("linear", len), &rows, |b, rows| {
            let mut list = LinearLayoutManager::new(LinearLayoutConfig::default());
            list.attach(HOST);
            b.iter(|| {
                list.measure(Some(rows));
                black_box(list.state().content_size());
            });
        });

        group.bench_with_input(BenchmarkId::new("grid", len), &rows, |b, rows| {
            let mut grid = GridLayoutManager::new(GridLayoutConfig {
                span_count: 3,
                ..GridLayoutConfig::default()
            });
            grid.attach(HOST);
            b.iter(|| {
                grid.measure(Some(rows));
                black_box(grid.state().content_size());
            });
        });
    }

    group.finish();
}

fn bench_scroll_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("recycler/scroll_layout");

    // Cost per pass should depend on the scroll step, not on the list length.
    for len in [1_000usize, 100_000] {
        let rows = Rows(len);

        group.bench_with_input(BenchmarkId::new("linear_step", len), &rows, |b, rows| {
            let mut list = LinearLayoutManager::new(LinearLayoutConfig::default());
            let mut pool = ViewHolderPool::new();
            list.attach(HOST);
            list.measure(Some(rows));
            let max = list.state().content_size().height - HOST.height;
            let mut position = 0.0;
            b.iter(|| {
                position = if position + 37.0 > max { 0.0 } else { position + 37.0 };
                list.scroll_to_position(position);
                list.layout(Some(rows), &mut pool);
                black_box(list.visible_range());
            });
        });

        group.bench_with_input(BenchmarkId::new("grid_step", len), &rows, |b, rows| {
            let mut grid = GridLayoutManager::new(GridLayoutConfig {
                span_count: 3,
                ..GridLayoutConfig::default()
            });
            let mut pool = ViewHolderPool::new();
            grid.attach(HOST);
            grid.measure(Some(rows));
            let max = grid.state().content_size().height - HOST.height;
            let mut position = 0.0;
            b.iter(|| {
                position = if position + 37.0 > max { 0.0 } else { position + 37.0 };
                grid.scroll_to_position(position);
                grid.layout(Some(rows), &mut pool);
                black_box(grid.visible_span_range());
            });
        });

        group.bench_with_input(BenchmarkId::new("linear_jump", len), &rows, |b, rows| {
            let mut list = LinearLayoutManager::new(LinearLayoutConfig::default());
            let mut pool = ViewHolderPool::new();
            list.attach(HOST);
            list.measure(Some(rows));
            let max = list.state().content_size().height - HOST.height;
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                list.scroll_to_position(if flip { max * 0.75 } else { max * 0.25 });
                list.layout(Some(rows), &mut pool);
                black_box(list.visible_range());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_measure, bench_scroll_layout);
criterion_main!(benches);
