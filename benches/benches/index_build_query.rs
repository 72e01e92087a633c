// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use panorama_index::{Aabb2D, SpatialIndex, SpatialItem};

fn gen_grid_items(n: usize, cell: f64) -> Vec<SpatialItem<u32>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let id = (y * n + x) as u32;
            let r = Aabb2D::<f64>::from_xywh(x as f64 * cell, y as f64 * cell, cell, cell);
            out.push(SpatialItem::new(id, r, 0.0));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        ((x >> 11) as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_clustered_items(
    n_clusters: usize,
    per_cluster: usize,
    spread: f64,
) -> Vec<SpatialItem<u32>> {
    let mut rng = Rng(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.next_f64() * 10_000.0, rng.next_f64() * 10_000.0);
        for _ in 0..per_cluster {
            let x = cx + (rng.next_f64() - 0.5) * spread;
            let y = cy + (rng.next_f64() - 0.5) * spread;
            let id = out.len() as u32;
            out.push(SpatialItem::new(id, Aabb2D::around(x, y, 5.0), 0.0));
        }
    }
    out
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("str_load");
    for &n in &[32usize, 100, 316] {
        let items = gen_grid_items(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n * n), |b| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut idx = SpatialIndex::new();
                    idx.load(items);
                    black_box(idx.height());
                },
                BatchSize::LargeInput,
            )
        });
    }
    let clustered = gen_clustered_items(50, 400, 300.0);
    group.throughput(Throughput::Elements(clustered.len() as u64));
    group.bench_function("clustered_n20000", |b| {
        b.iter_batched(
            || clustered.clone(),
            |items| black_box(items.into_iter().collect::<SpatialIndex<u32>>().len()),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("str_search");
    for &n in &[100usize, 316] {
        let idx: SpatialIndex<u32> = gen_grid_items(n, 10.0).into_iter().collect();
        // A viewport-sized window near the middle.
        let mid = n as f64 * 5.0;
        let query = Aabb2D::from_xywh(mid, mid, 800.0, 600.0);
        group.bench_function(format!("viewport_n{}", n * n), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                idx.search_with(black_box(query), |_| hits += 1);
                black_box(hits)
            })
        });
        let p = mid + 1.0;
        group.bench_function(format!("point_n{}", n * n), |b| {
            b.iter(|| black_box(idx.search_point(black_box(p), p).len()))
        });
    }
    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation");
    let base: SpatialIndex<u32> = gen_grid_items(100, 10.0).into_iter().collect();
    let moved = Aabb2D::from_xywh(3.0, 3.0, 10.0, 10.0);
    group.bench_function("move_one_n10000", |b| {
        b.iter_batched(
            || base.clone(),
            |mut idx| {
                idx.remove(&5050);
                idx.insert(SpatialItem::new(5050, moved, 0.0));
                black_box(idx.len())
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_load, bench_search, bench_mutation);
criterion_main!(benches);
