// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use panorama_window::{Edge, Element, PositionUpdate, ViewportWindow, WindowManager, WindowOptions};

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

fn gen_graph(n: usize, world: f64) -> (Vec<Element>, Vec<Edge>) {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let elements: Vec<Element> = (0..n)
        .map(|i| {
            let (x, y) = (rng.next_f64() * world, rng.next_f64() * world);
            Element::new(format!("n{i}"), x, y).with_radius(2.0 + rng.next_f64() * 20.0)
        })
        .collect();
    let edges = (0..n * 2)
        .map(|i| {
            let s = (rng.next_f64() * n as f64) as usize;
            let t = (rng.next_f64() * n as f64) as usize;
            Edge::new(format!("e{i}"), format!("n{s}"), format!("n{t}"))
        })
        .collect();
    (elements, edges)
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_compute");
    for &n in &[2_000usize, 10_000, 50_000] {
        let (elements, edges) = gen_graph(n, 20_000.0);
        let mut wm = WindowManager::with_options(WindowOptions {
            max_visible_nodes: 500,
            ..Default::default()
        });
        wm.set_graph_data(elements, edges);
        let mut x = 0.0;
        group.bench_function(format!("pan_n{n}"), |b| {
            b.iter(|| {
                x = (x + 50.0) % 18_000.0;
                wm.update_viewport(ViewportWindow::new(x, x, 1920.0, 1080.0, 1.0));
                wm.force_update();
                black_box(wm.stats().visible_nodes)
            })
        });
    }
    group.finish();
}

fn bench_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_updates");
    let (elements, edges) = gen_graph(10_000, 20_000.0);
    let mut base = WindowManager::new();
    base.set_graph_data(elements, edges);
    let mut rng = Rng(0xBADC_F00D_1234_5678);
    let updates: Vec<PositionUpdate> = (0..1_000)
        .map(|i| {
            let (x, y) = (rng.next_f64() * 20_000.0, rng.next_f64() * 20_000.0);
            PositionUpdate::new(format!("n{}", i * 10), x, y)
        })
        .collect();
    group.bench_function("batch_1000_of_10000", |b| {
        b.iter_batched(
            || updates.clone(),
            |batch| black_box(base.update_node_positions(batch)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_compute, bench_positions);
criterion_main!(benches);
