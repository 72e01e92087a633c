// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window manager basics.
//!
//! Scatter a graph, drive a simulated pan through the debounce cycle, and print what
//! enters and leaves the view.
//!
//! Run:
//! - `cargo run -p panorama_demos --example window_basics`

use std::time::{Duration, Instant};

use panorama_window::{
    Edge, Element, EventKind, ViewportWindow, WindowEvent, WindowManager, WindowOptions,
};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 40 × 40 grid, 50 units apart, each linked to its right neighbor.
    let mut elements = Vec::new();
    let mut edges = Vec::new();
    for r in 0..40 {
        for c in 0..40 {
            let (x, y) = (c as f64 * 50.0, r as f64 * 50.0);
            elements.push(Element::new(format!("{c}:{r}"), x, y));
            if c > 0 {
                let (from, to) = (format!("{}:{r}", c - 1), format!("{c}:{r}"));
                edges.push(Edge::new(format!("{from}-{to}"), from, to));
            }
        }
    }

    let mut wm = WindowManager::with_options(WindowOptions {
        max_visible_nodes: 300,
        ..Default::default()
    });
    wm.set_graph_data(elements, edges);
    wm.on(EventKind::VisibilityChange, |event| {
        if let WindowEvent::VisibilityChange(change) = event {
            println!(
                "visible {:>3}  +{:<3} -{:<3}",
                change.visible_node_ids.len(),
                change.added_node_ids.len(),
                change.removed_node_ids.len()
            );
        }
    });

    // Pan right at 60 Hz; every tick also offers a timer callback.
    let t0 = Instant::now();
    for frame in 0..30_u32 {
        let now = t0 + Duration::from_millis(u64::from(frame) * 16);
        let x = f64::from(frame) * 12.0;
        wm.update_viewport_at(ViewportWindow::new(x, 0.0, 400.0, 300.0, 1.0), now);
        wm.poll(now);
        wm.on_frame();
    }
    // Drain the trailing request.
    if let Some(deadline) = wm.next_deadline() {
        wm.poll(deadline);
    }

    let stats = wm.stats();
    println!(
        "{} of {} nodes visible ({} buffered), {} edges, {} computations, cull ratio {:.2}",
        stats.visible_nodes,
        stats.total_nodes,
        stats.buffered_nodes,
        stats.visible_edges,
        stats.update_count,
        stats.cull_ratio()
    );
    if let Some(p) = wm.predicted_position() {
        println!("predicted origin in 100ms: ({:.1}, {:.1})", p.x, p.y);
    }

    wm.update_cursor_position(200.0, 150.0);
    println!("near cursor: {:?}", wm.priority_node_ids());
}
