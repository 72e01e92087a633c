// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culler basics.
//!
//! Cull a strip of labeled rectangles against a scrolling viewport.
//!
//! Run:
//! - `cargo run -p panorama_demos --example culler_basics`

use kurbo::Rect;
use panorama_window::ViewportCuller;

fn main() {
    let mut culler = ViewportCuller::new();
    culler.set_items((0..100).map(|i| {
        let x = f64::from(i) * 30.0;
        (format!("card-{i}"), Rect::new(x, 0.0, x + 25.0, 40.0))
    }));

    for scroll in [0.0, 600.0, 2900.0] {
        let viewport = Rect::new(scroll, 0.0, scroll + 120.0, 40.0);
        let mut visible = culler.visible(viewport, 10.0);
        visible.sort();
        println!("scroll {scroll:>6}: {visible:?}");
    }
}
