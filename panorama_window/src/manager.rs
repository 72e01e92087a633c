// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The windowing controller.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use kurbo::Point;
use panorama_index::{Aabb2D, SpatialIndex, SpatialItem};

use crate::events::{EventKind, Listeners, Subscription, VisibilityChange, WindowEvent};
use crate::geometry::{element_priority, is_significant_change, rect_to_aabb};
use crate::options::{OptionsPatch, WindowOptions};
use crate::prediction::ScrollHistory;
use crate::scheduler::{Debouncer, Pending};
use crate::stats::WindowStats;
use crate::types::{Edge, Element, ElementId, PositionUpdate, ViewportWindow};
use crate::visibility::{VisibilityDelta, VisibilityFlags};

/// Turns element positions and viewport updates into a bounded, prioritized visible set.
///
/// The manager owns the element and edge records, a [`SpatialIndex`] over element bounds,
/// and the visibility sets derived from them. Every accessor returns copies.
///
/// ## Update cycle
///
/// 1. [`update_viewport`](Self::update_viewport) ignores moves smaller than
///    `update_threshold / zoom` (and zoom changes up to `0.01`); otherwise it stores the
///    window and schedules a computation `debounce_ms` later, or on the next frame when
///    `debounce_ms` is zero. Only one computation is ever pending; it uses whatever
///    window is stored when it runs.
/// 2. The host calls [`poll`](Self::poll) from its timer and [`on_frame`](Self::on_frame)
///    from its frame callback. [`force_update`](Self::force_update) skips the wait.
/// 3. A computation queries the index for the viewport grown by `buffer_size / zoom`,
///    keeps the `max_visible_nodes` highest-priority hits, diffs against the previous set,
///    and publishes [`WindowEvent::VisibilityChange`] (only when something changed) and
///    [`WindowEvent::Update`] (always).
///
/// Small graphs (fewer than `max_visible_nodes` elements) and zoomed-out views (below
/// `min_zoom_for_windowing`) skip the query and report every element visible.
///
/// Position updates do not recompute on their own; follow a batch of them with
/// [`force_update`](Self::force_update) or another viewport update.
pub struct WindowManager {
    options: WindowOptions,
    elements: HashMap<ElementId, Element>,
    edges: HashMap<ElementId, Edge>,
    priorities: HashMap<ElementId, f64>,
    index: SpatialIndex<ElementId>,
    window: Option<ViewportWindow>,
    cursor: Option<Point>,
    visible: BTreeSet<ElementId>,
    buffered: BTreeSet<ElementId>,
    priority: BTreeSet<ElementId>,
    visible_edges: BTreeSet<ElementId>,
    windowing_active: bool,
    debouncer: Debouncer,
    history: ScrollHistory,
    listeners: Listeners,
    last_update: Duration,
    update_count: u64,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("elements", &self.elements.len())
            .field("edges", &self.edges.len())
            .field("window", &self.window)
            .field("visible", &self.visible.len())
            .field("windowing_active", &self.windowing_active)
            .field("pending", &self.debouncer.pending())
            .field("index", &self.index)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    /// Create a manager with default options.
    pub fn new() -> Self {
        Self::with_options(WindowOptions::default())
    }

    /// Create a manager with the given options.
    pub fn with_options(options: WindowOptions) -> Self {
        Self {
            options,
            elements: HashMap::new(),
            edges: HashMap::new(),
            priorities: HashMap::new(),
            index: SpatialIndex::new(),
            window: None,
            cursor: None,
            visible: BTreeSet::new(),
            buffered: BTreeSet::new(),
            priority: BTreeSet::new(),
            visible_edges: BTreeSet::new(),
            windowing_active: false,
            debouncer: Debouncer::default(),
            history: ScrollHistory::default(),
            listeners: Listeners::default(),
            last_update: Duration::ZERO,
            update_count: 0,
        }
    }

    /// Current options.
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// Merge `patch` into the options. Recomputes immediately when a viewport is set.
    ///
    /// Turning `predictive_loading` off forgets the scroll history.
    pub fn set_options(&mut self, patch: OptionsPatch) {
        self.options.apply(&patch);
        if self.options.predictive_loading {
            self.history.truncate(self.options.prediction_frames);
        } else {
            self.history.clear();
        }
        if self.window.is_some() {
            self.force_update();
        }
    }

    // --- Data ---------------------------------------------------------------------------

    /// Replace all elements and edges and rebuild the index.
    ///
    /// Later duplicates of an id replace earlier ones. Priorities are computed here, once,
    /// from radius and connection count. When a viewport is already set the visible set
    /// is recomputed right away.
    pub fn set_graph_data(
        &mut self,
        elements: impl IntoIterator<Item = Element>,
        edges: impl IntoIterator<Item = Edge>,
    ) {
        self.elements = elements.into_iter().map(|e| (e.id.clone(), e)).collect();
        self.edges = edges.into_iter().map(|e| (e.id.clone(), e)).collect();

        let mut connections: HashMap<&ElementId, usize> = HashMap::new();
        for e in self.edges.values() {
            *connections.entry(&e.source).or_default() += 1;
            *connections.entry(&e.target).or_default() += 1;
        }
        self.priorities = self
            .elements
            .values()
            .map(|e| {
                let n = connections.get(&e.id).copied().unwrap_or(0);
                (e.id.clone(), element_priority(e.effective_radius(), n))
            })
            .collect();

        self.rebuild_index();
        tracing::debug!(
            elements = self.elements.len(),
            edges = self.edges.len(),
            height = self.index.height(),
            "graph data replaced"
        );
        if self.window.is_some() {
            self.force_update();
        }
    }

    /// Move one element. Unknown ids are ignored. Does not recompute visibility.
    ///
    /// Returns whether the element exists.
    pub fn update_node_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(e) = self.elements.get_mut(id) else {
            return false;
        };
        e.x = x;
        e.y = y;
        let item = SpatialItem::new(
            e.id.clone(),
            e.bounds(),
            self.priorities.get(id).copied().unwrap_or_default(),
        );
        self.index.remove(&item.id);
        self.index.insert(item);
        true
    }

    /// Move many elements, rebuilding the index once. Unknown ids are ignored. Does not
    /// recompute visibility.
    ///
    /// Returns how many elements moved.
    pub fn update_node_positions(
        &mut self,
        updates: impl IntoIterator<Item = PositionUpdate>,
    ) -> usize {
        let mut moved = 0;
        for u in updates {
            if let Some(e) = self.elements.get_mut(u.id.as_str()) {
                e.x = u.x;
                e.y = u.y;
                moved += 1;
            }
        }
        if moved > 0 {
            self.rebuild_index();
        }
        moved
    }

    /// A copy of one element record.
    pub fn element(&self, id: &str) -> Option<Element> {
        self.elements.get(id).cloned()
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Windowing priority assigned to an element at the last data load.
    pub fn node_priority(&self, id: &str) -> Option<f64> {
        self.priorities.get(id).copied()
    }

    fn rebuild_index(&mut self) {
        let items = self
            .elements
            .values()
            .map(|e| {
                let p = self.priorities.get(&e.id).copied().unwrap_or_default();
                SpatialItem::new(e.id.clone(), e.bounds(), p)
            })
            .collect();
        self.index.load(items);
    }

    // --- Viewport and scheduling --------------------------------------------------------

    /// Request a viewport change, timestamped now. See [`update_viewport_at`](Self::update_viewport_at).
    pub fn update_viewport(&mut self, window: ViewportWindow) -> bool {
        self.update_viewport_at(window, Instant::now())
    }

    /// Request a viewport change observed at `now`.
    ///
    /// Returns `false` when the change is below the update threshold, in which case
    /// nothing is stored or scheduled.
    pub fn update_viewport_at(&mut self, window: ViewportWindow, now: Instant) -> bool {
        if let Some(current) = &self.window
            && !is_significant_change(current, &window, self.options.update_threshold)
        {
            tracing::trace!(
                x = window.x,
                y = window.y,
                zoom = window.zoom,
                "viewport change below threshold"
            );
            return false;
        }
        self.window = Some(window);
        if self.options.predictive_loading {
            self.history
                .push(window.origin(), now, self.options.prediction_frames);
        }
        if !self.debouncer.request(now, self.options.debounce()) {
            tracing::trace!("viewport update coalesced into pending computation");
        }
        true
    }

    /// Run the pending computation if it is due at `now`. Returns whether it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debouncer.take_due(now) {
            self.compute_visible_nodes();
            true
        } else {
            false
        }
    }

    /// Animation-frame hook: run a computation deferred to the next frame. Returns
    /// whether it ran.
    pub fn on_frame(&mut self) -> bool {
        if self.debouncer.take_frame() {
            self.compute_visible_nodes();
            true
        } else {
            false
        }
    }

    /// The scheduled computation, if any.
    pub fn pending_update(&self) -> Option<Pending> {
        self.debouncer.pending()
    }

    /// When the pending computation's timer expires. `None` when nothing is pending or it
    /// waits for the next frame.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.debouncer.pending() {
            Some(Pending::At(t)) => Some(t),
            _ => None,
        }
    }

    /// Recompute now, dropping any pending debounced computation.
    pub fn force_update(&mut self) {
        self.debouncer.cancel();
        self.compute_visible_nodes();
    }

    /// Track the pointer (world coordinates) and refresh render-priority flags.
    ///
    /// Does not change the visible set.
    pub fn update_cursor_position(&mut self, x: f64, y: f64) {
        self.cursor = Some(Point::new(x, y));
        self.recompute_priority();
    }

    /// The last accepted viewport.
    pub fn current_window(&self) -> Option<ViewportWindow> {
        self.window
    }

    /// Where the viewport origin is heading, about 100 ms ahead, from the two latest
    /// samples. Advisory only; it does not widen any query.
    ///
    /// `None` before the first viewport; the current origin when no motion is known.
    pub fn predicted_position(&self) -> Option<Point> {
        let window = self.window?;
        self.history.predict().or(Some(window.origin()))
    }

    // --- Computation --------------------------------------------------------------------

    fn compute_visible_nodes(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let started = Instant::now();
        let (visible, buffered, active) = self.select_visible(&window);

        let delta = VisibilityDelta::between(&self.visible, &visible);
        self.visible = visible;
        self.buffered = buffered;
        self.windowing_active = active;

        if !delta.is_empty() {
            let change = VisibilityChange {
                visible_node_ids: self.visible.clone(),
                added_node_ids: delta.added,
                removed_node_ids: delta.removed,
            };
            self.listeners.emit(&WindowEvent::VisibilityChange(change));
        }

        self.recompute_edges();
        self.recompute_priority();

        self.last_update = started.elapsed();
        self.update_count += 1;
        let stats = self.stats();
        tracing::debug!(
            visible = stats.visible_nodes,
            buffered = stats.buffered_nodes,
            edges = stats.visible_edges,
            windowing = stats.windowing_active,
            elapsed_us = stats.last_update.as_micros(),
            "visibility computed"
        );
        self.listeners.emit(&WindowEvent::Update(stats));
    }

    /// Returns `(visible, buffered, windowing_active)` for `window`.
    fn select_visible(
        &self,
        window: &ViewportWindow,
    ) -> (BTreeSet<ElementId>, BTreeSet<ElementId>, bool) {
        let max = self.options.max_visible_nodes;
        if self.index.len() < max || window.zoom < self.options.min_zoom_for_windowing {
            let all = self.elements.keys().cloned().collect();
            return (all, BTreeSet::new(), false);
        }

        let zoom = window.safe_zoom();
        let query = rect_to_aabb(window.expanded(self.options.buffer_size / zoom));
        let mut candidates = self.index.search(query);
        if candidates.len() > max {
            if self.options.use_priority {
                // Stable: equal priorities keep query order.
                candidates.sort_by(|a, b| {
                    let (pa, pb) = (a.priority, b.priority);
                    pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
                });
            }
            candidates.truncate(max);
        }

        let mut core: HashSet<&ElementId> = HashSet::new();
        self.index.search_with(rect_to_aabb(window.rect()), |item| {
            core.insert(&item.id);
        });

        let mut visible = BTreeSet::new();
        let mut buffered = BTreeSet::new();
        for item in candidates {
            if !core.contains(&item.id) {
                buffered.insert(item.id.clone());
            }
            visible.insert(item.id.clone());
        }
        (visible, buffered, true)
    }

    fn recompute_edges(&mut self) {
        self.visible_edges = self
            .edges
            .values()
            .filter(|e| {
                self.elements.contains_key(&e.source)
                    && self.elements.contains_key(&e.target)
                    && (self.visible.contains(&e.source) || self.visible.contains(&e.target))
            })
            .map(|e| e.id.clone())
            .collect();
    }

    fn recompute_priority(&mut self) {
        self.priority.clear();
        let (Some(cursor), Some(window)) = (self.cursor, self.window) else {
            return;
        };
        let radius = self.options.priority_radius / window.safe_zoom();
        let zone = Aabb2D::around(cursor.x, cursor.y, radius);
        let mut near = BTreeSet::new();
        self.index.search_with(zone, |item| {
            if !self.visible.contains(&item.id) {
                return;
            }
            let (cx, cy) = item.aabb.center();
            if Point::new(cx, cy).distance(cursor) <= radius {
                near.insert(item.id.clone());
            }
        });
        self.priority = near;
    }

    // --- Queries ------------------------------------------------------------------------

    /// Copies of the visible elements, ordered by id.
    pub fn visible_nodes(&self) -> Vec<Element> {
        self.visible
            .iter()
            .filter_map(|id| self.elements.get(id).cloned())
            .collect()
    }

    /// The visible element ids.
    pub fn visible_node_ids(&self) -> BTreeSet<ElementId> {
        self.visible.clone()
    }

    /// Visible elements outside the core viewport.
    pub fn buffered_node_ids(&self) -> BTreeSet<ElementId> {
        self.buffered.clone()
    }

    /// Visible elements near the pointer.
    pub fn priority_node_ids(&self) -> BTreeSet<ElementId> {
        self.priority.clone()
    }

    /// Copies of the visible edges, ordered by id.
    pub fn visible_edges(&self) -> Vec<Edge> {
        self.visible_edges
            .iter()
            .filter_map(|id| self.edges.get(id).cloned())
            .collect()
    }

    /// The visible edge ids.
    pub fn visible_edge_ids(&self) -> BTreeSet<ElementId> {
        self.visible_edges.clone()
    }

    /// Whether the element is in the visible set.
    pub fn is_node_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    /// Whether the element is visible only through the buffer margin.
    pub fn is_node_buffered(&self, id: &str) -> bool {
        self.buffered.contains(id)
    }

    /// Whether the element is flagged for priority rendering.
    pub fn is_node_priority(&self, id: &str) -> bool {
        self.priority.contains(id)
    }

    /// Whether at least one endpoint of the edge is visible.
    pub fn is_edge_visible(&self, id: &str) -> bool {
        self.visible_edges.contains(id)
    }

    /// All visibility flags of one element.
    pub fn node_visibility(&self, id: &str) -> VisibilityFlags {
        let mut f = VisibilityFlags::empty();
        f.set(VisibilityFlags::VISIBLE, self.visible.contains(id));
        f.set(VisibilityFlags::BUFFERED, self.buffered.contains(id));
        f.set(VisibilityFlags::PRIORITY, self.priority.contains(id));
        f
    }

    /// A statistics snapshot.
    pub fn stats(&self) -> WindowStats {
        WindowStats {
            total_nodes: self.elements.len(),
            total_edges: self.edges.len(),
            visible_nodes: self.visible.len(),
            buffered_nodes: self.buffered.len(),
            priority_nodes: self.priority.len(),
            visible_edges: self.visible_edges.len(),
            culled_nodes: self.elements.len().saturating_sub(self.visible.len()),
            windowing_active: self.windowing_active,
            last_update: self.last_update,
            update_count: self.update_count,
        }
    }

    // --- Events -------------------------------------------------------------------------

    /// Subscribe to events of `kind`. Listeners run synchronously in registration order.
    pub fn on(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&WindowEvent) + 'static,
    ) -> Subscription {
        self.listeners.add(kind, Box::new(listener))
    }

    /// Unsubscribe. Returns whether the subscription was live.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        self.listeners.remove(subscription)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // --- Lifecycle ----------------------------------------------------------------------

    /// Drop all data, the viewport, pending work and derived state. Listeners and
    /// options stay.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.edges.clear();
        self.priorities.clear();
        self.index.clear();
        self.window = None;
        self.cursor = None;
        self.visible.clear();
        self.buffered.clear();
        self.priority.clear();
        self.visible_edges.clear();
        self.windowing_active = false;
        self.debouncer.cancel();
        self.history.clear();
        self.last_update = Duration::ZERO;
        self.update_count = 0;
    }

    /// [`clear`](Self::clear) and drop every listener.
    pub fn destroy(&mut self) {
        self.clear();
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Deterministic xorshift for scattering elements.
    struct Rng(u64);

    impl Rng {
        fn next_f64(&mut self) -> f64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            (x >> 11) as f64 / (1_u64 << 53) as f64
        }
    }

    fn scattered(n: usize, world: f64, seed: u64) -> Vec<Element> {
        let mut rng = Rng(seed);
        (0..n)
            .map(|i| {
                let (x, y) = (rng.next_f64() * world, rng.next_f64() * world);
                Element::new(format!("n{i}"), x, y)
            })
            .collect()
    }

    /// `cols × rows` elements 100 units apart, starting at (50, 50).
    fn grid(cols: usize, rows: usize) -> Vec<Element> {
        let mut v = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                v.push(Element::new(
                    format!("g{c}_{r}"),
                    50.0 + c as f64 * 100.0,
                    50.0 + r as f64 * 100.0,
                ));
            }
        }
        v
    }

    fn opts(max_visible: usize) -> WindowOptions {
        WindowOptions {
            max_visible_nodes: max_visible,
            buffer_size: 0.0,
            ..Default::default()
        }
    }

    fn view(x: f64, y: f64, w: f64, h: f64) -> ViewportWindow {
        ViewportWindow::new(x, y, w, h, 1.0)
    }

    fn ids(names: &[&str]) -> BTreeSet<ElementId> {
        names.iter().copied().map(ElementId::from).collect()
    }

    fn record(m: &mut WindowManager, kind: EventKind) -> Rc<RefCell<Vec<WindowEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        m.on(kind, move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn idle_manager_is_empty() {
        let mut m = WindowManager::new();
        assert!(m.visible_nodes().is_empty());
        assert!(m.visible_edge_ids().is_empty());
        assert!(m.current_window().is_none());
        assert!(m.predicted_position().is_none());
        assert!(!m.is_node_visible("anything"));
        m.force_update();
        assert_eq!(m.stats().update_count, 0);
    }

    #[test]
    fn example_scenario_500_scattered() {
        let mut m = WindowManager::with_options(WindowOptions {
            max_visible_nodes: 50,
            ..Default::default()
        });
        m.set_graph_data(scattered(500, 10_000.0, 0x9E37_79B9_7F4A_7C15), []);
        let t0 = Instant::now();
        let first = ViewportWindow::new(0.0, 0.0, 500.0, 500.0, 1.0);
        assert!(m.update_viewport_at(first, t0));
        m.force_update();
        let stats = m.stats();
        assert!(stats.windowing_active);
        assert!(stats.visible_nodes <= 50);

        // Exactly at the threshold: not significant.
        let jitter = ViewportWindow::new(10.0, 10.0, 500.0, 500.0, 1.0);
        assert!(!m.update_viewport_at(jitter, t0));
        assert_eq!(m.current_window().map(|w| w.x), Some(0.0));
    }

    #[test]
    fn small_graph_shows_everything() {
        let mut m = WindowManager::with_options(opts(1000));
        m.set_graph_data(grid(5, 5), []);
        m.update_viewport(view(0.0, 0.0, 10.0, 10.0));
        m.force_update();
        assert_eq!(m.visible_node_ids().len(), 25);
        assert!(!m.stats().windowing_active);
        assert!(m.buffered_node_ids().is_empty());
    }

    #[test]
    fn zoomed_out_shows_everything() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        m.update_viewport(ViewportWindow::new(0.0, 0.0, 100.0, 100.0, 0.05));
        m.force_update();
        assert_eq!(m.visible_node_ids().len(), 100);
        assert!(!m.stats().windowing_active);
    }

    #[test]
    fn windowing_selects_viewport_contents() {
        let mut m = WindowManager::with_options(opts(50));
        m.set_graph_data(grid(10, 10), []);
        // Covers columns 0..=1 and rows 0..=1.
        m.update_viewport(view(0.0, 0.0, 180.0, 180.0));
        m.force_update();
        assert!(m.stats().windowing_active);
        assert_eq!(m.visible_node_ids(), ids(&["g0_0", "g0_1", "g1_0", "g1_1"]));
        assert_eq!(m.stats().culled_nodes, 96);
    }

    #[test]
    fn buffer_zone_is_reported_separately() {
        let mut m = WindowManager::with_options(WindowOptions {
            max_visible_nodes: 50,
            buffer_size: 100.0,
            ..Default::default()
        });
        m.set_graph_data(grid(10, 10), []);
        // Core: column 0 and row 0 only. Buffer reaches one more row and column.
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        assert_eq!(m.visible_node_ids(), ids(&["g0_0", "g0_1", "g1_0", "g1_1"]));
        assert_eq!(m.buffered_node_ids(), ids(&["g0_1", "g1_0", "g1_1"]));
        assert_eq!(
            m.node_visibility("g1_1"),
            VisibilityFlags::VISIBLE | VisibilityFlags::BUFFERED
        );
        assert_eq!(m.node_visibility("g0_0"), VisibilityFlags::VISIBLE);
    }

    #[test]
    fn buffer_shrinks_when_zoomed_in() {
        let mut m = WindowManager::with_options(WindowOptions {
            max_visible_nodes: 50,
            buffer_size: 100.0,
            min_zoom_for_windowing: 0.0,
            ..Default::default()
        });
        m.set_graph_data(grid(10, 10), []);
        // At zoom 4 the 100-unit buffer is 25 world units: not enough to reach row 1.
        m.update_viewport(ViewportWindow::new(0.0, 0.0, 90.0, 90.0, 4.0));
        m.force_update();
        assert_eq!(m.visible_node_ids(), ids(&["g0_0"]));
    }

    #[test]
    fn cap_keeps_highest_priority() {
        let mut m = WindowManager::with_options(opts(2));
        let elements = vec![
            Element::new("small", 10.0, 10.0).with_radius(1.0),
            Element::new("big", 20.0, 20.0).with_radius(40.0),
            Element::new("hub", 30.0, 30.0).with_radius(1.0),
            Element::new("leaf", 40.0, 40.0).with_radius(1.0),
        ];
        let edges = vec![
            Edge::new("e1", "hub", "leaf"),
            Edge::new("e2", "hub", "small"),
            Edge::new("e3", "hub", "big"),
        ];
        m.set_graph_data(elements, edges);
        assert_eq!(m.node_priority("hub"), Some(1.6));
        assert_eq!(m.node_priority("big"), Some(4.5));
        m.update_viewport(view(0.0, 0.0, 100.0, 100.0));
        m.force_update();
        assert_eq!(m.visible_node_ids(), ids(&["big", "hub"]));
    }

    #[test]
    fn cap_without_priority_still_bounds() {
        let mut m = WindowManager::with_options(WindowOptions {
            use_priority: false,
            ..opts(3)
        });
        m.set_graph_data(grid(4, 4), []);
        m.update_viewport(view(0.0, 0.0, 1000.0, 1000.0));
        m.force_update();
        assert_eq!(m.visible_node_ids().len(), 3);
    }

    #[test]
    fn debounce_waits_for_deadline() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        let t0 = Instant::now();
        m.update_viewport_at(view(0.0, 0.0, 150.0, 150.0), t0);
        assert_eq!(m.next_deadline(), Some(t0 + Duration::from_millis(16)));
        assert!(!m.poll(t0 + Duration::from_millis(5)));
        assert!(m.visible_node_ids().is_empty());
        assert!(m.poll(t0 + Duration::from_millis(16)));
        assert_eq!(m.visible_node_ids().len(), 4);
        assert!(m.pending_update().is_none());
    }

    #[test]
    fn coalesced_requests_use_latest_window() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        m.update_viewport_at(view(0.0, 0.0, 90.0, 90.0), t0);
        m.update_viewport_at(view(300.0, 300.0, 90.0, 90.0), t0 + ms(8));
        m.update_viewport_at(view(600.0, 600.0, 90.0, 90.0), t0 + ms(12));
        // The deadline was set by the first request and is not pushed back.
        assert_eq!(m.next_deadline(), Some(t0 + Duration::from_millis(16)));
        let log = record(&mut m, EventKind::Update);
        assert!(m.poll(t0 + Duration::from_millis(16)));
        assert!(!m.poll(t0 + Duration::from_millis(40)));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(m.visible_node_ids(), ids(&["g6_6"]));
    }

    #[test]
    fn zero_debounce_runs_on_next_frame() {
        let mut m = WindowManager::with_options(WindowOptions {
            debounce_ms: 0,
            ..opts(10)
        });
        m.set_graph_data(grid(10, 10), []);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        assert_eq!(m.pending_update(), Some(Pending::NextFrame));
        assert_eq!(m.next_deadline(), None);
        assert!(m.on_frame());
        assert!(!m.on_frame());
        assert_eq!(m.visible_node_ids(), ids(&["g0_0"]));
    }

    #[test]
    fn force_update_cancels_pending() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        let t0 = Instant::now();
        m.update_viewport_at(view(0.0, 0.0, 90.0, 90.0), t0);
        m.force_update();
        assert!(m.pending_update().is_none());
        assert!(!m.poll(t0 + Duration::from_secs(1)));
        assert_eq!(m.stats().update_count, 1);
    }

    #[test]
    fn events_report_deltas() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        let changes = record(&mut m, EventKind::VisibilityChange);
        let updates = record(&mut m, EventKind::Update);

        m.update_viewport(view(0.0, 0.0, 190.0, 90.0));
        m.force_update();
        m.update_viewport(view(100.0, 0.0, 190.0, 90.0));
        m.force_update();
        // Same set again: no visibility change, but still an update.
        m.force_update();

        assert_eq!(updates.borrow().len(), 3);
        let changes = changes.borrow();
        assert_eq!(changes.len(), 2);
        let WindowEvent::VisibilityChange(second) = &changes[1] else {
            panic!("wrong event kind");
        };
        assert_eq!(second.added_node_ids, ids(&["g2_0"]));
        assert_eq!(second.removed_node_ids, ids(&["g0_0"]));
        assert_eq!(second.visible_node_ids, ids(&["g1_0", "g2_0"]));
    }

    #[test]
    fn update_event_carries_stats() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), [Edge::new("e", "g0_0", "g9_9")]);
        let updates = record(&mut m, EventKind::Update);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        let log = updates.borrow();
        let WindowEvent::Update(stats) = &log[0] else {
            panic!("wrong event kind");
        };
        assert_eq!(stats.total_nodes, 100);
        assert_eq!(stats.total_edges, 1);
        assert_eq!(stats.visible_nodes, 1);
        assert_eq!(stats.visible_edges, 1);
        assert_eq!(stats.update_count, 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let sub = m.on(EventKind::Update, move |_| *h.borrow_mut() += 1);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        assert!(m.off(sub));
        m.force_update();
        assert_eq!(*hits.borrow(), 1);
        assert!(!m.off(sub));
    }

    #[test]
    fn panicking_listener_is_isolated() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        m.on(EventKind::Update, |_| panic!("renderer crashed"));
        let updates = record(&mut m, EventKind::Update);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        assert_eq!(updates.borrow().len(), 1);
        assert_eq!(m.visible_node_ids(), ids(&["g0_0"]));
    }

    #[test]
    fn edges_follow_either_endpoint() {
        let mut m = WindowManager::with_options(opts(10));
        let edges = vec![
            Edge::new("in_in", "g0_0", "g1_0"),
            Edge::new("in_out", "g0_0", "g9_9"),
            Edge::new("out_in", "g9_9", "g1_0"),
            Edge::new("out_out", "g8_8", "g9_9"),
            Edge::new("dangling", "g0_0", "missing"),
        ];
        m.set_graph_data(grid(10, 10), edges);
        m.update_viewport(view(0.0, 0.0, 190.0, 90.0));
        m.force_update();
        assert_eq!(m.visible_edge_ids(), ids(&["in_in", "in_out", "out_in"]));
        assert!(m.is_edge_visible("in_out"));
        assert!(!m.is_edge_visible("out_out"));
        assert!(!m.is_edge_visible("dangling"));
        let names: Vec<String> = m
            .visible_edges()
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(names, vec!["in_in", "in_out", "out_in"]);
    }

    #[test]
    fn position_updates_wait_for_recompute() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        assert_eq!(m.visible_node_ids(), ids(&["g0_0"]));

        assert!(m.update_node_position("g5_5", 20.0, 20.0));
        assert!(!m.update_node_position("nope", 0.0, 0.0));
        // Data moved but visibility is unchanged until asked.
        assert_eq!(m.visible_node_ids(), ids(&["g0_0"]));
        m.force_update();
        assert_eq!(m.visible_node_ids(), ids(&["g0_0", "g5_5"]));
        assert_eq!(m.element("g5_5").map(|e| (e.x, e.y)), Some((20.0, 20.0)));
    }

    #[test]
    fn batch_position_updates() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), [Edge::new("e", "g9_9", "g8_8")]);
        let before = m.node_priority("g9_9");
        let moved = m.update_node_positions([
            PositionUpdate::new("g9_9", 10.0, 10.0),
            PositionUpdate::new("g8_8", 30.0, 30.0),
            PositionUpdate::new("ghost", 30.0, 30.0),
        ]);
        assert_eq!(moved, 2);
        assert_eq!(m.node_priority("g9_9"), before);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        assert_eq!(m.visible_node_ids(), ids(&["g0_0", "g8_8", "g9_9"]));
    }

    #[test]
    fn cursor_marks_nearby_visible_nodes() {
        let mut m = WindowManager::with_options(WindowOptions {
            priority_radius: 60.0,
            ..opts(10)
        });
        m.set_graph_data(grid(10, 10), []);
        m.update_viewport(view(0.0, 0.0, 290.0, 290.0));
        m.force_update();
        m.update_cursor_position(60.0, 60.0);
        assert_eq!(m.priority_node_ids(), ids(&["g0_0"]));
        assert!(m.is_node_priority("g0_0"));
        // Priority never adds to the visible set.
        m.update_cursor_position(650.0, 650.0);
        assert!(m.priority_node_ids().is_empty());
        assert_eq!(m.visible_node_ids().len(), 9);
    }

    #[test]
    fn set_options_recomputes_when_viewport_set() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        m.set_options(OptionsPatch {
            max_visible_nodes: Some(5),
            ..Default::default()
        });
        assert_eq!(m.stats().update_count, 0);
        m.update_viewport(view(0.0, 0.0, 990.0, 990.0));
        m.force_update();
        assert_eq!(m.visible_node_ids().len(), 5);
        m.set_options(OptionsPatch {
            max_visible_nodes: Some(1000),
            ..Default::default()
        });
        assert_eq!(m.visible_node_ids().len(), 100);
        assert_eq!(m.stats().update_count, 2);
    }

    #[test]
    fn new_graph_data_recomputes_current_viewport() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        assert_eq!(m.visible_node_ids(), ids(&["g0_0"]));
        assert_eq!(m.stats().update_count, 1);
        let changes = record(&mut m, EventKind::VisibilityChange);

        let mut data = grid(10, 10);
        data.retain(|e| e.id.as_str() != "g0_0");
        data.push(Element::new("x", 20.0, 20.0));
        m.set_graph_data(data, []);

        assert!(m.pending_update().is_none());
        assert_eq!(m.visible_node_ids(), ids(&["x"]));
        assert_eq!(m.stats().update_count, 2);
        let log = changes.borrow();
        assert_eq!(log.len(), 1);
        let WindowEvent::VisibilityChange(change) = &log[0] else {
            panic!("unexpected event {:?}", log[0]);
        };
        assert_eq!(change.added_node_ids, ids(&["x"]));
        assert_eq!(change.removed_node_ids, ids(&["g0_0"]));
        assert_eq!(change.visible_node_ids, ids(&["x"]));
    }

    #[test]
    fn negative_radius_loads_as_a_point() {
        let mut m = WindowManager::with_options(opts(1));
        m.set_graph_data(
            [
                Element::new("a", 0.0, 0.0).with_radius(-3.0),
                Element::new("b", 500.0, 500.0),
            ],
            [],
        );
        assert_eq!(m.node_priority("a"), Some(0.0));
        m.update_viewport(view(-10.0, -10.0, 20.0, 20.0));
        m.force_update();
        assert!(m.stats().windowing_active);
        assert_eq!(m.visible_node_ids(), ids(&["a"]));
    }

    #[test]
    fn disabling_prediction_forgets_history() {
        let mut m = WindowManager::with_options(WindowOptions {
            update_threshold: 1.0,
            ..Default::default()
        });
        let t0 = Instant::now();
        m.update_viewport_at(view(0.0, 0.0, 100.0, 100.0), t0);
        let t1 = t0 + Duration::from_millis(20);
        m.update_viewport_at(view(20.0, 0.0, 100.0, 100.0), t1);
        let here = Point::new(20.0, 0.0);
        assert_ne!(m.predicted_position(), Some(here));

        m.set_options(OptionsPatch {
            predictive_loading: Some(false),
            ..Default::default()
        });
        assert_eq!(m.predicted_position(), Some(here));
        let t2 = t1 + Duration::from_millis(20);
        m.update_viewport_at(view(40.0, 0.0, 100.0, 100.0), t2);
        assert_eq!(m.predicted_position(), Some(Point::new(40.0, 0.0)));
    }

    #[test]
    fn prediction_extrapolates_recent_motion() {
        let mut m = WindowManager::with_options(WindowOptions {
            update_threshold: 1.0,
            ..Default::default()
        });
        let t0 = Instant::now();
        m.update_viewport_at(view(0.0, 0.0, 100.0, 100.0), t0);
        assert_eq!(m.predicted_position(), Some(Point::new(0.0, 0.0)));
        let t1 = t0 + Duration::from_millis(20);
        m.update_viewport_at(view(20.0, 0.0, 100.0, 100.0), t1);
        let p = m.predicted_position().unwrap();
        assert!((p.x - 120.0).abs() < 1e-6, "{p:?}");
        assert!(p.y.abs() < 1e-6, "{p:?}");
    }

    #[test]
    fn clear_and_destroy() {
        let mut m = WindowManager::with_options(opts(10));
        m.set_graph_data(grid(10, 10), []);
        let updates = record(&mut m, EventKind::Update);
        m.update_viewport(view(0.0, 0.0, 90.0, 90.0));
        m.force_update();
        m.clear();
        assert!(m.visible_node_ids().is_empty());
        assert!(m.current_window().is_none());
        assert_eq!(m.element_count(), 0);
        assert_eq!(m.stats(), WindowStats::default());
        assert_eq!(m.listener_count(), 1);
        m.destroy();
        assert_eq!(m.listener_count(), 0);
        assert_eq!(updates.borrow().len(), 1);
    }
}
