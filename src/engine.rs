use eframe::egui::{Pos2, Vec2};
use log::{debug, info};

use crate::highlight::Highlight;
use crate::layout::{CanvasSize, LayoutConfig, Simulation, StepOutcome};
use crate::render::Scene;
use crate::skill::{Graph, Node};
use crate::store::GraphStore;

/// Upper bound on solver ticks per frame so a slow frame cannot snowball.
const MAX_TICKS_PER_ADVANCE: u32 = 4;
/// Longest frame gap fed into the tick accumulator.
const MAX_FRAME_SECONDS: f32 = 0.25;

/// Owns one graph's layout, scene and selection for a single canvas.
///
/// The host drives it through [`LayoutEngine::start`], [`LayoutEngine::resize`],
/// [`LayoutEngine::select`] and [`LayoutEngine::stop`], and calls
/// [`LayoutEngine::advance`] once per frame. Nothing runs between those calls.
pub struct LayoutEngine {
    config: LayoutConfig,
    store: GraphStore,
    size: CanvasSize,
    simulation: Option<Simulation>,
    scene: Scene,
    selected: Option<String>,
    highlight: Highlight,
    dragging: Option<usize>,
    accumulator: f32,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            store: GraphStore::default(),
            size: CanvasSize::default(),
            simulation: None,
            scene: Scene::default(),
            selected: None,
            highlight: Highlight::none(),
            dragging: None,
            accumulator: 0.0,
        }
    }

    /// Replaces the current graph wholesale and lays it out from scratch.
    /// The selection is cleared. A surface without area keeps the graph but
    /// defers the solver until [`LayoutEngine::resize`] supplies one.
    pub fn start(&mut self, graph: Graph, size: CanvasSize) {
        self.stop();
        self.store = GraphStore::build(graph);
        self.size = size;
        info!(
            "starting layout: {} nodes, {} edges, {} dangling",
            self.store.len(),
            self.store.edges().len(),
            self.store.dangling_count()
        );
        self.relayout();
    }

    /// Discards positions and lays the current graph out again for `size`.
    /// The selection survives and is reapplied to the new scene.
    pub fn resize(&mut self, size: CanvasSize) {
        if size == self.size && self.simulation.is_some() {
            return;
        }
        debug!("resizing layout to {}x{}", size.width, size.height);
        self.size = size;
        self.relayout();
    }

    /// Lays the current graph out again from its seeded start.
    pub fn restart(&mut self) {
        debug!("restarting layout");
        self.relayout();
    }

    /// Swaps solver settings and relayouts with them.
    pub fn reconfigure(&mut self, config: LayoutConfig) {
        if config == self.config {
            return;
        }
        self.config = config;
        self.relayout();
    }

    pub fn select(&mut self, id: Option<&str>) {
        if self.selected.as_deref() == id {
            return;
        }
        debug!("selection changed to {id:?}");
        self.selected = id.map(str::to_owned);
        self.highlight = Highlight::for_selection(&self.store, id);
        self.scene.restyle(&self.highlight);
    }

    /// Releases the solver and forgets the graph.
    pub fn stop(&mut self) {
        self.simulation = None;
        self.scene.clear();
        self.store = GraphStore::default();
        self.selected = None;
        self.highlight = Highlight::none();
        self.dragging = None;
        self.accumulator = 0.0;
    }

    fn relayout(&mut self) {
        self.dragging = None;
        self.accumulator = 0.0;
        if !self.size.has_area() {
            self.simulation = None;
            self.scene.clear();
            return;
        }

        let simulation = Simulation::new(&self.store, self.size, self.config.clone());
        self.highlight = Highlight::for_selection(&self.store, self.selected.as_deref());
        self.scene = Scene::build(&self.store, &simulation, &self.highlight);
        self.simulation = Some(simulation);
    }

    /// Feeds elapsed frame time to the fixed-rate solver and reprojects the
    /// scene. Returns whether the layout is still moving.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(simulation) = self.simulation.as_mut() else {
            return false;
        };
        if simulation.is_idle() {
            self.accumulator = 0.0;
            return false;
        }

        let tick = self.config.tick_seconds();
        self.accumulator += dt.clamp(0.0, MAX_FRAME_SECONDS);
        let mut ticks = 0;
        while self.accumulator >= tick && ticks < MAX_TICKS_PER_ADVANCE {
            self.accumulator -= tick;
            ticks += 1;
            if simulation.step() != StepOutcome::Moving {
                self.accumulator = 0.0;
                break;
            }
        }
        self.accumulator = self.accumulator.min(tick);

        if ticks > 0 {
            self.scene.project(simulation);
        }
        !simulation.is_idle()
    }

    /// Runs the solver synchronously until it idles. Returns the steps taken.
    pub fn settle(&mut self, max_steps: usize) -> usize {
        let Some(simulation) = self.simulation.as_mut() else {
            return 0;
        };
        let steps = simulation.run_to_rest(max_steps);
        self.scene.project(simulation);
        steps
    }

    pub fn node_at(&self, point: Pos2) -> Option<usize> {
        self.scene.node_at(point)
    }

    /// The node record under `point`, as delivered to click handlers.
    pub fn click(&self, point: Pos2) -> Option<&Node> {
        self.node_at(point).and_then(|index| self.store.node(index))
    }

    /// Pins `index` under the pointer and keeps the solver warm while the
    /// drag lasts.
    pub fn begin_drag(&mut self, index: usize, pointer: Pos2) -> bool {
        let Some(simulation) = self.simulation.as_mut() else {
            return false;
        };
        if simulation.node(index).is_none() {
            return false;
        }

        debug!("drag start on node {index}");
        simulation.pin(index, pointer.to_vec2());
        simulation.reheat(self.config.drag_alpha_target);
        self.dragging = Some(index);
        self.scene.project(simulation);
        true
    }

    pub fn drag_to(&mut self, pointer: Pos2) {
        let (Some(index), Some(simulation)) = (self.dragging, self.simulation.as_mut()) else {
            return;
        };
        simulation.pin(index, pointer.to_vec2());
        self.scene.project(simulation);
    }

    /// Unpins a dragged node; roots return to their baseline slot.
    pub fn end_drag(&mut self) {
        let (Some(index), Some(simulation)) = (self.dragging.take(), self.simulation.as_mut())
        else {
            return;
        };
        debug!("drag end on node {index}");
        simulation.release(index);
        simulation.cool_down();
        self.scene.project(simulation);
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    pub fn is_running(&self) -> bool {
        self.simulation
            .as_ref()
            .is_some_and(|simulation| !simulation.is_idle())
    }

    /// Current position of a node in canvas pixels.
    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.simulation
            .as_ref()
            .and_then(|simulation| simulation.node(index))
            .map(|node| node.position)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::{Category, Edge};

    fn chain() -> Graph {
        let node = |id: &str, category| Node {
            id: id.to_owned(),
            label: id.to_owned(),
            category,
            ..Node::default()
        };
        let edge = |source: &str, target: &str| Edge {
            source: source.to_owned(),
            target: target.to_owned(),
            relationship: "enables".to_owned(),
        };
        Graph {
            nodes: vec![
                node("A", Category::Root),
                node("B", Category::Skill),
                node("C", Category::Tool),
            ],
            links: vec![edge("A", "B"), edge("B", "C")],
        }
    }

    fn size() -> CanvasSize {
        CanvasSize::new(800.0, 600.0)
    }

    #[test]
    fn zero_area_holds_the_graph_without_a_solver() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), CanvasSize::new(0.0, 600.0));
        assert_eq!(engine.store().len(), 3);
        assert!(engine.simulation().is_none());
        assert!(engine.scene().is_empty());
        assert!(!engine.advance(1.0));

        engine.resize(size());
        assert!(engine.simulation().is_some());
        assert_eq!(engine.scene().nodes().len(), 3);
    }

    #[test]
    fn advance_runs_at_a_fixed_rate_with_a_per_frame_cap() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());

        assert!(engine.advance(1.0 / 120.0));
        assert_eq!(engine.simulation().map(Simulation::ticks), Some(0));
        engine.advance(1.0 / 120.0);
        assert_eq!(engine.simulation().map(Simulation::ticks), Some(1));

        engine.advance(10.0);
        assert_eq!(engine.simulation().map(Simulation::ticks), Some(5));
    }

    #[test]
    fn advancing_to_rest_goes_idle() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        let mut frames = 0;
        while engine.advance(1.0 / 15.0) {
            frames += 1;
            assert!(frames < 1_000, "layout never settled");
        }
        assert!(!engine.is_running());
        assert!(!engine.advance(1.0));
    }

    #[test]
    fn start_replaces_the_graph_and_clears_selection() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        engine.select(Some("B"));
        assert!(engine.highlight().is_active());

        let mut next = chain();
        next.nodes.truncate(1);
        next.links.clear();
        engine.start(next, size());
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.scene().nodes().len(), 1);
        assert!(engine.scene().edges().is_empty());
    }

    #[test]
    fn resize_relayouts_and_keeps_selection() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        engine.settle(2_000);
        engine.select(Some("C"));

        engine.resize(CanvasSize::new(1200.0, 900.0));
        let simulation = engine.simulation().expect("area is positive");
        assert_eq!(simulation.ticks(), 0);
        assert_eq!(engine.position(0), Some(Vec2::new(600.0, 800.0)));
        assert_eq!(engine.selected(), Some("C"));
        assert!(engine.scene().nodes()[0].opacity < 1.0);
    }

    #[test]
    fn restart_reproduces_the_seeded_layout() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        engine.settle(2_000);
        let settled = engine.simulation().map(|simulation| simulation.nodes().to_vec());

        engine.restart();
        assert_eq!(engine.simulation().map(Simulation::ticks), Some(0));
        engine.settle(2_000);
        assert_eq!(
            engine.simulation().map(|simulation| simulation.nodes().to_vec()),
            settled
        );
    }

    #[test]
    fn stop_discards_everything() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        engine.stop();
        assert!(engine.store().is_empty());
        assert!(engine.simulation().is_none());
        assert!(engine.scene().is_empty());
    }

    #[test]
    fn drag_pins_reheats_and_releases() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        engine.settle(2_000);
        assert!(!engine.is_running());

        let b = engine.store().index_of("B").unwrap();
        assert!(engine.begin_drag(b, Pos2::new(50.0, 60.0)));
        assert!(engine.is_running());
        engine.drag_to(Pos2::new(70.0, 80.0));
        for _ in 0..10 {
            engine.advance(1.0 / 60.0);
        }
        assert_eq!(engine.position(b), Some(Vec2::new(70.0, 80.0)));
        assert_eq!(engine.scene().nodes()[b].center, Pos2::new(70.0, 80.0));

        engine.end_drag();
        assert_eq!(engine.dragging(), None);
        let node = engine.simulation().and_then(|simulation| simulation.node(b));
        assert!(node.is_some_and(|node| node.pin.is_none()));
        engine.settle(5_000);
        assert!(!engine.is_running());
    }

    #[test]
    fn dragging_a_root_snaps_back_on_release() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        let anchor = engine.position(0);

        engine.begin_drag(0, Pos2::new(10.0, 10.0));
        engine.advance(1.0 / 60.0);
        engine.end_drag();
        assert_eq!(engine.position(0), anchor);
    }

    #[test]
    fn click_reports_the_node_record() {
        let mut engine = LayoutEngine::default();
        engine.start(chain(), size());
        let center = engine.scene().nodes()[0].center;

        assert_eq!(engine.click(center).map(|node| node.id.as_str()), Some("A"));
        assert!(engine.click(Pos2::new(-1_000.0, -1_000.0)).is_none());
    }

    #[test]
    fn drag_without_a_solver_is_ignored() {
        let mut engine = LayoutEngine::default();
        assert!(!engine.begin_drag(0, Pos2::ZERO));
        engine.drag_to(Pos2::new(1.0, 1.0));
        engine.end_drag();
        assert_eq!(engine.dragging(), None);
    }
}
