use eframe::egui::{Color32, Pos2, Vec2, vec2};

use crate::highlight::{Emphasis, Highlight};
use crate::layout::Simulation;
use crate::skill::Category;
use crate::store::GraphStore;

pub const NODE_FILL: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);
pub const LABEL_COLOR: Color32 = Color32::from_rgb(0xe2, 0xe8, 0xf0);
pub const EDGE_COLOR: Color32 = Color32::from_rgb(0x64, 0x74, 0x8b);
pub const EDGE_ACTIVE_COLOR: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);

pub const DIMMED_NODE_OPACITY: f32 = 0.1;
pub const DIMMED_EDGE_OPACITY: f32 = 0.05;
/// Duration of opacity and stroke transitions after a selection change.
pub const TRANSITION_SECONDS: f32 = 0.3;

pub const LABEL_GAP: f32 = 18.0;
pub const LABEL_SIZE: f32 = 12.0;

const EDGE_WIDTH: f32 = 2.0;
const EDGE_ACTIVE_WIDTH: f32 = 3.0;
const ARROW_LENGTH: f32 = 10.0;
const ARROW_HALF_WIDTH: f32 = 5.0;

pub fn category_color(category: Category) -> Color32 {
    match category {
        Category::Root => Color32::from_rgb(0xf9, 0x73, 0x16),
        Category::Tool => Color32::from_rgb(0xfb, 0xbf, 0x24),
        Category::Infrastructure => Color32::from_rgb(0x22, 0xd3, 0xee),
        Category::Concept => Color32::from_rgb(0xa8, 0x55, 0xf7),
        Category::Skill => Color32::from_rgb(0xf4, 0x3f, 0x5e),
        Category::Unknown => Color32::from_rgb(0x94, 0xa3, 0xb8),
    }
}

fn glyph_size(category: Category) -> f32 {
    if category.is_root() { 18.0 } else { 14.0 }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
    /// Index into the store's node list.
    pub node: usize,
    pub label: String,
    pub glyph: &'static str,
    pub glyph_size: f32,
    pub center: Pos2,
    pub radius: f32,
    pub stroke: Color32,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl NodeSprite {
    pub fn label_anchor(&self) -> Pos2 {
        self.center + vec2(0.0, self.radius + LABEL_GAP)
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.center.distance_sq(point) <= self.radius * self.radius
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSprite {
    /// Index into the store's resolved edges.
    pub edge: usize,
    pub source: usize,
    pub target: usize,
    pub from: Pos2,
    /// Where the arrowhead tip touches the target's outline.
    pub to: Pos2,
    /// Tip followed by the two back corners, empty for self-loops and
    /// coincident endpoints.
    pub arrow: Option<[Pos2; 3]>,
    pub color: Color32,
    pub width: f32,
    pub opacity: f32,
}

impl EdgeSprite {
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Retained drawing primitives for one graph. Rebuilt when the graph is
/// replaced, re-projected after every solver step and restyled on selection
/// changes, so each concern touches only its own fields.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<NodeSprite>,
    edges: Vec<EdgeSprite>,
}

impl Scene {
    pub fn build(store: &GraphStore, simulation: &Simulation, highlight: &Highlight) -> Self {
        let nodes = store
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| NodeSprite {
                node: index,
                label: node.display_label().to_owned(),
                glyph: node.category.glyph(),
                glyph_size: glyph_size(node.category),
                center: Pos2::ZERO,
                radius: node.category.radius(),
                stroke: category_color(node.category),
                stroke_width: if node.category.is_root() { 4.0 } else { 2.0 },
                opacity: 1.0,
            })
            .collect();
        let edges = store
            .edges()
            .iter()
            .enumerate()
            .map(|(index, edge)| EdgeSprite {
                edge: index,
                source: edge.source,
                target: edge.target,
                from: Pos2::ZERO,
                to: Pos2::ZERO,
                arrow: None,
                color: EDGE_COLOR,
                width: EDGE_WIDTH,
                opacity: 1.0,
            })
            .collect();

        let mut scene = Self { nodes, edges };
        scene.project(simulation);
        scene.restyle(highlight);
        scene
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeSprite] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeSprite] {
        &self.edges
    }

    /// Copies current solver positions into the primitives. Styling is left
    /// untouched.
    pub fn project(&mut self, simulation: &Simulation) {
        for sprite in &mut self.nodes {
            if let Some(node) = simulation.node(sprite.node) {
                sprite.center = node.position.to_pos2();
            }
        }

        for sprite in &mut self.edges {
            let (Some(source), Some(target)) =
                (self.nodes.get(sprite.source), self.nodes.get(sprite.target))
            else {
                continue;
            };
            let offset = target.center - source.center;
            let distance = offset.length();
            if sprite.source == sprite.target || distance <= source.radius + target.radius {
                sprite.from = source.center;
                sprite.to = target.center;
                sprite.arrow = None;
                continue;
            }

            let direction = offset / distance;
            sprite.from = source.center + direction * source.radius;
            sprite.to = target.center - direction * target.radius;
            sprite.arrow = Some(arrowhead(sprite.to, direction));
        }
    }

    /// Applies a selection partition. Geometry is left untouched.
    pub fn restyle(&mut self, highlight: &Highlight) {
        for sprite in &mut self.nodes {
            sprite.opacity = match highlight.node(sprite.node) {
                Emphasis::Dimmed => DIMMED_NODE_OPACITY,
                Emphasis::Normal | Emphasis::Active => 1.0,
            };
        }

        for sprite in &mut self.edges {
            let (color, width, opacity) = match highlight.edge(sprite.edge) {
                Emphasis::Normal => (EDGE_COLOR, EDGE_WIDTH, 1.0),
                Emphasis::Active => (EDGE_ACTIVE_COLOR, EDGE_ACTIVE_WIDTH, 1.0),
                Emphasis::Dimmed => (EDGE_COLOR, EDGE_WIDTH, DIMMED_EDGE_OPACITY),
            };
            sprite.color = color;
            sprite.width = width;
            sprite.opacity = opacity;
        }
    }

    /// Topmost node under `point`. Later nodes are drawn above earlier ones.
    pub fn node_at(&self, point: Pos2) -> Option<usize> {
        self.nodes
            .iter()
            .rev()
            .find(|sprite| sprite.contains(point))
            .map(|sprite| sprite.node)
    }
}

fn arrowhead(tip: Pos2, direction: Vec2) -> [Pos2; 3] {
    let back = tip - direction * ARROW_LENGTH;
    let normal = vec2(-direction.y, direction.x) * ARROW_HALF_WIDTH;
    [tip, back + normal, back - normal]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CanvasSize, LayoutConfig};
    use crate::skill::{Edge, Graph, Node};

    fn store(links: &[(&str, &str)]) -> GraphStore {
        let node = |id: &str, category| Node {
            id: id.to_owned(),
            label: id.to_owned(),
            category,
            ..Node::default()
        };
        GraphStore::build(Graph {
            nodes: vec![
                node("A", Category::Root),
                node("B", Category::Skill),
                node("C", Category::Tool),
            ],
            links: links
                .iter()
                .map(|(source, target)| Edge {
                    source: (*source).to_owned(),
                    target: (*target).to_owned(),
                    relationship: String::new(),
                })
                .collect(),
        })
    }

    fn simulation(store: &GraphStore) -> Simulation {
        Simulation::new(store, CanvasSize::new(800.0, 600.0), LayoutConfig::default())
    }

    #[test]
    fn build_styles_nodes_by_category() {
        let store = store(&[("A", "B")]);
        let scene = Scene::build(&store, &simulation(&store), &Highlight::none());

        let root = &scene.nodes()[0];
        assert_eq!(root.stroke, category_color(Category::Root));
        assert_eq!(root.stroke_width, 4.0);
        assert_eq!(root.radius, 35.0);
        assert_eq!(root.glyph_size, 18.0);
        assert_eq!(scene.nodes()[1].stroke_width, 2.0);
        assert_eq!(root.label_anchor(), root.center + vec2(0.0, 53.0));
    }

    #[test]
    fn dangling_edges_never_reach_the_scene() {
        let store = store(&[("A", "B"), ("B", "ghost"), ("B", "C")]);
        let scene = Scene::build(&store, &simulation(&store), &Highlight::none());
        assert_eq!(scene.edges().len(), 2);
        assert_eq!(scene.edges()[1].target, 2);
    }

    #[test]
    fn edges_run_between_outlines_with_an_arrow_at_the_target() {
        let store = store(&[("A", "B")]);
        let scene = Scene::build(&store, &simulation(&store), &Highlight::none());
        let edge = &scene.edges()[0];
        let (a, b) = (&scene.nodes()[0], &scene.nodes()[1]);

        assert!((edge.from.distance(a.center) - a.radius).abs() < 1.0e-3);
        assert!((edge.to.distance(b.center) - b.radius).abs() < 1.0e-3);
        let arrow = edge.arrow.expect("separated endpoints get an arrow");
        assert_eq!(arrow[0], edge.to);
    }

    #[test]
    fn projection_follows_the_solver_without_touching_style() {
        let store = store(&[("A", "B"), ("B", "C")]);
        let mut simulation = simulation(&store);
        let highlight = Highlight::for_selection(&store, Some("A"));
        let mut scene = Scene::build(&store, &simulation, &highlight);
        let styled = scene.nodes()[2].opacity;

        for _ in 0..10 {
            simulation.step();
        }
        scene.project(&simulation);
        assert_eq!(scene.nodes()[2].center, simulation.nodes()[2].position.to_pos2());
        assert_eq!(scene.nodes()[2].opacity, styled);
    }

    #[test]
    fn restyle_dims_and_emphasizes_then_resets() {
        let store = store(&[("A", "B"), ("B", "C")]);
        let simulation = simulation(&store);
        let mut scene = Scene::build(&store, &simulation, &Highlight::none());
        let before = scene.nodes()[0].center;

        scene.restyle(&Highlight::for_selection(&store, Some("C")));
        assert_eq!(scene.nodes()[0].opacity, DIMMED_NODE_OPACITY);
        assert_eq!(scene.nodes()[1].opacity, 1.0);
        assert_eq!(scene.edges()[0].opacity, DIMMED_EDGE_OPACITY);
        assert_eq!(scene.edges()[0].color, EDGE_COLOR);
        assert_eq!(scene.edges()[1].color, EDGE_ACTIVE_COLOR);
        assert_eq!(scene.edges()[1].width, 3.0);
        assert_eq!(scene.nodes()[0].center, before);

        scene.restyle(&Highlight::none());
        assert!(scene.nodes().iter().all(|node| node.opacity == 1.0));
        assert!(scene.edges().iter().all(|edge| edge.opacity == 1.0 && edge.width == 2.0));
    }

    #[test]
    fn self_loops_have_no_arrow() {
        let store = store(&[("B", "B")]);
        let scene = Scene::build(&store, &simulation(&store), &Highlight::none());
        assert!(scene.edges()[0].is_loop());
        assert!(scene.edges()[0].arrow.is_none());
    }

    #[test]
    fn hit_testing_prefers_the_topmost_node() {
        let store = store(&[]);
        let mut simulation = simulation(&store);
        simulation.pin(1, vec2(100.0, 100.0));
        simulation.pin(2, vec2(110.0, 100.0));
        let scene = Scene::build(&store, &simulation, &Highlight::none());

        assert_eq!(scene.node_at(Pos2::new(105.0, 100.0)), Some(2));
        assert_eq!(scene.node_at(Pos2::new(85.0, 100.0)), Some(1));
        assert_eq!(scene.node_at(Pos2::new(-500.0, -500.0)), None);
    }
}
