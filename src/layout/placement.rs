use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{CanvasSize, LayoutConfig, TierBands};
use super::tiers::Tiers;
use crate::store::GraphStore;

/// Per-node solver state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimNode {
    pub position: Vec2,
    pub velocity: Vec2,
    /// While set, the solver holds the node exactly here.
    pub pin: Option<Vec2>,
    /// Permanent baseline slot of a root node.
    pub anchor: Option<Vec2>,
    pub tier: u32,
    /// Drawn radius; collision adds padding.
    pub radius: f32,
}

impl SimNode {
    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

/// Seeds start positions: roots sorted by label on an evenly spaced baseline
/// and pinned there, everything else on its tier's height around the
/// horizontal center with seeded jitter.
pub fn initial_placement(
    store: &GraphStore,
    tiers: &Tiers,
    size: CanvasSize,
    config: &LayoutConfig,
) -> Vec<SimNode> {
    let bands = TierBands::new(size, config.margin, tiers.max_tier());
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut roots = store.root_indices().collect::<Vec<_>>();
    roots.sort_by(|&a, &b| {
        let (a, b) = (&store.nodes()[a], &store.nodes()[b]);
        a.display_label()
            .cmp(b.display_label())
            .then_with(|| a.id.cmp(&b.id))
    });
    let spacing = size.width / (roots.len() as f32 + 1.0);

    let mut nodes = store
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let tier = tiers.get(index);
            SimNode {
                position: vec2(size.center_x(), bands.y_for(tier)),
                velocity: Vec2::ZERO,
                pin: None,
                anchor: None,
                tier,
                radius: node.category.radius(),
            }
        })
        .collect::<Vec<_>>();

    for (slot, &root) in roots.iter().enumerate() {
        let anchor = vec2(spacing * (slot as f32 + 1.0), bands.bottom);
        let node = &mut nodes[root];
        node.position = anchor;
        node.pin = Some(anchor);
        node.anchor = Some(anchor);
    }

    let jitter = config.jitter.abs();
    for node in nodes.iter_mut().filter(|node| node.anchor.is_none()) {
        if jitter > 0.0 {
            node.position.x += rng.gen_range(-jitter..jitter);
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tiers::assign_tiers;
    use crate::skill::{Category, Edge, Graph, Node};

    fn store() -> GraphStore {
        let node = |id: &str, label: &str, category| Node {
            id: id.to_owned(),
            label: label.to_owned(),
            category,
            ..Node::default()
        };
        GraphStore::build(Graph {
            nodes: vec![
                node("r-zeta", "Zeta", Category::Root),
                node("a", "Skill A", Category::Skill),
                node("r-alpha", "Alpha", Category::Root),
                node("b", "Tool B", Category::Tool),
                node("r-mid", "Mid", Category::Root),
            ],
            links: vec![
                Edge {
                    source: "r-zeta".to_owned(),
                    target: "a".to_owned(),
                    relationship: String::new(),
                },
                Edge {
                    source: "a".to_owned(),
                    target: "b".to_owned(),
                    relationship: String::new(),
                },
            ],
        })
    }

    #[test]
    fn roots_are_sorted_by_label_and_evenly_spaced_on_the_baseline() {
        let store = store();
        let tiers = assign_tiers(&store);
        let size = CanvasSize::new(800.0, 600.0);
        let nodes = initial_placement(&store, &tiers, size, &LayoutConfig::default());

        let alpha = nodes[store.index_of("r-alpha").unwrap()];
        let mid = nodes[store.index_of("r-mid").unwrap()];
        let zeta = nodes[store.index_of("r-zeta").unwrap()];
        assert_eq!(alpha.position, vec2(200.0, 500.0));
        assert_eq!(mid.position, vec2(400.0, 500.0));
        assert_eq!(zeta.position, vec2(600.0, 500.0));
        for root in [alpha, mid, zeta] {
            assert_eq!(root.pin, Some(root.position));
            assert_eq!(root.anchor, Some(root.position));
            assert_eq!(root.tier, 0);
        }
    }

    #[test]
    fn other_nodes_start_on_their_tier_height_within_jitter() {
        let store = store();
        let tiers = assign_tiers(&store);
        let size = CanvasSize::new(800.0, 600.0);
        let nodes = initial_placement(&store, &tiers, size, &LayoutConfig::default());

        let a = nodes[store.index_of("a").unwrap()];
        let b = nodes[store.index_of("b").unwrap()];
        assert_eq!(a.position.y, 300.0);
        assert_eq!(b.position.y, 100.0);
        for node in [a, b] {
            assert!(node.pin.is_none());
            assert!((node.position.x - 400.0).abs() <= 150.0);
        }
    }

    #[test]
    fn same_seed_reproduces_jitter_and_other_seeds_differ() {
        let store = store();
        let tiers = assign_tiers(&store);
        let size = CanvasSize::new(800.0, 600.0);
        let config = LayoutConfig::default();
        let first = initial_placement(&store, &tiers, size, &config);
        let second = initial_placement(&store, &tiers, size, &config);
        assert_eq!(first, second);

        let reseeded = LayoutConfig {
            seed: config.seed + 1,
            ..config
        };
        let third = initial_placement(&store, &tiers, size, &reseeded);
        assert_ne!(first, third);
    }

    #[test]
    fn zero_jitter_starts_on_the_center_line() {
        let store = store();
        let tiers = assign_tiers(&store);
        let config = LayoutConfig {
            jitter: 0.0,
            ..LayoutConfig::default()
        };
        let nodes = initial_placement(&store, &tiers, CanvasSize::new(640.0, 480.0), &config);
        assert_eq!(nodes[store.index_of("a").unwrap()].position.x, 320.0);
    }

    #[test]
    fn radii_follow_category() {
        let store = store();
        let tiers = assign_tiers(&store);
        let nodes = initial_placement(
            &store,
            &tiers,
            CanvasSize::new(800.0, 600.0),
            &LayoutConfig::default(),
        );
        assert_eq!(nodes[0].radius, Category::Root.radius());
        assert_eq!(nodes[1].radius, Category::Skill.radius());
    }
}
