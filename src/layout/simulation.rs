use eframe::egui::{Vec2, vec2};
use log::debug;

use super::config::{CanvasSize, LayoutConfig, TierBands};
use super::forces::{
    ChargeParams, CollisionParams, charge_for_node, collision_pairs, tie_break_direction,
};
use super::placement::{SimNode, initial_placement};
use super::quadtree::QuadTree;
use super::tiers::{Tiers, assign_tiers};
use crate::store::GraphStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do; the layout is at rest.
    Idle,
    Moving,
    /// This step cooled the layout below the idle threshold.
    Settled,
}

#[derive(Clone, Copy, Debug)]
struct Spring {
    source: usize,
    target: usize,
    /// Share of the correction applied to the target; the busier endpoint
    /// moves less.
    bias: f32,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

/// Layered force layout over one graph. Positions are canvas pixels with y
/// growing downwards, so tier 0 sits near the bottom.
///
/// Each step cools `alpha` toward `alpha_target`; every force is scaled by
/// `alpha` except collision. Once `alpha` drops below `alpha_min` with no
/// target holding it up, the step resolves any remaining overlap and the
/// solver reports [`StepOutcome::Settled`] and then stays idle until reheated.
pub struct Simulation {
    nodes: Vec<SimNode>,
    springs: Vec<Spring>,
    tiers: Tiers,
    bands: TierBands,
    center_x: f32,
    config: LayoutConfig,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    ticks: u64,
    scratch: Scratch,
}

impl Simulation {
    pub fn new(store: &GraphStore, size: CanvasSize, config: LayoutConfig) -> Self {
        let tiers = assign_tiers(store);
        let nodes = initial_placement(store, &tiers, size, &config);
        let bands = TierBands::new(size, config.margin, tiers.max_tier());

        let mut degree = vec![0u32; nodes.len()];
        for edge in store.edges().iter().filter(|edge| !edge.is_self_loop()) {
            degree[edge.source] += 1;
            degree[edge.target] += 1;
        }
        let springs = store
            .edges()
            .iter()
            .filter(|edge| !edge.is_self_loop())
            .map(|edge| {
                let source = degree[edge.source] as f32;
                let target = degree[edge.target] as f32;
                Spring {
                    source: edge.source,
                    target: edge.target,
                    bias: source / (source + target),
                }
            })
            .collect();

        let alpha = if nodes.is_empty() { 0.0 } else { 1.0 };
        Self {
            alpha_decay: config.alpha_decay(),
            nodes,
            springs,
            tiers,
            bands,
            center_x: size.center_x(),
            config,
            alpha,
            alpha_target: 0.0,
            ticks: 0,
            scratch: Scratch::default(),
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub fn tiers(&self) -> &Tiers {
        &self.tiers
    }

    pub fn bands(&self) -> TierBands {
        self.bands
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn is_idle(&self) -> bool {
        self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes
            .iter()
            .filter(|node| !node.is_pinned())
            .map(|node| node.velocity.length_sq())
            .sum::<f32>()
            * 0.5
    }

    /// Keeps the solver warm at `target` until [`Simulation::cool_down`].
    pub fn reheat(&mut self, target: f32) {
        self.alpha_target = target.max(0.0);
        if self.alpha < self.alpha_target {
            self.alpha = self.alpha_target;
        }
    }

    pub fn cool_down(&mut self) {
        self.alpha_target = 0.0;
    }

    /// Restarts cooling from full energy.
    pub fn restart(&mut self) {
        if !self.nodes.is_empty() {
            self.alpha = 1.0;
        }
    }

    pub fn pin(&mut self, index: usize, at: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(at);
            node.position = at;
            node.velocity = Vec2::ZERO;
        }
    }

    /// Drops a transient pin. Roots fall back to their baseline anchor.
    pub fn release(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = node.anchor;
            if let Some(anchor) = node.anchor {
                node.position = anchor;
                node.velocity = Vec2::ZERO;
            }
        }
    }

    pub fn step(&mut self) -> StepOutcome {
        if self.is_idle() {
            return StepOutcome::Idle;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.apply_springs();
        self.apply_charge();
        for _ in 0..self.config.collision_passes.max(1) {
            self.apply_collision();
        }
        self.apply_tier_and_centering();
        self.integrate();
        self.ticks += 1;

        if self.is_idle() {
            debug!(
                "layout settled after {} ticks, residual energy {:.4}",
                self.ticks,
                self.kinetic_energy()
            );
            self.resolve_overlaps();
            return StepOutcome::Settled;
        }
        StepOutcome::Moving
    }

    /// Steps until idle or `max_steps` is exhausted; returns the steps taken.
    pub fn run_to_rest(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.step() != StepOutcome::Idle {
            steps += 1;
            if self.is_idle() {
                break;
            }
        }
        steps
    }

    fn apply_springs(&mut self) {
        let strength = self.config.link_strength * self.alpha;
        let distance = self.config.link_distance;
        for spring in &self.springs {
            let source = self.nodes[spring.source];
            let target = self.nodes[spring.target];
            let mut offset =
                (target.position + target.velocity) - (source.position + source.velocity);
            if offset.length_sq() <= 1.0e-12 {
                offset = tie_break_direction(spring.source, spring.target) * 1.0e-3;
            }
            let length = offset.length();
            let correction = offset * ((length - distance) / length * strength);

            self.nodes[spring.target].velocity -= correction * spring.bias;
            self.nodes[spring.source].velocity += correction * (1.0 - spring.bias);
        }
    }

    fn collect_positions(&mut self) {
        self.scratch.positions.clear();
        self.scratch
            .positions
            .extend(self.nodes.iter().map(|node| node.position));
    }

    fn apply_charge(&mut self) {
        if self.nodes.len() < 2 || self.config.charge_strength == 0.0 {
            return;
        }

        self.collect_positions();
        let Some(tree) = QuadTree::build(&self.scratch.positions) else {
            return;
        };
        let params = ChargeParams {
            strength: self.config.charge_strength,
            theta: self.config.charge_theta,
            distance_min_sq: self.config.charge_distance_min * self.config.charge_distance_min,
            alpha: self.alpha,
        };
        for index in 0..self.nodes.len() {
            let delta = charge_for_node(&tree, index, &self.scratch.positions, params);
            self.nodes[index].velocity += delta;
        }
    }

    fn apply_collision(&mut self) {
        if self.nodes.len() < 2 {
            return;
        }

        let padding = self.config.collision_padding;
        let scratch = &mut self.scratch;
        scratch.predicted.clear();
        scratch.radii.clear();
        let mut max_radius = 0.0_f32;
        for node in &self.nodes {
            scratch.predicted.push(node.position + node.velocity);
            let radius = node.radius + padding;
            max_radius = max_radius.max(radius);
            scratch.radii.push(radius);
        }

        let Some(tree) = QuadTree::build(&scratch.predicted) else {
            return;
        };
        scratch.deltas.clear();
        scratch.deltas.resize(self.nodes.len(), Vec2::ZERO);
        let reach = max_radius * 2.0;
        collision_pairs(
            &tree,
            &tree,
            true,
            &scratch.predicted,
            &scratch.radii,
            CollisionParams {
                strength: self.config.collision_strength,
                reach_sq: reach * reach,
            },
            &mut scratch.deltas,
        );

        for (node, delta) in self.nodes.iter_mut().zip(&scratch.deltas) {
            node.velocity += *delta;
        }
    }

    fn apply_tier_and_centering(&mut self) {
        let tier_pull = self.config.tier_strength * self.alpha;
        let center_pull = self.config.center_strength * self.alpha;
        for node in &mut self.nodes {
            let target_y = self.bands.y_for(node.tier);
            node.velocity.y += (target_y - node.position.y) * tier_pull;
            node.velocity.x += (self.center_x - node.position.x) * center_pull;
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.config.velocity_decay.clamp(0.0, 1.0);
        for node in &mut self.nodes {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= keep;
            node.position += node.velocity;
            if !(node.position.x.is_finite() && node.position.y.is_finite()) {
                node.position = vec2(self.center_x, self.bands.y_for(node.tier));
                node.velocity = Vec2::ZERO;
            }
        }
    }

    /// Direct positional separation of overlapping bodies, run once the
    /// velocity solver has cooled. Pinned nodes never move.
    fn resolve_overlaps(&mut self) {
        let padding = self.config.collision_padding;
        let node_count = self.nodes.len();
        for _ in 0..self.config.settle_passes {
            let mut moved = false;
            for first in 0..node_count {
                for second in (first + 1)..node_count {
                    let (a, b) = (self.nodes[first], self.nodes[second]);
                    if a.is_pinned() && b.is_pinned() {
                        continue;
                    }

                    let reach = a.radius + b.radius + padding * 2.0;
                    let offset = a.position - b.position;
                    let distance = offset.length();
                    if distance >= reach - 1.0e-3 {
                        continue;
                    }

                    let direction = if distance > 1.0e-4 {
                        offset / distance
                    } else {
                        tie_break_direction(first, second)
                    };
                    let overlap = reach - distance;
                    let (share_a, share_b) = if a.is_pinned() {
                        (0.0, 1.0)
                    } else if b.is_pinned() {
                        (1.0, 0.0)
                    } else {
                        let a_sq = a.radius * a.radius;
                        let b_sq = b.radius * b.radius;
                        (b_sq / (a_sq + b_sq), a_sq / (a_sq + b_sq))
                    };

                    self.nodes[first].position += direction * (overlap * share_a);
                    self.nodes[second].position -= direction * (overlap * share_b);
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }

        for node in &mut self.nodes {
            node.velocity = Vec2::ZERO;
        }
    }
}
