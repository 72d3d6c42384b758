use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadTree;

/// Unit direction used when two points coincide, stable per pair.
pub(super) fn tie_break_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214 + 0.11) * TAU;
    vec2(angle.cos(), angle.sin())
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
    pub(super) alpha: f32,
}

fn charge_pull(offset: Vec2, weight: f32, params: ChargeParams, index: usize, other: usize) -> Vec2 {
    let mut offset = offset;
    let mut distance_sq = offset.length_sq();
    if distance_sq <= 1.0e-12 {
        let direction = if index < other {
            tie_break_direction(index, other)
        } else {
            -tie_break_direction(other, index)
        };
        offset = direction * 1.0e-3;
        distance_sq = offset.length_sq();
    }
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    offset * (params.strength * weight * params.alpha / distance_sq)
}

/// Many-body velocity change for one node. `offset` points from the node to
/// the other body, so a negative strength pushes away.
pub(super) fn charge_for_node(
    tree: &QuadTree,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
) -> Vec2 {
    if tree.count <= 0.0 {
        return Vec2::ZERO;
    }

    let point = positions[index];
    if tree.is_leaf() {
        return tree
            .items
            .iter()
            .filter(|&&other| other != index)
            .fold(Vec2::ZERO, |sum, &other| {
                sum + charge_pull(positions[other] - point, 1.0, params, index, other)
            });
    }

    let offset = tree.centroid - point;
    let distance = offset.length().max(1.0e-4);
    let far_enough = !tree.cell.contains(point)
        && tree.cell.width() / distance < params.theta
        && tree.count > 1.0;
    if far_enough {
        return charge_pull(offset, tree.count, params, index, usize::MAX);
    }

    tree.children()
        .map(|child| charge_for_node(child, index, positions, params))
        .fold(Vec2::ZERO, |sum, delta| sum + delta)
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) reach_sq: f32,
}

fn push_apart(
    first: usize,
    second: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = radii[first] + radii[second];
    let offset = predicted[first] - predicted[second];
    let distance_sq = offset.length_sq();
    if distance_sq >= reach * reach {
        return;
    }

    let distance = distance_sq.sqrt();
    let direction = if distance > 1.0e-4 {
        offset / distance
    } else {
        tie_break_direction(first, second)
    };
    let push = direction * ((reach - distance) * strength);

    // Larger bodies move less.
    let first_sq = radii[first] * radii[first];
    let second_sq = radii[second] * radii[second];
    let total = (first_sq + second_sq).max(1.0e-6);
    deltas[first] += push * (second_sq / total);
    deltas[second] -= push * (first_sq / total);
}

/// Visits every pair of overlapping bodies once, pruning cell pairs that are
/// further apart than any two bodies can reach.
pub(super) fn collision_pairs(
    left: &QuadTree,
    right: &QuadTree,
    same: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    if left.cell.gap_sq(right.cell) > params.reach_sq {
        return;
    }

    if left.is_leaf() && right.is_leaf() {
        if same {
            for (offset, &first) in left.items.iter().enumerate() {
                for &second in &left.items[offset + 1..] {
                    push_apart(first, second, predicted, radii, params.strength, deltas);
                }
            }
        } else {
            for &first in &left.items {
                for &second in &right.items {
                    push_apart(first, second, predicted, radii, params.strength, deltas);
                }
            }
        }
        return;
    }

    if same {
        let children = left.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            collision_pairs(child, child, true, predicted, radii, params, deltas);
            for other in &children[offset + 1..] {
                collision_pairs(child, other, false, predicted, radii, params, deltas);
            }
        }
        return;
    }

    let split_left = if left.is_leaf() {
        false
    } else if right.is_leaf() {
        true
    } else {
        left.cell.half_extent >= right.cell.half_extent
    };

    if split_left {
        for child in left.children() {
            collision_pairs(child, right, false, predicted, radii, params, deltas);
        }
    } else {
        for child in right.children() {
            collision_pairs(left, child, false, predicted, radii, params, deltas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_charge_pushes_nodes_apart() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let tree = QuadTree::build(&positions).unwrap();
        let params = ChargeParams {
            strength: -400.0,
            theta: 0.9,
            distance_min_sq: 1.0,
            alpha: 1.0,
        };

        let left = charge_for_node(&tree, 0, &positions, params);
        let right = charge_for_node(&tree, 1, &positions, params);
        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left + right).length() < 1.0e-4);
    }

    #[test]
    fn coincident_nodes_still_separate() {
        let positions = vec![vec2(5.0, 5.0), vec2(5.0, 5.0)];
        let radii = vec![10.0, 10.0];
        let tree = QuadTree::build(&positions).unwrap();
        let mut deltas = vec![Vec2::ZERO; 2];
        collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &radii,
            CollisionParams {
                strength: 1.0,
                reach_sq: 400.0,
            },
            &mut deltas,
        );

        assert!(deltas[0].length() > 1.0);
        assert!((deltas[0] + deltas[1]).length() < 1.0e-4);
    }

    #[test]
    fn separated_bodies_are_left_alone() {
        let positions = vec![vec2(0.0, 0.0), vec2(100.0, 0.0)];
        let radii = vec![10.0, 10.0];
        let tree = QuadTree::build(&positions).unwrap();
        let mut deltas = vec![Vec2::ZERO; 2];
        collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &radii,
            CollisionParams {
                strength: 1.0,
                reach_sq: 400.0,
            },
            &mut deltas,
        );
        assert_eq!(deltas, vec![Vec2::ZERO; 2]);
    }

    #[test]
    fn heavier_body_moves_less() {
        let positions = vec![vec2(0.0, 0.0), vec2(20.0, 0.0)];
        let radii = vec![30.0, 10.0];
        let mut deltas = vec![Vec2::ZERO; 2];
        push_apart(0, 1, &positions, &radii, 1.0, &mut deltas);
        assert!(deltas[0].length() < deltas[1].length());
    }
}
