use std::collections::VecDeque;

use crate::store::GraphStore;

/// Tier given to nodes no root can reach.
pub const UNREACHED_TIER: u32 = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tiers {
    tiers: Vec<u32>,
    reached: Vec<bool>,
    max_tier: u32,
}

impl Tiers {
    pub fn get(&self, index: usize) -> u32 {
        self.tiers.get(index).copied().unwrap_or(UNREACHED_TIER)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.tiers
    }

    /// Largest assigned tier, never below 1.
    pub fn max_tier(&self) -> u32 {
        self.max_tier
    }

    pub fn is_reached(&self, index: usize) -> bool {
        self.reached.get(index).copied().unwrap_or(false)
    }
}

/// Breadth-first hop distance from the nearest root, following edges from
/// source to target. The first visit wins, so cycles terminate.
pub fn assign_tiers(store: &GraphStore) -> Tiers {
    let node_count = store.len();
    let mut levels: Vec<Option<u32>> = vec![None; node_count];
    let mut queue = VecDeque::new();

    for root in store.root_indices() {
        levels[root] = Some(0);
        queue.push_back((root, 0u32));
    }

    while let Some((node, level)) = queue.pop_front() {
        for &edge_index in store.outgoing(node) {
            let target = store.edges()[edge_index].target;
            if levels[target].is_none() {
                levels[target] = Some(level + 1);
                queue.push_back((target, level + 1));
            }
        }
    }

    let reached = levels.iter().map(Option::is_some).collect::<Vec<_>>();
    let tiers = levels
        .into_iter()
        .map(|level| level.unwrap_or(UNREACHED_TIER))
        .collect::<Vec<_>>();
    let max_tier = tiers.iter().copied().max().unwrap_or(0).max(1);

    Tiers {
        tiers,
        reached,
        max_tier,
    }
}
