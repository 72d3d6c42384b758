use std::collections::HashSet;

use crate::store::GraphStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// No selection: drawn with default styling.
    Normal,
    /// Part of the selection's neighborhood.
    Active,
    /// Outside the neighborhood: faded but never hidden.
    Dimmed,
}

/// Partition of nodes and edges induced by the current selection. Derived
/// from the store and the selected id alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    selected: Option<usize>,
    active_nodes: HashSet<usize>,
    active_edges: HashSet<usize>,
}

impl Highlight {
    pub fn none() -> Self {
        Self::default()
    }

    /// An id the store does not know behaves like no selection.
    pub fn for_selection(store: &GraphStore, selected_id: Option<&str>) -> Self {
        let Some(selected) = selected_id.and_then(|id| store.index_of(id)) else {
            return Self::none();
        };

        let mut active_nodes = HashSet::from([selected]);
        let mut active_edges = HashSet::new();
        collect_touching(store, store.outgoing(selected), &mut active_nodes, &mut active_edges);
        collect_touching(store, store.incoming(selected), &mut active_nodes, &mut active_edges);

        Self {
            selected: Some(selected),
            active_nodes,
            active_edges,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }

    pub fn active_nodes(&self) -> &HashSet<usize> {
        &self.active_nodes
    }

    pub fn active_edges(&self) -> &HashSet<usize> {
        &self.active_edges
    }

    pub fn node(&self, index: usize) -> Emphasis {
        self.classify(self.active_nodes.contains(&index))
    }

    pub fn edge(&self, edge_index: usize) -> Emphasis {
        self.classify(self.active_edges.contains(&edge_index))
    }

    fn classify(&self, member: bool) -> Emphasis {
        match (self.selected.is_some(), member) {
            (false, _) => Emphasis::Normal,
            (true, true) => Emphasis::Active,
            (true, false) => Emphasis::Dimmed,
        }
    }
}

fn collect_touching(
    store: &GraphStore,
    edge_indices: &[usize],
    active_nodes: &mut HashSet<usize>,
    active_edges: &mut HashSet<usize>,
) {
    for &edge_index in edge_indices {
        let edge = store.edges()[edge_index];
        active_edges.insert(edge_index);
        active_nodes.insert(edge.source);
        active_nodes.insert(edge.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::{Category, Edge, Graph, Node};

    fn store(ids: &[&str], links: &[(&str, &str)]) -> GraphStore {
        GraphStore::build(Graph {
            nodes: ids
                .iter()
                .enumerate()
                .map(|(index, id)| Node {
                    id: (*id).to_owned(),
                    label: (*id).to_owned(),
                    category: if index == 0 {
                        Category::Root
                    } else {
                        Category::Skill
                    },
                    ..Node::default()
                })
                .collect(),
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

    fn ids(store: &GraphStore, indices: &HashSet<usize>) -> Vec<String> {
        let mut ids = indices
            .iter()
            .map(|&index| store.nodes()[index].id.clone())
            .collect::<Vec<_>>();
        ids.sort();
        ids
    }

    #[test]
    fn middle_of_chain_activates_both_neighbors() {
        let store = store(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let highlight = Highlight::for_selection(&store, Some("B"));

        assert_eq!(ids(&store, highlight.active_nodes()), vec!["A", "B", "C"]);
        assert_eq!(highlight.active_edges().len(), 2);
        assert_eq!(highlight.node(store.index_of("A").unwrap()), Emphasis::Active);
    }

    #[test]
    fn leaf_selection_dims_everything_else() {
        let store = store(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let highlight = Highlight::for_selection(&store, Some("C"));

        assert_eq!(ids(&store, highlight.active_nodes()), vec!["B", "C"]);
        assert_eq!(highlight.node(store.index_of("A").unwrap()), Emphasis::Dimmed);
        assert_eq!(highlight.edge(0), Emphasis::Dimmed);
        assert_eq!(highlight.edge(1), Emphasis::Active);
    }

    #[test]
    fn isolated_nodes_are_never_active_for_other_selections() {
        let store = store(&["A", "B", "X"], &[("A", "B")]);
        let highlight = Highlight::for_selection(&store, Some("A"));
        assert!(!highlight.active_nodes().contains(&store.index_of("X").unwrap()));

        let lonely = Highlight::for_selection(&store, Some("X"));
        assert_eq!(ids(&store, lonely.active_nodes()), vec!["X"]);
        assert!(lonely.active_edges().is_empty());
    }

    #[test]
    fn clearing_or_unknown_selection_resets_to_normal() {
        let store = store(&["A", "B"], &[("A", "B")]);
        for highlight in [
            Highlight::for_selection(&store, None),
            Highlight::for_selection(&store, Some("ghost")),
        ] {
            assert!(!highlight.is_active());
            assert_eq!(highlight.node(0), Emphasis::Normal);
            assert_eq!(highlight.node(1), Emphasis::Normal);
            assert_eq!(highlight.edge(0), Emphasis::Normal);
        }
    }

    #[test]
    fn self_loops_and_parallel_edges_are_all_active() {
        let store = store(&["A", "B"], &[("A", "B"), ("A", "B"), ("B", "B")]);
        let highlight = Highlight::for_selection(&store, Some("B"));
        assert_eq!(highlight.active_edges().len(), 3);
        assert_eq!(ids(&store, highlight.active_nodes()), vec!["A", "B"]);
    }

    #[test]
    fn recomputation_is_pure() {
        let store = store(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        assert_eq!(
            Highlight::for_selection(&store, Some("C")),
            Highlight::for_selection(&store, Some("C"))
        );
    }
}
