use std::collections::HashMap;

use log::warn;

use crate::skill::{Edge, Graph, Node};

/// An edge whose endpoints both exist, as node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedEdge {
    /// Position of the edge in the caller's `links` array.
    pub link: usize,
    pub source: usize,
    pub target: usize,
}

impl ResolvedEdge {
    pub fn touches(&self, node: usize) -> bool {
        self.source == node || self.target == node
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Canonical index-based view of one [`Graph`]. Every other part of the core
/// refers to nodes by index into this store and to edges by index into
/// [`GraphStore::edges`].
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    links: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
    edges: Vec<ResolvedEdge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    dangling: usize,
    duplicates: usize,
}

impl GraphStore {
    pub fn build(graph: Graph) -> Self {
        let Graph { nodes: raw_nodes, links } = graph;

        let mut nodes = Vec::with_capacity(raw_nodes.len());
        let mut index_by_id = HashMap::with_capacity(raw_nodes.len());
        let mut duplicates = 0usize;
        for node in raw_nodes {
            if index_by_id.contains_key(&node.id) {
                warn!("dropping duplicate node id {:?}", node.id);
                duplicates += 1;
                continue;
            }
            index_by_id.insert(node.id.clone(), nodes.len());
            nodes.push(node);
        }

        let mut edges = Vec::with_capacity(links.len());
        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        let mut dangling = 0usize;
        for (link_index, link) in links.iter().enumerate() {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(&link.source),
                index_by_id.get(&link.target),
            ) else {
                warn!(
                    "ignoring edge {:?} -> {:?}: unknown endpoint",
                    link.source, link.target
                );
                dangling += 1;
                continue;
            };

            let edge_index = edges.len();
            edges.push(ResolvedEdge {
                link: link_index,
                source,
                target,
            });
            outgoing[source].push(edge_index);
            incoming[target].push(edge_index);
        }

        Self {
            nodes,
            links,
            index_by_id,
            edges,
            outgoing,
            incoming,
            dangling,
            duplicates,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn root_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.category.is_root())
            .map(|(index, _)| index)
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    /// Caller-supplied record behind a resolved edge.
    pub fn link(&self, edge: &ResolvedEdge) -> &Edge {
        &self.links[edge.link]
    }

    /// Indices into [`GraphStore::edges`] leaving `node`, in declaration order.
    pub fn outgoing(&self, node: usize) -> &[usize] {
        self.outgoing.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices into [`GraphStore::edges`] arriving at `node`, in declaration order.
    pub fn incoming(&self, node: usize) -> &[usize] {
        self.incoming.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dangling_count(&self) -> usize {
        self.dangling
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::{Category, Edge, Node};

    fn graph(nodes: &[(&str, Category)], links: &[(&str, &str)]) -> Graph {
        Graph {
            nodes: nodes
                .iter()
                .map(|(id, category)| Node {
                    id: (*id).to_owned(),
                    label: id.to_uppercase(),
                    category: *category,
                    ..Node::default()
                })
                .collect(),
            links: links
                .iter()
                .map(|(source, target)| Edge {
                    source: (*source).to_owned(),
                    target: (*target).to_owned(),
                    relationship: "enables".to_owned(),
                })
                .collect(),
        }
    }

    #[test]
    fn dangling_edges_are_dropped_and_counted() {
        let store = GraphStore::build(graph(
            &[("a", Category::Root), ("b", Category::Skill)],
            &[("a", "b"), ("a", "ghost"), ("ghost", "b")],
        ));

        assert_eq!(store.edges().len(), 1);
        assert_eq!(store.dangling_count(), 2);
        assert_eq!(store.outgoing(0), &[0]);
        assert_eq!(store.incoming(1), &[0]);
    }

    #[test]
    fn resolved_edges_keep_their_link_position() {
        let store = GraphStore::build(graph(
            &[("a", Category::Root), ("b", Category::Skill)],
            &[("a", "nope"), ("a", "b")],
        ));

        let edge = store.edges()[0];
        assert_eq!(edge.link, 1);
        assert_eq!(store.link(&edge).target, "b");
    }

    #[test]
    fn duplicate_ids_keep_the_first_record() {
        let mut input = graph(&[("a", Category::Root), ("a", Category::Tool)], &[]);
        input.nodes[1].label = "second".to_owned();
        let store = GraphStore::build(input);

        assert_eq!(store.len(), 1);
        assert_eq!(store.duplicate_count(), 1);
        assert_eq!(store.node_by_id("a").map(|node| node.category), Some(Category::Root));
    }

    #[test]
    fn parallel_edges_and_self_loops_are_kept() {
        let store = GraphStore::build(graph(
            &[("a", Category::Root), ("b", Category::Skill)],
            &[("a", "b"), ("a", "b"), ("b", "b")],
        ));

        assert_eq!(store.edges().len(), 3);
        assert!(store.edges()[2].is_self_loop());
        assert_eq!(store.outgoing(0).len(), 2);
    }

    #[test]
    fn out_of_range_adjacency_is_empty() {
        let store = GraphStore::build(Graph::default());
        assert!(store.outgoing(7).is_empty());
        assert!(store.incoming(7).is_empty());
        assert_eq!(store.root_indices().count(), 0);
    }
}
