//! This module describes Edge and Node data we use in petgraph.
//! Nodes carry exactly one discrete label, edges carry one tag. The graph is directed and
//! there can be many edges between 2 given nodes, possibly with the same tag, self loops included.
//!
//! Node and edge indices (petgraph NodeIndex, EdgeIndex) are the identities of nodes and edges
//! during one feature extraction. As we never remove anything from a graph they are stable.

use petgraph::graph::{DefaultIx, EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};


/// Something with a discrete label, node label or edge tag.
pub trait HasLabel {
    fn get_label(&self) -> &str;
}

/// defines associated data to a Node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeData {
    label: String,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        NodeData { label: label.into() }
    }
}

impl HasLabel for NodeData {
    fn get_label(&self) -> &str {
        &self.label
    }
} // end of impl HasLabel for NodeData


//===================================================================================

/// Our edge data. Called a tag as in rdf graphs this is the predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EdgeData {
    tag: String,
}

impl EdgeData {
    pub fn new(tag: impl Into<String>) -> Self {
        EdgeData { tag: tag.into() }
    }

    /// retrieve the tag of the edge
    pub fn get_tag(&self) -> &str {
        &self.tag
    }
}

impl HasLabel for EdgeData {
    fn get_label(&self) -> &str {
        &self.tag
    }
} // end of impl HasLabel for EdgeData


/// The graph we compute kernels on.
pub type LabeledGraph = Graph<NodeData, EdgeData, Directed, DefaultIx>;


//=============================================================================

/// incremental construction of a [LabeledGraph]
pub struct GraphBuilder {
    graph: LabeledGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder {
            graph: LabeledGraph::default(),
        }
    }

    pub fn with_capacity(nb_nodes: usize, nb_edges: usize) -> Self {
        GraphBuilder {
            graph: LabeledGraph::with_capacity(nb_nodes, nb_edges),
        }
    }

    /// adds a node and returns its index
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeIndex {
        self.graph.add_node(NodeData::new(label))
    }

    /// adds a directed edge source -> target.
    /// Panics if source or target were not returned by [add_node](Self::add_node)
    pub fn add_edge(&mut self, source: NodeIndex, tag: impl Into<String>, target: NodeIndex) -> EdgeIndex {
        self.graph.add_edge(source, target, EdgeData::new(tag))
    }

    pub fn get_nb_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn build(self) -> LabeledGraph {
        self.graph
    }
} // end of impl GraphBuilder

impl Default for GraphBuilder {
    fn default() -> Self {
        GraphBuilder::new()
    }
}


/// returns (edge tag, neighbour) for edges leaving node (Outgoing) or arriving to node (Incoming).
/// The neighbour is the other extremity of the edge.
pub fn labeled_neighbours(
    graph: &LabeledGraph,
    node: NodeIndex,
    direction: Direction,
) -> impl Iterator<Item = (&str, NodeIndex)> + '_ {
    graph.edges_directed(node, direction).map(move |edge| {
        let neighbour = match direction {
            Direction::Outgoing => edge.target(),
            Direction::Incoming => edge.source(),
        };
        (edge.weight().get_tag(), neighbour)
    })
} // end of labeled_neighbours


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn multigraph_keeps_parallel_edges() {
        log_init_test();
        let mut builder = GraphBuilder::new();
        let a = builder.add_node("A");
        let b = builder.add_node("B");
        builder.add_edge(a, "r", b);
        builder.add_edge(a, "r", b);
        builder.add_edge(b, "s", b);
        let graph = builder.build();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        //
        let out_a: Vec<(&str, NodeIndex)> = labeled_neighbours(&graph, a, Direction::Outgoing).collect();
        assert_eq!(out_a.len(), 2);
        assert!(out_a.iter().all(|(tag, n)| *tag == "r" && *n == b));
        // the self loop is seen in both directions
        let in_b: Vec<(&str, NodeIndex)> = labeled_neighbours(&graph, b, Direction::Incoming).collect();
        assert_eq!(in_b.len(), 3);
        assert_eq!(in_b.iter().filter(|(_, n)| *n == b).count(), 1);
        assert_eq!(graph[a].get_label(), "A");
    } // end of multigraph_keeps_parallel_edges
} // end of mod tests
