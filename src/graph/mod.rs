//! Graphs the kernels are computed on, and the data handles passed to kernels.
//!
//! - [GraphList] is a batch of independent labeled graphs, one per instance.
//! - [TripleData] is a batch of rdf like triple lists, one per instance, converted to graphs before extraction.


/// Defines interface to petgraph.
pub mod pgraph;

/// rdf triples to graph adapter.
pub mod triples;

pub use pgraph::*;
pub use triples::*;


/// A batch of graphs, the index of a graph in the batch is the index of the instance
/// in feature vectors and kernel matrices.
#[derive(Clone, Debug, Default)]
pub struct GraphList {
    graphs: Vec<LabeledGraph>,
}

impl GraphList {
    pub fn new(graphs: Vec<LabeledGraph>) -> Self {
        GraphList { graphs }
    }

    pub fn get_graphs(&self) -> &[LabeledGraph] {
        &self.graphs
    }

    pub fn push(&mut self, graph: LabeledGraph) {
        self.graphs.push(graph)
    }

    /// number of instances
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
} // end of impl GraphList

impl FromIterator<LabeledGraph> for GraphList {
    fn from_iter<I: IntoIterator<Item = LabeledGraph>>(iter: I) -> Self {
        GraphList {
            graphs: iter.into_iter().collect(),
        }
    }
}
