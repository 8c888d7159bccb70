//! Graphs coming from rdf data.
//!
//! The extraction of the triples describing an instance (subgraph around the instance resource, inference,
//! blacklisting) is done upstream. Here we only get, for each instance, its list of triples and map it to a [LabeledGraph]:
//! one node per distinct subject/object string, one edge per triple tagged by the predicate.

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;

use super::pgraph::*;
use super::GraphList;


#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}


/// one list of triples by instance
#[derive(Clone, Debug, Default)]
pub struct TripleData {
    instances: Vec<Vec<Triple>>,
}

impl TripleData {
    pub fn new(instances: Vec<Vec<Triple>>) -> Self {
        TripleData { instances }
    }

    pub fn get_instances(&self) -> &[Vec<Triple>] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// converts each instance to a graph, order is kept.
    pub fn to_graph_list(&self) -> GraphList {
        self.instances.iter().map(|triples| triples_to_graph(triples)).collect()
    }
} // end of impl TripleData


/// Build a graph from triples. A resource occurring many times, as subject or object, is one node.
pub fn triples_to_graph(triples: &[Triple]) -> LabeledGraph {
    let mut builder = GraphBuilder::with_capacity(triples.len() + 1, triples.len());
    let mut nodes = IndexMap::<&str, NodeIndex>::with_capacity(triples.len() + 1);
    for triple in triples {
        let subject = *nodes
            .entry(triple.subject.as_str())
            .or_insert_with(|| builder.add_node(triple.subject.as_str()));
        let object = *nodes
            .entry(triple.object.as_str())
            .or_insert_with(|| builder.add_node(triple.object.as_str()));
        builder.add_edge(subject, triple.predicate.as_str(), object);
    }
    log::trace!("triples_to_graph nb triples : {}, nb nodes : {}", triples.len(), nodes.len());
    builder.build()
} // end of triples_to_graph


// end of mod tests
