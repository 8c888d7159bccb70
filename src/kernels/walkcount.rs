//! The walk count kernel counts, in each graph, all the walks up to a given length
//! starting from each node and from each edge. Walks follow edge direction.
//!
//! Nodes and edges both count towards the length :
//! - length 0 is one node or one edge,
//! - length 1 is a node followed by an edge or an edge followed by its target node,
//! - length 2 is node, edge, node or edge, node, edge and so on.
//!
//! A walk is identified by the concatenation of the labels met. Before counting, labels and tags are
//! replaced by short tokens `_<id>` given by a dictionary private to the extraction. This shortens keys,
//! and as each token begins with the separator, two different walks never give the same key.

use std::time::SystemTime;

use cpu_time::ProcessTime;

use ndarray::Array2;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::error::{KernelError, Result};
use crate::feature::{FrozenDictionary, LabelDictionary, SparseVector};
use crate::graph::{GraphList, HasLabel, LabeledGraph};
use crate::matrix::{compute_kernel_matrix, normalize_vectors};

use super::*;


/// Dictionaries of the last extraction, kept for feature descriptions.
struct WalkDictionaries {
    /// original label or tag -> token id
    labels: FrozenDictionary<String>,
    /// walk key -> feature index
    paths: FrozenDictionary<String>,
}


pub struct WalkCountKernel {
    params: WalkCountParams,
    /// wall time in ms of last extraction
    comp_time: u128,
    dictionaries: Option<WalkDictionaries>,
} // end of struct WalkCountKernel


/// tokens of nodes and edges of one graph, indexed as the graph nodes and edges.
struct Tokens {
    nodes: Vec<String>,
    edges: Vec<String>,
}

fn tokenize(graph: &LabeledGraph, label_dict: &mut LabelDictionary<String>) -> Tokens {
    let nodes = graph
        .raw_nodes()
        .iter()
        .map(|n| format!("_{}", label_dict.get_or_insert_ref(n.weight.get_label())))
        .collect();
    let edges = graph
        .raw_edges()
        .iter()
        .map(|e| format!("_{}", label_dict.get_or_insert_ref(e.weight.get_label())))
        .collect();
    Tokens { nodes, edges }
} // end of tokenize


/// Recursive walk enumeration on one graph.
/// The path dictionary belongs to the extraction and is lent for the graph.
struct WalkCounter<'a> {
    graph: &'a LabeledGraph,
    tokens: &'a Tokens,
    path_dict: &'a mut LabelDictionary<String>,
    fv: &'a mut SparseVector,
}

impl<'a> WalkCounter<'a> {
    // path is the walk key up to the node (excluded), it is restored on return
    fn count_from_node(&mut self, node: NodeIndex, path: &mut String, depth: usize) {
        let len = path.len();
        path.push_str(&self.tokens.nodes[node.index()]);
        let id = self.path_dict.get_or_insert_ref(path.as_str());
        self.fv.increment(id, 1.);
        //
        if depth > 0 {
            let graph = self.graph;
            for edge in graph.edges_directed(node, Direction::Outgoing) {
                self.count_from_edge(edge.id(), edge.target(), path, depth - 1);
            }
        }
        path.truncate(len);
    } // end of count_from_node

    fn count_from_edge(&mut self, edge: EdgeIndex, target: NodeIndex, path: &mut String, depth: usize) {
        let len = path.len();
        path.push_str(&self.tokens.edges[edge.index()]);
        let id = self.path_dict.get_or_insert_ref(path.as_str());
        self.fv.increment(id, 1.);
        //
        if depth > 0 {
            self.count_from_node(target, path, depth - 1);
        }
        path.truncate(len);
    } // end of count_from_edge
} // end of impl WalkCounter


impl WalkCountKernel {
    pub fn new(params: WalkCountParams) -> Self {
        WalkCountKernel {
            params,
            comp_time: 0,
            dictionaries: None,
        }
    }

    pub fn get_params(&self) -> &WalkCountParams {
        &self.params
    }

    pub fn set_normalize(&mut self, normalize: bool) {
        self.params.set_normalize(normalize)
    }

    /// size of the path dictionary of the last extraction, i.e the dimension of feature vectors
    pub fn get_nb_features(&self) -> Option<usize> {
        self.dictionaries.as_ref().map(|d| d.paths.len())
    }

    fn describe(dictionaries: &WalkDictionaries, index: usize) -> Result<String> {
        let path = dictionaries
            .paths
            .get_key(index)
            .ok_or(KernelError::UnknownFeature(index))?;
        let mut description = String::with_capacity(2 * path.len());
        for token in path.split('_').skip(1) {
            let label = token
                .parse::<usize>()
                .ok()
                .and_then(|id| dictionaries.labels.get_key(id))
                .ok_or_else(|| KernelError::Parse(format!("bad walk token {} in {}", token, path)))?;
            description.push_str(label);
        }
        Ok(description)
    } // end of describe
} // end of impl WalkCountKernel


impl GraphKernel<GraphList> for WalkCountKernel {
    fn get_label(&self) -> String {
        format!("WalkCountKernel_{}_{}", self.params.path_length, self.params.normalize)
    }

    fn compute(&mut self, data: &GraphList) -> Result<Array2<f64>> {
        let vectors = self.compute_feature_vectors(data)?;
        Ok(compute_kernel_matrix(&vectors, self.params.parallel))
    }
} // end of impl GraphKernel


impl FeatureVectorKernel<GraphList> for WalkCountKernel {
    fn compute_feature_vectors(&mut self, data: &GraphList) -> Result<Vec<SparseVector>> {
        log::debug!("WalkCountKernel::compute_feature_vectors nb graphs : {}, params : {:?}", data.len(), self.params);
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let mut label_dict = LabelDictionary::<String>::new();
        let mut path_dict = LabelDictionary::<String>::new();
        let depth = self.params.path_length;
        let mut feature_vectors: Vec<SparseVector> = (0..data.len()).map(|_| SparseVector::new()).collect();
        //
        for (graph, fv) in data.get_graphs().iter().zip(feature_vectors.iter_mut()) {
            let tokens = tokenize(graph, &mut label_dict);
            let mut counter = WalkCounter {
                graph,
                tokens: &tokens,
                path_dict: &mut path_dict,
                fv,
            };
            let mut path = String::new();
            for node in graph.node_indices() {
                counter.count_from_node(node, &mut path, depth);
            }
            for (i, edge) in graph.raw_edges().iter().enumerate() {
                counter.count_from_edge(EdgeIndex::new(i), edge.target(), &mut path, depth);
            }
        }
        // all vectors get the dimension of the batch
        if let Some(last_index) = path_dict.get_last_index() {
            for fv in feature_vectors.iter_mut() {
                fv.set_last_index(last_index)?;
            }
        }
        //
        let cpu_time = cpu_start.elapsed();
        self.comp_time = sys_start.elapsed().map(|d| d.as_millis()).unwrap_or(0);
        log::info!(
            "WalkCountKernel nb graphs : {}, nb labels : {}, nb features : {}, sys time(ms) {:?} cpu time(ms) {:?}",
            data.len(),
            label_dict.len(),
            path_dict.len(),
            self.comp_time,
            cpu_time.as_millis()
        );
        self.dictionaries = Some(WalkDictionaries {
            labels: label_dict.freeze(),
            paths: path_dict.freeze(),
        });
        //
        if self.params.normalize {
            normalize_vectors(&mut feature_vectors);
        }
        Ok(feature_vectors)
    } // end of compute_feature_vectors
} // end of impl FeatureVectorKernel


impl FeatureInspector for WalkCountKernel {
    fn get_feature_descriptions(&self, indices: &[usize]) -> Result<Vec<String>> {
        let dictionaries = self
            .dictionaries
            .as_ref()
            .ok_or(KernelError::FeatureDescriptionUnavailable)?;
        indices.iter().map(|i| WalkCountKernel::describe(dictionaries, *i)).collect()
    }
}


impl ComputationTimeTracker for WalkCountKernel {
    fn get_computation_time(&self) -> u128 {
        self.comp_time
    }
}


//================================================================================================================

// end of mod tests
