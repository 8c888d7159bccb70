//! Weisfeiler-Lehman subtree kernel on directed graphs with labeled edges.
//!
//! Iteration 0 gives each node the id of its original label.
//! At iteration k a node gets the id of the label made of its label at iteration k-1 and of the sorted multiset
//! of (edge tag, neighbour label at iteration k-1) of its neighbours at distance 1, neighbours being successors
//! (reverse mode, regular subtrees) or predecessors.
//! Sorting the multiset makes the new label independent of the order in which edges are enumerated,
//! so two nodes with isomorphic neighbourhoods (recursively) get the same id.
//!
//! The feature vector of a graph counts node labels over iterations 0..=iterations.
//! All ids, over all iterations, come from one dictionary so the feature spaces of iterations do not overlap.
//!
//! The number of iterations is fixed, stabilization of labels is not checked: once labels are stable
//! each further iteration adds a copy of the previous counts under new ids.

use std::time::SystemTime;

use cpu_time::ProcessTime;

use ndarray::Array2;
use petgraph::Direction;

use crate::error::{KernelError, Result};
use crate::feature::{FrozenDictionary, LabelDictionary, SparseVector};
use crate::graph::{labeled_neighbours, GraphList, HasLabel};
use crate::matrix::{compute_kernel_matrix, normalize_vectors};

use super::*;


/// The keys of the WL dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WLLabel {
    /// label of the input graph
    Original(String),
    /// relabeling : previous id and sorted (tag id, neighbour id) couples
    Refined {
        previous: usize,
        neighbourhood: Vec<(usize, usize)>,
    },
} // end of enum WLLabel


struct WLDictionaries {
    tags: FrozenDictionary<String>,
    labels: FrozenDictionary<WLLabel>,
}


pub struct WLSubTreeKernel {
    params: WLParams,
    comp_time: u128,
    dictionaries: Option<WLDictionaries>,
} // end of struct WLSubTreeKernel


impl WLSubTreeKernel {
    pub fn new(params: WLParams) -> Self {
        WLSubTreeKernel {
            params,
            comp_time: 0,
            dictionaries: None,
        }
    }

    pub fn get_params(&self) -> &WLParams {
        &self.params
    }

    pub fn set_normalize(&mut self, normalize: bool) {
        self.params.set_normalize(normalize)
    }

    /// dictionary size of last extraction
    pub fn get_nb_features(&self) -> Option<usize> {
        self.dictionaries.as_ref().map(|d| d.labels.len())
    }

    fn get_direction(&self) -> Direction {
        if self.params.reverse {
            Direction::Outgoing
        } else {
            Direction::Incoming
        }
    }

    fn describe(dictionaries: &WLDictionaries, index: usize) -> Result<String> {
        match dictionaries.labels.get_key(index).ok_or(KernelError::UnknownFeature(index))? {
            WLLabel::Original(label) => Ok(label.clone()),
            WLLabel::Refined { previous, neighbourhood } => {
                let previous = WLSubTreeKernel::describe(dictionaries, *previous)?;
                let neighbours: Vec<String> = neighbourhood
                    .iter()
                    .map(|(tag, label)| match dictionaries.tags.get_key(*tag) {
                        Some(tag) => format!("{}:#{}", tag, label),
                        None => format!("?:#{}", label),
                    })
                    .collect();
                Ok(format!("{}({})", previous, neighbours.join(",")))
            }
        }
    } // end of describe
} // end of impl WLSubTreeKernel


impl GraphKernel<GraphList> for WLSubTreeKernel {
    fn get_label(&self) -> String {
        format!(
            "WLSubTreeKernel_{}_{}_{}",
            self.params.iterations, self.params.reverse, self.params.normalize
        )
    }

    fn compute(&mut self, data: &GraphList) -> Result<Array2<f64>> {
        let vectors = self.compute_feature_vectors(data)?;
        Ok(compute_kernel_matrix(&vectors, self.params.parallel))
    }
} // end of impl GraphKernel


impl FeatureVectorKernel<GraphList> for WLSubTreeKernel {
    fn compute_feature_vectors(&mut self, data: &GraphList) -> Result<Vec<SparseVector>> {
        log::debug!("WLSubTreeKernel::compute_feature_vectors nb graphs : {}, params : {:?}", data.len(), self.params);
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let graphs = data.get_graphs();
        let direction = self.get_direction();
        let mut dict = LabelDictionary::<WLLabel>::new();
        let mut tag_dict = LabelDictionary::<String>::new();
        let mut feature_vectors: Vec<SparseVector> = (0..graphs.len()).map(|_| SparseVector::new()).collect();
        //
        // iteration 0, original labels. labels[g][n] is the current id of node n of graph g
        let mut labels: Vec<Vec<usize>> = Vec::with_capacity(graphs.len());
        for (graph, fv) in graphs.iter().zip(feature_vectors.iter_mut()) {
            let graph_labels: Vec<usize> = graph
                .raw_nodes()
                .iter()
                .map(|n| dict.get_or_insert(WLLabel::Original(n.weight.get_label().to_string())))
                .collect();
            graph_labels.iter().for_each(|id| fv.increment(*id, 1.));
            labels.push(graph_labels);
        }
        //
        for iter in 1..=self.params.iterations {
            let size_before = dict.len();
            for ((graph, fv), graph_labels) in graphs.iter().zip(feature_vectors.iter_mut()).zip(labels.iter_mut()) {
                // all nodes are relabeled from labels of previous iteration
                let new_labels: Vec<usize> = graph
                    .node_indices()
                    .map(|node| {
                        let mut neighbourhood: Vec<(usize, usize)> = labeled_neighbours(graph, node, direction)
                            .map(|(tag, neighbour)| (tag_dict.get_or_insert_ref(tag), graph_labels[neighbour.index()]))
                            .collect();
                        neighbourhood.sort_unstable();
                        dict.get_or_insert(WLLabel::Refined {
                            previous: graph_labels[node.index()],
                            neighbourhood,
                        })
                    })
                    .collect();
                new_labels.iter().for_each(|id| fv.increment(*id, 1.));
                *graph_labels = new_labels;
            }
            log::debug!("WL iteration {}, nb new labels : {}", iter, dict.len() - size_before);
        }
        //
        if let Some(last_index) = dict.get_last_index() {
            for fv in feature_vectors.iter_mut() {
                fv.set_last_index(last_index)?;
            }
        }
        let cpu_time = cpu_start.elapsed();
        self.comp_time = sys_start.elapsed().map(|d| d.as_millis()).unwrap_or(0);
        log::info!(
            "WLSubTreeKernel nb graphs : {}, iterations : {}, nb features : {}, sys time(ms) {:?} cpu time(ms) {:?}",
            graphs.len(),
            self.params.iterations,
            dict.len(),
            self.comp_time,
            cpu_time.as_millis()
        );
        self.dictionaries = Some(WLDictionaries {
            tags: tag_dict.freeze(),
            labels: dict.freeze(),
        });
        //
        if self.params.normalize {
            normalize_vectors(&mut feature_vectors);
        }
        Ok(feature_vectors)
    } // end of compute_feature_vectors
} // end of impl FeatureVectorKernel


impl FeatureInspector for WLSubTreeKernel {
    fn get_feature_descriptions(&self, indices: &[usize]) -> Result<Vec<String>> {
        let dictionaries = self
            .dictionaries
            .as_ref()
            .ok_or(KernelError::FeatureDescriptionUnavailable)?;
        indices.iter().map(|i| WLSubTreeKernel::describe(dictionaries, *i)).collect()
    }
}


impl ComputationTimeTracker for WLSubTreeKernel {
    fn get_computation_time(&self) -> u128 {
        self.comp_time
    }
}


//================================================================================================================

// end of mod tests
