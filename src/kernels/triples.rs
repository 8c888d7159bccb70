//! Kernels on rdf triple data.
//!
//! Each instance is converted to a [LabeledGraph](crate::graph::LabeledGraph) by [TripleData::to_graph_list]
//! and the wrapped graph kernel does the rest.

use ndarray::Array2;

use crate::error::Result;
use crate::feature::SparseVector;
use crate::graph::{GraphList, TripleData};

use super::*;


/// Adapts a kernel on [GraphList] to [TripleData].
pub struct TripleKernel<K> {
    kernel: K,
}

impl<K> TripleKernel<K> {
    pub fn new(kernel: K) -> Self {
        TripleKernel { kernel }
    }

    pub fn get_kernel(&self) -> &K {
        &self.kernel
    }
} // end of impl TripleKernel


impl<K> GraphKernel<TripleData> for TripleKernel<K>
where
    K: GraphKernel<GraphList>,
{
    fn get_label(&self) -> String {
        format!("Triple_{}", self.kernel.get_label())
    }

    fn compute(&mut self, data: &TripleData) -> Result<Array2<f64>> {
        log::debug!("TripleKernel converting {} instances", data.len());
        self.kernel.compute(&data.to_graph_list())
    }
}


impl<K> FeatureVectorKernel<TripleData> for TripleKernel<K>
where
    K: FeatureVectorKernel<GraphList>,
{
    fn compute_feature_vectors(&mut self, data: &TripleData) -> Result<Vec<SparseVector>> {
        self.kernel.compute_feature_vectors(&data.to_graph_list())
    }
}


impl<K> FeatureInspector for TripleKernel<K>
where
    K: FeatureInspector,
{
    fn get_feature_descriptions(&self, indices: &[usize]) -> Result<Vec<String>> {
        self.kernel.get_feature_descriptions(indices)
    }
}


impl<K> ComputationTimeTracker for TripleKernel<K>
where
    K: ComputationTimeTracker,
{
    fn get_computation_time(&self) -> u128 {
        self.kernel.get_computation_time()
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    use crate::graph::Triple;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn triples_match_graph_kernel() {
        log_init_test();
        let data = TripleData::new(vec![
            vec![Triple::new("s1", "type", "Person"), Triple::new("s1", "knows", "s2")],
            vec![Triple::new("s3", "type", "Person")],
        ]);
        let params = WLParams::new(2, true, true, false);
        let mut triple_kernel = TripleKernel::new(WLSubTreeKernel::new(params));
        let k_triples = triple_kernel.compute(&data).unwrap();
        let mut graph_kernel = WLSubTreeKernel::new(params);
        let k_graphs = graph_kernel.compute(&data.to_graph_list()).unwrap();
        assert_eq!(k_triples, k_graphs);
        assert!(triple_kernel.get_label().starts_with("Triple_WLSubTreeKernel"));
        let descriptions = triple_kernel.get_feature_descriptions(&[0]).unwrap();
        assert_eq!(descriptions[0], "s1");
    }
} // end of mod tests
