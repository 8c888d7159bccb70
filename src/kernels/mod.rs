//! Graph kernels.
//!
//! A kernel computes a kernel matrix from a data handle (a [GraphList](crate::graph::GraphList),
//! a [TripleData](crate::graph::TripleData) ...).
//! The kernels implemented here are explicit feature kernels : each instance is mapped to a [SparseVector]
//! counting substructures, and the kernel matrix is the Gram matrix of these vectors.
//!
//! Some references :
//!
//! - Weisfeiler-Lehman Graph Kernels. Shervashidze, Schweitzer, van Leeuwen, Mehlhorn, Borgwardt 2011
//!         sorting neighbours labels + compression and h iterations, complexity h * nb edges.
//!
//! - Substructure counting graph kernels for machine learning from RDF data. de Vries, de Rooij 2015
//!         walk and subtree counting kernels on graphs extracted from rdf data.
//!
//! - Graph Kernels : A survey. Nikolentzos-Siglidis-Vazirgiannis 2021

use ndarray::Array2;

use crate::error::Result;
use crate::feature::SparseVector;

/// kernels parameters
pub mod params;

/// bounded walk counting
pub mod walkcount;

/// Weisfeiler-Lehman subtree
pub mod wlsubtree;

/// kernels on triple data, delegating to graph kernels
pub mod triples;

/// sum of kernels
pub mod combined;

pub use combined::CombinedKernel;
pub use params::*;
pub use triples::TripleKernel;
pub use walkcount::WalkCountKernel;
pub use wlsubtree::WLSubTreeKernel;


/// The capability shared by all kernels : compute a kernel matrix from a data handle D.
pub trait GraphKernel<D> {
    /// a readable identity of the kernel and its parameters, used as kernel id in experiments.
    fn get_label(&self) -> String;
    /// (nb instances, nb instances) kernel matrix
    fn compute(&mut self, data: &D) -> Result<Array2<f64>>;
} // end of trait GraphKernel


/// Kernels going through explicit feature vectors.
/// Each call builds its own dictionaries, indices are comparable only between vectors of one call.
pub trait FeatureVectorKernel<D>: GraphKernel<D> {
    fn compute_feature_vectors(&mut self, data: &D) -> Result<Vec<SparseVector>>;
}


/// retrieves what a feature index counts, after a feature vector computation.
pub trait FeatureInspector {
    /// fails with [KernelError::FeatureDescriptionUnavailable](crate::error::KernelError::FeatureDescriptionUnavailable)
    /// if no feature vectors were computed
    fn get_feature_descriptions(&self, indices: &[usize]) -> Result<Vec<String>>;
}


pub trait ComputationTimeTracker {
    /// time in milliseconds of the last feature extraction
    fn get_computation_time(&self) -> u128;
}
